use super::*;

//
// Notation
//

// wo = outgoing direction (towards the previous vertex / the viewer)
// wi = incoming direction (the scattered direction being evaluated)
// wm = microsurface normal / half vector
// wg = (0,1,0) = geometric normal, in local space
// theta = angle from the geometric normal
// phi = angle around the geometric normal on the xz plane

const EPSILON: f32 = 0.001;

type Outgoing = LocalVector;
type Incoming = LocalVector;
type MicrosurfaceNormal = LocalVector;
type UniformSample2D = (f32, f32);
type Reflectance = ColorRgb;
type Pdf = f32;

//
// LocalVector
//

// Local space is right-handed with geometric_normal = (0,1,0), so
// cos(theta) = dot(w, wg) is just the y-component of w.

#[derive(Clone, Copy, Debug)]
pub struct LocalVector(pub Vec3);

impl LocalVector {
    #[inline]
    pub fn local_from_world(local_from_world: &Mat3, world: &Vec3) -> Self {
        Self((*local_from_world * world).normalize())
    }

    #[inline]
    pub fn world_from_local(&self, world_from_local: &Mat3) -> Normal {
        normal!(*world_from_local * self.0)
    }

    #[inline]
    pub fn cos_theta(&self) -> f32 {
        self.0.y
    }

    #[inline]
    fn microsurface_normal(&self, other: &Self) -> MicrosurfaceNormal {
        Self((self.0 + other.0).normalize())
    }

    #[inline]
    fn same_hemisphere(&self, other: &Self) -> bool {
        self.0.y * other.0.y > 0.0
    }
}

//
// Sample
//

#[derive(Clone, Copy, Debug)]
pub struct Sample {
    pub wi: LocalVector,
    pub r: Reflectance,
    pub pdf: Pdf,
}

//
// BxDF - Models
//

#[derive(Clone, Copy, Debug)]
pub enum Model {
    Lambertian,
    Phong,
    BlinnPhong,
    Microfacet,
}

pub trait Bxdf {
    fn model(&self) -> Model;
    fn eval(&self, wo: &Outgoing, wi: &Incoming) -> Reflectance;
    fn pdf(&self, wo: &Outgoing, wi: &Incoming) -> Pdf;
    fn sample(&self, wo: &Outgoing, u: UniformSample2D) -> Option<Sample>;
}

//
// BxDF - Lambertian
//

#[derive(Clone, Copy, Debug)]
pub struct Lambertian {
    pub hemisphere: HemisphereSampler,
    pub base_color: ColorRgb,
}

impl Bxdf for Lambertian {
    fn model(&self) -> Model {
        Model::Lambertian
    }

    fn eval(&self, _wo: &Outgoing, _wi: &Incoming) -> Reflectance {
        self.base_color * INV_PI
    }

    fn pdf(&self, _wo: &Outgoing, wi: &Incoming) -> Pdf {
        if wi.cos_theta() <= 0.0 {
            0.0
        } else {
            self.hemisphere.pdf(wi.cos_theta())
        }
    }

    fn sample(&self, wo: &Outgoing, u: UniformSample2D) -> Option<Sample> {
        let wi = LocalVector(*self.hemisphere.sample(u.0, u.1));
        let pdf = self.pdf(wo, &wi);
        if pdf > EPSILON {
            Some(Sample {
                r: self.eval(wo, &wi),
                wi,
                pdf,
            })
        } else {
            None
        }
    }
}

//
// BxDF - Phong
//

/// Cosine-to-the-`exponent` lobe around the mirror-reflection direction of
/// `wo`, i.e. `(-wo.x, wo.y, -wo.z)` in local space.
#[derive(Clone, Copy, Debug)]
pub struct Phong {
    pub base_color: ColorRgb,
    pub exponent: f32,
}

impl Phong {
    fn reflection_direction(wo: &Outgoing) -> LocalVector {
        LocalVector(vector![-wo.0.x, wo.0.y, -wo.0.z])
    }
}

impl Bxdf for Phong {
    fn model(&self) -> Model {
        Model::Phong
    }

    fn eval(&self, wo: &Outgoing, wi: &Incoming) -> Reflectance {
        if wi.cos_theta() <= 0.0 {
            return ColorRgb::BLACK;
        }
        let reflection = Self::reflection_direction(wo);
        let cos_alpha = reflection.0.dot(&wi.0).max(0.0);
        self.base_color * ((self.exponent + 2.0) / TAU * cos_alpha.powf(self.exponent))
    }

    fn pdf(&self, wo: &Outgoing, wi: &Incoming) -> Pdf {
        let reflection = Self::reflection_direction(wo);
        let cos_alpha = reflection.0.dot(&wi.0).max(0.0);
        (self.exponent + 1.0) * cos_alpha.powf(self.exponent) / TAU
    }

    fn sample(&self, wo: &Outgoing, u: UniformSample2D) -> Option<Sample> {
        let cos_alpha = u.0.powf(1.0 / (self.exponent + 1.0));
        let sin_alpha = f32::sqrt(f32::max(0.0, 1.0 - cos_alpha * cos_alpha));
        let phi = TAU * u.1;
        // `y` is the lobe's polar axis, matching the hemisphere-sampler
        // convention where the pole maps to local "up".
        let local_lobe = vector![sin_alpha * phi.cos(), cos_alpha, sin_alpha * phi.sin()];

        let reflection = Self::reflection_direction(wo);
        let lobe_basis = OrthonormalBasis::new(&normal!(reflection.0));
        let wi = LocalVector(lobe_basis.to_world(&local_lobe));

        if !wo.same_hemisphere(&wi) || wi.cos_theta() <= 0.0 {
            return None;
        }

        let pdf = self.pdf(wo, &wi);
        if pdf > EPSILON {
            Some(Sample {
                r: self.eval(wo, &wi),
                wi,
                pdf,
            })
        } else {
            None
        }
    }
}

//
// BxDF - Blinn-Phong
//

/// Cosine-to-the-`exponent` lobe around the half-vector (sampled with the
/// geometric normal as the lobe axis); the scattered direction is the
/// reflection of `wo` about the sampled half-vector.
#[derive(Clone, Copy, Debug)]
pub struct BlinnPhong {
    pub base_color: ColorRgb,
    pub exponent: f32,
}

impl BlinnPhong {
    fn sample_half_vector(exponent: f32, u: UniformSample2D) -> MicrosurfaceNormal {
        let cos_theta = u.0.powf(1.0 / (exponent + 1.0));
        let sin_theta = f32::sqrt(f32::max(0.0, 1.0 - cos_theta * cos_theta));
        let phi = TAU * u.1;
        LocalVector(vector![phi.cos() * sin_theta, cos_theta, phi.sin() * sin_theta])
    }

    fn pdf_given_half(exponent: f32, wo: &Outgoing, wi: &Incoming, half: &MicrosurfaceNormal) -> f32 {
        let cos_theta_h = half.cos_theta().max(0.0);
        let dot_oh = wo.0.dot(&half.0).abs().max(EPSILON);
        let _ = wi;
        (exponent + 1.0) * cos_theta_h.powf(exponent) / (8.0 * PI * dot_oh)
    }
}

impl Bxdf for BlinnPhong {
    fn model(&self) -> Model {
        Model::BlinnPhong
    }

    fn eval(&self, wo: &Outgoing, wi: &Incoming) -> Reflectance {
        if wi.cos_theta() <= 0.0 {
            return ColorRgb::BLACK;
        }
        let half = wo.microsurface_normal(wi);
        let cos_theta_h = half.cos_theta().max(0.0);
        self.base_color * ((self.exponent + 2.0) / TAU * cos_theta_h.powf(self.exponent))
    }

    fn pdf(&self, wo: &Outgoing, wi: &Incoming) -> Pdf {
        let half = wo.microsurface_normal(wi);
        Self::pdf_given_half(self.exponent, wo, wi, &half)
    }

    fn sample(&self, wo: &Outgoing, u: UniformSample2D) -> Option<Sample> {
        let half = Self::sample_half_vector(self.exponent, u);
        let wi = LocalVector(reflect_vector(&wo.0, &half.0));
        if !wo.same_hemisphere(&wi) {
            return None;
        }
        let pdf = Self::pdf_given_half(self.exponent, wo, &wi, &half);
        if pdf > EPSILON {
            Some(Sample {
                r: self.eval(wo, &wi),
                wi,
                pdf,
            })
        } else {
            None
        }
    }
}

//
// BxDF - Microfacet (Blinn-Phong NDF + Schlick-Beckmann geometry term)
//

#[derive(Clone, Copy, Debug)]
pub struct Microfacet {
    pub base_color: ColorRgb,
    pub exponent: f32,
}

impl Microfacet {
    /// `G(w)`: 1 above the `a >= 1.6` threshold, else the Schlick-Beckmann
    /// approximation in terms of `a = sqrt(exponent/2 + 1) / tan(theta)`.
    fn geometry_term(&self, w: &LocalVector) -> f32 {
        let cos_theta = w.cos_theta();
        if cos_theta <= 0.0 {
            return 0.0;
        }
        let tan_theta = f32::sqrt(f32::max(0.0, 1.0 - cos_theta * cos_theta)) / cos_theta;
        if tan_theta <= 0.0 {
            return 1.0;
        }
        let a = f32::sqrt(self.exponent / 2.0 + 1.0) / tan_theta;
        if a >= 1.6 {
            1.0
        } else {
            (3.535 * a + 2.181 * a * a) / (1.0 + 2.276 * a + 2.577 * a * a)
        }
    }
}

impl Bxdf for Microfacet {
    fn model(&self) -> Model {
        Model::Microfacet
    }

    fn eval(&self, wo: &Outgoing, wi: &Incoming) -> Reflectance {
        if wi.cos_theta() <= 0.0 {
            return ColorRgb::BLACK;
        }
        let half = wo.microsurface_normal(wi);
        let cos_theta_h = half.cos_theta().max(0.0);
        let d = (self.exponent + 2.0) / TAU * cos_theta_h.powf(self.exponent);
        let g = self.geometry_term(wi) * self.geometry_term(wo);
        let dot_oh = wo.0.dot(&half.0).max(0.0);
        let fresnel = fresnel_schlick(self.base_color, dot_oh);
        let cos_theta_o = wo.cos_theta().abs().max(EPSILON);
        fresnel * d * g / (4.0 * cos_theta_o)
    }

    fn pdf(&self, wo: &Outgoing, wi: &Incoming) -> Pdf {
        let half = wo.microsurface_normal(wi);
        BlinnPhong::pdf_given_half(self.exponent, wo, wi, &half)
    }

    fn sample(&self, wo: &Outgoing, u: UniformSample2D) -> Option<Sample> {
        let half = BlinnPhong::sample_half_vector(self.exponent, u);
        let wi = LocalVector(reflect_vector(&wo.0, &half.0));
        if !wo.same_hemisphere(&wi) || wi.cos_theta() <= 0.0 {
            return None;
        }
        let pdf = BlinnPhong::pdf_given_half(self.exponent, wo, &wi, &half);
        if pdf > EPSILON {
            Some(Sample {
                r: self.eval(wo, &wi),
                wi,
                pdf,
            })
        } else {
            None
        }
    }
}
