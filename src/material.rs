use super::*;

/// A material's scattered direction, returned by `Material::sample`.
///
/// `Delta` bounces (Mirror, and Plastic's specular branch) carry their own
/// weight and bypass MIS entirely: the chosen direction has zero probability
/// under any continuous sampling strategy, so there is no light-sampling
/// pdf to combine against.
pub enum Scatter {
    Delta { direction: Normal, weight: ColorRgb },
    Smooth { direction: Normal, albedo: ColorRgb, pdf: f32 },
}

#[derive(Clone, Debug)]
pub enum Material {
    Lambert { albedo: Albedo },
    Mirror { albedo: Albedo },
    Plastic { albedo: Albedo, eta: f32 },
    Phong { albedo: Albedo, exponent: f32 },
    BlinnPhong { albedo: Albedo, exponent: f32 },
    Microfacet { albedo: Albedo, exponent: f32 },
}

impl Material {
    pub fn is_delta(&self) -> bool {
        matches!(self, Self::Mirror { .. })
    }

    fn albedo(&self) -> &Albedo {
        match self {
            Self::Lambert { albedo }
            | Self::Mirror { albedo }
            | Self::Plastic { albedo, .. }
            | Self::Phong { albedo, .. }
            | Self::BlinnPhong { albedo, .. }
            | Self::Microfacet { albedo, .. } => albedo,
        }
    }

    fn reflection_factor(eta: f32, cos_theta: f32) -> ColorRgb {
        let f0 = ((eta - 1.0) / (eta + 1.0)).powi(2);
        fresnel_schlick(ColorRgb::new(f0, f0, f0), cos_theta)
    }

    /// Samples a scattered direction, in world space, given the incoming
    /// ray direction and the hit it produced.
    pub fn sample(
        &self,
        ray_in_dir: &Normal,
        hit: &RayHit,
        rng: &mut UniformSampler,
        textures: &[Image],
    ) -> Option<Scatter> {
        let wo_world = -ray_in_dir.into_inner();
        let albedo = self.albedo().sample(hit.u, hit.v, textures);

        match self {
            Self::Lambert { .. } => {
                let basis = OrthonormalBasis::new(&hit.normal);
                let bxdf = Lambertian {
                    hemisphere: HemisphereSampler::Cosine,
                    base_color: albedo,
                };
                let wo = LocalVector::local_from_world(basis.local_from_world(), &wo_world);
                let sample = bxdf.sample(&wo, rng.sample2())?;
                Some(Scatter::Smooth {
                    direction: sample.wi.world_from_local(basis.world_from_local()),
                    albedo,
                    pdf: sample.pdf,
                })
            }
            Self::Mirror { .. } => {
                let direction = normal!(reflect_vector(&wo_world, &hit.normal.into_inner()));
                let cos_theta = wo_world.dot(&hit.normal).max(0.0);
                let fresnel = fresnel_schlick(albedo, cos_theta);
                Some(Scatter::Delta {
                    direction,
                    weight: fresnel,
                })
            }
            Self::Plastic { eta, .. } => {
                let cos_theta = wo_world.dot(&hit.normal).max(0.0);
                let fresnel = Self::reflection_factor(*eta, cos_theta);
                let prob_specular = ((fresnel.red() + fresnel.green() + fresnel.blue()) / 3.0).clamp(0.0, 1.0);

                if rng.sample() < prob_specular {
                    let direction = normal!(reflect_vector(&wo_world, &hit.normal.into_inner()));
                    Some(Scatter::Delta {
                        direction,
                        weight: fresnel,
                    })
                } else {
                    let basis = OrthonormalBasis::new(&hit.normal);
                    let bxdf = Lambertian {
                        hemisphere: HemisphereSampler::Cosine,
                        base_color: albedo,
                    };
                    let wo = LocalVector::local_from_world(basis.local_from_world(), &wo_world);
                    let sample = bxdf.sample(&wo, rng.sample2())?;
                    Some(Scatter::Smooth {
                        direction: sample.wi.world_from_local(basis.world_from_local()),
                        albedo,
                        pdf: sample.pdf,
                    })
                }
            }
            Self::Phong { exponent, .. } => {
                let basis = OrthonormalBasis::new(&hit.normal);
                let bxdf = Phong {
                    base_color: albedo,
                    exponent: *exponent,
                };
                let wo = LocalVector::local_from_world(basis.local_from_world(), &wo_world);
                let sample = bxdf.sample(&wo, rng.sample2())?;
                Some(Scatter::Smooth {
                    direction: sample.wi.world_from_local(basis.world_from_local()),
                    albedo,
                    pdf: sample.pdf,
                })
            }
            Self::BlinnPhong { exponent, .. } => {
                let basis = OrthonormalBasis::new(&hit.normal);
                let bxdf = BlinnPhong {
                    base_color: albedo,
                    exponent: *exponent,
                };
                let wo = LocalVector::local_from_world(basis.local_from_world(), &wo_world);
                let sample = bxdf.sample(&wo, rng.sample2())?;
                Some(Scatter::Smooth {
                    direction: sample.wi.world_from_local(basis.world_from_local()),
                    albedo,
                    pdf: sample.pdf,
                })
            }
            Self::Microfacet { exponent, .. } => {
                let basis = OrthonormalBasis::new(&hit.normal);
                let bxdf = Microfacet {
                    base_color: albedo,
                    exponent: *exponent,
                };
                let wo = LocalVector::local_from_world(basis.local_from_world(), &wo_world);
                let sample = bxdf.sample(&wo, rng.sample2())?;
                Some(Scatter::Smooth {
                    direction: sample.wi.world_from_local(basis.world_from_local()),
                    albedo,
                    pdf: sample.pdf,
                })
            }
        }
    }

    /// Density of `wi_world` under this material's continuous sampler,
    /// observed at `hit` with incoming direction `ray_in_dir`. Zero for
    /// delta materials, used to form the MIS weight when `wi_world` came
    /// from light sampling instead of BSDF sampling.
    pub fn pdf(&self, ray_in_dir: &Normal, hit: &RayHit, wi_world: &Normal) -> f32 {
        let wo_world = -ray_in_dir.into_inner();
        let basis = OrthonormalBasis::new(&hit.normal);
        let wo = LocalVector::local_from_world(basis.local_from_world(), &wo_world);
        let wi = LocalVector::local_from_world(basis.local_from_world(), &wi_world.into_inner());

        match self {
            Self::Lambert { .. } => Lambertian {
                hemisphere: HemisphereSampler::Cosine,
                base_color: ColorRgb::WHITE,
            }
            .pdf(&wo, &wi),
            Self::Mirror { .. } => 0.0,
            Self::Plastic { eta, .. } => {
                let cos_theta = wo_world.dot(&hit.normal).max(0.0);
                let fresnel = Self::reflection_factor(*eta, cos_theta);
                let prob_specular = ((fresnel.red() + fresnel.green() + fresnel.blue()) / 3.0).clamp(0.0, 1.0);
                let lambert_pdf = Lambertian {
                    hemisphere: HemisphereSampler::Cosine,
                    base_color: ColorRgb::WHITE,
                }
                .pdf(&wo, &wi);
                (1.0 - prob_specular) * lambert_pdf
            }
            Self::Phong { exponent, .. } => {
                (Phong {
                    base_color: ColorRgb::WHITE,
                    exponent: *exponent,
                })
                .pdf(&wo, &wi)
            }
            Self::BlinnPhong { exponent, .. } => {
                (BlinnPhong {
                    base_color: ColorRgb::WHITE,
                    exponent: *exponent,
                })
                .pdf(&wo, &wi)
            }
            Self::Microfacet { exponent, .. } => {
                (Microfacet {
                    base_color: ColorRgb::WHITE,
                    exponent: *exponent,
                })
                .pdf(&wo, &wi)
            }
        }
    }

    /// BRDF value for an externally-provided direction (used by the
    /// light-sampling MIS branch, where the direction comes from the light
    /// rather than this material's own sampler).
    pub fn brdf_scalar(&self, ray_in_dir: &Normal, hit: &RayHit, wi_world: &Normal, textures: &[Image]) -> ColorRgb {
        let wo_world = -ray_in_dir.into_inner();
        let basis = OrthonormalBasis::new(&hit.normal);
        let wo = LocalVector::local_from_world(basis.local_from_world(), &wo_world);
        let wi = LocalVector::local_from_world(basis.local_from_world(), &wi_world.into_inner());
        let albedo = self.albedo().sample(hit.u, hit.v, textures);

        match self {
            Self::Lambert { .. } => {
                Lambertian {
                    hemisphere: HemisphereSampler::Cosine,
                    base_color: albedo,
                }
                .eval(&wo, &wi)
            }
            Self::Mirror { .. } => ColorRgb::BLACK,
            Self::Plastic { eta, .. } => {
                let cos_theta = wo_world.dot(&hit.normal).max(0.0);
                let fresnel = Self::reflection_factor(*eta, cos_theta);
                let prob_specular = ((fresnel.red() + fresnel.green() + fresnel.blue()) / 3.0).clamp(0.0, 1.0);
                let lambert = Lambertian {
                    hemisphere: HemisphereSampler::Cosine,
                    base_color: albedo,
                }
                .eval(&wo, &wi);
                lambert * (1.0 - prob_specular)
            }
            Self::Phong { exponent, .. } => {
                (Phong {
                    base_color: albedo,
                    exponent: *exponent,
                })
                .eval(&wo, &wi)
            }
            Self::BlinnPhong { exponent, .. } => {
                (BlinnPhong {
                    base_color: albedo,
                    exponent: *exponent,
                })
                .eval(&wo, &wi)
            }
            Self::Microfacet { exponent, .. } => {
                (Microfacet {
                    base_color: albedo,
                    exponent: *exponent,
                })
                .eval(&wo, &wi)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hit(normal: Vec3) -> RayHit {
        RayHit {
            hit: true,
            t: 1.0,
            primitive_index: 0,
            normal: normal!(normal),
            u: 0.0,
            v: 0.0,
            backface: false,
        }
    }

    #[test]
    fn test_lambert_sample_stays_on_front_side_of_normal() {
        let material = Material::Lambert {
            albedo: Albedo::flat(ColorRgb::new(0.8, 0.2, 0.2)),
        };
        let hit = flat_hit(vector![0.0, 1.0, 0.0]);
        let ray_in_dir = normal!(vector![0.0, -1.0, 0.0]);
        let mut rng = UniformSampler::new_for_tile(1);
        for _ in 0..16 {
            if let Some(Scatter::Smooth { direction, pdf, .. }) = material.sample(&ray_in_dir, &hit, &mut rng, &[]) {
                assert!(direction.y > 0.0);
                assert!(pdf > 0.0);
            }
        }
    }

    #[test]
    fn test_mirror_reflects_about_normal() {
        let material = Material::Mirror {
            albedo: Albedo::flat(ColorRgb::WHITE),
        };
        let hit = flat_hit(vector![0.0, 1.0, 0.0]);
        let ray_in_dir = normal!(vector![1.0, -1.0, 0.0]);
        let mut rng = UniformSampler::new_for_tile(1);
        match material.sample(&ray_in_dir, &hit, &mut rng, &[]) {
            Some(Scatter::Delta { direction, .. }) => {
                assert!(direction.y > 0.0);
                assert!(direction.x > 0.0);
            }
            _ => panic!("expected a delta scatter"),
        }
    }

    #[test]
    fn test_plastic_pdf_is_zero_probability_weighted_lambert() {
        let material = Material::Plastic {
            albedo: Albedo::flat(ColorRgb::new(0.5, 0.5, 0.5)),
            eta: 1.5,
        };
        let hit = flat_hit(vector![0.0, 1.0, 0.0]);
        let ray_in_dir = normal!(vector![0.0, -1.0, 0.0]);
        let wi = normal!(vector![0.0, 1.0, 0.0]);
        let pdf = material.pdf(&ray_in_dir, &hit, &wi);
        assert!(pdf > 0.0 && pdf < (1.0 / PI));
    }
}
