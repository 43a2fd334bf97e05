use super::*;

//
// Aliases
//
// Every other module uses these short names (`Vec3`, `Point3`, `Normal`,
// `Mat3`, ...) without importing them locally, via the crate-root glob
// import each module file opens with.
//

pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Vec3u = na::Vector3<u32>;
pub type Vec3b = na::Vector3<bool>;
pub type Point2 = na::Point2<f32>;
pub type Point3 = na::Point3<f32>;
pub type Mat3 = na::Matrix3<f32>;
pub type Mat4 = na::Matrix4<f32>;
pub type Normal = na::Unit<Vec3>;

pub const X_AXIS: Vec3 = na::vector![1.0, 0.0, 0.0];
pub const Y_AXIS: Vec3 = na::vector![0.0, 1.0, 0.0];
pub const Z_AXIS: Vec3 = na::vector![0.0, 0.0, 1.0];

macro_rules! vector {
    ($($tokens:tt)*) => {
        na::vector![$($tokens)*]
    };
}

macro_rules! normal {
    ($x:expr) => {
        na::Unit::new_normalize($x)
    };
}

pub(crate) use normal;
pub(crate) use vector;

//
// Color
//

#[repr(C)]
#[derive(Clone, Copy, PartialEq, Debug, Pod, Zeroable, Serialize, Deserialize)]
pub struct ColorRgb([f32; 3]);

impl ColorRgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub const fn red(&self) -> f32 {
        self.0[0]
    }

    #[inline]
    pub const fn green(&self) -> f32 {
        self.0[1]
    }

    #[inline]
    pub const fn blue(&self) -> f32 {
        self.0[2]
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0[0].is_finite() && self.0[1].is_finite() && self.0[2].is_finite()
    }

    /// Clamps non-finite components to a signed ceiling instead of silently
    /// substituting zero.
    pub fn clamp_finite(self, ceiling: f32) -> Self {
        let fix = |c: f32| if c.is_finite() { c } else { c.signum() * ceiling };
        Self([fix(self.0[0]), fix(self.0[1]), fix(self.0[2])])
    }
}

impl Default for ColorRgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::ops::Add for ColorRgb {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1], self.0[2] + rhs.0[2]])
    }
}

impl std::ops::Sub for ColorRgb {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self([self.0[0] - rhs.0[0], self.0[1] - rhs.0[1], self.0[2] - rhs.0[2]])
    }
}

impl std::ops::AddAssign for ColorRgb {
    fn add_assign(&mut self, rhs: Self) {
        self.0[0] += rhs.0[0];
        self.0[1] += rhs.0[1];
        self.0[2] += rhs.0[2];
    }
}

impl std::ops::Mul<f32> for ColorRgb {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self([self.0[0] * rhs, self.0[1] * rhs, self.0[2] * rhs])
    }
}

impl std::ops::Mul<ColorRgb> for f32 {
    type Output = ColorRgb;

    fn mul(self, rhs: ColorRgb) -> Self::Output {
        ColorRgb([rhs.0[0] * self, rhs.0[1] * self, rhs.0[2] * self])
    }
}

impl std::ops::Mul for ColorRgb {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self([self.0[0] * rhs.0[0], self.0[1] * rhs.0[1], self.0[2] * rhs.0[2]])
    }
}

impl std::ops::MulAssign for ColorRgb {
    fn mul_assign(&mut self, rhs: Self) {
        self.0[0] *= rhs.0[0];
        self.0[1] *= rhs.0[1];
        self.0[2] *= rhs.0[2];
    }
}

impl std::ops::Div<f32> for ColorRgb {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        Self([self.0[0] / rhs, self.0[1] / rhs, self.0[2] / rhs])
    }
}

impl std::fmt::Display for ColorRgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.red(), self.green(), self.blue())
    }
}

//
// Interpolation
//

pub fn lerp_scalar<T: num::Float>(a: T, b: T, t: T) -> T {
    a * (T::one() - t) + b * t
}

pub fn lerp_color(a: &ColorRgb, b: &ColorRgb, t: f32) -> ColorRgb {
    ColorRgb::new(
        lerp_scalar(a.red(), b.red(), t),
        lerp_scalar(a.green(), b.green(), t),
        lerp_scalar(a.blue(), b.blue(), t),
    )
}

//
// Geometric
//

pub fn reflect_vector(v: &Vec3, n: &Vec3) -> Vec3 {
    (2.0 * v.dot(n) * n - v).normalize()
}

/// Schlick's approximation of the Fresnel reflectance, componentwise.
pub fn fresnel_schlick(f0: ColorRgb, cos_theta: f32) -> ColorRgb {
    let m = (1.0 - cos_theta).clamp(0.0, 1.0).powi(5);
    f0 + (ColorRgb::WHITE - f0) * m
}

//
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    #[test]
    fn test_lerp_scalar() {
        assert_ulps_eq!(lerp_scalar(0.0, 1.0, 0.0), 0.0, max_ulps = 1);
        assert_ulps_eq!(lerp_scalar(0.0, 1.0, 0.5), 0.5, max_ulps = 1);
        assert_ulps_eq!(lerp_scalar(0.0, 1.0, 1.0), 1.0, max_ulps = 1);
    }

    #[test]
    fn test_lerp_color() {
        let a = ColorRgb::BLACK;
        let b = ColorRgb::WHITE;
        let c = lerp_color(&a, &b, 0.5);
        assert_ulps_eq!(c.red(), 0.5, max_ulps = 1);
        assert_ulps_eq!(c.green(), 0.5, max_ulps = 1);
        assert_ulps_eq!(c.blue(), 0.5, max_ulps = 1);
    }

    #[test]
    fn test_reflect_vector() {
        let v = na::vector![1.0, 1.0, 0.0].normalize();
        let n = na::vector![0.0, 1.0, 0.0];
        let r = reflect_vector(&v, &n);
        assert_ulps_eq!(v.x, -r.x, max_ulps = 1);
        assert_ulps_eq!(v.y, r.y, max_ulps = 1);
        assert_ulps_eq!(v.z, r.z, max_ulps = 1);
    }

    #[test]
    fn test_fresnel_schlick_at_normal_incidence() {
        let f0 = ColorRgb::new(0.04, 0.04, 0.04);
        let f = fresnel_schlick(f0, 1.0);
        assert_ulps_eq!(f.red(), f0.red(), max_ulps = 1);
    }

    #[test]
    fn test_fresnel_schlick_at_grazing_angle() {
        let f0 = ColorRgb::new(0.04, 0.04, 0.04);
        let f = fresnel_schlick(f0, 0.0);
        assert_ulps_eq!(f.red(), 1.0, max_ulps = 1);
    }
}
