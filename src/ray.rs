use super::*;

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3,
    pub dir: Normal,
}

impl Ray {
    pub fn at(&self, t: f32) -> Point3 {
        self.origin + t * self.dir.into_inner()
    }

    /// Offsets the origin along the direction to avoid self-intersection on
    /// the next bounce.
    pub fn offset(origin: Point3, dir: Normal) -> Self {
        const EPSILON: f32 = 1e-4;
        Self {
            origin: origin + EPSILON * dir.into_inner(),
            dir,
        }
    }
}

/// Result of a ray/scene intersection. `t < 0.0` or `hit == false` means miss.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub hit: bool,
    pub t: f32,
    pub primitive_index: usize,
    pub normal: Normal,
    pub u: f32,
    pub v: f32,
    pub backface: bool,
}

impl RayHit {
    pub fn miss() -> Self {
        Self {
            hit: false,
            t: -1.0,
            primitive_index: usize::MAX,
            normal: normal!(Y_AXIS),
            u: 0.0,
            v: 0.0,
            backface: false,
        }
    }
}

impl Default for RayHit {
    fn default() -> Self {
        Self::miss()
    }
}
