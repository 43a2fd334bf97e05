use super::*;

// Implementation based on PBRT's axis-aligned bounding box.

#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    extents: [Point3; 2],
}

impl BoundingBox {
    /// The additive identity: infinite `min`, negative-infinite `max`.
    #[inline]
    pub fn empty() -> Self {
        Self {
            extents: [Vec3::repeat(f32::MAX).into(), Vec3::repeat(-f32::MAX).into()],
        }
    }

    #[inline]
    pub fn from_min_max(min: &Point3, max: &Point3) -> Self {
        Self {
            extents: [*min, *max],
        }
    }

    pub fn from_points<'a, Iter>(points: Iter) -> Self
    where
        Iter: IntoIterator<Item = &'a Point3>,
    {
        let mut bounds = Self::empty();
        for point in points {
            bounds.extend(point);
        }
        bounds
    }

    #[inline]
    pub fn min(&self) -> Point3 {
        self.extents[0]
    }

    #[inline]
    pub fn max(&self) -> Point3 {
        self.extents[1]
    }

    #[inline]
    pub fn center(&self) -> Point3 {
        na::center(&self.min(), &self.max())
    }

    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.max() - self.min()
    }

    pub fn surface_area(&self) -> f32 {
        let e = self.extents();
        2.0 * (e.x * e.y + e.x * e.z + e.y * e.z)
    }

    pub fn extend(&mut self, point: &Point3) {
        self.extents[0] = self.min().coords.inf(&point.coords).into();
        self.extents[1] = self.max().coords.sup(&point.coords).into();
    }

    pub fn merge(&mut self, other: &Self) {
        self.extents[0] = self.min().inf(&other.min());
        self.extents[1] = self.max().sup(&other.max());
    }

    pub fn merged(&self, other: &Self) -> Self {
        Self {
            extents: [self.min().inf(&other.min()), self.max().sup(&other.max())],
        }
    }

    /// Union; `empty()` is the identity, and union is commutative/associative.
    pub fn union(a: &Self, b: &Self) -> Self {
        a.merged(b)
    }

    /// Slab test. Swaps near/far per-axis when the ray direction is negative
    /// so that `1/0` directions still resolve to sign-correct infinities.
    pub fn intersect(&self, ray: &Ray, t_min: f32, t_max: f32) -> bool {
        let mut t_min = t_min;
        let mut t_max = t_max;
        for axis in 0..3 {
            let inv_dir = 1.0 / ray.dir[axis];
            let mut t0 = (self.min()[axis] - ray.origin[axis]) * inv_dir;
            let mut t1 = (self.max()[axis] - ray.origin[axis]) * inv_dir;
            if inv_dir < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = if t0 > t_min { t0 } else { t_min };
            t_max = if t1 < t_max { t1 } else { t_max };
            if t_max < t_min {
                return false;
            }
        }
        true
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    #[test]
    fn test_union_identity() {
        let b = BoundingBox::from_min_max(&Point3::new(-1.0, -1.0, -1.0), &Point3::new(1.0, 1.0, 1.0));
        let identity = BoundingBox::empty();
        let u = BoundingBox::union(&identity, &b);
        assert_eq!(u, b);
    }

    #[test]
    fn test_union_commutative_and_associative() {
        let a = BoundingBox::from_min_max(&Point3::new(-1.0, 0.0, 0.0), &Point3::new(0.0, 1.0, 1.0));
        let b = BoundingBox::from_min_max(&Point3::new(0.0, -1.0, 0.0), &Point3::new(1.0, 0.0, 1.0));
        let c = BoundingBox::from_min_max(&Point3::new(0.0, 0.0, -1.0), &Point3::new(1.0, 1.0, 0.0));

        assert_eq!(BoundingBox::union(&a, &b), BoundingBox::union(&b, &a));
        assert_eq!(
            BoundingBox::union(&BoundingBox::union(&a, &b), &c),
            BoundingBox::union(&a, &BoundingBox::union(&b, &c))
        );
    }

    #[test]
    fn test_ray_starting_inside_box_hits() {
        let bounds = BoundingBox::from_min_max(&Point3::new(-1.0, -1.0, -1.0), &Point3::new(1.0, 1.0, 1.0));
        let ray = Ray {
            origin: Point3::origin(),
            dir: normal!(vector![1.0, 0.0, 0.0]),
        };
        assert!(bounds.intersect(&ray, 0.0, f32::MAX));
    }

    #[test]
    fn test_zero_direction_component_does_not_panic() {
        let bounds = BoundingBox::from_min_max(&Point3::new(-1.0, -1.0, -1.0), &Point3::new(1.0, 1.0, 1.0));
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, -5.0),
            dir: normal!(vector![0.0, 0.0, 1.0]),
        };
        assert!(bounds.intersect(&ray, 0.0, f32::MAX));
        assert_ulps_eq!(1.0 / ray.dir.y, f32::INFINITY);
    }
}
