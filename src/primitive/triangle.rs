use super::*;

#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub positions: [Point3; 3],
    pub tex_coords: [Point2; 3],
    pub normals: [Normal; 3],
    pub material: usize,
    pub area_light: Option<usize>,
}

impl Triangle {
    pub fn new(
        positions: [Point3; 3],
        normals: [Normal; 3],
        tex_coords: [Point2; 3],
        material: usize,
        area_light: Option<usize>,
    ) -> Self {
        Self {
            positions,
            tex_coords,
            normals,
            material,
            area_light,
        }
    }

    pub fn interpolated_tex_coord(&self, barycentrics: &Vec3) -> Point2 {
        Point2::from(
            self.tex_coords[0].coords * barycentrics.x
                + self.tex_coords[1].coords * barycentrics.y
                + self.tex_coords[2].coords * barycentrics.z,
        )
    }

    pub fn interpolated_normal(&self, barycentrics: &Vec3) -> Normal {
        normal!(
            self.normals[0].into_inner() * barycentrics.x
                + self.normals[1].into_inner() * barycentrics.y
                + self.normals[2].into_inner() * barycentrics.z
        )
    }

    fn geometric_normal(&self) -> Normal {
        let e1 = self.positions[1] - self.positions[0];
        let e2 = self.positions[2] - self.positions[0];
        normal!(e1.cross(&e2))
    }

    fn area(&self) -> f32 {
        let e1 = self.positions[1] - self.positions[0];
        let e2 = self.positions[2] - self.positions[0];
        0.5 * e1.cross(&e2).norm()
    }

    /// Classic Möller-Trumbore; barycentrics `(1-u-v, u, v)`.
    pub fn intersect(&self, ray: &Ray, t_min: f32, t_max: f32) -> RayHit {
        let [v0, v1, v2] = self.positions;
        let d = ray.dir.into_inner();
        let e1 = v1 - v0;
        let e2 = v2 - v0;

        let pvec = d.cross(&e2);
        let det = e1.dot(&pvec);
        if det.abs() < f32::EPSILON {
            return RayHit::miss();
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin - v0;
        let u = tvec.dot(&pvec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return RayHit::miss();
        }

        let qvec = tvec.cross(&e1);
        let v = d.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return RayHit::miss();
        }

        let t = e2.dot(&qvec) * inv_det;
        if t <= t_min || t >= t_max {
            return RayHit::miss();
        }

        let barycentrics = vector![1.0 - u - v, u, v];
        let shading_normal = self.interpolated_normal(&barycentrics);
        let tex_coord = self.interpolated_tex_coord(&barycentrics);

        let backface = shading_normal.dot(&d) > 0.0;
        let normal = if backface {
            normal!(-shading_normal.into_inner())
        } else {
            shading_normal
        };

        RayHit {
            hit: true,
            t,
            primitive_index: usize::MAX,
            normal,
            u: tex_coord.x,
            v: tex_coord.y,
            backface,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions.iter())
    }

    pub fn sample_surface(&self, u1: f32, u2: f32) -> (Point3, Normal, f32) {
        let su1 = u1.sqrt();
        let b1 = 1.0 - su1;
        let b2 = su1 * u2;
        let b0 = 1.0 - b1 - b2;
        let point = Point3::from(
            self.positions[0].coords * b0 + self.positions[1].coords * b1 + self.positions[2].coords * b2,
        );
        (point, self.geometric_normal(), self.area())
    }

    pub fn pdf_surface(&self, ray: &Ray) -> f32 {
        let hit = self.intersect(ray, 1e-4, f32::MAX);
        if !hit.hit {
            return 0.0;
        }
        let cos_theta = f32::abs(-ray.dir.dot(&hit.normal));
        if cos_theta <= 0.0 {
            return 0.0;
        }
        (hit.t * hit.t) / (cos_theta * self.area())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    fn test_triangle() -> Triangle {
        let n = normal!(vector![0.0, 0.0, 1.0]);
        Triangle::new(
            [
                Point3::new(0.0, 1.0, -2.0),
                Point3::new(-1.0, -1.0, -2.0),
                Point3::new(1.0, -1.0, -2.0),
            ],
            [n, n, n],
            [Point2::new(0.5, 0.0), Point2::new(0.0, 1.0), Point2::new(1.0, 1.0)],
            0,
            None,
        )
    }

    #[test]
    fn test_center_ray_hits_triangle_with_equal_barycentric_weights() {
        let tri = test_triangle();
        let ray = Ray {
            origin: Point3::new(0.0, -1.0 / 3.0, 0.0),
            dir: normal!(vector![0.0, 0.0, -1.0]),
        };
        let hit = tri.intersect(&ray, 1e-4, f32::MAX);
        assert!(hit.hit);
        assert_ulps_eq!(hit.t, 2.0, max_ulps = 4);
    }

    #[test]
    fn test_ray_outside_triangle_misses() {
        let tri = test_triangle();
        let ray = Ray {
            origin: Point3::new(10.0, 10.0, 0.0),
            dir: normal!(vector![0.0, 0.0, -1.0]),
        };
        assert!(!tri.intersect(&ray, 1e-4, f32::MAX).hit);
    }

    #[test]
    fn test_sample_surface_lies_in_plane_and_jacobian_is_area() {
        let tri = test_triangle();
        let (point, normal, jacobian) = tri.sample_surface(0.25, 0.6);
        assert_ulps_eq!(point.z, -2.0, max_ulps = 4);
        assert_ulps_eq!(normal.z.abs(), 1.0, max_ulps = 4);
        assert_ulps_eq!(jacobian, 2.0, max_ulps = 4);
    }
}
