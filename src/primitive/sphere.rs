use super::*;

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f32,
    pub material: usize,
    pub area_light: Option<usize>,
}

impl Sphere {
    pub fn new(center: Point3, radius: f32, material: usize, area_light: Option<usize>) -> Self {
        Self {
            center,
            radius,
            material,
            area_light,
        }
    }

    pub fn intersect(&self, ray: &Ray, t_min: f32, t_max: f32) -> RayHit {
        let oc = ray.origin - self.center;
        let d = ray.dir.into_inner();
        let a = d.dot(&d);
        let b = 2.0 * oc.dot(&d);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant <= 0.0 {
            return RayHit::miss();
        }
        let sqrt_d = discriminant.sqrt();

        let near = (-b - sqrt_d) / (2.0 * a);
        let (t, backface) = if near > t_min && near < t_max && near > 0.0 {
            (near, false)
        } else {
            let far = (-b + sqrt_d) / (2.0 * a);
            if far > t_min && far < t_max && far > 0.0 {
                (far, true)
            } else {
                return RayHit::miss();
            }
        };

        let p = ray.at(t);
        let outward_normal = normal!(p - self.center);
        let normal = if backface {
            normal!(-outward_normal.into_inner())
        } else {
            outward_normal
        };

        let n = outward_normal.into_inner();
        let u = (PI + f32::atan2(-n.z, n.x)) / TAU;
        let v = n.y.clamp(-1.0, 1.0).acos() / PI;

        RayHit {
            hit: true,
            t,
            primitive_index: usize::MAX,
            normal,
            u,
            v,
            backface,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        let r = vector![self.radius, self.radius, self.radius];
        BoundingBox::from_min_max(&(self.center - r), &(self.center + r))
    }

    pub fn sample_surface(&self, u1: f32, u2: f32) -> (Point3, Normal, f32) {
        let cos_theta = 1.0 - 2.0 * u1;
        let sin_theta = f32::sqrt(f32::max(0.0, 1.0 - cos_theta * cos_theta));
        let phi = TAU * u2;
        let dir = vector![
            sin_theta * f32::cos(phi),
            cos_theta,
            sin_theta * f32::sin(phi)
        ];
        let normal = normal!(dir);
        let point = self.center + self.radius * dir;
        let jacobian = 4.0 * PI * self.radius * self.radius;
        (point, normal, jacobian)
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
        let area = 4.0 * PI * self.radius * self.radius;
        let p = (hit.t * hit.t) / (cos_theta * area);
        // Each direction is reachable via the near or the far root, so the
        // analytic density is doubled to account for both selections.
        2.0 * p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    #[test]
    fn test_center_ray_hits_front_and_reports_unit_normal() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -2.0), 1.0, 0, None);
        let ray = Ray {
            origin: Point3::origin(),
            dir: normal!(vector![0.0, 0.0, -1.0]),
        };
        let hit = sphere.intersect(&ray, 1e-4, f32::MAX);
        assert!(hit.hit);
        assert_ulps_eq!(hit.t, 1.0, max_ulps = 4);
        assert!(!hit.backface);
        assert_ulps_eq!(hit.normal.z, 1.0, max_ulps = 4);
    }

    #[test]
    fn test_ray_inside_sphere_hits_far_root_as_backface() {
        let sphere = Sphere::new(Point3::origin(), 1.0, 0, None);
        let ray = Ray {
            origin: Point3::origin(),
            dir: normal!(vector![1.0, 0.0, 0.0]),
        };
        let hit = sphere.intersect(&ray, 1e-4, f32::MAX);
        assert!(hit.hit);
        assert!(hit.backface);
        assert_ulps_eq!(hit.t, 1.0, max_ulps = 4);
    }

    #[test]
    fn test_sample_surface_lies_on_sphere_and_jacobian_is_surface_area() {
        let sphere = Sphere::new(Point3::new(1.0, 2.0, 3.0), 2.5, 0, None);
        let (point, normal, jacobian) = sphere.sample_surface(0.3, 0.8);
        let dist = (point - sphere.center).norm();
        assert_ulps_eq!(dist, sphere.radius, max_ulps = 8);
        assert_ulps_eq!(normal.norm(), 1.0, max_ulps = 4);
        assert_ulps_eq!(jacobian, 4.0 * PI * sphere.radius * sphere.radius, max_ulps = 4);
    }

    #[test]
    fn test_pdf_surface_is_zero_on_miss() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -2.0), 1.0, 0, None);
        let ray = Ray {
            origin: Point3::origin(),
            dir: normal!(vector![0.0, 1.0, 0.0]),
        };
        assert_ulps_eq!(sphere.pdf_surface(&ray), 0.0, max_ulps = 1);
    }
}
