use super::*;

/// An emissive primitive. `primitives` indexes into `Scene::primitives`;
/// each listed primitive must carry `area_light == Some(this light's index)`
/// so the integrator can map a hit back to its emitted radiance.
#[derive(Clone, Debug)]
pub struct AreaLight {
    pub radiance: ColorRgb,
    pub primitives: Vec<usize>,
}

impl AreaLight {
    /// Picks one of the light's primitives uniformly and samples a point on
    /// it. Returns `(point, normal, pdf)` where `pdf` is already converted to
    /// a density over the primitive selection, i.e. the caller still needs
    /// to convert the returned surface pdf to solid angle.
    pub fn sample_primitive(&self, scene_primitives: &[Primitive], u1: f32, u2: f32, u3: f32) -> Option<(Point3, Normal, usize)> {
        if self.primitives.is_empty() {
            return None;
        }
        let index = ((u3 * self.primitives.len() as f32) as usize).min(self.primitives.len() - 1);
        let primitive_index = self.primitives[index];
        let primitive = scene_primitives.get(primitive_index)?;
        let (point, normal, _jacobian) = primitive.sample_surface(u1, u2);
        Some((point, normal, primitive_index))
    }
}

/// A non-area, delta-position light with no surface to hit directly; rays
/// never intersect it, so it contributes only through explicit sampling.
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub position: Point3,
    pub intensity: ColorRgb,
}

impl PointLight {
    /// Radiance arriving at `hit_point` from this light, ignoring occlusion.
    /// Follows the inverse-square falloff used by the reference renderer's
    /// point-light direct-lighting term.
    pub fn incident_radiance(&self, hit_point: &Point3) -> (ColorRgb, Normal, f32) {
        let to_light = self.position - hit_point;
        let distance2 = to_light.norm_squared().max(1e-8);
        let direction = normal!(to_light);
        let radiance = self.intensity * (1.0 / distance2);
        (radiance, direction, distance2.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_falloff_is_inverse_square() {
        let light = PointLight {
            position: Point3::new(0.0, 2.0, 0.0),
            intensity: ColorRgb::new(4.0, 4.0, 4.0),
        };
        let (radiance, direction, distance) = light.incident_radiance(&Point3::origin());
        assert!((distance - 2.0).abs() < 1e-5);
        assert!((radiance.red() - 1.0).abs() < 1e-5);
        assert!(direction.y > 0.0);
    }

    #[test]
    fn test_area_light_sample_picks_one_of_its_primitives() {
        let sphere = Primitive::Sphere(Sphere::new(Point3::origin(), 1.0, 0, Some(0)));
        let light = AreaLight {
            radiance: ColorRgb::WHITE,
            primitives: vec![0],
        };
        let sample = light.sample_primitive(std::slice::from_ref(&sphere), 0.3, 0.4, 0.0);
        assert!(sample.is_some());
        assert_eq!(sample.unwrap().2, 0);
    }

    #[test]
    fn test_area_light_with_no_primitives_returns_none() {
        let light = AreaLight {
            radiance: ColorRgb::WHITE,
            primitives: vec![],
        };
        assert!(light.sample_primitive(&[], 0.0, 0.0, 0.0).is_none());
    }
}
