use super::*;

/// Visualisation / path-tracing mode, selected per render.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RenderMode {
    /// Visualise shading normals as `(n + 1) / 2`.
    Normal,
    /// Flat red on any hit.
    Object,
    /// Material's flat albedo only, ignoring lighting.
    Flat,
    /// Direct lighting from point lights with shadow rays.
    Lambert,
    /// Full path tracing with MIS between BSDF and area-light sampling.
    MatteReflect,
    /// Triangles coloured by barycentric weights; non-triangles flat grey.
    Barycentric,
    /// White on any bounding-box hit, skipping the primitive test.
    Aabb,
}

#[derive(Clone, Copy, Debug)]
pub struct Params {
    pub mode: RenderMode,
    pub spp: u32,
    pub max_depth: u32,
    pub background: ColorRgb,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            mode: RenderMode::MatteReflect,
            spp: 16,
            max_depth: 5,
            background: ColorRgb::BLACK,
        }
    }
}

/// Recursive MIS radiance estimator. `depth` counts remaining bounces;
/// hits `0` at the end of the budget.
pub fn radiance(ray: &Ray, scene: &Scene, rng: &mut UniformSampler, params: &Params, depth: u32) -> ColorRgb {
    if depth == 0 {
        return ColorRgb::BLACK;
    }

    let hit = scene.intersect(ray, 1e-4, f32::MAX);
    if !hit.hit {
        return params.background;
    }

    match params.mode {
        RenderMode::Normal => {
            let n = hit.normal.into_inner();
            ColorRgb::new((n.x + 1.0) * 0.5, (n.y + 1.0) * 0.5, (n.z + 1.0) * 0.5)
        }
        RenderMode::Object => ColorRgb::new(1.0, 0.0, 0.0),
        RenderMode::Flat => {
            let material = scene.material(scene.primitives()[hit.primitive_index].material());
            flat_albedo(material, &hit, scene.textures())
        }
        RenderMode::Lambert => lambert_direct(ray, &hit, scene),
        RenderMode::Barycentric => barycentric_color(&scene.primitives()[hit.primitive_index], ray),
        RenderMode::Aabb => {
            if scene.bounds().intersect(ray, 1e-4, f32::MAX) {
                ColorRgb::WHITE
            } else {
                params.background
            }
        }
        RenderMode::MatteReflect => matte_reflect(ray, &hit, scene, rng, params, depth),
    }
}

fn flat_albedo(material: &Material, hit: &RayHit, textures: &[Image]) -> ColorRgb {
    match material {
        Material::Lambert { albedo }
        | Material::Mirror { albedo }
        | Material::Plastic { albedo, .. }
        | Material::Phong { albedo, .. }
        | Material::BlinnPhong { albedo, .. }
        | Material::Microfacet { albedo, .. } => albedo.sample(hit.u, hit.v, textures),
    }
}

fn barycentric_color(primitive: &Primitive, ray: &Ray) -> ColorRgb {
    match primitive {
        Primitive::Triangle(triangle) => {
            let hit = triangle.intersect(ray, 1e-4, f32::MAX);
            if !hit.hit {
                return ColorRgb::new(0.5, 0.5, 0.5);
            }
            // Re-derive the barycentric weights the same way `intersect` does,
            // from the stored uv (which carries `(1-u-v, u, v)` via the
            // interpolated tex-coord only for triangles with identity uvs);
            // recompute directly from the geometric construction instead.
            let [v0, v1, v2] = triangle_positions(triangle);
            let p = ray.at(hit.t);
            let (b0, b1, b2) = barycentric_weights(&p, &v0, &v1, &v2);
            ColorRgb::new(b0, b1, b2)
        }
        Primitive::Sphere(_) => ColorRgb::new(0.5, 0.5, 0.5),
    }
}

fn triangle_positions(triangle: &Triangle) -> [Point3; 3] {
    triangle.positions
}

fn barycentric_weights(p: &Point3, v0: &Point3, v1: &Point3, v2: &Point3) -> (f32, f32, f32) {
    let e0 = v1 - v0;
    let e1 = v2 - v0;
    let e2 = p - v0;
    let d00 = e0.dot(&e0);
    let d01 = e0.dot(&e1);
    let d11 = e1.dot(&e1);
    let d20 = e2.dot(&e0);
    let d21 = e2.dot(&e1);
    let denom = (d00 * d11 - d01 * d01).max(1e-12);
    let b1 = (d11 * d20 - d01 * d21) / denom;
    let b2 = (d00 * d21 - d01 * d20) / denom;
    let b0 = 1.0 - b1 - b2;
    (b0, b1, b2)
}

/// Point-light-only direct lighting with shadow rays, used by LAMBERT mode.
fn lambert_direct(ray: &Ray, hit: &RayHit, scene: &Scene) -> ColorRgb {
    let hit_point = ray.at(hit.t);
    let material = scene.material(scene.primitives()[hit.primitive_index].material());
    let albedo = flat_albedo(material, hit, scene.textures());

    let mut color = ColorRgb::BLACK;
    for light in scene.point_lights() {
        let (radiance, light_dir, distance) = light.incident_radiance(&hit_point);
        let cos_theta = light_dir.dot(&hit.normal).max(0.0);
        if cos_theta <= 0.0 {
            continue;
        }

        let shadow_ray = Ray::offset(hit_point, light_dir);
        let shadow_hit = scene.intersect(&shadow_ray, 1e-4, distance - 1e-3);
        if shadow_hit.hit {
            continue;
        }

        color += albedo * INV_PI * cos_theta * radiance;
    }
    color
}

/// Front-facing emission, if `hit` landed on an area light's primitive.
fn emitted_radiance(ray: &Ray, hit: &RayHit, primitive: &Primitive, scene: &Scene) -> ColorRgb {
    match primitive.area_light() {
        Some(light_index) if !hit.backface => {
            let _ = ray;
            scene.area_light(light_index).radiance
        }
        _ => ColorRgb::BLACK,
    }
}

fn matte_reflect(ray: &Ray, hit: &RayHit, scene: &Scene, rng: &mut UniformSampler, params: &Params, depth: u32) -> ColorRgb {
    let primitive = &scene.primitives()[hit.primitive_index];
    let emitted = emitted_radiance(ray, hit, primitive, scene);
    if emitted.red() > 0.0 || emitted.green() > 0.0 || emitted.blue() > 0.0 {
        return emitted;
    }

    let material = scene.material(primitive.material());
    if material.is_delta() {
        return shade_delta(ray, hit, material, scene, rng, params, depth);
    }

    shade_mis(ray, hit, material, scene, rng, params, depth)
}

fn shade_delta(ray: &Ray, hit: &RayHit, material: &Material, scene: &Scene, rng: &mut UniformSampler, params: &Params, depth: u32) -> ColorRgb {
    let hit_point = ray.at(hit.t);
    match material.sample(&ray.dir, hit, rng, scene.textures()) {
        Some(Scatter::Delta { direction, weight }) => {
            let scattered = Ray::offset(hit_point, direction);
            weight * radiance(&scattered, scene, rng, params, depth - 1)
        }
        _ => ColorRgb::BLACK,
    }
}

/// With probability 1/2 (or always, absent area lights) samples the BSDF;
/// otherwise samples a uniformly chosen area-light primitive. Combines both
/// strategies with the balance heuristic at equal weights.
fn shade_mis(ray: &Ray, hit: &RayHit, material: &Material, scene: &Scene, rng: &mut UniformSampler, params: &Params, depth: u32) -> ColorRgb {
    let hit_point = ray.at(hit.t);
    let area_lights = scene.area_lights();

    let sample_bsdf = area_lights.is_empty() || rng.sample() < 0.5;

    let (direction, pdf_bsdf) = if sample_bsdf {
        match material.sample(&ray.dir, hit, rng, scene.textures()) {
            Some(Scatter::Smooth { direction, pdf, .. }) => (direction, pdf),
            _ => return ColorRgb::BLACK,
        }
    } else {
        match sample_area_light(&hit_point, scene, rng) {
            Some((direction, _light_index)) => {
                let pdf = material.pdf(&ray.dir, hit, &direction);
                (direction, pdf)
            }
            None => return ColorRgb::BLACK,
        }
    };

    if pdf_bsdf <= 0.0 {
        return ColorRgb::BLACK;
    }

    let pdf_light = if area_lights.is_empty() {
        0.0
    } else {
        area_light_pdf(&hit_point, &direction, scene)
    };

    let pdf = if area_lights.is_empty() {
        pdf_bsdf
    } else {
        0.5 * pdf_bsdf + 0.5 * pdf_light
    };
    if pdf <= 0.0 {
        return ColorRgb::BLACK;
    }

    let cos_theta = direction.dot(&hit.normal).max(0.0);
    if cos_theta <= 0.0 {
        return ColorRgb::BLACK;
    }

    let brdf = material.brdf_scalar(&ray.dir, hit, &direction, scene.textures());
    let scattered = Ray::offset(hit_point, direction);
    let incoming = radiance(&scattered, scene, rng, params, depth - 1);

    brdf * cos_theta * incoming * (1.0 / pdf)
}

fn sample_area_light(hit_point: &Point3, scene: &Scene, rng: &mut UniformSampler) -> Option<(Normal, usize)> {
    let lights = scene.area_lights();
    if lights.is_empty() {
        return None;
    }
    let light_index = ((rng.sample() * lights.len() as f32) as usize).min(lights.len() - 1);
    let light = &lights[light_index];
    let (point, _normal, _primitive_index) = light.sample_primitive(scene.primitives(), rng.sample(), rng.sample(), rng.sample())?;
    let to_light = point - hit_point;
    Some((normal!(to_light), light_index))
}

/// Solid-angle pdf of having sampled `direction` from `hit_point` via the
/// uniform-light-then-uniform-primitive-then-uniform-surface-point scheme.
fn area_light_pdf(hit_point: &Point3, direction: &Normal, scene: &Scene) -> f32 {
    let lights = scene.area_lights();
    if lights.is_empty() {
        return 0.0;
    }
    let ray = Ray {
        origin: *hit_point,
        dir: *direction,
    };
    let mut pdf_sum = 0.0;
    for light in lights {
        if light.primitives.is_empty() {
            continue;
        }
        let prob_light = 1.0 / lights.len() as f32;
        let prob_primitive = 1.0 / light.primitives.len() as f32;
        for &primitive_index in &light.primitives {
            let primitive = &scene.primitives()[primitive_index];
            let pdf_surface = primitive.pdf_surface(&ray);
            pdf_sum += prob_light * prob_primitive * pdf_surface;
        }
    }
    pdf_sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_sphere_scene() -> Scene {
        let camera = CameraBuilder::new(640, 480).look_at(Point3::new(0.0, 0.0, -1.0)).build();
        let description = SceneDescription {
            spheres: vec![SphereDesc {
                center: Point3::new(0.0, 0.0, -2.0),
                radius: 1.0,
                material: 0,
            }],
            materials: vec![MaterialDesc::Lambert {
                albedo: Albedo::flat(ColorRgb::new(0.8, 0.2, 0.2)),
            }],
            ..Default::default()
        };
        Scene::build(camera, description).unwrap()
    }

    #[test]
    fn test_normal_mode_center_pixel_matches_scenario_one() {
        let scene = single_sphere_scene();
        let ray = scene.camera.screen_to_world_ray(320.0, 240.0);
        let params = Params {
            mode: RenderMode::Normal,
            ..Default::default()
        };
        let mut rng = UniformSampler::new_for_tile(0);
        let color = radiance(&ray, &scene, &mut rng, &params, 1);
        assert!((color.red() - 0.5).abs() < 1e-3);
        assert!((color.green() - 0.5).abs() < 1e-3);
        assert!((color.blue() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_depth_zero_is_black() {
        let scene = single_sphere_scene();
        let ray = scene.camera.screen_to_world_ray(320.0, 240.0);
        let params = Params::default();
        let mut rng = UniformSampler::new_for_tile(0);
        let color = radiance(&ray, &scene, &mut rng, &params, 0);
        assert_eq!(color, ColorRgb::BLACK);
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = single_sphere_scene();
        let ray = Ray {
            origin: Point3::origin(),
            dir: normal!(vector![0.0, 1.0, 0.0]),
        };
        let params = Params {
            background: ColorRgb::new(0.1, 0.2, 0.3),
            ..Default::default()
        };
        let mut rng = UniformSampler::new_for_tile(0);
        let color = radiance(&ray, &scene, &mut rng, &params, 4);
        assert_eq!(color, params.background);
    }

    #[test]
    fn test_front_facing_emitter_returns_its_radiance_directly() {
        let camera = CameraBuilder::new(64, 64).build();
        let description = SceneDescription {
            spheres: vec![SphereDesc {
                center: Point3::new(0.0, 0.0, -2.0),
                radius: 1.0,
                material: 0,
            }],
            materials: vec![MaterialDesc::Lambert {
                albedo: Albedo::flat(ColorRgb::WHITE),
            }],
            area_lights: vec![AreaLightDesc {
                radiance: ColorRgb::new(3.0, 3.0, 3.0),
                primitive_indices: vec![0],
            }],
            ..Default::default()
        };
        let scene = Scene::build(camera, description).unwrap();
        let ray = Ray {
            origin: Point3::origin(),
            dir: normal!(vector![0.0, 0.0, -1.0]),
        };
        let params = Params {
            mode: RenderMode::MatteReflect,
            max_depth: 4,
            ..Default::default()
        };
        let mut rng = UniformSampler::new_for_tile(0);
        let color = radiance(&ray, &scene, &mut rng, &params, 4);
        assert_eq!(color, ColorRgb::new(3.0, 3.0, 3.0));
    }
}
