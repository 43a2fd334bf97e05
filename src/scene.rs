use super::*;

/// Describes one sphere primitive for scene construction, before it is
/// resolved into an index-bearing [`Sphere`].
#[derive(Clone, Debug)]
pub struct SphereDesc {
    pub center: Point3,
    pub radius: f32,
    pub material: usize,
}

/// Describes one triangle primitive, vertex attributes already resolved.
#[derive(Clone, Debug)]
pub struct TriangleDesc {
    pub positions: [Point3; 3],
    pub tex_coords: [Point2; 3],
    pub normals: [Normal; 3],
    pub material: usize,
}

/// Describes one material. `eta` is only meaningful for `Plastic`; `exponent`
/// only for `Phong`/`BlinnPhong`/`Microfacet`.
#[derive(Clone, Debug)]
pub enum MaterialDesc {
    Lambert { albedo: Albedo },
    Mirror { albedo: Albedo },
    Plastic { albedo: Albedo, eta: f32 },
    Phong { albedo: Albedo, exponent: f32 },
    BlinnPhong { albedo: Albedo, exponent: f32 },
    Microfacet { albedo: Albedo, exponent: f32 },
}

impl MaterialDesc {
    fn build(&self) -> Material {
        match self.clone() {
            Self::Lambert { albedo } => Material::Lambert { albedo },
            Self::Mirror { albedo } => Material::Mirror { albedo },
            Self::Plastic { albedo, eta } => Material::Plastic { albedo, eta },
            Self::Phong { albedo, exponent } => Material::Phong { albedo, exponent },
            Self::BlinnPhong { albedo, exponent } => Material::BlinnPhong { albedo, exponent },
            Self::Microfacet { albedo, exponent } => Material::Microfacet { albedo, exponent },
        }
    }
}

/// An emissive group: a radiance value and the indices (into `spheres` and
/// `triangles`, concatenated in that order as they'll appear in the final
/// primitive list) of the shapes that emit it.
#[derive(Clone, Debug)]
pub struct AreaLightDesc {
    pub radiance: ColorRgb,
    pub primitive_indices: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct SceneDescription {
    pub spheres: Vec<SphereDesc>,
    pub triangles: Vec<TriangleDesc>,
    pub materials: Vec<MaterialDesc>,
    pub area_lights: Vec<AreaLightDesc>,
    pub point_lights: Vec<PointLight>,
    pub textures: Vec<Image>,
}

/// An assembled, renderable scene: camera, BVH-accelerated primitives,
/// materials, lights, and the texture cache they sample from.
pub struct Scene {
    pub camera: Camera,
    bvh: Bvh,
    materials: Vec<Material>,
    area_lights: Vec<AreaLight>,
    point_lights: Vec<PointLight>,
    textures: Vec<Image>,
}

impl Scene {
    /// Validates `description` (material indices in range, area-light
    /// back-references in range) and builds the BVH over its primitives.
    pub fn build(camera: Camera, description: SceneDescription) -> Result<Self> {
        let material_count = description.materials.len();

        let mut primitives = Vec::with_capacity(description.spheres.len() + description.triangles.len());

        for (index, sphere) in description.spheres.iter().enumerate() {
            ensure!(
                sphere.material < material_count,
                "sphere {index} references material {}, but only {material_count} materials exist",
                sphere.material
            );
            primitives.push(Primitive::Sphere(Sphere::new(sphere.center, sphere.radius, sphere.material, None)));
        }

        for (index, triangle) in description.triangles.iter().enumerate() {
            ensure!(
                triangle.material < material_count,
                "triangle {index} references material {}, but only {material_count} materials exist",
                triangle.material
            );
            primitives.push(Primitive::Triangle(Triangle::new(
                triangle.positions,
                triangle.normals,
                triangle.tex_coords,
                triangle.material,
                None,
            )));
        }

        let primitive_count = primitives.len();
        for (light_index, light) in description.area_lights.iter().enumerate() {
            for &primitive_index in &light.primitive_indices {
                ensure!(
                    primitive_index < primitive_count,
                    "area light {light_index} references primitive {primitive_index}, but only {primitive_count} primitives exist"
                );
            }
        }

        for (light_index, light) in description.area_lights.iter().enumerate() {
            for &primitive_index in &light.primitive_indices {
                match &mut primitives[primitive_index] {
                    Primitive::Sphere(s) => s.area_light = Some(light_index),
                    Primitive::Triangle(t) => t.area_light = Some(light_index),
                }
            }
        }

        let materials = description.materials.iter().map(MaterialDesc::build).collect();

        log::info!(
            "building scene: {} primitives, {} materials, {} area lights, {} point lights",
            primitives.len(),
            materials.len(),
            description.area_lights.len(),
            description.point_lights.len()
        );

        // The BVH build reorders `primitives`, so a light's member list can't be
        // carried over as the pre-build indices it was given. Each primitive
        // already carries its own back-reference (set above, and preserved
        // through reordering since it travels with the primitive value), so
        // re-derive each light's member list by scanning the post-build order.
        let bvh = Bvh::build(primitives);
        let mut area_lights: Vec<AreaLight> = description
            .area_lights
            .iter()
            .map(|l| AreaLight {
                radiance: l.radiance,
                primitives: Vec::new(),
            })
            .collect();
        for (index, primitive) in bvh.primitives().iter().enumerate() {
            if let Some(light_index) = primitive.area_light() {
                area_lights[light_index].primitives.push(index);
            }
        }

        Ok(Self {
            camera,
            bvh,
            materials,
            area_lights,
            point_lights: description.point_lights,
            textures: description.textures,
        })
    }

    pub fn intersect(&self, ray: &Ray, t_min: f32, t_max: f32) -> RayHit {
        self.bvh.intersect(ray, t_min, t_max)
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bvh.bounds()
    }

    pub fn primitives(&self) -> &[Primitive] {
        self.bvh.primitives()
    }

    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    pub fn area_light(&self, index: usize) -> &AreaLight {
        &self.area_lights[index]
    }

    pub fn area_lights(&self) -> &[AreaLight] {
        &self.area_lights
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    pub fn textures(&self) -> &[Image] {
        &self.textures
    }
}
