use super::*;

pub const TILE_SIZE: u32 = 16;

/// Linear-space RGB framebuffer, row-major, origin at the top-left.
#[derive(Clone, Debug)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<ColorRgb>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![ColorRgb::BLACK; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[ColorRgb] {
        &self.pixels
    }

    fn set(&mut self, x: u32, y: u32, color: ColorRgb) {
        self.pixels[(y * self.width + x) as usize] = color;
    }
}

/// Renders `scene` into a fresh [`Framebuffer`], dispatching `16x16` tiles
/// across a `rayon` thread pool. Each tile seeds its own PCG-32 stream from
/// `tile_y * tiles_x + tile_x`, so the result is identical across thread
/// counts and dispatch order. `on_tile_done` is called once per completed
/// tile, on whichever worker finished it, for external progress reporting.
pub fn render(scene: &Scene, params: &Params, width: u32, height: u32, on_tile_done: impl Fn() + Sync) -> Framebuffer {
    let tiles_x = (width + TILE_SIZE - 1) / TILE_SIZE;
    let tiles_y = (height + TILE_SIZE - 1) / TILE_SIZE;

    let mut framebuffer = Framebuffer::new(width, height);
    let tile_rows: Vec<(u32, Vec<ColorRgb>)> = (0..tiles_y)
        .flat_map(|tile_y| (0..tiles_x).map(move |tile_x| (tile_x, tile_y)))
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(tile_x, tile_y)| {
            let pixels = render_tile(scene, params, width, height, tile_x, tile_y);
            on_tile_done();
            (tile_y * tiles_x + tile_x, pixels)
        })
        .collect();

    for (tile_index, pixels) in tile_rows {
        let tile_x = tile_index % tiles_x;
        let tile_y = tile_index / tiles_x;
        let x0 = tile_x * TILE_SIZE;
        let y0 = tile_y * TILE_SIZE;
        let x1 = (x0 + TILE_SIZE).min(width);
        let y1 = (y0 + TILE_SIZE).min(height);

        let mut cursor = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                framebuffer.set(x, y, pixels[cursor]);
                cursor += 1;
            }
        }
    }

    framebuffer
}

/// Renders one tile's pixels, row-major, into a flat `Vec` the caller
/// scatters back into the framebuffer.
fn render_tile(scene: &Scene, params: &Params, width: u32, height: u32, tile_x: u32, tile_y: u32) -> Vec<ColorRgb> {
    let tiles_x = (width + TILE_SIZE - 1) / TILE_SIZE;
    let seed = (tile_y * tiles_x + tile_x) as u64;
    let mut rng = UniformSampler::new_for_tile(seed);

    let x0 = tile_x * TILE_SIZE;
    let y0 = tile_y * TILE_SIZE;
    let x1 = (x0 + TILE_SIZE).min(width);
    let y1 = (y0 + TILE_SIZE).min(height);

    let mut pixels = Vec::with_capacity(((x1 - x0) * (y1 - y0)) as usize);
    for y in y0..y1 {
        for x in x0..x1 {
            pixels.push(render_pixel(scene, params, &mut rng, x, y));
        }
    }
    pixels
}

fn render_pixel(scene: &Scene, params: &Params, rng: &mut UniformSampler, x: u32, y: u32) -> ColorRgb {
    if params.spp == 1 {
        let ray = scene.camera.screen_to_world_ray(x as f32 + 0.5, y as f32 + 0.5);
        return radiance(&ray, scene, rng, params, params.max_depth).clamp_finite(1e6);
    }

    let mut sum = ColorRgb::BLACK;
    for _ in 0..params.spp {
        let (jitter_x, jitter_y) = rng.sample2();
        let ray = scene.camera.screen_to_world_ray(x as f32 + jitter_x, y as f32 + jitter_y);
        sum += radiance(&ray, scene, rng, params, params.max_depth).clamp_finite(1e6);
    }
    sum * (1.0 / params.spp as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_sphere_scene() -> Scene {
        let camera = CameraBuilder::new(64, 64).look_at(Point3::new(0.0, 0.0, -1.0)).build();
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
    fn test_render_fills_every_pixel() {
        let scene = single_sphere_scene();
        let params = Params {
            mode: RenderMode::Normal,
            spp: 1,
            ..Default::default()
        };
        let counter = std::sync::atomic::AtomicUsize::new(0);
        let framebuffer = render(&scene, &params, 64, 64, || {
            counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        });
        assert_eq!(framebuffer.pixels().len(), 64 * 64);
        let tiles_x = (64u32 + TILE_SIZE - 1) / TILE_SIZE;
        let tiles_y = (64u32 + TILE_SIZE - 1) / TILE_SIZE;
        assert_eq!(counter.load(std::sync::atomic::Ordering::Relaxed), (tiles_x * tiles_y) as usize);
    }

    #[test]
    fn test_deterministic_across_repeated_renders() {
        let scene = single_sphere_scene();
        let params = Params {
            mode: RenderMode::MatteReflect,
            spp: 4,
            max_depth: 3,
            ..Default::default()
        };
        let a = render(&scene, &params, 32, 32, || {});
        let b = render(&scene, &params, 32, 32, || {});
        for (pa, pb) in a.pixels().iter().zip(b.pixels()) {
            assert_eq!(pa, pb);
        }
    }
}
