use super::*;

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    look_from: Point3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    vp_width: f32,
    vp_height: f32,
    image_width: u32,
    image_height: u32,
}

impl Camera {
    pub fn new(
        look_from: Point3,
        look_at: Point3,
        up: Vec3,
        vertical_fov_degrees: f32,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let w = (look_from - look_at).normalize();
        let u = up.cross(&w).normalize();
        let v = w.cross(&u);

        let theta = vertical_fov_degrees.to_radians();
        let vp_height = 2.0 * (theta / 2.0).tan();
        let aspect = image_width as f32 / image_height as f32;
        let vp_width = aspect * vp_height;

        Self {
            look_from,
            u,
            v,
            w,
            vp_width,
            vp_height,
            image_width,
            image_height,
        }
    }

    pub fn look_from(&self) -> Point3 {
        self.look_from
    }

    /// Maps a continuous pixel position `(x, y)` (e.g. `pixel + 0.5` for the
    /// center, or `pixel + jitter` for a stratified sample) into a world-
    /// space ray through that point.
    pub fn screen_to_world_ray(&self, x: f32, y: f32) -> Ray {
        let ndc_x = x / self.image_width as f32;
        let ndc_y = y / self.image_height as f32;

        let px = (2.0 * ndc_x - 1.0) * (self.vp_width / 2.0);
        let py = (2.0 * ndc_y - 1.0) * (self.vp_height / 2.0);

        let local_dir = vector![px, -py, -1.0].normalize();
        let world_dir = local_dir.x * self.u + local_dir.y * self.v + local_dir.z * self.w;

        Ray {
            origin: self.look_from,
            dir: normal!(world_dir),
        }
    }
}

/// Fluent builder kept for test-scene convenience; scene parsing itself is
/// out of scope.
pub struct CameraBuilder {
    look_from: Point3,
    look_at: Point3,
    up: Vec3,
    vertical_fov_degrees: f32,
    image_width: u32,
    image_height: u32,
}

impl CameraBuilder {
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            look_from: Point3::origin(),
            look_at: Point3::new(0.0, 0.0, -1.0),
            up: Y_AXIS,
            vertical_fov_degrees: 90.0,
            image_width,
            image_height,
        }
    }

    pub fn look_from(mut self, look_from: Point3) -> Self {
        self.look_from = look_from;
        self
    }

    pub fn look_at(mut self, look_at: Point3) -> Self {
        self.look_at = look_at;
        self
    }

    pub fn up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    pub fn vertical_fov_degrees(mut self, vertical_fov_degrees: f32) -> Self {
        self.vertical_fov_degrees = vertical_fov_degrees;
        self
    }

    pub fn build(self) -> Camera {
        Camera::new(
            self.look_from,
            self.look_at,
            self.up,
            self.vertical_fov_degrees,
            self.image_width,
            self.image_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    #[test]
    fn test_center_ray_points_down_look_axis() {
        let camera = CameraBuilder::new(640, 480)
            .look_from(Point3::origin())
            .look_at(Point3::new(0.0, 0.0, -1.0))
            .up(Y_AXIS)
            .vertical_fov_degrees(90.0)
            .build();

        let ray = camera.screen_to_world_ray(320.0, 240.0);
        assert_ulps_eq!(ray.dir.x, 0.0, max_ulps = 8);
        assert_ulps_eq!(ray.dir.y, 0.0, max_ulps = 8);
        assert!(ray.dir.z < 0.0);
    }
}
