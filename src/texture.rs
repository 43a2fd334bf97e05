use super::*;

/// A decoded image. Decoding itself is out of scope here; callers hand in
/// already-resolved pixel data (row-major, origin at the top-left).
#[derive(Clone, Debug)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<ColorRgb>,
}

impl Image {
    pub fn new(width: u32, height: u32, pixels: Vec<ColorRgb>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize, "pixel buffer size mismatch");
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn texel(&self, x: u32, y: u32) -> ColorRgb {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Bilinear fetch with wrap-around addressing and per-material
    /// scale/offset applied to the incoming `(u, v)`.
    pub fn sample(&self, u: f32, v: f32, uscale: f32, vscale: f32, uoffset: f32, voffset: f32) -> ColorRgb {
        let wrap01 = |x: f32| x.rem_euclid(1.0);

        let su = wrap01(uscale * u + uoffset);
        let sv = wrap01(vscale * v + voffset);

        let rx = self.width as f32 * su;
        let ry = self.height as f32 * sv;

        let x0 = rx.floor() as i64;
        let y0 = ry.floor() as i64;
        let fx = rx - x0 as f32;
        let fy = ry - y0 as f32;

        let wrap = |v: i64, dim: u32| v.rem_euclid(dim as i64) as u32;
        let x0 = wrap(x0, self.width);
        let y0 = wrap(y0, self.height);
        let x1 = wrap(x0 as i64 + 1, self.width);
        let y1 = wrap(y0 as i64 + 1, self.height);

        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x1, y0);
        let c01 = self.texel(x0, y1);
        let c11 = self.texel(x1, y1);

        let top = lerp_color(&c00, &c10, fx);
        let bottom = lerp_color(&c01, &c11, fx);
        lerp_color(&top, &bottom, fy)
    }
}

/// A material's albedo input: either a constant colour or a sampled image
/// with per-use wrap/scale/offset parameters.
#[derive(Clone, Debug)]
pub enum Albedo {
    Flat(ColorRgb),
    Image {
        texture: usize,
        uscale: f32,
        vscale: f32,
        uoffset: f32,
        voffset: f32,
    },
}

impl Albedo {
    pub fn flat(color: ColorRgb) -> Self {
        Self::Flat(color)
    }

    /// Resolves the albedo at a hit's `(u, v)`, looking up `textures` (the
    /// Scene's path-keyed image cache) when this is an image albedo. A
    /// missing texture index falls back to flat white, matching the "missing
    /// texture is treated as flat colour at runtime" contract.
    pub fn sample(&self, u: f32, v: f32, textures: &[Image]) -> ColorRgb {
        match self {
            Self::Flat(color) => *color,
            Self::Image {
                texture,
                uscale,
                vscale,
                uoffset,
                voffset,
            } => match textures.get(*texture) {
                Some(image) => image.sample(u, v, *uscale, *vscale, *uoffset, *voffset),
                None => ColorRgb::WHITE,
            },
        }
    }
}
