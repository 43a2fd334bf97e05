use super::*;

/// Per-tile uniform sampler. Constructed as `Pcg32::new(1, tile_seed)`,
/// mirroring the reference PCG-32 initialization (fixed initial state,
/// stream selected by the tile's seed) so that renders are reproducible
/// across thread counts.
#[derive(Clone)]
pub struct UniformSampler {
    state: rand_pcg::Pcg32,
    distribution: rand::distributions::Uniform<f32>,
}

impl UniformSampler {
    pub fn new_for_tile(tile_seed: u64) -> Self {
        Self {
            state: rand_pcg::Pcg32::new(1, tile_seed),
            distribution: rand::distributions::Uniform::new_inclusive(0.0, 1.0),
        }
    }

    pub fn sample(&mut self) -> f32 {
        self.distribution.sample(&mut self.state)
    }

    pub fn sample2(&mut self) -> (f32, f32) {
        (self.sample(), self.sample())
    }
}

#[derive(Clone, Copy)]
pub struct OrthonormalBasis {
    world_from_local: Mat3,
    local_from_world: Mat3,
}

impl OrthonormalBasis {
    pub fn new(n: &Normal) -> Self {
        // Implementation based on "Building an Orthonormal Basis, Revisited".
        // https://graphics.pixar.com/library/OrthonormalB/paper.pdf
        let sign = f32::copysign(1.0, n.z);
        let a = -1.0 / (sign + n.z);
        let b = n.x * n.y * a;
        let t = normal!(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
        let b = normal!(b, sign + n.y * n.y * a, -n.y);

        let world_from_local = Mat3::from_columns(&[t.into_inner(), n.into_inner(), b.into_inner()]);
        let local_from_world = world_from_local.transpose();
        Self {
            world_from_local,
            local_from_world,
        }
    }

    pub fn world_from_local(&self) -> &Mat3 {
        &self.world_from_local
    }

    pub fn local_from_world(&self) -> &Mat3 {
        &self.local_from_world
    }

    pub fn to_world(&self, v: &Vec3) -> Vec3 {
        self.world_from_local * v
    }

    pub fn to_local(&self, v: &Vec3) -> Vec3 {
        self.local_from_world * v
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HemisphereSampler {
    Uniform,
    Cosine,
}

impl HemisphereSampler {
    pub fn sample(self, s: f32, t: f32) -> Normal {
        let dir = match self {
            HemisphereSampler::Uniform => hemisphere_uniform(s, t),
            HemisphereSampler::Cosine => hemisphere_cosine(s, t),
        };
        normal!(dir)
    }

    pub fn pdf(self, cos_theta: f32) -> f32 {
        match self {
            HemisphereSampler::Uniform => hemisphere_uniform_pdf(),
            HemisphereSampler::Cosine => hemisphere_cosine_pdf(cos_theta),
        }
    }
}

impl Default for HemisphereSampler {
    fn default() -> Self {
        Self::Cosine
    }
}

fn hemisphere_uniform(s: f32, t: f32) -> Vec3 {
    let u = TAU * s;
    let v = f32::sqrt(f32::max(0.0, 1.0 - t * t));
    let px = v * f32::cos(u);
    let py = t;
    let pz = v * f32::sin(u);
    vector![px, py, pz]
}

fn hemisphere_uniform_pdf() -> f32 {
    1.0 / (2.0 * PI)
}

pub fn concentric_disk(s: f32, t: f32) -> Vec2 {
    let s = 2.0 * s - 1.0;
    let t = 2.0 * t - 1.0;
    if s == 0.0 && t == 0.0 {
        return vector![0.0, 0.0];
    }

    let (r, theta) = if f32::abs(s) > f32::abs(t) {
        (s, (PI / 4.0) * (t / s))
    } else {
        (t, (PI / 2.0) - (PI / 4.0) * (s / t))
    };

    vector![r * f32::cos(theta), r * f32::sin(theta)]
}

fn hemisphere_cosine(s: f32, t: f32) -> Vec3 {
    let d = concentric_disk(s, t);
    let y = f32::sqrt(f32::max(0.0, 1.0 - d.x * d.x - d.y * d.y));
    vector![d.x, y, d.y]
}

fn hemisphere_cosine_pdf(cos_theta: f32) -> f32 {
    cos_theta / PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    #[test]
    fn test_two_tiles_produce_different_streams() {
        let mut a = UniformSampler::new_for_tile(0);
        let mut b = UniformSampler::new_for_tile(1);
        assert_ne!(a.sample(), b.sample());
    }

    #[test]
    fn test_same_tile_seed_is_deterministic() {
        let mut a = UniformSampler::new_for_tile(42);
        let mut b = UniformSampler::new_for_tile(42);
        for _ in 0..8 {
            assert_ulps_eq!(a.sample(), b.sample(), max_ulps = 1);
        }
    }

    #[test]
    fn test_orthonormal_basis_round_trips() {
        let n = normal!(vector![0.0, 1.0, 0.0]);
        let basis = OrthonormalBasis::new(&n);
        let v = vector![0.3, 0.7, -0.2];
        let round_tripped = basis.to_world(&basis.to_local(&v));
        assert_ulps_eq!(round_tripped.x, v.x, max_ulps = 8);
        assert_ulps_eq!(round_tripped.y, v.y, max_ulps = 8);
        assert_ulps_eq!(round_tripped.z, v.z, max_ulps = 8);
    }

    #[test]
    fn test_hemisphere_cosine_pdf_integrates_near_one() {
        // Monte Carlo check that cosine-weighted samples, divided by their
        // own pdf and weighted by cos(theta)/pi, integrate to ~1.
        let n = normal!(Y_AXIS);
        let basis = OrthonormalBasis::new(&n);
        let mut sampler = UniformSampler::new_for_tile(7);
        let mut sum = 0.0;
        const SAMPLES: usize = 20_000;
        for _ in 0..SAMPLES {
            let (s, t) = sampler.sample2();
            let local = HemisphereSampler::Cosine.sample(s, t);
            let cos_theta = local.y;
            let pdf = HemisphereSampler::Cosine.pdf(cos_theta);
            let _world = basis.to_world(&local.into_inner());
            sum += (cos_theta / PI) / pdf;
        }
        let estimate = sum / SAMPLES as f32;
        assert!((estimate - 1.0).abs() < 0.05, "estimate = {estimate}");
    }
}
