#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(clippy::pedantic)]
#![allow(
    clippy::case_sensitive_file_extension_comparisons,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::collapsible_if,
    clippy::let_underscore_untyped,
    clippy::many_single_char_names,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::struct_excessive_bools,
    clippy::too_many_arguments,
    clippy::too_many_lines,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

use anyhow::{ensure, Result};
use bytemuck::{Pod, Zeroable};
use nalgebra as na;
use rand::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use approx::{assert_abs_diff_eq, assert_ulps_eq};

mod aabb;
mod bvh;
mod bxdfs;
mod camera;
mod integrator;
mod light;
mod material;
mod math;
mod primitive;
mod ray;
mod render;
mod sampling;
mod scene;
mod texture;

use aabb::BoundingBox;
use bvh::Bvh;
use bxdfs::{BlinnPhong, Bxdf, Lambertian, LocalVector, Microfacet, Phong};
use math::*;
use primitive::Primitive;
use ray::{Ray, RayHit};
use sampling::{HemisphereSampler, OrthonormalBasis, UniformSampler};

pub use camera::{Camera, CameraBuilder};
pub use integrator::{radiance, Params, RenderMode};
pub use light::{AreaLight, PointLight};
pub use material::{Material, Scatter};
pub use primitive::{Sphere, Triangle};
pub use render::{render, Framebuffer};
pub use scene::{AreaLightDesc, MaterialDesc, Scene, SceneDescription, SphereDesc, TriangleDesc};
pub use texture::{Albedo, Image};

const PI: f32 = std::f32::consts::PI;
const TAU: f32 = std::f32::consts::TAU;
const INV_PI: f32 = std::f32::consts::FRAC_1_PI;
