pub mod color;
pub mod config;
pub mod hit;
pub mod material;
pub mod ray;
pub mod screen;
pub mod shape;
pub mod trace;
pub mod vec3;

pub use color::Color;
pub use hit::{Hit, HitList, Hittable};
pub use material::{Material, Scatter};
pub use ray::Ray;
pub use screen::{Camera, Screen};
pub use vec3::Vec3;

/// The rng used throughout the crate. Always passed explicitly so renders
/// are reproducible per seed.
pub type CrateRng = rand::rngs::SmallRng;
