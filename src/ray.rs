use crate::Vec3;

/// A half-line `origin + t * dir`, for `t >= 0`.
#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}
impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// The point along the ray at time `t`.
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + t * self.dir
    }
}
