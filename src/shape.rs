use std::ops::Range;

use anyhow::{ensure, Result};

use crate::{Hit, Hittable, Material, Ray, Vec3};

#[derive(Debug)]
pub struct Sphere<T> {
    pub center: Vec3,
    pub radius: f64,
    pub material: T,
}
impl<T> Sphere<T> {
    pub fn new(center: Vec3, radius: f64, material: T) -> Self {
        debug_assert!(radius > 0., "Sphere radius must be positive");
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn from(c: [f64; 3], radius: f64, material: T) -> Self {
        Self::new(c.into(), radius, material)
    }

    /// Like [`Sphere::new`], but rejects a non-positive radius instead of
    /// producing a shape that silently renders wrong.
    pub fn checked_new(center: Vec3, radius: f64, material: T) -> Result<Self> {
        ensure!(
            radius > 0.,
            "Sphere radius must be positive, got {}",
            radius
        );
        Ok(Self {
            center,
            radius,
            material,
        })
    }
}
impl<T: Material> Hittable for Sphere<T> {
    fn hit(&self, ray: &Ray, hit_time: &Range<f64>) -> Option<Hit> {
        let oc = ray.origin - self.center;
        let a = ray.dir.norm_squared();
        let half_b = oc.dot(ray.dir);
        let c = oc.norm_squared() - self.radius.powi(2);
        let discriminant = half_b.powi(2) - a * c;

        if discriminant > 0. {
            let root = discriminant.sqrt();
            let hit = |t| {
                let point = ray.at(t);
                let outward_normal = (point - self.center) / self.radius;
                Some(Hit::ray(point, outward_normal, t, ray, &self.material))
            };

            // Prefer the nearer root. This matters when both roots are in
            // range: a ray inside a sphere must report the near wall.
            let t = (-half_b - root) / a;
            if hit_time.contains(&t) {
                return hit(t);
            }

            let t = (-half_b + root) / a;
            if hit_time.contains(&t) {
                return hit(t);
            }
        }

        None
    }
}
