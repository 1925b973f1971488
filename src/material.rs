use std::fmt::Debug;
use std::sync::Arc;

use anyhow::{ensure, Result};
use rand::Rng;

use crate::{Color, CrateRng, Hit, Ray, Vec3};

/// A scattered ray and its color information
pub struct Scatter {
    pub albedo: Color,
    pub ray: Ray,
}
impl Scatter {
    pub fn new(albedo: Color, ray: Ray) -> Self {
        Self { albedo, ray }
    }
}

pub trait Material: Sync + Debug {
    /// A material will either absorb a ray (`None`) or scatter it.
    fn scatter(&self, ray: &Ray, hit: &Hit, rng: &mut CrateRng) -> Option<Scatter>;
}

#[derive(Debug)]
/// Diffuse reflection
pub struct Lambertian {
    pub albedo: Color,
}
impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from(a: [f64; 3]) -> Self {
        Self::new(a.into())
    }
}
impl Material for Lambertian {
    fn scatter(&self, _ray: &Ray, hit: &Hit, rng: &mut CrateRng) -> Option<Scatter> {
        let scatter_dir = hit.normal + Vec3::rand_in_unit_sphere(rng);
        let scattered = Ray::new(hit.point, scatter_dir);
        Some(Scatter::new(self.albedo, scattered))
    }
}

#[derive(Debug)]
pub struct Metal {
    pub albedo: Color,
    /// The fuzziness of the Metal. Is between `0.0` and `1.0`
    pub fuzz: f64,
}
impl Metal {
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        let fuzz = fuzz.max(0.).min(1.);
        Self { albedo, fuzz }
    }

    pub fn from(a: [f64; 3], fuzz: f64) -> Self {
        Self::new(a.into(), fuzz)
    }
}
impl Material for Metal {
    fn scatter(&self, ray: &Ray, hit: &Hit, rng: &mut CrateRng) -> Option<Scatter> {
        let fuzz = self.fuzz * Vec3::rand_in_unit_sphere(rng);
        let reflected = ray.dir.reflect(hit.normal) + fuzz;

        // Fuzzed below the surface: the ray is absorbed.
        if reflected.dot(hit.normal) <= 0. {
            return None;
        }
        Some(Scatter::new(self.albedo, Ray::new(hit.point, reflected)))
    }
}

#[derive(Debug)]
pub struct Dielectric {
    pub ref_index: f64,
}
impl Dielectric {
    pub fn new(ref_index: f64) -> Self {
        debug_assert!(ref_index > 0., "Refractive index must be positive");
        Self { ref_index }
    }

    /// Like [`Dielectric::new`], but rejects a non-positive index instead of
    /// producing glass that silently renders wrong.
    pub fn checked_new(ref_index: f64) -> Result<Self> {
        ensure!(
            ref_index > 0.,
            "Refractive index must be positive, got {}",
            ref_index
        );
        Ok(Self { ref_index })
    }

    /// Schlick's approximation of the Fresnel reflectance.
    pub fn schlick(cos: f64, eta_i_over_eta_t: f64) -> f64 {
        let r0 = (1. - eta_i_over_eta_t) / (1. + eta_i_over_eta_t);
        let r0 = r0 * r0;
        r0 + (1. - r0) * (1. - cos).powi(5)
    }
}
impl Material for Dielectric {
    fn scatter(&self, ray: &Ray, hit: &Hit, rng: &mut CrateRng) -> Option<Scatter> {
        let eta_i_over_eta_t = if hit.front_face {
            1. / self.ref_index
        } else {
            self.ref_index
        };
        let unit_dir = Vec3::normalized(ray.dir);
        let cos_theta = (-unit_dir).dot(hit.normal).min(1.0);

        // Reflect on total internal reflection, or with the Fresnel
        // probability. Otherwise refract.
        let dir = match unit_dir.refract(hit.normal, eta_i_over_eta_t) {
            Some(refracted)
                if rng.gen::<f64>() >= Self::schlick(cos_theta, eta_i_over_eta_t) =>
            {
                refracted
            }
            _ => unit_dir.reflect(hit.normal),
        };

        let scattered = Ray::new(hit.point, dir);
        // Clear glass absorbs nothing.
        Some(Scatter::new(Color::default(), scattered))
    }
}

// ===== Blanket Impls ======
/// Many shapes legitimately share one material instance.
impl<T: Material + Send> Material for Arc<T> {
    fn scatter(&self, ray: &Ray, hit: &Hit, rng: &mut CrateRng) -> Option<Scatter> {
        // Use fully qualified syntax to prevent recursion
        <T as Material>::scatter(self, ray, hit, rng)
    }
}
