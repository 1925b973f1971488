use std::ops;

use anyhow::{ensure, Result};
use rand::distributions::{Distribution, Uniform};

use crate::CrateRng;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
const ERR_NORMED_0: &str = "Tried to normalize vector of length 0!";
impl Vec3 {
    pub const ORIGIN: Self = Self::new(0., 0., 0.);
    // The standard basis
    pub const UNIT_X: Self = Self::new(1., 0., 0.);
    pub const UNIT_Y: Self = Self::new(0., 1., 0.);
    pub const UNIT_Z: Self = Self::new(0., 0., 1.);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// # Example
    /// ```
    /// # use pathtracer::vec3::Vec3;
    /// let a = Vec3::new(1., 2., 3.);
    /// let b = Vec3::normalized(a);
    /// assert_eq!(b.norm(), 1.);
    /// ```
    pub fn normalized(v: Vec3) -> Self {
        let normed = v / v.norm();
        debug_assert!(!normed.is_nan(), ERR_NORMED_0);
        normed
    }

    /// # Example
    /// ```
    /// # use pathtracer::vec3::Vec3;
    /// let a = Vec3::new(0., 0., 0.);
    /// assert!(Vec3::checked_normalized(a).is_err());
    /// ```
    pub fn checked_normalized(v: Vec3) -> Result<Self> {
        let norm = v.norm();
        ensure!(norm != 0., ERR_NORMED_0);
        Ok(v / norm)
    }

    /// Samples uniformly from the interior of the unit sphere by rejection.
    /// Expected ~2 candidates per sample.
    pub fn rand_in_unit_sphere(rng: &mut CrateRng) -> Self {
        let distr = Uniform::new(-1., 1.);
        loop {
            let p = Self::new(distr.sample(rng), distr.sample(rng), distr.sample(rng));
            if p.norm_squared() < 1. {
                return p;
            }
        }
    }

    /// Samples uniformly from the unit disc in the `x` and `y` dimensions. `z` is 0.
    pub fn rand_unit_disk(rng: &mut CrateRng) -> Self {
        let ret: [f64; 2] = rand_distr::UnitDisc.sample(rng);
        Self::new(ret[0], ret[1], 0.)
    }

    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    pub fn norm_squared(&self) -> f64 {
        self.x.powi(2) + self.y.powi(2) + self.z.powi(2)
    }

    /// # Example
    /// ```
    /// # use pathtracer::vec3::Vec3;
    /// let a = Vec3::new(4., 8., 10.);
    /// let b = Vec3::new(9., 2., 7.);
    /// assert_eq!(a.dot(b), 122.);
    /// ```
    pub fn dot(&self, rhs: Vec3) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// # Example
    /// ```
    /// # use pathtracer::vec3::Vec3;
    /// let a = Vec3::new(2., 3., 4.);
    /// let b = Vec3::new(5., 6., 7.);
    /// assert_eq!(a.cross(b), Vec3::new(-3., 6., -3.));
    /// ```
    pub fn cross(&self, rhs: Vec3) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Mirror reflection about `normal`. The input is normalized first.
    pub fn reflect(&self, normal: Vec3) -> Self {
        let unit_dir = Vec3::normalized(*self);
        unit_dir - 2. * unit_dir.dot(normal) * normal
    }

    /// Snell's-law refraction. Returns `None` under total internal
    /// reflection, i.e. when the discriminant
    /// `1 - eta² * (1 - (unit(v)·n)²)` is not positive.
    pub fn refract(&self, normal: Vec3, eta_i_over_eta_t: f64) -> Option<Self> {
        let unit_dir = Vec3::normalized(*self);
        let dt = unit_dir.dot(normal);
        let discriminant = 1. - eta_i_over_eta_t.powi(2) * (1. - dt * dt);
        if discriminant > 0. {
            Some(eta_i_over_eta_t * (unit_dir - dt * normal) - discriminant.sqrt() * normal)
        } else {
            None
        }
    }

    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl ops::Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl ops::Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}
impl ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}
impl ops::SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

/// Multiply the corresponding fields together
impl ops::Mul for Vec3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x * rhs.x,
            y: self.y * rhs.y,
            z: self.z * rhs.z,
        }
    }
}

impl ops::Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}
impl ops::Mul<Vec3> for f64 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs * self
    }
}
impl ops::MulAssign<f64> for Vec3 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl ops::Div<f64> for Vec3 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
        }
    }
}
impl ops::DivAssign<f64> for Vec3 {
    fn div_assign(&mut self, rhs: f64) {
        self.x /= rhs;
        self.y /= rhs;
        self.z /= rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const TOLERANCE: f64 = 1e-10;

    #[test]
    fn in_unit_sphere() {
        let mut rng = CrateRng::seed_from_u64(0);
        for _ in 0..1000 {
            let p = Vec3::rand_in_unit_sphere(&mut rng);
            assert!(p.norm_squared() < 1.);
        }
    }

    #[test]
    fn reflection() {
        // 45 degree incidence on the floor reflects upward at 45 degrees.
        let incoming = Vec3::new(1., -1., 0.);
        let reflected = incoming.reflect(Vec3::UNIT_Y);
        let expected = Vec3::normalized(Vec3::new(1., 1., 0.));
        assert!((reflected - expected).norm() < TOLERANCE);
    }

    #[test]
    fn refraction_index_matched() {
        // eta ratio of 1 leaves the direction unchanged.
        let incoming = Vec3::new(1., -2., 0.5);
        let refracted = incoming.refract(Vec3::UNIT_Y, 1.).unwrap();
        assert!((refracted - Vec3::normalized(incoming)).norm() < TOLERANCE);
    }

    #[test]
    fn total_internal_reflection() {
        // Grazing exit from a dense medium has no refraction solution.
        let incoming = Vec3::new(1., -0.05, 0.);
        assert!(incoming.refract(Vec3::UNIT_Y, 1.5).is_none());
    }
}
