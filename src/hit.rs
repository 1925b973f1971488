use std::fmt::Debug;
use std::ops::Range;

use crate::{Material, Ray, Vec3};

pub struct Hit<'a> {
    pub point: Vec3,
    /// A unit-length normal vector
    pub normal: Vec3,
    /// Time of hit
    pub time: f64,
    /// Hit the front face or back face of object
    pub front_face: bool,
    /// The material that was hit
    pub material: &'a dyn Material,
}
impl<'a> Hit<'a> {
    pub fn new(
        point: Vec3,
        normal: Vec3,
        t: f64,
        front_face: bool,
        material: &'a dyn Material,
    ) -> Self {
        Self {
            point,
            normal,
            time: t,
            front_face,
            material,
        }
    }

    pub fn ray(point: Vec3, mut normal: Vec3, t: f64, ray: &Ray, material: &'a dyn Material) -> Self {
        // Dot product is negative when ray hits back face
        let front_face = ray.dir.dot(normal) < 0.;
        // Make surface normal always point against incident ray
        if !front_face {
            normal *= -1.;
        }
        Self::new(point, normal, t, front_face, material)
    }
}

pub trait Hittable: Sync + Debug {
    /// Returns the hit determined by a ray. If there is no hit or the hit's time isn't contained
    /// by `hit_time`, returns `None`.
    fn hit(&self, ray: &Ray, hit_time: &Range<f64>) -> Option<Hit>;
}

#[derive(Default, Debug)]
pub struct HitList(pub Vec<Box<dyn Hittable>>);
impl HitList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push<T: Hittable + 'static>(&mut self, val: T) {
        self.0.push(Box::new(val))
    }
}
impl Hittable for HitList {
    fn hit(&self, ray: &Ray, hit_time: &Range<f64>) -> Option<Hit> {
        let mut range = hit_time.clone();
        let mut closest = None;
        for obj in &self.0 {
            if let Some(hit) = obj.hit(ray, &range) {
                range.end = hit.time;
                closest = Some(hit);
            }
        }
        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::shape::Sphere;
    use crate::Color;

    fn world() -> HitList {
        let material = Lambertian::new(Color::new(0.5, 0.5, 0.5));
        let mut world = HitList::new();
        world.push(Sphere::from([0., 0., -1.], 0.5, material));
        world.push(Sphere::from([0., 0., -3.], 0.5, Lambertian::new(Color::default())));
        world.push(Sphere::from([0., 5., 0.], 1., Lambertian::new(Color::default())));
        world
    }

    #[test]
    fn closest_member_wins() {
        let world = world();
        let ray = Ray::new(Vec3::ORIGIN, -Vec3::UNIT_Z);
        let hit = world.hit(&ray, &(0.001..f64::INFINITY)).unwrap();
        // Both spheres on the -z axis intersect; the nearer one is reported.
        assert!((hit.time - 0.5).abs() < 1e-10);

        // Same answer regardless of insertion order.
        let material = Lambertian::new(Color::default());
        let mut reversed = HitList::new();
        reversed.push(Sphere::from([0., 0., -3.], 0.5, Lambertian::new(Color::default())));
        reversed.push(Sphere::from([0., 0., -1.], 0.5, material));
        let hit = reversed.hit(&ray, &(0.001..f64::INFINITY)).unwrap();
        assert!((hit.time - 0.5).abs() < 1e-10);
    }

    #[test]
    fn miss_iff_no_member_hit() {
        let world = world();
        let ray = Ray::new(Vec3::ORIGIN, Vec3::new(0., -1., 0.5));
        assert!(world.hit(&ray, &(0.001..f64::INFINITY)).is_none());

        let empty = HitList::new();
        let ray = Ray::new(Vec3::ORIGIN, -Vec3::UNIT_Z);
        assert!(empty.hit(&ray, &(0.001..f64::INFINITY)).is_none());
    }
}
