use std::sync::atomic::{AtomicUsize, Ordering};

use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::{config, Camera, Color, CrateRng, Hittable, Ray, Screen, Vec3};

/// Offset of the search interval away from t = 0, so a scattered ray can't
/// re-hit the surface it just left (shadow acne).
const T_MIN: f64 = 0.001;

/// Background: a vertical gradient from white to sky blue.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_dir = Vec3::normalized(ray.dir);
    let t = 0.5 * (unit_dir.y + 1.);
    (1. - t) * Color::new(1., 1., 1.) + t * Color::new(0.5, 0.7, 1.)
}

/// Estimates the radiance arriving along `ray`.
///
/// The loop is the iterative form of the textbook recursion
/// `attenuation * ray_color(scattered, depth + 1)`: the attenuations of the
/// bounces so far are kept as a running product. A path ends at the sky, at
/// an absorbing material (black), or after `max_depth` bounces (black).
pub fn ray_color(ray: Ray, world: &dyn Hittable, max_depth: u32, rng: &mut CrateRng) -> Color {
    let mut ray = ray;
    let mut strength = Color::default();

    for depth in 0..=max_depth {
        let hit = match world.hit(&ray, &(T_MIN..f64::INFINITY)) {
            Some(hit) => hit,
            None => return strength * sky_color(&ray),
        };

        // Bounce budget exhausted.
        if depth == max_depth {
            break;
        }

        match hit.material.scatter(&ray, &hit, rng) {
            Some(scatter) => {
                strength *= scatter.albedo;
                ray = scatter.ray;
            }
            None => break,
        }
    }

    Color::BLACK
}

/// Renders the scene into `screen`, one rayon task per row.
///
/// Every row gets its own rng seeded from the configured seed and the row
/// index, so a fixed `--rng` seed reproduces the image bit for bit no matter
/// how the rows are scheduled.
pub fn render(screen: &mut Screen, camera: &Camera, world: &dyn Hittable) {
    let config = config::GLOBAL();
    let width = screen.width as f64;
    let height = screen.height as f64;
    let samples = if config.antialias {
        config.samples.get() as u32
    } else {
        1
    };
    let max_depth = config.max_depth.get();
    let base_seed = config.seed.unwrap_or_else(rand::random);

    let remaining = AtomicUsize::new(screen.height);
    screen.par_rows_mut().enumerate().for_each(|(y, row)| {
        let mut rng = CrateRng::seed_from_u64(base_seed.wrapping_add(y as u64));
        let j_row = height - 1. - y as f64;

        for (x, pix) in row.iter_mut().enumerate() {
            let mut color = Color::BLACK;
            for _ in 0..samples {
                let (di, dj) = if config.antialias {
                    (rng.gen::<f64>(), rng.gen::<f64>())
                } else {
                    (0.5, 0.5)
                };
                let i = (x as f64 + di) / width;
                let j = (j_row + dj) / height;

                let ray = camera.get_ray(i, j, &mut rng);
                color += ray_color(ray, world, max_depth, &mut rng);
            }
            color /= samples as f64;
            *pix = color;
        }

        let left = remaining.fetch_sub(1, Ordering::Relaxed) - 1;
        if left % 100 == 0 {
            eprint!("\rScanlines remaining: {}   ", left);
        }
    });
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Metal};
    use crate::shape::Sphere;
    use crate::HitList;

    const MAX_DEPTH: u32 = 50;

    #[test]
    fn miss_returns_sky_gradient() {
        let mut rng = CrateRng::seed_from_u64(1);
        let empty = HitList::new();

        let up = Ray::new(Vec3::ORIGIN, Vec3::UNIT_Y);
        assert_eq!(
            ray_color(up.clone(), &empty, MAX_DEPTH, &mut rng),
            Color::new(0.5, 0.7, 1.),
        );

        // A populated scene gives the same answer when nothing is in the way.
        let mut world = HitList::new();
        world.push(Sphere::from(
            [0., -10., 0.],
            1.,
            Lambertian::new(Color::default()),
        ));
        let sideways = Ray::new(Vec3::ORIGIN, Vec3::new(3., 1., 0.));
        assert_eq!(
            ray_color(sideways.clone(), &world, MAX_DEPTH, &mut rng),
            sky_color(&sideways),
        );
    }

    #[test]
    fn mirrored_cavity_terminates_black() {
        let mut rng = CrateRng::seed_from_u64(1);
        // A perfectly reflective enclosure: the path can never escape, so it
        // must end at the bounce cutoff instead of looping forever.
        let mut world = HitList::new();
        world.push(Sphere::from(
            [0., 0., 0.],
            10.,
            Metal::new(Color::default(), 0.),
        ));

        let ray = Ray::new(Vec3::ORIGIN, Vec3::UNIT_X);
        assert_eq!(ray_color(ray, &world, MAX_DEPTH, &mut rng), Color::BLACK);
    }

    #[test]
    fn diffuse_sphere_blends_albedo_and_sky() {
        let mut rng = CrateRng::seed_from_u64(1);
        let albedo = Color::new(0.8, 0.3, 0.3);
        let mut world = HitList::new();
        world.push(Sphere::from([0., 0., -1.], 0.5, Lambertian::new(albedo)));

        let camera = Camera::fixed(
            Vec3::ORIGIN,
            Vec3::new(4., 0., 0.),
            Vec3::new(0., 2., 0.),
            Vec3::new(-2., -1., -1.),
        );
        let center = camera.get_ray(0.5, 0.5, &mut rng);

        let mut average = Color::BLACK;
        let samples = 500;
        for _ in 0..samples {
            average += ray_color(center.clone(), &world, MAX_DEPTH, &mut rng);
        }
        average /= samples as f64;

        // The center pixel is inside the silhouette: its color is the albedo
        // attenuated by at least one bounce of sky, so it matches neither the
        // raw sky gradient nor the bare albedo.
        let sky = sky_color(&center);
        assert!((average.r - sky.r).abs() > 0.05);
        assert!((average.r - albedo.r).abs() > 0.05);
        for &channel in &[average.r, average.g, average.b] {
            assert!(channel > 0. && channel < 1.);
        }
        // The red channel dominates, as the albedo says it should.
        assert!(average.r > average.g && average.r > average.b);
    }
}
