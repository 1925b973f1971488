use std::num::{NonZeroU16, NonZeroU32, NonZeroUsize};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use rand::Rng;
use structopt::StructOpt;
use strum::VariantNames;
use strum_macros::Display as StrumDisplay;
use strum_macros::{EnumString, EnumVariantNames};

use crate::material::{Dielectric, Lambertian, Metal};
use crate::shape::Sphere;
use crate::{Camera, Color, CrateRng, HitList, Vec3};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[allow(non_snake_case)]
/// Return a `Config` built from command line args
pub fn GLOBAL() -> &'static Config {
    CONFIG.get_or_init(Config::from_args)
}

#[derive(Clone, Debug, StructOpt)]
pub struct Config {
    #[structopt(short, long, default_value = "1024", display_order = 0)]
    /// Width of render
    pub width: NonZeroUsize,

    #[structopt(short, long, default_value = "576", display_order = 1)]
    /// Height of render
    pub height: NonZeroUsize,

    // Run at 30 fps
    #[structopt(skip = Duration::from_secs_f64(1. / 30.))]
    /// Controls the framerate
    pub delay: Duration,

    #[structopt(
        help = "Disable antialiasing",
        short = "n",
        long = "no-aa",
        // Disable antialiasing if the flag is given at least once
        parse(from_occurrences = invert_bool),
    )]
    /// Controls antialiasing
    pub antialias: bool,

    #[structopt(short, long, default_value = "100")]
    /// Number of samples per pixel
    pub samples: NonZeroU16,

    #[structopt(short, long, default_value = "50")]
    /// Maximum ray bounce depth
    pub max_depth: NonZeroU32,

    #[structopt(short = "r", long = "rng")]
    /// Use a specific seed for the rng.
    pub seed: Option<u64>,

    #[structopt(
        default_value = "Random",
        // Using this instead of possible_values because possible_values doesn't wrap properly
        parse(try_from_str = parse_scene),
    )]
    /// The scene to render
    pub scene: Scene,
}

fn parse_scene(s: &str) -> Result<Scene> {
    s.parse::<Scene>().map_err(|_| {
        anyhow!(
            "\"{}\" isn't a Scene.\nPossible values: {:#?}",
            s,
            Scene::VARIANTS
        )
    })
}

fn invert_bool(i: u64) -> bool {
    i == 0
}

#[derive(Copy, Clone, Debug, StrumDisplay, EnumString, EnumVariantNames, PartialEq)]
pub enum Scene {
    Random,
    Balls,
    Glass,
}

impl Scene {
    pub fn create(self, rng: &mut CrateRng) -> Result<(Camera, HitList)> {
        let camera = self.camera().map_err(|err| err.context(self))?;
        Ok((camera, self.world(rng)))
    }

    pub fn camera(self) -> Result<Camera> {
        use Scene::*;
        // Match the camera to the configured framebuffer.
        let aspect = GLOBAL().width.get() as f64 / GLOBAL().height.get() as f64;
        match self {
            Random => Camera::builder()
                .origin([13., 2., 3.])
                .look_at([0., 0., 0.])
                .vfov_degrees(20.)
                .aspect_ratio(aspect)
                .aperture(0.1)
                .focus_dist(10.)
                .build(),
            Balls => Camera::builder()
                .origin([-2., 1.5, 1.])
                .look_at([-0.2, 0., -1.2])
                .vfov_degrees(40.)
                .aspect_ratio(aspect)
                .build(),
            Glass => Camera::builder()
                .origin([0., 0.5, 1.])
                .look_at([0., 0., -1.])
                .vfov_degrees(60.)
                .aspect_ratio(aspect)
                .build(),
        }
    }

    pub fn world(self, rng: &mut CrateRng) -> HitList {
        use Scene::*;

        match self {
            Random => {
                let mut world = HitList::new();
                world.push(Sphere::from(
                    [0., -1000., 0.],
                    1000.,
                    Lambertian::new(Color::new(0.5, 0.5, 0.5)),
                ));

                let glass = Arc::new(Dielectric::new(1.5));
                for a in -11..11 {
                    for b in -11..11 {
                        let (x, z) = (0.9 * rng.gen::<f64>(), 0.9 * rng.gen::<f64>());
                        let center = Vec3::new(a as f64 + x, 0.2, b as f64 + z);
                        if (center - Vec3::new(4., 0.2, 0.)).norm() <= 0.9 {
                            continue;
                        }
                        let material = rng.gen::<f64>();
                        if material < 0.8 {
                            // diffuse
                            let albedo = Color::rand(rng) * Color::rand(rng);
                            world.push(Sphere::new(center, 0.2, Lambertian::new(albedo)));
                        } else if material < 0.95 {
                            // metal
                            let albedo = Color::rand_range(rng, 0.5, 1.);
                            let fuzz = rng.gen_range(0., 0.5);
                            world.push(Sphere::new(center, 0.2, Metal::new(albedo, fuzz)));
                        } else {
                            // glass
                            world.push(Sphere::new(center, 0.2, glass.clone()));
                        }
                    }
                }

                world.push(Sphere::from([0., 1., 0.], 1., glass));
                world.push(Sphere::from(
                    [-4., 1., 0.],
                    1.,
                    Lambertian::new(Color::new(0.4, 0.2, 0.1)),
                ));
                world.push(Sphere::from(
                    [4., 1., 0.],
                    1.,
                    Metal::from([0.7, 0.6, 0.5], 0.0),
                ));

                world
            }
            Balls => {
                let mut world = HitList::new();
                world.push(Sphere::from(
                    [0., -100.5, -1.],
                    100.,
                    Lambertian::new(Color::new(0.8, 0.8, 0.)),
                ));
                world.push(Sphere::from([0., 0., -1.], 0.5, Dielectric::new(1.5)));

                let gold = Arc::new(Metal::from([0.8, 0.6, 0.2], 0.));
                let blue = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
                world.push(Sphere::from([1.5, 0., -1.], 0.5, gold.clone()));
                world.push(Sphere::from([-1.05, 0., -1.], 0.5, blue.clone()));
                world.push(Sphere::from([1.5, 0., -2.5], 0.5, gold));
                world.push(Sphere::from([-1.05, 0., -2.5], 0.5, blue));

                world
            }
            Glass => {
                // A hollow glass shell around a diffuse core, in front of a
                // fuzzy metal backdrop.
                let mut world = HitList::new();
                world.push(Sphere::from(
                    [0., -100.5, -1.],
                    100.,
                    Lambertian::new(Color::new(0.5, 0.7, 0.3)),
                ));
                world.push(Sphere::from([0., 0., -1.], 0.5, Dielectric::new(1.5)));
                world.push(Sphere::from(
                    [0., 0., -1.],
                    0.25,
                    Lambertian::new(Color::new(0.7, 0.2, 0.2)),
                ));
                world.push(Sphere::from(
                    [0., 0.2, -3.],
                    1.2,
                    Metal::from([0.8, 0.8, 0.9], 0.3),
                ));

                world
            }
        }
    }
}

#[cfg(test)]
mod parse_test {
    use super::*;

    #[test]
    fn right_case() {
        assert_eq!("Random".parse::<Scene>().unwrap(), Scene::Random);
        assert_eq!("Balls".parse::<Scene>().unwrap(), Scene::Balls);
        assert_eq!("Glass".parse::<Scene>().unwrap(), Scene::Glass);
    }

    #[test]
    fn wrong_case() {
        "random".parse::<Scene>().unwrap_err();
        "rANDOM".parse::<Scene>().unwrap_err();
        "balls".parse::<Scene>().unwrap_err();
        "glass-balls".parse::<Scene>().unwrap_err();
        "glass_balls".parse::<Scene>().unwrap_err();
    }
}
