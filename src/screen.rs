use anyhow::{ensure, Context, Result};
use rayon::prelude::*;

use crate::{Color, CrateRng, Ray, Vec3};

pub struct Screen {
    pub width: usize,
    pub height: usize,
    /// Flat buffer of 24-bit pixels with length of `width * height`
    pub buffer: Box<[Color]>,
}
impl Screen {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![Color::BLACK; width * height].into(),
        }
    }

    /// Encodes each Pixel into `0RGB` and applies gamma correction
    pub fn encode(&self) -> Box<[u32]> {
        self.buffer
            .iter()
            .map(|p| {
                // Check for invalid Colors, including NANs
                let bounds = 0.0..=1.0;
                if !bounds.contains(&p.r) || !bounds.contains(&p.g) || !bounds.contains(&p.b) {
                    panic!("Invalid color: {:?}", p);
                }

                // Gamma 2: take the square root of each linear channel.
                let (r, g, b) = (
                    255.99 * p.r.sqrt(),
                    255.99 * p.g.sqrt(),
                    255.99 * p.b.sqrt(),
                );
                let (r, g, b) = (r as u32, g as u32, b as u32);
                (r << 16) | (g << 8) | b
            })
            .collect()
    }

    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<Color> {
        self.buffer.chunks_exact_mut(self.width)
    }

    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksExactMut<Color> {
        self.buffer.par_chunks_exact_mut(self.width)
    }
}

#[derive(Debug)]
pub struct Camera {
    pub origin: Vec3,
    pub horiz: Vec3,
    pub vert: Vec3,
    pub lower_left: Vec3,

    /// Used for depth of field. Set to `None` to disable depth of field.
    pub lens_radius: Option<f64>,
    /// Width part of the orthonormal basis.
    pub u: Vec3,
    /// Height part of the orthonormal basis.
    pub v: Vec3,
    /// Depth part of the orthonormal basis.
    pub w: Vec3,
}
impl Camera {
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    /// A camera from an explicit viewport rectangle, with no depth of field.
    pub fn fixed(origin: Vec3, horiz: Vec3, vert: Vec3, lower_left: Vec3) -> Self {
        Self {
            origin,
            horiz,
            vert,
            lower_left,
            lens_radius: None,
            u: Vec3::UNIT_X,
            v: Vec3::UNIT_Y,
            w: Vec3::UNIT_Z,
        }
    }

    pub fn get_ray(&self, i: f64, j: f64, rng: &mut CrateRng) -> Ray {
        let origin = if let Some(radius) = self.lens_radius {
            let rand_disk = radius * Vec3::rand_unit_disk(rng);
            let offset = rand_disk.x * self.u + rand_disk.y * self.v;
            self.origin + offset
        } else {
            self.origin
        };

        Ray::new(
            origin,
            self.lower_left + i * self.horiz + j * self.vert - origin,
        )
    }
}

#[derive(Debug)]
pub struct CameraBuilder {
    origin: Vec3,
    look_at: Vec3,
    view_up: Vec3,
    vfov_degrees: f64,
    aspect_ratio: f64,
    /// Used for depth of field. Set to `None` to disable depth of field.
    aperture: Option<f64>,
    /// If None, defaults to magnitude of vector between `origin` and `look_at`.
    focus_dist: Option<f64>,
}
impl CameraBuilder {
    pub fn build(&self) -> Result<Camera> {
        ensure!(
            self.vfov_degrees > 0. && self.vfov_degrees < 180.,
            "Camera's vertical fov must be in (0, 180) degrees, got {}",
            self.vfov_degrees,
        );
        ensure!(
            self.aspect_ratio > 0.,
            "Camera's aspect ratio must be positive, got {}",
            self.aspect_ratio,
        );

        let lens_radius = self.aperture.map(|a| a / 2.);
        let focus_dist = self
            .focus_dist
            .unwrap_or_else(|| (self.origin - self.look_at).norm());

        let theta = self.vfov_degrees.to_radians() / 2.;
        let half_height = focus_dist * theta.tan();
        let half_width = self.aspect_ratio * half_height;

        // Project view_up onto the plane of the camera and form the orthonormal basis.
        // Also deal with bad camera configurations.

        // Error if camera's origin and look_at are the same.
        let w = Vec3::checked_normalized(self.origin - self.look_at)
            .with_context(|| {
                format!(
                    "Camera's origin and look_at vectors are the same.\nOrigin: {:?}",
                    self.origin,
                )
            })
            .camera_context(self)?;

        // Error if the view_up vector has length 0.
        let view_up = Vec3::checked_normalized(self.view_up)
            .with_context(|| format!("Camera's view_up vector has length 0: {:?}", self.view_up))
            .camera_context(self)?;

        // Error if look_at and view_up are parallel.
        let u = Vec3::checked_normalized(view_up.cross(w))
            .with_context(|| {
                format!(
                    "Camera's look_at and view_up vectors are parellel.\nResp.: {:?} || {:?}",
                    self.look_at, view_up,
                )
            })
            .camera_context(self)?;

        let v = w.cross(u);
        let lower_left = self.origin - u * half_width - v * half_height - focus_dist * w;
        let horiz = 2. * u * half_width;
        let vert = 2. * v * half_height;

        Ok(Camera {
            origin: self.origin,
            horiz,
            vert,
            lower_left,
            lens_radius,
            u,
            v,
            w,
        })
    }
    // ===== Builder Methods =====
    pub fn origin<T: Into<Vec3>>(&mut self, origin: T) -> &mut Self {
        self.origin = origin.into();
        self
    }
    pub fn look_at<T: Into<Vec3>>(&mut self, look_at: T) -> &mut Self {
        self.look_at = look_at.into();
        self
    }
    pub fn vfov_degrees(&mut self, vfov: f64) -> &mut Self {
        self.vfov_degrees = vfov;
        self
    }
    pub fn aspect_ratio(&mut self, aspect_ratio: f64) -> &mut Self {
        self.aspect_ratio = aspect_ratio;
        self
    }
    pub fn view_up<T: Into<Vec3>>(&mut self, view_up: T) -> &mut Self {
        self.view_up = view_up.into();
        self
    }
    /// Used for depth of field. Set to `None` to disable depth of field.
    pub fn aperture<T: Into<Option<f64>>>(&mut self, aperture: T) -> &mut Self {
        self.aperture = aperture.into();
        self
    }
    /// If None, defaults to magnitude of vector between `origin` and `look_at`.
    pub fn focus_dist<T: Into<Option<f64>>>(&mut self, dist: T) -> &mut Self {
        self.focus_dist = dist.into();
        self
    }
}
impl Default for CameraBuilder {
    fn default() -> Self {
        Self {
            origin: Vec3::ORIGIN,
            look_at: Vec3::new(0., 0., -1.),
            view_up: Vec3::UNIT_Y,
            vfov_degrees: 60.,
            aspect_ratio: 16. / 9.,
            aperture: None,
            focus_dist: None,
        }
    }
}

trait ResultExt {
    fn camera_context(self, builder: &CameraBuilder) -> Result<Vec3>;
}
impl ResultExt for Result<Vec3> {
    /// Attach the CameraBuilder to the Result as context.
    fn camera_context(self, builder: &CameraBuilder) -> Result<Vec3> {
        self.with_context(|| format!("Invalid Camera configuration.\n{:#?}", builder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn fixed_frustum_rays() {
        let mut rng = CrateRng::seed_from_u64(0);
        let camera = Camera::fixed(
            Vec3::ORIGIN,
            Vec3::new(4., 0., 0.),
            Vec3::new(0., 2., 0.),
            Vec3::new(-2., -1., -1.),
        );

        // The center of the viewport lies straight down -z.
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin, Vec3::ORIGIN);
        assert_eq!(ray.dir, Vec3::new(0., 0., -1.));

        // Corners map to the viewport rectangle.
        let ray = camera.get_ray(0., 0., &mut rng);
        assert_eq!(ray.dir, Vec3::new(-2., -1., -1.));
        let ray = camera.get_ray(1., 1., &mut rng);
        assert_eq!(ray.dir, Vec3::new(2., 1., -1.));
    }

    #[test]
    fn builder_accepts_sane_configuration() {
        Camera::builder()
            .origin([13., 2., 3.])
            .look_at([0., 0., 0.])
            .vfov_degrees(20.)
            .build()
            .unwrap();
    }

    #[test]
    fn builder_rejects_bad_fov() {
        for &vfov in &[0., -20., 180., 270.] {
            Camera::builder().vfov_degrees(vfov).build().unwrap_err();
        }
    }

    #[test]
    fn builder_rejects_bad_aspect_ratio() {
        Camera::builder().aspect_ratio(0.).build().unwrap_err();
        Camera::builder().aspect_ratio(-1.5).build().unwrap_err();
    }

    #[test]
    fn builder_rejects_origin_equal_to_look_at() {
        Camera::builder()
            .origin([1., 2., 3.])
            .look_at([1., 2., 3.])
            .build()
            .unwrap_err();
    }

    #[test]
    fn builder_rejects_zero_view_up() {
        Camera::builder()
            .view_up(Vec3::ORIGIN)
            .build()
            .unwrap_err();
    }

    #[test]
    fn builder_rejects_parallel_look_and_up() {
        // view_up along the viewing axis leaves no usable basis.
        Camera::builder()
            .origin([0., 0., 1.])
            .look_at([0., 0., -1.])
            .view_up(Vec3::UNIT_Z)
            .build()
            .unwrap_err();
    }
}
