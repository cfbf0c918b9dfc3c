//! snapshot.rs
//!
//! Renders one frame of the scene on the CPU: rays from the default camera against the
//! earth sphere and the atmosphere shell, shaded with the same model as the wgsl.
//! No environment map or flare, the background is the clear color.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::config::{
    ATMOSPHERE_SCALE, CAMERA_FOV_DEGREES, CAMERA_POSITION, CLEAR_COLOR, EARTH_RADIUS,
};
use crate::systems::earth::materials::ShadingUniform;
use crate::systems::earth::mesh::sphere_uv;
use crate::systems::earth::shading::{AtmosphereShader, SurfaceShader};
use crate::systems::earth::textures::{TextureSampler, TextureSet};
use crate::systems::params::parse_hex_color;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot render a {width}x{height} frame")]
    EmptyFrame { width: u32, height: u32 },
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// perspective camera looking at a fixed point, y up
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapshotCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
}

impl Default for SnapshotCamera {
    fn default() -> Self {
        Self {
            position: Vec3::from(CAMERA_POSITION),
            target: Vec3::ZERO,
            fov_y: CAMERA_FOV_DEGREES.to_radians(),
        }
    }
}

impl SnapshotCamera {
    /// unit ray direction through the center of pixel (x, y), y grows downward
    pub fn ray(&self, x: u32, y: u32, width: u32, height: u32) -> Vec3 {
        let forward = (self.target - self.position).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);

        let half_height = (self.fov_y * 0.5).tan();
        let aspect = width as f32 / height as f32;
        let sx = (2.0 * (x as f32 + 0.5) / width as f32 - 1.0) * aspect * half_height;
        let sy = (1.0 - 2.0 * (y as f32 + 0.5) / height as f32) * half_height;

        (forward + right * sx + up * sy).normalize()
    }
}

// near and far hit distances of a ray against a sphere at the origin
fn intersect_sphere(origin: Vec3, direction: Vec3, radius: f32) -> Option<(f32, f32)> {
    let b = origin.dot(direction);
    let c = origin.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let far = -b + root;
    (far > 0.0).then_some((-b - root, far))
}

/// everything that decides what a frame looks like
pub struct SnapshotScene<'a, S> {
    pub textures: &'a TextureSet<S>,
    pub shading: ShadingUniform,
    /// earth body orientation, the shell never rotates
    pub earth_rotation: Quat,
    pub camera: SnapshotCamera,
    /// linear rgb
    pub background: Vec3,
}

/// the clear color in linear rgb
pub fn default_background() -> Vec3 {
    let linear = LinearRgba::from(parse_hex_color(CLEAR_COLOR, Srgba::BLACK));
    Vec3::new(linear.red, linear.green, linear.blue)
}

impl<S: TextureSampler> SnapshotScene<'_, S> {
    /// linear color seen along one ray
    pub fn trace(&self, direction: Vec3) -> Vec3 {
        let origin = self.camera.position;
        let view = -direction;

        if let Some((near, _)) = intersect_sphere(origin, direction, EARTH_RADIUS) {
            if near > 0.0 {
                let normal = (origin + direction * near).normalize();
                let local = self.earth_rotation.inverse() * normal;
                let shader = SurfaceShader {
                    textures: self.textures,
                    shading: &self.shading,
                };
                return shader.shade(normal, sphere_uv(local), view).truncate();
            }
        }

        // only the far side of the shell is drawn
        let Some((_, far)) = intersect_sphere(origin, direction, EARTH_RADIUS * ATMOSPHERE_SCALE)
        else {
            return self.background;
        };

        let normal = (origin + direction * far).normalize();
        let glow = AtmosphereShader {
            shading: &self.shading,
        }
        .shade(normal, view);

        self.background.lerp(glow.truncate(), glow.w.clamp(0.0, 1.0))
    }

    pub fn render(&self, width: u32, height: u32) -> Result<RgbImage, SnapshotError> {
        if width == 0 || height == 0 {
            return Err(SnapshotError::EmptyFrame { width, height });
        }

        Ok(RgbImage::from_fn(width, height, |x, y| {
            let color = self.trace(self.camera.ray(x, y, width, height));
            Rgb(encode_srgb(color))
        }))
    }
}

// no tonemapping, like the live camera
fn encode_srgb(color: Vec3) -> [u8; 3] {
    let srgb = Srgba::from(LinearRgba::rgb(
        color.x.clamp(0.0, 1.0),
        color.y.clamp(0.0, 1.0),
        color.z.clamp(0.0, 1.0),
    ));
    let to_byte = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;

    [to_byte(srgb.red), to_byte(srgb.green), to_byte(srgb.blue)]
}

pub fn save(image: &RgbImage, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    image.save(path).map_err(|source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::earth::materials::ShadingSettings;
    use crate::systems::earth::textures::CpuTexture;
    use crate::systems::params::EarthParameters;
    use crate::systems::sun::SunSpherical;
    use crate::systems::time::RotationState;

    fn flat_textures() -> TextureSet {
        TextureSet {
            day: CpuTexture::solid(Vec4::new(0.2, 0.4, 0.1, 1.0)),
            night: CpuTexture::solid(Vec4::new(0.0, 0.0, 0.0, 1.0)),
            specular_clouds: CpuTexture::solid(Vec4::ZERO),
        }
    }

    fn scene(textures: &TextureSet, sun: SunSpherical, elapsed: f32) -> SnapshotScene<'_, CpuTexture> {
        SnapshotScene {
            textures,
            shading: ShadingUniform::new(&sun, &EarthParameters::default(), &ShadingSettings::default()),
            earth_rotation: RotationState::at(elapsed).rotation(),
            camera: SnapshotCamera::default(),
            background: default_background(),
        }
    }

    // sun straight behind the camera
    fn sun_at_camera() -> SunSpherical {
        let toward = Vec3::from(CAMERA_POSITION).normalize();
        SunSpherical::new(toward.y.acos(), toward.x.atan2(toward.z))
    }

    fn sun_behind_earth() -> SunSpherical {
        let away = -Vec3::from(CAMERA_POSITION).normalize();
        SunSpherical::new(away.y.acos(), away.x.atan2(away.z))
    }

    fn luminance(pixel: &Rgb<u8>) -> u32 {
        pixel.0.iter().map(|&c| c as u32).sum()
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = SnapshotCamera::default();
        let direction = camera.ray(50, 50, 101, 101);
        let expected = (camera.target - camera.position).normalize();
        assert!(direction.distance(expected) < 1e-5);
    }

    #[test]
    fn test_sphere_intersection() {
        let hit = intersect_sphere(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 2.0);
        assert_eq!(hit, Some((8.0, 12.0)));
        assert!(intersect_sphere(Vec3::new(0.0, 5.0, 10.0), Vec3::NEG_Z, 2.0).is_none());
        // sphere behind the ray
        assert!(intersect_sphere(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, 2.0).is_none());
    }

    #[test]
    fn test_same_inputs_same_frame() {
        let textures = flat_textures();
        let a = scene(&textures, SunSpherical::default(), 3.5).render(48, 32).unwrap();
        let b = scene(&textures, SunSpherical::default(), 3.5).render(48, 32).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_corners_show_background() {
        let textures = flat_textures();
        let frame = scene(&textures, SunSpherical::default(), 0.0).render(64, 64).unwrap();
        let background = encode_srgb(default_background());

        assert_eq!(background, [0, 0, 17]);
        assert_eq!(frame.get_pixel(0, 0).0, background);
        assert_eq!(frame.get_pixel(63, 63).0, background);
    }

    #[test]
    fn test_lit_side_brighter_than_night_side() {
        let textures = flat_textures();
        let day = scene(&textures, sun_at_camera(), 0.0).render(33, 33).unwrap();
        let night = scene(&textures, sun_behind_earth(), 0.0).render(33, 33).unwrap();

        let day_center = luminance(day.get_pixel(16, 16));
        let night_center = luminance(night.get_pixel(16, 16));
        assert!(day_center > night_center + 100, "{day_center} vs {night_center}");
        // night texture is black and the disc center has no rim glow
        assert!(night_center < 10);
    }

    #[test]
    fn test_grazing_ray_shows_glow() {
        let textures = flat_textures();
        let frame = scene(&textures, sun_behind_earth(), 0.0);

        // a ray grazing just outside the body
        let camera = frame.camera;
        let forward = (camera.target - camera.position).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let distance = camera.position.length();
        let graze = (EARTH_RADIUS * (1.0 + ATMOSPHERE_SCALE) * 0.5) / distance;
        let direction = (forward + right * graze).normalize();

        // the far side of the shell faces the sun here
        let backlit = frame.trace(direction);
        assert!(backlit.distance(frame.background) > 1e-3);

        let lit = scene(&textures, sun_at_camera(), 0.0).trace(direction);
        assert!(lit.distance(frame.background) > 1e-3);
    }

    #[test]
    fn test_rotation_moves_the_surface_not_the_shell() {
        let mut textures = flat_textures();
        // left half of the map bright, right half dark
        let mut map = image::RgbaImage::new(4, 1);
        for x in 0..4 {
            let value = if x < 2 { 255 } else { 0 };
            map.put_pixel(x, 0, image::Rgba([value, value, value, 255]));
        }
        textures.day = CpuTexture::from_rgba8(&map, true);

        let at_start = scene(&textures, sun_at_camera(), 0.0);
        let half_turn = std::f32::consts::PI / crate::config::EARTH_ROTATION_SPEED;
        let turned = scene(&textures, sun_at_camera(), half_turn);

        let center = at_start.camera.ray(16, 16, 33, 33);
        assert!(at_start.trace(center).distance(turned.trace(center)) > 0.1);
    }

    #[test]
    fn test_empty_frame_is_an_error() {
        let textures = flat_textures();
        let result = scene(&textures, SunSpherical::default(), 0.0).render(0, 10);
        assert!(matches!(result, Err(SnapshotError::EmptyFrame { width: 0, height: 10 })));
    }
}
