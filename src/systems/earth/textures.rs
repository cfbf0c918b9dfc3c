//! textures.rs
//!
//! Day, night and specular/cloud images for the earth.
//! The GPU side only needs handles, the CPU side (snapshot renderer, tests) samples
//! decoded texels through `TextureSampler`.

use std::path::{Path, PathBuf};

use bevy::image::{
    ImageAddressMode, ImageFilterMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor,
};
use bevy::prelude::*;
use thiserror::Error;

use crate::config::{
    EARTH_DAY_TEXTURE, EARTH_NIGHT_TEXTURE, EARTH_SPECULAR_CLOUDS_TEXTURE, TEXTURE_ANISOTROPY,
};

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// handles for the three earth textures, shared read-only by every material that needs them
#[derive(Resource, Clone, Debug)]
pub struct EarthTextures {
    pub day: Handle<Image>,
    pub night: Handle<Image>,
    pub specular_clouds: Handle<Image>,
}

impl EarthTextures {
    pub fn load(asset_server: &AssetServer) -> Self {
        Self {
            day: load_texture(asset_server, EARTH_DAY_TEXTURE, true),
            night: load_texture(asset_server, EARTH_NIGHT_TEXTURE, true),
            // data texture, keep it linear
            specular_clouds: load_texture(asset_server, EARTH_SPECULAR_CLOUDS_TEXTURE, false),
        }
    }

    pub fn handles(&self) -> [&Handle<Image>; 3] {
        [&self.day, &self.night, &self.specular_clouds]
    }
}

fn load_texture(asset_server: &AssetServer, path: &'static str, is_srgb: bool) -> Handle<Image> {
    asset_server.load_with_settings(path, move |settings: &mut ImageLoaderSettings| {
        settings.is_srgb = is_srgb;
        settings.sampler = ImageSampler::Descriptor(anisotropic_sampler());
    })
}

/// longitude wraps, latitude clamps at the poles
/// anisotropic filtering needs every filter set to linear
pub fn anisotropic_sampler() -> ImageSamplerDescriptor {
    ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::ClampToEdge,
        mag_filter: ImageFilterMode::Linear,
        min_filter: ImageFilterMode::Linear,
        mipmap_filter: ImageFilterMode::Linear,
        anisotropy_clamp: TEXTURE_ANISOTROPY,
        ..default()
    }
}

/// anything that can be sampled at a normalized uv, returning linear rgba
pub trait TextureSampler {
    fn sample(&self, uv: Vec2) -> Vec4;
}

/// decoded image held in linear space
#[derive(Clone, Debug)]
pub struct CpuTexture {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl CpuTexture {
    pub fn from_rgba8(image: &image::RgbaImage, is_srgb: bool) -> Self {
        let texels = image
            .pixels()
            .map(|pixel| {
                let [r, g, b, a] = pixel.0;
                let (r, g, b, a) = (
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0,
                );
                if is_srgb {
                    let linear = LinearRgba::from(Srgba::new(r, g, b, a));
                    Vec4::new(linear.red, linear.green, linear.blue, linear.alpha)
                } else {
                    Vec4::new(r, g, b, a)
                }
            })
            .collect();

        Self {
            width: image.width().max(1),
            height: image.height().max(1),
            texels,
        }
    }

    pub fn open(path: impl AsRef<Path>, is_srgb: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_rgba8(&image.to_rgba8(), is_srgb))
    }

    /// 1x1 texture of a single linear color
    pub fn solid(color: Vec4) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn texel(&self, x: i64, y: i64) -> Vec4 {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.texels
            .get(y * self.width as usize + x)
            .copied()
            .unwrap_or(Vec4::ZERO)
    }
}

impl TextureSampler for CpuTexture {
    // bilinear, u repeats, v clamps (same as anisotropic_sampler)
    fn sample(&self, uv: Vec2) -> Vec4 {
        // flat placeholders come back exactly, not through the lerp
        if let [texel] = self.texels.as_slice() {
            return *texel;
        }

        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.clamp(0.0, 1.0);

        let x = u * self.width as f32 - 0.5;
        let y = v * self.height as f32 - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), fx);
        let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), fx);
        top.lerp(bottom, fy)
    }
}

/// texels read at one surface coordinate, lives for a single shading evaluation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    pub day: Vec3,
    pub night: Vec3,
    pub specular: f32,
    pub clouds: f32,
}

#[derive(Clone, Debug)]
pub struct TextureSet<S = CpuTexture> {
    pub day: S,
    pub night: S,
    pub specular_clouds: S,
}

impl<S: TextureSampler> TextureSet<S> {
    pub fn sample(&self, uv: Vec2) -> SurfaceSample {
        let specular_clouds = self.specular_clouds.sample(uv);

        SurfaceSample {
            day: self.day.sample(uv).truncate(),
            night: self.night.sample(uv).truncate(),
            specular: specular_clouds.x,
            clouds: specular_clouds.y,
        }
    }
}

impl TextureSet<CpuTexture> {
    /// loads the earth textures from an asset directory
    /// a texture that fails to load is replaced by a flat placeholder and the render goes on
    pub fn open_or_placeholder(asset_dir: impl AsRef<Path>) -> Self {
        let asset_dir = asset_dir.as_ref();
        let open = |path: &str, is_srgb: bool, placeholder: Vec4| {
            match CpuTexture::open(asset_dir.join(path), is_srgb) {
                Ok(texture) => {
                    info!("loaded {} ({}x{})", path, texture.width(), texture.height());
                    texture
                }
                Err(e) => {
                    warn!("{e}, using placeholder");
                    CpuTexture::solid(placeholder)
                }
            }
        };

        Self {
            day: open(EARTH_DAY_TEXTURE, true, Vec4::new(0.5, 0.5, 0.5, 1.0)),
            night: open(EARTH_NIGHT_TEXTURE, true, Vec4::new(0.0, 0.0, 0.0, 1.0)),
            specular_clouds: open(EARTH_SPECULAR_CLOUDS_TEXTURE, false, Vec4::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> CpuTexture {
        // 2x1: black | white, linear
        let mut image = image::RgbaImage::new(2, 1);
        image.put_pixel(0, 0, image::Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, image::Rgba([255, 255, 255, 255]));
        CpuTexture::from_rgba8(&image, false)
    }

    #[test]
    fn test_sample_texel_centers() {
        let texture = checker();
        assert_eq!(texture.sample(Vec2::new(0.25, 0.5)), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(texture.sample(Vec2::new(0.75, 0.5)), Vec4::ONE);
    }

    #[test]
    fn test_sample_wraps_longitude() {
        let texture = checker();
        // halfway between the last and first texel across the seam
        let seam = texture.sample(Vec2::new(0.0, 0.5));
        assert!((seam.x - 0.5).abs() < 1e-6);
        assert_eq!(texture.sample(Vec2::new(1.25, 0.5)), texture.sample(Vec2::new(0.25, 0.5)));
    }

    #[test]
    fn test_sample_clamps_latitude() {
        let texture = checker();
        assert_eq!(texture.sample(Vec2::new(0.75, -3.0)), texture.sample(Vec2::new(0.75, 0.5)));
        assert_eq!(texture.sample(Vec2::new(0.75, 7.0)), texture.sample(Vec2::new(0.75, 0.5)));
    }

    #[test]
    fn test_srgb_textures_are_linearized() {
        let image = image::RgbaImage::from_pixel(1, 1, image::Rgba([128, 128, 128, 255]));
        let srgb = CpuTexture::from_rgba8(&image, true).sample(Vec2::splat(0.5));
        let raw = CpuTexture::from_rgba8(&image, false).sample(Vec2::splat(0.5));

        assert!(srgb.x < raw.x);
        assert!((srgb.x - 0.2158).abs() < 1e-3);
        assert_eq!(srgb.w, 1.0);
    }

    #[test]
    fn test_texture_set_splits_mask_channels() {
        let set = TextureSet {
            day: CpuTexture::solid(Vec4::new(0.1, 0.2, 0.3, 1.0)),
            night: CpuTexture::solid(Vec4::new(0.4, 0.5, 0.6, 1.0)),
            specular_clouds: CpuTexture::solid(Vec4::new(0.7, 0.8, 0.0, 1.0)),
        };
        let sample = set.sample(Vec2::new(0.3, 0.6));

        assert_eq!(sample.day, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(sample.night, Vec3::new(0.4, 0.5, 0.6));
        assert_eq!(sample.specular, 0.7);
        assert_eq!(sample.clouds, 0.8);
    }

    #[test]
    fn test_solid_texture_is_exact_everywhere() {
        let color = Vec4::new(0.1, 0.2, 0.3, 1.0);
        let texture = CpuTexture::solid(color);

        for uv in [Vec2::ZERO, Vec2::new(0.3, 0.6), Vec2::new(0.999, 1.0), Vec2::new(-2.5, 4.0)] {
            assert_eq!(texture.sample(uv), color);
        }
    }

    #[test]
    fn test_missing_textures_fall_back_to_placeholders() {
        let set = TextureSet::open_or_placeholder("/nonexistent/asset/dir");
        let sample = set.sample(Vec2::splat(0.5));

        assert_eq!(sample.night, Vec3::ZERO);
        assert_eq!(sample.specular, 0.0);
        assert_eq!(set.day.width(), 1);
    }

    #[test]
    fn test_sampler_is_anisotropic() {
        let sampler = anisotropic_sampler();
        assert_eq!(sampler.anisotropy_clamp, TEXTURE_ANISOTROPY);
        assert!(matches!(sampler.mipmap_filter, ImageFilterMode::Linear));
    }
}
