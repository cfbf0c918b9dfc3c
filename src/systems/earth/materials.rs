use bevy::prelude::*;
use bevy::render::render_resource::*;
use bevy::reflect::TypePath;
use bevy::asset::Asset;

use crate::config::{
    ATMOSPHERE_FRESNEL_POWER, ATMOSPHERE_SHADER, DAY_NIGHT_BLEND_WIDTH, EARTH_SHADER,
    SPECULAR_SHININESS,
};
use crate::systems::params::EarthParameters;
use crate::systems::sun::SunSpherical;

use super::textures::EarthTextures;

// everything light dependent, bound to both the earth and the atmosphere
// vec3 + f32 pairs pack into 16 bytes each, same layout as the wgsl struct
// https://www.w3.org/TR/WGSL/#address-space-layout-constraints
#[derive(ShaderType, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct ShadingUniform {
    pub sun_direction: Vec3,
    pub blend_width: f32,
    pub day_color: Vec3, // linear
    pub shininess: f32,
    pub twilight_color: Vec3, // linear
    pub fresnel_power: f32,
}

impl ShadingUniform {
    pub fn new(sun: &SunSpherical, parameters: &EarthParameters, settings: &ShadingSettings) -> Self {
        Self {
            sun_direction: sun.direction(),
            blend_width: settings.blend_width(),
            day_color: parameters.atmosphere_day_linear(),
            shininess: settings.shininess(),
            twilight_color: parameters.atmosphere_twilight_linear(),
            fresnel_power: settings.fresnel_power(),
        }
    }
}

impl Default for ShadingUniform {
    fn default() -> Self {
        Self::new(
            &SunSpherical::default(),
            &EarthParameters::default(),
            &ShadingSettings::default(),
        )
    }
}

/// shading constants that are not exposed in the panel
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct ShadingSettings {
    blend_width: f32,
    shininess: f32,
    fresnel_power: f32,
}

impl Default for ShadingSettings {
    fn default() -> Self {
        Self::new(DAY_NIGHT_BLEND_WIDTH, SPECULAR_SHININESS, ATMOSPHERE_FRESNEL_POWER)
    }
}

impl ShadingSettings {
    // a zero width band would divide by zero inside smoothstep
    const MIN_BLEND_WIDTH: f32 = 1e-4;
    // wgsl pow(0, 0) is undefined, keep the exponent positive
    const MIN_FRESNEL_POWER: f32 = 1e-3;

    pub fn new(blend_width: f32, shininess: f32, fresnel_power: f32) -> Self {
        Self {
            blend_width: blend_width.clamp(Self::MIN_BLEND_WIDTH, 1.0),
            shininess: shininess.max(1.0),
            fresnel_power: fresnel_power.max(Self::MIN_FRESNEL_POWER),
        }
    }

    pub fn blend_width(&self) -> f32 {
        self.blend_width
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn fresnel_power(&self) -> f32 {
        self.fresnel_power
    }
}

// earth material
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct EarthMaterial {
    #[texture(0)]
    #[sampler(1)]
    pub day_texture: Handle<Image>,
    #[texture(2)]
    #[sampler(3)]
    pub night_texture: Handle<Image>,
    #[texture(4)]
    #[sampler(5)]
    pub specular_clouds_texture: Handle<Image>,
    #[uniform(6)]
    pub shading: ShadingUniform,
}

impl EarthMaterial {
    pub fn new(textures: &EarthTextures, shading: ShadingUniform) -> Self {
        Self {
            day_texture: textures.day.clone(),
            night_texture: textures.night.clone(),
            specular_clouds_texture: textures.specular_clouds.clone(),
            shading,
        }
    }
}

impl Material for EarthMaterial {
    fn fragment_shader() -> ShaderRef {
        EARTH_SHADER.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Opaque
    }
}

// atmosphere material
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct AtmosphereMaterial {
    #[uniform(0)]
    pub shading: ShadingUniform,
}

impl Material for AtmosphereMaterial {
    fn fragment_shader() -> ShaderRef {
        ATMOSPHERE_SHADER.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    // only the inside of the shell is drawn, so the glow shows up as a rim around the earth
    fn specialize(
            _pipeline: &bevy::pbr::MaterialPipeline<Self>,
            descriptor: &mut RenderPipelineDescriptor,
            _layout: &bevy::render::mesh::MeshVertexBufferLayoutRef,
            _key: bevy::pbr::MaterialPipelineKey<Self>,
        ) -> Result<(), SpecializedMeshPipelineError> {
        descriptor.primitive.cull_mode = Some(Face::Front);
        Ok(())
    }
}

/// writes one uniform value into both materials, so the two copies can never diverge
pub fn apply_shading(
    shading: ShadingUniform,
    earth: &mut EarthMaterial,
    atmosphere: &mut AtmosphereMaterial,
) {
    earth.shading = shading;
    atmosphere.shading = shading;
}
