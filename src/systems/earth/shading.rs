//! shading.rs
//!
//! CPU version of assets/shaders/earth.wgsl and assets/shaders/atmosphere.wgsl.
//! Same math line for line, used by the snapshot renderer and the tests.
//! Change one, change the other.
//!
//! Conventions: every vector is world space and unit length, `view` points from the
//! surface toward the camera, colors are linear rgb.

use bevy::prelude::*;

use super::materials::ShadingUniform;
use super::textures::{TextureSampler, TextureSet};

// how far into the night side the atmosphere color still reaches
const ATMOSPHERE_MIX_EDGES: (f32, f32) = (-0.5, 1.0);
// atmosphere shell fades out past this much night
const ATMOSPHERE_ALPHA_EDGES: (f32, f32) = (-0.5, 0.0);
// cloud mask values below this are clear sky
const CLOUD_EDGES: (f32, f32) = (0.5, 1.0);
// clouds on the night side are barely visible
const NIGHT_CLOUD_LEVEL: f32 = 0.04;
const SURFACE_FRESNEL_POWER: i32 = 2;

/// glsl smoothstep. Exactly 0 below edge0 and exactly 1 above edge1
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// glsl reflect, `incident` points toward the surface
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// weight of the day texture, 0 on the night side, 1 on the day side
pub fn day_mix(sun_orientation: f32, blend_width: f32) -> f32 {
    smoothstep(-blend_width, blend_width, sun_orientation)
}

/// twilight (0) to daylight (1) blend for the atmosphere color
pub fn atmosphere_mix(sun_orientation: f32) -> f32 {
    smoothstep(ATMOSPHERE_MIX_EDGES.0, ATMOSPHERE_MIX_EDGES.1, sun_orientation)
}

pub fn atmosphere_color(shading: &ShadingUniform, sun_orientation: f32) -> Vec3 {
    shading
        .twilight_color
        .lerp(shading.day_color, atmosphere_mix(sun_orientation))
}

// dot products drift slightly past 1 for unit vectors, clamp before any pow
fn clamped_dot(a: Vec3, b: Vec3) -> f32 {
    let d = a.dot(b);
    if d.is_nan() { 0.0 } else { d.clamp(-1.0, 1.0) }
}

/// sun reflection intensity. Scaled by `day_mix`, so it is exactly zero on the night side
pub fn specular(
    normal: Vec3,
    view: Vec3,
    sun_direction: Vec3,
    shininess: f32,
    mask: f32,
    day_mix: f32,
) -> f32 {
    let reflection = reflect(-sun_direction, normal);
    let highlight = clamped_dot(reflection, view).max(0.0).powf(shininess);
    highlight * mask.clamp(0.0, 1.0) * day_mix
}

/// the planet body
pub struct SurfaceShader<'a, S> {
    pub textures: &'a TextureSet<S>,
    pub shading: &'a ShadingUniform,
}

impl<S: TextureSampler> SurfaceShader<'_, S> {
    pub fn shade(&self, normal: Vec3, uv: Vec2, view: Vec3) -> Vec4 {
        let normal = normal.normalize_or_zero();
        let view = view.normalize_or_zero();
        let sample = self.textures.sample(uv);

        // day / night
        let sun_orientation = clamped_dot(normal, self.shading.sun_direction);
        let day_mix = day_mix(sun_orientation, self.shading.blend_width);
        let mut color = sample.night.lerp(sample.day, day_mix);

        // clouds
        let cloud_mix = smoothstep(CLOUD_EDGES.0, CLOUD_EDGES.1, sample.clouds);
        let cloud_color = Vec3::splat(NIGHT_CLOUD_LEVEL).lerp(Vec3::ONE, day_mix);
        color = color.lerp(cloud_color, cloud_mix);

        // twilight rim
        let fresnel = (1.0 - clamped_dot(normal, view).max(0.0)).powi(SURFACE_FRESNEL_POWER);
        let atmosphere_mix = atmosphere_mix(sun_orientation);
        let atmosphere_color = atmosphere_color(self.shading, sun_orientation);
        color = color.lerp(atmosphere_color, fresnel * atmosphere_mix);

        // specular
        let specular = specular(
            normal,
            view,
            self.shading.sun_direction,
            self.shading.shininess,
            sample.specular,
            day_mix,
        );
        let specular_color = Vec3::ONE.lerp(atmosphere_color, fresnel);
        color += specular * specular_color;

        color.extend(1.0)
    }
}

/// the glow shell, drawn back faces only over the body
pub struct AtmosphereShader<'a> {
    pub shading: &'a ShadingUniform,
}

impl AtmosphereShader<'_> {
    /// rim term, 0 looking straight at the surface and 1 at the silhouette
    pub fn fresnel(&self, normal: Vec3, view: Vec3) -> f32 {
        // back faces see the normal pointing away, only the angle matters
        let facing = clamped_dot(normal, view).abs();
        (1.0 - facing).powf(self.shading.fresnel_power)
    }

    pub fn shade(&self, normal: Vec3, view: Vec3) -> Vec4 {
        let normal = normal.normalize_or_zero();
        let view = view.normalize_or_zero();

        let sun_orientation = clamped_dot(normal, self.shading.sun_direction);
        let color = atmosphere_color(self.shading, sun_orientation);

        let day_alpha = smoothstep(ATMOSPHERE_ALPHA_EDGES.0, ATMOSPHERE_ALPHA_EDGES.1, sun_orientation);
        let alpha = self.fresnel(normal, view) * day_alpha;

        color.extend(alpha)
    }
}
