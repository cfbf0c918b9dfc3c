//! params.rs
//!
//! Tweakable atmosphere colors. Single source of truth, the earth plugin pushes
//! every change into both materials.

use bevy::prelude::*;

use crate::config::{ATMOSPHERE_DAY_COLOR, ATMOSPHERE_TWILIGHT_COLOR};

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct EarthParameters {
    atmosphere_day_color: Srgba,
    atmosphere_twilight_color: Srgba,
}

impl Default for EarthParameters {
    fn default() -> Self {
        Self {
            atmosphere_day_color: parse_hex_color(ATMOSPHERE_DAY_COLOR, Srgba::rgb(0.0, 0.67, 1.0)),
            atmosphere_twilight_color: parse_hex_color(
                ATMOSPHERE_TWILIGHT_COLOR,
                Srgba::rgb(1.0, 0.4, 0.0),
            ),
        }
    }
}

impl EarthParameters {
    /// both colors from "#rrggbb", each one falls back to its default on garbage
    pub fn from_hex(day: &str, twilight: &str) -> Self {
        let defaults = Self::default();
        Self {
            atmosphere_day_color: parse_hex_color(day, defaults.atmosphere_day_color),
            atmosphere_twilight_color: parse_hex_color(twilight, defaults.atmosphere_twilight_color),
        }
    }

    pub fn atmosphere_day_color(&self) -> Srgba {
        self.atmosphere_day_color
    }

    pub fn atmosphere_twilight_color(&self) -> Srgba {
        self.atmosphere_twilight_color
    }

    pub fn set_atmosphere_day_color(&mut self, color: impl Into<Color>) {
        self.atmosphere_day_color = clamp_color(color.into());
    }

    pub fn set_atmosphere_twilight_color(&mut self, color: impl Into<Color>) {
        self.atmosphere_twilight_color = clamp_color(color.into());
    }

    /// day color as the shaders see it
    pub fn atmosphere_day_linear(&self) -> Vec3 {
        to_linear_vec3(self.atmosphere_day_color)
    }

    pub fn atmosphere_twilight_linear(&self) -> Vec3 {
        to_linear_vec3(self.atmosphere_twilight_color)
    }
}

// channels outside [0, 1] get clamped, alpha is ignored
fn clamp_color(color: Color) -> Srgba {
    let srgba = color.to_srgba();
    let clamp = |channel: f32| {
        if channel.is_nan() { 0.0 } else { channel.clamp(0.0, 1.0) }
    };

    Srgba::rgb(clamp(srgba.red), clamp(srgba.green), clamp(srgba.blue))
}

fn to_linear_vec3(color: Srgba) -> Vec3 {
    let linear = LinearRgba::from(color);
    Vec3::new(linear.red, linear.green, linear.blue)
}

/// parses "#rrggbb", falls back (and says so) on garbage
pub fn parse_hex_color(hex: &str, fallback: Srgba) -> Srgba {
    match Srgba::hex(hex) {
        Ok(color) => clamp_color(color.into()),
        Err(e) => {
            warn!("invalid color {hex:?}: {e:?}, using {}", fallback.to_hex());
            fallback
        }
    }
}
