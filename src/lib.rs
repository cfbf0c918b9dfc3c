//! Earth with day/night textures, specular oceans, clouds and a fresnel atmosphere glow,
//! lit by a sun you can move around.

pub mod config;
pub mod snapshot;
pub mod systems;
