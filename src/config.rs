use std::f32::consts::PI;

// Earth measurements (scene units)
pub const EARTH_RADIUS: f32 = 2.0;
pub const EARTH_SEGMENTS: u32 = 64;
pub const ATMOSPHERE_SCALE: f32 = 1.025;

// Rotation speeds (radians per second)
pub const EARTH_ROTATION_SPEED: f32 = 0.1;

// Asset paths
pub const EARTH_DAY_TEXTURE: &str = "textures/earth/day.jpg";
pub const EARTH_NIGHT_TEXTURE: &str = "textures/earth/night.jpg";
pub const EARTH_SPECULAR_CLOUDS_TEXTURE: &str = "textures/earth/specularClouds.jpg";
pub const EARTH_SHADER: &str = "shaders/earth.wgsl";
pub const ATMOSPHERE_SHADER: &str = "shaders/atmosphere.wgsl";

// cube faces, ordered +x -x +y -y +z -z
pub const ENVIRONMENT_FACES: [&str; 6] = [
    "textures/environment/px.png",
    "textures/environment/nx.png",
    "textures/environment/py.png",
    "textures/environment/ny.png",
    "textures/environment/pz.png",
    "textures/environment/nz.png",
];
pub const FLARE_TEXTURES: [&str; 2] = [
    "textures/lensflare/lensflare0.png",
    "textures/lensflare/lensflare1.png",
];

// texture sampling quality
pub const TEXTURE_ANISOTROPY: u16 = 8;

// default atmosphere colors
pub const ATMOSPHERE_DAY_COLOR: &str = "#00aaff";
pub const ATMOSPHERE_TWILIGHT_COLOR: &str = "#ff6600";

// shading constants
pub const DAY_NIGHT_BLEND_WIDTH: f32 = 0.25;
pub const SPECULAR_SHININESS: f32 = 32.0;
pub const ATMOSPHERE_FRESNEL_POWER: f32 = 2.0;

// sun, spherical coordinates around +y
pub const SUN_POLAR: f32 = PI * 0.5;
pub const SUN_AZIMUTH: f32 = 0.5;
// keep the sun off the poles
pub const SUN_POLAR_MIN: f32 = 0.05;
pub const SUN_POLAR_MAX: f32 = PI - 0.05;
pub const SUN_MARKER_DISTANCE: f32 = 5.0;
pub const FLARE_DISTANCE: f32 = 30.0;

// camera
pub const CAMERA_POSITION: [f32; 3] = [12.0, 5.0, 4.0];
pub const CAMERA_FOV_DEGREES: f32 = 25.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_DAMPING: f32 = 0.05;
// zoom range, the far end stays well inside the far plane
pub const CAMERA_MIN_DISTANCE: f32 = 3.0;
pub const CAMERA_MAX_DISTANCE: f32 = 60.0;

// window
pub const CLEAR_COLOR: &str = "#000011";
pub const MAX_PIXEL_RATIO: f32 = 2.0;
