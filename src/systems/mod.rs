pub mod camera;
pub mod decorations;
pub mod earth;
pub mod params;
pub mod sun;
pub mod time;
pub mod ui;
pub mod viewport;
