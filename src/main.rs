use bevy::prelude::*;
use clap::Parser;

use bevy_earthglow::config::{
    ATMOSPHERE_DAY_COLOR, ATMOSPHERE_TWILIGHT_COLOR, CLEAR_COLOR, SUN_AZIMUTH, SUN_POLAR,
};
use bevy_earthglow::systems::camera::OrbitCamPlugin;
use bevy_earthglow::systems::decorations::{DecorationsPlugin, SceneDecorations};
use bevy_earthglow::systems::earth::EarthPlugin;
use bevy_earthglow::systems::params::{parse_hex_color, EarthParameters};
use bevy_earthglow::systems::sun::SunPlugin;
use bevy_earthglow::systems::time::FrameLoopPlugin;
use bevy_earthglow::systems::ui::ParameterPanelPlugin;
use bevy_earthglow::systems::viewport::ViewportPlugin;

/// Earth with a movable sun and an atmosphere glow
#[derive(Parser, Debug)]
#[command(name = "bevy_earthglow")]
struct Args {
    /// initial sun polar angle in radians, measured from +y
    #[arg(long, default_value_t = SUN_POLAR, allow_negative_numbers = true)]
    polar: f32,

    /// initial sun azimuth in radians, measured from +z toward +x
    #[arg(long, default_value_t = SUN_AZIMUTH, allow_negative_numbers = true)]
    azimuth: f32,

    /// initial atmosphere day color, "#rrggbb"
    #[arg(long, default_value = ATMOSPHERE_DAY_COLOR)]
    day_color: String,

    /// initial atmosphere twilight color, "#rrggbb"
    #[arg(long, default_value = ATMOSPHERE_TWILIGHT_COLOR)]
    twilight_color: String,

    /// skip the cube map background
    #[arg(long)]
    no_environment: bool,

    /// skip the lens flare
    #[arg(long)]
    no_flare: bool,
}

fn main() -> AppExit {
    let args = Args::parse();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "earth".into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(parse_hex_color(CLEAR_COLOR, Srgba::BLACK).into()))
        .insert_resource(EarthParameters::from_hex(&args.day_color, &args.twilight_color))
        .add_plugins(SunPlugin {
            polar: args.polar,
            azimuth: args.azimuth,
        })
        .add_plugins(EarthPlugin)
        .add_plugins(FrameLoopPlugin)
        .add_plugins(OrbitCamPlugin)
        .add_plugins(ParameterPanelPlugin)
        .add_plugins(ViewportPlugin)
        .add_plugins(DecorationsPlugin(SceneDecorations {
            environment: !args.no_environment,
            flare: !args.no_flare,
        }))
        .run()
}
