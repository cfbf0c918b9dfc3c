//! Renders a single frame to a PNG without a window or GPU.

use std::path::PathBuf;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use bevy_earthglow::config::{
    ATMOSPHERE_DAY_COLOR, ATMOSPHERE_TWILIGHT_COLOR, SUN_AZIMUTH, SUN_POLAR,
};
use bevy_earthglow::snapshot::{self, SnapshotCamera, SnapshotError, SnapshotScene};
use bevy_earthglow::systems::earth::materials::{ShadingSettings, ShadingUniform};
use bevy_earthglow::systems::earth::textures::TextureSet;
use bevy_earthglow::systems::params::EarthParameters;
use bevy_earthglow::systems::sun::SunSpherical;
use bevy_earthglow::systems::time::RotationState;

#[derive(Parser, Resource, Debug, Clone)]
#[command(name = "snapshot", about = "Render one earth frame to a PNG")]
struct Args {
    /// where to write the image
    #[arg(short, long, default_value = "snapshot.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 960)]
    width: u32,

    #[arg(long, default_value_t = 540)]
    height: u32,

    /// seconds since start, decides the earth rotation
    #[arg(long, default_value_t = 0.0)]
    elapsed: f32,

    /// sun polar angle in radians, measured from +y
    #[arg(long, default_value_t = SUN_POLAR, allow_negative_numbers = true)]
    polar: f32,

    /// sun azimuth in radians, measured from +z toward +x
    #[arg(long, default_value_t = SUN_AZIMUTH, allow_negative_numbers = true)]
    azimuth: f32,

    /// directory holding textures/earth
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    #[arg(long, default_value = ATMOSPHERE_DAY_COLOR)]
    day_color: String,

    #[arg(long, default_value = ATMOSPHERE_TWILIGHT_COLOR)]
    twilight_color: String,
}

fn main() -> AppExit {
    let args = Args::parse();

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_once()))
        .add_plugins(LogPlugin::default())
        .insert_resource(args)
        .add_systems(Startup, render_snapshot)
        .run()
}

fn render_snapshot(args: Res<Args>, mut exit: EventWriter<AppExit>) {
    if let Err(e) = render(&args) {
        error!("{e}");
        exit.write(AppExit::error());
    }
}

fn render(args: &Args) -> Result<(), SnapshotError> {
    let parameters = EarthParameters::from_hex(&args.day_color, &args.twilight_color);

    let sun = SunSpherical::new(args.polar, args.azimuth);
    let textures = TextureSet::open_or_placeholder(&args.assets);

    let scene = SnapshotScene {
        textures: &textures,
        shading: ShadingUniform::new(&sun, &parameters, &ShadingSettings::default()),
        earth_rotation: RotationState::at(args.elapsed).rotation(),
        camera: SnapshotCamera::default(),
        background: snapshot::default_background(),
    };

    info!(
        "rendering {}x{} at t = {}s, sun ({:.3}, {:.3})",
        args.width,
        args.height,
        args.elapsed,
        sun.polar(),
        sun.azimuth()
    );

    let image = scene.render(args.width, args.height)?;
    snapshot::save(&image, &args.output)?;

    info!("wrote {}", args.output.display());
    Ok(())
}
