use bevy::asset::AssetLoadFailedEvent;
use bevy::prelude::*;

pub mod materials;
pub mod mesh;
pub mod shading;
pub mod textures;

use materials::{apply_shading, AtmosphereMaterial, EarthMaterial, ShadingSettings, ShadingUniform};
use textures::EarthTextures;
use crate::config::ATMOSPHERE_SCALE;
use crate::systems::params::EarthParameters;
use crate::systems::sun::SunSpherical;

pub struct EarthPlugin;

impl Plugin for EarthPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<EarthMaterial>::default())
            .add_plugins(MaterialPlugin::<AtmosphereMaterial>::default())
            .init_resource::<EarthParameters>()
            .init_resource::<ShadingSettings>()
            .add_systems(Startup, start)
            .add_systems(Update, (
                sync_shading
                    .in_set(ShadingSync)
                    .run_if(shading_inputs_changed),
                report_texture_failures,
            ));
    }
}

/// anything that writes sun angles or colors must run before this set,
/// so both materials are updated in the same frame as the change
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShadingSync;

// earth body tag
#[derive(Component)]
pub struct Earth;

// atmosphere tag
#[derive(Component)]
pub struct Atmosphere;

fn start(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut earth_materials: ResMut<Assets<EarthMaterial>>,
    mut atmosphere_materials: ResMut<Assets<AtmosphereMaterial>>,
    asset_server: Res<AssetServer>,
    sun: Res<SunSpherical>,
    parameters: Res<EarthParameters>,
    settings: Res<ShadingSettings>,
) {
    let textures = EarthTextures::load(&asset_server);
    let shading = ShadingUniform::new(&sun, &parameters, &settings);

    // both bodies share one sphere, the shell is just scaled up
    let sphere = meshes.add(mesh::earth_mesh());

    commands.spawn((
        Mesh3d(sphere.clone()),
        MeshMaterial3d(earth_materials.add(EarthMaterial::new(&textures, shading))),
        Transform::default(),
        Earth,
    ));

    // not parented to the earth, the shell has nothing on it that could show rotation
    commands.spawn((
        Mesh3d(sphere),
        MeshMaterial3d(atmosphere_materials.add(AtmosphereMaterial { shading })),
        Transform::from_scale(Vec3::splat(ATMOSPHERE_SCALE)),
        Atmosphere,
    ));

    info!(
        "earth spawned, sun direction {:.3}, day {}, twilight {}",
        shading.sun_direction,
        parameters.atmosphere_day_color().to_hex(),
        parameters.atmosphere_twilight_color().to_hex(),
    );

    commands.insert_resource(textures);
}

fn shading_inputs_changed(
    sun: Res<SunSpherical>,
    parameters: Res<EarthParameters>,
    settings: Res<ShadingSettings>,
) -> bool {
    sun.is_changed() || parameters.is_changed() || settings.is_changed()
}

// push sun + colors into both materials from one uniform value
pub fn sync_shading(
    sun: Res<SunSpherical>,
    parameters: Res<EarthParameters>,
    settings: Res<ShadingSettings>,
    earth_query: Query<&MeshMaterial3d<EarthMaterial>, With<Earth>>,
    atmosphere_query: Query<&MeshMaterial3d<AtmosphereMaterial>, With<Atmosphere>>,
    mut earth_materials: ResMut<Assets<EarthMaterial>>,
    mut atmosphere_materials: ResMut<Assets<AtmosphereMaterial>>,
) {
    let shading = ShadingUniform::new(&sun, &parameters, &settings);

    let (Ok(earth_handle), Ok(atmosphere_handle)) = (earth_query.single(), atmosphere_query.single()) else {
        return; // nothing spawned yet
    };

    let (Some(earth), Some(atmosphere)) = (
        earth_materials.get_mut(&earth_handle.0),
        atmosphere_materials.get_mut(&atmosphere_handle.0),
    ) else {
        warn!("earth or atmosphere material missing, shading not updated");
        return;
    };

    apply_shading(shading, earth, atmosphere);
    debug!("shading synced, sun direction {:.3}", shading.sun_direction);
}

// a missing texture is not fatal, the earth just renders with bevy's fallback
fn report_texture_failures(
    mut failures: EventReader<AssetLoadFailedEvent<Image>>,
    textures: Option<Res<EarthTextures>>,
) {
    for failure in failures.read() {
        let is_earth_texture = textures
            .as_ref()
            .is_some_and(|t| t.handles().iter().any(|h| h.id() == failure.id));

        if is_earth_texture {
            warn!("earth texture {} failed to load: {}", failure.path, failure.error);
        } else {
            warn!("texture {} failed to load: {}", failure.path, failure.error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<Assets<EarthMaterial>>()
            .init_resource::<Assets<AtmosphereMaterial>>()
            .init_resource::<EarthParameters>()
            .init_resource::<ShadingSettings>()
            .insert_resource(SunSpherical::default())
            .add_systems(Update, sync_shading.in_set(ShadingSync).run_if(shading_inputs_changed));

        let stale = ShadingUniform {
            sun_direction: Vec3::Y,
            ..default()
        };
        let earth = app
            .world_mut()
            .resource_mut::<Assets<EarthMaterial>>()
            .add(EarthMaterial {
                day_texture: Handle::default(),
                night_texture: Handle::default(),
                specular_clouds_texture: Handle::default(),
                shading: stale,
            });
        let atmosphere = app
            .world_mut()
            .resource_mut::<Assets<AtmosphereMaterial>>()
            .add(AtmosphereMaterial { shading: stale });

        app.world_mut().spawn((MeshMaterial3d(earth), Earth));
        app.world_mut().spawn((MeshMaterial3d(atmosphere), Atmosphere));
        app
    }

    fn uniforms(app: &mut App) -> (ShadingUniform, ShadingUniform) {
        let world = app.world_mut();
        let earth_handle = world
            .query_filtered::<&MeshMaterial3d<EarthMaterial>, With<Earth>>()
            .single(world)
            .unwrap()
            .0
            .clone();
        let atmosphere_handle = world
            .query_filtered::<&MeshMaterial3d<AtmosphereMaterial>, With<Atmosphere>>()
            .single(world)
            .unwrap()
            .0
            .clone();

        let earth = world.resource::<Assets<EarthMaterial>>().get(&earth_handle).unwrap().shading;
        let atmosphere = world
            .resource::<Assets<AtmosphereMaterial>>()
            .get(&atmosphere_handle)
            .unwrap()
            .shading;
        (earth, atmosphere)
    }

    #[test]
    fn test_first_frame_pushes_current_state() {
        let mut app = test_app();
        app.update();

        let (earth, atmosphere) = uniforms(&mut app);
        assert_eq!(earth, atmosphere);
        assert_eq!(earth.sun_direction, SunSpherical::default().direction());
    }

    #[test]
    fn test_color_change_reaches_both_materials() {
        let mut app = test_app();
        app.update();

        app.world_mut()
            .resource_mut::<EarthParameters>()
            .set_atmosphere_day_color(Color::srgb(0.9, 0.1, 0.3));
        app.update();

        let expected = app.world().resource::<EarthParameters>().atmosphere_day_linear();
        let (earth, atmosphere) = uniforms(&mut app);
        assert_eq!(earth.day_color, expected);
        assert_eq!(atmosphere.day_color, expected);
        assert_eq!(earth, atmosphere);
    }

    #[test]
    fn test_sun_change_reaches_both_materials() {
        let mut app = test_app();
        app.update();

        app.world_mut().resource_mut::<SunSpherical>().set_angles(0.7, -2.5);
        app.update();

        let expected = app.world().resource::<SunSpherical>().direction();
        let (earth, atmosphere) = uniforms(&mut app);
        assert_eq!(earth.sun_direction, expected);
        assert_eq!(atmosphere.sun_direction, expected);
        assert_eq!(earth.twilight_color, atmosphere.twilight_color);
    }

    #[test]
    fn test_nothing_written_without_changes() {
        let mut app = test_app();
        app.update();

        // tamper with one copy, no input changed so sync must not run
        let world = app.world_mut();
        let handle = world
            .query_filtered::<&MeshMaterial3d<AtmosphereMaterial>, With<Atmosphere>>()
            .single(world)
            .unwrap()
            .0
            .clone();
        world
            .resource_mut::<Assets<AtmosphereMaterial>>()
            .get_mut(&handle)
            .unwrap()
            .shading
            .fresnel_power = 9.0;

        app.update();
        let (_, atmosphere) = uniforms(&mut app);
        assert_eq!(atmosphere.fresnel_power, 9.0);
    }
}
