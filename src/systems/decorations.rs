//! decorations.rs
//!
//! Optional extras around the earth: a cube map background and a lens flare that sits on
//! the sun. Neither touches the earth or atmosphere shading.

use bevy::asset::LoadState;
use bevy::core_pipeline::Skybox;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureViewDescriptor, TextureViewDimension,
};

use crate::config::{ENVIRONMENT_FACES, FLARE_DISTANCE, FLARE_TEXTURES};
use crate::systems::sun::SunSpherical;

/// which decorations the scene carries
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneDecorations {
    pub environment: bool,
    pub flare: bool,
}

impl Default for SceneDecorations {
    fn default() -> Self {
        Self {
            environment: true,
            flare: true,
        }
    }
}

pub struct DecorationsPlugin(pub SceneDecorations);

impl Plugin for DecorationsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.0)
            .add_systems(Startup, start)
            .add_systems(Update, (
                assemble_environment.run_if(resource_exists::<EnvironmentFaces>),
                place_flare,
            ));
    }
}

// cube faces waiting to load, removed once the skybox is built
#[derive(Resource)]
struct EnvironmentFaces {
    faces: [Handle<Image>; 6],
}

// flare billboard, `offset` slides it along the sun line toward the camera
#[derive(Component)]
pub struct FlareElement {
    pub offset: f32,
}

fn start(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    decorations: Res<SceneDecorations>,
) {
    if decorations.environment {
        commands.insert_resource(EnvironmentFaces {
            faces: ENVIRONMENT_FACES.map(|path| asset_server.load(path)),
        });
    }

    if decorations.flare {
        // (texture, size, offset toward the camera)
        let elements = [(FLARE_TEXTURES[0], 8.0, 0.0), (FLARE_TEXTURES[1], 3.0, 0.2)];

        for (path, size, offset) in elements {
            commands.spawn((
                Mesh3d(meshes.add(Rectangle::new(size, size))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color_texture: Some(asset_server.load(path)),
                    unlit: true,
                    alpha_mode: AlphaMode::Add,
                    cull_mode: None,
                    ..default()
                })),
                Transform::default(),
                FlareElement { offset },
            ));
        }
    }

    info!(
        "scene decorations: environment {}, flare {}",
        decorations.environment, decorations.flare
    );
}

/// stacks six equally sized 2d images into one cube texture, +x -x +y -y +z -z
pub fn stack_cube_faces(faces: [&Image; 6]) -> Option<Image> {
    let first = faces[0];
    let size = first.texture_descriptor.size;
    let format = first.texture_descriptor.format;

    let mut data = Vec::new();
    for face in faces {
        let descriptor = &face.texture_descriptor;
        if descriptor.size != size || descriptor.format != format {
            return None;
        }
        data.extend_from_slice(face.data.as_ref()?);
    }

    let mut cube = Image::new(
        Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 6,
        },
        TextureDimension::D2,
        data,
        format,
        RenderAssetUsages::RENDER_WORLD,
    );
    cube.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });

    Some(cube)
}

// build the skybox once all faces are in
fn assemble_environment(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    asset_server: Res<AssetServer>,
    pending: Res<EnvironmentFaces>,
    camera_query: Query<Entity, With<Camera3d>>,
) {
    if pending.faces.iter().any(|face| matches!(asset_server.load_state(face), LoadState::Failed(_))) {
        warn!("environment map failed to load, continuing without background");
        commands.remove_resource::<EnvironmentFaces>();
        return;
    }

    let faces: Vec<&Image> = pending.faces.iter().filter_map(|face| images.get(face)).collect();
    let Ok(faces) = <[&Image; 6]>::try_from(faces) else {
        return; // wait for the rest
    };

    let Some(cube) = stack_cube_faces(faces) else {
        warn!("environment faces differ in size or format, continuing without background");
        commands.remove_resource::<EnvironmentFaces>();
        return;
    };

    let cube = images.add(cube);
    for camera in camera_query.iter() {
        commands.entity(camera).insert(Skybox {
            image: cube.clone(),
            brightness: 1000.0,
            rotation: Quat::IDENTITY,
        });
    }

    info!("environment map ready");
    commands.remove_resource::<EnvironmentFaces>();
}

// keep the flare on the sun line, facing the camera
fn place_flare(
    sun: Res<SunSpherical>,
    camera_query: Query<&Transform, (With<Camera3d>, Without<FlareElement>)>,
    mut flare_query: Query<(&mut Transform, &FlareElement)>,
) {
    let Ok(camera) = camera_query.single() else {
        return;
    };

    let sun_position = sun.direction() * FLARE_DISTANCE;
    for (mut transform, element) in flare_query.iter_mut() {
        transform.translation = sun_position.lerp(camera.translation, element.offset);
        transform.look_at(camera.translation, Vec3::Y);
    }
}
