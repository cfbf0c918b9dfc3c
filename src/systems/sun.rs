//! sun.rs
//!
//! Where the sun is. Two spherical angles around +y, converted once per change into the
//! direction every shader reads.

use std::f32::consts::PI;

use bevy::prelude::*;

use crate::config::{SUN_AZIMUTH, SUN_MARKER_DISTANCE, SUN_POLAR, SUN_POLAR_MAX, SUN_POLAR_MIN};

pub struct SunPlugin {
    pub polar: f32,
    pub azimuth: f32,
}

impl Default for SunPlugin {
    fn default() -> Self {
        Self {
            polar: SUN_POLAR,
            azimuth: SUN_AZIMUTH,
        }
    }
}

impl Plugin for SunPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SunSpherical::new(self.polar, self.azimuth))
            .add_systems(Startup, spawn_marker)
            .add_systems(Update, update_marker.run_if(resource_changed::<SunSpherical>));
    }
}

/// spherical sun position, radius is always 1 so the direction is unit length
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SunSpherical {
    polar: f32,
    azimuth: f32,
    direction: Vec3,
}

impl Default for SunSpherical {
    fn default() -> Self {
        Self::new(SUN_POLAR, SUN_AZIMUTH)
    }
}

impl SunSpherical {
    pub fn new(polar: f32, azimuth: f32) -> Self {
        let mut sun = Self {
            polar: SUN_POLAR,
            azimuth: SUN_AZIMUTH,
            direction: Vec3::ZERO,
        };
        sun.set_angles(polar, azimuth);
        sun
    }

    /// out of range angles are clamped, never rejected
    /// polar stays off the poles, azimuth in [-pi, pi]
    pub fn set_angles(&mut self, polar: f32, azimuth: f32) {
        if polar.is_finite() {
            self.polar = polar.clamp(SUN_POLAR_MIN, SUN_POLAR_MAX);
        }
        if azimuth.is_finite() {
            self.azimuth = azimuth.clamp(-PI, PI);
        }
        self.direction = spherical_to_direction(self.polar, self.azimuth);
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }
}

// y is up, azimuth starts at +z and turns toward +x
// https://en.wikipedia.org/wiki/Spherical_coordinate_system#Cartesian_coordinates
pub fn spherical_to_direction(polar: f32, azimuth: f32) -> Vec3 {
    let (sin_polar, cos_polar) = polar.sin_cos();
    let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();

    Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth)
}

// debug marker tag, sits on the sun direction
#[derive(Component)]
pub struct SunMarker;

fn spawn_marker(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sun: Res<SunSpherical>,
) {
    let mesh = match Sphere::new(0.1).mesh().ico(2) {
        Ok(mesh) => mesh,
        Err(e) => {
            warn!("sun marker mesh failed: {e}");
            return;
        }
    };

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::from_translation(sun.direction() * SUN_MARKER_DISTANCE),
        SunMarker,
    ));
}

fn update_marker(sun: Res<SunSpherical>, mut marker_query: Query<&mut Transform, With<SunMarker>>) {
    for mut transform in marker_query.iter_mut() {
        transform.translation = sun.direction() * SUN_MARKER_DISTANCE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_unit_length() {
        for i in 0..=32 {
            for j in 0..=32 {
                let polar = PI * i as f32 / 32.0;
                let azimuth = -PI + 2.0 * PI * j as f32 / 32.0;
                let direction = spherical_to_direction(polar, azimuth);
                assert!(
                    (direction.length() - 1.0).abs() < 1e-5,
                    "polar {polar} azimuth {azimuth} gave {direction}"
                );

                let sun = SunSpherical::new(polar, azimuth);
                assert!((sun.direction().length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_equator_scenarios() {
        let front = SunSpherical::new(PI * 0.5, 0.0).direction();
        assert!(front.distance(Vec3::Z) < 1e-6);

        let back = SunSpherical::new(PI * 0.5, PI).direction();
        assert!(back.distance(Vec3::NEG_Z) < 1e-6);

        let side = SunSpherical::new(PI * 0.5, PI * 0.5).direction();
        assert!(side.distance(Vec3::X) < 1e-6);
    }

    #[test]
    fn test_angles_are_clamped() {
        let mut sun = SunSpherical::default();
        sun.set_angles(-1.0, 10.0);
        assert_eq!(sun.polar(), SUN_POLAR_MIN);
        assert_eq!(sun.azimuth(), PI);

        sun.set_angles(4.0, -10.0);
        assert_eq!(sun.polar(), SUN_POLAR_MAX);
        assert_eq!(sun.azimuth(), -PI);
        assert!(sun.direction().is_normalized());
    }

    #[test]
    fn test_non_finite_angles_keep_previous_value() {
        let mut sun = SunSpherical::new(1.0, 0.5);
        let before = sun;
        sun.set_angles(f32::NAN, f32::INFINITY);
        assert_eq!(sun, before);
    }

    #[test]
    fn test_set_angles_is_idempotent() {
        let mut sun = SunSpherical::default();
        sun.set_angles(1.234, -0.567);
        let first = sun.direction();
        sun.set_angles(1.234, -0.567);
        let second = sun.direction();

        assert_eq!(first.x.to_bits(), second.x.to_bits());
        assert_eq!(first.y.to_bits(), second.y.to_bits());
        assert_eq!(first.z.to_bits(), second.z.to_bits());
    }

    #[test]
    fn test_marker_follows_sun() {
        let mut app = App::new();
        app.insert_resource(SunSpherical::new(PI * 0.5, 0.0))
            .add_systems(Update, update_marker.run_if(resource_changed::<SunSpherical>));
        let marker = app.world_mut().spawn((Transform::default(), SunMarker)).id();

        app.update();
        let translation = app.world().get::<Transform>(marker).unwrap().translation;
        assert!(translation.distance(Vec3::Z * SUN_MARKER_DISTANCE) < 1e-5);

        app.world_mut().resource_mut::<SunSpherical>().set_angles(PI * 0.5, PI * 0.5);
        app.update();
        let translation = app.world().get::<Transform>(marker).unwrap().translation;
        assert!(translation.distance(Vec3::X * SUN_MARKER_DISTANCE) < 1e-5);
    }
}
