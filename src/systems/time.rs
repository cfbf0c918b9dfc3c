//! time.rs
//!
//! Per frame rotation of the earth. The angle is a pure function of elapsed time, so any
//! frame can be reproduced from its timestamp (the snapshot renderer does exactly that).

use bevy::prelude::*;

use crate::config::EARTH_ROTATION_SPEED;
use crate::systems::earth::Earth;

pub struct FrameLoopPlugin;

impl Plugin for FrameLoopPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(RotationState::default())
           .add_systems(Update, (advance, rotate_earth).chain());
    }
}

/// accumulated earth rotation about +y, only ever grows
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub angle: f32,
}

impl RotationState {
    pub fn at(elapsed_secs: f32) -> Self {
        Self {
            angle: elapsed_secs.max(0.0) * EARTH_ROTATION_SPEED,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.angle)
    }
}

fn advance(
    mut rotation: ResMut<RotationState>,
    time: Res<Time>,
) {
    let next = RotationState::at(time.elapsed_secs());

    // virtual time never goes back, but keep the angle monotonic regardless
    if next.angle > rotation.angle {
        *rotation = next;
    }
}

// the atmosphere shell is left alone on purpose
fn rotate_earth(
    rotation: Res<RotationState>,
    mut earth_query: Query<&mut Transform, With<Earth>>,
) {
    if let Ok(mut transform) = earth_query.single_mut() {
        transform.rotation = rotation.rotation();
    }
}
