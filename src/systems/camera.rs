use bevy::prelude::*;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::MouseWheel;
use bevy::render::camera::PerspectiveProjection;

use crate::config::{
    CAMERA_DAMPING, CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE,
    CAMERA_NEAR, CAMERA_POSITION,
};

pub struct OrbitCamPlugin;

impl Plugin for OrbitCamPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, update);
    }
}

// camera component
// the goal_* fields follow the mouse, the current values ease toward them every frame
#[derive(Component, Debug)]
pub struct OrbitCamera {
    pub radius: f32,
    pub speed: f32,
    pub angle: f32,
    pub v_angle: f32,
    pub is_dragging: bool,
    pub target: Vec3,

    pub goal_radius: f32,
    pub goal_angle: f32,
    pub goal_v_angle: f32,
    pub damping: f32,

    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 15.0,
            speed: 0.5,
            angle: 0.0,
            v_angle: 0.3,
            is_dragging: false,
            target: Vec3::ZERO,

            goal_radius: 15.0,
            goal_angle: 0.0,
            goal_v_angle: 0.3,
            damping: CAMERA_DAMPING,

            min_radius: CAMERA_MIN_DISTANCE,
            max_radius: CAMERA_MAX_DISTANCE,
        }
    }
}

impl OrbitCamera {
    /// starts at `position`, orbiting `target`
    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length().max(f32::EPSILON);
        let v_angle = (offset.y / radius).clamp(-1.0, 1.0).asin();
        let angle = offset.z.atan2(offset.x);

        Self {
            radius,
            angle,
            v_angle,
            target,
            goal_radius: radius,
            goal_angle: angle,
            goal_v_angle: v_angle,
            ..default()
        }
    }

    // allow custom zoom limits
    pub fn with_zoom_limits(mut self, min_radius: f32, max_radius: f32) -> Self {
        self.min_radius = min_radius;
        self.max_radius = max_radius;
        self.goal_radius = self.goal_radius.clamp(min_radius, max_radius);
        self
    }

    // calculate world position from spherical coordinates
    // https://en.wikipedia.org/wiki/Spherical_coordinate_system#Cartesian_coordinates
    pub fn calculate_position(&self) -> Vec3 {
        let x = self.radius * self.v_angle.cos() * self.angle.cos();
        let y = self.radius * self.v_angle.sin();
        let z = self.radius * self.v_angle.cos() * self.angle.sin();

        self.target + Vec3::new(x, y, z)
    }

    /// eases the current orbit toward the goal, frame rate independent
    pub fn step_damping(&mut self, delta_secs: f32) {
        let t = damping_factor(self.damping, delta_secs);
        self.radius += (self.goal_radius - self.radius) * t;
        self.angle += (self.goal_angle - self.angle) * t;
        self.v_angle += (self.goal_v_angle - self.v_angle) * t;
    }
}

// `damping` is the fraction covered per 60hz frame
fn damping_factor(damping: f32, delta_secs: f32) -> f32 {
    let damping = damping.clamp(0.0, 1.0);
    1.0 - (1.0 - damping).powf(delta_secs.max(0.0) * 60.0)
}

fn spawn_camera(mut commands: Commands) {
    let position = Vec3::from(CAMERA_POSITION);

    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        // the shaders output final colors
        Tonemapping::None,
        Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::looking_from(position, Vec3::ZERO)
            .with_zoom_limits(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE),
    ));
}

fn update(
    mut camera_query: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<CursorMoved>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let motions: Vec<Vec2> = mouse_motion.read().filter_map(|motion| motion.delta).collect();
    let scrolls: Vec<f32> = scroll_events.read().map(|scroll| scroll.y).collect();

    for (mut transform, mut camera) in camera_query.iter_mut() {
        // handle mouse drag
        if mouse_buttons.just_pressed(MouseButton::Left) {
            camera.is_dragging = true;
        }
        if mouse_buttons.just_released(MouseButton::Left) {
            camera.is_dragging = false;
        }

        // update goal angles
        if camera.is_dragging {
            for delta in &motions {
                camera.goal_angle += delta.x * camera.speed * 0.01;
                camera.goal_v_angle += delta.y * camera.speed * 0.01;
            }
            // clamp pitch
            camera.goal_v_angle = camera.goal_v_angle.clamp(-1.5, 1.5);
        }

        // handle mouse scroll, zoom is multiplicative at this scale
        for scroll in &scrolls {
            camera.goal_radius *= 0.95_f32.powf(*scroll);
        }
        camera.goal_radius = camera.goal_radius.clamp(camera.min_radius, camera.max_radius);

        camera.step_damping(time.delta_secs());

        // update camera position/orientation
        transform.translation = camera.calculate_position();
        transform.look_at(camera.target, Vec3::Y);
    }
}
