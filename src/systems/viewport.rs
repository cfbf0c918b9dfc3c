use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::config::MAX_PIXEL_RATIO;

// bevy already keeps the projection aspect and the surface size in step with the window,
// this only caps the pixel ratio
pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, cap_primary_window)
            .add_systems(Update, on_resize);
    }
}

pub fn capped_pixel_ratio(device_ratio: f32) -> f32 {
    if device_ratio.is_finite() && device_ratio > 0.0 {
        device_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

fn cap_pixel_ratio(window: &mut Window) {
    let ratio = capped_pixel_ratio(window.resolution.base_scale_factor());
    if window.resolution.scale_factor_override() != Some(ratio) {
        window.resolution.set_scale_factor_override(Some(ratio));
    }
}

fn cap_primary_window(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.single_mut() {
        cap_pixel_ratio(&mut window);
    }
}

fn on_resize(
    mut resized: EventReader<WindowResized>,
    mut window_query: Query<&mut Window>,
) {
    for event in resized.read() {
        if let Ok(mut window) = window_query.get_mut(event.window) {
            cap_pixel_ratio(&mut window);
            debug!(
                "resized to {}x{} (pixel ratio {})",
                event.width,
                event.height,
                window.resolution.scale_factor()
            );
        }
    }
}
