/// Geometry shared by the earth and the atmosphere shell
/// bevy's uv sphere has its poles on z, the earth spins about y, so the mesh is tipped over once here
/// `sphere_uv` is the same mapping on the CPU side, for the snapshot renderer

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy::prelude::*;

use crate::config::{EARTH_RADIUS, EARTH_SEGMENTS};

/// uv sphere with the north pole on +y
/// u runs east from +x, v runs from the north pole (0) to the south pole (1)
pub fn earth_mesh() -> Mesh {
    Sphere::new(EARTH_RADIUS)
        .mesh()
        .uv(EARTH_SEGMENTS, EARTH_SEGMENTS)
        .rotated_by(Quat::from_rotation_x(-FRAC_PI_2))
}

/// texture coordinate of a point on the unit sphere, in the earth's own frame
pub fn sphere_uv(normal: Vec3) -> Vec2 {
    let normal = normal.normalize_or_zero();

    // latitude from the y axis, clamp guards asin against drift
    let latitude = normal.y.clamp(-1.0, 1.0).asin();
    let longitude = (-normal.z).atan2(normal.x);

    Vec2::new((longitude / TAU).rem_euclid(1.0), 0.5 - latitude / PI)
}
