use bevy::math::Vec3;

/// Squared distance in the horizontal (x/z) plane, ignoring height.
pub fn planar_distance_squared(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    dx * dx + dz * dz
}
