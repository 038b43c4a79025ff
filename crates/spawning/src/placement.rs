use bevy::prelude::*;
use utils::{math::planar_distance_squared, rng::GameRng};

use crate::{components::Spawner, world::BlockQuery};

/// How far above and below the perturbed point the search probes for an open
/// block before giving up.
pub const VERTICAL_PROBE_LIMIT: i32 = 30;

/// Resolves where a spawner should place its next creature.
///
/// Without ranged spawning the origin is used unchanged. With it, the point
/// is perturbed on the horizontal axes, checked against the minimum spawn
/// distance, then probed vertically (above first, then the mirrored spot
/// below) for the first penetrable block that fits the creature footprint.
/// `None` means no acceptable position this pass; there is no re-draw.
pub fn resolve_spawn_position(
    origin: Vec3,
    spawner: &Spawner,
    rng: &mut GameRng,
    world: &dyn BlockQuery,
) -> Option<Vec3> {
    if !spawner.ranged_spawning {
        return Some(origin);
    }

    // Random offsets in [0, range) on x and z; height is handled below.
    let mut spawn_pos = Vec3::new(
        origin.x + rng.next_f32() * spawner.range,
        origin.y,
        origin.z + rng.next_f32() * spawner.range,
    );

    if spawner.min_distance != 0.0
        && spawner.min_distance > planar_distance_squared(spawn_pos, origin)
    {
        return None;
    }

    // Walk outward from the perturbed point. A hit below flips the offset
    // sign and the accepted height is then recomputed from that (now
    // negative) offset against the perturbed point, not taken from the
    // below candidate itself.
    let mut offset: i32 = 1;
    while offset < VERTICAL_PROBE_LIMIT {
        let above = Vec3::new(spawn_pos.x, spawn_pos.y + offset as f32, spawn_pos.z);
        if world.is_penetrable(above) && world.fits_footprint(above, 1, 1, 1) {
            break;
        }
        let below = Vec3::new(spawn_pos.x, spawn_pos.y - offset as f32, spawn_pos.z);
        if world.is_penetrable(below) && world.fits_footprint(below, 1, 1, 1) {
            offset = -offset;
            break;
        }
        offset += 1;
    }

    if offset == VERTICAL_PROBE_LIMIT {
        debug!("No open position within {VERTICAL_PROBE_LIMIT} blocks of {spawn_pos}");
        return None;
    }

    spawn_pos.y += offset as f32;
    Some(spawn_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::OpenWorld;

    /// Penetrable only at one height (within half a block).
    struct OpenAtHeight(f32);

    impl BlockQuery for OpenAtHeight {
        fn is_penetrable(&self, pos: Vec3) -> bool {
            (pos.y - self.0).abs() < 0.5
        }
    }

    /// Solid everywhere.
    struct SealedWorld;

    impl BlockQuery for SealedWorld {
        fn is_penetrable(&self, _pos: Vec3) -> bool {
            false
        }
    }

    fn ranged(range: f32, min_distance: f32) -> Spawner {
        Spawner {
            ranged_spawning: true,
            range,
            min_distance,
            ..Default::default()
        }
    }

    #[test]
    fn unranged_spawner_uses_origin() {
        let origin = Vec3::new(10.0, 20.0, 30.0);
        let spawner = Spawner::default();
        let mut rng = GameRng::new(1);
        let pos = resolve_spawn_position(origin, &spawner, &mut rng, &SealedWorld);
        assert_eq!(pos, Some(origin));
    }

    #[test]
    fn perturbation_below_min_distance_fails() {
        // range 5 caps the squared planar distance at 50, under the minimum
        // of 100 for every possible draw.
        let spawner = ranged(5.0, 100.0);
        let mut rng = GameRng::new(77);
        for _ in 0..50 {
            let pos = resolve_spawn_position(Vec3::ZERO, &spawner, &mut rng, &OpenWorld);
            assert_eq!(pos, None);
        }
    }

    #[test]
    fn zero_min_distance_disables_the_check() {
        // range 0 pins the perturbed point on the origin; min 0 disables the
        // check entirely.
        let spawner = ranged(0.0, 0.0);
        let mut rng = GameRng::new(3);
        let pos = resolve_spawn_position(Vec3::ZERO, &spawner, &mut rng, &OpenWorld);
        assert_eq!(pos, Some(Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn sealed_world_exhausts_the_probe() {
        let spawner = ranged(0.0, 0.0);
        let mut rng = GameRng::new(5);
        let pos = resolve_spawn_position(Vec3::ZERO, &spawner, &mut rng, &SealedWorld);
        assert_eq!(pos, None);
    }

    #[test]
    fn first_open_height_above_is_accepted() {
        let origin = Vec3::new(0.0, 10.0, 0.0);
        let spawner = ranged(0.0, 0.0);
        let mut rng = GameRng::new(5);
        let pos = resolve_spawn_position(origin, &spawner, &mut rng, &OpenAtHeight(13.0));
        assert_eq!(pos, Some(Vec3::new(0.0, 13.0, 0.0)));
    }

    #[test]
    fn open_height_below_flips_the_offset() {
        let origin = Vec3::new(0.0, 10.0, 0.0);
        let spawner = ranged(0.0, 0.0);
        let mut rng = GameRng::new(5);
        let pos = resolve_spawn_position(origin, &spawner, &mut rng, &OpenAtHeight(8.0));
        assert_eq!(pos, Some(Vec3::new(0.0, 8.0, 0.0)));
    }

    #[test]
    fn open_height_past_the_limit_is_never_reached() {
        let origin = Vec3::ZERO;
        let spawner = ranged(0.0, 0.0);
        let mut rng = GameRng::new(5);
        let pos = resolve_spawn_position(origin, &spawner, &mut rng, &OpenAtHeight(31.0));
        assert_eq!(pos, None);
    }

    #[test]
    fn ranged_offsets_stay_in_range() {
        let origin = Vec3::new(100.0, 0.0, 100.0);
        let spawner = ranged(20.0, 0.0);
        let mut rng = GameRng::new(9);
        for _ in 0..100 {
            let pos = resolve_spawn_position(origin, &spawner, &mut rng, &OpenWorld)
                .expect("open world always has room");
            assert!(pos.x >= origin.x && pos.x < origin.x + 20.0);
            assert!(pos.z >= origin.z && pos.z < origin.z + 20.0);
            // First probe above an all-open world succeeds immediately.
            assert_eq!(pos.y, origin.y + 1.0);
        }
    }
}
