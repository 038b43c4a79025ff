use bevy::prelude::*;

/// World-geometry collaborator: answers whether a creature can occupy a spot.
/// The host supplies the real implementation through `WorldBlocks`.
pub trait BlockQuery: Send + Sync {
    /// Whether the block containing `pos` can be moved through.
    fn is_penetrable(&self, pos: Vec3) -> bool;

    /// Whether a creature with the given footprint fits at `pos`. The default
    /// accepts everything; the nominal footprint is 1x1x1 for now.
    fn fits_footprint(&self, _pos: Vec3, _width: u32, _height: u32, _depth: u32) -> bool {
        true
    }
}

/// A world with no solid blocks at all.
pub struct OpenWorld;

impl BlockQuery for OpenWorld {
    fn is_penetrable(&self, _pos: Vec3) -> bool {
        true
    }
}

/// Block geometry used by the placement search.
#[derive(Resource)]
pub struct WorldBlocks(pub Box<dyn BlockQuery>);

impl Default for WorldBlocks {
    fn default() -> Self {
        WorldBlocks(Box::new(OpenWorld))
    }
}
