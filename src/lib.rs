pub use spawning;
pub use utils;

pub mod prelude {
    pub use spawning::components::{Inventory, ItemStack, Spawnable, Spawner, WanderingAi};
    pub use spawning::create::CreatureSpawned;
    pub use spawning::engine::{FailurePolicy, SpawnRng, SpawningSettings};
    pub use spawning::plugins::CreatureSpawningPlugin;
    pub use spawning::scheduler::{
        PeriodicScheduler, PeriodicTrigger, SpawnClock, PERIODIC_SPAWNING,
    };
    pub use spawning::template::{
        SpawnableCatalog, SpawnableContent, SpawnableTemplate, TemplateIndex,
    };
    pub use spawning::world::{BlockQuery, OpenWorld, WorldBlocks};
}
