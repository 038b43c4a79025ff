use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;

use crate::{
    create::CreatureSpawned,
    engine::{periodic_trigger_system, world_tick_system, SpawnRng, SpawningSettings},
    scheduler::{
        advance_spawn_clock, dispatch_periodic_actions, on_spawner_added,
        on_spawner_position_added, on_spawner_position_removed, on_spawner_removed,
        PeriodicScheduler, PeriodicTrigger, SpawnClock,
    },
    template::{
        catalog_update_system, load_spawnable_catalog, rebuild_template_index, CatalogSource,
        SpawnableCatalog, SpawnableContent, TemplateIndex,
    },
    world::WorldBlocks,
};

/// Wires the spawning systems into an app.
///
/// Hosts with an asset server point `with_catalog` at a RON catalog and get
/// hot reloads for free; headless hosts insert `SpawnableContent` before the
/// plugin and the index is built from it at startup.
#[derive(Default)]
pub struct CreatureSpawningPlugin {
    pub catalog_path: Option<String>,
}

impl CreatureSpawningPlugin {
    pub fn with_catalog(path: impl Into<String>) -> Self {
        Self {
            catalog_path: Some(path.into()),
        }
    }
}

impl Plugin for CreatureSpawningPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnClock>();
        app.init_resource::<PeriodicScheduler>();
        app.init_resource::<SpawnableContent>();
        app.init_resource::<TemplateIndex>();
        app.init_resource::<SpawningSettings>();
        app.init_resource::<SpawnRng>();
        app.init_resource::<WorldBlocks>();

        app.add_event::<PeriodicTrigger>();
        app.add_event::<CreatureSpawned>();

        app.add_observer(on_spawner_added);
        app.add_observer(on_spawner_position_added);
        app.add_observer(on_spawner_removed);
        app.add_observer(on_spawner_position_removed);

        app.add_systems(Startup, rebuild_template_index);

        if let Some(path) = &self.catalog_path {
            app.add_plugins(RonAssetPlugin::<SpawnableCatalog>::new(&["ron"]));
            app.insert_resource(CatalogSource(path.clone()));
            app.add_systems(Startup, load_spawnable_catalog);
            app.add_systems(Update, catalog_update_system);
        }

        app.add_systems(
            Update,
            (
                advance_spawn_clock,
                dispatch_periodic_actions.after(advance_spawn_clock),
                periodic_trigger_system.after(dispatch_periodic_actions),
                world_tick_system.after(periodic_trigger_system),
            ),
        );
    }
}
