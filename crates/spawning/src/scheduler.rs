use bevy::prelude::*;
use bevy::utils::HashMap;

use crate::components::Spawner;

/// Scheduler action name for the periodic spawn attempt of one spawner.
pub const PERIODIC_SPAWNING: &str = "periodic_spawning";

/// Millisecond clock the spawn systems run against. Advanced once per frame
/// from `Time`; triggers and passes all read the same value.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct SpawnClock {
    /// Total simulated time, ms.
    pub tick_ms: u64,
    /// Clock value of the last world-tick pass.
    pub last_pass_ms: u64,
}

pub fn advance_spawn_clock(time: Res<Time>, mut clock: ResMut<SpawnClock>) {
    clock.tick_ms += time.delta().as_millis() as u64;
}

/// A periodic action has come due for an entity.
#[derive(Event, Debug, Clone)]
pub struct PeriodicTrigger {
    pub entity: Entity,
    pub action: String,
}

#[derive(Debug, Clone, Copy)]
struct PeriodicAction {
    next_due_ms: u64,
    period_ms: u64,
}

/// Periodic actions keyed by (entity, action name). Registration and
/// cancellation are plain map edits on the update thread, so a canceled
/// action can never fire afterwards.
#[derive(Resource, Default, Debug)]
pub struct PeriodicScheduler {
    actions: HashMap<(Entity, String), PeriodicAction>,
}

impl PeriodicScheduler {
    /// Schedules `action` for `entity`: first due after `initial_delay_ms`,
    /// recurring every `period_ms` thereafter.
    pub fn register(
        &mut self,
        entity: Entity,
        action: &str,
        now_ms: u64,
        initial_delay_ms: u64,
        period_ms: u64,
    ) {
        self.actions.insert(
            (entity, action.to_string()),
            PeriodicAction {
                next_due_ms: now_ms + initial_delay_ms,
                // A zero period would fire every frame forever.
                period_ms: period_ms.max(1),
            },
        );
    }

    pub fn has(&self, entity: Entity, action: &str) -> bool {
        self.actions.contains_key(&(entity, action.to_string()))
    }

    /// Unschedules the action. Canceling something that was never registered
    /// is a no-op.
    pub fn cancel(&mut self, entity: Entity, action: &str) {
        self.actions.remove(&(entity, action.to_string()));
    }

    /// Drains every action due at `now_ms`, advancing each to its next
    /// firing. An action fires at most once per call; firings missed while
    /// the clock jumped ahead are dropped, not replayed.
    pub fn collect_due(&mut self, now_ms: u64) -> Vec<(Entity, String)> {
        let mut due = Vec::new();
        for ((entity, action), slot) in self.actions.iter_mut() {
            if slot.next_due_ms <= now_ms {
                due.push((*entity, action.clone()));
                slot.next_due_ms += slot.period_ms;
                if slot.next_due_ms <= now_ms {
                    slot.next_due_ms = now_ms + slot.period_ms;
                }
            }
        }
        due
    }
}

pub fn dispatch_periodic_actions(
    clock: Res<SpawnClock>,
    mut scheduler: ResMut<PeriodicScheduler>,
    mut triggers: EventWriter<PeriodicTrigger>,
) {
    for (entity, action) in scheduler.collect_due(clock.tick_ms) {
        triggers.send(PeriodicTrigger { entity, action });
    }
}

/// Idempotent registration used by both attachment observers.
fn schedule_spawner(
    entity: Entity,
    spawner: &Spawner,
    clock: &SpawnClock,
    scheduler: &mut PeriodicScheduler,
) {
    if scheduler.has(entity, PERIODIC_SPAWNING) {
        return;
    }
    debug!("Scheduling periodic spawning for {:?}", entity);
    scheduler.register(
        entity,
        PERIODIC_SPAWNING,
        clock.tick_ms,
        spawner.period_ms,
        spawner.period_ms,
    );
}

/// Schedules periodic spawning once a spawner has both of its capabilities.
/// The position requirement keeps spawner blocks tucked in inventories inert.
pub fn on_spawner_added(
    trigger: Trigger<OnAdd, Spawner>,
    spawners: Query<&Spawner, With<Transform>>,
    clock: Res<SpawnClock>,
    mut scheduler: ResMut<PeriodicScheduler>,
) {
    let entity = trigger.entity();
    let Ok(spawner) = spawners.get(entity) else {
        return;
    };
    schedule_spawner(entity, spawner, &clock, &mut scheduler);
}

/// A position attached after the spawner also completes the pair.
pub fn on_spawner_position_added(
    trigger: Trigger<OnAdd, Transform>,
    spawners: Query<&Spawner>,
    clock: Res<SpawnClock>,
    mut scheduler: ResMut<PeriodicScheduler>,
) {
    let entity = trigger.entity();
    let Ok(spawner) = spawners.get(entity) else {
        return;
    };
    schedule_spawner(entity, spawner, &clock, &mut scheduler);
}

pub fn on_spawner_removed(
    trigger: Trigger<OnRemove, Spawner>,
    mut scheduler: ResMut<PeriodicScheduler>,
) {
    scheduler.cancel(trigger.entity(), PERIODIC_SPAWNING);
}

/// Losing the position stops the spawner as well; despawns land here too.
pub fn on_spawner_position_removed(
    trigger: Trigger<OnRemove, Transform>,
    spawners: Query<(), With<Spawner>>,
    mut scheduler: ResMut<PeriodicScheduler>,
) {
    if spawners.get(trigger.entity()).is_ok() {
        scheduler.cancel(trigger.entity(), PERIODIC_SPAWNING);
    }
}
