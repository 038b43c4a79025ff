use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use utils::rng::GameRng;

use crate::{
    components::{Inventory, Spawner, WanderingAi},
    create::{spawn_creature, CreatureSpawned},
    placement::resolve_spawn_position,
    scheduler::{PeriodicTrigger, SpawnClock, PERIODIC_SPAWNING},
    template::{SpawnableContent, TemplateIndex},
    world::{BlockQuery, WorldBlocks},
};

/// The world-tick path runs a full pass at most this often, however fast the
/// host schedule ticks.
pub const WORLD_TICK_THROTTLE_MS: u64 = 1000;

/// How a pass reacts when one spawner's tag lookup or placement search fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// End the whole pass; remaining spawners are not evaluated.
    #[default]
    AbortPass,
    /// Move on to the next spawner instead.
    SkipSpawner,
}

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SpawningSettings {
    pub failure_policy: FailurePolicy,
}

/// Random source for every spawn decision. One per engine; seed it for
/// reproducible runs.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpawnRng(pub GameRng);

impl Default for SpawnRng {
    fn default() -> Self {
        SpawnRng(GameRng::new(rand::random()))
    }
}

/// Population snapshot for one pass: live creatures against the summed cap
/// of every eligible spawner. Recomputed fresh each pass, never cached.
#[derive(Debug, Clone, Copy)]
pub struct PassBudget {
    pub live_count: u32,
    pub aggregate_cap: u32,
}

/// What to create once a spawner clears every check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    /// Catalog slot of the chosen template.
    pub template: usize,
    pub position: Vec3,
}

/// Why a single spawner was passed over. All ordinary, frequent outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotDue,
    ClockRegression,
    NoTypes,
    NoMatchingTemplates,
    NoOpenPosition,
    NoInventory,
    MissingItem,
}

/// Why the rest of the pass is called off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    PopulationCap,
    NoMatchingTemplates,
    NoOpenPosition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Spawn(SpawnRequest),
    Skip(SkipReason),
    Abort(AbortReason),
}

/// Runs the decision chain for one spawner: due check, population check,
/// type selection, placement, resource gate. Mutates the spawner's trigger
/// bookkeeping, the rng, and (on the resource-gated path) the inventory.
#[allow(clippy::too_many_arguments)]
pub fn decide_spawn(
    spawner: &mut Spawner,
    origin: Vec3,
    mut inventory: Option<&mut Inventory>,
    now_ms: u64,
    budget: PassBudget,
    content: &SpawnableContent,
    index: &TemplateIndex,
    rng: &mut GameRng,
    world: &dyn BlockQuery,
    settings: &SpawningSettings,
) -> Verdict {
    // Due check. A clock that moved backwards is corrected, not treated as
    // an error; the spawner sits this pass out.
    if spawner.last_tick_ms > now_ms {
        spawner.last_tick_ms = now_ms;
        return Verdict::Skip(SkipReason::ClockRegression);
    }
    if now_ms - spawner.last_tick_ms < spawner.period_ms {
        return Verdict::Skip(SkipReason::NotDue);
    }
    // The attempt counts from here even if a later check fails.
    spawner.last_tick_ms = now_ms;

    // Population check. Capless spawners (max 0) are exempt.
    if spawner.max_mobs_per_spawner > 0 && budget.live_count >= budget.aggregate_cap {
        info!(
            "Creature count {}/{} at cap, ending pass",
            budget.live_count, budget.aggregate_cap
        );
        return Verdict::Abort(AbortReason::PopulationCap);
    }

    // Type selection: one tag from the spawner, then one template from that
    // tag's pool, both uniform.
    if spawner.types.is_empty() {
        warn!("Spawner has no types configured, nothing to spawn");
        return Verdict::Skip(SkipReason::NoTypes);
    }
    let chosen_tag = &spawner.types[rng.next_index(spawner.types.len())];
    let matches = index.lookup(chosen_tag);
    if matches.is_empty() {
        warn!("No spawnable template registered under tag {chosen_tag:?}");
        return match settings.failure_policy {
            FailurePolicy::AbortPass => Verdict::Abort(AbortReason::NoMatchingTemplates),
            FailurePolicy::SkipSpawner => Verdict::Skip(SkipReason::NoMatchingTemplates),
        };
    }
    let template_slot = matches[rng.next_index(matches.len())];
    let Some(template) = content.0.templates.get(template_slot) else {
        // Index out of step with content; the next rebuild corrects it.
        warn!("Tag {chosen_tag:?} points at missing template slot {template_slot}");
        return Verdict::Skip(SkipReason::NoMatchingTemplates);
    };

    // Placement.
    let Some(position) = resolve_spawn_position(origin, spawner, rng, world) else {
        info!("No open position to spawn at around {origin}");
        return match settings.failure_policy {
            FailurePolicy::AbortPass => Verdict::Abort(AbortReason::NoOpenPosition),
            FailurePolicy::SkipSpawner => Verdict::Skip(SkipReason::NoOpenPosition),
        };
    };

    // Resource gate: a template that consumes an item needs a stocked
    // inventory on the spawner.
    if let Some(needed) = template.item_to_consume.as_deref() {
        let Some(inventory) = inventory.as_deref_mut() else {
            info!(
                "{:?} demands {needed:?} but the spawner has no inventory",
                template.type_label
            );
            return Verdict::Skip(SkipReason::NoInventory);
        };
        if !inventory.consume(needed) {
            info!(
                "Spawner holds no {needed:?}, cannot spawn {:?}",
                template.type_label
            );
            return Verdict::Skip(SkipReason::MissingItem);
        }
    }

    Verdict::Spawn(SpawnRequest {
        template: template_slot,
        position,
    })
}

/// Everything one spawn pass reads and writes, shared by the world-tick and
/// trigger paths.
#[derive(SystemParam)]
pub struct SpawnPass<'w, 's> {
    pub clock: ResMut<'w, SpawnClock>,
    pub settings: Res<'w, SpawningSettings>,
    pub content: Res<'w, SpawnableContent>,
    pub index: Res<'w, TemplateIndex>,
    pub rng: ResMut<'w, SpawnRng>,
    pub blocks: Res<'w, WorldBlocks>,
    pub spawners: Query<
        'w,
        's,
        (
            Entity,
            &'static mut Spawner,
            &'static Transform,
            Option<&'static mut Inventory>,
        ),
    >,
    pub creatures: Query<'w, 's, (), With<WanderingAi>>,
    pub spawned: EventWriter<'w, CreatureSpawned>,
}

enum PassScope {
    All,
    Among(Vec<Entity>),
}

fn run_pass(pass: &mut SpawnPass, commands: &mut Commands, scope: PassScope) {
    let now_ms = pass.clock.tick_ms;

    // The cap aggregates every eligible spawner regardless of scope, and is
    // taken fresh so configuration changes apply immediately.
    let mut aggregate_cap = 0u32;
    let mut eligible = Vec::new();
    for (entity, spawner, _, _) in pass.spawners.iter() {
        aggregate_cap += spawner.max_mobs_per_spawner;
        eligible.push(entity);
    }
    // Commands are deferred, so the query cannot see same-pass spawns; the
    // count is advanced by hand as creatures are issued.
    let mut live_count = pass.creatures.iter().count() as u32;

    for entity in eligible {
        if let PassScope::Among(ref due) = scope {
            if !due.contains(&entity) {
                continue;
            }
        }
        let Ok((_, mut spawner, transform, mut inventory)) = pass.spawners.get_mut(entity) else {
            continue;
        };
        let origin = transform.translation;
        let verdict = decide_spawn(
            &mut spawner,
            origin,
            inventory.as_mut().map(|i| &mut **i),
            now_ms,
            PassBudget {
                live_count,
                aggregate_cap,
            },
            &pass.content,
            &pass.index,
            &mut pass.rng.0,
            pass.blocks.0.as_ref(),
            &pass.settings,
        );
        match verdict {
            Verdict::Spawn(request) => {
                if let Some(template) = pass.content.0.templates.get(request.template) {
                    let creature = spawn_creature(commands, template, request.position, entity);
                    info!(
                        "Spawned {:?} at {} for spawner {:?}",
                        template.type_label, request.position, entity
                    );
                    pass.spawned.send(CreatureSpawned {
                        spawner: entity,
                        creature,
                    });
                    live_count += 1;
                }
            }
            Verdict::Skip(_) => {}
            Verdict::Abort(_) => break,
        }
    }
}

/// Coarse world-tick path: evaluates every spawner, self-throttled to at
/// most one pass per second.
pub fn world_tick_system(mut pass: SpawnPass, mut commands: Commands) {
    if pass.clock.tick_ms - pass.clock.last_pass_ms < WORLD_TICK_THROTTLE_MS {
        return;
    }
    pass.clock.last_pass_ms = pass.clock.tick_ms;
    run_pass(&mut pass, &mut commands, PassScope::All);
}

/// Scheduler path: evaluates the spawners whose periodic actions fired.
/// All triggers from one frame share a single pass, so spawns issued for an
/// earlier spawner still count against the cap for the later ones.
pub fn periodic_trigger_system(
    mut triggers: EventReader<PeriodicTrigger>,
    mut pass: SpawnPass,
    mut commands: Commands,
) {
    let due: Vec<Entity> = triggers
        .read()
        .filter(|trigger| trigger.action == PERIODIC_SPAWNING)
        .map(|trigger| trigger.entity)
        .collect();
    if due.is_empty() {
        return;
    }
    run_pass(&mut pass, &mut commands, PassScope::Among(due));
}
