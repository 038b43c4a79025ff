use bevy::prelude::*;
use std::collections::HashSet;

use crate::template::SpawnableTemplate;

/// Marks an entity as a periodic producer of creatures.
///
/// A spawner only takes part in spawn passes while the entity also carries a
/// `Transform`; a spawner block sitting inside an inventory has no position
/// and is ignored.
#[derive(Component, Clone, Debug)]
pub struct Spawner {
    /// Spawnable tags this spawner may produce. Only membership matters.
    pub types: Vec<String>,
    /// Clock value of the last spawn attempt, in ms.
    pub last_tick_ms: u64,
    /// Time between spawn attempts, in ms.
    pub period_ms: u64,
    /// Contribution to the global creature cap. 0 exempts this spawner from
    /// the population check.
    pub max_mobs_per_spawner: u32,
    /// When set, new creatures are placed randomly around the spawner instead
    /// of exactly on it.
    pub ranged_spawning: bool,
    /// Horizontal radius for ranged spawning.
    pub range: f32,
    /// Minimum squared planar distance from the spawner. 0 disables the check.
    pub min_distance: f32,
    // Player-proximity gating. Carried in the data model but not wired into
    // the decision chain yet.
    pub needs_player: bool,
    pub player_need_range: f32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            last_tick_ms: 0,
            period_ms: 5000,
            max_mobs_per_spawner: 16,
            ranged_spawning: false,
            range: 20.0,
            min_distance: 0.0,
            needs_player: false,
            player_need_range: 10000.0,
        }
    }
}

/// Attached to every creature a spawner produces.
#[derive(Component, Clone, Debug)]
pub struct Spawnable {
    pub type_label: String,
    pub tags: HashSet<String>,
    pub probability: u8,
    pub item_to_consume: Option<String>,
    /// The spawner that produced this creature. Lineage tracking only; the
    /// creature does not own (or keep alive) its spawner.
    pub parent: Option<Entity>,
}

impl Spawnable {
    /// Builds the component for a fresh instance of `template`.
    pub fn instance_of(template: &SpawnableTemplate, parent: Entity) -> Self {
        Spawnable {
            type_label: template.type_label.clone(),
            tags: template.tags.clone(),
            probability: template.probability,
            item_to_consume: template.item_to_consume.clone(),
            parent: Some(parent),
        }
    }
}

/// Default behavior marker attached to spawned creatures. Doubles as the
/// marker the live population count is taken over.
#[derive(Component, Default, Clone, Copy)]
pub struct WanderingAi;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemStack {
    pub name: String,
    pub quantity: u32,
}

/// Minimal slot-based inventory, enough for templates that demand an item
/// be given up per spawn.
#[derive(Component, Clone, Debug, Default)]
pub struct Inventory {
    pub slots: Vec<ItemStack>,
}

impl Inventory {
    /// Removes one unit of the named item, dropping the slot when it empties.
    /// Returns false when no slot matches.
    pub fn consume(&mut self, name: &str) -> bool {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.name == name && slot.quantity > 0 {
                slot.quantity -= 1;
                if slot.quantity == 0 {
                    self.slots.remove(i);
                }
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stocked(name: &str, quantity: u32) -> Inventory {
        Inventory {
            slots: vec![ItemStack { name: name.to_string(), quantity }],
        }
    }

    #[test]
    fn consume_decrements_matching_slot() {
        let mut inventory = stocked("Torch", 3);
        assert!(inventory.consume("Torch"));
        assert_eq!(inventory.slots[0].quantity, 2);
    }

    #[test]
    fn consume_drops_emptied_slot() {
        let mut inventory = stocked("Torch", 1);
        assert!(inventory.consume("Torch"));
        assert!(inventory.slots.is_empty());
    }

    #[test]
    fn consume_without_match_fails() {
        let mut inventory = stocked("Torch", 3);
        assert!(!inventory.consume("Gem"));
        assert_eq!(inventory.slots[0].quantity, 3);
    }

    #[test]
    fn instance_carries_template_fields_and_parent() {
        let template = SpawnableTemplate::new("goblin", ["goblin", "spearman"]);
        let parent = Entity::from_raw(9);
        let spawnable = Spawnable::instance_of(&template, parent);
        assert_eq!(spawnable.type_label, "goblin");
        assert!(spawnable.tags.contains("spearman"));
        assert_eq!(spawnable.parent, Some(parent));
    }
}
