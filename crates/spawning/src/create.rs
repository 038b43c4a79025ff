use bevy::prelude::*;

use crate::components::{Spawnable, WanderingAi};
use crate::template::SpawnableTemplate;

/// A spawner produced a new creature.
#[derive(Event, Debug, Clone, Copy)]
pub struct CreatureSpawned {
    pub spawner: Entity,
    pub creature: Entity,
}

/// Instantiates a creature from a template, tying it back to its spawner and
/// giving it the default wandering behavior.
pub fn spawn_creature(
    commands: &mut Commands,
    template: &SpawnableTemplate,
    position: Vec3,
    parent: Entity,
) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Spawnable::instance_of(template, parent),
            WanderingAi,
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn creature_carries_position_lineage_and_behavior() {
        let mut world = World::new();
        let parent = world.spawn_empty().id();
        let template = SpawnableTemplate::new("goblin", ["goblin"]);
        let position = Vec3::new(1.0, 2.0, 3.0);

        world
            .run_system_once(move |mut commands: Commands| {
                spawn_creature(&mut commands, &template, position, parent);
            })
            .unwrap();

        let mut query = world.query::<(&Spawnable, &Transform, &WanderingAi)>();
        let (spawnable, transform, _) = query.single(&world);
        assert_eq!(spawnable.type_label, "goblin");
        assert_eq!(spawnable.parent, Some(parent));
        assert_eq!(transform.translation, position);
    }
}
