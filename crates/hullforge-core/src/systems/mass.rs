//! Mass-property sync - publishes committed hull mass for the physics layer

use hecs::World;
use crate::components::{Hull, MassProperties};

/// Copy mass, center of mass, and radius from every committed hull into its
/// `MassProperties` component.
///
/// Ships being edited have no `Hull`, so their `MassProperties` keep the
/// last committed values until the session finishes. Returns the number of
/// ships updated.
pub fn sync_mass_properties(world: &mut World) -> usize {
    let mut updated = 0;
    for (_entity, (hull, props)) in world.query_mut::<(&Hull, &mut MassProperties)>() {
        *props = hull.structure().mass_properties();
        updated += 1;
    }
    updated
}

/// Combined mass of every ship in the world, as last published.
pub fn total_fleet_mass(world: &World) -> f32 {
    world
        .query::<&MassProperties>()
        .iter()
        .map(|(_, props)| props.mass)
        .sum()
}
