//! Shipyard engine - main entry point for building and tracking ships

use hecs::{Entity, World};
use hullforge_logic::design::{DesignError, ShipDesign};
use hullforge_logic::grid::Position;
use hullforge_logic::session::BuildSession;
use hullforge_logic::structure::Structure;
use hullforge_logic::upgrade::BuildKind;
use rand::Rng;

use crate::components::*;
use crate::generation::{generate_ship_name, generate_structure, GeneratorConfig};
use crate::systems::*;

/// Main shipyard engine
pub struct Shipyard {
    /// ECS world containing all ship entities
    pub world: World,
    /// Number of `update` calls so far
    tick: u64,
}

/// Errors from shipyard operations on a specific ship
#[derive(Debug)]
pub enum ShipyardError {
    /// Entity does not exist or is not a ship
    NoSuchShip(Entity),
    /// `begin_build` on a ship that is already being edited
    AlreadyEditing(Entity),
    /// Session operation on a ship that is not being edited
    NotEditing(Entity),
    /// Design failed validation
    Design(DesignError),
}

impl From<DesignError> for ShipyardError {
    fn from(e: DesignError) -> Self {
        ShipyardError::Design(e)
    }
}

impl std::fmt::Display for ShipyardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShipyardError::NoSuchShip(e) => write!(f, "No ship with entity {:?}", e),
            ShipyardError::AlreadyEditing(e) => write!(f, "Ship {:?} is already being edited", e),
            ShipyardError::NotEditing(e) => write!(f, "Ship {:?} is not being edited", e),
            ShipyardError::Design(e) => write!(f, "Design error: {}", e),
        }
    }
}

impl std::error::Error for ShipyardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShipyardError::Design(e) => Some(e),
            _ => None,
        }
    }
}

impl Shipyard {
    /// Create a new empty shipyard
    pub fn new() -> Self {
        Self {
            world: World::new(),
            tick: 0,
        }
    }

    /// Add a ship with a committed hull. The hull is normalized first.
    pub fn spawn_ship(&mut self, name: impl Into<String>, mut structure: Structure) -> Entity {
        structure.shrink_to_fit();
        let props = structure.mass_properties();
        let name = ShipName::new(name);
        log::info!(
            "Spawned ship '{}': {} cells, mass {:.2}",
            name.as_str(),
            structure.cell_count(),
            props.mass
        );
        self.world.spawn((name, Hull(structure), props))
    }

    /// Validate a design and spawn it as a ship.
    pub fn spawn_design(
        &mut self,
        name: impl Into<String>,
        design: &ShipDesign,
    ) -> Result<Entity, ShipyardError> {
        let structure = design.build()?;
        Ok(self.spawn_ship(name, structure))
    }

    /// Generate a random ship. Randomness is supplied by the caller.
    pub fn spawn_generated(&mut self, config: &GeneratorConfig, rng: &mut impl Rng) -> Entity {
        let name = generate_ship_name(rng);
        let structure = generate_structure(config, rng);
        self.spawn_ship(name, structure)
    }

    /// Remove a ship. Returns false if it did not exist.
    pub fn despawn_ship(&mut self, ship: Entity) -> bool {
        self.world.despawn(ship).is_ok()
    }

    /// Open a build session: the hull is padded for editing and set aside
    /// from physics-facing systems until `finish_build`.
    pub fn begin_build(&mut self, ship: Entity) -> Result<(), ShipyardError> {
        if self.is_editing(ship) {
            return Err(ShipyardError::AlreadyEditing(ship));
        }
        let hull = self
            .world
            .remove_one::<Hull>(ship)
            .map_err(|_| ShipyardError::NoSuchShip(ship))?;

        let mut session = BuildSession::new(hull.0);
        session.start();
        self.world
            .insert_one(ship, Editing(session))
            .map_err(|_| ShipyardError::NoSuchShip(ship))?;
        log::debug!("Build session opened for {:?}", ship);
        Ok(())
    }

    /// Whether `kind` can be placed at `pos` in the ship's open session.
    pub fn can_place(&self, ship: Entity, pos: Position, kind: BuildKind) -> Result<bool, ShipyardError> {
        let editing = self
            .world
            .get::<&Editing>(ship)
            .map_err(|_| ShipyardError::NotEditing(ship))?;
        Ok(editing.session().can_place(pos, kind))
    }

    /// Place into the ship's open session. `Ok(false)` is an ordinary
    /// rejected placement.
    pub fn place(&mut self, ship: Entity, pos: Position, kind: BuildKind) -> Result<bool, ShipyardError> {
        let mut editing = self
            .world
            .get::<&mut Editing>(ship)
            .map_err(|_| ShipyardError::NotEditing(ship))?;
        let placed = editing.0.place(pos, kind);
        if placed {
            log::debug!("Placed {:?} at ({}, {}) on {:?}", kind, pos.row, pos.col, ship);
        }
        Ok(placed)
    }

    /// Commit the open session: normalize the hull and publish its mass.
    pub fn finish_build(&mut self, ship: Entity) -> Result<(), ShipyardError> {
        let editing = self
            .world
            .remove_one::<Editing>(ship)
            .map_err(|_| ShipyardError::NotEditing(ship))?;
        let structure = editing.0.into_structure();
        let props = structure.mass_properties();
        log::info!(
            "Build session committed for {:?}: {}x{}, {} cells, mass {:.2}",
            ship,
            structure.width(),
            structure.height(),
            structure.cell_count(),
            props.mass
        );
        self.world
            .insert(ship, (Hull(structure), props))
            .map_err(|_| ShipyardError::NoSuchShip(ship))?;
        Ok(())
    }

    pub fn is_editing(&self, ship: Entity) -> bool {
        self.world.get::<&Editing>(ship).is_ok()
    }

    /// Committed hull, `None` while editing or for unknown entities.
    pub fn hull(&self, ship: Entity) -> Option<Structure> {
        self.world
            .get::<&Hull>(ship)
            .ok()
            .map(|hull| hull.structure().clone())
    }

    /// Structure as currently edited (padded), `None` if not editing.
    pub fn editing_structure(&self, ship: Entity) -> Option<Structure> {
        self.world
            .get::<&Editing>(ship)
            .ok()
            .map(|editing| editing.session().structure().clone())
    }

    /// Last published mass properties.
    pub fn mass_properties(&self, ship: Entity) -> Option<MassProperties> {
        self.world.get::<&MassProperties>(ship).ok().map(|props| *props)
    }

    pub fn ship_name(&self, ship: Entity) -> Option<String> {
        self.world.get::<&ShipName>(ship).ok().map(|name| name.0.clone())
    }

    /// Advance one simulation step: publish committed mass properties.
    pub fn update(&mut self) {
        sync_mass_properties(&mut self.world);
        self.tick += 1;
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Get total ship count
    pub fn ship_count(&self) -> usize {
        self.world.query::<&ShipName>().iter().count()
    }

    /// Combined mass of all ships as last published
    pub fn fleet_mass(&self) -> f32 {
        total_fleet_mass(&self.world)
    }
}

impl Default for Shipyard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hullforge_logic::design::ComponentSpec;
    use hullforge_logic::upgrade::UpgradeKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn p(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    fn two_cell_design() -> ShipDesign {
        ShipDesign {
            width: 2,
            height: 1,
            components: vec![
                ComponentSpec::new(0, 0),
                ComponentSpec::with_upgrade(1, 0, "Thruster", 1),
            ],
        }
    }

    #[test]
    fn test_spawn_normalizes_hull() {
        let mut yard = Shipyard::new();
        let mut s = Structure::new(5, 5);
        assert!(s.set_cell(p(2, 2), None));
        let ship = yard.spawn_ship("Drifter", s);
        let hull = yard.hull(ship).unwrap();
        assert_eq!((hull.width(), hull.height()), (1, 1));
        assert_eq!(yard.ship_name(ship).as_deref(), Some("Drifter"));
        assert_eq!(yard.mass_properties(ship).unwrap().mass, 1.0);
    }

    #[test]
    fn test_physics_sees_committed_state_during_session() {
        let mut yard = Shipyard::new();
        let ship = yard.spawn_design("Courier", &two_cell_design()).unwrap();
        let committed = yard.mass_properties(ship).unwrap();

        yard.begin_build(ship).unwrap();
        assert!(yard.is_editing(ship));
        assert!(yard.hull(ship).is_none());
        // Padded grid: cells shifted by (1, 1). Grow to the right.
        assert!(yard.place(ship, p(1, 3), BuildKind::Fuselage).unwrap());
        yard.update();
        assert_eq!(yard.mass_properties(ship).unwrap(), committed);

        yard.finish_build(ship).unwrap();
        yard.update();
        let after = yard.mass_properties(ship).unwrap();
        assert!((after.mass - (committed.mass + 1.0)).abs() < 1e-5);
        let hull = yard.hull(ship).unwrap();
        assert_eq!((hull.width(), hull.height()), (3, 1));
    }

    #[test]
    fn test_session_errors() {
        let mut yard = Shipyard::new();
        let ship = yard.spawn_design("Courier", &two_cell_design()).unwrap();

        assert!(matches!(
            yard.place(ship, p(0, 0), BuildKind::Fuselage),
            Err(ShipyardError::NotEditing(_))
        ));
        assert!(matches!(yard.finish_build(ship), Err(ShipyardError::NotEditing(_))));

        yard.begin_build(ship).unwrap();
        assert!(matches!(
            yard.begin_build(ship),
            Err(ShipyardError::AlreadyEditing(_))
        ));

        assert!(yard.despawn_ship(ship));
        assert!(matches!(yard.begin_build(ship), Err(ShipyardError::NoSuchShip(_))));
    }

    #[test]
    fn test_rejected_placement_is_not_an_error() {
        let mut yard = Shipyard::new();
        let ship = yard.spawn_design("Courier", &two_cell_design()).unwrap();
        yard.begin_build(ship).unwrap();
        assert!(!yard.place(ship, p(0, 0), BuildKind::Fuselage).unwrap());
        assert!(!yard.can_place(ship, p(1, 2), BuildKind::Turret).unwrap());
        assert!(yard.can_place(ship, p(1, 1), BuildKind::Turret).unwrap());
        assert!(yard.place(ship, p(1, 1), BuildKind::Turret).unwrap());
        yard.finish_build(ship).unwrap();
        let hull = yard.hull(ship).unwrap();
        assert_eq!(hull.upgrade_count(UpgradeKind::Turret), 1);
        assert_eq!(hull.upgrade_count(UpgradeKind::Thruster), 1);
    }

    #[test]
    fn test_invalid_design_is_rejected() {
        let mut yard = Shipyard::new();
        let design = ShipDesign {
            width: 3,
            height: 1,
            components: vec![ComponentSpec::new(0, 0), ComponentSpec::new(2, 0)],
        };
        assert!(matches!(
            yard.spawn_design("Broken", &design),
            Err(ShipyardError::Design(_))
        ));
        assert_eq!(yard.ship_count(), 0);
    }

    #[test]
    fn test_spawn_generated_and_fleet_mass() {
        let mut yard = Shipyard::new();
        let mut rng = StdRng::seed_from_u64(7);
        let config = GeneratorConfig::default();
        let a = yard.spawn_generated(&config, &mut rng);
        let b = yard.spawn_generated(&config, &mut rng);
        yard.update();
        assert_eq!(yard.ship_count(), 2);
        assert_eq!(yard.tick(), 1);
        let expected = yard.mass_properties(a).unwrap().mass + yard.mass_properties(b).unwrap().mass;
        assert!((yard.fleet_mass() - expected).abs() < 1e-3);
    }
}
