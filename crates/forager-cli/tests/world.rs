use forager::world::{Movement, ResourceKind, ResourceNode, Unit};
use forager::ForagerWorld;
use goap_core::EntityRef;

fn world_with_unit(position: f32) -> ForagerWorld {
    let mut world = ForagerWorld::new(0.0, -2.0);
    world.units.insert(1, Unit::new(position));
    world.nodes = vec![
        ResourceNode {
            id: EntityRef(10),
            kind: ResourceKind::Wood,
            position: 3.0,
            amount: 1,
        },
        ResourceNode {
            id: EntityRef(11),
            kind: ResourceKind::Wood,
            position: -3.0,
            amount: 2,
        },
        ResourceNode {
            id: EntityRef(12),
            kind: ResourceKind::Stone,
            position: 1.0,
            amount: 0,
        },
    ];
    world
}

#[test]
fn step_towards_burns_fuel_and_arrives() {
    let mut world = world_with_unit(0.0);

    assert_eq!(world.step_towards(1, 2.5), Movement::Moving);
    assert_eq!(world.step_towards(1, 2.5), Movement::Moving);
    assert_eq!(world.step_towards(1, 2.5), Movement::Arrived);

    let unit = world.unit(1).unwrap();
    assert_eq!(unit.position, 2.5);
    assert_eq!(unit.fuel, 8.5);

    // Already there: no fuel spent.
    assert_eq!(world.step_towards(1, 2.5), Movement::Arrived);
    assert_eq!(world.unit(1).unwrap().fuel, 8.5);
}

#[test]
fn empty_tank_stops_the_unit() {
    let mut world = world_with_unit(0.0);
    world.unit_mut(1).unwrap().fuel = 0.4;

    assert_eq!(world.step_towards(1, 5.0), Movement::OutOfFuel);
    assert_eq!(world.unit(1).unwrap().position, 0.0);

    assert!(world.refill(1));
    assert_eq!(world.unit(1).unwrap().fuel, 10.0);
    assert_eq!(world.step_towards(1, 5.0), Movement::Moving);
}

#[test]
fn unknown_unit_cannot_move() {
    let mut world = world_with_unit(0.0);
    assert_eq!(world.step_towards(9, 1.0), Movement::OutOfFuel);
    assert!(!world.refill(9));
}

#[test]
fn nearest_node_skips_depleted_and_prefers_first_on_ties() {
    let world = world_with_unit(0.0);

    // 10 and 11 are equally far; 10 is listed first.
    assert_eq!(
        world.nearest_node(ResourceKind::Wood, 0.0).map(|n| n.id),
        Some(EntityRef(10))
    );
    assert_eq!(
        world.nearest_node(ResourceKind::Wood, -1.0).map(|n| n.id),
        Some(EntityRef(11))
    );
    assert!(world.nearest_node(ResourceKind::Stone, 0.0).is_none());
    assert!(world.nearest_node(ResourceKind::Ore, 0.0).is_none());
}

#[test]
fn harvest_and_deposit_move_one_item() {
    let mut world = world_with_unit(3.0);

    assert_eq!(world.harvest(1, EntityRef(10)), Some(ResourceKind::Wood));
    assert_eq!(world.node(EntityRef(10)).unwrap().amount, 0);
    assert_eq!(world.unit(1).unwrap().carrying, Some(ResourceKind::Wood));

    // Hands are full.
    assert_eq!(world.harvest(1, EntityRef(11)), None);
    assert_eq!(world.node(EntityRef(11)).unwrap().amount, 2);

    assert_eq!(world.deposit(1), Some(ResourceKind::Wood));
    assert_eq!(world.deposited(ResourceKind::Wood), 1);
    assert_eq!(world.deposit(1), None);

    // Depleted node.
    assert_eq!(world.harvest(1, EntityRef(10)), None);
}

#[test]
fn arrival_observers_fire_until_released() {
    let mut world = world_with_unit(0.0);

    let id = world.watch_arrival(1, 1.0);
    assert_eq!(world.observer_count(), 1);

    assert_eq!(world.step_towards(1, 1.0), Movement::Arrived);
    assert_eq!(world.arrivals(), 1);

    // Different target.
    world.step_towards(1, 0.0);
    assert_eq!(world.arrivals(), 1);

    assert!(world.unwatch(id));
    assert!(!world.unwatch(id));
    assert_eq!(world.observer_count(), 0);

    world.step_towards(1, 1.0);
    assert_eq!(world.arrivals(), 1);
}

#[test]
fn resource_codes_round_trip() {
    for kind in [ResourceKind::Wood, ResourceKind::Stone, ResourceKind::Ore] {
        assert_eq!(ResourceKind::from_code(kind.code()), Some(kind));
    }
    assert_eq!(ResourceKind::from_code(7), None);
    assert_eq!(ResourceKind::Stone.to_string(), "stone");
}
