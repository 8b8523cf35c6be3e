use goap_core::{ConditionSet, EntityRef, Memory, MemoryKey, MemoryValue};

#[test]
fn memory_set_get_remove_roundtrip() {
    let mut memory = Memory::new();
    assert!(!memory.contains(MemoryKey::ItemLocated));
    assert_eq!(memory.get(MemoryKey::ItemLocated), None);

    memory.set(MemoryKey::ItemLocated, true);
    memory.set(MemoryKey::TargetEntity, EntityRef(7));
    memory.set(MemoryKey::ResourceGoalType, MemoryValue::Enum(2));

    assert_eq!(memory.get_bool(MemoryKey::ItemLocated), Some(true));
    assert_eq!(memory.get_entity(MemoryKey::TargetEntity), Some(EntityRef(7)));
    assert_eq!(memory.get_enum(MemoryKey::ResourceGoalType), Some(2));
    assert_eq!(memory.get_int(MemoryKey::ResourceGoalType), None);

    assert_eq!(
        memory.remove(MemoryKey::ItemLocated),
        Some(MemoryValue::Bool(true))
    );
    assert_eq!(memory.get(MemoryKey::ItemLocated), None);
    assert_eq!(memory.len(), 2);
}

#[test]
fn last_writer_wins() {
    let mut memory = Memory::new();
    memory.set(MemoryKey::LowFuel, true);
    let previous = memory.set(MemoryKey::LowFuel, false);
    assert_eq!(previous, Some(MemoryValue::Bool(true)));
    assert_eq!(memory.get_bool(MemoryKey::LowFuel), Some(false));
}

#[test]
fn has_distinguishes_unknown_from_false() {
    let mut memory = Memory::new();
    assert!(!memory.has(MemoryKey::LowFuel, MemoryValue::Bool(false)));
    memory.set(MemoryKey::LowFuel, false);
    assert!(memory.has(MemoryKey::LowFuel, MemoryValue::Bool(false)));
    assert!(!memory.has(MemoryKey::LowFuel, MemoryValue::Bool(true)));
}

#[test]
fn apply_writes_effects_and_satisfies_them() {
    let effects = ConditionSet::new([
        (MemoryKey::IsHoldingItem, true),
        (MemoryKey::ItemLocated, false),
    ]);
    let mut memory = Memory::new();
    memory.set(MemoryKey::ItemLocated, true);

    assert!(!memory.satisfies(&effects));
    memory.apply(&effects);
    assert!(memory.satisfies(&effects));
    assert_eq!(memory.get_bool(MemoryKey::ItemLocated), Some(false));
}

#[test]
fn display_lists_keys_in_order() {
    let mut memory = Memory::new();
    memory.set(MemoryKey::LowFuel, true);
    memory.set(MemoryKey::ItemLocated, false);
    memory.set(MemoryKey::Custom(3), 12i64);
    assert_eq!(
        memory.to_string(),
        "{item_located: false, low_fuel: true, custom#3: 12}"
    );
}
