//! Integration tests for Edit-and-Continue slot identity mapping.
//!
//! Identities derive only from the declaring syntax node's offset, so recompiling
//! identical source must reproduce the exact same map. Duplicate identities from
//! duplicated lowering are separated by deterministic ordinals; duplicate identities
//! on simultaneously live user locals are a compiler bug and must fail loudly.

use dotpdb::prelude::*;
use dotpdb::synthesis::SlotIdentityMapper;

fn slot(index: u16, kind: LocalSlotKind, syntax_offset: i32, range: (u32, u32)) -> LocalSymbol {
    LocalSymbol {
        slot: index,
        name: Some(format!("local{index}")),
        kind,
        syntax_offset: SyntaxOffset(syntax_offset),
        shape: TypeShape::Object,
        live_range: range,
        attributes: LocalVariableAttributes::empty(),
        constant_value: None,
    }
}

/// Rebuilding the map from an identical symbol table yields an identical map. This is
/// the identity-preservation guarantee Edit-and-Continue relies on.
#[test]
fn identical_inputs_reproduce_identical_maps() -> Result<()> {
    let mut input = MethodInput::new(MethodId(1), DocumentId(0), 0x40);
    input.symbols.locals.push(slot(0, LocalSlotKind::UserDefined, 4, (0, 0x40)));
    input.symbols.locals.push(slot(1, LocalSlotKind::LoopControl, 20, (0x10, 0x30)));
    input.symbols.locals.push(slot(2, LocalSlotKind::ForEachEnumerator, 20, (0x08, 0x38)));

    let first = SlotIdentityMapper::map(&input)?;
    let second = SlotIdentityMapper::map(&input)?;
    assert_eq!(first, second);

    let Some(CustomDebugInfo::EncLocalSlotMap(identities)) = first else {
        panic!("expected a slot map");
    };
    assert_eq!(identities.len(), 3);
    assert_eq!(identities[0].kind, LocalSlotKind::UserDefined);
    assert_eq!(identities[0].syntax_offset, SyntaxOffset(4));
    assert_eq!(identities[0].ordinal, 0);
    Ok(())
}

/// A duplicated finally body produces two temps of the same kind at the same syntax
/// offset; ordinals 0 and 1 separate them in physical slot order.
#[test]
fn duplicate_identities_receive_slot_order_ordinals() -> Result<()> {
    let mut input = MethodInput::new(MethodId(2), DocumentId(0), 0x40);
    input.symbols.locals.push(slot(0, LocalSlotKind::PatternMatchTemp, 12, (0x00, 0x18)));
    input.symbols.locals.push(slot(1, LocalSlotKind::PatternMatchTemp, 12, (0x20, 0x38)));

    let Some(CustomDebugInfo::EncLocalSlotMap(identities)) = SlotIdentityMapper::map(&input)?
    else {
        panic!("expected a slot map");
    };
    assert_eq!(identities[0].ordinal, 0);
    assert_eq!(identities[1].ordinal, 1);
    assert_eq!(identities[0].syntax_offset, identities[1].syntax_offset);
    Ok(())
}

/// Short-lived emitter temps have no cross-edit identity and must not appear.
#[test]
fn short_lived_temps_and_constants_are_excluded() -> Result<()> {
    let mut input = MethodInput::new(MethodId(3), DocumentId(0), 0x40);
    input.symbols.locals.push(slot(0, LocalSlotKind::UserDefined, 4, (0, 0x40)));
    input.symbols.locals.push(slot(1, LocalSlotKind::EmitterTemp, 8, (0x04, 0x08)));
    let mut constant = slot(2, LocalSlotKind::UserConstant, 16, (0, 0x40));
    constant.constant_value = Some(ConstantValue::Int32(42));
    input.symbols.locals.push(constant);

    let Some(CustomDebugInfo::EncLocalSlotMap(identities)) = SlotIdentityMapper::map(&input)?
    else {
        panic!("expected a slot map");
    };
    assert_eq!(identities.len(), 1);
    assert_eq!(identities[0].kind, LocalSlotKind::UserDefined);
    Ok(())
}

/// A method with only emitter temps produces no map at all rather than an empty one.
#[test]
fn no_long_lived_slots_produces_no_record() -> Result<()> {
    let mut input = MethodInput::new(MethodId(4), DocumentId(0), 0x20);
    input.symbols.locals.push(slot(0, LocalSlotKind::EmitterTemp, 0, (0, 0x10)));
    assert_eq!(SlotIdentityMapper::map(&input)?, None);
    Ok(())
}

/// Two user-declared locals with one identity and overlapping liveness cannot both
/// come from legal source; the mapper rejects the table instead of inventing ordinals.
#[test]
fn overlapping_user_locals_with_one_identity_are_fatal() {
    let mut input = MethodInput::new(MethodId(5), DocumentId(0), 0x40);
    input.symbols.locals.push(slot(0, LocalSlotKind::UserDefined, 4, (0x00, 0x30)));
    input.symbols.locals.push(slot(1, LocalSlotKind::UserDefined, 4, (0x10, 0x40)));

    let err = SlotIdentityMapper::map(&input).unwrap_err();
    assert!(matches!(err, Error::InvariantViolation { .. }));
}

/// The same pair is fine when their live ranges are disjoint (scoped redeclaration
/// after duplicated lowering).
#[test]
fn disjoint_user_locals_with_one_identity_get_ordinals() -> Result<()> {
    let mut input = MethodInput::new(MethodId(6), DocumentId(0), 0x40);
    input.symbols.locals.push(slot(0, LocalSlotKind::UserDefined, 4, (0x00, 0x18)));
    input.symbols.locals.push(slot(1, LocalSlotKind::UserDefined, 4, (0x20, 0x40)));

    let Some(CustomDebugInfo::EncLocalSlotMap(identities)) = SlotIdentityMapper::map(&input)?
    else {
        panic!("expected a slot map");
    };
    assert_eq!(identities[0].ordinal, 0);
    assert_eq!(identities[1].ordinal, 1);
    Ok(())
}
