//! Dynamic-type flag encoding for locals and constants.
//!
//! A local whose declared type contains the dynamic placeholder anywhere in its shape
//! gets a bit string: one bit per type position in a fixed pre-order walk (the type
//! itself, then each generic argument, array or pointer element, or tuple element in
//! declaration order), set where the position is the placeholder.
//!
//! Two caps safeguard the consuming debugger format, and both omit rather than
//! truncate: a shape producing more than 64 positions yields no record at all, and so
//! does a target whose display name exceeds 63 UTF-16 code units. A truncated bit
//! string would silently mislabel positions, which is worse than the fallback of
//! treating the local as statically typed `object`.

use widestring::Utf16String;

use crate::lowered::symbols::{LocalSymbol, TypeShape};
use crate::lowered::MethodInput;
use crate::records::customdebuginfo::{CustomDebugInfo, DynamicFlagRecord, SlotOrConstant};
use crate::{Error, Result};

/// Maximum number of flag positions one record can carry.
pub const MAX_FLAG_POSITIONS: usize = 64;

/// Maximum display-name length in UTF-16 code units for per-local records.
pub const MAX_NAME_UTF16_UNITS: usize = 63;

/// Maximum nesting depth of a type shape the encoders will walk.
pub const MAX_SHAPE_DEPTH: usize = 128;

/// Encodes dynamic-type flag records for one method.
pub struct DynamicFlagEncoder;

impl DynamicFlagEncoder {
    /// Encode flag records for every local and constant of `input` whose type shape
    /// contains the dynamic placeholder. Targets whose shape or name exceeds the caps
    /// are silently skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecursionLimit`] for a shape nested deeper than
    /// [`MAX_SHAPE_DEPTH`].
    pub fn encode(input: &MethodInput) -> Result<Option<CustomDebugInfo>> {
        let mut records: Vec<DynamicFlagRecord> = Vec::new();

        for symbol in &input.symbols.locals {
            if !symbol.shape.contains_dynamic() {
                continue;
            }
            if name_exceeds_cap(symbol) {
                continue;
            }

            let mut bits: Vec<bool> = Vec::new();
            walk_flags(&symbol.shape, &mut bits, 0)?;
            if bits.is_empty() || bits.len() > MAX_FLAG_POSITIONS {
                continue;
            }

            let mut flags = 0u64;
            for (index, &bit) in bits.iter().enumerate() {
                if bit {
                    flags |= 1 << index;
                }
            }
            records.push(DynamicFlagRecord {
                target: target_of(symbol),
                flags,
                count: bits.len() as u8,
            });
        }

        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CustomDebugInfo::DynamicLocals(records)))
        }
    }
}

/// The record target for a symbol: constants attach by name, variables by slot.
pub(crate) fn target_of(symbol: &LocalSymbol) -> SlotOrConstant {
    if symbol.is_constant() {
        SlotOrConstant::Constant {
            name: symbol.name.clone().unwrap_or_default(),
        }
    } else {
        SlotOrConstant::Slot(symbol.slot)
    }
}

/// True if the symbol has a display name longer than the per-record cap, measured in
/// UTF-16 code units as the consuming format stores names.
pub(crate) fn name_exceeds_cap(symbol: &LocalSymbol) -> bool {
    symbol
        .name
        .as_deref()
        .is_some_and(|name| Utf16String::from_str(name).len() > MAX_NAME_UTF16_UNITS)
}

fn walk_flags(shape: &TypeShape, bits: &mut Vec<bool>, depth: usize) -> Result<()> {
    if depth > MAX_SHAPE_DEPTH {
        return Err(Error::RecursionLimit(MAX_SHAPE_DEPTH));
    }
    // Early exit once over the cap; the caller drops the record either way.
    if bits.len() > MAX_FLAG_POSITIONS {
        return Ok(());
    }

    match shape {
        TypeShape::Dynamic => bits.push(true),
        TypeShape::Object => bits.push(false),
        TypeShape::Named { args, .. } => {
            bits.push(false);
            for arg in args {
                walk_flags(arg, bits, depth + 1)?;
            }
        }
        TypeShape::Array { element, .. } | TypeShape::Pointer(element) => {
            bits.push(false);
            walk_flags(element, bits, depth + 1)?;
        }
        TypeShape::Tuple { elements } => {
            bits.push(false);
            for (_, element) in elements {
                walk_flags(element, bits, depth + 1)?;
            }
        }
    }
    Ok(())
}
