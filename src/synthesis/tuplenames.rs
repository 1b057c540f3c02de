//! Tuple element name encoding for locals and constants.
//!
//! A local whose declared type contains a tuple with at least one named element gets a
//! record listing one entry per type position, in the same pre-order walk the dynamic
//! flag encoder uses. Positions that are named tuple elements carry their name; every
//! other position is `None`. The record is scoped to the offset range over which the
//! declaring local is live, so tools bind the names only where the local is.
//!
//! Unlike dynamic flags, the position list is not capped at 64; the layout is
//! string-based. The 63-UTF-16-unit display-name cap on the declared local still
//! applies and omits the whole record, never truncating.

use crate::lowered::symbols::TypeShape;
use crate::lowered::MethodInput;
use crate::records::customdebuginfo::{CustomDebugInfo, TupleNameRecord};
use crate::synthesis::dynamicflags::{name_exceeds_cap, target_of, MAX_SHAPE_DEPTH};
use crate::{Error, Result};

/// Encodes tuple-name records for one method.
pub struct TupleNameEncoder;

impl TupleNameEncoder {
    /// Encode tuple-name records for every local and constant of `input` whose type
    /// shape contains a named tuple. Targets whose display name exceeds the cap are
    /// silently skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecursionLimit`] for a shape nested deeper than
    /// [`MAX_SHAPE_DEPTH`].
    pub fn encode(input: &MethodInput) -> Result<Option<CustomDebugInfo>> {
        let mut records: Vec<TupleNameRecord> = Vec::new();

        for symbol in &input.symbols.locals {
            if !symbol.shape.contains_named_tuple() {
                continue;
            }
            if name_exceeds_cap(symbol) {
                continue;
            }

            let mut names: Vec<Option<String>> = Vec::new();
            walk_names(&symbol.shape, None, &mut names, 0)?;
            records.push(TupleNameRecord {
                target: target_of(symbol),
                names,
                start_offset: symbol.live_range.0,
                end_offset: symbol.live_range.1,
            });
        }

        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CustomDebugInfo::TupleElementNames(records)))
        }
    }
}

fn walk_names(
    shape: &TypeShape,
    position_name: Option<&str>,
    names: &mut Vec<Option<String>>,
    depth: usize,
) -> Result<()> {
    if depth > MAX_SHAPE_DEPTH {
        return Err(Error::RecursionLimit(MAX_SHAPE_DEPTH));
    }

    names.push(position_name.map(str::to_string));
    match shape {
        TypeShape::Dynamic | TypeShape::Object => {}
        TypeShape::Named { args, .. } => {
            for arg in args {
                walk_names(arg, None, names, depth + 1)?;
            }
        }
        TypeShape::Array { element, .. } | TypeShape::Pointer(element) => {
            walk_names(element, None, names, depth + 1)?;
        }
        TypeShape::Tuple { elements } => {
            for (name, element) in elements {
                walk_names(element, name.as_deref(), names, depth + 1)?;
            }
        }
    }
    Ok(())
}
