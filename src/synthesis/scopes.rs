//! Scope tree construction from the lowered body's lexical regions.
//!
//! Each [`LexicalRegion`] contributes up to two scope nodes depending on the roles of
//! the locals it declares:
//!
//! - Enumerator/array/index temps and `using`/`lock` resources live in an *outer* node
//!   spanning the whole construct from its header (acquisition site, loop header) to its
//!   end, including any implicit cleanup dispatch.
//! - Declared locals, loop control variables, exception variables and pattern bindings
//!   live in an *inner* node spanning the construct's body only.
//!
//! Regions that declare nothing are elided and their children spliced into the nearest
//! materialized ancestor. The root scope always spans the full method body.

use crate::lowered::body::{LexicalRegion, RegionLocalRole};
use crate::lowered::MethodInput;
use crate::records::scope::{Scope, ScopeConstant, ScopeLocal};
use crate::Result;

/// Builds the nested lexical scope tree of one lowered method.
pub struct ScopeTreeBuilder;

impl ScopeTreeBuilder {
    /// Build and validate the scope tree for `input`.
    ///
    /// The returned root always spans `[0, code_size)`. Callers may drop a root that is
    /// empty and childless rather than emitting it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvariantViolation`] when a region's offsets are
    /// inconsistent, a region references an unknown or nameless slot, or the finished
    /// tree violates containment or sibling disjointness.
    pub fn build(input: &MethodInput) -> Result<Scope> {
        let regions = &input.body.regions;

        let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); regions.len()];
        let mut top_level: Vec<usize> = Vec::new();
        for (index, region) in regions.iter().enumerate() {
            match region.parent {
                Some(parent) => {
                    if parent >= regions.len() || parent == index {
                        return Err(invariant_error!(
                            "region {} in {} has invalid parent index {}",
                            index,
                            input.id,
                            parent
                        ));
                    }
                    children_of[parent].push(index);
                }
                None => top_level.push(index),
            }
        }

        let mut root = Scope::new(0, input.body.code_size);
        for &index in &top_level {
            let scopes = Self::build_region(input, regions, &children_of, index, 0)?;
            for scope in scopes {
                // The outermost block shares the root's range; fold it in rather than
                // nesting an identical child.
                if scope.start_offset == root.start_offset && scope.end_offset == root.end_offset {
                    root.locals.extend(scope.locals);
                    root.constants.extend(scope.constants);
                    root.children.extend(scope.children);
                } else {
                    root.children.push(scope);
                }
            }
        }
        root.children.sort_by_key(|scope| scope.start_offset);

        root.validate()?;
        Ok(root)
    }

    fn build_region(
        input: &MethodInput,
        regions: &[LexicalRegion],
        children_of: &[Vec<usize>],
        index: usize,
        depth: usize,
    ) -> Result<Vec<Scope>> {
        if depth > regions.len() {
            return Err(invariant_error!(
                "region parent links form a cycle in {}",
                input.id
            ));
        }
        let region = &regions[index];

        if region.header_offset > region.body_start || region.body_start > region.end_offset {
            return Err(invariant_error!(
                "region {} in {} has inconsistent offsets: header {:#x}, body {:#x}, end {:#x}",
                region.kind,
                input.id,
                region.header_offset,
                region.body_start,
                region.end_offset
            ));
        }

        let mut children: Vec<Scope> = Vec::new();
        for &child in &children_of[index] {
            children.extend(Self::build_region(
                input,
                regions,
                children_of,
                child,
                depth + 1,
            )?);
        }
        children.sort_by_key(|scope| scope.start_offset);

        // Whole-construct roles versus body-only roles.
        let mut outer = Scope::new(region.header_offset, region.end_offset);
        let mut inner = Scope::new(region.body_start, region.end_offset);
        for local in &region.locals {
            let target = match local.role {
                RegionLocalRole::IterationTemp | RegionLocalRole::Resource => &mut outer,
                RegionLocalRole::Declared
                | RegionLocalRole::ControlVariable
                | RegionLocalRole::ExceptionVariable
                | RegionLocalRole::PatternBinding => &mut inner,
            };
            Self::attach(input, local.slot, target)?;
        }

        match (inner.is_empty(), outer.is_empty()) {
            (true, true) => Ok(children),
            (false, true) => {
                inner.children = children;
                Ok(vec![inner])
            }
            (true, false) => {
                outer.children = children;
                Ok(vec![outer])
            }
            (false, false) => {
                inner.children = children;
                outer.children = vec![inner];
                Ok(vec![outer])
            }
        }
    }

    fn attach(input: &MethodInput, slot: u16, scope: &mut Scope) -> Result<()> {
        let symbol = input.symbols.local(slot).ok_or_else(|| {
            invariant_error!(
                "region in {} declares slot {} which is missing from the symbol table",
                input.id,
                slot
            )
        })?;
        let name = symbol.name.clone().ok_or_else(|| {
            invariant_error!(
                "region-declared slot {} in {} has no display name",
                slot,
                input.id
            )
        })?;

        match &symbol.constant_value {
            Some(value) => scope.constants.push(ScopeConstant {
                name,
                value: value.clone(),
            }),
            None => scope.locals.push(ScopeLocal {
                name,
                slot,
                attributes: symbol.attributes,
            }),
        }
        Ok(())
    }
}
