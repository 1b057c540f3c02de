//! Lexical scope records: nested offset ranges over which named locals and constants are
//! valid for display and lookup.
//!
//! The scope tree is owned top-down (children live inside their parent node); there are
//! no parent pointers, so the tree cannot form reference cycles. Structural invariants -
//! `start <= end`, child containment, sibling disjointness - are enforced by the builder
//! in [`crate::synthesis::scopes`] and re-checkable here via [`Scope::validate`].

use crate::records::slot::LocalVariableAttributes;
use crate::lowered::symbols::ConstantValue;
use crate::Result;

/// A named local variable attached to a scope node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLocal {
    /// Display name.
    pub name: String,
    /// Physical local slot index.
    pub slot: u16,
    /// Attribute flags.
    pub attributes: LocalVariableAttributes,
}

/// A named constant attached to a scope node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeConstant {
    /// Display name.
    pub name: String,
    /// The compile-time value.
    pub value: ConstantValue,
}

/// One node of a method's lexical scope tree.
///
/// The offset range is `[start_offset, end_offset)`. A child's range is fully contained
/// in its parent's, and scopes at the same nesting level never overlap. Nodes that would
/// declare nothing are never materialized (empty-scope elision happens in the builder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// IL offset where the scope begins.
    pub start_offset: u32,
    /// IL offset one past the scope's end.
    pub end_offset: u32,
    /// Named locals valid in this scope.
    pub locals: Vec<ScopeLocal>,
    /// Named constants valid in this scope.
    pub constants: Vec<ScopeConstant>,
    /// Child scopes, ordered by start offset.
    pub children: Vec<Scope>,
}

impl Scope {
    /// Create an empty scope over the given range.
    #[must_use]
    pub fn new(start_offset: u32, end_offset: u32) -> Self {
        Self {
            start_offset,
            end_offset,
            locals: Vec::new(),
            constants: Vec::new(),
            children: Vec::new(),
        }
    }

    /// True if this node declares no locals and no constants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locals.is_empty() && self.constants.is_empty()
    }

    /// True if `other`'s range is fully contained in this scope's range.
    #[must_use]
    pub fn contains(&self, other: &Scope) -> bool {
        self.start_offset <= other.start_offset && other.end_offset <= self.end_offset
    }

    /// Total number of nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Scope::node_count).sum::<usize>()
    }

    /// Depth-first iterator over all nodes of the subtree.
    pub fn iter(&self) -> ScopeIter<'_> {
        ScopeIter { stack: vec![self] }
    }

    /// Re-check the structural invariants of this subtree.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvariantViolation`] if a node's range is inverted, a
    /// child escapes its parent's range, or two siblings overlap.
    pub fn validate(&self) -> Result<()> {
        if self.start_offset > self.end_offset {
            return Err(invariant_error!(
                "scope range inverted: [{:#x}, {:#x})",
                self.start_offset,
                self.end_offset
            ));
        }

        for child in &self.children {
            if !self.contains(child) {
                return Err(invariant_error!(
                    "child scope [{:#x}, {:#x}) escapes parent [{:#x}, {:#x})",
                    child.start_offset,
                    child.end_offset,
                    self.start_offset,
                    self.end_offset
                ));
            }
            child.validate()?;
        }

        for pair in self.children.windows(2) {
            if pair[1].start_offset < pair[0].end_offset {
                return Err(invariant_error!(
                    "sibling scopes overlap: [{:#x}, {:#x}) and [{:#x}, {:#x})",
                    pair[0].start_offset,
                    pair[0].end_offset,
                    pair[1].start_offset,
                    pair[1].end_offset
                ));
            }
        }

        Ok(())
    }
}

/// Depth-first iterator over a scope subtree.
pub struct ScopeIter<'a> {
    stack: Vec<&'a Scope>,
}

impl<'a> Iterator for ScopeIter<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so children come out in start-offset order.
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
