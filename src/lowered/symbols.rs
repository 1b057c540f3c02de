//! Per-method symbol tables: locals, lambdas, closures, and hoisted state-machine variables.
//!
//! The symbol table is the second half of the engine's input. Where [`crate::lowered::body`]
//! describes *where* things happen in the IL stream, this module describes *what* was
//! declared: every physical local slot with its kind, declaring syntax offset and type
//! shape, every lambda and closure with its defining offset, and - for state-machine
//! methods - every hoisted variable with its field index and live range.
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`] because they contain only owned data.

use crate::lowered::span::SyntaxOffset;
use crate::records::method::MethodId;
use crate::records::slot::{LocalSlotKind, LocalVariableAttributes};

/// A minimal recursive description of a local's declared type.
///
/// Only the facts the debug records need survive here: generic nesting and declaration
/// order (for the pre-order dynamic-flag walk), array ranks, tuple element names, and
/// which leaves are the dynamic placeholder. Everything else about the type was consumed
/// upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// A named type with its generic arguments in declaration order.
    Named {
        /// Fully qualified type name.
        name: String,
        /// Generic arguments in declaration order. Empty for non-generic types.
        args: Vec<TypeShape>,
    },
    /// An array type of the given rank.
    Array {
        /// Array rank (1 for vectors).
        rank: u32,
        /// Element type.
        element: Box<TypeShape>,
    },
    /// An unmanaged pointer type.
    Pointer(Box<TypeShape>),
    /// A tuple type with optionally named elements in declaration order.
    Tuple {
        /// `(element name, element shape)` pairs; the name is `None` for unnamed positions.
        elements: Vec<(Option<String>, TypeShape)>,
    },
    /// The dynamic placeholder leaf (`dynamic` in source).
    Dynamic,
    /// The statically typed `object` leaf. Occupies a flag position but is not dynamic.
    Object,
}

impl TypeShape {
    /// True if the dynamic placeholder appears anywhere in this shape.
    #[must_use]
    pub fn contains_dynamic(&self) -> bool {
        match self {
            TypeShape::Dynamic => true,
            TypeShape::Object => false,
            TypeShape::Named { args, .. } => args.iter().any(TypeShape::contains_dynamic),
            TypeShape::Array { element, .. } | TypeShape::Pointer(element) => {
                element.contains_dynamic()
            }
            TypeShape::Tuple { elements } => {
                elements.iter().any(|(_, shape)| shape.contains_dynamic())
            }
        }
    }

    /// True if a tuple with at least one named element appears anywhere in this shape.
    #[must_use]
    pub fn contains_named_tuple(&self) -> bool {
        match self {
            TypeShape::Dynamic | TypeShape::Object => false,
            TypeShape::Named { args, .. } => args.iter().any(TypeShape::contains_named_tuple),
            TypeShape::Array { element, .. } | TypeShape::Pointer(element) => {
                element.contains_named_tuple()
            }
            TypeShape::Tuple { elements } => {
                elements.iter().any(|(name, _)| name.is_some())
                    || elements
                        .iter()
                        .any(|(_, shape)| shape.contains_named_tuple())
            }
        }
    }
}

/// A compile-time constant value carried by a user constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstantValue {
    /// The `null` literal.
    Null,
    /// A boolean constant.
    Boolean(bool),
    /// A 32-bit integer constant.
    Int32(i32),
    /// A 64-bit integer constant.
    Int64(i64),
    /// A string constant.
    String(String),
}

/// One physical local slot of a method, as declared by lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSymbol {
    /// Physical slot index in the method's local signature.
    pub slot: u16,
    /// Declared name. `None` for nameless compiler temps.
    pub name: Option<String>,
    /// The slot kind.
    pub kind: LocalSlotKind,
    /// Position of the declaring syntax node relative to the method's syntax start.
    pub syntax_offset: SyntaxOffset,
    /// Declared type shape.
    pub shape: TypeShape,
    /// Offset range `[start, end)` over which the slot holds a live value.
    pub live_range: (u32, u32),
    /// Attribute flags for this local.
    pub attributes: LocalVariableAttributes,
    /// The constant value, when this symbol is a user constant rather than a variable.
    pub constant_value: Option<ConstantValue>,
}

impl LocalSymbol {
    /// True if this symbol is a user constant.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.constant_value.is_some()
    }
}

/// A lambda, local function, or query-clause-desugared lambda defined inside a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LambdaSymbol {
    /// Defining syntax offset, relative to the enclosing method's syntax start.
    pub syntax_offset: SyntaxOffset,
    /// Defining syntax offset of the closure capturing this lambda's variables, when any
    /// captured variable required a synthesized closure object.
    pub closure: Option<SyntaxOffset>,
}

/// A synthesized closure class instance, identified by the syntax node that caused its
/// creation. Stored by offset, not by reference, so lambda and closure records never form
/// ownership cycles; the link is resolved by lookup at serialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureSymbol {
    /// Defining syntax offset of the scope introducing the closure.
    pub syntax_offset: SyntaxOffset,
}

/// A local promoted to a field of a generated state-machine type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoistedVariable {
    /// Index of the hoisted field within the state-machine type.
    pub field_index: u32,
    /// Display name of the original local.
    pub name: String,
    /// Offset range `[start, end)` in the MoveNext body over which the field should be
    /// treated as an in-scope named local. Clipped against dead ranges by the mapper.
    pub range: (u32, u32),
}

/// The flavor of state-machine rewriting applied to a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum StateMachineKind {
    /// `async` method lowering.
    Async,
    /// Iterator (`yield`) lowering.
    Iterator,
    /// `async` iterator lowering.
    AsyncIterator,
}

/// How a method relates to state-machine lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodRole {
    /// An ordinary method: full debug record.
    Ordinary,
    /// The original (kickoff) declaration of a state-machine method. Its record
    /// degenerates to a single forward pointer to the generated MoveNext method.
    StateMachineKickoff {
        /// The generated MoveNext method.
        move_next: MethodId,
        /// The rewriting flavor.
        kind: StateMachineKind,
    },
    /// The generated MoveNext method of a state machine. Carries ordinary sequence
    /// points and scopes plus hoisted-local scopes and the link back to the kickoff.
    StateMachineMoveNext {
        /// The original (kickoff) method.
        kickoff: MethodId,
        /// The rewriting flavor.
        kind: StateMachineKind,
        /// IL offsets of compiler-injected catch-and-rethrow dispatch handlers the
        /// debugger must not stop inside.
        catch_handler_offsets: Vec<u32>,
    },
}

/// The complete symbol table of one lowered method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbols {
    /// All physical local slots, ordered by slot index.
    pub locals: Vec<LocalSymbol>,
    /// Lambdas and local functions defined in the method.
    pub lambdas: Vec<LambdaSymbol>,
    /// Synthesized closures created for captured variables.
    pub closures: Vec<ClosureSymbol>,
    /// Hoisted variables, for state-machine MoveNext methods.
    pub hoisted: Vec<HoistedVariable>,
    /// The method's relation to state-machine lowering.
    pub role: MethodRole,
}

impl MethodSymbols {
    /// Create an empty symbol table for an ordinary method.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locals: Vec::new(),
            lambdas: Vec::new(),
            closures: Vec::new(),
            hoisted: Vec::new(),
            role: MethodRole::Ordinary,
        }
    }

    /// Look up a local symbol by physical slot index.
    #[must_use]
    pub fn local(&self, slot: u16) -> Option<&LocalSymbol> {
        self.locals.iter().find(|local| local.slot == slot)
    }
}

impl Default for MethodSymbols {
    fn default() -> Self {
        Self::new()
    }
}
