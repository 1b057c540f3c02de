//! Lowered method bodies - the input the compiler hands to the synthesis engine.
//!
//! A [`LoweredBody`] is the flattened, emission-ordered view of a method after all lowering
//! passes have run: loops rewritten into jumps, `using`/`lock` expanded into try/finally,
//! pattern matching compiled into dispatch, async/iterator methods rewritten into state
//! machines. Every node that survives lowering either retains its originating source span
//! or is an explicitly synthetic dispatch node with no span at all.
//!
//! # Architecture
//!
//! The body carries three parallel views:
//!
//! - [`LoweredStatement`]s in emission order, each annotated with its IL offset, its
//!   evaluation-stack depth at the statement boundary, and an optional [`SourceSpan`].
//!   These drive sequence-point collection.
//! - [`LexicalRegion`]s describing the lexical structure (blocks, loops, catch clauses,
//!   `using`/`lock` statements, switch arms) together with the locals each construct
//!   declares and the role those locals play. These drive scope-tree construction.
//! - Dead ranges: offset intervals proven unreachable by lowering (a `throw` before a
//!   loop exit, dead switch arms). Hoisted-local scopes are clipped against these.
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`] because they contain only owned data.

use crate::lowered::span::SourceSpan;
use crate::records::document::DocumentId;

/// The language-significant kind of a lowered statement.
///
/// The kind decides whether the statement contributes a sequence point and whether that
/// point is visible or hidden. Kinds representing compiler-synthesized control flow
/// (back-edges, dispatch, resumption) always produce hidden points; the remaining kinds
/// produce visible points from the statement's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum LoweredKind {
    /// The opening brace of a block that is language-significant (method body, loop body).
    OpenBrace,
    /// The closing brace of the method body. `return expr;` lowers to a store into a
    /// return-value temp, a jump here, a reload and `ret` - the evaluation stack must be
    /// empty at this point.
    CloseBrace,
    /// An ordinary simple statement (assignment, call, declaration with initializer).
    Statement,
    /// A loop or conditional header (`for` initializer, `if`/`while` condition site).
    LoopHeader,
    /// The (re-)evaluated loop condition of a top-tested loop after rewriting.
    LoopCondition,
    /// A back-edge or re-entry jump synthesized by loop rewriting. Always hidden.
    LoopBackEdge,
    /// The value dispatch of a lowered `switch`. Always hidden.
    SwitchDispatch,
    /// A `case`/pattern arm label.
    CaseLabel,
    /// A `catch` clause header.
    CatchHeader,
    /// A `finally` clause header.
    FinallyHeader,
    /// The acquisition site of a `using`/`lock` resource.
    UsingAcquire,
    /// The implicit disposal/release dispatch of a `using`/`lock`. Always hidden.
    UsingDisposeDispatch,
    /// A `return` statement site.
    Return,
    /// A synthetic dispatch node inserted by lowering with no user span. Always hidden.
    SyntheticDispatch,
    /// A state-machine resumption point (the switch over the state field). Always hidden.
    StateMachineResumption,
}

impl LoweredKind {
    /// True if this kind is compiler-synthesized control flow that must never carry a
    /// visible span.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            LoweredKind::LoopBackEdge
                | LoweredKind::SwitchDispatch
                | LoweredKind::UsingDisposeDispatch
                | LoweredKind::SyntheticDispatch
                | LoweredKind::StateMachineResumption
        )
    }
}

/// One lowered statement in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredStatement {
    /// Offset in the method's IL stream at which the statement begins.
    pub il_offset: u32,
    /// The language-significant kind of the statement.
    pub kind: LoweredKind,
    /// The originating source span. `None` for synthetic nodes; a statement whose kind is
    /// not synthetic but whose span is `None` also produces a hidden point (lowering may
    /// strip spans from duplicated code).
    pub span: Option<SourceSpan>,
    /// Overrides the method's default document for this statement. Line directives make
    /// multi-document methods real, so each sequence point carries its own document.
    pub document: Option<DocumentId>,
    /// Evaluation-stack depth at the statement boundary. Sequence points are only legal
    /// at depth zero.
    pub stack_depth: u32,
}

impl LoweredStatement {
    /// Create a statement with a visible span and an empty evaluation stack.
    #[must_use]
    pub fn visible(il_offset: u32, kind: LoweredKind, span: SourceSpan) -> Self {
        Self {
            il_offset,
            kind,
            span: Some(span),
            document: None,
            stack_depth: 0,
        }
    }

    /// Create a synthetic statement with no span.
    #[must_use]
    pub fn hidden(il_offset: u32, kind: LoweredKind) -> Self {
        Self {
            il_offset,
            kind,
            span: None,
            document: None,
            stack_depth: 0,
        }
    }
}

/// The construct a lexical region models.
///
/// The region kind decides how the locals declared by the construct are ranged by the
/// scope-tree builder (control variables to the body only, iteration temps to the whole
/// loop, resources from acquisition to the end of the protected region).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum RegionKind {
    /// A plain block (`{ ... }`), including the method body itself.
    Block,
    /// A `for` loop: header (initializer/condition) plus body.
    ForLoop,
    /// A `foreach` loop: enumerator acquisition header plus body.
    ForEachLoop,
    /// A `catch` clause. The exception variable is scoped to the clause body only.
    Catch,
    /// A `using` statement. Resources are scoped from acquisition through the implicit
    /// disposal dispatch.
    Using,
    /// A `lock` statement. Same resource scoping as `using`.
    Lock,
    /// One arm of a pattern-matching `switch`. Bindings are scoped to the arm only.
    SwitchArm,
}

/// The role a declared local plays inside its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum RegionLocalRole {
    /// A plain declared local or constant, scoped to the region body.
    Declared,
    /// A loop control variable (`for`/`foreach` iteration variable), scoped to the body.
    ControlVariable,
    /// An enumerator / array / array-index temp, scoped to the whole loop including the header.
    IterationTemp,
    /// A `using`/`lock` resource (or lock-taken flag), scoped from acquisition to region end.
    Resource,
    /// A `catch` exception variable, scoped to the clause body.
    ExceptionVariable,
    /// A pattern-match binding introduced by a `case`, scoped to its arm.
    PatternBinding,
}

/// A local declared by a lexical region, referencing the method symbol table by slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionLocal {
    /// Physical local slot index into the method's symbol table.
    pub slot: u16,
    /// The role the local plays in this construct.
    pub role: RegionLocalRole,
}

/// A lexical construct surviving lowering, with the locals it declares.
///
/// Regions form a forest via `parent` indices; the scope-tree builder nests them, ranges
/// their locals according to [`RegionKind`] and [`RegionLocalRole`], and elides regions
/// that end up declaring nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalRegion {
    /// The construct this region models.
    pub kind: RegionKind,
    /// IL offset where the construct's header begins (acquisition site, loop header).
    /// Equal to `body_start` for plain blocks.
    pub header_offset: u32,
    /// IL offset where the construct's body begins.
    pub body_start: u32,
    /// IL offset one past the construct's end, including any implicit cleanup dispatch.
    pub end_offset: u32,
    /// Index of the parent region within the body's region list. `None` for the root.
    pub parent: Option<usize>,
    /// Locals and constants declared by this construct.
    pub locals: Vec<RegionLocal>,
}

/// The lowered, span-annotated body of one compiled method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredBody {
    /// Size of the emitted IL stream in bytes.
    pub code_size: u32,
    /// Statements in emission order.
    pub statements: Vec<LoweredStatement>,
    /// Lexical regions. Index 0, when present, is the method-body root region.
    pub regions: Vec<LexicalRegion>,
    /// Offset intervals `[start, end)` proven unreachable by lowering.
    pub dead_ranges: Vec<(u32, u32)>,
}

impl LoweredBody {
    /// Create an empty body of the given code size.
    #[must_use]
    pub fn new(code_size: u32) -> Self {
        Self {
            code_size,
            statements: Vec::new(),
            regions: Vec::new(),
            dead_ranges: Vec::new(),
        }
    }

    /// True if the offset lies inside a range proven unreachable by lowering.
    #[must_use]
    pub fn is_dead(&self, offset: u32) -> bool {
        self.dead_ranges
            .iter()
            .any(|&(start, end)| offset >= start && offset < end)
    }
}
