//! The input model: lowered, span-annotated method bodies and their symbol tables.
//!
//! Upstream compiler stages hand the engine one [`MethodInput`] per emitted method. The
//! input is already fully lowered - loops rewritten, try/finally expanded, async and
//! iterator methods split into kickoff and MoveNext - but every surviving node retains
//! its originating source span, and every declaration its method-relative syntax offset.
//!
//! # Key Components
//!
//! - [`MethodInput`] - everything the engine needs to synthesize one method's records
//! - [`body::LoweredBody`] - statements, lexical regions and dead ranges
//! - [`symbols::MethodSymbols`] - locals, lambdas, closures, hoisted variables
//! - [`span::SourceSpan`] / [`span::SyntaxOffset`] - the positional value types

pub mod body;
pub mod span;
pub mod symbols;

pub use body::{
    LexicalRegion, LoweredBody, LoweredKind, LoweredStatement, RegionKind, RegionLocal,
    RegionLocalRole,
};
pub use span::{SourceSpan, SyntaxOffset};
pub use symbols::{
    ClosureSymbol, ConstantValue, HoistedVariable, LambdaSymbol, LocalSymbol, MethodRole,
    MethodSymbols, StateMachineKind, TypeShape,
};

use crate::records::document::DocumentId;
use crate::records::imports::ContainerId;
use crate::records::method::MethodId;

/// The complete input for synthesizing one method's debug records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInput {
    /// The method being emitted.
    pub id: MethodId,
    /// Default source document for the method's sequence points.
    pub document: DocumentId,
    /// The lowered body.
    pub body: LoweredBody,
    /// The method's symbol table.
    pub symbols: MethodSymbols,
    /// The innermost lexical container whose imports are visible in the method, if any.
    pub import_container: Option<ContainerId>,
    /// True for synthesized methods that contain user-written code. Such methods must
    /// carry a sequence point at IL offset 0 or first-chance breakpoints in them are
    /// unreliable.
    pub synthesized_with_user_code: bool,
}

impl MethodInput {
    /// Create an input with an empty body and symbol table.
    #[must_use]
    pub fn new(id: MethodId, document: DocumentId, code_size: u32) -> Self {
        Self {
            id,
            document,
            body: LoweredBody::new(code_size),
            symbols: MethodSymbols::new(),
            import_container: None,
            synthesized_with_user_code: false,
        }
    }
}
