// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![deny(unsafe_code)]

//! # dotpdb
//!
//! Debug information synthesis for managed-language compilers: the layer that turns
//! lowered method bodies into the logical records a program database (PDB) writer
//! serializes. Built in pure Rust, `dotpdb` produces sequence points, lexical scope
//! trees, Edit-and-Continue identity maps, dynamic-type and tuple-name records, import
//! chains with program-order forwarding, and state-machine mappings - everything a
//! debugger needs to map optimized IL back onto source.
//!
//! ## Features
//!
//! - **Sequence points** - validated, strictly ordered IL-offset-to-span mappings with
//!   hidden entries for compiler-synthesized control flow
//! - **Scope trees** - nested local/constant scopes refined per language construct
//! - **Edit-and-Continue** - slot identities and lambda/closure maps that survive
//!   recompilation of edited source
//! - **Type-shape records** - dynamic flags and tuple element names, with the format's
//!   omission caps honored rather than truncated
//! - **Import forwarding** - structural deduplication of identical import chains
//!   across methods, partial classes and the module
//! - **State machines** - kickoff forwarding, hoisted-local scopes, resumption-safe
//!   catch-handler offsets for async and iterator methods
//! - **Deterministic output** - per-method synthesis parallelizes on rayon while the
//!   emitted module stays byte-identical across runs and thread counts
//!
//! ## Quick Start
//!
//! Add `dotpdb` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dotpdb = "0.2"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use dotpdb::prelude::*;
//!
//! let documents = DocumentRegistry::new(ChecksumAlgorithm::Sha1);
//! let document = documents.register("Program.cs", b"class C { static void Main() {} }");
//!
//! let mut input = MethodInput::new(MethodId(0), document, 0x02);
//! input.body.statements.push(LoweredStatement::visible(
//!     0x00,
//!     LoweredKind::OpenBrace,
//!     SourceSpan::single_line(1, 31, 32),
//! ));
//! input.body.statements.push(LoweredStatement::visible(
//!     0x01,
//!     LoweredKind::CloseBrace,
//!     SourceSpan::single_line(1, 32, 33),
//! ));
//!
//! let module = synthesize_module(
//!     &[input],
//!     &CompilationImports::new(),
//!     &documents,
//!     &EmitOptions::default(),
//! )?;
//! assert_eq!(module.records.len(), 1);
//! # Ok::<(), dotpdb::Error>(())
//! ```
//!
//! ### Emitting
//!
//! Physical serializers implement [`DebugRecordWriter`](emit::DebugRecordWriter) and
//! are validated against the requested [`EmitOptions`](emit::EmitOptions) before any
//! byte is written:
//!
//! ```rust
//! use dotpdb::prelude::*;
//!
//! # let documents = DocumentRegistry::new(ChecksumAlgorithm::Sha1);
//! # let module = synthesize_module(
//! #     &[],
//! #     &CompilationImports::new(),
//! #     &documents,
//! #     &EmitOptions::default(),
//! # )?;
//! let mut writer = RecordInspector::new();
//! emit_module(&mut writer, &module, &EmitOptions::default())?;
//! assert!(!writer.bytes().is_empty());
//! # Ok::<(), dotpdb::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The crate splits into four layers:
//!
//! - [`lowered`] - the input model: span-annotated lowered bodies and symbol tables
//! - [`synthesis`] - the engine: per-method passes plus the module-level driver
//! - [`records`] - the output model: format-agnostic logical debug records
//! - [`emit`] - the boundary: options, writer contract, reproducible-build metadata
//!
//! ## Testing
//!
//! ```bash
//! cargo test
//! cargo bench  # synthesis throughput over generated modules
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests across the crate
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use dotpdb::prelude::*;
///
/// let documents = DocumentRegistry::new(ChecksumAlgorithm::Sha1);
/// let module = synthesize_module(
///     &[],
///     &CompilationImports::new(),
///     &documents,
///     &EmitOptions::default(),
/// )?;
/// assert!(module.records.is_empty());
/// # Ok::<(), dotpdb::Error>(())
/// ```
pub mod prelude;

/// The input model: lowered, span-annotated method bodies and symbol tables.
///
/// Upstream compiler stages hand the engine one [`lowered::MethodInput`] per emitted
/// method. See the module documentation for the shape of the input and the invariants
/// it is expected to satisfy.
pub mod lowered;

/// The synthesis engine: per-method passes and the module-level driver.
///
/// # Key Components
///
/// - [`synthesis::MethodDebugBuilder`] - runs every per-method pass over one input
/// - [`synthesis::synthesize_module`] - parallel per-method phase plus the sequential
///   program-order forwarding fold
/// - The individual passes, usable on their own: sequence points, scopes, slot
///   identities, dynamic flags, tuple names, imports, lambdas, state machines
pub mod synthesis;

/// The output model: format-agnostic logical debug records.
///
/// One internal representation regardless of physical target format. Records are plain
/// owned data; serializers match on them exhaustively at the emit boundary.
pub mod records;

/// The emit boundary: options, the writer contract, reproducible-build metadata.
///
/// # Key Components
///
/// - [`emit::DebugRecordWriter`] - the trait physical serializers implement
/// - [`emit::emit_module`] - validate-then-write entry point
/// - [`emit::RecordInspector`] - canonical in-memory reference writer
/// - [`emit::DeterministicBuildInfo`] - per-module reproducible-build record
pub mod emit;

/// `dotpdb` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. Used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `dotpdb` Error type
///
/// The main error type for all operations in this crate. Internal inconsistencies in
/// the compiler-provided input surface as [`Error::InvariantViolation`] with the
/// source location that detected them; writer mismatches abort the emit up front with
/// [`Error::IncompatibleWriter`].
pub use error::Error;
