//! Reproducible-build metadata emitted once per module.
//!
//! A deterministic build records enough of its inputs that an independent party can
//! re-run the compiler and byte-compare the output: the compiler version, the
//! effective compilation options, and a fingerprint of every referenced module. Option
//! pairs are kept sorted by key so the record's byte form does not depend on the order
//! options were supplied in.

use uguid::Guid;

/// The kind of a referenced image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ReferenceImageKind {
    /// A full assembly reference.
    Assembly,
    /// A bare netmodule reference.
    NetModule,
}

/// Identity fingerprint of one referenced module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFingerprint {
    /// File name of the reference.
    pub name: String,
    /// COFF header timestamp of the referenced image.
    pub timestamp: u32,
    /// Size in bytes of the referenced image.
    pub image_size: u32,
    /// Module version id of the referenced image.
    pub mvid: Guid,
    /// Extern aliases under which the reference was supplied, in command-line order.
    pub extern_aliases: Vec<String>,
    /// Whether the reference is an assembly or a bare module.
    pub image_kind: ReferenceImageKind,
    /// Whether interop types were embedded from this reference.
    pub embed_interop_types: bool,
}

/// The per-module reproducible-build record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicBuildInfo {
    /// Compiler version string.
    pub compiler_version: String,
    /// Effective compilation options as key/value pairs, sorted by key.
    options: Vec<(String, String)>,
    /// Fingerprints of every referenced module, in reference order.
    pub references: Vec<ReferenceFingerprint>,
}

impl DeterministicBuildInfo {
    /// Create a record for the given compiler version with no options or references.
    #[must_use]
    pub fn new(compiler_version: impl Into<String>) -> Self {
        Self {
            compiler_version: compiler_version.into(),
            options: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Record an effective compilation option. Re-recording a key overwrites its value.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.options.binary_search_by(|(k, _)| k.as_str().cmp(&key)) {
            Ok(index) => self.options[index].1 = value,
            Err(index) => self.options.insert(index, (key, value)),
        }
    }

    /// Fluent form of [`set_option`](Self::set_option).
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_option(key, value);
        self
    }

    /// Fluent append of a reference fingerprint.
    #[must_use]
    pub fn with_reference(mut self, reference: ReferenceFingerprint) -> Self {
        self.references.push(reference);
        self
    }

    /// The recorded options, sorted by key.
    #[must_use]
    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }
}
