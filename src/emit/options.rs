//! Emit options: target debug format, checksum algorithm, determinism.

use crate::emit::deterministic::DeterministicBuildInfo;
use crate::records::document::ChecksumAlgorithm;

/// The physical debug information format a writer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum DebugFormat {
    /// The native Windows PDB format.
    Windows,
    /// The portable PDB format.
    Portable,
    /// The portable format embedded into the output image itself.
    Embedded,
}

/// Options controlling one emit.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitOptions {
    /// Target format. The writer must match it.
    pub format: DebugFormat,
    /// Checksum algorithm for source documents.
    pub checksum_algorithm: ChecksumAlgorithm,
    /// Reproducible-build metadata; `Some` requests a deterministic emit, which the
    /// writer must support.
    pub deterministic: Option<DeterministicBuildInfo>,
}

impl EmitOptions {
    /// Create options for the given format with default settings.
    #[must_use]
    pub fn new(format: DebugFormat) -> Self {
        Self {
            format,
            checksum_algorithm: ChecksumAlgorithm::Sha1,
            deterministic: None,
        }
    }

    /// Fluent selection of the document checksum algorithm.
    #[must_use]
    pub fn with_checksum_algorithm(mut self, algorithm: ChecksumAlgorithm) -> Self {
        self.checksum_algorithm = algorithm;
        self
    }

    /// Fluent request for a deterministic emit carrying the given build record.
    #[must_use]
    pub fn with_deterministic(mut self, info: DeterministicBuildInfo) -> Self {
        self.deterministic = Some(info);
        self
    }

    /// True if a deterministic emit was requested.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.deterministic.is_some()
    }
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self::new(DebugFormat::Portable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = EmitOptions::default();
        assert_eq!(options.format, DebugFormat::Portable);
        assert_eq!(options.checksum_algorithm, ChecksumAlgorithm::Sha1);
        assert!(!options.is_deterministic());
    }

    #[test]
    fn fluent_configuration() {
        let options = EmitOptions::new(DebugFormat::Embedded)
            .with_checksum_algorithm(ChecksumAlgorithm::Md5)
            .with_deterministic(DeterministicBuildInfo::new("4.9.2-test"));
        assert_eq!(options.format, DebugFormat::Embedded);
        assert!(options.is_deterministic());
    }

    #[test]
    fn format_display() {
        assert_eq!(DebugFormat::Portable.to_string(), "Portable");
    }
}
