//! Source document identities and the compilation-wide document registry.
//!
//! A [`Document`] is a source file identity: path, language GUID, checksum algorithm and
//! checksum. Documents are created once per file and are immutable thereafter; methods
//! and individual sequence points reference them by [`DocumentId`].
//!
//! # Architecture
//!
//! The registry is shared by the parallel per-method synthesis phase, which only reads
//! it. To keep output deterministic, registration happens while inputs are constructed -
//! before the parallel phase starts - so document ids reflect a stable first-seen order
//! regardless of how many worker threads later consult the registry.
//!
//! # Thread Safety
//!
//! [`DocumentRegistry`] is [`Send`] and [`Sync`]; lookups are lock-free reads over a
//! concurrent map.

use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::{mapref::entry::Entry, DashMap};
use md5::Md5;
use sha1::{Digest, Sha1};
use uguid::{guid, Guid};

/// Language GUID for C# source documents.
pub const LANG_CSHARP: Guid = guid!("3f5162f8-07c6-11d3-9053-00c04fa302a1");

/// Handle to a registered [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u32);

/// Checksum algorithm used to fingerprint a source document.
///
/// The algorithm is selected per compilation via
/// [`crate::emit::options::EmitOptions`] and recorded in each document as the
/// algorithm's well-known GUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ChecksumAlgorithm {
    /// SHA-1 content hash (20 bytes).
    Sha1,
    /// MD5 content hash (16 bytes).
    Md5,
}

impl ChecksumAlgorithm {
    /// The well-known GUID identifying this algorithm in debug formats.
    #[must_use]
    pub fn guid(&self) -> Guid {
        match self {
            ChecksumAlgorithm::Sha1 => guid!("ff1816ec-aa5e-4d10-87f7-6f4963833460"),
            ChecksumAlgorithm::Md5 => guid!("406ea660-64cf-4c82-b6f0-42d48172a799"),
        }
    }

    /// Compute the checksum of the given document content.
    #[must_use]
    pub fn checksum(&self, content: &[u8]) -> Vec<u8> {
        match self {
            ChecksumAlgorithm::Sha1 => Sha1::digest(content).to_vec(),
            ChecksumAlgorithm::Md5 => Md5::digest(content).to_vec(),
        }
    }
}

/// A source file identity. Created once per file; immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The registry handle for this document.
    pub id: DocumentId,
    /// Normalized source path.
    pub path: String,
    /// Source language GUID.
    pub language: Guid,
    /// GUID of the checksum algorithm used.
    pub checksum_algorithm: Guid,
    /// Content checksum.
    pub checksum: Vec<u8>,
}

/// Compilation-wide registry of source documents.
///
/// # Examples
///
/// ```rust
/// use dotpdb::records::document::{ChecksumAlgorithm, DocumentRegistry};
///
/// let registry = DocumentRegistry::new(ChecksumAlgorithm::Sha1);
/// let id = registry.register("src/Program.cs", b"class C { }");
/// assert_eq!(registry.register("src/Program.cs", b"class C { }"), id);
/// assert_eq!(registry.snapshot().len(), 1);
/// ```
#[derive(Debug)]
pub struct DocumentRegistry {
    algorithm: ChecksumAlgorithm,
    next_id: AtomicU32,
    by_path: DashMap<String, DocumentId>,
    documents: DashMap<DocumentId, Document>,
}

impl DocumentRegistry {
    /// Create an empty registry using the given checksum algorithm.
    #[must_use]
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        Self {
            algorithm,
            next_id: AtomicU32::new(0),
            by_path: DashMap::new(),
            documents: DashMap::new(),
        }
    }

    /// The checksum algorithm this registry fingerprints documents with.
    #[must_use]
    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// Register a document, returning its handle. Registering the same path again returns
    /// the existing handle; the content is not re-hashed.
    ///
    /// Registration order determines document ids, so all registration must happen while
    /// inputs are constructed, before the parallel synthesis phase reads the registry.
    pub fn register(&self, path: &str, content: &[u8]) -> DocumentId {
        // The entry holds the path's shard lock, so two racing registrations of one
        // path serialize here and the loser observes the winner's id; an id is only
        // minted once per path.
        match self.by_path.entry(path.to_string()) {
            Entry::Occupied(existing) => *existing.get(),
            Entry::Vacant(vacant) => {
                let id = DocumentId(self.next_id.fetch_add(1, Ordering::SeqCst));
                let document = Document {
                    id,
                    path: path.to_string(),
                    language: LANG_CSHARP,
                    checksum_algorithm: self.algorithm.guid(),
                    checksum: self.algorithm.checksum(content),
                };
                self.documents.insert(id, document);
                vacant.insert(id);
                id
            }
        }
    }

    /// Look up a registered document by handle.
    #[must_use]
    pub fn get(&self, id: DocumentId) -> Option<Document> {
        self.documents.get(&id).map(|entry| entry.clone())
    }

    /// Number of registered documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if no documents are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All registered documents, ordered by id. This is the canonical program-order view
    /// the physical writer consumes.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Document> {
        let mut documents: Vec<Document> = self
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        documents.sort_by_key(|doc| doc.id);
        documents
    }
}
