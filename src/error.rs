use thiserror::Error;

use crate::emit::options::DebugFormat;

macro_rules! invariant_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvariantViolation {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvariantViolation {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The error surface of the synthesis engine is deliberately narrow. Per-record problems that
/// the debug format tolerates (a dynamic-flag string that is too long, an identifier above the
/// UTF-16 length cap) are *soft omissions*: the affected sub-record is dropped and no error is
/// raised. Everything that does surface here is either a bug in the upstream lowering
/// ([`Error::InvariantViolation`]) or a misconfigured emit boundary
/// ([`Error::IncompatibleWriter`], [`Error::Emit`]).
///
/// # Error Categories
///
/// ## Internal invariant violations
/// - [`Error::InvariantViolation`] - The lowered input breaks a structural guarantee
///   (non-monotonic sequence-point offsets, a scope closing before an open child,
///   a slot identity collision between simultaneously live locals). These signal a
///   compiler bug upstream, never a user error.
/// - [`Error::RecursionLimit`] - A type shape walk exceeded the recursion guard.
///
/// ## Emit boundary errors
/// - [`Error::IncompatibleWriter`] - The selected physical writer cannot satisfy the
///   requested emit options; the whole emit is aborted before any output is produced.
/// - [`Error::Emit`] - A physical writer reported a failure while consuming records.
///
/// # Examples
///
/// ```rust
/// use dotpdb::{Error, Result};
///
/// fn check(result: Result<()>) {
///     match result {
///         Ok(()) => println!("records synthesized"),
///         Err(Error::InvariantViolation { message, file, line }) => {
///             eprintln!("compiler bug: {} ({}:{})", message, file, line);
///         }
///         Err(e) => eprintln!("emit failed: {}", e),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The lowered method body or symbol table violated a structural invariant.
    ///
    /// Raised for non-monotonic or duplicate sequence-point offsets, sequence points
    /// taken at non-zero evaluation-stack depth, scope nesting violations, and slot
    /// identity collisions. The error captures the source location where the violation
    /// was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the violated invariant
    /// * `file` - Source file where the violation was detected
    /// * `line` - Source line where the violation was detected
    #[error("Invariant violation - {file}:{line}: {message}")]
    InvariantViolation {
        /// The message to be printed for the violation
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Recursion limit reached.
    ///
    /// Type shape walks (dynamic-flag and tuple-name encoding) enforce a maximum
    /// recursion depth to protect against pathological generic nesting. The
    /// associated value is the limit that was reached.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// The selected physical writer cannot satisfy the requested emit options.
    ///
    /// Raised before any record is handed to the writer, so no truncated or corrupt
    /// debug container is ever produced. Typical cause: a writer that does not
    /// support deterministic output while the build requested it.
    #[error("Writer for {format} is incompatible: {reason}")]
    IncompatibleWriter {
        /// The physical format the writer targets
        format: DebugFormat,
        /// Why the writer was rejected
        reason: String,
    },

    /// A physical writer reported a failure while consuming records.
    ///
    /// Propagated to the caller as an ordinary build/emit diagnostic.
    #[error("{0}")]
    Emit(String),
}
