//! Error kinds for hif-core operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// This enum categorizes errors to help users write clear error handling logic.
/// Users can match on ErrorKind to decide how to handle specific error cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature or operation is not supported
    Unsupported,

    /// Invalid configuration or parameters
    ConfigInvalid,

    /// Feature or operation not yet implemented
    NotImplemented,

    // =========================================================================
    // Dispatch errors (visitor substrate)
    // =========================================================================
    /// A node kind reached a default `map(Object, Object)` with no derived handler
    UnhandledKind,

    /// Comparator or scope-mover reached a pair of kinds documented as a program-logic error
    UnexpectedCase,

    // =========================================================================
    // Ownership / structural errors
    // =========================================================================
    /// `parent` back-reference disagrees with actual structural ownership
    OwnershipViolation,

    /// A node was looked up in an owning list it does not belong to
    NotInList,

    // =========================================================================
    // Scope-move errors
    // =========================================================================
    /// Attempted to move a node into/out of a scope pair that forbids it (e.g. ports, parameters)
    ImmovableList,

    /// Move between scope kinds that the mover does not support
    UnsupportedScopePair,

    // =========================================================================
    // Constant-transform errors
    // =========================================================================
    /// Span width exceeded `HIF_MAX_ALLOWED_SPAN_SIZE`
    SpanTooWide,

    /// A constant could not legally be coerced to the requested target type
    TransformRejected,

    // =========================================================================
    // Lookup errors
    // =========================================================================
    /// Declaration not found for a reference
    DeclarationNotFound,

    /// Symbol not found in scope
    SymbolNotFound,

    /// Ambiguous symbol reference
    AmbiguousSymbol,

    // =========================================================================
    // Resource errors
    // =========================================================================
    /// Resource exhausted (e.g. name-table could not mint a fresh name)
    ResourceExhausted,

    // =========================================================================
    // Validation errors
    // =========================================================================
    /// Invalid argument passed to function
    InvalidArgument,

    /// Assertion failed
    AssertionFailed,

    /// Invariant violation
    InvariantViolation,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Check if this error kind is retryable by default.
    ///
    /// Every error kind in the core is a programming error or a documented
    /// fatal condition; none are meaningfully retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::ResourceExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::UnexpectedCase.to_string(), "UnexpectedCase");
        assert_eq!(ErrorKind::SymbolNotFound.to_string(), "SymbolNotFound");
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::ResourceExhausted.is_retryable());
        assert!(!ErrorKind::UnexpectedCase.is_retryable());
        assert!(!ErrorKind::SymbolNotFound.is_retryable());
    }
}
