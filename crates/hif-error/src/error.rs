//! The main Error type for llmcc.

use crate::{ErrorKind, ErrorStatus};
use std::fmt;

/// Unified error type for all llmcc operations.
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let status = if kind.is_retryable() {
            ErrorStatus::Temporary
        } else {
            ErrorStatus::Permanent
        };

        Self {
            kind,
            message: message.into(),
            status,
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the error status
    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Get the source error (if any).
    pub fn source_ref(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_ref().map(|e| e.as_ref())
    }

    /// Set the error status.
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark as temporary (retryable)
    pub fn temporary(mut self) -> Self {
        self.status = ErrorStatus::Temporary;
        self
    }

    /// Mark as permanent (not retryable)
    pub fn permanent(mut self) -> Self {
        self.status = ErrorStatus::Permanent;
        self
    }

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }

    /// Mark as persistent after failed retries.
    pub fn persist(mut self) -> Self {
        self.status = self.status.persist();
        self
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.status.is_retryable()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::new(ErrorKind::Unexpected, msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::new(ErrorKind::Unexpected, msg)
    }
}

impl Error {
    /// Create an Unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Create an Unsupported error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported, message)
    }

    /// Create an UnexpectedCase error: a comparator or scope-move branch reached
    /// a node-kind pair documented as a program-logic error.
    pub fn unexpected_case(kind_desc: impl Into<String>) -> Self {
        let kind_desc = kind_desc.into();
        Self::new(
            ErrorKind::UnexpectedCase,
            format!("unexpected case: {}", kind_desc),
        )
        .with_context("kind", kind_desc)
    }

    /// Create an UnhandledKind error: the visitor substrate fell through to the
    /// default `map(Object, Object)` for a node kind with no derived handler.
    pub fn unhandled_kind(kind_desc: impl Into<String>) -> Self {
        let kind_desc = kind_desc.into();
        Self::new(
            ErrorKind::UnhandledKind,
            format!("unhandled node kind: {}", kind_desc),
        )
        .with_context("kind", kind_desc)
    }

    /// Create a SymbolNotFound error
    pub fn symbol_not_found(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self::new(
            ErrorKind::SymbolNotFound,
            format!("symbol '{}' not found", symbol),
        )
        .with_context("symbol", symbol)
    }

    /// Create a DeclarationNotFound error
    pub fn declaration_not_found(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        Self::new(
            ErrorKind::DeclarationNotFound,
            format!("no declaration for reference '{}'", reference),
        )
        .with_context("reference", reference)
    }

    /// Create an ImmovableList error: scope-mover was asked to move a node out
    /// of a list that can never change scope (ports, parameters).
    pub fn immovable_list(list: impl Into<String>) -> Self {
        let list = list.into();
        Self::new(
            ErrorKind::ImmovableList,
            format!("list '{}' cannot be moved between scopes", list),
        )
        .with_context("list", list)
    }

    /// Create an UnsupportedScopePair error
    pub fn unsupported_scope_pair(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        Self::new(
            ErrorKind::UnsupportedScopePair,
            format!("cannot move contents from {} into {}", from, to),
        )
        .with_context("from", from)
        .with_context("to", to)
    }

    /// Create a SpanTooWide warning-grade error (the caller typically only logs it).
    pub fn span_too_wide(size: u64, max: u64) -> Self {
        Self::new(
            ErrorKind::SpanTooWide,
            format!("found a span greater than {}: current span is {}", max, size),
        )
        .with_context("size", size.to_string())
        .with_context("max", max.to_string())
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create an AssertionFailed error
    pub fn assertion_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AssertionFailed, message)
    }

    /// Create a NotImplemented error
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        let feature = feature.into();
        Self::new(
            ErrorKind::NotImplemented,
            format!("'{}' is not implemented", feature),
        )
        .with_context("feature", feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::UnexpectedCase, "unexpected token");
        assert_eq!(err.kind(), ErrorKind::UnexpectedCase);
        assert_eq!(err.message(), "unexpected token");
        assert_eq!(err.status(), ErrorStatus::Permanent);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::new(ErrorKind::SymbolNotFound, "not found")
            .with_operation("scope_mover::move_to_scope")
            .with_context("symbol", "c")
            .with_context("scope", "L1")
            .with_context("removed", "unused");

        assert_eq!(err.operation(), "scope_mover::move_to_scope");
        assert_eq!(err.context().len(), 3);
        assert_eq!(err.context()[0], ("symbol", "c".to_string()));
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::new(ErrorKind::DeclarationNotFound, "failed")
            .with_operation("scope_mover::rewrite_references")
            .with_operation("scope_mover::move_to_scope");

        assert_eq!(err.operation(), "scope_mover::move_to_scope");
        assert_eq!(err.context().len(), 1);
        assert_eq!(
            err.context()[0],
            ("called", "scope_mover::rewrite_references".to_string())
        );
    }

    #[test]
    fn test_temporary_status() {
        let err = Error::new(ErrorKind::ResourceExhausted, "name table exhausted");
        assert!(err.is_retryable());

        let err = Error::new(ErrorKind::UnexpectedCase, "bad pair");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_persist() {
        let err = Error::new(ErrorKind::ResourceExhausted, "fresh name unavailable").temporary();
        assert!(err.is_retryable());

        let err = err.persist();
        assert!(!err.is_retryable());
        assert_eq!(err.status(), ErrorStatus::Persistent);
    }

    #[test]
    fn test_display() {
        let err = Error::new(ErrorKind::UnexpectedCase, "unexpected pair")
            .with_operation("compare::compare")
            .with_context("lhs", "Entity")
            .with_context("rhs", "Function");

        let display = format!("{}", err);
        assert!(display.contains("UnexpectedCase"));
        assert!(display.contains("permanent"));
        assert!(display.contains("compare::compare"));
        assert!(display.contains("lhs: Entity"));
    }

    #[test]
    fn test_convenience_constructors() {
        let err = Error::symbol_not_found("c");
        assert_eq!(err.kind(), ErrorKind::SymbolNotFound);
        assert!(err.message().contains("c"));

        let err = Error::unexpected_case("Entity x Function");
        assert_eq!(err.kind(), ErrorKind::UnexpectedCase);

        let err = Error::immovable_list("ports");
        assert_eq!(err.kind(), ErrorKind::ImmovableList);
    }

    #[test]
    fn test_set_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::new(ErrorKind::Unexpected, "name-table file missing").set_source(io_err);

        assert!(err.source_ref().is_some());
    }
}
