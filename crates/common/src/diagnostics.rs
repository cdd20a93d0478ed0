//! Structured diagnostics returned alongside every read, filter and write
//!
//! Diagnostics are data, not log lines: callers receive them in order and
//! decide how to report them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A key no grammar rule accepted
    UnknownField,
    /// A value of the wrong shape; the field keeps its default
    TypeCoercion,
    /// A required field is absent
    MissingField,
    /// Same key twice in one mapping, or two equivalent path templates
    DuplicateKey,
    /// Keys next to a `$ref` that the reference form cannot carry
    IgnoredSibling,
    /// The declared version is unknown or missing
    UnsupportedVersion,
    /// A `$ref` whose target could not be bound
    UnresolvedReference,
    /// A reference dropped because the filter pruned its target
    DanglingReference,
    /// Content the target version of the writer cannot express
    NotRepresentable,
    /// A request URL that matched no operation
    UnmatchedRequestUrl,
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::TypeCoercion | DiagnosticKind::UnresolvedReference => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnknownField => "unknown-field",
            DiagnosticKind::TypeCoercion => "type-coercion",
            DiagnosticKind::MissingField => "missing-field",
            DiagnosticKind::DuplicateKey => "duplicate-key",
            DiagnosticKind::IgnoredSibling => "ignored-sibling",
            DiagnosticKind::UnsupportedVersion => "unsupported-version",
            DiagnosticKind::UnresolvedReference => "unresolved-reference",
            DiagnosticKind::DanglingReference => "dangling-reference",
            DiagnosticKind::NotRepresentable => "not-representable",
            DiagnosticKind::UnmatchedRequestUrl => "unmatched-request-url",
        }
    }
}

/// One (severity, message, location) record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// JSON pointer into the source document, e.g. `#/paths/~1pets/get`
    pub pointer: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            message: message.into(),
            pointer: pointer.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at {}: {}",
            self.severity,
            self.kind.as_str(),
            self.pointer,
            self.message
        )
    }
}

/// Ordered diagnostic list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Record a diagnostic with the kind's default severity
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        pointer: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic::new(kind, pointer, message));
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(DiagnosticKind::UnknownField, "#/info", "unknown field 'foo'");
        diagnostics.report(
            DiagnosticKind::UnresolvedReference,
            "#/paths/~1pets/get",
            "reference '#/components/schemas/Missing' not found",
        );

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warnings().count(), 1);
        assert_eq!(diagnostics.errors().count(), 1);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.count_of(DiagnosticKind::UnknownField), 1);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::DuplicateKey,
            "#/paths",
            "duplicate key '/pets'",
        );
        assert_eq!(
            diagnostic.to_string(),
            "[warning] duplicate-key at #/paths: duplicate key '/pets'"
        );
    }
}
