//! Diagnostics — recoverable conditions found while resolving.
//!
//! Resolution never fails on bad data; it substitutes the unknown-type
//! placeholder and records what happened here so tooling can surface it.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::TypeKey;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic attached to a type declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The parsed file of the offending declaration; `None` for assembly types.
    pub file: Option<SmolStr>,
    /// The type the diagnostic is about.
    pub subject: TypeKey,
    /// Severity level.
    pub severity: Severity,
    /// Diagnostic code (e.g., "W0101").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Optional related information.
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub file: Option<SmolStr>,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(file: Option<SmolStr>, subject: TypeKey, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            subject,
            severity: Severity::Warning,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Codes for recoverable resolution conditions.
pub mod codes {
    /// A base type reference names no known type.
    pub const UNRESOLVED_BASE_TYPE: &str = "W0101";
    /// A base type reference closes an inheritance cycle.
    pub const CIRCULAR_BASE_TYPE: &str = "W0102";
    /// The same full name is declared more than once without the partial flag.
    pub const DUPLICATE_DECLARATION: &str = "W0103";
    /// Merged partial declarations disagree on the declaration kind.
    pub const CONFLICTING_KINDS: &str = "W0104";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during resolution.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add an unresolved base type warning.
    pub fn unresolved_base_type(&mut self, file: Option<SmolStr>, subject: &TypeKey, base: &TypeKey) {
        self.add(
            Diagnostic::warning(
                file,
                subject.clone(),
                format!("base type '{}' of '{}' could not be resolved", base, subject),
            )
            .with_code(codes::UNRESOLVED_BASE_TYPE),
        );
    }

    /// Add a circular base type warning.
    pub fn circular_base_type(&mut self, file: Option<SmolStr>, subject: &TypeKey, base: &TypeKey) {
        self.add(
            Diagnostic::warning(
                file,
                subject.clone(),
                format!("circular base type dependency: '{}' inherits from '{}'", subject, base),
            )
            .with_code(codes::CIRCULAR_BASE_TYPE),
        );
    }

    /// Add a duplicate declaration warning, pointing at the kept declaration.
    pub fn duplicate_declaration(
        &mut self,
        file: Option<SmolStr>,
        subject: &TypeKey,
        existing_file: Option<SmolStr>,
    ) {
        self.add(
            Diagnostic::warning(
                file,
                subject.clone(),
                format!("duplicate declaration: '{}' is declared without the partial modifier", subject),
            )
            .with_code(codes::DUPLICATE_DECLARATION)
            .with_related(RelatedInfo {
                file: existing_file,
                message: Arc::from(format!("first declaration of '{}'", subject)),
            }),
        );
    }

    /// Add a conflicting kinds warning.
    pub fn conflicting_kinds(&mut self, file: Option<SmolStr>, subject: &TypeKey, expected: &str, found: &str) {
        self.add(
            Diagnostic::warning(
                file,
                subject.clone(),
                format!("partial declaration of '{}' is a {}, expected {}", subject, found, expected),
            )
            .with_code(codes::CONFLICTING_KINDS),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics for a specific file.
    pub fn diagnostics_for_file(&self, file: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.file.as_deref() == Some(file))
            .collect()
    }

    /// Get diagnostics with a specific code.
    pub fn with_code(&self, code: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.code.as_deref() == Some(code))
            .collect()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
    }

    /// Get the number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> TypeKey {
        TypeKey::new("", name, 0)
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::warning(None, key("A"), "test").with_code(codes::UNRESOLVED_BASE_TYPE);
        assert_eq!(diag.code.as_deref(), Some("W0101"));
        assert_eq!(diag.severity, Severity::Warning);
    }

    #[test]
    fn test_collector_by_file() {
        let mut collector = DiagnosticCollector::new();
        collector.unresolved_base_type(Some("a.cs".into()), &key("A"), &key("X"));
        collector.unresolved_base_type(Some("b.cs".into()), &key("B"), &key("X"));
        collector.circular_base_type(Some("a.cs".into()), &key("A"), &key("B"));

        assert_eq!(collector.diagnostics_for_file("a.cs").len(), 2);
        assert_eq!(collector.diagnostics_for_file("b.cs").len(), 1);
        assert_eq!(collector.with_code(codes::CIRCULAR_BASE_TYPE).len(), 1);
        assert_eq!(collector.warning_count(), 3);
    }

    #[test]
    fn test_duplicate_declaration_has_related_info() {
        let mut collector = DiagnosticCollector::new();
        collector.duplicate_declaration(Some("b.cs".into()), &key("T"), Some("a.cs".into()));

        let diag = &collector.diagnostics()[0];
        assert_eq!(diag.related.len(), 1);
        assert_eq!(diag.related[0].file.as_deref(), Some("a.cs"));
        assert!(diag.message.contains("duplicate declaration"));
    }

    #[test]
    fn test_severity_to_lsp() {
        assert_eq!(Severity::Error.to_lsp(), 1);
        assert_eq!(Severity::Warning.to_lsp(), 2);
        assert_eq!(Severity::Info.to_lsp(), 3);
        assert_eq!(Severity::Hint.to_lsp(), 4);
    }
}
