//! Diagnostic collection.
//!
//! Tascal accumulates errors instead of failing fast: each compilation phase
//! reports into its own ordered list, and the driver prints lexical, then
//! syntactic, then semantic diagnostics in that order. The message templates
//! below are part of the external contract and must not be reworded.

use crate::Line;
use std::fmt;

/// Which compilation phase raised a [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntactic,
    Semantic,
}

/// A single accumulated error, already rendered to its final user-facing text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    text: String,
}

impl Diagnostic {
    fn lexical(body: impl fmt::Display) -> Self {
        Self {
            kind: DiagnosticKind::Lexical,
            text: format!("ERRO LÉXICO: {body}"),
        }
    }

    fn syntactic(body: impl fmt::Display) -> Self {
        Self {
            kind: DiagnosticKind::Syntactic,
            text: format!("ERRO SINTÁTICO: {body}"),
        }
    }

    fn semantic(line: Line, body: impl fmt::Display) -> Self {
        Self {
            kind: DiagnosticKind::Semantic,
            text: format!("ERRO SEMÂNTICO na linha {line}: {body}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Collects the three disjoint diagnostic lists for one compilation.
///
/// A fresh `Diagnostics` is created per compile; nothing here is process-wide.
#[derive(Default, Debug, Clone)]
pub struct Diagnostics {
    lexical: Vec<Diagnostic>,
    syntactic: Vec<Diagnostic>,
    semantic: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record "illegal symbol '<c>' at line <n>", "comments not allowed", etc.
    pub fn lexical(&mut self, body: impl fmt::Display) {
        self.lexical.push(Diagnostic::lexical(body));
    }

    /// Record "unexpected token '<lexeme>' at line <n>" or "unexpected end of file".
    pub fn syntactic(&mut self, body: impl fmt::Display) {
        self.syntactic.push(Diagnostic::syntactic(body));
    }

    /// Record a semantic error tied to a source line.
    pub fn semantic(&mut self, line: Line, body: impl fmt::Display) {
        self.semantic.push(Diagnostic::semantic(line, body));
    }

    pub fn is_empty(&self) -> bool {
        self.lexical.is_empty() && self.syntactic.is_empty() && self.semantic.is_empty()
    }

    pub fn lexical_errors(&self) -> &[Diagnostic] {
        &self.lexical
    }

    pub fn syntactic_errors(&self) -> &[Diagnostic] {
        &self.syntactic
    }

    pub fn semantic_errors(&self) -> &[Diagnostic] {
        &self.semantic
    }

    /// All diagnostics, lexical first, then syntactic, then semantic —
    /// the order the driver must print them in.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.lexical
            .iter()
            .chain(self.syntactic.iter())
            .chain(self.semantic.iter())
    }

    pub fn count(&self) -> usize {
        self.lexical.len() + self.syntactic.len() + self.semantic.len()
    }
}
