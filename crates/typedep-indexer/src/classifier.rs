//! Reference classification
//!
//! Decides how a declaration refers to each type visible to its file:
//!
//! - the base list naming the type (substring match) is [`RefKind::Inheritance`];
//! - otherwise the body is split on `;` and the statements naming the type as a
//!   whole word are collected. If none of them contains both `(` and `)`, the
//!   type is held as a field ([`RefKind::Composition`]); if any does, it is used
//!   by a member function ([`RefKind::MethodUse`]).
//!
//! The base list and the body are scanned independently, so one callee can
//! receive an inheritance edge and a body edge.

use regex::Regex;
use std::collections::BTreeSet;
use tracing::warn;
use typedep_core::{DeclarationBody, RefKind, TypeDeclaration};

/// A visible type with its whole-word pattern compiled once.
struct Candidate<'a> {
    decl: &'a TypeDeclaration,
    word: Regex,
}

/// Classifies declaration bodies against a fixed set of visible types.
pub struct ReferenceClassifier<'a> {
    candidates: Vec<Candidate<'a>>,
}

impl<'a> ReferenceClassifier<'a> {
    pub fn new(visible: impl IntoIterator<Item = &'a TypeDeclaration>) -> Self {
        let candidates = visible
            .into_iter()
            .filter_map(|decl| match word_pattern(&decl.name) {
                Ok(word) => Some(Candidate { decl, word }),
                Err(e) => {
                    warn!("Cannot build pattern for {}: {}", decl.name, e);
                    None
                }
            })
            .collect();
        Self { candidates }
    }

    /// Every (callee, kind) referenced by `code`, in sorted order.
    pub fn classify(&self, code: &DeclarationBody) -> BTreeSet<(&'a TypeDeclaration, RefKind)> {
        let statements: Vec<&str> = code.body.split(';').collect();
        let mut found = BTreeSet::new();
        for candidate in &self.candidates {
            if inherits_from(&code.inheritance, &candidate.decl.name) {
                found.insert((candidate.decl, RefKind::Inheritance));
            }
            if let Some(kind) = classify_statements(&statements, &candidate.word) {
                found.insert((candidate.decl, kind));
            }
        }
        found
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

fn word_pattern(name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\b{}\b", regex::escape(name)))
}

/// True if the base list names `name`.
pub fn inherits_from(inheritance: &str, name: &str) -> bool {
    !inheritance.is_empty() && inheritance.contains(name)
}

/// Body classification for one type name.
pub fn classify_body(body: &str, name: &str) -> Option<RefKind> {
    let word = word_pattern(name).ok()?;
    let statements: Vec<&str> = body.split(';').collect();
    classify_statements(&statements, &word)
}

fn classify_statements(statements: &[&str], word: &Regex) -> Option<RefKind> {
    let mut matching = statements.iter().filter(|s| word.is_match(s)).peekable();
    matching.peek()?;
    if matching.any(|s| s.contains('(') && s.contains(')')) {
        Some(RefKind::MethodUse)
    } else {
        Some(RefKind::Composition)
    }
}
