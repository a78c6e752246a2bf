//! Lexical declaration extractor
//!
//! Recovers `class`, `struct` and `enum` definitions from C/C++ text without
//! parsing it. The text is split on declaration heads (keyword followed by an
//! identifier); each head owns the text up to the next head. A head only counts
//! as a definition when an opening brace follows it, optionally preceded by a
//! base list. The body runs from that brace to its matching close, counted over
//! the rest of the file so nested types do not cut the outer body short.
//!
//! Known limitations: block comments and trailing `//` comments are kept, and
//! braces inside string or character literals are counted.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;
use typedep_core::{Classifier, DeclarationBody, SourceFile, TypeDeclaration};

use crate::warning::ScanWarning;

static DECLARATION_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(class|struct|enum(?:\s+(?:class|struct))?)\s+([_a-zA-Z][_a-zA-Z0-9]*)").unwrap()
});

/// Words the head pattern can capture in the name position that never name a type,
/// e.g. `struct __attribute__((packed)) Header` or `class alignas(16) Block`.
const NOT_A_NAME: &[&str] = &[
    "alignas",
    "__attribute__",
    "__declspec",
    "final",
    "const",
    "volatile",
    "public",
    "protected",
    "private",
    "virtual",
];

/// Declarations recovered from one file.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub declarations: BTreeMap<TypeDeclaration, DeclarationBody>,
    pub warnings: Vec<ScanWarning>,
}

/// Drop blank lines and lines that are entirely `//` comments. Remaining lines are trimmed.
pub fn strip_line_comments(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract every type definition in `code`, attributing each to `source`.
///
/// `code` is expected to have been through [`strip_line_comments`].
pub fn extract_declarations(code: &str, source: &SourceFile) -> Extraction {
    let mut extraction = Extraction::default();
    let heads: Vec<_> = DECLARATION_HEAD.captures_iter(code).collect();

    for (i, caps) in heads.iter().enumerate() {
        let Some(head) = caps.get(0) else { continue };
        let segment_end = heads
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(code.len(), |m| m.start());

        let keyword = caps.get(1).map_or("", |m| m.as_str());
        let name = caps.get(2).map(|m| m.as_str()).filter(|n| !NOT_A_NAME.contains(n));
        let Some(name) = name else {
            extraction.warnings.push(ScanWarning::MissingIdentifier {
                head: head.as_str().to_string(),
            });
            continue;
        };
        let Some(classifier) = Classifier::from_keyword(keyword) else {
            extraction.warnings.push(ScanWarning::UnknownClassifier {
                head: head.as_str().to_string(),
            });
            continue;
        };

        let segment = &code[head.end()..segment_end];
        let Some(open) = segment.find('{') else {
            debug!("`{}` in {} is not a definition", head.as_str(), source);
            continue;
        };
        let clause = segment[..open].trim();
        if !is_base_clause(clause) {
            debug!("`{} {}` in {} is not a definition", head.as_str(), clause, source);
            continue;
        }

        let body_start = head.end() + open + 1;
        let body = matching_body(&code[body_start..]);
        extraction
            .declarations
            .entry(TypeDeclaration::new(name, classifier, source))
            .or_insert_with(|| DeclarationBody::new(clause, body));
    }

    extraction
}

/// Text allowed between a type name and its opening brace: nothing, a base
/// list, or `final` optionally followed by a base list.
fn is_base_clause(clause: &str) -> bool {
    let rest = clause.strip_prefix("final").map_or(clause, str::trim_start);
    rest.is_empty() || rest.starts_with(':')
}

/// Given the text just after an opening brace, return everything up to the
/// matching close. Unbalanced text runs to the end.
fn matching_body(text: &str) -> &str {
    let mut depth = 1usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &text[..i];
                }
            }
            _ => {}
        }
    }
    text
}
