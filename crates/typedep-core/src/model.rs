//! Core data structures for the type graph

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Whether a source file is a header or a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    Header,
    #[serde(alias = "CPP")]
    CompilationUnit,
}

impl SourceKind {
    /// Every recognised kind, in lookup order.
    pub const ALL: [SourceKind; 2] = [SourceKind::Header, SourceKind::CompilationUnit];

    /// File extensions (without the dot) that map to this kind.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SourceKind::Header => &["h", "hpp"],
            SourceKind::CompilationUnit => &["c", "cc", "cpp", "c++"],
        }
    }

    /// Reverse lookup from an extension (with or without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        Self::ALL
            .into_iter()
            .find(|kind| kind.extensions().contains(&ext))
    }

    /// Detect the kind from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// A source file, identified by its stem and kind rather than by path.
///
/// `engine/Engine.h` and `legacy/Engine.hpp` are the same entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceFile {
    pub stem: String,
    pub kind: SourceKind,
}

impl SourceFile {
    pub fn new(stem: impl Into<String>, kind: SourceKind) -> Self {
        SourceFile {
            stem: stem.into(),
            kind,
        }
    }

    /// Build the identity of the file at `path`, if its extension is recognised.
    pub fn from_path(path: &Path) -> Option<Self> {
        let kind = SourceKind::from_path(path)?;
        let stem = path.file_stem()?.to_str()?;
        Some(SourceFile::new(stem, kind))
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stem)
    }
}

/// The kind of type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classifier {
    Enum,
    Struct,
    Class,
}

impl Classifier {
    /// Keywords that introduce this kind of declaration.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Classifier::Enum => &["enum", "enum class", "enum struct"],
            Classifier::Struct => &["struct"],
            Classifier::Class => &["class"],
        }
    }

    /// Exact-match lookup of a declaration keyword. Runs of whitespace inside
    /// the keyword are treated as a single space, so `enum   class` is `Enum`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let normalized = keyword.split_whitespace().collect::<Vec<_>>().join(" ");
        [Classifier::Enum, Classifier::Struct, Classifier::Class]
            .into_iter()
            .find(|c| c.keywords().contains(&normalized.as_str()))
    }
}

/// A type declared in a source file. Value identity across all four fields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub classifier: Classifier,
    #[serde(rename = "sourceName")]
    pub source_name: String,
    #[serde(rename = "sourceType")]
    pub source_kind: SourceKind,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>, classifier: Classifier, source: &SourceFile) -> Self {
        TypeDeclaration {
            name: name.into(),
            classifier,
            source_name: source.stem.clone(),
            source_kind: source.kind,
        }
    }

    /// The file this type was declared in.
    pub fn source(&self) -> SourceFile {
        SourceFile::new(self.source_name.clone(), self.source_kind)
    }
}

impl fmt::Display for TypeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The raw text recovered for one declaration. Only lives until classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationBody {
    /// Text between the type name and the opening brace, e.g. `: public Base`.
    /// Empty when the declaration has no base list.
    pub inheritance: String,
    /// Text between the opening brace and its matching close.
    pub body: String,
}

impl DeclarationBody {
    pub fn new(inheritance: impl Into<String>, body: impl Into<String>) -> Self {
        DeclarationBody {
            inheritance: inheritance.into(),
            body: body.into(),
        }
    }
}

/// How one type refers to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefKind {
    /// Named in the base list.
    Inheritance,
    /// Held as a field.
    Composition,
    /// Appears in a member function signature or call.
    #[serde(alias = "METHOD")]
    MethodUse,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::Inheritance => write!(f, "inheritance"),
            RefKind::Composition => write!(f, "composition"),
            RefKind::MethodUse => write!(f, "method use"),
        }
    }
}

/// A directed reference from `caller` to `callee`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReferenceEdge {
    pub caller: TypeDeclaration,
    pub callee: TypeDeclaration,
    #[serde(rename = "refType")]
    pub kind: RefKind,
}

impl ReferenceEdge {
    pub fn new(caller: TypeDeclaration, callee: TypeDeclaration, kind: RefKind) -> Self {
        ReferenceEdge {
            caller,
            callee,
            kind,
        }
    }
}

impl fmt::Display for ReferenceEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.caller, self.callee, self.kind)
    }
}
