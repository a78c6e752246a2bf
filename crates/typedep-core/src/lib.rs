//! Typedep Core: type graph data model, corpus maps, validation, and wire codec

pub mod codec;
pub mod corpus;
pub mod error;
pub mod graph;
pub mod model;


pub use model::{Classifier, DeclarationBody, RefKind, ReferenceEdge, SourceFile, SourceKind, TypeDeclaration};
pub use corpus::{Corpus, FileScan, ScanTable};
pub use error::{Result, TypeGraphError};
pub use graph::{TypeGraph, ValidationReport};
pub use codec::{decode_edge, decode_node, encode_edge, encode_node, load_graph, save_graph};
