//! Graph assembly: classifies every declaration against its file's visible types

use rayon::prelude::*;
use typedep_core::{Corpus, ReferenceEdge, TypeGraph};

use crate::classifier::ReferenceClassifier;

/// Build the type graph from a merged corpus.
///
/// Every declared type becomes a node. Each declaring file is classified on
/// its own rayon task against the types its includes make visible; the edge
/// set is deduplicated by (caller, callee, kind).
pub fn assemble(corpus: &Corpus) -> TypeGraph {
    let mut graph = TypeGraph::new();
    for node in corpus.types() {
        graph.add_node(node.clone());
    }

    let files: Vec<_> = corpus.declarations().iter().collect();
    let edges: Vec<ReferenceEdge> = files
        .par_iter()
        .flat_map_iter(|(source, declarations)| {
            let classifier = ReferenceClassifier::new(corpus.visible_types(source));
            if classifier.is_empty() {
                return Vec::new();
            }
            declarations
                .iter()
                .flat_map(|(caller, code)| {
                    classifier
                        .classify(code)
                        .into_iter()
                        .map(move |(callee, kind)| ReferenceEdge::new(caller.clone(), callee.clone(), kind))
                })
                .collect::<Vec<_>>()
        })
        .collect();

    for edge in edges {
        graph.add_edge(edge);
    }
    graph
}
