//! Baseline domain knowledge loaded into every new graph.

use super::types::{ErrorPatternNode, FrameworkNode, KnowledgeEdge, KnowledgeGraph, KnowledgeNode};

const FRAMEWORKS: &[(&str, &str, &str)] = &[
    ("react", "javascript", "Component-based UI library"),
    ("nextjs", "javascript", "React framework with server rendering and routing"),
    ("vue", "javascript", "Progressive UI framework"),
    ("express", "javascript", "Minimal HTTP server framework for Node.js"),
    ("django", "python", "Batteries-included web framework"),
    ("flask", "python", "Lightweight WSGI web framework"),
    ("tokio", "rust", "Asynchronous runtime for Rust"),
    ("axum", "rust", "HTTP framework built on tokio and tower"),
];

/// (child, parent) pairs: the child builds on the parent's ecosystem.
const ECOSYSTEMS: &[(&str, &str)] = &[("nextjs", "react"), ("axum", "tokio")];

struct PatternSeed {
    slug: &'static str,
    pattern: &'static str,
    description: &'static str,
    solutions: &'static [&'static str],
    frameworks: &'static [&'static str],
}

const ERROR_PATTERNS: &[PatternSeed] = &[
    PatternSeed {
        slug: "undefined-property",
        pattern: "cannot read properties of undefined",
        description: "Property access on an undefined or null value",
        solutions: &[
            "Guard the access with optional chaining",
            "Initialize state before first render",
        ],
        frameworks: &["react", "express"],
    },
    PatternSeed {
        slug: "module-not-found",
        pattern: "module not found",
        description: "A module import could not be resolved",
        solutions: &[
            "Install the missing package",
            "Check the relative import path and file extension",
        ],
        frameworks: &["react", "nextjs", "vue"],
    },
    PatternSeed {
        slug: "connection-refused",
        pattern: "econnrefused",
        description: "Outbound connection rejected by the target host",
        solutions: &[
            "Make sure the target service is running",
            "Verify host and port configuration",
        ],
        frameworks: &["express"],
    },
    PatternSeed {
        slug: "python-import",
        pattern: "modulenotfounderror",
        description: "Python package missing from the active environment",
        solutions: &[
            "Install the package into the active virtualenv",
            "Check PYTHONPATH",
        ],
        frameworks: &["django", "flask"],
    },
    PatternSeed {
        slug: "moved-value",
        pattern: "borrow of moved value",
        description: "A value is used after ownership moved elsewhere",
        solutions: &[
            "Borrow instead of moving",
            "Clone the value before the move",
        ],
        frameworks: &["tokio", "axum"],
    },
];

pub fn seed_baseline(graph: &mut KnowledgeGraph) {
    for (name, language, description) in FRAMEWORKS {
        graph.upsert_node(
            KnowledgeNode::framework_id(name),
            KnowledgeNode::Framework(FrameworkNode {
                name: name.to_string(),
                language: language.to_string(),
                description: description.to_string(),
            }),
        );
    }

    for (child, parent) in ECOSYSTEMS {
        graph.add_edge(
            KnowledgeNode::framework_id(child),
            KnowledgeNode::framework_id(parent),
            KnowledgeEdge::Ecosystem,
        );
    }

    for seed in ERROR_PATTERNS {
        let id = KnowledgeNode::error_pattern_id(seed.slug);
        graph.upsert_node(
            id.clone(),
            KnowledgeNode::ErrorPattern(ErrorPatternNode {
                pattern: seed.pattern.to_string(),
                description: seed.description.to_string(),
                solutions: seed.solutions.iter().map(|s| s.to_string()).collect(),
            }),
        );
        for framework in seed.frameworks {
            graph.add_edge(
                id.clone(),
                KnowledgeNode::framework_id(framework),
                KnowledgeEdge::OccursIn,
            );
        }
    }
}
