#![allow(dead_code)]

use std::sync::Arc;

use taskloom_core::api::{
    ComponentPrioritizer, ContextComponent, ContextCompressor, CompressorConfig, ProjectScan,
    Summarizer, SummaryKind,
};

pub const SAMPLE_SCAN: &str = r#"{
    "files": [
        {"path": "src/http/router.rs", "language": "rust", "size": 2048},
        {"path": "src/http/handlers.rs", "language": "rust", "size": 4096},
        {"path": "src/db/pool.rs", "language": "rust", "size": 1024}
    ],
    "dependencies": {
        "direct": [
            {"name": "axum", "version": "0.7", "dependencies": [
                {"name": "hyper", "version": "1.0", "dependencies": [{"name": "http"}]},
                {"name": "tower"}
            ]},
            {"name": "sqlx", "version": "0.7"}
        ],
        "transitive": [{"name": "http", "version": "1.1"}]
    },
    "codeEntities": [
        {"type": "function", "name": "build_router", "file": "src/http/router.rs", "line": 12},
        {"type": "function", "name": "list_users", "file": "src/http/handlers.rs", "line": 30},
        {"type": "struct", "name": "DbPool", "file": "src/db/pool.rs", "line": 5}
    ],
    "imports": [
        {"from": "src/http/router.rs", "to": "src/http/handlers.rs"},
        {"from": "src/http/handlers.rs", "to": "src/db/pool.rs"}
    ],
    "functionCalls": [
        {"caller": "build_router", "callee": "list_users", "count": 2},
        {"caller": "list_users", "callee": "acquire"}
    ]
}"#;

pub fn sample_scan() -> ProjectScan {
    ProjectScan::from_json_str(SAMPLE_SCAN).expect("sample scan decodes")
}

pub struct HeadLines(pub usize);

impl Summarizer for HeadLines {
    fn name(&self) -> &str {
        "head-lines"
    }

    fn summarize(&self, content: &str, _kind: SummaryKind) -> String {
        content.lines().take(self.0).collect::<Vec<_>>().join("\n")
    }
}

pub struct Unordered;

impl ComponentPrioritizer for Unordered {
    fn name(&self) -> &str {
        "unordered"
    }

    fn prioritize(&self, components: Vec<ContextComponent>) -> Vec<ContextComponent> {
        components
    }
}

pub fn compressor() -> ContextCompressor {
    ContextCompressor::new(
        CompressorConfig::default(),
        Arc::new(HeadLines(3)),
        Arc::new(Unordered),
    )
}
