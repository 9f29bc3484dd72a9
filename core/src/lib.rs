pub mod api;
pub mod compress;
pub mod config;
pub mod decompose;
pub mod error;
pub mod graph;
pub mod knowledge;
pub mod orchestrator;
pub mod util;
