pub mod cli;
pub mod compress;
pub mod input;
pub mod knowledge;
pub mod plan;
pub mod run;
