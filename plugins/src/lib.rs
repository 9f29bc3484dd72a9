pub mod backend;
pub mod compress;
pub mod factory;
pub mod issues;
pub mod services;
pub mod worker;
