mod passthrough;

pub use passthrough::PassthroughBackend;
