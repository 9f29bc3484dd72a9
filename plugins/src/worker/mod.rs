mod jsonl;

pub use jsonl::JsonlWorker;
