mod noop;

pub use noop::NoopIssueSearch;
