mod load;
mod types;

pub use load::{get_taskloom_data_dir, load_default, load_from_path, resolve_log_dir};
pub use types::*;
