mod count_cmd;
mod extract_cmd;
mod filter_cmd;

pub use count_cmd::cmd_count;
pub use extract_cmd::cmd_extract;
pub use filter_cmd::cmd_filter;
