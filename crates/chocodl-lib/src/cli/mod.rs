mod args;
mod commands;
mod download;
mod list_urls;
mod params;
mod resolved_command;

pub use args::{Args, Command, parse_args};
pub use commands::resolve_and_select;
pub use download::run_download;
pub use list_urls::run_list_urls;
pub use params::RunParams;
pub use resolved_command::{DEFAULT_OUTPUT_DIR_NAME, ResolvedCommand, resolve_command};
