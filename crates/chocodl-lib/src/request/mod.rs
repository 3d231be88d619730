mod list;
mod types;

pub use list::{dedupe_requests, load_request_list, parse_request_list};
pub use types::PackageRequest;
