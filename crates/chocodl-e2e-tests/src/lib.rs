pub mod test_server;
mod test_utils;

pub use test_server::{Route, TestServer};
pub use test_utils::*;
