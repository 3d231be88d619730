pub mod catalog;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod output;
pub mod request;
pub mod resolve;
pub mod selection;
pub mod verification;

pub use config::Config;
pub use error::ChocoDlError;
