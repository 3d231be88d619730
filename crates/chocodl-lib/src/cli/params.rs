use crate::config::Config;
use crate::request::PackageRequest;

#[derive(Debug, Clone)]
pub struct RunParams {
    pub app_config: Config,
    pub requests: Vec<PackageRequest>,
}
