use super::Config;
use super::model::IDENTIFIER_PLACEHOLDER;
use crate::error::ChocoDlError;
use config::Config as ConfigBuilder;

pub fn load_config(config_path: &str) -> Result<Config, ChocoDlError> {
    let config_builder = ConfigBuilder::builder()
        .add_source(config::File::with_name(config_path))
        .build()?;

    let app_config: Config = config_builder.try_deserialize()?;
    validate_config(&app_config)?;
    Ok(app_config)
}

pub fn validate_config(app_config: &Config) -> Result<(), ChocoDlError> {
    if !app_config.catalog.query_url.contains(IDENTIFIER_PLACEHOLDER) {
        return Err(ChocoDlError::ConfigValidation {
            details: format!(
                "catalog.query_url must contain the {} placeholder",
                IDENTIFIER_PLACEHOLDER
            ),
        });
    }

    for (name, value) in [
        (
            "catalog.request_timeout_secs",
            app_config.catalog.request_timeout_secs,
        ),
        (
            "download.read_timeout_secs",
            app_config.download.read_timeout_secs,
        ),
    ] {
        if value == 0 {
            return Err(ChocoDlError::ConfigValidation {
                details: format!("{name} must be greater than 0"),
            });
        }
    }

    Ok(())
}
