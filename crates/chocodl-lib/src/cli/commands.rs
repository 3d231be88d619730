use crate::catalog::CatalogClient;
use crate::cli::RunParams;
use crate::error::ChocoDlError;
use crate::resolve::resolve_all;
use crate::selection::{SelectedDownload, select_downloads};

/// Resolves every requested package against the catalog and picks one
/// download per package. Resolution finishes completely before this returns.
pub async fn resolve_and_select(params: &RunParams) -> Result<Vec<SelectedDownload>, ChocoDlError> {
    let client = CatalogClient::new(&params.app_config.catalog)?;

    tracing::info!("Resolving packages against {}", params.app_config.catalog.query_url);
    let resolved = resolve_all(&client, params.requests.clone()).await;

    let selections = select_downloads(&resolved);
    tracing::info!(
        "{} of {} packages have a download available",
        selections.len(),
        resolved.len()
    );
    Ok(selections)
}
