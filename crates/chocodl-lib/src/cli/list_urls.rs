use crate::cli::RunParams;
use crate::cli::commands::resolve_and_select;
use crate::error::ChocoDlError;
use crate::output::write_download_urls;
use crate::selection::SelectedDownload;
use std::io::Write;

/// Dry run: resolves and selects, then writes the chosen URLs without
/// downloading anything or touching the output directories.
pub async fn run_list_urls<W: Write>(
    params: RunParams,
    writer: &mut W,
) -> Result<Vec<SelectedDownload>, ChocoDlError> {
    let selections = resolve_and_select(&params).await?;
    write_download_urls(writer, &selections)?;
    Ok(selections)
}
