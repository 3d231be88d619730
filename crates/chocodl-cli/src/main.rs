use chocodl_lib::cli::{ResolvedCommand, parse_args, resolve_command, run_download, run_list_urls};
use chocodl_lib::error::ChocoDlError;
use chocodl_lib::output::write_failure_report;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), ChocoDlError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    match command {
        ResolvedCommand::ListUrls(params) => {
            let mut stdout = std::io::stdout();
            run_list_urls(params, &mut stdout).await?;
        }
        ResolvedCommand::Download(params) => {
            let report = run_download(params).await?;
            write_failure_report(&mut std::io::stderr(), &report)?;
            report.into_result()?;
        }
    }

    Ok(())
}
