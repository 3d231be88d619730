use crate::cli::args::Command;
use crate::cli::params::RunParams;
use crate::config::{Config, load_config, validate_config};
use crate::error::ChocoDlError;
use crate::request::load_request_list;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR_NAME: &str = "chocodl";

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    /// Resolve and print the selected download URLs only.
    ListUrls(RunParams),
    Download(RunParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, ChocoDlError> {
    let Command {
        input_file,
        do_not_download,
        output_dir,
        config_path,
        read_timeout_secs,
    } = command;

    if read_timeout_secs == Some(0) {
        return Err(ChocoDlError::CliArgumentValidation {
            details: "read-timeout must be greater than 0.".to_string(),
        });
    }

    let mut app_config = match config_path {
        Some(config_path) => load_config(&config_path)?,
        None => Config::default(),
    };

    if let Some(read_timeout_secs) = read_timeout_secs {
        app_config.download.read_timeout_secs = read_timeout_secs;
    }
    if let Some(output_dir) = output_dir {
        app_config.output.path = Some(PathBuf::from(output_dir));
    }
    validate_config(&app_config)?;

    let output_root = match &app_config.output.path {
        Some(path) => path.clone(),
        None => std::env::current_dir()?.join(DEFAULT_OUTPUT_DIR_NAME),
    };

    let requests = load_request_list(Path::new(&input_file), &output_root)?;
    tracing::debug!(
        "Loaded {} package requests from {} (default destination {})",
        requests.len(),
        input_file,
        output_root.display()
    );

    let params = RunParams {
        app_config,
        requests,
    };

    Ok(if do_not_download {
        ResolvedCommand::ListUrls(params)
    } else {
        ResolvedCommand::Download(params)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::PackageRequest;

    fn command(input_file: &Path) -> Command {
        Command {
            input_file: input_file.to_str().unwrap().to_string(),
            do_not_download: false,
            output_dir: None,
            config_path: None,
            read_timeout_secs: None,
        }
    }

    #[test]
    fn test_download_command_uses_cwd_default_output_root() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("packages.txt");
        std::fs::write(&input, "firefox\n").unwrap();

        let ResolvedCommand::Download(params) = resolve_command(command(&input)).unwrap() else {
            panic!("Expected a download command");
        };

        let expected_root = std::env::current_dir().unwrap().join("chocodl");
        assert_eq!(
            params.requests,
            vec![PackageRequest::new("firefox", expected_root)]
        );
    }

    #[test]
    fn test_dry_run_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("packages.txt");
        std::fs::write(&input, "git\nvlc | /media/vlc\n").unwrap();

        let mut cmd = command(&input);
        cmd.do_not_download = true;
        cmd.output_dir = Some("/srv/out".to_string());
        cmd.read_timeout_secs = Some(3);

        let ResolvedCommand::ListUrls(params) = resolve_command(cmd).unwrap() else {
            panic!("Expected a list-urls command");
        };

        assert_eq!(params.app_config.download.read_timeout_secs, 3);
        assert_eq!(
            params.requests,
            vec![
                PackageRequest::new("git", "/srv/out"),
                PackageRequest::new("vlc", "/media/vlc"),
            ]
        );
    }

    #[test]
    fn test_zero_read_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("packages.txt");
        std::fs::write(&input, "git\n").unwrap();

        let mut cmd = command(&input);
        cmd.read_timeout_secs = Some(0);

        assert!(matches!(
            resolve_command(cmd),
            Err(ChocoDlError::CliArgumentValidation { .. })
        ));
    }

    #[test]
    fn test_missing_input_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            resolve_command(command(&dir.path().join("missing.txt"))),
            Err(ChocoDlError::InputList { .. })
        ));
    }
}
