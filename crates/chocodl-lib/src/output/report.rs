use crate::download::{DownloadError, DownloadReport};
use crate::selection::SelectedDownload;
use std::io::Write;

const SEPARATOR_WIDTH: usize = 80;

/// Dry-run output: one URL per line, in the order given.
pub fn write_download_urls<W: Write>(
    writer: &mut W,
    selections: &[SelectedDownload],
) -> std::io::Result<()> {
    for selected in selections {
        writeln!(writer, "{}", selected.url)?;
    }
    writer.flush()
}

/// Writes one diagnostic block per failed download. Digest mismatches get the
/// full expected/actual detail followed by a separator line.
pub fn write_failure_report<W: Write>(
    writer: &mut W,
    report: &DownloadReport,
) -> std::io::Result<()> {
    for outcome in report.failures() {
        let Some(failure) = &outcome.failure else {
            continue;
        };

        match failure {
            DownloadError::IntegrityMismatch {
                identifier,
                url,
                expected,
                actual,
            } => {
                writeln!(
                    writer,
                    "[!] SHA512 hash mismatch for the package '{}'",
                    identifier
                )?;
                writeln!(writer, " URL:\t\t'{}'", url)?;
                writeln!(writer, " Expected:\t'{}'", expected)?;
                writeln!(writer, " Got:\t\t'{}'", actual)?;
                writeln!(writer, "{}", "-".repeat(SEPARATOR_WIDTH))?;
            }
            other => {
                writeln!(
                    writer,
                    "[!] Download of the package '{}' failed: {}",
                    outcome.identifier, other
                )?;
            }
        }
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Architecture;
    use crate::download::DownloadOutcome;
    use crate::verification::Sha512Digest;
    use std::path::PathBuf;
    use std::time::Duration;

    fn selection(identifier: &str, url: &str) -> SelectedDownload {
        SelectedDownload {
            identifier: identifier.into(),
            destination: PathBuf::from("/out"),
            architecture: Architecture::X64,
            url: url.parse().unwrap(),
            file_name: "setup.exe".to_string(),
            digest: Sha512Digest::from_hex(&"11".repeat(64)).unwrap(),
        }
    }

    fn outcome(identifier: &str, failure: Option<DownloadError>) -> DownloadOutcome {
        DownloadOutcome {
            identifier: identifier.into(),
            url: "https://cdn.example.com/setup.exe".parse().unwrap(),
            file_path: PathBuf::from("/out/setup.exe"),
            failure,
        }
    }

    #[test]
    fn test_write_download_urls_one_per_line() {
        let selections = vec![
            selection("foo", "https://cdn.example.com/foo.exe"),
            selection("bar", "https://cdn.example.com/bar.msi"),
        ];
        let mut buffer = Vec::new();

        write_download_urls(&mut buffer, &selections).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "https://cdn.example.com/foo.exe\nhttps://cdn.example.com/bar.msi\n"
        );
    }

    #[test]
    fn test_failure_report_for_mismatch_includes_both_digests_and_separator() {
        let expected = Sha512Digest::from_hex(&"ca".repeat(64)).unwrap();
        let actual = Sha512Digest::from_hex(&"de".repeat(64)).unwrap();
        let mut report = DownloadReport::default();
        report.insert(outcome(
            "foo",
            Some(DownloadError::IntegrityMismatch {
                identifier: "foo".into(),
                url: "https://cdn.example.com/setup.exe".parse().unwrap(),
                expected,
                actual,
            }),
        ));
        let mut buffer = Vec::new();

        write_failure_report(&mut buffer, &report).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[!] SHA512 hash mismatch for the package 'foo'");
        assert!(lines[1].contains("https://cdn.example.com/setup.exe"));
        assert!(lines[2].contains(&"ca".repeat(64)));
        assert!(lines[3].contains(&"de".repeat(64)));
        assert_eq!(lines[4], "-".repeat(80));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_failure_report_skips_successes() {
        let mut report = DownloadReport::default();
        report.insert(outcome("ok", None));
        report.insert(outcome(
            "slow",
            Some(DownloadError::Timeout {
                url: "https://cdn.example.com/setup.exe".parse().unwrap(),
                timeout: Duration::from_secs(20),
            }),
        ));
        let mut buffer = Vec::new();

        write_failure_report(&mut buffer, &report).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("[!] Download of the package 'slow' failed: Timed out"));
    }
}
