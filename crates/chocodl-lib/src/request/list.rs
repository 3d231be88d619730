use super::types::PackageRequest;
use crate::error::ChocoDlError;
use std::collections::HashMap;
use std::path::Path;

const DESTINATION_SEPARATOR: char = '|';
const COMMENT_PREFIX: char = '#';

/// Parses a package list. Each non-blank line is either `identifier` or
/// `identifier | destination-directory`; lines starting with `#` are skipped.
pub fn parse_request_list(contents: &str, default_destination: &Path) -> Vec<PackageRequest> {
    let mut requests = Vec::new();

    for (line_number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        let (identifier, destination) = match line.split_once(DESTINATION_SEPARATOR) {
            Some((identifier, destination)) => (identifier.trim(), destination.trim()),
            None => (line, ""),
        };

        if identifier.is_empty() {
            tracing::warn!(
                line = line_number + 1,
                "Skipping package list entry without a package identifier"
            );
            continue;
        }

        let destination = if destination.is_empty() {
            default_destination.to_path_buf()
        } else {
            destination.into()
        };

        requests.push(PackageRequest::new(identifier, destination));
    }

    requests
}

pub fn load_request_list(
    path: &Path,
    default_destination: &Path,
) -> Result<Vec<PackageRequest>, ChocoDlError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ChocoDlError::InputList {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(parse_request_list(&contents, default_destination))
}

/// Collapses requests naming the same identifier (case-insensitively) into one.
///
/// The first occurrence keeps its position and spelling, the last occurrence's
/// destination wins. Conflicting destinations are logged.
pub fn dedupe_requests(requests: Vec<PackageRequest>) -> Vec<PackageRequest> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<PackageRequest> = Vec::with_capacity(requests.len());

    for request in requests {
        let key = request.key();
        match positions.get(&key) {
            Some(&position) => {
                let existing = &mut unique[position];
                if existing.destination != request.destination {
                    tracing::warn!(
                        package = %existing.identifier,
                        previous = %existing.destination.display(),
                        replacement = %request.destination.display(),
                        "Package listed more than once with different destinations, using the last one"
                    );
                } else {
                    tracing::debug!(
                        package = %existing.identifier,
                        "Package listed more than once"
                    );
                }
                existing.destination = request.destination;
            }
            None => {
                positions.insert(key, unique.len());
                unique.push(request);
            }
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_bare_identifiers_use_default_destination() {
        let requests = parse_request_list("firefox\n7zip\n", Path::new("/out"));

        assert_eq!(
            requests,
            vec![
                PackageRequest::new("firefox", "/out"),
                PackageRequest::new("7zip", "/out"),
            ]
        );
    }

    #[test]
    fn test_parse_identifier_with_destination() {
        let requests = parse_request_list("git | /opt/tools/git\n", Path::new("/out"));

        assert_eq!(requests, vec![PackageRequest::new("git", "/opt/tools/git")]);
    }

    #[test]
    fn test_parse_tolerates_missing_spaces_around_separator() {
        let requests = parse_request_list("git|tools\n", Path::new("/out"));

        assert_eq!(requests[0].identifier.as_ref(), "git");
        assert_eq!(requests[0].destination, PathBuf::from("tools"));
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        let contents = "\n   \n# browsers\nfirefox\n\n  # editors\nvscode\n";
        let requests = parse_request_list(contents, Path::new("/out"));

        let identifiers: Vec<&str> = requests.iter().map(|r| r.identifier.as_ref()).collect();
        assert_eq!(identifiers, vec!["firefox", "vscode"]);
    }

    #[test]
    fn test_parse_empty_destination_falls_back_to_default() {
        let requests = parse_request_list("curl |   \n", Path::new("/out"));

        assert_eq!(requests, vec![PackageRequest::new("curl", "/out")]);
    }

    #[test]
    fn test_parse_skips_entry_without_identifier() {
        let requests = parse_request_list(" | /somewhere\nwget\n", Path::new("/out"));

        assert_eq!(requests, vec![PackageRequest::new("wget", "/out")]);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_request_list("", Path::new("/out")).is_empty());
    }

    #[test]
    fn test_load_missing_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_request_list(&dir.path().join("missing.txt"), Path::new("/out"));

        assert!(matches!(result, Err(ChocoDlError::InputList { .. })));
    }

    #[test]
    fn test_dedupe_keeps_first_position_and_last_destination() {
        let requests = vec![
            PackageRequest::new("Firefox", "/a"),
            PackageRequest::new("git", "/out"),
            PackageRequest::new("firefox", "/b"),
        ];

        let unique = dedupe_requests(requests);

        assert_eq!(
            unique,
            vec![
                PackageRequest::new("Firefox", "/b"),
                PackageRequest::new("git", "/out"),
            ]
        );
    }

    #[test]
    fn test_dedupe_without_duplicates_is_identity() {
        let requests = vec![
            PackageRequest::new("a", "/out"),
            PackageRequest::new("b", "/out"),
        ];

        assert_eq!(dedupe_requests(requests.clone()), requests);
    }
}
