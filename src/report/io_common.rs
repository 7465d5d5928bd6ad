use std::path::{Path, PathBuf};

use crate::report::*;

/// The names of the states, as they appear in the URLs of the race pages.
pub const STATES: [&str; 51] = [
    "alabama",
    "alaska",
    "arizona",
    "arkansas",
    "california",
    "colorado",
    "connecticut",
    "delaware",
    "district-of-columbia",
    "florida",
    "georgia",
    "hawaii",
    "idaho",
    "illinois",
    "indiana",
    "iowa",
    "kansas",
    "kentucky",
    "louisiana",
    "maine",
    "maryland",
    "massachusetts",
    "michigan",
    "minnesota",
    "mississippi",
    "missouri",
    "montana",
    "nebraska",
    "nevada",
    "new-hampshire",
    "new-jersey",
    "new-mexico",
    "new-york",
    "north-carolina",
    "north-dakota",
    "ohio",
    "oklahoma",
    "oregon",
    "pennsylvania",
    "rhode-island",
    "south-carolina",
    "south-dakota",
    "tennessee",
    "texas",
    "utah",
    "vermont",
    "virginia",
    "washington",
    "west-virginia",
    "wisconsin",
    "wyoming",
];

fn state_path(dir: &str, state: &str, extension: &str) -> String {
    let p: PathBuf = [dir.to_string(), format!("{}.{}", state, extension)]
        .iter()
        .collect();
    p.as_path().display().to_string()
}

pub fn state_input_path(dir: &str, state: &str) -> String {
    state_path(dir, state, "json")
}

pub fn state_output_path(dir: &str, state: &str) -> String {
    state_path(dir, state, "csv")
}

/// The name used in the logs for a single input file.
pub fn state_from_path(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Checks the requested states. All the states are returned if none is requested.
pub fn resolve_states(requested: Option<&[String]>) -> ReportResult<Vec<String>> {
    match requested {
        None => Ok(STATES.iter().map(|s| s.to_string()).collect()),
        Some(names) => {
            let mut res: Vec<String> = Vec::new();
            for name in names {
                let normalized = name.trim().to_lowercase().replace(' ', "-");
                ensure!(
                    STATES.contains(&normalized.as_str()),
                    UnknownStateSnafu { state: name }
                );
                if !res.contains(&normalized) {
                    res.push(normalized);
                }
            }
            Ok(res)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_are_sorted_and_unique() {
        let mut sorted = STATES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, STATES.to_vec());
    }

    #[test]
    fn paths() {
        assert_eq!(
            state_input_path("data/input", "new-york"),
            Path::new("data/input")
                .join("new-york.json")
                .display()
                .to_string()
        );
        assert!(state_output_path("out", "ohio").ends_with("ohio.csv"));
        assert_eq!(state_from_path("data/input/new-york.json"), "new-york");
        assert_eq!(state_from_path("georgia"), "georgia");
    }

    #[test]
    fn requested_states() {
        let requested = vec![
            "Georgia".to_string(),
            "new hampshire".to_string(),
            "georgia".to_string(),
        ];
        let states = resolve_states(Some(&requested)).unwrap();
        assert_eq!(states, vec!["georgia", "new-hampshire"]);
        let unknown = vec!["atlantis".to_string()];
        assert!(matches!(
            resolve_states(Some(&unknown)),
            Err(ReportError::UnknownState { .. })
        ));
        assert_eq!(resolve_states(None).unwrap().len(), 51);
    }
}
