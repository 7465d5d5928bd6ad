use crate::report::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "zeroVotePolicy")]
    pub zero_vote_policy: Option<String>,
    #[serde(rename = "dropComparison")]
    pub drop_comparison: Option<String>,
    #[serde(rename = "noteSeparator")]
    pub note_separator: Option<String>,
}

impl RulesConfig {
    pub fn to_rules(&self) -> ReportResult<SeriesRules> {
        let mut rules = SeriesRules::DEFAULT_RULES;
        if let Some(x) = &self.zero_vote_policy {
            rules.zero_vote_policy = parse_zero_vote_policy(x)?;
        }
        if let Some(x) = &self.drop_comparison {
            rules.drop_comparison = parse_drop_comparison(x)?;
        }
        if let Some(x) = &self.note_separator {
            rules.note_separator = parse_note_separator(x)?;
        }
        Ok(rules)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "inputDirectory")]
    pub input_directory: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    pub states: Option<Vec<String>>,
    #[serde(rename = "urlTemplate")]
    pub url_template: Option<String>,
    #[serde(rename = "reportSchema")]
    pub report_schema: Option<String>,
    pub rules: Option<RulesConfig>,
}

pub fn parse_zero_vote_policy(s: &str) -> ReportResult<ZeroVotePolicy> {
    match s {
        "skip" => Ok(ZeroVotePolicy::Skip),
        // The short form is the one of the command line.
        "keep" | "keepZeroShare" => Ok(ZeroVotePolicy::KeepZeroShare),
        x => whatever!("unknown zero vote policy: {:?}", x),
    }
}

pub fn parse_drop_comparison(s: &str) -> ReportResult<DropComparison> {
    match s {
        "inclusive" => Ok(DropComparison::Inclusive),
        "strict" => Ok(DropComparison::Strict),
        x => whatever!("unknown drop comparison: {:?}", x),
    }
}

pub fn parse_note_separator(s: &str) -> ReportResult<NoteSeparator> {
    match s {
        "comma" => Ok(NoteSeparator::Comma),
        "space" => Ok(NoteSeparator::Space),
        x => whatever!("unknown note separator: {:?}", x),
    }
}

pub fn parse_config(contents: &str) -> ReportResult<ReportConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu {})
}

pub fn read_config(path: &str) -> ReportResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config() {
        let config = parse_config(
            r#"{
                "inputDirectory": "data/input",
                "outputDirectory": "data/output",
                "states": ["georgia"],
                "urlTemplate": "http://localhost/{state}.json",
                "reportSchema": "legacy",
                "rules": {
                    "zeroVotePolicy": "keepZeroShare",
                    "dropComparison": "strict",
                    "noteSeparator": "space"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.input_directory, Some("data/input".to_string()));
        assert_eq!(config.states, Some(vec!["georgia".to_string()]));
        let rules = config.rules.unwrap().to_rules().unwrap();
        assert_eq!(rules.zero_vote_policy, ZeroVotePolicy::KeepZeroShare);
        assert_eq!(rules.drop_comparison, DropComparison::Strict);
        assert_eq!(rules.note_separator, NoteSeparator::Space);
        assert_eq!(rules.display_offset_seconds, EST_OFFSET_SECONDS);
    }

    #[test]
    fn empty_config() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, ReportConfig::default());
        let rules = RulesConfig::default().to_rules().unwrap();
        assert_eq!(rules, SeriesRules::DEFAULT_RULES);
    }

    #[test]
    fn unknown_values() {
        assert!(parse_zero_vote_policy("drop").is_err());
        assert!(parse_drop_comparison("lenient").is_err());
        assert!(parse_note_separator("tab").is_err());
        assert!(parse_config("[1, 2]").is_err());
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_config("/nonexistent/tsreport.json"),
            Err(ReportError::OpeningFile { .. })
        ));
    }
}
