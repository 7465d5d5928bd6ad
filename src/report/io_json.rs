// Reading the race documents.
//
// The documents are read permissively: absent or null values count as zero.

use serde_json::Value as JSValue;
use vote_series::builder::SeriesBuilder;

use crate::report::*;

pub fn read_timeseries(path: &str) -> ReportResult<Vec<Sample>> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    parse_timeseries(&contents)
}

pub fn parse_timeseries(contents: &str) -> ReportResult<Vec<Sample>> {
    let js: JSValue = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    let timeseries = match js["data"]["races"][0]["timeseries"].as_array() {
        Some(x) => x,
        None => {
            warn!("parse_timeseries: no timeseries found in the document");
            return Ok(Vec::new());
        }
    };

    let mut builder = SeriesBuilder::new();
    for entry in timeseries.iter() {
        builder.add_sample(
            &read_js_string(&entry["timestamp"]),
            read_js_f64(&entry["votes"]),
            read_js_f64(&entry["vote_shares"]["trumpd"]),
            read_js_f64(&entry["vote_shares"]["bidenj"]),
            read_js_i64(&entry["eevp"]),
        );
    }
    debug!("parse_timeseries: {} samples", builder.samples().len());
    Ok(builder.build())
}

fn read_js_f64(x: &JSValue) -> f64 {
    match x {
        JSValue::Number(n) => n.as_f64().unwrap_or(0.0),
        JSValue::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        JSValue::Bool(true) => 1.0,
        _ => 0.0,
    }
}

fn read_js_i64(x: &JSValue) -> i64 {
    match x {
        JSValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        JSValue::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64))
            .unwrap_or(0),
        JSValue::Bool(true) => 1,
        _ => 0,
    }
}

fn read_js_string(x: &JSValue) -> String {
    match x {
        JSValue::String(s) => s.clone(),
        JSValue::Number(n) => n.to_string(),
        JSValue::Bool(b) => b.to_string(),
        _ => "".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(timeseries: &str) -> String {
        format!(
            r#"{{"data": {{"races": [{{"race_id": "X", "timeseries": {}}}]}}}}"#,
            timeseries
        )
    }

    #[test]
    fn complete_sample() {
        let samples = parse_timeseries(&document(
            r#"[{"vote_shares": {"trumpd": 0.5, "bidenj": 0.45}, "votes": 1000,
                 "eevp": 10, "timestamp": "2020-11-03T05:00:00Z"}]"#,
        ))
        .unwrap();
        assert_eq!(
            samples,
            vec![Sample {
                timestamp: "2020-11-03T05:00:00Z".to_string(),
                votes: 1000.0,
                vote_share_trump: 0.5,
                vote_share_biden: 0.45,
                eevp: 10,
            }]
        );
    }

    #[test]
    fn missing_fields_are_zero() {
        let samples = parse_timeseries(&document(
            r#"[{"votes": 1000, "eevp": null, "timestamp": "2020-11-03T05:00:00Z",
                 "vote_shares": {"trumpd": 0.5}},
                {"votes": "1200", "eevp": 12.7}]"#,
        ))
        .unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].vote_share_biden, 0.0);
        assert_eq!(samples[0].eevp, 0);
        assert_eq!(samples[1].votes, 1200.0);
        assert_eq!(samples[1].eevp, 12);
        assert_eq!(samples[1].timestamp, "");
        assert_eq!(samples[1].vote_share_trump, 0.0);
    }

    #[test]
    fn missing_share_counts_as_other() {
        let samples = parse_timeseries(&document(
            r#"[{"votes": 1000, "eevp": 5, "timestamp": "2020-11-03T05:00:00Z",
                 "vote_shares": {"trumpd": 0.5}}]"#,
        ))
        .unwrap();
        let report = run_series_report(&samples, &SeriesRules::DEFAULT_RULES).unwrap();
        assert_eq!(report.rows[0].share_other, 0.5);
        assert_eq!(report.rows[0].total_other, 500);
    }

    #[test]
    fn missing_timeseries() {
        assert!(parse_timeseries(r#"{"data": {"races": []}}"#)
            .unwrap()
            .is_empty());
        assert!(parse_timeseries("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_document() {
        assert!(matches!(
            parse_timeseries("{\"data\": "),
            Err(ReportError::ParsingJson { .. })
        ));
    }

    #[test]
    fn fixture() {
        let path = format!("{}/testdata/georgia.json", env!("CARGO_MANIFEST_DIR"));
        let samples = read_timeseries(&path).unwrap();
        assert_eq!(samples.len(), 8);
        assert_eq!(samples[0].votes, 0.0);
        assert_eq!(samples[7].eevp, 99);
    }
}
