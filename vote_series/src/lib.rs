pub mod builder;
mod config;
pub mod manual;

use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};
use log::{debug, info, warn};
use snafu::prelude::*;

pub use crate::config::*;

// **** Private structures ****

/// Format of the timestamps in the published series. Fractional seconds are
/// accepted and kept.
const SOURCE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// The cumulative vote counts of one sample, before any truncation.
#[derive(PartialEq, Debug, Clone, Copy)]
struct RunningVotes {
    total: f64,
    biden: f64,
    trump: f64,
    other: f64,
}

impl RunningVotes {
    const EMPTY: RunningVotes = RunningVotes {
        total: 0.0,
        biden: 0.0,
        trump: 0.0,
        other: 0.0,
    };

    /// The difference is taken on the real values, and only then truncated.
    fn batch_since(&self, last: &RunningVotes) -> Batch {
        Batch {
            votes: (self.total - last.total) as i64,
            biden: (self.biden - last.biden) as i64,
            trump: (self.trump - last.trump) as i64,
            other: (self.other - last.other) as i64,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct Batch {
    votes: i64,
    biden: i64,
    trump: i64,
    other: i64,
}

/// Truncates a share to three decimals.
///
/// This is an integer truncation of `x * 1000`, not a decimal rounding. Going
/// through an integer also turns a small negative complement into `0`, not `-0`.
fn truncate_share(x: f64) -> f64 {
    ((x * SHARE_PRECISION) as i64) as f64 / SHARE_PRECISION
}

/// The largest decrease of a candidate count that can be explained by the
/// precision of the published shares.
fn max_variation(votes: f64) -> i64 {
    (votes * NOISE_FRACTION) as i64
}

fn display_offset(rules: &SeriesRules) -> Result<FixedOffset, SeriesError> {
    FixedOffset::east_opt(rules.display_offset_seconds).context(DisplayOffsetSnafu {
        seconds: rules.display_offset_seconds,
    })
}

fn parse_timestamp(
    index: usize,
    raw: &str,
    offset: &FixedOffset,
) -> Result<chrono::DateTime<FixedOffset>, SeriesError> {
    let naive = NaiveDateTime::parse_from_str(raw, SOURCE_TIME_FORMAT).context(
        TimestampParseSnafu {
            index,
            raw: raw.to_string(),
        },
    )?;
    Ok(Utc.from_utc_datetime(&naive).with_timezone(offset))
}

/// A decreasing total is always reported. The candidate batches are only
/// checked when the total is large enough for `max_variation` to be positive,
/// otherwise every empty batch would be flagged.
fn detect_anomalies(batch: &Batch, max_variation: i64, comparison: DropComparison) -> Vec<Anomaly> {
    let mut anomalies: Vec<Anomaly> = Vec::new();
    if batch.votes < 0 {
        anomalies.push(Anomaly {
            kind: AnomalyKind::Total,
            delta: batch.votes,
        });
    }
    if max_variation <= 0 {
        return anomalies;
    }
    let candidates = [
        (AnomalyKind::Biden, batch.biden),
        (AnomalyKind::Trump, batch.trump),
        (AnomalyKind::Other, batch.other),
    ];
    for (kind, delta) in candidates {
        if comparison.is_drop(delta, max_variation) {
            anomalies.push(Anomaly { kind, delta });
        }
    }
    anomalies
}

/// Processes one sample against the counts of the last retained sample.
///
/// Returns None if the sample is not retained.
fn process_sample(
    index: usize,
    sample: &Sample,
    last: &RunningVotes,
    rules: &SeriesRules,
    offset: &FixedOffset,
) -> Result<Option<(ReportRow, RunningVotes)>, SeriesError> {
    let no_votes = sample.votes == 0.0;
    if no_votes && rules.zero_vote_policy == ZeroVotePolicy::Skip {
        debug!("process_sample: {}: no votes, skipping", index);
        return Ok(None);
    }

    let max_variation = max_variation(sample.votes);
    let time = parse_timestamp(index, &sample.timestamp, offset)?;

    let share_trump = sample.vote_share_trump;
    let share_biden = sample.vote_share_biden;
    let share_other = if no_votes {
        0.0
    } else {
        truncate_share(1.0 - (share_trump + share_biden))
    };

    let current = RunningVotes {
        total: sample.votes,
        biden: sample.votes * share_biden,
        trump: sample.votes * share_trump,
        other: sample.votes * share_other,
    };
    let batch = current.batch_since(last);

    let anomalies = detect_anomalies(&batch, max_variation, rules.drop_comparison);
    let note = anomalies
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<String>>()
        .join(rules.note_separator.as_str());

    let row = ReportRow {
        time,
        eevp: sample.eevp,
        votes_total: current.total as i64,
        share_biden,
        share_trump,
        share_other,
        total_biden: current.biden as i64,
        total_trump: current.trump as i64,
        total_other: current.other as i64,
        batch_votes: batch.votes,
        batch_biden: batch.biden,
        batch_trump: batch.trump,
        batch_other: batch.other,
        anomalies,
        note,
    };
    debug!("process_sample: {}: {:?}", index, row);
    if row.is_anomaly() {
        warn!("Sample {} at {}: {}", index, row.formatted_time(), row.note);
    }
    Ok(Some((row, current)))
}

/// Annotates the time-series of one race.
///
/// Arguments:
/// * `samples` the published samples, in time order. The order is not checked.
/// * `rules` the policies to apply
///
/// Each retained sample is compared with the previous retained sample. If any
/// timestamp cannot be parsed, the whole series is rejected.
pub fn run_series_report(
    samples: &[Sample],
    rules: &SeriesRules,
) -> Result<SeriesReport, SeriesError> {
    info!(
        "Processing {:?} samples, rules: {:?}",
        samples.len(),
        rules
    );
    let offset = display_offset(rules)?;

    let (rows, _) = samples.iter().enumerate().try_fold(
        (Vec::with_capacity(samples.len()), RunningVotes::EMPTY),
        |(mut rows, last): (Vec<ReportRow>, RunningVotes),
         (index, sample)|
         -> Result<(Vec<ReportRow>, RunningVotes), SeriesError> {
            match process_sample(index, sample, &last, rules, &offset)? {
                Some((row, current)) => {
                    rows.push(row);
                    Ok((rows, current))
                }
                None => Ok((rows, last)),
            }
        },
    )?;

    let report = SeriesReport {
        dropped: samples.len() - rows.len(),
        rows,
    };
    info!(
        "Processed {:?} samples: {:?} rows, {:?} dropped, {:?} with anomalies",
        samples.len(),
        report.rows.len(),
        report.dropped,
        report.anomalous_rows()
    );
    Ok(report)
}

impl ReportRow {
    pub fn is_anomaly(&self) -> bool {
        !self.anomalies.is_empty()
    }

    /// The time as `YYYY-MM-DD HH:MM:SS`, without the zone.
    pub fn formatted_time(&self) -> String {
        self.time.format(DISPLAY_TIME_FORMAT).to_string()
    }

    /// The content of one cell of the report.
    pub fn field(&self, column: ReportColumn) -> String {
        match column {
            ReportColumn::Anomaly => self.is_anomaly().to_string(),
            ReportColumn::Time => self.formatted_time(),
            ReportColumn::Eevp => self.eevp.to_string(),
            ReportColumn::VotesTotal => self.votes_total.to_string(),
            ReportColumn::ShareBiden => self.share_biden.to_string(),
            ReportColumn::ShareTrump => self.share_trump.to_string(),
            ReportColumn::ShareOther => self.share_other.to_string(),
            ReportColumn::TotalBiden => self.total_biden.to_string(),
            ReportColumn::TotalTrump => self.total_trump.to_string(),
            ReportColumn::TotalOther => self.total_other.to_string(),
            ReportColumn::BatchVotes => self.batch_votes.to_string(),
            ReportColumn::BatchBiden => self.batch_biden.to_string(),
            ReportColumn::BatchTrump => self.batch_trump.to_string(),
            ReportColumn::BatchOther => self.batch_other.to_string(),
            ReportColumn::Note => self.note.clone(),
        }
    }

    pub fn fields(&self, schema: &ReportSchema) -> Vec<String> {
        schema.columns.iter().map(|c| self.field(*c)).collect()
    }
}
