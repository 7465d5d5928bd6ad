// ********* Input data structures ***********

use std::fmt::Display;

use chrono::{DateTime, FixedOffset};
use snafu::prelude::*;

/// One entry of the time-series published for a race.
///
/// All the counts are cumulative: `votes` is the number of votes counted
/// so far, not the number of votes added since the previous entry.
#[derive(PartialEq, Debug, Clone)]
pub struct Sample {
    /// The time of the sample, as published (`YYYY-MM-DDTHH:MM:SSZ`, UTC).
    /// It is only parsed when the sample is processed.
    pub timestamp: String,
    pub votes: f64,
    pub vote_share_trump: f64,
    pub vote_share_biden: f64,
    /// Estimated percentage of the expected vote. Passed through untouched.
    pub eevp: i64,
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum AnomalyKind {
    Total,
    Biden,
    Trump,
    Other,
}

impl AnomalyKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyKind::Total => "Total",
            AnomalyKind::Biden => "Biden",
            AnomalyKind::Trump => "Trump",
            AnomalyKind::Other => "Other",
        }
    }
}

/// A batch that went in the wrong direction.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub delta: i64,
}

impl Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.delta)
    }
}

/// The annotated version of a retained sample.
#[derive(PartialEq, Debug, Clone)]
pub struct ReportRow {
    /// The sample time in the display timezone.
    pub time: DateTime<FixedOffset>,
    pub eevp: i64,
    pub votes_total: i64,
    pub share_biden: f64,
    pub share_trump: f64,
    pub share_other: f64,
    pub total_biden: i64,
    pub total_trump: i64,
    pub total_other: i64,
    pub batch_votes: i64,
    pub batch_biden: i64,
    pub batch_trump: i64,
    pub batch_other: i64,
    /// In the order Total, Biden, Trump, Other.
    pub anomalies: Vec<Anomaly>,
    /// The anomalies joined with the separator of the rules. Empty if there is none.
    pub note: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SeriesReport {
    pub rows: Vec<ReportRow>,
    /// Number of samples that did not produce a row.
    pub dropped: usize,
}

impl SeriesReport {
    pub fn anomalous_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_anomaly()).count()
    }
}

/// Errors that prevent a series from being processed.
///
/// A series that fails produces no row at all.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SeriesError {
    #[snafu(display("sample {index}: cannot parse timestamp {raw:?}"))]
    TimestampParse {
        index: usize,
        raw: String,
        source: chrono::ParseError,
    },
    #[snafu(display("invalid display offset: {seconds} seconds"))]
    DisplayOffset { seconds: i32 },
}

// ********* Configuration **********

/// Fraction of the total votes under which a decreasing batch is
/// considered to be reporting noise.
pub const NOISE_FRACTION: f64 = 0.001;

/// The shares are truncated to this many units (three decimal digits).
pub const SHARE_PRECISION: f64 = 1000.0;

/// EST, without any daylight saving time.
pub const EST_OFFSET_SECONDS: i32 = -5 * 3600;

/// What to do with a sample that reports zero votes.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ZeroVotePolicy {
    /// The sample is ignored, the accumulators are not updated.
    Skip,
    /// The sample is reported with a zero share for the other candidates.
    KeepZeroShare,
}

/// How a candidate batch is compared to the noise threshold.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DropComparison {
    /// Flags `batch <= -max_variation`
    Inclusive,
    /// Flags `batch < -max_variation`
    Strict,
}

impl DropComparison {
    pub fn is_drop(&self, batch: i64, max_variation: i64) -> bool {
        match self {
            DropComparison::Inclusive => batch <= -max_variation,
            DropComparison::Strict => batch < -max_variation,
        }
    }
}

pub const DEFAULT_DROP_COMPARISON: DropComparison = DropComparison::Inclusive;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NoteSeparator {
    Comma,
    Space,
}

impl NoteSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteSeparator::Comma => ", ",
            NoteSeparator::Space => " ",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SeriesRules {
    pub zero_vote_policy: ZeroVotePolicy,
    pub drop_comparison: DropComparison,
    pub note_separator: NoteSeparator,
    /// Offset from UTC of the times in the report.
    pub display_offset_seconds: i32,
}

impl SeriesRules {
    pub const DEFAULT_RULES: SeriesRules = SeriesRules {
        zero_vote_policy: ZeroVotePolicy::Skip,
        drop_comparison: DEFAULT_DROP_COMPARISON,
        note_separator: NoteSeparator::Comma,
        display_offset_seconds: EST_OFFSET_SECONDS,
    };
}

impl Default for SeriesRules {
    fn default() -> Self {
        SeriesRules::DEFAULT_RULES
    }
}

// ********* Report schema **********

/// All the columns that a report may contain.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ReportColumn {
    Anomaly,
    Time,
    Eevp,
    VotesTotal,
    ShareBiden,
    ShareTrump,
    ShareOther,
    TotalBiden,
    TotalTrump,
    TotalOther,
    BatchVotes,
    BatchBiden,
    BatchTrump,
    BatchOther,
    Note,
}

/// How the columns are named in a given version of the report.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum HeaderStyle {
    Batch,
    /// The first version named the batch columns `delta_*`.
    Delta,
}

impl ReportColumn {
    pub fn header(&self) -> &'static str {
        self.header_in(HeaderStyle::Batch)
    }

    pub fn header_in(&self, style: HeaderStyle) -> &'static str {
        match (self, style) {
            (ReportColumn::BatchVotes, HeaderStyle::Delta) => "delta_votes",
            (ReportColumn::BatchBiden, HeaderStyle::Delta) => "delta_biden",
            (ReportColumn::BatchTrump, HeaderStyle::Delta) => "delta_trump",
            (ReportColumn::BatchOther, HeaderStyle::Delta) => "delta_other",
            _ => self.batch_header(),
        }
    }

    fn batch_header(&self) -> &'static str {
        match self {
            ReportColumn::Anomaly => "anomaly",
            ReportColumn::Time => "time_est",
            ReportColumn::Eevp => "eevp",
            ReportColumn::VotesTotal => "votes_total",
            ReportColumn::ShareBiden => "share_biden",
            ReportColumn::ShareTrump => "share_trump",
            ReportColumn::ShareOther => "share_other",
            ReportColumn::TotalBiden => "total_biden",
            ReportColumn::TotalTrump => "total_trump",
            ReportColumn::TotalOther => "total_other",
            ReportColumn::BatchVotes => "batch_votes",
            ReportColumn::BatchBiden => "batch_biden",
            ReportColumn::BatchTrump => "batch_trump",
            ReportColumn::BatchOther => "batch_other",
            ReportColumn::Note => "note",
        }
    }
}

/// A named selection of columns, in output order.
///
/// The successive versions of the report only differ by the columns
/// they expose, the rows are always computed the same way.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ReportSchema {
    pub name: &'static str,
    pub header_style: HeaderStyle,
    pub columns: &'static [ReportColumn],
}

impl ReportSchema {
    pub const LATEST: ReportSchema = ReportSchema {
        name: "latest",
        header_style: HeaderStyle::Batch,
        columns: &[
            ReportColumn::Time,
            ReportColumn::Eevp,
            ReportColumn::VotesTotal,
            ReportColumn::ShareBiden,
            ReportColumn::ShareTrump,
            ReportColumn::ShareOther,
            ReportColumn::TotalBiden,
            ReportColumn::TotalTrump,
            ReportColumn::TotalOther,
            ReportColumn::BatchVotes,
            ReportColumn::BatchBiden,
            ReportColumn::BatchTrump,
            ReportColumn::BatchOther,
            ReportColumn::Note,
        ],
    };

    // The first version: explicit anomaly flag, no candidate totals, `delta_*` batch headers.
    pub const LEGACY: ReportSchema = ReportSchema {
        name: "legacy",
        header_style: HeaderStyle::Delta,
        columns: &[
            ReportColumn::Anomaly,
            ReportColumn::Time,
            ReportColumn::Eevp,
            ReportColumn::VotesTotal,
            ReportColumn::ShareBiden,
            ReportColumn::ShareTrump,
            ReportColumn::ShareOther,
            ReportColumn::BatchVotes,
            ReportColumn::BatchBiden,
            ReportColumn::BatchTrump,
            ReportColumn::BatchOther,
            ReportColumn::Note,
        ],
    };

    pub const ALL: [ReportSchema; 2] = [ReportSchema::LATEST, ReportSchema::LEGACY];

    pub fn by_name(name: &str) -> Option<ReportSchema> {
        ReportSchema::ALL.iter().find(|s| s.name == name).copied()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .map(|c| c.header_in(self.header_style))
            .collect()
    }
}
