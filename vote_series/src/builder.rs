pub use crate::config::*;

/// A builder for adding samples to a series.
///
/// ```
/// pub use vote_series::builder::SeriesBuilder;
/// pub use vote_series::SeriesRules;
/// # use vote_series::SeriesError;
///
/// let mut builder = SeriesBuilder::new();
/// builder
///     .add_sample("2020-11-03T05:00:00Z", 1000.0, 0.5, 0.45, 10)
///     .add_sample("2020-11-03T05:10:00Z", 900.0, 0.5, 0.45, 10);
///
/// let report = builder.run(&SeriesRules::DEFAULT_RULES)?;
/// assert_eq!(report.rows[1].note, "Total -100");
///
/// # Ok::<(), SeriesError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeriesBuilder {
    pub(crate) _samples: Vec<Sample>,
}

impl SeriesBuilder {
    pub fn new() -> SeriesBuilder {
        SeriesBuilder {
            _samples: Vec::new(),
        }
    }

    /// Adds a sample at the end of the series.
    ///
    /// Nothing is validated here: malformed timestamps are only reported when the
    /// series is processed, and odd counts are what the report is meant to show.
    pub fn add_sample(
        &mut self,
        timestamp: &str,
        votes: f64,
        vote_share_trump: f64,
        vote_share_biden: f64,
        eevp: i64,
    ) -> &mut SeriesBuilder {
        self.add_sample_2(&Sample {
            timestamp: timestamp.to_string(),
            votes,
            vote_share_trump,
            vote_share_biden,
            eevp,
        })
    }

    pub fn add_sample_2(&mut self, sample: &Sample) -> &mut SeriesBuilder {
        self._samples.push(sample.clone());
        self
    }

    pub fn samples(&self) -> &[Sample] {
        &self._samples
    }

    pub fn build(self) -> Vec<Sample> {
        self._samples
    }

    pub fn run(&self, rules: &SeriesRules) -> Result<SeriesReport, SeriesError> {
        crate::run_series_report(&self._samples, rules)
    }
}
