use clap::Parser;

/// Builds annotated CSV reports from the vote counting time-series of each state.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the options of the run. The options passed on the
    /// command line take precedence over the content of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The JSON document of a single state. The report of this state is written
    /// to the location given by --out.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (directory) A directory containing one <state>.json document per state. All the states
    /// are processed and written to the directory given by --out.
    #[clap(long, value_parser)]
    pub input_dir: Option<String>,

    /// (file path, directory, 'stdout' or empty) Where to write the reports. With --input, a
    /// file path or 'stdout' (the default). With --input-dir, a directory (the current
    /// directory by default).
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference CSV report. If provided with --input, tsreport will check that
    /// the generated report matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (directory) If specified, the documents of the states are first downloaded into this
    /// directory.
    #[clap(long, value_parser)]
    pub download: Option<String>,

    /// (state name, repeatable) Restricts downloads and directory runs to these states, for
    /// example 'georgia' or 'new-hampshire'. All the states are used by default.
    #[clap(long, value_parser)]
    pub state: Option<Vec<String>>,

    /// (default latest) The columns of the report: 'latest' or 'legacy'.
    #[clap(long, value_parser)]
    pub schema: Option<String>,

    /// (default skip) What to do with the samples without votes: 'skip' or 'keep'.
    #[clap(long, value_parser)]
    pub zero_votes: Option<String>,

    /// If passed as an argument, a candidate batch equal to the noise threshold is not
    /// reported as an anomaly.
    #[clap(long, takes_value = false)]
    pub strict_drops: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
