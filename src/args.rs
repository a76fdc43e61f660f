use clap::Parser;

/// This is a tabulation program for Uruguayan departmental elections.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the election results in the official JSON
    /// format. If not specified, the path is derived from the data directory and the year.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (default 2020) The election year to tabulate (2015, 2020 or 2025). The
    /// ELECTION_YEAR environment variable is used when this option is not specified.
    #[clap(short, long, value_parser)]
    pub year: Option<u32>,

    /// (directory path, default 'data') The root of the data directory, laid out as
    /// <data-dir>/election_data/<year>/results_<year>.json. The DATA_DIR environment
    /// variable is used when this option is not specified.
    #[clap(long, value_parser)]
    pub data_dir: Option<String>,

    /// (optional) If specified, the output is restricted to the department with this name.
    #[clap(long, value_parser)]
    pub department: Option<String>,

    /// (file path, optional) A department boundaries file in GeoJSON format. If specified,
    /// a copy of it enriched with each department's winner and vote share is written next
    /// to it with the suffix '.winners.json'.
    #[clap(long, value_parser)]
    pub geojson: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be
    /// written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the summary of an election in JSON format.
    /// If provided, escrutinio will check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
