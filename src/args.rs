use clap::Parser;

/// This is a ranked voting program: it ranks all the candidates of an instant-runoff election.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the election and its input files.
    /// See the manual of the irv_ranking crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the expected ranking. If provided, irvrank
    /// will check that the tabulated ranking matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of the election will be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The file containing the ballots, one ballot per row. Setting this option
    /// overrides the sources that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. By default, it is guessed from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default 1) The column of the first choice in each row.
    #[clap(long, value_parser)]
    pub first_vote_column: Option<usize>,

    /// (default 1) The first row containing a ballot. For CSV
    /// files, blank lines are skipped and do not count as rows.
    #[clap(long, value_parser)]
    pub first_vote_row: Option<usize>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
