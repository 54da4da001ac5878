use clap::Parser;

/// Reconciles an attendance log with a course roster and reports who reached
/// the required attendance.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file describing the course, the inputs and the rules.
    /// All the other options override the values of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The roster of enrolled participants (csv or xlsx), with a full name and an email column.
    #[clap(short, long, value_parser)]
    pub roster: Option<String>,

    /// (file path) The attendance log (csv or xlsx). Every row of the first column is one attended session.
    #[clap(short, long, value_parser)]
    pub attendance: Option<String>,

    /// (csv or xlsx) The type of the roster file. Inferred from the extension when not provided.
    #[clap(long, value_parser)]
    pub roster_type: Option<String>,

    /// (csv or xlsx) The type of the attendance file. Inferred from the extension when not provided.
    #[clap(long, value_parser)]
    pub attendance_type: Option<String>,

    /// (integer) The number of classes given in the course.
    #[clap(short, long, value_parser)]
    pub total_classes: Option<i64>,

    /// (number, default 75) The attendance percentage required to be approved.
    #[clap(short, long, value_parser)]
    pub minimum_percent: Option<f64>,

    /// (file path, 'stdout' or empty) Where the JSON summary is written. Defaults to the output directory of the
    /// configuration, or to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the results are also written to this location: as an Excel workbook
    /// when the path ends in .xlsx, as a CSV file otherwise.
    #[clap(short, long, value_parser)]
    pub export: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, rollcall checks that the computed summary
    /// matches the reference.
    #[clap(long, value_parser)]
    pub reference: Option<String>,

    /// (default 'Nome Completo') The label of the full name column in the roster.
    #[clap(long, value_parser)]
    pub name_column: Option<String>,

    /// (default 'Email') The label of the email column in the roster.
    #[clap(long, value_parser)]
    pub email_column: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (number between 0 and 1, default 0.4) The highest fuzzy score accepted as a match. 0 only accepts
    /// exact matches.
    #[clap(long, value_parser)]
    pub match_threshold: Option<f64>,

    /// (firstRanked or unassigned) What to do with an entry matching several roster rows with the same name.
    #[clap(long, value_parser)]
    pub duplicate_name_mode: Option<String>,

    /// If passed as an argument, runs of whitespace inside names are collapsed before matching.
    #[clap(long, takes_value = false)]
    pub collapse_whitespace: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
