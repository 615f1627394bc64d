use clap::Parser;

/// Assigns auditionees to teams based on the ranked preferences of the teams.
///
/// With one size, runs a project team draft: every team gets SIZE members, all picked from
/// its preferences.
/// With two sizes, runs a training team draft: every team picks SIZE members from its
/// preferences, then gets random members among the remaining auditionees until it has
/// TEAM_SIZE members.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The Excel file with the roster in the first sheet and the
    /// preferences of one team in each of the following sheets.
    /// Overrides the input file specified with the --config option.
    #[clap(value_parser)]
    pub input: Option<String>,

    /// (positive integer, optional) The number of members picked by each team from its
    /// preferences.
    #[clap(value_parser = clap::value_parser!(u32).range(1..))]
    pub size: Option<u32>,

    /// (positive integer, optional) If specified, the final size of each training team.
    #[clap(value_parser = clap::value_parser!(u32).range(1..))]
    pub team_size: Option<u32>,

    /// (file path, optional) A JSON file with the description of the draft. For more
    /// information about the file format, read the documentation of the manual.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory path) The directory in which the result sheets are written, one CSV file
    /// per sheet. Defaults to 'output'.
    #[clap(long, value_parser)]
    pub output_dir: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the draft will be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the summary of a draft in JSON format. If
    /// provided, rdraft will check that the summary of this draft matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (integer, default 42) The seed of the random draws.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    /// (random or digest, default random) How the random draws are produced.
    #[clap(long, value_parser)]
    pub tiebreak: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
