use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = None,
    name = "antigen",
)]
pub struct Args {
    /// Path to the parameter overlay (yaml file).
    #[clap(long, short, default_value = "parameters.yml")]
    pub parameters: String,

    /// Path to log file.
    #[clap(long, default_value = "antigen.log")]
    pub log_file: String,

    /// Verbosity of the log file (repeat for more detail).
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Reject the whole overlay on the first error instead of falling back key by key.
    #[clap(long)]
    pub strict: bool,

    /// Write the resolved parameters to this path (yaml file).
    #[clap(long)]
    pub dump: Option<String>,
}
