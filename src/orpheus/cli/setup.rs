use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "orpheus", bin_name = "orpheus", version)]
#[command(
    about = "Modular music archival: resolve links, searches and ids into download jobs",
    long_about = None,
    after_help = "Any other first argument is taken as a link (or a file of links):\n  orpheus https://www.deezer.com/album/12345 [MORE_LINKS...]\n  orpheus links.txt"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Download output path (defaults to general.download_path)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub output: Option<String>,

    /// Module to take lyrics from
    #[arg(
        short = 'l',
        long,
        global = true,
        default_value = "default",
        help_heading = "Overrides"
    )]
    pub lyrics: String,

    /// Module to take covers from
    #[arg(
        short = 'c',
        long,
        global = true,
        default_value = "default",
        help_heading = "Overrides"
    )]
    pub covers: String,

    /// Module to take credits from
    #[arg(
        short = 'r',
        long,
        global = true,
        default_value = "default",
        help_heading = "Overrides"
    )]
    pub credits: String,

    /// Module that downloads playlists in place of the main module
    #[arg(
        short = 's',
        long = "separate-download",
        visible_alias = "separatedownload",
        global = true,
        default_value = "default",
        help_heading = "Overrides"
    )]
    pub separate_download: String,

    /// Always use the line prompt, even when fzf is available
    #[arg(long, global = true, help_heading = "Options")]
    pub no_picker: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a module and choose one result
    Search(SearchArgs),

    /// Search a module and take the first result
    Luckysearch(SearchArgs),

    /// Download media of one type by id
    Download {
        /// Module name
        module: String,

        /// track, album, playlist or artist
        media_type: String,

        /// Media ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Show or refresh the configuration
    Config {
        #[arg(value_enum)]
        action: Option<ConfigAction>,
    },

    #[command(external_subcommand)]
    Links(Vec<String>),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Module name
    pub module: String,

    /// track, album, playlist or artist
    pub media_type: String,

    /// Search query
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl SearchArgs {
    pub fn query(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigAction {
    /// Print the config file location and contents
    Show,
    /// Rewrite the config file with every setting filled in
    Refresh,
}

pub fn print_help() {
    let mut cmd = Cli::command();
    print!("{}", cmd.render_help());
}
