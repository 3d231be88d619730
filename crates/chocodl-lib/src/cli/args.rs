use clap::{ArgAction, Parser};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct Command {
    pub input_file: String,
    pub do_not_download: bool,
    pub output_dir: Option<String>,
    pub config_path: Option<String>,
    pub read_timeout_secs: Option<u64>,
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "chocodl",
    version,
    about = "Resolve Chocolatey packages and download their installers, verifying SHA512 checksums"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count
    )]
    verbose: u8,

    #[arg(
        short = 'i',
        long = "input-file",
        value_name = "FILE",
        help = "Package list: one identifier per line, optionally followed by ' | <output dir>'"
    )]
    input_file: String,

    #[arg(
        short = 's',
        long = "do-not-download",
        help = "Do not download anything, simply print download URLs"
    )]
    do_not_download: bool,

    #[arg(
        short = 'd',
        long = "output-dir",
        value_name = "DIR",
        help = "Output directory for packages without their own (default: ./chocodl/)"
    )]
    output_dir: Option<String>,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Optional config file (catalog URL, timeouts, output directory)"
    )]
    config: Option<String>,

    #[arg(
        long = "read-timeout",
        value_name = "SECS",
        help = "Seconds to wait for download data before giving up on a package [default: 20]"
    )]
    read_timeout: Option<u64>,
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    for noisy in ["hyper_util=info", "reqwest=info"] {
        if let Ok(directive) = noisy.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    // stdout is reserved for the URL listing.
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let command = Command {
        input_file: cli.input_file,
        do_not_download: cli.do_not_download,
        output_dir: cli.output_dir,
        config_path: cli.config,
        read_timeout_secs: cli.read_timeout,
    };

    Args { command, log_level }
}
