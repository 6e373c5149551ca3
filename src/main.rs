//! Cardcat CLI application entry point
//!
//! Browse, search and download cards from a remote character card catalog.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session (default command)
//! cardcat
//! cardcat browse -t Female --no-nsfw
//!
//! # One-shot search, regex literals allowed
//! cardcat search /^twi/i -f name -s name -n 20
//!
//! # Download by exact path
//! cardcat download "Cards/Twilight.png"
//!
//! # Quiet mode (only output results)
//! cardcat -q search pinkie
//! ```
//!
//! # Configuration
//!
//! Settings are stored in the user's config directory
//! (`~/.config/cardcat/config.toml` on Linux) and created with defaults on
//! first run. Set `RUST_LOG` or pass `--verbose` for diagnostics on stderr.

use cardcat::{
    Result,
    cli::{Cli, Commands},
    commands::{self, AppContext},
};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut ctx = AppContext::load(cli.config.clone(), cli.quiet)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.get_command() {
        Commands::Browse { query } => runtime.block_on(commands::browse::execute(&mut ctx, &query)),
        Commands::Search { query } => runtime.block_on(commands::search::execute(&ctx, &query)),
        Commands::Tags { no_counts } => runtime.block_on(commands::tags::execute(&ctx, no_counts)),
        Commands::Show { path } => runtime.block_on(commands::show::execute(&ctx, &path)),
        Commands::Random => runtime.block_on(commands::random::execute(&ctx)),
        Commands::Download { paths, output } => {
            runtime.block_on(commands::download::execute(&ctx, &paths, output.as_deref()))
        }
        Commands::Tag { command } => commands::tag::execute(&mut ctx, &command),
        Commands::Cache { command } => commands::cache::execute(&ctx, &command),
        Commands::Config { command } => commands::config::execute(&mut ctx, &command),
    }
}

fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
