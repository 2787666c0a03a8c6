mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[clap(alias = "server")]
	/// Serve the probe endpoints via http
	Serve(tools::serve::Subcommand),

	/// Print the attributes of a local raster file as JSON
	Probe(tools::probe::Subcommand),

	/// Render a PNG thumbnail of a local image
	Thumbnail(tools::thumbnail::Subcommand),

	/// Show detailed help
	Help(tools::help::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Serve(arguments) => tools::serve::run(arguments),
		Commands::Probe(arguments) => tools::probe::run(arguments),
		Commands::Thumbnail(arguments) => tools::thumbnail::run(arguments),
		Commands::Help(arguments) => tools::help::run(arguments),
	}
}
