#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "pliant", about = "Tolerant JSON decoding and coercion tools")]
struct Cli {
	/// Raise log verbosity (-v debug, -vv trace); `RUST_LOG` takes precedence.
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Walk to a field path and print the member coerced to a scalar type.
	Coerce(cmd::coerce::Args),
	/// List every leaf path of a document with its kind.
	Paths(cmd::paths::Args),
	/// Round-trip a document through the codec and print it.
	Format(cmd::format::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn run(command: Commands) -> pliant::codec::Result<()> {
	match command {
		Commands::Coerce(args) => cmd::coerce::run(args),
		Commands::Paths(args) => cmd::paths::run(args),
		Commands::Format(args) => cmd::format::run(args),
	}
}
