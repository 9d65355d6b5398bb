use std::{
	io::{self, BufRead as _, IsTerminal as _, Write as _},
	path::PathBuf,
	process::ExitCode,
};

use ariadne::{Color, Config as ReportConfig, IndexType, Label, Report, ReportKind, Source};
use clap::Parser;
use rollbot::{
	dice::roller::FastRand as FastRandRoller,
	roll::{self, Dispatcher},
	settings::Settings,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter, Layer as _};

/// Rolls dice expressions like "3d8 cold + 1d6 bludgeoning - 1" and "max(2d20) + 7"
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// Expression to roll once. Read from stdin if omitted.
	#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
	expression: Vec<String>,

	/// Treat each line of stdin as a chat message and print the replies
	#[arg(short, long, conflicts_with = "expression")]
	listen: bool,

	/// Config file to load instead of rollbot.{ini,toml} in the working directory
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Seed for the dice roller, for repeatable rolls
	#[arg(short, long)]
	seed: Option<u64>,

	/// Log more (-v, -vv, -vvv)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	setup_logging(cli.verbose);

	let roller = cli.seed.map_or_else(FastRandRoller::default, FastRandRoller::with_seed);
	let result = if cli.listen {
		listen(cli.config, roller)
	} else {
		roll_once(cli.expression, roller)
	};

	match result {
		Ok(code) => code,
		Err(err) => {
			eprintln!("Error: {err}");
			ExitCode::FAILURE
		}
	}
}

/// Installs a stderr logger. `RUST_LOG` takes precedence over the verbosity flag.
fn setup_logging(verbosity: u8) {
	let level = match verbosity {
		0 => LevelFilter::WARN,
		1 => LevelFilter::INFO,
		2 => LevelFilter::DEBUG,
		_ => LevelFilter::TRACE,
	};
	let filter = EnvFilter::builder()
		.with_default_directive(level.into())
		.from_env_lossy();

	let layer = fmt::layer()
		.with_writer(io::stderr)
		.with_target(true)
		.with_filter(filter);
	tracing_subscriber::registry().with(layer).init();
}

/// Rolls a single expression from the arguments or stdin and prints the outcome.
fn roll_once(args: Vec<String>, mut roller: FastRandRoller) -> Result<ExitCode, Box<dyn std::error::Error>> {
	let input = if args.is_empty() {
		let stdin = io::stdin();

		// If stdin is interactive, display a prompt for the expression
		if stdin.is_terminal() {
			print!("Enter dice expression: ");
			io::stdout().flush()?;
		}

		let mut line = String::new();
		stdin.lock().read_line(&mut line)?;
		line
	} else {
		// Combine all args so that the expression can be left unquoted even with spaces
		args.join(" ")
	};

	match roll::roll(&input, &mut roller) {
		Ok(roll) => {
			println!("Expression: {}", roll.expression);
			println!("Result: {}", roll.result);
			println!("Total: {}", roll.total);
			Ok(ExitCode::SUCCESS)
		}
		Err(roll::Error::Parse(err)) => {
			match err.span() {
				Some(span) => {
					Report::build(ReportKind::Error, ("input", span.clone()))
						.with_config(ReportConfig::default().with_index_type(IndexType::Byte))
						.with_message(&err)
						.with_label(
							Label::new(("input", span))
								.with_message("in this part of the expression")
								.with_color(Color::Red),
						)
						.finish()
						.eprint(("input", Source::from(input.as_str())))?;
				}
				None => eprintln!("Parse error: {err}"),
			}
			Ok(ExitCode::FAILURE)
		}
		Err(err) => {
			eprintln!("Roll error: {err}");
			Ok(ExitCode::FAILURE)
		}
	}
}

/// Passes each line of stdin to a dispatcher as if it were a chat message, printing any replies.
fn listen(config: Option<PathBuf>, roller: FastRandRoller) -> Result<ExitCode, Box<dyn std::error::Error>> {
	let settings = Settings::load(config.as_deref())?;
	if settings.token.is_empty() {
		tracing::warn!("no token configured; replies are only printed locally");
	}

	let mut dispatcher = Dispatcher::new(settings.prefix, roller);
	tracing::info!(prefix = dispatcher.prefix(), "listening for messages on stdin");

	let mut stdout = io::stdout().lock();
	for line in io::stdin().lock().lines() {
		if let Some(reply) = dispatcher.handle(&line?) {
			writeln!(stdout, "{reply}")?;
			stdout.flush()?;
		}
	}

	Ok(ExitCode::SUCCESS)
}
