use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use srcpatch_cli::config::{DEFAULT_PLAN_FILE, LoadedConfig, parse_plan_file};
use srcpatch_cli::pipeline::TransformationPipeline;
use srcpatch_cli::rules::{Cardinality, Matcher};
use srcpatch_cli::runner::PatchRunner;
use srcpatch_cli::telemetry;
use srcpatch_cli::template::generate_init_template;

#[derive(Parser)]
#[command(name = "srcpatch")]
#[command(
	author,
	version,
	about = "CLI tool for applying ordered, reproducible text patches to a source file"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Patch plan to run
	#[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_PLAN_FILE)]
	plan: PathBuf,

	/// Run every rule and report, but do not write the target
	#[arg(long)]
	dry_run: bool,

	/// Increase log output (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,

	/// Create a template .srcpatch.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .srcpatch.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Patch plan inspection commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the plan's target and rules
	Show,
	/// Check the plan for errors without touching the target
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	telemetry::initialise(cli.verbose).context("Failed to initialise logging")?;

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	// Handle subcommands
	if let Some(command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(&cli.plan),
				ConfigAction::Validate => handle_config_validate(&cli.plan),
			},
		};
	}

	handle_patch(&cli.plan, cli.dry_run)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let plan_path = PathBuf::from(DEFAULT_PLAN_FILE);

	if plan_path.exists() && !force {
		anyhow::bail!("{DEFAULT_PLAN_FILE} already exists. Use --force to overwrite.");
	}

	let template = generate_init_template();
	std::fs::write(&plan_path, template)
		.with_context(|| format!("Failed to write {}", plan_path.display()))?;

	println!("Created {DEFAULT_PLAN_FILE}");
	Ok(ExitCode::SUCCESS)
}

fn load_plan(plan_path: &Path) -> Result<(LoadedConfig, TransformationPipeline)> {
	let loaded = parse_plan_file(plan_path).context("Failed to load patch plan")?;
	let pipeline =
		TransformationPipeline::from_config(&loaded.config).context("Failed to compile rules")?;
	Ok((loaded, pipeline))
}

fn handle_patch(plan_path: &Path, dry_run: bool) -> Result<ExitCode> {
	let (loaded, pipeline) = load_plan(plan_path)?;
	let target = loaded.target_path();

	let report = PatchRunner::new()
		.dry_run(dry_run)
		.run(&target, &pipeline)
		.with_context(|| format!("Failed to patch {}", target.display()))?;

	println!("{report}");
	for step in &report.steps {
		println!("  {step}");
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(plan_path: &Path) -> Result<ExitCode> {
	let (loaded, pipeline) = load_plan(plan_path)?;

	println!("# Source: {}", loaded.path.display());
	println!("# target: {}", loaded.target_path().display());
	println!("# rules: {}", pipeline.len());
	println!();

	for (i, (spec, rule)) in loaded.config.rules.iter().zip(pipeline.rules()).enumerate() {
		match rule.label() {
			Some(label) => println!("  Rule {i} ({label}):"),
			None => println!("  Rule {i}:"),
		}
		if let Some(ref expression) = spec.substitute {
			println!("    substitute: {expression}");
		}
		let kind = match rule.matcher() {
			Matcher::Literal(_) => "literal",
			Matcher::Regex(_) => "regex",
		};
		println!("    {kind}: {}", preview(rule.matcher().as_str()));
		println!("    replacement: {}", preview(rule.replacement()));
		println!("    all: {}", rule.cardinality() == Cardinality::All);
		println!("    required: {}", rule.is_required());
		if let Some(guard) = rule.guard() {
			println!("    unless_contains: {}", preview(guard));
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(plan_path: &Path) -> Result<ExitCode> {
	match load_plan(plan_path) {
		Ok((loaded, pipeline)) => {
			println!(
				"Patch plan is valid: {} ({} rules, target {})",
				loaded.path.display(),
				pipeline.len(),
				loaded.target_path().display()
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Plan error: {e:#}");
			Ok(ExitCode::FAILURE)
		}
	}
}

/// First line of a multi-line value, with a line count when truncated.
fn preview(text: &str) -> String {
	let mut lines = text.lines();
	let first = lines.next().unwrap_or_default();
	let rest = lines.count();
	if rest == 0 {
		first.to_string()
	} else {
		format!("{first} ... (+{rest} lines)")
	}
}
