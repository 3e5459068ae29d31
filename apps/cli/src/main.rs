mod input;
mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use analytic_geometry::ConstructionCatalog;
use clap::{Parser, Subcommand};
use configuration_generator::{ConfigurationGenerator, GeneratedConfiguration, GenerationSettings, GeneratorError};
use identity_store::IdentityStore;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::input::{InputError, ProblemFile};
use crate::output::{ConfigurationReport, construction_entries, run_data, statistics_text};

const CLI_VERSION: &str = "1.0";

const EXIT_OK: i32 = 0;
const EXIT_GENERATION: i32 = 1;
const EXIT_INPUT: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "geogen", version, about = "Generates geometric configurations up to symmetry")]
struct Cli {
    /// Print a JSON envelope instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a generation described by a problem file.
    Run {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Stop after this many configurations.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the available constructions.
    Constructions,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Run { .. } => "run",
            Command::Constructions => "constructions",
        }
    }
}

#[derive(Debug)]
struct CliError {
    code: i32,
    command: String,
    kind: String,
    message: String,
}

impl CliError {
    fn io(cmd: &str, path: &Path, err: std::io::Error) -> Self {
        Self {
            code: EXIT_INPUT,
            command: cmd.to_string(),
            kind: "IoError".to_string(),
            message: format!("{}: {err}", path.display()),
        }
    }

    fn parse(cmd: &str, path: &Path, err: serde_json::Error) -> Self {
        Self {
            code: EXIT_INPUT,
            command: cmd.to_string(),
            kind: "ParseError".to_string(),
            message: format!("{}: {err}", path.display()),
        }
    }

    fn input(cmd: &str, err: InputError) -> Self {
        Self {
            code: EXIT_INPUT,
            command: cmd.to_string(),
            kind: "InputError".to_string(),
            message: err.to_string(),
        }
    }

    fn generator(cmd: &str, err: GeneratorError) -> Self {
        let (code, kind) = match err {
            GeneratorError::InvalidSettings(_) | GeneratorError::InvalidInput(_) => (EXIT_INPUT, "InputError"),
            _ => (EXIT_GENERATION, "GenerationError"),
        };
        Self {
            code,
            command: cmd.to_string(),
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let name = cli.command.name();
    match dispatch(cli.json, cli.command) {
        Ok(Some(data)) => {
            print_success(name, data);
            std::process::exit(EXIT_OK);
        }
        Ok(None) => std::process::exit(EXIT_OK),
        Err(err) => print_error(cli.json, err),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Text output is printed as it is produced; JSON output is returned for the envelope.
fn dispatch(json_mode: bool, command: Command) -> Result<Option<Value>, CliError> {
    match command {
        Command::Run { input, settings, limit } => cmd_run(json_mode, &input, settings.as_deref(), limit),
        Command::Constructions => cmd_constructions(json_mode),
    }
}

fn read_json<T: DeserializeOwned>(cmd: &str, path: &Path) -> Result<T, CliError> {
    let raw = fs::read_to_string(path).map_err(|err| CliError::io(cmd, path, err))?;
    serde_json::from_str(&raw).map_err(|err| CliError::parse(cmd, path, err))
}

fn cmd_run(json_mode: bool, input: &Path, settings: Option<&Path>, limit: Option<usize>) -> Result<Option<Value>, CliError> {
    const CMD: &str = "run";
    let problem: ProblemFile = read_json(CMD, input)?;
    let settings: GenerationSettings = match settings {
        Some(path) => read_json(CMD, path)?,
        None => GenerationSettings::default(),
    };

    let store = Arc::new(IdentityStore::new());
    let generator_input = problem
        .into_input(Arc::clone(&store))
        .map_err(|err| CliError::input(CMD, err))?;
    let generator = ConfigurationGenerator::new(store, Arc::new(ConstructionCatalog::with_predefined()), settings);
    let mut run = generator
        .generate(generator_input)
        .map_err(|err| CliError::generator(CMD, err))?;

    let (reports, truncated) = take_reports(&mut run, limit.unwrap_or(usize::MAX), |report| {
        if !json_mode {
            println!("{}", report.line());
        }
    })?;

    let statistics = run.statistics();
    info!(emitted = reports.len(), truncated, "generation finished");
    if json_mode {
        return Ok(Some(run_data(&reports, &statistics, truncated)));
    }
    println!("{}", statistics_text(&statistics));
    Ok(None)
}

/// Pulls at most `limit` configurations. The limit is checked before each pull,
/// so nothing past it is generated; `true` means the limit stopped the run.
fn take_reports<I>(
    run: &mut I,
    limit: usize,
    mut emit: impl FnMut(&ConfigurationReport),
) -> Result<(Vec<ConfigurationReport>, bool), CliError>
where
    I: Iterator<Item = Result<GeneratedConfiguration, GeneratorError>>,
{
    const CMD: &str = "run";
    let mut reports = Vec::new();
    loop {
        if reports.len() == limit {
            return Ok((reports, true));
        }
        let Some(generated) = run.next() else {
            return Ok((reports, false));
        };
        let generated = generated.map_err(|err| CliError::generator(CMD, err))?;
        let report = ConfigurationReport::from_generated(&generated)
            .map_err(|err| CliError::generator(CMD, err.into()))?;
        emit(&report);
        reports.push(report);
    }
}

fn cmd_constructions(json_mode: bool) -> Result<Option<Value>, CliError> {
    let entries = construction_entries();
    if json_mode {
        return Ok(Some(json!({ "constructions": entries })));
    }
    for entry in &entries {
        let composed = if entry.composed { " (composed)" } else { "" };
        println!("{} {} -> {}{composed}", entry.name, entry.signature, entry.outputs.join(","));
    }
    Ok(None)
}

fn print_success(command: &str, data: Value) {
    let response = json!({
        "status": "ok",
        "version": CLI_VERSION,
        "command": command,
        "data": data,
        "error": null
    });
    println!("{}", serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string()));
}

fn print_error(json_mode: bool, err: CliError) -> ! {
    if json_mode {
        let response = json!({
            "status": "error",
            "version": CLI_VERSION,
            "command": err.command,
            "data": null,
            "error": {
                "code": err.code,
                "type": err.kind,
                "message": err.message
            }
        });
        eprintln!("{}", serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string()));
    } else {
        eprintln!("Error: {}", err.message);
    }
    std::process::exit(err.code);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use analytic_geometry::ConstructionCatalog;
    use clap::Parser;
    use configuration_generator::{
        ConfigurationGenerator, GeneratedConfiguration, GenerationSettings, GeneratorError, GeneratorInput,
        InitialConfigurationBuilder,
    };
    use core_types::{ConfigurationId, Construction, LooseObjectLayout, PredefinedConstructionType};
    use identity_store::IdentityStore;

    use super::{Cli, CliError, Command, EXIT_GENERATION, EXIT_INPUT, take_reports};

    fn midpoint_run() -> impl Iterator<Item = Result<GeneratedConfiguration, GeneratorError>> {
        let store = Arc::new(IdentityStore::new());
        let triangle = InitialConfigurationBuilder::new(Arc::clone(&store), LooseObjectLayout::Triangle)
            .build(ConfigurationId::from_u64(0))
            .expect("triangle");
        let input = GeneratorInput::new(
            Arc::new(triangle),
            vec![Construction::predefined(PredefinedConstructionType::Midpoint)],
            1,
        );
        let settings = GenerationSettings {
            isomorph_rejection: false,
            parallel: false,
            ..GenerationSettings::default()
        };
        ConfigurationGenerator::new(store, Arc::new(ConstructionCatalog::with_predefined()), settings)
            .generate(input)
            .expect("run")
    }

    #[test]
    fn json_flag_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from(["geogen", "run", "--input", "p.json", "--limit", "3", "--json"]).expect("cli");
        assert!(cli.json);
        match cli.command {
            Command::Run { input, settings, limit } => {
                assert_eq!(input.to_str(), Some("p.json"));
                assert!(settings.is_none());
                assert_eq!(limit, Some(3));
            }
            Command::Constructions => panic!("unexpected command"),
        }
    }

    #[test]
    fn generator_errors_map_to_exit_codes() {
        let invalid = CliError::generator("run", GeneratorError::InvalidSettings("tolerance".to_string()));
        assert_eq!(invalid.code, EXIT_INPUT);
        let failed = CliError::generator(
            "run",
            GeneratorError::Oracle(consistency_oracle::OracleError::InitialConfiguration("x".to_string())),
        );
        assert_eq!(failed.code, EXIT_GENERATION);
        assert_eq!(failed.kind, "GenerationError");
    }

    #[test]
    fn limit_stops_before_pulling_another_configuration() {
        let mut pulled = 0;
        let mut run = midpoint_run().inspect(|_| pulled += 1);
        let (reports, truncated) = take_reports(&mut run, 2, |_| {}).expect("reports");
        drop(run);
        assert_eq!(reports.len(), 2);
        assert!(truncated);
        assert_eq!(pulled, 2);

        let (reports, truncated) = take_reports(&mut midpoint_run(), 3, |_| {}).expect("reports");
        assert_eq!(reports.len(), 3);
        assert!(truncated);
        let (reports, truncated) = take_reports(&mut midpoint_run(), 10, |_| {}).expect("reports");
        assert_eq!(reports.len(), 3);
        assert!(!truncated);
    }

    #[test]
    fn errors_within_the_limit_are_reported() {
        let mut run = std::iter::once(Err(GeneratorError::InvalidInput("broken".to_string())));
        let err = take_reports(&mut run, 1, |_| {}).expect_err("error surfaces");
        assert_eq!(err.code, EXIT_INPUT);
        assert!(err.message.contains("broken"));
    }
}
