//! Insights CLI - Command-line interface for Health Insights
//!
//! Commands:
//! - analyze: Run the full analysis or a single analysis over a history
//! - recommend: Build diet, exercise and sleep plans
//! - simulate: Project a what-if routine
//! - validate: Validate health entries (and optionally a profile)
//! - schema: Describe input and output formats

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use health_insights::analysis::Scenario;
use health_insights::schema::{EntryAdapter, Validate, SCHEMA_VERSION};
use health_insights::{
    AnalysisKind, InsightConfig, InsightError, InsightProcessor, RecommendationKind, PRODUCER_NAME,
    REPORT_VERSION, VERSION,
};

/// Insights - Deterministic scoring and analysis for personal health logs
#[derive(Parser)]
#[command(name = "insights")]
#[command(version = VERSION)]
#[command(about = "Analyze health logs into scored reports", long_about = None)]
struct Cli {
    /// Configuration file (JSON, partial documents allowed)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// User profile JSON file (use - for stdin)
    #[arg(short, long)]
    profile: PathBuf,

    /// Health entries file, JSON array or NDJSON (use - for stdin)
    #[arg(short, long)]
    entries: Option<PathBuf>,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run analyses over a health history
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Analysis to run
        #[arg(long, value_enum, default_value = "full")]
        kind: KindArg,

        /// Food log JSON array used to fill calorie counts
        #[arg(long)]
        foods: Option<PathBuf>,
    },

    /// Build personalized recommendations
    Recommend {
        /// Recommendation to build
        #[arg(value_enum, default_value = "all")]
        kind: RecommendArg,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Simulate a hypothetical daily routine
    Simulate {
        #[command(flatten)]
        input: InputArgs,

        /// Scenario JSON file; overrides the individual flags
        #[arg(long)]
        scenario: Option<PathBuf>,

        /// Nightly sleep in hours
        #[arg(long, default_value = "7")]
        sleep_hours: f64,

        /// Daily exercise in minutes
        #[arg(long, default_value = "0")]
        exercise_minutes: f64,

        /// Days to simulate
        #[arg(long, default_value = "14")]
        days: u32,
    },

    /// Validate health entries
    Validate {
        /// Health entries file, JSON array or NDJSON (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Also validate a profile file
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Full,
    Metrics,
    Recovery,
    Correlation,
    Habits,
    Risk,
    Progress,
}

impl From<KindArg> for AnalysisKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Full => AnalysisKind::Full,
            KindArg::Metrics => AnalysisKind::Metrics,
            KindArg::Recovery => AnalysisKind::Recovery,
            KindArg::Correlation => AnalysisKind::Correlation,
            KindArg::Habits => AnalysisKind::Habits,
            KindArg::Risk => AnalysisKind::Risk,
            KindArg::Progress => AnalysisKind::Progress,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RecommendArg {
    All,
    Diet,
    Exercise,
    Sleep,
}

impl From<RecommendArg> for RecommendationKind {
    fn from(kind: RecommendArg) -> Self {
        match kind {
            RecommendArg::All => RecommendationKind::All,
            RecommendArg::Diet => RecommendationKind::Diet,
            RecommendArg::Exercise => RecommendationKind::Exercise,
            RecommendArg::Sleep => RecommendationKind::Sleep,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (health.entry.v1 and profile)
    Input,
    /// Output report envelope
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error = serde_json::to_string(&CliError::from(e))
                .unwrap_or_else(|_| "Unknown error".to_string());
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("health_insights=debug,insights=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), InsightsCliError> {
    let processor = match &cli.config {
        Some(path) => {
            let config = InsightConfig::from_json(&read_input(path)?)?;
            info!(path = %path.display(), "loaded configuration");
            InsightProcessor::with_config(config)
        }
        None => InsightProcessor::new(),
    };

    match cli.command {
        Commands::Analyze { input, kind, foods } => {
            cmd_analyze(&processor, &input, kind.into(), foods.as_deref())
        }
        Commands::Recommend { kind, input } => cmd_recommend(&processor, &input, kind.into()),
        Commands::Simulate {
            input,
            scenario,
            sleep_hours,
            exercise_minutes,
            days,
        } => {
            let scenario = match scenario {
                Some(path) => serde_json::from_str(&read_input(&path)?)?,
                None => Scenario {
                    sleep_hours,
                    exercise_minutes,
                    days,
                },
            };
            cmd_simulate(&processor, &input, &scenario)
        }
        Commands::Validate { input, profile, json } => {
            cmd_validate(&input, profile.as_deref(), json)
        }
        Commands::Schema { schema_type, json_schema } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_analyze(
    processor: &InsightProcessor,
    input: &InputArgs,
    kind: AnalysisKind,
    foods: Option<&Path>,
) -> Result<(), InsightsCliError> {
    let (profile_json, entries_json) = read_inputs(input)?;
    let foods_json = foods.map(read_input).transpose()?;

    let report = processor.analyze_json(kind, &profile_json, &entries_json, foods_json.as_deref())?;
    write_output(input.output.as_deref(), &report)
}

fn cmd_recommend(
    processor: &InsightProcessor,
    input: &InputArgs,
    kind: RecommendationKind,
) -> Result<(), InsightsCliError> {
    let (profile_json, entries_json) = read_inputs(input)?;
    let report = processor.recommend_json(kind, &profile_json, &entries_json)?;
    write_output(input.output.as_deref(), &report)
}

fn cmd_simulate(
    processor: &InsightProcessor,
    input: &InputArgs,
    scenario: &Scenario,
) -> Result<(), InsightsCliError> {
    let (profile_json, entries_json) = read_inputs(input)?;
    let profile = EntryAdapter::parse_profile(&profile_json)?;
    let entries = EntryAdapter::prepare(EntryAdapter::parse_auto(&entries_json)?)?;

    let result = processor.simulate(&profile, &entries, scenario)?;
    let report = processor.encoder().encode_to_json("simulation", &entries, result)?;
    write_output(input.output.as_deref(), &report)
}

fn cmd_validate(input: &Path, profile: Option<&Path>, json: bool) -> Result<(), InsightsCliError> {
    let entries = EntryAdapter::parse_auto(&read_input(input)?)?;
    let results = EntryAdapter::validate_entries(&entries);

    let profile_error = match profile {
        Some(path) => {
            let profile: health_insights::UserProfile = serde_json::from_str(&read_input(path)?)?;
            profile.validate().err().map(|e| e.to_string())
        }
        None => None,
    };

    let report = ValidationReport {
        total_entries: entries.len(),
        valid_entries: entries.len() - results.len(),
        invalid_entries: results.len(),
        profile_error,
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                date: r.date.clone(),
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total entries:   {}", report.total_entries);
        println!("Valid entries:   {}", report.valid_entries);
        println!("Invalid entries: {}", report.invalid_entries);
        if let Some(err) = &report.profile_error {
            println!("Profile:         {}", err);
        }

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Entry {} (index {}): {}", err.date, err.index, err.error);
            }
        }
    }

    let failures = report.invalid_entries + usize::from(report.profile_error.is_some());
    if failures > 0 {
        Err(InsightsCliError::ValidationFailed(failures))
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), InsightsCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", SCHEMA_VERSION);
                println!();
                println!("Entries are a JSON array or NDJSON, one object per logged day:");
                println!("  - date: YYYY-MM-DD (required)");
                println!("  - weight: kilograms, 20-300 (required)");
                println!("  - sleep_hours: 0-24");
                println!("  - exercise_minutes, calories_consumed: non-negative");
                println!("  - water_intake_liters: 0-10");
                println!("  - notes: free text");
                println!();
                println!("Profile is a single object:");
                println!("  - age (1-120), gender (M/F/O), height_cm (50-250), weight_kg (20-300)");
                println!("  - activity_level: sedentary, light, moderate, active, very_active");
                println!("  - health_goal: weight_loss, muscle_gain, maintenance, general");
                println!("  - dietary_preference: none, vegetarian, vegan, keto, paleo");
                println!("  - allergies: list of strings");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output: insight report v{}", REPORT_VERSION);
                println!();
                println!("- report_version: Envelope version");
                println!("- kind: full, metrics, recovery, correlation, habits, risk, progress,");
                println!("        recommendations, diet, exercise, sleep, simulation");
                println!("- producer: {{ name, version, instance_id }}");
                println!("- provenance: {{ entries_analyzed, first_date, last_date, computed_at_utc }}");
                println!("- quality: {{ coverage, flags }}");
                println!("- body: The analysis result for the kind");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(path: &Path) -> Result<String, InsightsCliError> {
    if path.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            warn!("reading from interactive stdin, end input with Ctrl-D");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn read_inputs(input: &InputArgs) -> Result<(String, String), InsightsCliError> {
    let is_stdin = |p: &Path| p.to_string_lossy() == "-";
    if let Some(entries) = &input.entries {
        if is_stdin(&input.profile) && is_stdin(entries) {
            return Err(InsightsCliError::Usage(
                "profile and entries cannot both be read from stdin".to_string(),
            ));
        }
    }

    let profile_json = read_input(&input.profile)?;
    let entries_json = match &input.entries {
        Some(path) => read_input(path)?,
        None => "[]".to_string(),
    };
    Ok((profile_json, entries_json))
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), InsightsCliError> {
    match output {
        Some(path) if path.to_string_lossy() != "-" => {
            fs::write(path, content)?;
            info!(path = %path.display(), "report written");
        }
        _ => println!("{}", content),
    }
    Ok(())
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "health.entry.v1",
        "title": SCHEMA_VERSION,
        "description": "One day of logged health metrics",
        "type": "object",
        "required": ["date", "weight"],
        "properties": {
            "date": { "type": "string", "format": "date" },
            "weight": { "type": "number", "minimum": 20, "maximum": 300 },
            "sleep_hours": { "type": "number", "minimum": 0, "maximum": 24 },
            "exercise_minutes": { "type": "number", "minimum": 0 },
            "calories_consumed": { "type": "number", "minimum": 0 },
            "water_intake_liters": { "type": "number", "minimum": 0, "maximum": 10 },
            "notes": { "type": "string" }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "insight report",
        "description": "Versioned envelope around one analysis result",
        "type": "object",
        "required": ["report_version", "kind", "producer", "provenance", "quality", "body"],
        "properties": {
            "report_version": { "type": "string", "const": REPORT_VERSION },
            "kind": { "type": "string" },
            "producer": {
                "type": "object",
                "required": ["name", "version", "instance_id"],
                "properties": {
                    "name": { "type": "string", "const": PRODUCER_NAME },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string", "format": "uuid" }
                }
            },
            "provenance": {
                "type": "object",
                "properties": {
                    "entries_analyzed": { "type": "integer", "minimum": 0 },
                    "first_date": { "type": ["string", "null"], "format": "date" },
                    "last_date": { "type": ["string", "null"], "format": "date" },
                    "computed_at_utc": { "type": "string", "format": "date-time" }
                }
            },
            "quality": {
                "type": "object",
                "properties": {
                    "coverage": { "type": "number", "minimum": 0, "maximum": 1 },
                    "flags": { "type": "array", "items": { "type": "string" } }
                }
            },
            "body": { "type": "object" }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum InsightsCliError {
    Io(io::Error),
    Insight(InsightError),
    Json(serde_json::Error),
    Usage(String),
    ValidationFailed(usize),
}

impl From<io::Error> for InsightsCliError {
    fn from(e: io::Error) -> Self {
        InsightsCliError::Io(e)
    }
}

impl From<InsightError> for InsightsCliError {
    fn from(e: InsightError) -> Self {
        InsightsCliError::Insight(e)
    }
}

impl From<serde_json::Error> for InsightsCliError {
    fn from(e: serde_json::Error) -> Self {
        InsightsCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<InsightsCliError> for CliError {
    fn from(e: InsightsCliError) -> Self {
        match e {
            InsightsCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            InsightsCliError::Insight(e) => {
                let (code, hint) = match &e {
                    InsightError::InvalidProfile(_) => {
                        ("INVALID_PROFILE", "Run 'insights schema input' for profile fields")
                    }
                    InsightError::InvalidEntry(_) => {
                        ("INVALID_ENTRY", "Run 'insights validate' for details")
                    }
                    InsightError::InvalidScenario(_) => {
                        ("INVALID_SCENARIO", "Check sleep hours, exercise minutes and days")
                    }
                    InsightError::ConfigError(_) => {
                        ("CONFIG_ERROR", "Check the configuration file values")
                    }
                    InsightError::EncodingError(_) => ("ENCODING_ERROR", "Report this as a bug"),
                    InsightError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                    _ => ("PARSE_ERROR", "Ensure input matches health.entry.v1 schema"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            InsightsCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            InsightsCliError::Usage(msg) => CliError {
                code: "USAGE_ERROR".to_string(),
                message: msg,
                hint: Some("Pass at most one input as -".to_string()),
            },
            InsightsCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_entries: usize,
    valid_entries: usize,
    invalid_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_error: Option<String>,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    date: String,
    error: String,
}
