//! VoltGuard CLI - electrical-installation compliance checks from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use voltguard::{
    parse_request, Engine, Finding, RoomType, RuleCatalog, RuleCheck, Severity, ValidationResponse,
    Verdict,
};

#[derive(Parser)]
#[command(name = "voltguard")]
#[command(about = "Electrical-installation compliance and dimensioning tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a validation request file
    Evaluate {
        /// Path to a JSON request file
        #[arg(value_name = "FILE")]
        request: PathBuf,

        /// Use a custom rule catalog instead of the builtin one
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with code 1 when the verdict is FAIL
        #[arg(long)]
        fail_on_findings: bool,
    },

    /// List catalog rules
    Rules {
        /// Use a custom rule catalog instead of the builtin one
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,

        /// Only rules applying to this room type
        #[arg(long, value_name = "TYPE")]
        room_type: Option<String>,

        /// Show rule parameters
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Evaluate {
            request,
            catalog,
            format,
            fail_on_findings,
        } => handle_evaluate(&request, catalog.as_deref(), format, fail_on_findings).await,
        Commands::Rules {
            catalog,
            room_type,
            verbose,
        } => handle_rules(catalog.as_deref(), room_type.as_deref(), verbose),
    };

    process::exit(exit_code);
}

fn load_catalog(path: Option<&std::path::Path>) -> Result<RuleCatalog, String> {
    match path {
        Some(path) => RuleCatalog::from_json_file(path).map_err(|e| e.to_string()),
        None => Ok(voltguard::catalog::builtin::catalog()),
    }
}

async fn handle_evaluate(
    request_path: &std::path::Path,
    catalog_path: Option<&std::path::Path>,
    format: OutputFormat,
    fail_on_findings: bool,
) -> i32 {
    let catalog = match load_catalog(catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    let json = match std::fs::read_to_string(request_path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: failed to read {}: {}", request_path.display(), e);
            return 2;
        }
    };
    let request = match parse_request(&json) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    let engine = Engine::with_catalog(catalog);
    match engine.evaluate(&request).await {
        Ok(response) => {
            output_response(&response, &format);
            if fail_on_findings && response.verdict == Verdict::Fail {
                return 1;
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    }
}

fn output_response(response: &ValidationResponse, format: &OutputFormat) {
    match format {
        OutputFormat::Human => output_human(response),
        OutputFormat::Json => output_json(response),
    }
}

fn output_human(response: &ValidationResponse) {
    println!(
        "Verdict: {}",
        match response.verdict {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    );
    println!("{}", "─".repeat(60));

    if response.findings.is_empty() {
        println!("  No findings");
    }

    let errors: Vec<&Finding> = response
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .collect();
    let warnings: Vec<&Finding> = response
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .collect();

    if !errors.is_empty() {
        println!("\n  ERRORS:");
        for finding in errors {
            print_finding(finding);
        }
    }
    if !warnings.is_empty() {
        println!("\n  WARNINGS:");
        for finding in warnings {
            print_finding(finding);
        }
    }

    if !response.data_issues.is_empty() {
        println!("\n  DATA ISSUES:");
        for issue in &response.data_issues {
            println!("    - {}", issue.detail);
            if let Some(ref room) = issue.room_id {
                println!("      Room: {}", room);
            }
        }
    }

    if let Some(ref dim) = response.dimensioning {
        println!("\n  Dimensioning:");
        println!("    Connected load: {} W", dim.total_connected_watts);
        println!("    Demand load:    {} W", dim.demand_watts);
        println!("    Main breaker:   {} A", dim.main_breaker_amps);
        println!("    Panel:          {} ways", dim.panel_ways);
        for room in &dim.per_room {
            println!(
                "    {}: {} circuits ({} dedicated, {} shared), {} W",
                room.room_id,
                room.required_circuits,
                room.dedicated_circuits,
                room.shared_circuits,
                room.connected_watts
            );
        }
    }

    println!("\n  Summary:");
    println!("    Errors:   {}", response.error_count());
    println!("    Warnings: {}", response.warning_count());
    println!("    Catalog:  {}", response.catalog_version);
}

fn print_finding(finding: &Finding) {
    println!("    - [{}] {}", finding.rule_id, finding.message_key);
    if let Some(ref room) = finding.room_id {
        println!("      Room: {}", room);
    }
}

fn output_json(response: &ValidationResponse) {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize response: {}", e),
    }
}

fn handle_rules(
    catalog_path: Option<&std::path::Path>,
    room_type: Option<&str>,
    verbose: bool,
) -> i32 {
    let catalog = match load_catalog(catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    let filter: Option<RoomType> = match room_type {
        Some(name) => match RoomType::all().iter().find(|t| t.name() == name) {
            Some(t) => Some(*t),
            None => {
                eprintln!("Error: unknown room type: {}", name);
                return 2;
            }
        },
        None => None,
    };

    println!("Catalog {} — rules:\n", catalog.version);
    for rule in &catalog.rules {
        if let Some(room_type) = filter {
            let applies =
                rule.room_types.is_empty() || rule.room_types.contains(&room_type);
            if !applies || matches!(rule.check, RuleCheck::GlobalPanelLimit { .. }) {
                continue;
            }
        }
        println!("  {}", rule.id);
        println!("    severity: {:?}", rule.severity);
        if let Some(ref jurisdiction) = rule.jurisdiction {
            println!("    jurisdiction: {}", jurisdiction);
        }
        if verbose {
            println!("    check: {:?}", rule.check);
        }
        println!();
    }
    0
}
