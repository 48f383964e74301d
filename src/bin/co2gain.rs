use clap::{ArgAction, Parser, Subcommand};
use co2gain::config::SimulatorConfig;
use co2gain::emissions::CalculationInput;
use co2gain::reference::source::{check_table, parse_table, ReferenceData};
use co2gain::report::{EstimateReport, ReportFormat};
use co2gain::session::{Availability, Session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "co2gain")]
#[command(about = "CO₂ gains of building heating retrofits", long_about = None)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference table file, overrides the configuration
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// Emission factors file, overrides the configuration
    #[arg(long, global = true)]
    factors: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimates the CO₂ gain of a retrofit
    Estimate {
        /// Building category (e.g. "Maison individuelle")
        #[arg(long)]
        category: String,

        /// Heating solution before retrofit
        #[arg(long)]
        before: String,

        /// Heating solution after retrofit
        #[arg(long)]
        after: String,

        /// Annual gas consumption before retrofit (kWh PCI/year)
        #[arg(long, default_value_t = 20000.0)]
        consumption: f64,

        /// Green gas share of the contract (%)
        #[arg(long, default_value_t = 0.0)]
        green_gas: f64,

        /// Run the after-solution as a hybrid with this electric share (%)
        #[arg(long)]
        hybrid_electric: Option<f64>,

        /// Manual energy gain ratio (e.g. -0.3); 0 uses the table
        #[arg(long, allow_hyphen_values = true)]
        gain_override: Option<f64>,

        /// Output format
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Output file path, written in the requested format
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },

    /// Lists categories, before-solutions or after-solutions
    Options {
        #[arg(long)]
        category: Option<String>,

        #[arg(long, requires = "category")]
        before: Option<String>,
    },

    /// Validates a reference table file
    CheckTable {
        path: PathBuf,
    },

    /// Prints the built-in reference table and emission factors as JSON
    Defaults,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_session(cli: &Cli) -> anyhow::Result<(Session, SimulatorConfig)> {
    let config = match &cli.config {
        Some(path) => SimulatorConfig::from_file(path)?,
        None => SimulatorConfig::default(),
    }
    .with_overrides(cli.table.clone(), cli.factors.clone());

    // Fallback diagnostics are already logged at warn level.
    let (session, _) = Session::from_source(&config.source());
    Ok((session, config))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Estimate {
            category,
            before,
            after,
            consumption,
            green_gas,
            hybrid_electric,
            gain_override,
            format,
            output_file,
        } => {
            let Some(format) = ReportFormat::from_name(format) else {
                anyhow::bail!("Unsupported format: {}", format);
            };
            let (session, config) = load_session(&cli)?;

            if let Availability::NoApplicableAfter = session.availability(category, before) {
                eprintln!(
                    "note: no applicable after-solution for '{}' / '{}' in the reference table",
                    category, before
                );
            }

            let mut input = CalculationInput::new(category.as_str(), before.as_str(), after.as_str(), *consumption)
                .with_green_gas_share(*green_gas);
            input.hybrid_electric_share_percent = *hybrid_electric;
            input.manual_gain_override = *gain_override;

            let estimate = session.estimate(&input)?;
            let report = EstimateReport::new(estimate, &config.equivalences);

            if let Some(path) = output_file {
                report.write_to(path, format)?;
                println!("Report saved to {:?}", path);
            } else {
                println!("{}", report.render(format));
            }
        }

        Commands::Options { category, before } => {
            let (session, _) = load_session(&cli)?;
            let table = session.table();

            match (category, before) {
                (None, _) => {
                    for category in table.categories() {
                        println!("{}", category);
                    }
                }
                (Some(category), None) => {
                    let befores = table.before_solutions(category);
                    if befores.is_empty() {
                        println!("No before-solution for category '{}'", category);
                    }
                    for before in befores {
                        println!("{}", before);
                    }
                }
                (Some(category), Some(before)) => match session.availability(category, before) {
                    Availability::Options(afters) => {
                        for after in afters {
                            println!("{}", after);
                        }
                    }
                    Availability::NoApplicableAfter => {
                        println!("No applicable after-solution for '{}' / '{}'", category, before);
                    }
                },
            }
        }

        Commands::CheckTable { path } => {
            let content = std::fs::read_to_string(path)?;
            let table = parse_table(&content)?;
            check_table(&table)?;
            let warnings = table.warnings();

            println!(
                "{}: {} categories, {} numeric gains, {} warnings",
                path.display(),
                table.categories().len(),
                table.numeric_cell_count(),
                warnings.len()
            );
            for warning in warnings {
                println!("  - {}", warning);
            }
        }

        Commands::Defaults => {
            let data = ReferenceData::builtin();
            let document = serde_json::json!({
                "reference_table": data.table,
                "emission_factors": data.factors,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}
