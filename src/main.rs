// Hotel Guest Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/hotel-guest-simulator
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/hotel-guest-simulator --guest-count 1000 --receptionists 2 --time-scale 0.1 --verbose
// ```

use anyhow::{Context, Result};
use clap::Parser;
use hotel_guest_simulator::simulation::{LoggingConfig, LoggingGuard, SimulationDriver};
use hotel_guest_simulator::types::config::CliArgs;
use hotel_guest_simulator::types::SimulationConfig;
use std::process;
use tracing::{error, info, Level};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let _logging_guard = match init_logging(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Initialize logging based on CLI flags
fn init_logging(args: &CliArgs) -> Result<LoggingGuard> {
    let level = if args.debug {
        Level::DEBUG
    } else if args.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let mut logging = LoggingConfig::new().with_level(level);
    if args.debug {
        logging = logging.with_span_events();
    }
    if let Some(dir) = &args.log_dir {
        logging = logging.with_file_logging(dir.clone());
    }

    logging.init().map_err(|e| anyhow::anyhow!("{}", e))
}

fn run(args: CliArgs) -> Result<()> {
    info!("Starting Hotel Guest Simulator");
    let dry_run = args.dry_run;

    // Load configuration from CLI arguments and optional config file
    let config =
        SimulationConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return Ok(());
    }

    print_startup_banner(&config);

    let driver =
        SimulationDriver::new(config.clone()).context("Failed to initialize simulation")?;
    eprintln!("Running {} guests...", config.guest_count);
    let output = driver.run_population().context("Simulation failed")?;

    eprintln!();
    eprintln!("{}", output.report.render_summary());

    if let Some(path) = &config.report_output {
        output
            .write_report(path)
            .with_context(|| format!("Failed to write report to {}", path))?;
        eprintln!("Report written to: {}", path);
    }

    if let Some(path) = &config.guest_records_output {
        output
            .write_guest_records(path)
            .with_context(|| format!("Failed to write guest records to {}", path))?;
        eprintln!("Guest records written to: {}", path);
    }

    info!("Hotel Guest Simulator completed successfully");
    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Hotel Guest Simulator");
    eprintln!("=====================");
    eprintln!("Guests moving through a capacity-limited hotel");
    eprintln!();

    print_configuration_summary(config);
}

/// Print the effective configuration to stderr
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Guests: {}", config.guest_count);
    eprintln!("  Workers: {}", config.workers_for(config.guest_count));
    eprintln!("  Receptionists: {}", config.receptionist_capacity);
    eprintln!("  Bellhops: {}", config.bellhop_capacity);
    eprintln!("  Housekeepers: {}", config.housekeeper_capacity);
    eprintln!("  Bar Seats: {}", config.bar_capacity);
    eprintln!("  Restaurant Seats: {}", config.restaurant_capacity);
    eprintln!(
        "  Rooms: {} ({} floors x {} per floor)",
        config.room_count(),
        config.floors,
        config.rooms_per_floor
    );
    eprintln!("  Reserving: {}", config.reserving_duration);
    eprintln!("  Check-in: {}", config.check_in_duration);
    eprintln!("  Luggage: {}", config.luggage_duration);
    eprintln!("  Activity: {}", config.activity_duration);
    eprintln!("  Checkout: {}", config.checkout_duration);
    eprintln!(
        "  Activity Attempts: {} (backoff {})",
        config.activity_selection_max_retries, config.activity_retry_backoff
    );
    eprintln!("  Time Scale: {}", config.time_scale);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}
