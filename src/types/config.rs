//! Configuration structures for the hotel simulator
//!
//! This module contains the simulation configuration structure, the CLI
//! arguments that override it, and the validation that runs before any
//! guest thread is started.

use clap::Parser;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Reference service-time ranges, in seconds
pub mod reference {
    /// Receptionist time for a reservation
    pub const RESERVING: (f64, f64) = (0.1, 0.2);
    /// Receptionist time for a check-in
    pub const CHECK_IN: (f64, f64) = (0.1, 0.3);
    /// Bellhop time for carrying luggage
    pub const LUGGAGE: (f64, f64) = (0.1, 0.5);
    /// Time spent doing the chosen activity
    pub const ACTIVITY: (f64, f64) = (0.1, 0.5);
    /// Time spent checking out with handled luggage
    pub const CHECKOUT: (f64, f64) = (0.1, 0.5);
    /// Pause before re-rolling a saturated activity
    pub const RETRY_BACKOFF: (f64, f64) = (0.1, 0.3);

    /// Longest single service time after scaling, one day
    pub const MAX_SCALED_SECS: f64 = 86_400.0;

    /// Room numbers are printed with two digits
    pub const MAX_ROOMS_PER_FLOOR: u32 = 100;
}

/// Uniform range of simulated service time, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    /// Shortest duration in seconds
    pub min: f64,
    /// Longest duration in seconds
    pub max: f64,
}

impl DurationRange {
    /// Create a range from its bounds
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range that always yields zero
    pub const fn zero() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    /// Whether the bounds are finite, non-negative, and ordered
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }

    /// Draw a duration uniformly from the range, multiplied by `scale`
    pub fn sample<R: Rng>(&self, rng: &mut R, scale: f64) -> Duration {
        let secs = if self.min < self.max { rng.gen_range(self.min..=self.max) } else { self.min };
        Duration::try_from_secs_f64(secs * scale).unwrap_or(Duration::ZERO)
    }

    /// Lower bound of the range after scaling
    pub fn scaled_min(&self, scale: f64) -> Duration {
        Duration::try_from_secs_f64(self.min * scale).unwrap_or(Duration::ZERO)
    }
}

impl From<(f64, f64)> for DurationRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

impl fmt::Display for DurationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}s", self.min, self.max)
    }
}

impl FromStr for DurationRange {
    type Err = String;

    /// Parses `MIN:MAX` or a single value used for both bounds
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |v: &str| {
            v.trim().parse::<f64>().map_err(|e| format!("Invalid duration '{}': {}", v, e))
        };
        match s.split_once(':') {
            Some((min, max)) => Ok(Self::new(parse(min)?, parse(max)?)),
            None => {
                let value = parse(s)?;
                Ok(Self::new(value, value))
            }
        }
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hotel-guest-simulator",
    version,
    about = "Hotel Guest Simulator - Runs guests through a capacity-gated hotel pipeline",
    long_about = "Runs every guest concurrently through reservation, check-in, luggage handling, an activity, and checkout, with each stage contending for a shared pool of limited staff, seats, or rooms.

EXAMPLES:
    # Run with default settings
    hotel-guest-simulator

    # Use a configuration file
    hotel-guest-simulator --config hotel.json

    # Override specific settings
    hotel-guest-simulator --guest-count 100 --receptionists 2 --time-scale 0.1

    # Generate configuration template
    hotel-guest-simulator --print-config > hotel.json

    # Validate configuration without running
    hotel-guest-simulator --config hotel.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Duration ranges are given as MIN:MAX in seconds, e.g. --reserving-duration 0.1:0.2"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Number of guests to simulate
    #[arg(long, help = "Number of guests to simulate (default: 400)")]
    pub guest_count: Option<usize>,

    /// Maximum number of guests processed concurrently
    #[arg(long, help = "Worker threads running guests concurrently (default: 64)")]
    pub workers: Option<usize>,

    /// Receptionist pool capacity
    #[arg(long, help = "Number of receptionists (default: 6)")]
    pub receptionists: Option<usize>,

    /// Bellhop pool capacity
    #[arg(long, help = "Number of bellhops (default: 5)")]
    pub bellhops: Option<usize>,

    /// Housekeeper pool capacity
    #[arg(long, help = "Number of housekeepers (default: 15)")]
    pub housekeepers: Option<usize>,

    /// Bar seat capacity
    #[arg(long, help = "Bar capacity (default: 50)")]
    pub bar_capacity: Option<usize>,

    /// Restaurant seat capacity
    #[arg(long, help = "Restaurant capacity (default: 150)")]
    pub restaurant_capacity: Option<usize>,

    /// Number of floors in the hotel
    #[arg(long, help = "Number of floors (default: 3)")]
    pub floors: Option<u32>,

    /// Rooms on each floor
    #[arg(long, help = "Rooms per floor (default: 11)")]
    pub rooms_per_floor: Option<u32>,

    /// Reservation service time
    #[arg(long, help = "Reservation duration range MIN:MAX in seconds")]
    pub reserving_duration: Option<DurationRange>,

    /// Check-in service time
    #[arg(long, help = "Check-in duration range MIN:MAX in seconds")]
    pub check_in_duration: Option<DurationRange>,

    /// Luggage handling service time
    #[arg(long, help = "Luggage handling duration range MIN:MAX in seconds")]
    pub luggage_duration: Option<DurationRange>,

    /// Activity service time
    #[arg(long, help = "Activity duration range MIN:MAX in seconds")]
    pub activity_duration: Option<DurationRange>,

    /// Checkout time when luggage was handled
    #[arg(long, help = "Checkout duration range MIN:MAX in seconds")]
    pub checkout_duration: Option<DurationRange>,

    /// Pause between activity selection attempts
    #[arg(long, help = "Backoff between activity attempts, MIN:MAX in seconds")]
    pub activity_retry_backoff: Option<DurationRange>,

    /// Maximum activity selection attempts per guest
    #[arg(long, help = "Maximum activity selection attempts (default: 10)")]
    pub max_activity_retries: Option<usize>,

    /// Multiplier applied to every simulated duration
    #[arg(
        long,
        help = "Multiplier applied to every duration (default: 1.0)",
        long_help = "Multiplier applied to every simulated service time. 0.1 runs ten times faster; 0 removes all delays."
    )]
    pub time_scale: Option<f64>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Output path for the JSON report
    #[arg(long, help = "Write the aggregate report as JSON to this path")]
    pub report_output: Option<String>,

    /// Output path for per-guest records
    #[arg(long, help = "Write per-guest records as JSONL to this path")]
    pub guest_records_output: Option<String>,

    /// Directory for rolling log files
    #[arg(long, help = "Also write JSON logs to daily rolling files in this directory")]
    pub log_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Number of guests to simulate
    pub guest_count: Option<usize>,
    /// Maximum number of guests processed concurrently
    pub worker_count: Option<usize>,
    /// Receptionist pool capacity
    pub receptionist_capacity: Option<usize>,
    /// Bellhop pool capacity
    pub bellhop_capacity: Option<usize>,
    /// Housekeeper pool capacity
    pub housekeeper_capacity: Option<usize>,
    /// Bar seat capacity
    pub bar_capacity: Option<usize>,
    /// Restaurant seat capacity
    pub restaurant_capacity: Option<usize>,
    /// Number of floors
    pub floors: Option<u32>,
    /// Rooms per floor
    pub rooms_per_floor: Option<u32>,
    /// Reservation service time
    pub reserving_duration: Option<DurationRange>,
    /// Check-in service time
    pub check_in_duration: Option<DurationRange>,
    /// Luggage handling service time
    pub luggage_duration: Option<DurationRange>,
    /// Activity service time
    pub activity_duration: Option<DurationRange>,
    /// Checkout time when luggage was handled
    pub checkout_duration: Option<DurationRange>,
    /// Pause between activity selection attempts
    pub activity_retry_backoff: Option<DurationRange>,
    /// Maximum activity selection attempts per guest
    pub activity_selection_max_retries: Option<usize>,
    /// Multiplier applied to every simulated duration
    pub time_scale: Option<f64>,
    /// Random seed
    pub seed: Option<u64>,
    /// Output path for the JSON report
    pub report_output: Option<String>,
    /// Output path for per-guest records
    pub guest_records_output: Option<String>,
}

/// Configuration for one hotel simulation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Number of guests to simulate
    pub guest_count: usize,
    /// Maximum number of guests processed concurrently
    pub worker_count: usize,
    /// Receptionist pool capacity
    pub receptionist_capacity: usize,
    /// Bellhop pool capacity
    pub bellhop_capacity: usize,
    /// Housekeeper pool capacity, shared by room service and housekeeping
    pub housekeeper_capacity: usize,
    /// Bar seat capacity
    pub bar_capacity: usize,
    /// Restaurant seat capacity
    pub restaurant_capacity: usize,
    /// Number of floors
    pub floors: u32,
    /// Rooms per floor
    pub rooms_per_floor: u32,
    /// Reservation service time
    pub reserving_duration: DurationRange,
    /// Check-in service time
    pub check_in_duration: DurationRange,
    /// Luggage handling service time
    pub luggage_duration: DurationRange,
    /// Activity service time
    pub activity_duration: DurationRange,
    /// Checkout time when luggage was handled
    pub checkout_duration: DurationRange,
    /// Pause between activity selection attempts
    pub activity_retry_backoff: DurationRange,
    /// Maximum activity selection attempts per guest
    pub activity_selection_max_retries: usize,
    /// Multiplier applied to every simulated duration
    pub time_scale: f64,
    /// Random seed for reproducible results
    pub seed: Option<u64>,
    /// Output path for the JSON report
    pub report_output: Option<String>,
    /// Output path for per-guest records
    pub guest_records_output: Option<String>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    /// Guest count is zero
    #[error("Guest count must be greater than 0, got {0}")]
    InvalidGuestCount(usize),

    /// Worker count is zero
    #[error("Worker count must be greater than 0, got {0}")]
    InvalidWorkerCount(usize),

    /// A pool every guest must pass through has no capacity
    #[error("{resource} capacity must be greater than 0")]
    BlockingPoolEmpty {
        /// Name of the pool
        resource: String,
    },

    /// The hotel has no rooms
    #[error("Hotel must have at least one room, got {floors} floors x {rooms_per_floor} rooms")]
    NoRooms {
        /// Configured floors
        floors: u32,
        /// Configured rooms per floor
        rooms_per_floor: u32,
    },

    /// A duration range is negative, non-finite, or reversed
    #[error("Invalid duration range for {field}: {min}..{max}")]
    InvalidDurationRange {
        /// Name of the field
        field: String,
        /// Configured lower bound
        min: f64,
        /// Configured upper bound
        max: f64,
    },

    /// A duration range, once scaled, exceeds the longest allowed hold
    #[error("Duration range for {field} reaches {scaled_secs}s after scaling, limit is {limit}s")]
    DurationTooLong {
        /// Name of the field
        field: String,
        /// Upper bound multiplied by the time scale
        scaled_secs: f64,
        /// Largest accepted scaled duration
        limit: f64,
    },

    /// More rooms per floor than the two-digit room number can tell apart
    #[error("Rooms per floor must be at most {limit}, got {rooms_per_floor}")]
    TooManyRoomsPerFloor {
        /// Configured rooms per floor
        rooms_per_floor: u32,
        /// Largest accepted value
        limit: u32,
    },

    /// Retry bound is zero
    #[error("Activity selection max retries must be at least 1, got {0}")]
    InvalidRetryBudget(usize),

    /// Time scale is negative or non-finite
    #[error("Time scale must be a finite value >= 0, got {0}")]
    InvalidTimeScale(f64),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            guest_count: 400,
            worker_count: 64,
            receptionist_capacity: 6,
            bellhop_capacity: 5,
            housekeeper_capacity: 15,
            bar_capacity: 50,
            restaurant_capacity: 150,
            floors: 3,
            rooms_per_floor: 11,
            reserving_duration: reference::RESERVING.into(),
            check_in_duration: reference::CHECK_IN.into(),
            luggage_duration: reference::LUGGAGE.into(),
            activity_duration: reference::ACTIVITY.into(),
            checkout_duration: reference::CHECKOUT.into(),
            activity_retry_backoff: reference::RETRY_BACKOFF.into(),
            activity_selection_max_retries: 10,
            time_scale: 1.0,
            seed: None,
            report_output: None,
            guest_records_output: None,
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file, filling gaps with defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            guest_count: file.guest_count.unwrap_or(defaults.guest_count),
            worker_count: file.worker_count.unwrap_or(defaults.worker_count),
            receptionist_capacity: file
                .receptionist_capacity
                .unwrap_or(defaults.receptionist_capacity),
            bellhop_capacity: file.bellhop_capacity.unwrap_or(defaults.bellhop_capacity),
            housekeeper_capacity: file
                .housekeeper_capacity
                .unwrap_or(defaults.housekeeper_capacity),
            bar_capacity: file.bar_capacity.unwrap_or(defaults.bar_capacity),
            restaurant_capacity: file.restaurant_capacity.unwrap_or(defaults.restaurant_capacity),
            floors: file.floors.unwrap_or(defaults.floors),
            rooms_per_floor: file.rooms_per_floor.unwrap_or(defaults.rooms_per_floor),
            reserving_duration: file.reserving_duration.unwrap_or(defaults.reserving_duration),
            check_in_duration: file.check_in_duration.unwrap_or(defaults.check_in_duration),
            luggage_duration: file.luggage_duration.unwrap_or(defaults.luggage_duration),
            activity_duration: file.activity_duration.unwrap_or(defaults.activity_duration),
            checkout_duration: file.checkout_duration.unwrap_or(defaults.checkout_duration),
            activity_retry_backoff: file
                .activity_retry_backoff
                .unwrap_or(defaults.activity_retry_backoff),
            activity_selection_max_retries: file
                .activity_selection_max_retries
                .unwrap_or(defaults.activity_selection_max_retries),
            time_scale: file.time_scale.unwrap_or(defaults.time_scale),
            seed: file.seed.or(defaults.seed),
            report_output: file.report_output.or(defaults.report_output),
            guest_records_output: file.guest_records_output.or(defaults.guest_records_output),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.guest_count {
            config.guest_count = value;
        }
        if let Some(value) = args.workers {
            config.worker_count = value;
        }
        if let Some(value) = args.receptionists {
            config.receptionist_capacity = value;
        }
        if let Some(value) = args.bellhops {
            config.bellhop_capacity = value;
        }
        if let Some(value) = args.housekeepers {
            config.housekeeper_capacity = value;
        }
        if let Some(value) = args.bar_capacity {
            config.bar_capacity = value;
        }
        if let Some(value) = args.restaurant_capacity {
            config.restaurant_capacity = value;
        }
        if let Some(value) = args.floors {
            config.floors = value;
        }
        if let Some(value) = args.rooms_per_floor {
            config.rooms_per_floor = value;
        }
        if let Some(value) = args.reserving_duration {
            config.reserving_duration = value;
        }
        if let Some(value) = args.check_in_duration {
            config.check_in_duration = value;
        }
        if let Some(value) = args.luggage_duration {
            config.luggage_duration = value;
        }
        if let Some(value) = args.activity_duration {
            config.activity_duration = value;
        }
        if let Some(value) = args.checkout_duration {
            config.checkout_duration = value;
        }
        if let Some(value) = args.activity_retry_backoff {
            config.activity_retry_backoff = value;
        }
        if let Some(value) = args.max_activity_retries {
            config.activity_selection_max_retries = value;
        }
        if let Some(value) = args.time_scale {
            config.time_scale = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.report_output {
            config.report_output = Some(value);
        }
        if let Some(value) = args.guest_records_output {
            config.guest_records_output = Some(value);
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.guest_count == 0 {
            return Err(ConfigValidationError::InvalidGuestCount(self.guest_count));
        }

        if self.worker_count == 0 {
            return Err(ConfigValidationError::InvalidWorkerCount(self.worker_count));
        }

        // Every guest blocks on these two pools, so an empty one would never admit anyone
        if self.receptionist_capacity == 0 {
            return Err(ConfigValidationError::BlockingPoolEmpty {
                resource: "Receptionist".to_string(),
            });
        }
        if self.bellhop_capacity == 0 {
            return Err(ConfigValidationError::BlockingPoolEmpty {
                resource: "Bellhop".to_string(),
            });
        }

        if self.room_count() == 0 {
            return Err(ConfigValidationError::NoRooms {
                floors: self.floors,
                rooms_per_floor: self.rooms_per_floor,
            });
        }
        if self.rooms_per_floor > reference::MAX_ROOMS_PER_FLOOR {
            return Err(ConfigValidationError::TooManyRoomsPerFloor {
                rooms_per_floor: self.rooms_per_floor,
                limit: reference::MAX_ROOMS_PER_FLOOR,
            });
        }

        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ConfigValidationError::InvalidTimeScale(self.time_scale));
        }

        self.validate_range("reserving_duration", &self.reserving_duration)?;
        self.validate_range("check_in_duration", &self.check_in_duration)?;
        self.validate_range("luggage_duration", &self.luggage_duration)?;
        self.validate_range("activity_duration", &self.activity_duration)?;
        self.validate_range("checkout_duration", &self.checkout_duration)?;
        self.validate_range("activity_retry_backoff", &self.activity_retry_backoff)?;

        if self.activity_selection_max_retries == 0 {
            return Err(ConfigValidationError::InvalidRetryBudget(
                self.activity_selection_max_retries,
            ));
        }

        Ok(())
    }

    fn validate_range(
        &self,
        field: &str,
        range: &DurationRange,
    ) -> Result<(), ConfigValidationError> {
        if !range.is_valid() {
            return Err(ConfigValidationError::InvalidDurationRange {
                field: field.to_string(),
                min: range.min,
                max: range.max,
            });
        }
        let scaled_secs = range.max * self.time_scale;
        if scaled_secs > reference::MAX_SCALED_SECS {
            return Err(ConfigValidationError::DurationTooLong {
                field: field.to_string(),
                scaled_secs,
                limit: reference::MAX_SCALED_SECS,
            });
        }
        Ok(())
    }

    /// Total number of rooms in the inventory
    pub fn room_count(&self) -> usize {
        self.floors as usize * self.rooms_per_floor as usize
    }

    /// Worker threads spawned for `guests` guests: never more than there are guests
    pub fn workers_for(&self, guests: usize) -> usize {
        self.worker_count.min(guests)
    }

    /// A configuration with every delay removed, for fast deterministic runs
    pub fn instantaneous(guest_count: usize) -> Self {
        Self { guest_count, time_scale: 0.0, ..Self::default() }
    }
}
