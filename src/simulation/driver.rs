//! Simulation driver
//!
//! Owns the hotel's shared resources for one run, fans the guest population
//! out over a bounded set of worker threads, and collects every guest's
//! outcome into a report.

use crate::guest::{Guest, GuestGenerator, GuestPipeline, GuestRecord, GuestResult};
use crate::resources::HotelResources;
use crate::simulation::{RunInfo, SimulationError, SimulationReport, SimulationResult};
use crate::types::SimulationConfig;
use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use std::vec;
use tracing::{debug, info, instrument, warn};

/// Runs guest pipelines concurrently against one set of hotel resources
#[derive(Debug)]
pub struct SimulationDriver {
    config: SimulationConfig,
    resources: Arc<HotelResources>,
}

/// Cloneable handle that shuts a running simulation down from anywhere
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    resources: Arc<HotelResources>,
}

impl ShutdownHandle {
    /// Close every pool and the inventory, waking all waiters and holds
    pub fn shutdown(&self) {
        crate::sim_event!(warn, "Shutdown requested");
        self.resources.close_all();
    }

    /// Whether shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        self.resources.is_shut_down()
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    /// Per-guest results, in guest number order
    pub results: Vec<GuestResult>,
    /// Aggregated report
    pub report: SimulationReport,
}

impl SimulationOutput {
    /// Flat records for every guest
    pub fn guest_records(&self) -> Vec<GuestRecord> {
        self.results.iter().map(GuestRecord::from_result).collect()
    }

    /// Write the report as pretty JSON
    pub fn write_report<P: AsRef<Path>>(&self, path: P) -> SimulationResult<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!("Report written to {}", path.as_ref().display());
        Ok(())
    }

    /// Write one JSON object per guest, one per line
    pub fn write_guest_records<P: AsRef<Path>>(&self, path: P) -> SimulationResult<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        for record in self.guest_records() {
            serde_json::to_writer(&mut writer, &record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        info!("{} guest records written to {}", self.results.len(), path.as_ref().display());
        Ok(())
    }
}

impl SimulationDriver {
    /// Validate `config` and build the shared resources
    #[instrument(skip(config), fields(guest_count = config.guest_count, workers = config.worker_count))]
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => {
                info!("Using deterministic seed: {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => {
                debug!("Using entropy-based random seed");
                StdRng::from_entropy()
            }
        };
        let resources = Arc::new(HotelResources::from_config(&config, &mut rng));

        Ok(Self { config, resources })
    }

    /// The validated configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The shared resources, for inspection
    pub fn resources(&self) -> &HotelResources {
        &self.resources
    }

    /// A handle that can shut this simulation down from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle { resources: Arc::clone(&self.resources) }
    }

    /// Generate `guest_count` guests and run them
    pub fn run_population(&self) -> SimulationResult<SimulationOutput> {
        let mut generator = GuestGenerator::from_seed(self.config.seed);
        let guests = generator.generate_guests(self.config.guest_count);
        self.run(guests)
    }

    /// Run every guest to completion or failure
    ///
    /// Blocks until all guests are finished. Individual guest failures end
    /// up in their outcomes; only a panicking or unspawnable worker fails
    /// the run.
    #[instrument(skip_all, fields(guests = guests.len()))]
    pub fn run(&self, guests: Vec<Guest>) -> SimulationResult<SimulationOutput> {
        let guest_count = guests.len();
        let worker_count = self.config.workers_for(guest_count);
        crate::sim_event!(
            info,
            "Simulation started",
            guests = guest_count,
            workers = worker_count
        );

        let started_at = Utc::now();
        let epoch = Instant::now();
        let queue = Mutex::new(guests.into_iter());
        let results = Mutex::new(Vec::with_capacity(guest_count));

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(worker_count);
            let mut failure = None;

            for index in 0..worker_count {
                let spawned = thread::Builder::new()
                    .name(format!("guest-worker-{}", index))
                    .spawn_scoped(scope, || self.work(&queue, &results, epoch));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        warn!("Failed to spawn worker {}: {}", index, e);
                        failure = Some(SimulationError::WorkerSpawnError(e.to_string()));
                        break;
                    }
                }
            }

            // Join every worker so a panic in one never goes unobserved.
            for handle in handles {
                if let Err(payload) = handle.join() {
                    let error = SimulationError::worker_panic(&*payload);
                    warn!("{}", error);
                    failure.get_or_insert(error);
                }
            }

            failure.map_or(Ok(()), Err)
        })?;

        let mut results = results.into_inner();
        results.sort_by_key(|result| result.guest.number);

        let run = RunInfo {
            started_at,
            finished_at: Utc::now(),
            wall_time: epoch.elapsed(),
            worker_count,
            pools: self.resources.pool_stats(),
            rooms_total: self.resources.rooms.len(),
            peak_rooms_assigned: self.resources.rooms.peak_assigned(),
        };
        let report = SimulationReport::aggregate(&results).with_run_info(run);

        crate::sim_event!(
            info,
            "Simulation finished",
            completed = report.completed,
            incomplete = report.incomplete,
            wall_time_secs = epoch.elapsed().as_secs_f64()
        );
        Ok(SimulationOutput { results, report })
    }

    fn work(
        &self,
        queue: &Mutex<vec::IntoIter<Guest>>,
        results: &Mutex<Vec<GuestResult>>,
        epoch: Instant,
    ) {
        loop {
            let Some(guest) = queue.lock().next() else {
                break;
            };
            let rng = self.guest_rng(guest.number);
            let result = GuestPipeline::new(&self.resources, &self.config, epoch, rng).run(guest);
            results.lock().push(result);
        }
    }

    /// Per-guest random stream; reproducible when a seed is configured
    fn guest_rng(&self, number: usize) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(number as u64)),
            None => StdRng::from_entropy(),
        }
    }
}
