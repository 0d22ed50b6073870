//! Per-guest stage pipeline
//!
//! Drives one guest through reservation, check-in, luggage handling, an
//! activity, and checkout. Each stage acquires at most one pool permit, holds
//! it for a sampled service time with no pool lock held, and releases it
//! before the next stage starts. A guest therefore never waits on one pool
//! while holding another, which rules out cyclic waits.

use crate::guest::{Guest, GuestOutcome, GuestResult};
use crate::resources::{HotelResources, RoomKey};
use crate::simulation::GuestError;
use crate::types::{Activity, DurationRange, RoomServiceOrder, SimulationConfig, Stage};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{error, instrument, warn};

/// Executes the stage state machine for one guest at a time
#[derive(Debug)]
pub struct GuestPipeline<'a> {
    resources: &'a HotelResources,
    config: &'a SimulationConfig,
    epoch: Instant,
    rng: StdRng,
}

impl<'a> GuestPipeline<'a> {
    /// Create a pipeline over shared resources
    ///
    /// `epoch` is the simulation start; guest timestamps are offsets from it.
    pub fn new(
        resources: &'a HotelResources,
        config: &'a SimulationConfig,
        epoch: Instant,
        rng: StdRng,
    ) -> Self {
        Self { resources, config, epoch, rng }
    }

    /// Run `guest` to `Done` or to the first error, never panicking on either
    #[instrument(skip_all, fields(guest = %guest.id))]
    pub fn run(&mut self, mut guest: Guest) -> GuestResult {
        let outcome = match self.run_stages(&mut guest) {
            Ok(()) => GuestOutcome::Completed,
            Err(e) => {
                if e.is_programming_error() {
                    error!(guest = %guest.id, stage = %guest.stage, "Guest pipeline failed: {}", e);
                } else {
                    warn!(guest = %guest.id, stage = %guest.stage, "Guest left incomplete: {}", e);
                }
                GuestOutcome::incomplete(guest.stage, &e)
            }
        };
        GuestResult { guest, outcome }
    }

    fn run_stages(&mut self, guest: &mut Guest) -> Result<(), GuestError> {
        self.enter(guest, Stage::Reserving);
        self.reserve(guest)?;

        self.enter(guest, Stage::CheckingIn);
        let key = self.check_in(guest)?;

        // From here on an early return drops `key`, which gives the room back.
        self.enter(guest, Stage::LuggageHandling);
        self.handle_luggage(guest)?;

        self.enter(guest, Stage::ActivitySelection);
        self.select_activity(guest)?;

        self.enter(guest, Stage::CheckingOut);
        self.check_out(guest, key)?;

        self.enter(guest, Stage::Done);
        Ok(())
    }

    fn enter(&self, guest: &mut Guest, stage: Stage) {
        guest.stage = stage;
        crate::guest_event!(debug, guest.id, stage, "entered");
    }

    fn reserve(&mut self, guest: &mut Guest) -> Result<(), GuestError> {
        let stage = Stage::Reserving;
        let resources = self.resources;
        let permit = resources
            .receptionists
            .acquire()
            .map_err(|e| GuestError::from_pool(e, stage))?;
        self.hold(self.config.reserving_duration, stage)?;
        permit.release();

        crate::guest_event!(info, guest.id, stage, "reserved");
        Ok(())
    }

    fn check_in(&mut self, guest: &mut Guest) -> Result<RoomKey<'a>, GuestError> {
        let stage = Stage::CheckingIn;
        let resources = self.resources;

        // Wait for a room before taking a receptionist, so a full hotel
        // does not tie up the front desk.
        let key = resources
            .rooms
            .check_out_key(guest.id)
            .map_err(|e| GuestError::from_inventory(e, stage))?;
        guest.room = Some(key.room());

        let permit =
            resources.receptionists.acquire().map_err(|e| GuestError::from_pool(e, stage))?;
        self.hold(self.config.check_in_duration, stage)?;
        permit.release();

        guest.check_in_time = Some(self.now());
        crate::guest_event!(info, guest.id, stage, "checked in", room = %key.room());
        Ok(key)
    }

    fn handle_luggage(&mut self, guest: &mut Guest) -> Result<(), GuestError> {
        let stage = Stage::LuggageHandling;
        if !guest.has_luggage {
            guest.luggage_handled = false;
            crate::guest_event!(info, guest.id, stage, "no luggage");
            return Ok(());
        }

        let resources = self.resources;
        let permit = resources.bellhops.acquire().map_err(|e| GuestError::from_pool(e, stage))?;
        self.hold(self.config.luggage_duration, stage)?;
        permit.release();

        guest.luggage_handled = true;
        crate::guest_event!(info, guest.id, stage, "luggage carried");
        Ok(())
    }

    fn select_activity(&mut self, guest: &mut Guest) -> Result<(), GuestError> {
        let stage = Stage::ActivitySelection;
        let resources = self.resources;
        let max_attempts = self.config.activity_selection_max_retries;

        for attempt in 1..=max_attempts {
            guest.activity_attempts = attempt;
            let activity = Activity::ALL[self.rng.gen_range(0..Activity::ALL.len())];
            let pool = resources.pool(activity.resource());

            let Some(permit) = pool.try_acquire().map_err(|e| GuestError::from_pool(e, stage))?
            else {
                crate::guest_event!(
                    debug,
                    guest.id,
                    stage,
                    "saturated",
                    activity = %activity,
                    attempt
                );
                if attempt < max_attempts {
                    self.hold(self.config.activity_retry_backoff, stage)?;
                }
                continue;
            };

            if activity == Activity::RoomService {
                let order =
                    RoomServiceOrder::ALL[self.rng.gen_range(0..RoomServiceOrder::ALL.len())];
                guest.room_service_order = Some(order);
            }

            let started = Instant::now();
            self.hold(self.config.activity_duration, stage)?;
            permit.release();

            guest.activity = Some(activity);
            guest.activity_service_time = started.elapsed();
            crate::guest_event!(info, guest.id, stage, "activity done", activity = %activity, attempt);
            return Ok(());
        }

        Err(GuestError::RetryBudgetExceeded { attempts: max_attempts })
    }

    fn check_out(&mut self, guest: &mut Guest, key: RoomKey<'a>) -> Result<(), GuestError> {
        let stage = Stage::CheckingOut;
        if guest.luggage_handled {
            self.hold(self.config.checkout_duration, stage)?;
        }

        let room = key.room();
        key.give_back().map_err(|e| GuestError::from_inventory(e, stage))?;
        guest.check_out_time = Some(self.now());

        crate::guest_event!(info, guest.id, stage, "checked out", room = %room);
        Ok(())
    }

    /// Sleep for a sampled service time; shutdown cuts the hold short
    fn hold(&mut self, range: DurationRange, stage: Stage) -> Result<Duration, GuestError> {
        let duration = range.sample(&mut self.rng, self.config.time_scale);
        self.resources
            .shutdown
            .sleep(duration)
            .map_err(|e| GuestError::interrupted(e, stage))?;
        Ok(duration)
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::IncompleteReason;
    use rand::SeedableRng;

    fn fast_config() -> SimulationConfig {
        SimulationConfig::instantaneous(1)
    }

    fn resources_for(config: &SimulationConfig) -> HotelResources {
        let mut rng = StdRng::seed_from_u64(11);
        HotelResources::from_config(config, &mut rng)
    }

    #[test]
    fn test_guest_completes_and_returns_room() {
        let config = fast_config();
        let resources = resources_for(&config);
        let mut pipeline =
            GuestPipeline::new(&resources, &config, Instant::now(), StdRng::seed_from_u64(1));

        let result = pipeline.run(Guest::new(1, "GST1", true));
        let guest = &result.guest;

        assert_eq!(result.outcome, GuestOutcome::Completed);
        assert_eq!(guest.stage, Stage::Done);
        assert!(guest.room.is_some());
        assert!(guest.luggage_handled);
        assert!(guest.activity.is_some());
        assert!(guest.activity_attempts >= 1);
        assert!(guest.time_in_hotel().is_some());
        assert_eq!(
            guest.time_in_hotel(),
            guest.check_out_time.unwrap().checked_sub(guest.check_in_time.unwrap())
        );

        assert_eq!(resources.rooms.available_count(), 33);
        for stats in resources.pool_stats() {
            assert_eq!(stats.in_use, 0);
        }
    }

    #[test]
    fn test_guest_without_luggage_skips_bellhop() {
        let config = fast_config();
        let resources = resources_for(&config);
        let mut pipeline =
            GuestPipeline::new(&resources, &config, Instant::now(), StdRng::seed_from_u64(2));

        let result = pipeline.run(Guest::new(1, "GST1", false));
        assert!(result.outcome.is_completed());
        assert!(!result.guest.luggage_handled);
        assert_eq!(resources.bellhops.stats().granted, 0);
    }

    #[test]
    fn test_room_service_records_order() {
        let config = SimulationConfig {
            bar_capacity: 0,
            restaurant_capacity: 0,
            activity_selection_max_retries: 1_000,
            activity_retry_backoff: DurationRange::zero(),
            ..fast_config()
        };
        let resources = resources_for(&config);

        for seed in 0..20 {
            let mut pipeline =
                GuestPipeline::new(&resources, &config, Instant::now(), StdRng::seed_from_u64(seed));
            let result = pipeline.run(Guest::new(1, "GST1", false));
            let guest = &result.guest;

            assert!(result.outcome.is_completed());
            match guest.activity {
                Some(Activity::RoomService) => assert!(guest.room_service_order.is_some()),
                Some(Activity::Housekeeping) => assert!(guest.room_service_order.is_none()),
                other => panic!("unexpected activity {:?}", other),
            }
        }
    }

    #[test]
    fn test_retry_budget_exceeded() {
        let config = SimulationConfig {
            bar_capacity: 0,
            restaurant_capacity: 0,
            housekeeper_capacity: 0,
            activity_selection_max_retries: 1,
            ..fast_config()
        };
        let resources = resources_for(&config);
        let mut pipeline =
            GuestPipeline::new(&resources, &config, Instant::now(), StdRng::seed_from_u64(3));

        let result = pipeline.run(Guest::new(1, "GST1", true));
        assert_eq!(result.outcome.reason(), Some(IncompleteReason::RetryBudgetExceeded));
        assert_eq!(result.guest.stage, Stage::ActivitySelection);
        assert_eq!(result.guest.activity_attempts, 1);
        assert!(result.guest.activity.is_none());

        // the room held since check-in is back in the inventory
        assert_eq!(resources.rooms.available_count(), 33);
    }

    #[test]
    fn test_room_taken_away_fails_checkout_only_for_that_guest() {
        let config = SimulationConfig {
            floors: 1,
            rooms_per_floor: 1,
            reserving_duration: DurationRange::zero(),
            check_in_duration: DurationRange::zero(),
            luggage_duration: DurationRange::zero(),
            activity_duration: DurationRange::new(0.3, 0.3),
            checkout_duration: DurationRange::zero(),
            time_scale: 1.0,
            ..fast_config()
        };
        let resources = resources_for(&config);
        let guest = Guest::new(1, "GST1", true);
        let guest_id = guest.id;

        let result = std::thread::scope(|scope| {
            let worker = scope.spawn(|| {
                GuestPipeline::new(&resources, &config, Instant::now(), StdRng::seed_from_u64(6))
                    .run(guest)
            });

            while resources.rooms.available_count() > 0 {
                std::thread::sleep(Duration::from_millis(5));
            }
            // Return the room behind the guest's back while they are busy
            resources.rooms.give_back(crate::types::RoomCode::new(1, 0), guest_id).unwrap();

            worker.join().unwrap()
        });

        assert_eq!(result.outcome.reason(), Some(IncompleteReason::InvalidRelease));
        assert_eq!(result.guest.stage, Stage::CheckingOut);
        assert!(result.guest.check_out_time.is_none());
        assert!(result.guest.time_in_hotel().is_none());
        assert_eq!(resources.rooms.available_count(), 1);

        let mut pipeline =
            GuestPipeline::new(&resources, &config, Instant::now(), StdRng::seed_from_u64(7));
        let next = pipeline.run(Guest::new(2, "GST2", false));
        assert!(next.outcome.is_completed());
        assert!(next.guest.check_out_time.is_some());
        assert_eq!(resources.rooms.available_count(), 1);
    }

    #[test]
    fn test_shutdown_before_start() {
        let config = fast_config();
        let resources = resources_for(&config);
        resources.close_all();

        let mut pipeline =
            GuestPipeline::new(&resources, &config, Instant::now(), StdRng::seed_from_u64(4));
        let result = pipeline.run(Guest::new(1, "GST1", true));

        assert_eq!(
            result.outcome,
            GuestOutcome::incomplete(
                Stage::Reserving,
                &GuestError::Shutdown { stage: Stage::Reserving }
            )
        );
        assert!(result.guest.room.is_none());
    }
}
