//! Report aggregation
//!
//! Folds the finished guest list into a [`SimulationReport`]. Aggregation is a
//! pure function of the guest results; run metadata (timestamps, pool peaks)
//! is attached afterwards by the driver.

use crate::guest::GuestResult;
use crate::resources::PoolStats;
use crate::simulation::IncompleteReason;
use crate::types::Activity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Per-activity totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Activity these totals are for
    pub activity: Activity,
    /// Guests who did this activity
    pub guest_count: usize,
    /// Service time summed over those guests
    pub total_service_time: Duration,
}

impl ActivitySummary {
    fn empty(activity: Activity) -> Self {
        Self { activity, guest_count: 0, total_service_time: Duration::ZERO }
    }

    /// Mean service time, if anyone did the activity
    pub fn average_service_time(&self) -> Option<Duration> {
        u32::try_from(self.guest_count)
            .ok()
            .filter(|count| *count > 0)
            .map(|count| self.total_service_time / count)
    }
}

/// Facts about the run itself rather than about the guests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall-clock end
    pub finished_at: DateTime<Utc>,
    /// Monotonic elapsed time
    pub wall_time: Duration,
    /// Worker threads used
    pub worker_count: usize,
    /// Final counters of every pool
    pub pools: Vec<PoolStats>,
    /// Rooms in the inventory
    pub rooms_total: usize,
    /// Most rooms assigned at once
    pub peak_rooms_assigned: usize,
}

/// Aggregate outcome of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Guests simulated
    pub guest_count: usize,
    /// Guests that reached `Done`
    pub completed: usize,
    /// Guests that stopped early
    pub incomplete: usize,
    /// Incomplete guests per reason
    pub incomplete_by_reason: BTreeMap<IncompleteReason, usize>,
    /// Guests whose luggage a bellhop carried
    pub luggage_handled: usize,
    /// Guests that entered activity selection
    pub reached_activity_selection: usize,
    /// Guests that entered activity selection but never did an activity
    pub unresolved_activity_selections: usize,
    /// Totals per activity, in `Activity::ALL` order
    pub activities: Vec<ActivitySummary>,
    /// Time in hotel summed over completed guests
    pub total_time_in_hotel: Duration,
    /// Mean time in hotel over completed guests
    pub average_time_in_hotel: Option<Duration>,
    /// Run metadata, when produced by the driver
    pub run: Option<RunInfo>,
}

impl SimulationReport {
    /// Fold finished guests into a report
    pub fn aggregate(results: &[GuestResult]) -> Self {
        let mut activities: BTreeMap<Activity, ActivitySummary> =
            Activity::ALL.iter().map(|a| (*a, ActivitySummary::empty(*a))).collect();
        let mut incomplete_by_reason = BTreeMap::new();
        let mut completed = 0;
        let mut luggage_handled = 0;
        let mut reached_activity_selection = 0;
        let mut unresolved_activity_selections = 0;
        let mut total_time_in_hotel = Duration::ZERO;
        let mut timed_guests: u32 = 0;

        for result in results {
            let guest = &result.guest;

            match result.outcome.reason() {
                None => completed += 1,
                Some(reason) => *incomplete_by_reason.entry(reason).or_insert(0) += 1,
            }
            if guest.luggage_handled {
                luggage_handled += 1;
            }

            if guest.reached_activity_selection() {
                reached_activity_selection += 1;
                match guest.activity.and_then(|a| activities.get_mut(&a)) {
                    Some(summary) => {
                        summary.guest_count += 1;
                        summary.total_service_time += guest.activity_service_time;
                    }
                    None => unresolved_activity_selections += 1,
                }
            }

            if result.outcome.is_completed() {
                if let Some(time) = guest.time_in_hotel() {
                    total_time_in_hotel += time;
                    timed_guests += 1;
                }
            }
        }

        let average_time_in_hotel =
            (timed_guests > 0).then(|| total_time_in_hotel / timed_guests);

        Self {
            guest_count: results.len(),
            completed,
            incomplete: results.len() - completed,
            incomplete_by_reason,
            luggage_handled,
            reached_activity_selection,
            unresolved_activity_selections,
            activities: Activity::ALL.iter().filter_map(|a| activities.remove(a)).collect(),
            total_time_in_hotel,
            average_time_in_hotel,
            run: None,
        }
    }

    /// Attach run metadata
    pub fn with_run_info(mut self, run: RunInfo) -> Self {
        self.run = Some(run);
        self
    }

    /// Totals for one activity
    pub fn activity(&self, activity: Activity) -> Option<&ActivitySummary> {
        self.activities.iter().find(|summary| summary.activity == activity)
    }

    /// Guests counted under some activity
    pub fn activity_total(&self) -> usize {
        self.activities.iter().map(|summary| summary.guest_count).sum()
    }

    /// Incomplete guests with a given reason
    pub fn incomplete_count(&self, reason: IncompleteReason) -> usize {
        self.incomplete_by_reason.get(&reason).copied().unwrap_or(0)
    }

    /// Percentage of guests that completed
    pub fn completion_percentage(&self) -> f64 {
        if self.guest_count == 0 {
            0.0
        } else {
            (self.completed as f64 / self.guest_count as f64) * 100.0
        }
    }

    /// Plain-text summary for the console
    pub fn render_summary(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Hotel Simulation Report ===\n\n");

        if let Some(run) = &self.run {
            report.push_str(&format!(
                "Started: {}\n",
                run.started_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            report.push_str(&format!("Wall Time: {:.2} seconds\n", run.wall_time.as_secs_f64()));
            report.push_str(&format!("Workers: {}\n\n", run.worker_count));
        }

        report.push_str("Guests:\n");
        report.push_str(&format!("  • Total: {}\n", self.guest_count));
        report.push_str(&format!(
            "  • Completed: {} ({:.1}%)\n",
            self.completed,
            self.completion_percentage()
        ));
        report.push_str(&format!("  • Incomplete: {}\n", self.incomplete));
        for (reason, count) in &self.incomplete_by_reason {
            report.push_str(&format!("      - {}: {}\n", reason, count));
        }
        report.push_str(&format!("  • Luggage Handled: {}\n", self.luggage_handled));
        match self.average_time_in_hotel {
            Some(average) => report.push_str(&format!(
                "  • Average Time in Hotel: {:.3} seconds\n\n",
                average.as_secs_f64()
            )),
            None => report.push_str("  • Average Time in Hotel: n/a\n\n"),
        }

        report.push_str("Activities:\n");
        for summary in &self.activities {
            report.push_str(&format!(
                "  • {:<13} {:>6} guests, {:>9.3}s total service time\n",
                summary.activity.to_string(),
                summary.guest_count,
                summary.total_service_time.as_secs_f64()
            ));
        }
        if self.unresolved_activity_selections > 0 {
            report.push_str(&format!(
                "  • No activity: {} guests\n",
                self.unresolved_activity_selections
            ));
        }

        if let Some(run) = &self.run {
            report.push_str("\nResources (peak / capacity):\n");
            for pool in &run.pools {
                report.push_str(&format!(
                    "  • {:<16} {:>4} / {:<4} ({} granted, {} turned away)\n",
                    pool.kind.to_string(),
                    pool.peak_in_use,
                    pool.capacity,
                    pool.granted,
                    pool.rejected
                ));
            }
            report.push_str(&format!(
                "  • {:<16} {:>4} / {:<4}\n",
                "Rooms", run.peak_rooms_assigned, run.rooms_total
            ));
        }

        report
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_summary())
    }
}
