//! Shutdown unblocks waiting and serving guests promptly

use hotel_guest_simulator::simulation::{IncompleteReason, SimulationDriver};
use hotel_guest_simulator::types::{DurationRange, SimulationConfig};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_shutdown_interrupts_blocked_receptionist_queue() {
    let config = SimulationConfig {
        receptionist_capacity: 1,
        worker_count: 10,
        reserving_duration: DurationRange::new(30.0, 30.0),
        seed: Some(1),
        ..SimulationConfig::instantaneous(10)
    };
    // instantaneous() zeroes time; restore it for the long hold
    let config = SimulationConfig { time_scale: 1.0, ..config };

    let driver = SimulationDriver::new(config).unwrap();
    let handle = driver.shutdown_handle();
    let started = Instant::now();

    let output = thread::scope(|scope| {
        let running = scope.spawn(|| driver.run_population());
        thread::sleep(Duration::from_millis(100));
        handle.shutdown();
        running.join().unwrap()
    })
    .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(handle.is_shutdown());
    assert_eq!(output.report.completed, 0);
    assert_eq!(output.report.incomplete_count(IncompleteReason::Shutdown), 10);
}

#[test]
fn test_shutdown_releases_guests_waiting_for_rooms() {
    let config = SimulationConfig {
        floors: 1,
        rooms_per_floor: 1,
        worker_count: 5,
        reserving_duration: DurationRange::zero(),
        check_in_duration: DurationRange::zero(),
        luggage_duration: DurationRange::zero(),
        activity_duration: DurationRange::new(30.0, 30.0),
        seed: Some(2),
        ..SimulationConfig::instantaneous(5)
    };
    let config = SimulationConfig { time_scale: 1.0, ..config };

    let driver = SimulationDriver::new(config).unwrap();
    let handle = driver.shutdown_handle();
    let started = Instant::now();

    let output = thread::scope(|scope| {
        let running = scope.spawn(|| driver.run_population());
        thread::sleep(Duration::from_millis(200));
        handle.shutdown();
        running.join().unwrap()
    })
    .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(output.report.completed, 0);
    for result in &output.results {
        let reason = result.outcome.reason().unwrap();
        assert!(
            reason == IncompleteReason::Shutdown || reason == IncompleteReason::Exhausted,
            "unexpected reason {}",
            reason
        );
    }

    // the one room is back and nobody holds it
    let rooms = driver.resources().rooms.snapshot();
    assert_eq!(rooms.available.len(), 1);
    assert!(rooms.assigned.is_empty());
}
