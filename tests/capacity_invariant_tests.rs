//! Capacity invariant under concurrent load
//!
//! No pool may ever have more holders inside than its capacity, whether it
//! is driven directly or through full guest pipelines.

use hotel_guest_simulator::resources::ResourcePool;
use hotel_guest_simulator::simulation::SimulationDriver;
use hotel_guest_simulator::types::{DurationRange, ResourceKind, SimulationConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[test]
fn test_pool_never_exceeds_capacity() {
    const CAPACITY: usize = 3;
    const CONTENDERS: usize = 16;

    let pool = ResourcePool::new(ResourceKind::Receptionist, CAPACITY);
    let inside = AtomicUsize::new(0);
    let max_inside = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..CONTENDERS {
            scope.spawn(|| {
                for _ in 0..5 {
                    let permit = pool.acquire().unwrap();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    assert!(pool.in_use() <= CAPACITY);
                    thread::sleep(Duration::from_millis(2));
                    inside.fetch_sub(1, Ordering::SeqCst);
                    permit.release();
                }
            });
        }
    });

    assert!(max_inside.load(Ordering::SeqCst) <= CAPACITY);
    assert_eq!(pool.peak_in_use(), CAPACITY);
    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.stats().granted, (CONTENDERS * 5) as u64);
}

#[test]
fn test_try_acquire_never_exceeds_capacity() {
    let pool = ResourcePool::new(ResourceKind::BarSeat, 2);
    let granted = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..50 {
                    if let Some(permit) = pool.try_acquire().unwrap() {
                        granted.fetch_add(1, Ordering::SeqCst);
                        assert!(pool.in_use() <= 2);
                        drop(permit);
                    }
                }
            });
        }
    });

    let stats = pool.stats();
    assert!(stats.peak_in_use <= 2);
    assert_eq!(stats.in_use, 0);
    assert_eq!(stats.granted, granted.load(Ordering::SeqCst) as u64);
    assert_eq!(stats.granted + stats.rejected, 400);
}

#[test]
fn test_pipeline_respects_every_capacity() {
    let short = DurationRange::new(0.0, 0.002);
    let config = SimulationConfig {
        guest_count: 120,
        worker_count: 32,
        receptionist_capacity: 2,
        bellhop_capacity: 1,
        housekeeper_capacity: 2,
        bar_capacity: 3,
        restaurant_capacity: 4,
        reserving_duration: short,
        check_in_duration: short,
        luggage_duration: short,
        activity_duration: short,
        checkout_duration: short,
        activity_retry_backoff: short,
        activity_selection_max_retries: 50,
        seed: Some(17),
        ..SimulationConfig::default()
    };

    let driver = SimulationDriver::new(config).unwrap();
    let output = driver.run_population().unwrap();
    let run = output.report.run.as_ref().unwrap();

    for pool in &run.pools {
        assert!(
            pool.peak_in_use <= pool.capacity,
            "{} peaked at {} with capacity {}",
            pool.kind,
            pool.peak_in_use,
            pool.capacity
        );
        assert_eq!(pool.in_use, 0);
    }
    assert!(run.peak_rooms_assigned <= run.rooms_total);
    assert_eq!(output.report.guest_count, 120);
}
