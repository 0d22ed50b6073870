//! Room uniqueness and conservation
//!
//! At every instant each room is either available or held by exactly one
//! guest, and the two sets together make up the whole inventory.

use hotel_guest_simulator::resources::{InventoryError, RoomInventory};
use hotel_guest_simulator::types::{GuestId, RoomCode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_guests_never_share_a_room() {
    let inventory = RoomInventory::with_layout(1, 4, &mut StdRng::seed_from_u64(9));
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        // Watcher checking the partition while guests churn through rooms
        let watcher = scope.spawn(|| {
            let mut checks = 0;
            while !done.load(Ordering::SeqCst) {
                assert!(inventory.snapshot().is_partition_of(inventory.rooms()));
                checks += 1;
                thread::yield_now();
            }
            checks
        });

        let guests: Vec<_> = (0..12)
            .map(|_| {
                let inventory = &inventory;
                scope.spawn(move || {
                    let guest = GuestId::new();
                    for _ in 0..10 {
                        let room = inventory.take(guest).unwrap();
                        assert_eq!(inventory.holder_of(room), Some(guest));
                        thread::sleep(Duration::from_micros(200));
                        inventory.give_back(room, guest).unwrap();
                    }
                })
            })
            .collect();

        for guest in guests {
            guest.join().unwrap();
        }
        done.store(true, Ordering::SeqCst);
        assert!(watcher.join().unwrap() > 0);
    });

    assert_eq!(inventory.available_count(), 4);
    assert_eq!(inventory.assigned_count(), 0);
    assert!(inventory.peak_assigned() <= 4);
}

#[test]
fn test_keys_return_rooms_on_drop() {
    let inventory = RoomInventory::new(RoomCode::layout(1, 2));
    let guest = GuestId::new();

    {
        let key = inventory.check_out_key(guest).unwrap();
        assert_eq!(inventory.holder_of(key.room()), Some(guest));
        assert_eq!(inventory.available_count(), 1);
    }

    assert_eq!(inventory.available_count(), 2);
    assert!(inventory.snapshot().is_partition_of(inventory.rooms()));
}

#[test]
fn test_misuse_is_rejected_without_corruption() {
    let inventory = RoomInventory::new(RoomCode::layout(2, 2));
    let holder = GuestId::new();
    let intruder = GuestId::new();
    let room = inventory.take(holder).unwrap();

    assert!(matches!(
        inventory.give_back(room, intruder),
        Err(InventoryError::InvalidRelease { .. })
    ));
    assert!(matches!(
        inventory.give_back(RoomCode::new(9, 9), holder),
        Err(InventoryError::UnknownRoom(_))
    ));

    inventory.give_back(room, holder).unwrap();
    assert!(matches!(
        inventory.give_back(room, holder),
        Err(InventoryError::InvalidRelease { .. })
    ));
    assert!(inventory.snapshot().is_partition_of(inventory.rooms()));
}

#[test]
fn test_blocked_take_resumes_after_return() {
    let inventory = RoomInventory::new(vec![RoomCode::new(1, 0)]);
    let first = GuestId::new();
    let second = GuestId::new();
    let room = inventory.take(first).unwrap();

    thread::scope(|scope| {
        let waiter = scope.spawn(|| inventory.take(second));
        thread::sleep(Duration::from_millis(50));
        inventory.give_back(room, first).unwrap();
        assert_eq!(waiter.join().unwrap(), Ok(room));
    });

    assert_eq!(inventory.holder_of(room), Some(second));
}
