//! The full set of shared resources for one simulation run

use crate::resources::{PoolStats, ResourcePool, RoomInventory, ShutdownSignal};
use crate::types::{ResourceKind, SimulationConfig};
use rand::Rng;
use tracing::info;

/// Every pool, the room inventory, and the shutdown latch of one hotel
///
/// Owned by the simulation driver and lent to each guest pipeline by reference.
#[derive(Debug)]
pub struct HotelResources {
    /// Front desk staff
    pub receptionists: ResourcePool,
    /// Luggage porters
    pub bellhops: ResourcePool,
    /// Room service and housekeeping staff
    pub housekeepers: ResourcePool,
    /// Bar seats
    pub bar: ResourcePool,
    /// Restaurant seats
    pub restaurant: ResourcePool,
    /// Physical rooms
    pub rooms: RoomInventory,
    /// Run-wide shutdown latch
    pub shutdown: ShutdownSignal,
}

impl HotelResources {
    /// Build the pools and the shuffled room inventory described by `config`
    pub fn from_config<R: Rng>(config: &SimulationConfig, rng: &mut R) -> Self {
        let resources = Self {
            receptionists: ResourcePool::new(
                ResourceKind::Receptionist,
                config.receptionist_capacity,
            ),
            bellhops: ResourcePool::new(ResourceKind::Bellhop, config.bellhop_capacity),
            housekeepers: ResourcePool::new(ResourceKind::Housekeeper, config.housekeeper_capacity),
            bar: ResourcePool::new(ResourceKind::BarSeat, config.bar_capacity),
            restaurant: ResourcePool::new(
                ResourceKind::RestaurantSeat,
                config.restaurant_capacity,
            ),
            rooms: RoomInventory::with_layout(config.floors, config.rooms_per_floor, rng),
            shutdown: ShutdownSignal::new(),
        };

        info!(
            receptionists = config.receptionist_capacity,
            bellhops = config.bellhop_capacity,
            housekeepers = config.housekeeper_capacity,
            bar = config.bar_capacity,
            restaurant = config.restaurant_capacity,
            rooms = resources.rooms.len(),
            "Hotel resources created"
        );
        resources
    }

    /// The pool gating a given resource kind
    pub fn pool(&self, kind: ResourceKind) -> &ResourcePool {
        match kind {
            ResourceKind::Receptionist => &self.receptionists,
            ResourceKind::Bellhop => &self.bellhops,
            ResourceKind::Housekeeper => &self.housekeepers,
            ResourceKind::BarSeat => &self.bar,
            ResourceKind::RestaurantSeat => &self.restaurant,
        }
    }

    /// Counters for every pool, in `ResourceKind::ALL` order
    pub fn pool_stats(&self) -> Vec<PoolStats> {
        ResourceKind::ALL.iter().map(|kind| self.pool(*kind).stats()).collect()
    }

    /// Trigger shutdown, close every pool and the inventory
    pub fn close_all(&self) {
        self.shutdown.trigger();
        for kind in ResourceKind::ALL {
            self.pool(kind).close();
        }
        self.rooms.close();
    }

    /// Whether shutdown has been triggered
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_triggered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_resources_match_config() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let resources = HotelResources::from_config(&config, &mut rng);

        assert_eq!(resources.receptionists.capacity(), 6);
        assert_eq!(resources.bellhops.capacity(), 5);
        assert_eq!(resources.housekeepers.capacity(), 15);
        assert_eq!(resources.bar.capacity(), 50);
        assert_eq!(resources.restaurant.capacity(), 150);
        assert_eq!(resources.rooms.len(), 33);

        for kind in ResourceKind::ALL {
            assert_eq!(resources.pool(kind).kind(), kind);
        }
        assert_eq!(resources.pool_stats().len(), 5);
    }

    #[test]
    fn test_close_all() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let resources = HotelResources::from_config(&config, &mut rng);

        resources.close_all();
        assert!(resources.is_shut_down());
        assert!(resources.rooms.is_closed());
        for kind in ResourceKind::ALL {
            assert!(resources.pool(kind).is_closed());
        }
    }
}
