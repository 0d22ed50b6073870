//! Guest generation
//!
//! Creates the guest population before the simulation starts.

use crate::guest::Guest;
use chrono::{Datelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Probability that a generated guest arrives with luggage
pub const LUGGAGE_PROBABILITY: f64 = 0.5;

/// Generator for the guest population
#[derive(Debug)]
pub struct GuestGenerator {
    rng: StdRng,
    year: i32,
}

impl GuestGenerator {
    /// Create a generator seeded from entropy
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy(), year: Utc::now().year() }
    }

    /// Create a generator with a deterministic seed
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), year: Utc::now().year() }
    }

    /// Create a generator from an optional seed
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    /// Generate `count` guests numbered from 1
    pub fn generate_guests(&mut self, count: usize) -> Vec<Guest> {
        let guests: Vec<Guest> = (1..=count).map(|number| self.generate_guest(number)).collect();

        info!(
            "Generated {} guests ({} with luggage)",
            guests.len(),
            guests.iter().filter(|g| g.has_luggage).count()
        );
        guests
    }

    /// Generate a single guest
    pub fn generate_guest(&mut self, number: usize) -> Guest {
        let has_luggage = self.rng.gen_bool(LUGGAGE_PROBABILITY);
        let guest = Guest::new(number, format!("GST{}{}", self.year, number), has_luggage);
        debug!(guest = %guest.id, name = %guest.name, has_luggage, "Guest created");
        guest
    }
}

impl Default for GuestGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generates_requested_count() {
        let mut generator = GuestGenerator::with_seed(1);
        let guests = generator.generate_guests(25);

        assert_eq!(guests.len(), 25);
        let numbers: Vec<_> = guests.iter().map(|g| g.number).collect();
        assert_eq!(numbers, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_ids_and_names_unique() {
        let mut generator = GuestGenerator::with_seed(1);
        let guests = generator.generate_guests(100);

        let ids: HashSet<_> = guests.iter().map(|g| g.id).collect();
        let names: HashSet<_> = guests.iter().map(|g| g.name.clone()).collect();
        assert_eq!(ids.len(), 100);
        assert_eq!(names.len(), 100);
        assert!(guests[0].name.starts_with("GST"));
        assert!(guests[0].name.ends_with('1'));
    }

    #[test]
    fn test_seed_makes_luggage_reproducible() {
        let a: Vec<_> =
            GuestGenerator::with_seed(42).generate_guests(50).iter().map(|g| g.has_luggage).collect();
        let b: Vec<_> =
            GuestGenerator::with_seed(42).generate_guests(50).iter().map(|g| g.has_luggage).collect();
        assert_eq!(a, b);
        // with 50 fair draws, both outcomes should appear
        assert!(a.iter().any(|l| *l));
        assert!(a.iter().any(|l| !*l));
    }

    #[test]
    fn test_zero_guests() {
        assert!(GuestGenerator::with_seed(0).generate_guests(0).is_empty());
    }
}
