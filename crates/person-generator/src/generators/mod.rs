//! Field generators for person records.
//!
//! Each submodule produces one part of a record from the caller's RNG.
//! The value pools below are fixed; locale-specific text is not modelled.

pub mod contact;
pub mod identity;
pub mod metadata;

use rand::Rng;

/// Tags attached to a person.
pub const TAGS: &[&str] = &[
    "employee",
    "contractor",
    "customer",
    "vendor",
    "partner",
    "manager",
    "developer",
    "designer",
    "marketing",
    "sales",
    "support",
    "finance",
    "hr",
    "operations",
    "executive",
];

/// Departments used in employee metadata.
pub const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Marketing",
    "Sales",
    "Support",
    "Finance",
    "HR",
    "Operations",
    "Executive",
    "Product",
    "Design",
    "Research",
    "Legal",
    "IT",
    "Customer Success",
];

/// Pick one entry from a non-empty pool.
pub(crate) fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.random_range(0..pool.len())]
}

/// Generate a string of exactly `digits` decimal digits (leading zeros allowed).
pub(crate) fn random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    (0..digits)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_digits_length() {
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(random_digits(&mut rng, 0), "");
        let s = random_digits(&mut rng, 10);
        assert_eq!(s.len(), 10);
        assert!(s.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_pick_from_pool() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            assert!(TAGS.contains(&pick(&mut rng, TAGS)));
        }
    }
}
