//! Identity fields: id, name, age and tags.

use super::{pick, TAGS};
use rand::seq::IndexedRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Daniel", "Nancy", "Matthew", "Lisa", "Anthony", "Betty",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Clark",
];

/// Generate an id of the form `p1234`.
pub fn generate_id<R: Rng>(rng: &mut R) -> String {
    format!("p{}", rng.random_range(1000..=9999))
}

/// Generate a full name.
pub fn generate_name<R: Rng>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

/// Generate an age between 18 and 80 inclusive.
pub fn generate_age<R: Rng>(rng: &mut R) -> u8 {
    rng.random_range(18..=80)
}

/// Generate one to three distinct tags.
pub fn generate_tags<R: Rng>(rng: &mut R) -> Vec<String> {
    let count = rng.random_range(1..=3);
    TAGS.choose_multiple(rng, count)
        .map(|tag| tag.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_tags_are_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let tags = generate_tags(&mut rng);
            assert!((1..=3).contains(&tags.len()));
            let unique: HashSet<_> = tags.iter().collect();
            assert_eq!(unique.len(), tags.len());
            assert!(tags.iter().all(|t| TAGS.contains(&t.as_str())));
        }
    }

    #[test]
    fn test_name_has_two_parts() {
        let mut rng = StdRng::seed_from_u64(3);
        let name = generate_name(&mut rng);

        assert_eq!(name.split(' ').count(), 2);
    }
}
