pub mod manager;
pub mod models;
pub mod repositories;

pub use manager::{DatabaseError, DatabaseManager};

use rand::distributions::{Alphanumeric, DistString};

/// Generate a prefixed identifier such as `playlist-3fA9k0QzL1xPq7Rt`
pub fn new_id(prefix: &str) -> String {
    let suffix = Alphanumeric.sample_string(&mut rand::thread_rng(), 16);
    format!("{}-{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_and_distinct() {
        let a = new_id("playlist");
        let b = new_id("playlist");
        assert!(a.starts_with("playlist-"));
        assert_eq!(a.len(), "playlist-".len() + 16);
        assert_ne!(a, b);
    }
}
