//! Consistent hashing for experiment group assignment
//!
//! Ensures the same participant always lands in the same group for a given
//! experiment, across processes and releases.

use sha2::{Digest, Sha256};

/// Consistent hasher for experiment assignments
#[derive(Debug, Clone, Copy)]
pub struct ConsistentHasher;

impl ConsistentHasher {
    /// Generate a deterministic 64-bit hash for a participant and experiment.
    ///
    /// The first 8 bytes of SHA-256 over `salt \0 experiment \0 participant`,
    /// read big-endian. An absent salt hashes as the empty string.
    pub fn hash_assignment(salt: Option<&str>, experiment_name: &str, participant_id: &str) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(salt.unwrap_or_default().as_bytes());
        hasher.update([0u8]);
        hasher.update(experiment_name.as_bytes());
        hasher.update([0u8]);
        hasher.update(participant_id.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(bytes)
    }

    /// Map a hash uniformly into [0, 1)
    pub fn unit_interval(hash: u64) -> f64 {
        // 53 high bits fit an f64 mantissa exactly
        (hash >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_hash_same_input() {
        let hash1 = ConsistentHasher::hash_assignment(None, "exp-1", "u1");
        let hash2 = ConsistentHasher::hash_assignment(None, "exp-1", "u1");
        assert_eq!(hash1, hash2, "Same inputs should produce same hash");
    }

    #[test]
    fn test_salt_changes_hash() {
        let plain = ConsistentHasher::hash_assignment(None, "exp-1", "u1");
        let salted = ConsistentHasher::hash_assignment(Some("s3cr3t"), "exp-1", "u1");
        assert_ne!(plain, salted);
    }

    #[test]
    fn test_fields_are_separated() {
        // "ab" + "c" must not collide with "a" + "bc"
        let h1 = ConsistentHasher::hash_assignment(None, "ab", "c");
        let h2 = ConsistentHasher::hash_assignment(None, "a", "bc");
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_unit_interval_bounds() {
        assert_eq!(ConsistentHasher::unit_interval(0), 0.0);
        assert!(ConsistentHasher::unit_interval(u64::MAX) < 1.0);
    }

    #[test]
    fn test_hash_distribution() {
        let mut buckets = [0u32; 10];

        for i in 0..1000 {
            let hash = ConsistentHasher::hash_assignment(None, "exp-1", &format!("key-{}", i));
            let bucket = (ConsistentHasher::unit_interval(hash) * 10.0) as usize;
            buckets[bucket] += 1;
        }

        for count in buckets {
            assert!(count > 50, "Bucket has too few items: {}", count);
            assert!(count < 150, "Bucket has too many items: {}", count);
        }
    }

    #[test]
    fn test_determinism_across_calls() {
        let first = ConsistentHasher::hash_assignment(Some("salt"), "pricing-v2", "user-12345");

        for _ in 0..100 {
            let hash = ConsistentHasher::hash_assignment(Some("salt"), "pricing-v2", "user-12345");
            assert_eq!(hash, first, "Hash should be deterministic");
        }
    }
}
