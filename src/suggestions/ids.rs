//! Fallback place-id generation
//!
//! Some providers omit a stable identifier on individual records. Adapters
//! synthesize one through an [`IdGenerator`] so that `place_id` is never
//! empty. The default, [`HashIds`], hashes the raw record and is therefore
//! reproducible across runs; [`RandomIds`] keeps the quick unseeded
//! alternative isolated behind the same trait for callers that want it.

use rand::Rng;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Source of synthesized place ids.
pub trait IdGenerator: Send + Sync {
    /// Produce a non-empty id for a provider-native record.
    fn place_id(&self, raw: &Value) -> String;
}

/// Deterministic ids: a truncated SHA-256 over the serialized record.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashIds;

impl IdGenerator for HashIds {
    fn place_id(&self, raw: &Value) -> String {
        let mut hasher = Sha256::new();
        hasher.update(raw.to_string().as_bytes());
        let digest = hasher.finalize();
        // 16 hex chars is plenty for uniqueness within one result list.
        digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// Unseeded random ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn place_id(&self, _raw: &Value) -> String {
        let n: u64 = rand::thread_rng().gen();
        format!("{:016x}", n)
    }
}
