use serde_json::Value;
use sha2::{Digest, Sha256};

/// Truncated-hex length for case hashes. 16 hex chars (64 bits) is ample for
/// the expected case cardinality; `Store::get_or_create_case` still verifies
/// content on a hash hit so a collision surfaces instead of conflating cases.
pub const CASE_HASH_LEN: usize = 16;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Computes the deterministic identity hash of a (instruction, initial state)
/// pair. The state is canonicalized (sorted map keys) before digesting so key
/// order never changes the hash.
pub fn case_hash(instruction: &str, initial_state: &Value) -> String {
    let mut h = Sha256::new();
    h.update(crate::state::canonical(initial_state).as_bytes());
    h.update(b"\n");
    h.update(instruction.as_bytes());
    let mut hex = hex::encode(h.finalize());
    hex.truncate(CASE_HASH_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_under_key_reorder() {
        let a: Value =
            serde_json::from_str(r#"{"nodes":[{"type":"function","x":1}],"edges":[]}"#).unwrap();
        let b: Value =
            serde_json::from_str(r#"{"edges":[],"nodes":[{"x":1,"type":"function"}]}"#).unwrap();
        assert_eq!(case_hash("add a node", &a), case_hash("add a node", &b));
    }

    #[test]
    fn hash_distinguishes_instructions() {
        let s = crate::state::empty_state();
        assert_ne!(case_hash("create a node", &s), case_hash("delete a node", &s));
        assert_eq!(case_hash("create a node", &s).len(), CASE_HASH_LEN);
    }
}
