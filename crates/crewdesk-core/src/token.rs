//! Opaque random tokens for private profile links and admin sessions.

use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

fn random_bytes() -> [u8; 32] {
  let mut buf = [0u8; 32];
  OsRng.fill_bytes(&mut buf);
  buf
}

/// A new private profile token: 64 lowercase hex characters.
///
/// The passport is mixed in so two tokens minted in the same instant for
/// different crew members still differ even if the RNG were to repeat.
pub fn new_profile_token(passport: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(passport.as_bytes());
  hasher.update(b"_");
  hasher.update(random_bytes());
  hex::encode(hasher.finalize())
}

/// A new session identifier: 64 lowercase hex characters.
pub fn new_session_id() -> String { hex::encode(random_bytes()) }

/// Compare two secrets without short-circuiting on the first mismatch.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
  if a.len() != b.len() {
    return false;
  }
  a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn profile_tokens_are_hex_and_distinct() {
    let a = new_profile_token("P12345");
    let b = new_profile_token("P12345");
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
  }

  #[test]
  fn session_ids_are_distinct() {
    assert_ne!(new_session_id(), new_session_id());
  }

  #[test]
  fn constant_time_eq_matches_slice_eq() {
    assert!(constant_time_eq(b"abc", b"abc"));
    assert!(!constant_time_eq(b"abc", b"abd"));
    assert!(!constant_time_eq(b"abc", b"ab"));
  }
}
