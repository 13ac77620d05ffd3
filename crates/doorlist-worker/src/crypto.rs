use std::num::NonZeroU32;

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};

const OUTPUT_LEN: usize = 32;

/// Iteration count applied to newly stored event passcodes.
pub const PASSCODE_ITERATIONS: u32 = 100_000;

/// Derive the stored passcode hash.
///
/// Guests submit the passcode in the clear (over TLS), so the server-side
/// PBKDF2 layer is the only KDF: each event carries its own random salt and
/// the iteration count the hash was derived with.
pub fn hash_passcode(secret: &[u8], salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut out = vec![0u8; OUTPUT_LEN];
    let iterations = NonZeroU32::new(iterations).expect("Iterations must be non-zero");
    pbkdf2_hmac::<Sha256>(secret, salt, iterations.get(), &mut out);
    out
}

pub fn verify_passcode(secret: &[u8], salt: &[u8], expected: &[u8], iterations: u32) -> bool {
    let Some(iterations) = NonZeroU32::new(iterations) else {
        return false;
    };
    if expected.len() != OUTPUT_LEN {
        return false;
    }

    // Derive and constant-time compare.
    let mut out = vec![0u8; OUTPUT_LEN];
    pbkdf2_hmac::<Sha256>(secret, salt, iterations.get(), &mut out);
    subtle::ConstantTimeEq::ct_eq(out.as_ref(), expected).into()
}

/// Constant-time comparison for the process-wide admin code.
///
/// Both sides are hashed before comparing, so the comparison runs over a
/// fixed length regardless of what was supplied.
pub fn verify_shared_code(supplied: &str, expected: &str) -> bool {
    let a = Sha256::digest(supplied.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    subtle::ConstantTimeEq::ct_eq(a.as_slice(), b.as_slice()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn passcode_round_trip() {
        let salt = b"0123456789abcdef0123456789abcdef";
        let hash = hash_passcode(b"GALA24", salt, TEST_ITERATIONS);

        assert!(verify_passcode(b"GALA24", salt, &hash, TEST_ITERATIONS));
        assert!(!verify_passcode(b"GALA25", salt, &hash, TEST_ITERATIONS));
    }

    #[test]
    fn wrong_salt_fails() {
        let hash = hash_passcode(b"secret", b"salt-a", TEST_ITERATIONS);
        assert!(!verify_passcode(b"secret", b"salt-b", &hash, TEST_ITERATIONS));
    }

    #[test]
    fn wrong_iteration_count_fails() {
        let salt = b"salt";
        let hash = hash_passcode(b"secret", salt, TEST_ITERATIONS);
        assert!(!verify_passcode(b"secret", salt, &hash, TEST_ITERATIONS + 1));
    }

    #[test]
    fn malformed_stored_hash_fails() {
        assert!(!verify_passcode(b"secret", b"salt", b"short", TEST_ITERATIONS));
        assert!(!verify_passcode(b"secret", b"salt", &[0u8; OUTPUT_LEN], 0));
    }

    #[test]
    fn shared_code_comparison() {
        assert!(verify_shared_code("letmein", "letmein"));
        assert!(!verify_shared_code("letmein", "letmeout"));
        // Length mismatch must not be special-cased.
        assert!(!verify_shared_code("a", "a-much-longer-code"));
        assert!(verify_shared_code("", ""));
    }
}
