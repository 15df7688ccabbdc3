//! Printable key generation for the AES-GCM cipher
//!
//! Each character is drawn independently by reducing one random byte modulo
//! the alphabet size. With 94 symbols and 256 byte values the first 68
//! symbols are slightly more likely than the rest. That bias is tolerable for
//! a teaching tool but this generator must not be reused where key strength
//! matters.

use crate::aead::VALID_KEY_SIZES;
use crate::error::CipherError;
use crate::random::{OsRandom, RandomSource};

/// The 94 printable, non-space ASCII characters
pub const KEY_ALPHABET: &[u8; 94] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
abcdefghijklmnopqrstuvwxyz\
0123456789\
!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Generate a printable key of `length` bytes from the OS CSPRNG
///
/// # Errors
///
/// Returns `CipherError::InvalidKeyLength` unless `length` is 16, 24 or 32.
pub fn generate_key(length: usize) -> Result<String, CipherError> {
    generate_key_with(length, &OsRandom)
}

/// Generate a printable key using an explicit random source
pub fn generate_key_with(length: usize, rng: &dyn RandomSource) -> Result<String, CipherError> {
    if !VALID_KEY_SIZES.contains(&length) {
        return Err(CipherError::InvalidKeyLength { actual: length });
    }

    let mut random = vec![0u8; length];
    rng.fill_bytes(&mut random);

    Ok(random
        .iter()
        .map(|&b| char::from(KEY_ALPHABET[usize::from(b) % KEY_ALPHABET.len()]))
        .collect())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::aead;
    use crate::random::FixedRandom;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_is_printable_and_unique() {
        let unique: HashSet<u8> = KEY_ALPHABET.iter().copied().collect();
        assert_eq!(unique.len(), 94);
        assert!(KEY_ALPHABET.iter().all(u8::is_ascii_graphic));
    }

    #[test]
    fn test_generated_lengths() {
        for len in VALID_KEY_SIZES {
            let key = generate_key(len).unwrap();
            assert_eq!(key.len(), len);
            assert_eq!(key.chars().count(), len);
            assert!(key.bytes().all(|b| KEY_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_rejects_other_lengths() {
        assert_eq!(
            generate_key(8),
            Err(CipherError::InvalidKeyLength { actual: 8 })
        );
        assert!(generate_key(0).is_err());
        assert!(generate_key(64).is_err());
    }

    #[test]
    fn test_modulo_mapping_is_deterministic() {
        // 0 -> 'A', 1 -> 'B', 94 wraps to 'A', 255 % 94 = 67 -> '&'
        let key = generate_key_with(16, &FixedRandom::new([0, 1, 94, 255])).unwrap();
        assert_eq!(key, "ABA&ABA&ABA&ABA&");
    }

    #[test]
    fn test_generated_key_works_with_aes() {
        let key = generate_key(32).unwrap();
        let payload = aead::encrypt("generated", &key).unwrap();
        assert_eq!(aead::decrypt(&payload, &key).unwrap(), "generated");
    }
}
