//! Classical substitution ciphers: Caesar and Vigenère.
//!
//! Both ciphers only touch ASCII letters. Every other character, including
//! digits, whitespace, punctuation and non-ASCII text, passes through
//! unchanged, and the case of each letter is preserved.
//!
//! ## Security Warning
//!
//! These ciphers are trivially breakable and exist for teaching only.
//!
//! ## Usage
//!
//! ```rust
//! use cyberkit_crypto::classical::{CaesarCipher, VigenereCipher};
//!
//! let caesar = CaesarCipher::new(3);
//! assert_eq!(caesar.encrypt("Hello World"), "Khoor Zruog");
//!
//! let vigenere = VigenereCipher::from_key("KEY").expect("alphabetic key should be accepted");
//! let ciphertext = vigenere.encrypt("Attack at dawn");
//! assert_eq!(vigenere.decrypt(&ciphertext), "Attack at dawn");
//! ```

use crate::cipher::Mode;
use crate::error::CipherError;

/// Number of letters in the Latin alphabet
const ALPHABET_LEN: u8 = 26;

/// Shift a single character forward by `shift` positions (0..26).
///
/// Non-letters are returned unchanged.
fn shift_letter(c: char, shift: u8) -> char {
    let base = if c.is_ascii_uppercase() {
        b'A'
    } else if c.is_ascii_lowercase() {
        b'a'
    } else {
        return c;
    };

    let offset = (c as u8 - base + shift) % ALPHABET_LEN;
    char::from(base + offset)
}

/// Turn a forward shift into the shift that undoes it.
const fn invert(shift: u8) -> u8 {
    (ALPHABET_LEN - shift % ALPHABET_LEN) % ALPHABET_LEN
}

/// Caesar cipher with a fixed integer shift.
///
/// Any integer shift is accepted and reduced modulo 26, so a shift of 26 or
/// -26 is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaesarCipher {
    /// Forward shift, always in 0..26
    shift: u8,
}

impl CaesarCipher {
    /// Create a cipher from an integer shift
    pub fn new(shift: i64) -> Self {
        Self {
            shift: shift.rem_euclid(i64::from(ALPHABET_LEN)) as u8,
        }
    }

    /// Parse the shift from a key string
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidShift` if the trimmed key is not an integer.
    pub fn from_key(key: &str) -> Result<Self, CipherError> {
        key.trim()
            .parse::<i64>()
            .map(Self::new)
            .map_err(|_| CipherError::InvalidShift(key.to_string()))
    }

    /// The normalized forward shift (0..26)
    pub const fn shift(&self) -> u8 {
        self.shift
    }

    /// Encrypt text
    pub fn encrypt(&self, text: &str) -> String {
        self.apply(text, Mode::Encrypt)
    }

    /// Decrypt text
    pub fn decrypt(&self, text: &str) -> String {
        self.apply(text, Mode::Decrypt)
    }

    /// Run the cipher in the given direction
    pub fn apply(&self, text: &str, mode: Mode) -> String {
        let shift = match mode {
            Mode::Encrypt => self.shift,
            Mode::Decrypt => invert(self.shift),
        };
        text.chars().map(|c| shift_letter(c, shift)).collect()
    }
}

/// Vigenère cipher keyed by an alphabetic keyword.
///
/// The key is case-insensitive. The key cursor advances only when a letter of
/// the input is consumed; non-letters are copied through and do not use up a
/// key position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VigenereCipher {
    /// Per-position forward shifts derived from the key letters
    shifts: Vec<u8>,
}

impl VigenereCipher {
    /// Create a cipher from a keyword
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidVigenereKey` if the key is empty or holds
    /// anything other than ASCII letters.
    pub fn from_key(key: &str) -> Result<Self, CipherError> {
        if key.is_empty() || !key.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(CipherError::InvalidVigenereKey);
        }

        let shifts = key.bytes().map(|b| b.to_ascii_lowercase() - b'a').collect();
        Ok(Self { shifts })
    }

    /// Encrypt text
    pub fn encrypt(&self, text: &str) -> String {
        self.apply(text, Mode::Encrypt)
    }

    /// Decrypt text
    pub fn decrypt(&self, text: &str) -> String {
        self.apply(text, Mode::Decrypt)
    }

    /// Run the cipher in the given direction
    pub fn apply(&self, text: &str, mode: Mode) -> String {
        let mut cursor = 0usize;
        text.chars()
            .map(|c| {
                if !c.is_ascii_alphabetic() {
                    return c;
                }
                let shift = self.shifts[cursor];
                cursor = (cursor + 1) % self.shifts.len();
                match mode {
                    Mode::Encrypt => shift_letter(c, shift),
                    Mode::Decrypt => shift_letter(c, invert(shift)),
                }
            })
            .collect()
    }
}
