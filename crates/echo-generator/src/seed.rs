use std::{fmt, str::FromStr};

/// A 256-bit seed that reproduces a shuffle.
///
/// Seeds render as 64 lowercase hex characters and parse back from the same
/// form (either case).
///
/// # Examples
///
/// ```
/// use echo_generator::ShuffleSeed;
///
/// let seed = ShuffleSeed::random();
/// let parsed: ShuffleSeed = seed.to_string().parse()?;
/// assert_eq!(seed, parsed);
/// # Ok::<(), echo_generator::SeedParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShuffleSeed([u8; 32]);

impl ShuffleSeed {
    /// Creates a seed from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Draws a seed from the thread-local RNG.
    #[must_use]
    pub fn random() -> Self {
        use rand::Rng as _;

        let mut bytes = [0; 32];
        rand::rng().fill(&mut bytes);
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ShuffleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Errors returned when parsing a [`ShuffleSeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    /// The text is not exactly 64 characters long.
    #[display("seed must be 64 hex characters, got {len}")]
    InvalidLength {
        /// Length of the rejected text.
        len: usize,
    },
    /// The text contains a character that is not a hex digit.
    #[display("invalid hex digit {ch:?} in seed")]
    InvalidHexDigit {
        /// The rejected character.
        ch: char,
    },
}

impl FromStr for ShuffleSeed {
    type Err = SeedParseError;

    #[expect(clippy::cast_possible_truncation)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != 64 {
            return Err(SeedParseError::InvalidLength { len });
        }

        let mut bytes = [0; 32];
        let mut chars = s.chars();
        for byte in &mut bytes {
            let mut value = 0;
            for _ in 0..2 {
                let ch = chars.next().unwrap_or_default();
                let digit = ch
                    .to_digit(16)
                    .ok_or(SeedParseError::InvalidHexDigit { ch })?;
                value = (value << 4) | digit as u8;
            }
            *byte = value;
        }
        Ok(Self(bytes))
    }
}
