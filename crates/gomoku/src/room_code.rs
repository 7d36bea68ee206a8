//! Six-digit room codes.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

/// The code a joiner presents to reach a host, e.g. `482913`.
///
/// Always exactly six ASCII digits with no leading zero, so it reads the
/// same when spoken aloud or typed on a phone keypad.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

impl RoomCode {
    /// Draws a fresh random code.
    pub fn generate() -> Self {
        let n: u32 = rand::rng().random_range(100_000..1_000_000);
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returned when a string is not a valid room code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("room code must be six digits, got {0:?}")]
pub struct InvalidRoomCode(pub String);

impl FromStr for RoomCode {
    type Err = InvalidRoomCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = s.len() == 6
            && s.bytes().all(|b| b.is_ascii_digit())
            && !s.starts_with('0');
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidRoomCode(s.to_string()))
        }
    }
}
