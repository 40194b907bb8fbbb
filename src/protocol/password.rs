//! Fixed-length numeric password.

use crate::error::ProtocolError;

use super::PASSWORD_LEN;

/// Five decimal digits.  Equality is element-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Password([u8; PASSWORD_LEN]);

impl Password {
    /// Build from digits, rejecting any value above 9.
    pub fn new(digits: [u8; PASSWORD_LEN]) -> Result<Self, ProtocolError> {
        match digits.iter().find(|&&d| d > 9) {
            Some(&bad) => Err(ProtocolError::InvalidDigit(bad)),
            None => Ok(Self(digits)),
        }
    }

    /// Decode a raw block received from the link.
    pub fn from_wire(block: &[u8; PASSWORD_LEN]) -> Result<Self, ProtocolError> {
        Self::new(*block)
    }

    pub const fn digits(&self) -> &[u8; PASSWORD_LEN] {
        &self.0
    }
}

impl core::fmt::Display for Password {
    /// Masked: a password never reaches the log in clear.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("*****")
    }
}
