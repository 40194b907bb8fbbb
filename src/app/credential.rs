//! Durable credential record: a presence flag plus a 5-digit block.
//!
//! ```text
//!   presence_address  : 0x11 (CredentialExists) | anything else = none
//!   password_address  : d0 d1 d2 d3 d4
//! ```
//!
//! A commit writes the block, settles, then sets the flag.  On a first
//! enrollment an interrupted commit therefore leaves no flag.  Replacing
//! an existing credential is not atomic: the flag is already present, so
//! a cut during the block write leaves it over a partly written block that
//! matches neither the old password nor the new one.  The caller demotes
//! the record when it sees the failure, but a power cut gives it no chance.

use crate::config::LockConfig;
use crate::error::StoreError;
use crate::protocol::{Message, PASSWORD_LEN, Password};

use super::ports::CredentialStore;

/// Typed view over the two fixed store locations.
pub struct CredentialRecord<S> {
    store: S,
    presence_address: u16,
    password_address: u16,
}

impl<S: CredentialStore> CredentialRecord<S> {
    pub fn new(store: S, config: &LockConfig) -> Self {
        Self {
            store,
            presence_address: config.presence_address,
            password_address: config.password_address,
        }
    }

    /// Read the presence flag.
    pub fn is_present(&mut self) -> Result<bool, StoreError> {
        let flag = self.store.read_byte(self.presence_address)?;
        Ok(flag == Message::CredentialExists.as_byte())
    }

    /// Read the raw stored block.  Values are not validated: an erased or
    /// corrupted block simply never matches a well-formed password.
    pub fn load(&mut self) -> Result<[u8; PASSWORD_LEN], StoreError> {
        let mut block = [0u8; PASSWORD_LEN];
        self.store.read_block(self.password_address, &mut block)?;
        Ok(block)
    }

    /// Durably store `password` and mark the record present.
    pub fn commit(&mut self, password: &Password) -> Result<(), StoreError> {
        self.store
            .write_block(self.password_address, password.digits())?;
        self.store.settle();
        self.store.write_byte(
            self.presence_address,
            Message::CredentialExists.as_byte(),
        )
    }

    /// Mark the record absent.  The stored block is left in place.
    pub fn demote(&mut self) -> Result<(), StoreError> {
        self.store
            .write_byte(self.presence_address, Message::NoCredential.as_byte())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
