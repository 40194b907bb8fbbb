//! Byte link abstraction and the ready handshake built on it.
//!
//! Concrete implementations:
//! - UART (`adapters::uart_link`, on device)
//! - in-process channel pair (`adapters::sim_link`, host tests)
//! - scripted replay (`adapters::sim_link::ReplayLink`, tests and fuzzing)
//!
//! The controller and the prompt agent are generic over `ByteLink`, so a
//! new transport requires zero changes to the protocol logic.

use log::trace;

use crate::error::LinkError;

use super::{Message, PASSWORD_LEN, READY};

/// Blocking, full-duplex byte channel with no framing and no timeout.
pub trait ByteLink {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError>;

    /// Block until one byte arrives.
    fn receive_byte(&mut self) -> Result<u8, LinkError>;

    fn send_block(&mut self, data: &[u8]) -> Result<(), LinkError> {
        data.iter().try_for_each(|&b| self.send_byte(b))
    }

    fn receive_block(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        for slot in buf.iter_mut() {
            *slot = self.receive_byte()?;
        }
        Ok(())
    }
}

impl<L: ByteLink + ?Sized> ByteLink for &mut L {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        (**self).send_byte(byte)
    }

    fn receive_byte(&mut self) -> Result<u8, LinkError> {
        (**self).receive_byte()
    }

    fn send_block(&mut self, data: &[u8]) -> Result<(), LinkError> {
        (**self).send_block(data)
    }

    fn receive_block(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        (**self).receive_block(buf)
    }
}

// ───────────────────────────────────────────────────────────────
// Handshake
// ───────────────────────────────────────────────────────────────

/// Block until the peer signals READY.  Any other byte is discarded.
pub fn wait_ready(link: &mut impl ByteLink) -> Result<(), LinkError> {
    loop {
        let b = link.receive_byte()?;
        if b == READY {
            return Ok(());
        }
        trace!("link: discarding 0x{b:02X} while awaiting READY");
    }
}

/// Wait for the peer's READY, then send one message byte.
pub fn send_message(link: &mut impl ByteLink, msg: Message) -> Result<(), LinkError> {
    wait_ready(link)?;
    link.send_byte(msg.as_byte())
}

/// Signal READY, then block for one raw byte.
///
/// Returns the raw byte so the caller decides how to treat bytes outside
/// the vocabulary.
pub fn receive_message(link: &mut impl ByteLink) -> Result<u8, LinkError> {
    link.send_byte(READY)?;
    link.receive_byte()
}

/// Wait for the peer's READY, then send a 5-digit block.
pub fn send_digits(link: &mut impl ByteLink, digits: &[u8; PASSWORD_LEN]) -> Result<(), LinkError> {
    wait_ready(link)?;
    link.send_block(digits)
}

/// Signal READY, then block for a 5-byte block.  Values are not validated.
pub fn receive_digits(link: &mut impl ByteLink) -> Result<[u8; PASSWORD_LEN], LinkError> {
    link.send_byte(READY)?;
    let mut block = [0u8; PASSWORD_LEN];
    link.receive_block(&mut block)?;
    Ok(block)
}
