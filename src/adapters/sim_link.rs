//! In-process byte links for host tests, simulations and fuzzing.
//!
//! - [`SimLink`]: one end of a full-duplex channel pair; two threads can
//!   run the control node and the keypad node against each other.
//! - [`ReplayLink`]: replays a fixed inbound script and records outbound
//!   bytes.  Running out of script reads as a closed link.

use std::sync::mpsc::{Receiver, Sender, channel};

use log::trace;

use crate::error::LinkError;
use crate::protocol::ByteLink;

// ── Channel pair ──────────────────────────────────────────────

pub struct SimLink {
    tx: Sender<u8>,
    rx: Receiver<u8>,
    name: &'static str,
}

impl SimLink {
    /// Two connected ends: bytes sent on one are received on the other.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = channel();
        let (b_tx, a_rx) = channel();
        (
            Self {
                tx: a_tx,
                rx: a_rx,
                name: "a",
            },
            Self {
                tx: b_tx,
                rx: b_rx,
                name: "b",
            },
        )
    }
}

impl ByteLink for SimLink {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        trace!("sim_link[{}]: -> 0x{:02X}", self.name, byte);
        self.tx.send(byte).map_err(|_| LinkError::Closed)
    }

    fn receive_byte(&mut self) -> Result<u8, LinkError> {
        let byte = self.rx.recv().map_err(|_| LinkError::Closed)?;
        trace!("sim_link[{}]: <- 0x{:02X}", self.name, byte);
        Ok(byte)
    }
}

// ── Scripted replay ───────────────────────────────────────────

pub struct ReplayLink {
    inbound: Vec<u8>,
    pos: usize,
    sent: Vec<u8>,
}

impl ReplayLink {
    pub fn new(inbound: &[u8]) -> Self {
        Self {
            inbound: inbound.to_vec(),
            pos: 0,
            sent: Vec::new(),
        }
    }

    /// Every byte sent so far.
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    /// The whole inbound script has been consumed.
    pub fn exhausted(&self) -> bool {
        self.pos >= self.inbound.len()
    }
}

impl ByteLink for ReplayLink {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        self.sent.push(byte);
        Ok(())
    }

    fn receive_byte(&mut self) -> Result<u8, LinkError> {
        let byte = *self.inbound.get(self.pos).ok_or(LinkError::Closed)?;
        self.pos += 1;
        Ok(byte)
    }
}
