//! UART byte link between the two nodes.
//!
//! 9600 baud, 8 data bits, even parity, 1 stop bit.  Reads block until a
//! byte arrives; there is no framing beyond the single-byte handshake.

use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::{Uart, UartDriver, config};
use esp_idf_hal::units::Hertz;

use crate::error::LinkError;
use crate::protocol::ByteLink;

pub struct UartLink<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartLink<'d> {
    pub fn new(
        uart: impl Peripheral<P = impl Uart> + 'd,
        tx: impl Peripheral<P = impl OutputPin> + 'd,
        rx: impl Peripheral<P = impl InputPin> + 'd,
        baud: u32,
    ) -> Result<Self, LinkError> {
        let cfg = config::Config::new()
            .baudrate(Hertz(baud))
            .data_bits(config::DataBits::DataBits8)
            .parity_even()
            .stop_bits(config::StopBits::STOP1);
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &cfg,
        )
        .map_err(|e| LinkError::Driver(e.code()))?;
        Ok(Self { uart })
    }
}

impl ByteLink for UartLink<'_> {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        let mut sent = 0;
        while sent == 0 {
            sent = self
                .uart
                .write(&[byte])
                .map_err(|e| LinkError::Driver(e.code()))?;
        }
        Ok(())
    }

    fn receive_byte(&mut self) -> Result<u8, LinkError> {
        let mut buf = [0u8; 1];
        loop {
            let n = self
                .uart
                .read(&mut buf, BLOCK)
                .map_err(|e| LinkError::Driver(e.code()))?;
            if n == 1 {
                return Ok(buf[0]);
            }
        }
    }
}
