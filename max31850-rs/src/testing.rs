//! Recording test doubles for the 1-Wire bus and the delay source.

use crate::scratchpad::SCRATCHPAD_LEN;
use embedded_hal::delay::DelayNs;
use embedded_onewire::{Address, OneWire, OneWireCrc, OneWireError, OneWireResult};
use std::{cell::RefCell, rc::Rc};

pub const ROM: Address = Address::new([0x3b, 0x2d, 0x62, 0x18, 0x00, 0x00, 0x00, 0xe8]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Reset,
    Write(u8),
    Read,
    DelayMs(u32),
    DelayNs(u32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, PartialEq, Eq)]
pub struct BusFault;

/// Appends the CRC of `bytes` as the ninth byte.
pub fn with_crc(bytes: [u8; 8]) -> [u8; SCRATCHPAD_LEN] {
    let mut pad = [0; SCRATCHPAD_LEN];
    pad[..8].copy_from_slice(&bytes);
    pad[8] = OneWireCrc::compute(&bytes);
    pad
}

/// A single device bus that answers every read with the next scratchpad byte.
pub struct FakeBus {
    log: EventLog,
    scratchpad: [u8; SCRATCHPAD_LEN],
    cursor: usize,
    reads: usize,
    pub presence: bool,
    pub fail_after_reads: Option<usize>,
}

impl FakeBus {
    pub fn new(scratchpad: [u8; SCRATCHPAD_LEN]) -> (Self, EventLog) {
        let log = EventLog::default();
        let bus = Self {
            log: log.clone(),
            scratchpad,
            cursor: 0,
            reads: 0,
            presence: true,
            fail_after_reads: None,
        };
        (bus, log)
    }
}

impl OneWire for FakeBus {
    type Status = bool;
    type BusError = BusFault;

    fn reset(&mut self) -> OneWireResult<bool, BusFault> {
        self.log.borrow_mut().push(Event::Reset);
        self.cursor = 0;
        Ok(self.presence)
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), BusFault> {
        self.log.borrow_mut().push(Event::Write(byte));
        Ok(())
    }

    fn read_byte(&mut self) -> OneWireResult<u8, BusFault> {
        self.log.borrow_mut().push(Event::Read);
        if self.fail_after_reads == Some(self.reads) {
            return Err(OneWireError::Other(BusFault));
        }
        self.reads += 1;
        let byte = self.scratchpad[self.cursor % SCRATCHPAD_LEN];
        self.cursor += 1;
        Ok(byte)
    }
}

pub struct FakeDelay {
    log: EventLog,
}

impl FakeDelay {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}
