//! Recording stubs for the pin and bus collaborators.
//!
//! Every acquire, release, open and probe lands in one shared event log so
//! tests can assert on ordering across collaborators.
#![allow(dead_code)]

use std::{cell::RefCell, collections::HashSet, convert::Infallible, rc::Rc};

use embedded_hal::{
    digital::{self, InputPin},
    i2c::{self, ErrorKind, NoAcknowledgeSource, Operation},
};
use raspi_i2c_scanner::{BusOpener, BusSpeed, Line, PinSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Acquire(Line),
    Release(Line),
    Open(BusSpeed),
    Probe(BusSpeed, u8),
    Close(BusSpeed),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, thiserror::Error)]
#[error("stub hardware refused {0}")]
pub struct StubError(pub String);

// ── pins ──────────────────────────────────────────────────────

pub struct StubPins {
    pub scl_high: bool,
    pub sda_high: bool,
    pub unavailable: Option<Line>,
    pub log: EventLog,
}

impl StubPins {
    pub fn new(scl_high: bool, sda_high: bool, log: &EventLog) -> Self {
        Self {
            scl_high,
            sda_high,
            unavailable: None,
            log: Rc::clone(log),
        }
    }
}

pub struct StubPin {
    line: Line,
    high: bool,
    log: EventLog,
}

impl digital::ErrorType for StubPin {
    type Error = Infallible;
}

impl InputPin for StubPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high)
    }
}

impl Drop for StubPin {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::Release(self.line));
    }
}

impl PinSource for StubPins {
    type Pin = StubPin;
    type Error = StubError;

    fn open_pull_down(&mut self, line: Line) -> Result<StubPin, StubError> {
        if self.unavailable == Some(line) {
            return Err(StubError(line.to_string()));
        }
        self.log.borrow_mut().push(Event::Acquire(line));
        let high = match line {
            Line::Scl => self.scl_high,
            Line::Sda => self.sda_high,
        };
        Ok(StubPin {
            line,
            high,
            log: Rc::clone(&self.log),
        })
    }
}

// ── bus ───────────────────────────────────────────────────────

pub struct StubBuses {
    pub present: HashSet<u8>,
    pub refuse: HashSet<BusSpeed>,
    pub log: EventLog,
}

impl StubBuses {
    pub fn new(present: &[u8], log: &EventLog) -> Self {
        Self {
            present: present.iter().copied().collect(),
            refuse: HashSet::new(),
            log: Rc::clone(log),
        }
    }

    pub fn refusing(mut self, speed: BusSpeed) -> Self {
        self.refuse.insert(speed);
        self
    }
}

pub struct StubBus {
    speed: BusSpeed,
    present: HashSet<u8>,
    log: EventLog,
}

impl i2c::ErrorType for StubBus {
    type Error = ErrorKind;
}

impl i2c::I2c for StubBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ErrorKind> {
        self.log
            .borrow_mut()
            .push(Event::Probe(self.speed, address));
        if !self.present.contains(&address) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations.iter_mut() {
            if let Operation::Read(buf) = op {
                buf.fill(0xA5);
            }
        }
        Ok(())
    }
}

impl Drop for StubBus {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::Close(self.speed));
    }
}

impl BusOpener for StubBuses {
    type Bus = StubBus;
    type Error = StubError;

    fn open(&mut self, speed: BusSpeed) -> Result<StubBus, StubError> {
        self.log.borrow_mut().push(Event::Open(speed));
        if self.refuse.contains(&speed) {
            return Err(StubError(speed.to_string()));
        }
        Ok(StubBus {
            speed,
            present: self.present.clone(),
            log: Rc::clone(&self.log),
        })
    }
}

pub fn new_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn raw(addresses: &[raspi_i2c_scanner::Address]) -> Vec<u8> {
    addresses.iter().map(|a| a.get()).collect()
}
