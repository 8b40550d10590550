#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # embedded-onewire
//! A no-std implementation of the 1-Wire protocol.
//!
//! This crate provides a trait-based interface for 1-Wire communication, allowing you to implement the protocol on various platforms.
//! [OneWire] trait defines the basic operations required for 1-Wire communication: resetting the bus, writing and reading bytes.
//! On top of those it provides ROM addressing ([`OneWire::address`]), the 64-bit ROM [Address] type,
//! and the 1-Wire CRC-8 ([OneWireCrc]) shared by device drivers to validate addresses and scratchpads.

mod address;
mod consts;
mod crc;
mod error;
mod traits;
pub use address::{Address, AddressParseError};
pub use consts::ONEWIRE_MATCH_ROM_CMD;
pub use crc::OneWireCrc;
pub use error::OneWireError;
pub use traits::{OneWire, OneWireStatus};

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
