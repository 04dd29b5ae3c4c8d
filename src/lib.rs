//! Key/LED matrix controller for the ATmega328P.
//!
//! Scans a 15x8 switch matrix and refreshes a 6x8 LED matrix through
//! 74LS164 shift-register chains, forwarding each scan to a host over TWI.
//! Everything except `hal` is target independent and tested on the host.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

pub mod application;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod os;
pub mod protocol;

#[cfg(target_arch = "avr")]
pub mod hal;
