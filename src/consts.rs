//! Constants used across the link exerciser.
//!
//! This module defines the timing intervals, payload sizing, and default
//! RF parameters that make up the exerciser's link profile.
//!
//! ## Key Concepts
//!
//! - **Timer units**: all software intervals are expressed in the abstract
//!   countdown units of the host's [`LinkTimer`](crate::timer::LinkTimer);
//!   the hardware tick length is the host's business.
//! - **Symbol-count timeout**: the receive timeout is programmed on the
//!   radio itself, in LoRa symbol periods, not in wall-clock time.
//! - **Test payload**: a fixed-length pattern (`value = index`) used for
//!   every transmission; reception quality is judged by packet status, not
//!   by payload inspection.

/// Number of timer units between transmit slots in
/// [`OperatingMode::Transmitter`](crate::session::OperatingMode::Transmitter).
pub const TX_INTERVAL_UNITS: u32 = 500;

/// Number of timer units between channel scans in
/// [`OperatingMode::Receiver`](crate::session::OperatingMode::Receiver).
pub const SCAN_INTERVAL_UNITS: u32 = 60;

/// Receive timeout programmed on the radio, in LoRa symbol periods.
///
/// Applied once at startup in receiver mode; bounds how long a committed
/// receive window waits for a preamble before the radio raises its
/// timeout interrupt.
pub const RX_SYMBOL_TIMEOUT: u16 = 13;

/// Length (in bytes) of the fixed test payload.
pub const TEST_PAYLOAD_LEN: u8 = 255;

/// See [`TEST_PAYLOAD_LEN`](crate::consts::TEST_PAYLOAD_LEN)
pub const TEST_PAYLOAD_LEN_USIZE: usize = TEST_PAYLOAD_LEN as usize;

/// Preamble length (in symbols) shared by the transmit and receive
/// packet configuration.
pub const PREAMBLE_LEN: u16 = 250;

/// Default RF carrier frequency in Hz, used when the operator does not
/// enter one at the console prompt.
pub const DEFAULT_FREQUENCY_HZ: u32 = 915_000_000;

/// Transmit output power in dBm.
pub const TX_POWER_DBM: i8 = 0;

/// CAD detection peak sensitivity.
///
/// Raising this value makes the scan less likely to report activity on
/// noise; lowering it makes detection more sensitive.
pub const CAD_DETECTION_PEAK: u8 = 21;

/// CAD detection minimum sensitivity. Must stay below
/// [`CAD_DETECTION_PEAK`](crate::consts::CAD_DETECTION_PEAK).
pub const CAD_DETECTION_MIN: u8 = 10;

/// Maximum number of decimal digits accepted by the console frequency
/// prompt; enough for any u32 frequency in Hz.
pub const FREQUENCY_DIGITS: usize = 10;
