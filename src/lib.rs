//! # cadlink
//!
//! A portable, no_std duty-cycled link exerciser for LoRa transceivers,
//! built around a Channel-Activity-Detection (CAD) gated receive strategy.
//!
//! The crate keeps a point-to-point LoRa test link alive by alternating
//! between two roles selected once at startup:
//!
//! - **Transmitter**: sends a fixed 255-byte test pattern on a periodic
//!   timer slot and blinks the transmit indicator on each completion.
//! - **Receiver**: scans the channel with short CAD bursts on a periodic
//!   timer, commits to a full receive window only when preamble energy is
//!   detected, and blinks the receive indicator on each reception.
//!
//! The core is the [`session::LinkSession`] state machine: a polling loop
//! advances the session by issuing one radio operation at a time, while
//! radio and timer interrupts post the next requested transition through a
//! `critical-section` protected cell. The physical radio, the hardware
//! timer, the indicator LEDs, and the operator console are reached through
//! capability traits; the crate contains no register-level driver code.
//!
//! ## Crate features
//! | Feature     | Description |
//! |-------------|-------------|
//! | `std`       | Disables `#![no_std]` support; used by the host-side test suite |
//! | `defmt-0-3` | Uses `defmt` logging |
//! | `log`       | Uses `log` logging |
//!
//! ## Usage
//!
//! The session is owned by a [`isr::SharedSession`] static so the main
//! loop and the interrupt handlers can reach it safely:
//!
//! ```ignore
//! use cadlink::config::{CadConfig, ModulationConfig, PacketConfig};
//! use cadlink::consts::DEFAULT_FREQUENCY_HZ;
//! use cadlink::console::{read_frequency, read_operating_mode};
//! use cadlink::isr::{
//!     SharedSession, shared_session_init, shared_session_poll,
//!     shared_session_radio_irq, shared_session_setup, shared_session_timer_expiry,
//! };
//! use cadlink::session::LinkSession;
//!
//! static SESSION: SharedSession<Radio, SlotTimer, LedPin, LedPin> = shared_session_init();
//!
//! fn main() -> ! {
//!     // ... board bring-up yields radio, timer, LEDs, and a console ...
//!     let mode = read_operating_mode(&mut console).unwrap();
//!     let frequency = read_frequency(&mut console)
//!         .unwrap()
//!         .unwrap_or(DEFAULT_FREQUENCY_HZ);
//!
//!     let mut session = LinkSession::new(
//!         radio,
//!         timer,
//!         led_tx,
//!         led_rx,
//!         mode,
//!         ModulationConfig::default(),
//!         PacketConfig::default(),
//!         CadConfig::default(),
//!     );
//!     session.start(frequency).unwrap();
//!     shared_session_setup(&SESSION, session);
//!
//!     loop {
//!         shared_session_poll(&SESSION);
//!     }
//! }
//!
//! #[interrupt]
//! fn DIO1() {
//!     shared_session_radio_irq(&SESSION);
//! }
//!
//! #[interrupt]
//! fn TIM2() {
//!     shared_session_timer_expiry(&SESSION);
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - The radio's interrupt line and the slot timer's expiry must be wired
//!   to [`isr::shared_session_radio_irq`] and
//!   [`isr::shared_session_timer_expiry`] by the host.
//! - The polling loop never blocks; the session parks itself in
//!   [`session::SessionState::Idle`] between radio operations, which is
//!   the natural place for a host low-power wait instruction.
//! - Only one radio operation is ever in flight: the session issues a
//!   command, idles, and moves again only when the corresponding interrupt
//!   or timer expiry arrives.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

// Declared first so the logging macros are visible to the other modules.
mod fmt;

pub use critical_section;
pub use heapless;

pub mod config;
pub mod console;
pub mod consts;
pub mod isr;
pub mod radio;
pub mod session;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_util;
