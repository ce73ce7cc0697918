//! Slot timer facade.
//!
//! The exerciser paces itself with a single one-shot countdown timer: the
//! transmit slot interval in transmitter mode, the scan interval in
//! receiver mode. The hardware timer and its interrupt wiring live with
//! the host; expiry must be routed to
//! [`shared_session_timer_expiry`](crate::isr::shared_session_timer_expiry)
//! (or [`LinkSession::handle_timer_expiry`](crate::session::LinkSession::handle_timer_expiry)
//! for a directly-owned session), which stops the timer before the next
//! interval is armed.

use core::fmt::Debug;

/// Capability interface to a one-shot countdown timer.
///
/// Intervals are abstract timer units; the unit length is fixed by the
/// host's clock tree. Periodic behavior comes from explicit re-arming,
/// never from an auto-reload.
pub trait LinkTimer {
    /// Errors reported by the timer implementation.
    type Error: Debug;

    /// Starts a one-shot countdown of `units`.
    fn arm(&mut self, units: u32) -> Result<(), Self::Error>;

    /// Stops the countdown; expired one-shots call this before re-arming.
    fn stop(&mut self) -> Result<(), Self::Error>;
}
