//! Interrupt-context glue for a shared link session.
//!
//! The polling loop and the interrupt handlers both need to reach the one
//! [`LinkSession`] instance, so it lives in a `critical_section` mutex.
//! Every entry point here borrows the session inside
//! `critical_section::with`: acquiring the section disables the competing
//! interrupt sources, and the release is guaranteed on every exit path,
//! which is what keeps the session's state and counters consistent
//! between the loop and the handlers.
//!
//! Typical wiring:
//!
//! ```ignore
//! static SESSION: SharedSession<Radio, SlotTimer, LedPin, LedPin> = shared_session_init();
//!
//! // main, after bring-up:
//! shared_session_setup(&SESSION, session);
//! loop {
//!     shared_session_poll(&SESSION);
//! }
//!
//! // radio DIO interrupt handler:
//! shared_session_radio_irq(&SESSION);
//!
//! // slot timer interrupt handler:
//! shared_session_timer_expiry(&SESSION);
//! ```

use crate::radio::LinkRadio;
use crate::session::LinkSession;
use crate::timer::LinkTimer;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

/// A link session shared between the polling loop and interrupt context.
pub type SharedSession<R, T, TL, RL> = Mutex<RefCell<Option<LinkSession<R, T, TL, RL>>>>;

/// Initializes the global static session cell, empty.
///
/// # Example
/// ```ignore
/// static SESSION: SharedSession<Radio, SlotTimer, LedPin, LedPin> = shared_session_init();
/// ```
pub const fn shared_session_init<R, T, TL, RL>() -> SharedSession<R, T, TL, RL>
where
    R: LinkRadio,
    T: LinkTimer,
    TL: OutputPin,
    RL: OutputPin,
{
    Mutex::new(RefCell::new(None))
}

/// Places a started session into the shared cell.
///
/// Call once after [`LinkSession::start`], before the first poll and
/// before the interrupt lines are unmasked.
pub fn shared_session_setup<R, T, TL, RL>(
    cell: &'static SharedSession<R, T, TL, RL>,
    session: LinkSession<R, T, TL, RL>,
) where
    R: LinkRadio,
    T: LinkTimer,
    TL: OutputPin,
    RL: OutputPin,
{
    critical_section::with(|cs| {
        let _ = cell.borrow(cs).replace(Some(session));
    });
}

/// Runs one polling-loop iteration on the shared session.
///
/// A no-op until [`shared_session_setup`] has run.
pub fn shared_session_poll<R, T, TL, RL>(cell: &'static SharedSession<R, T, TL, RL>)
where
    R: LinkRadio,
    T: LinkTimer,
    TL: OutputPin,
    RL: OutputPin,
{
    critical_section::with(|cs| {
        if let Some(session) = cell.borrow(cs).borrow_mut().as_mut() {
            session.poll();
        }
    });
}

/// Routes the radio's interrupt line to the shared session.
///
/// # Example
/// ```ignore
/// #[interrupt]
/// fn DIO1() {
///     shared_session_radio_irq(&SESSION);
/// }
/// ```
pub fn shared_session_radio_irq<R, T, TL, RL>(cell: &'static SharedSession<R, T, TL, RL>)
where
    R: LinkRadio,
    T: LinkTimer,
    TL: OutputPin,
    RL: OutputPin,
{
    critical_section::with(|cs| {
        if let Some(session) = cell.borrow(cs).borrow_mut().as_mut() {
            session.handle_radio_irq();
        }
    });
}

/// Routes the slot timer's expiry interrupt to the shared session.
///
/// # Example
/// ```ignore
/// #[interrupt]
/// fn TIM2() {
///     shared_session_timer_expiry(&SESSION);
/// }
/// ```
pub fn shared_session_timer_expiry<R, T, TL, RL>(cell: &'static SharedSession<R, T, TL, RL>)
where
    R: LinkRadio,
    T: LinkTimer,
    TL: OutputPin,
    RL: OutputPin,
{
    critical_section::with(|cs| {
        if let Some(session) = cell.borrow(cs).borrow_mut().as_mut() {
            session.handle_timer_expiry();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CadConfig, ModulationConfig, PacketConfig};
    use crate::radio::IrqFlags;
    use crate::session::{OperatingMode, SessionState};
    use crate::test_util::{MockRadio, MockTimer};
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    type TestSession = SharedSession<MockRadio, MockTimer, PinMock, PinMock>;

    static SESSION: TestSession = shared_session_init();

    #[test]
    fn test_shared_session_round_trip() {
        let tx_led = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let rx_led = PinMock::new(&[]);
        let mut tx_led_handle = tx_led.clone();
        let mut rx_led_handle = rx_led.clone();

        // Polling an empty cell is a no-op.
        shared_session_poll(&SESSION);

        let session = LinkSession::new(
            MockRadio::new(),
            MockTimer::new(),
            tx_led,
            rx_led,
            OperatingMode::Transmitter,
            ModulationConfig::default(),
            PacketConfig::default(),
            CadConfig::default(),
        );
        shared_session_setup(&SESSION, session);

        // One full transmit cycle through the shared entry points.
        shared_session_poll(&SESSION);
        shared_session_timer_expiry(&SESSION);
        shared_session_poll(&SESSION);
        critical_section::with(|cs| {
            let mut session = SESSION.borrow(cs).borrow_mut();
            let session = session.as_mut().unwrap();
            assert_eq!(session.state(), SessionState::Idle);
            session.radio_mut().irq = IrqFlags::TX_DONE;
        });
        shared_session_radio_irq(&SESSION);
        shared_session_poll(&SESSION);
        critical_section::with(|cs| {
            let mut session = SESSION.borrow(cs).borrow_mut();
            let session = session.as_mut().unwrap();
            assert_eq!(session.tx_count, 1);
            assert_eq!(session.state(), SessionState::AwaitingTxSlot);
        });

        tx_led_handle.done();
        rx_led_handle.done();
    }
}
