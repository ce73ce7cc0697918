//! Duty-cycled link session state machine.
//!
//! This module provides the [`LinkSession`] struct: a finite state machine
//! that keeps a point-to-point test link alive by alternating transmit
//! slots or CAD-gated receive windows, depending on the operating mode
//! fixed at startup.
//!
//! The machine is driven from two directions:
//!
//! - The **polling loop** calls [`poll()`](LinkSession::poll) repeatedly.
//!   Each call consumes at most one pending transition request, performs
//!   the action of the current state (arm a timer, start a scan, start a
//!   transmit or receive, book a completion), and parks the session in
//!   [`SessionState::Idle`] until an asynchronous source moves it on.
//! - **Interrupt context** calls [`handle_radio_irq()`](LinkSession::handle_radio_irq)
//!   or [`handle_timer_expiry()`](LinkSession::handle_timer_expiry), which
//!   classify the hardware event and post the next requested transition.
//!   Posting is last-write-wins: if two events race before the loop runs
//!   again, the later request stands.
//!
//! The radio chip can only do one thing at a time, so the machine enforces
//! a sequential discipline by construction: every radio command is
//! followed by `Idle`, and only the resolving interrupt or timer expiry
//! requests the next operation. No lock around the radio is needed beyond
//! that discipline; counter and indicator bookkeeping runs inside a
//! `critical_section::with` region so it stays atomic with respect to the
//! interrupt path.

use crate::config::{CadConfig, ModulationConfig, PacketConfig};
use crate::consts::{
    RX_SYMBOL_TIMEOUT, SCAN_INTERVAL_UNITS, TEST_PAYLOAD_LEN_USIZE, TX_INTERVAL_UNITS,
    TX_POWER_DBM,
};
use crate::radio::{IrqFlags, LinkRadio, RampTime};
use crate::timer::LinkTimer;
use embedded_hal::digital::OutputPin;

/// The states a link session moves through.
///
/// Transitions are total: every state either performs its action and
/// advances in [`poll()`](LinkSession::poll), or waits in
/// [`Idle`](SessionState::Idle) for an interrupt or timer expiry to post
/// the successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum SessionState {
    /// Waiting for the next transmit slot; arms the slot timer and idles.
    AwaitingTxSlot,
    /// Issues a channel-activity scan and idles until the scan completes.
    ChannelScan,
    /// Issues a transmit of the full test payload and idles until the
    /// radio reports completion or timeout.
    Transmitting,
    /// Issues an open-ended receive window and idles until the radio
    /// reports a packet or the symbol-count timeout.
    Listening,
    /// Reserved: a scan reported activity and the session is committed to
    /// listening but has not issued the receive yet. The interrupt
    /// classifier posts [`Listening`](SessionState::Listening) directly,
    /// so this state is only reachable through an explicit request.
    ChannelDetected,
    /// A transmission completed; books the completion and returns to
    /// [`AwaitingTxSlot`](SessionState::AwaitingTxSlot).
    TxComplete,
    /// A reception completed; books the completion, reads signal quality,
    /// and moves on to [`ScanComplete`](SessionState::ScanComplete).
    RxComplete,
    /// A scan finished without activity (or a receive cycle wrapped up);
    /// arms the scan-interval timer and idles.
    ScanComplete,
    /// Power-conserving wait; nothing happens until an asynchronous
    /// source posts the next state.
    #[default]
    Idle,
    /// Reserved defensive state for radio-reported reception errors; the
    /// current radio facade never raises one. Logged and resolved to
    /// [`Idle`](SessionState::Idle).
    RxFault,
    /// A transmit or receive window timed out on the radio; resolves to
    /// the mode's restart point.
    TimedOut,
}

/// The role a session plays on the link, fixed for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum OperatingMode {
    /// Transmit the test payload on every slot timer expiry.
    Transmitter,
    /// Scan for channel activity on every scan timer expiry and commit to
    /// a receive window only when activity is detected.
    Receiver,
}

impl OperatingMode {
    /// The state a fresh session starts in.
    fn initial_state(self) -> SessionState {
        match self {
            OperatingMode::Transmitter => SessionState::AwaitingTxSlot,
            OperatingMode::Receiver => SessionState::ChannelScan,
        }
    }

    /// The state the session retreats to after a timeout or a failed
    /// radio command: the point from which the duty cycle restarts.
    fn restart_state(self) -> SessionState {
        match self {
            OperatingMode::Transmitter => SessionState::AwaitingTxSlot,
            OperatingMode::Receiver => SessionState::ScanComplete,
        }
    }
}

impl TryFrom<u8> for OperatingMode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OperatingMode::Transmitter),
            2 => Ok(OperatingMode::Receiver),
            _ => Err(()),
        }
    }
}

/// A duty-cycled link exerciser session.
///
/// Owns the radio and timer facades, the indicator LEDs, the fixed test
/// payload, and the diagnostic counters. Exactly one session exists per
/// radio; it is created at startup and never torn down.
///
/// See the [module documentation](crate::session) for the driving model.
#[derive(Debug)]
pub struct LinkSession<R, T, TL, RL>
where
    R: LinkRadio,
    T: LinkTimer,
    TL: OutputPin,
    RL: OutputPin,
{
    radio: R,
    timer: T,
    tx_led: TL,
    rx_led: RL,
    mode: OperatingMode,
    state: SessionState,
    pending: Option<SessionState>,
    modulation: ModulationConfig,
    packet: PacketConfig,
    cad: CadConfig,
    payload: [u8; TEST_PAYLOAD_LEN_USIZE],

    /// Counter of completed transmissions. Wraps at `u16::MAX`;
    /// diagnostic only.
    pub tx_count: u16,

    /// Counter of completed receptions. Wraps at `u16::MAX`;
    /// diagnostic only.
    pub rx_count: u16,

    tx_led_on: bool,
    rx_led_on: bool,
}

impl<R, T, TL, RL> LinkSession<R, T, TL, RL>
where
    R: LinkRadio,
    T: LinkTimer,
    TL: OutputPin,
    RL: OutputPin,
{
    /// Creates a session in the initial state of `mode`, with the test
    /// payload pre-filled with its deterministic pattern
    /// (`value = index`).
    pub fn new(
        radio: R,
        timer: T,
        tx_led: TL,
        rx_led: RL,
        mode: OperatingMode,
        modulation: ModulationConfig,
        packet: PacketConfig,
        cad: CadConfig,
    ) -> Self {
        let mut payload = [0u8; TEST_PAYLOAD_LEN_USIZE];
        for (i, byte) in payload.iter_mut().enumerate() {
            *byte = i as u8;
        }
        Self {
            radio,
            timer,
            tx_led,
            rx_led,
            mode,
            state: mode.initial_state(),
            pending: None,
            modulation,
            packet,
            cad,
            payload,
            tx_count: 0,
            rx_count: 0,
            tx_led_on: false,
            rx_led_on: false,
        }
    }

    /// Brings up the radio for this session: standby, transmit power,
    /// interrupt arming, carrier frequency, modulation and packet
    /// configuration, and (in receiver mode) the symbol-count receive
    /// timeout.
    ///
    /// Call once before entering the polling loop.
    pub fn start(&mut self, frequency_hz: u32) -> Result<(), R::Error> {
        self.radio.set_standby()?;
        self.radio.set_tx_power(TX_POWER_DBM, RampTime::Ramp200Us)?;
        self.radio.arm_interrupts(IrqFlags::ALL)?;
        self.radio.set_frequency(frequency_hz)?;
        self.radio.configure_modulation(&self.modulation)?;
        self.radio.configure_packet(&self.packet)?;
        match self.mode {
            OperatingMode::Transmitter => info!("session started: transmitter"),
            OperatingMode::Receiver => {
                self.radio.set_symbol_timeout(RX_SYMBOL_TIMEOUT)?;
                info!("session started: receiver");
            }
        }
        Ok(())
    }

    /// The session's current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The session's operating mode.
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// The transition request posted by interrupt context, if the polling
    /// loop has not consumed it yet.
    pub fn pending(&self) -> Option<SessionState> {
        self.pending
    }

    /// Mutable access to the radio facade, for host-side diagnostics.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Mutable access to the slot timer.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Posts a requested transition on behalf of interrupt context.
    ///
    /// The request is held until the next [`poll()`](LinkSession::poll)
    /// consumes it. Posting is last-write-wins: a request that has not
    /// been consumed yet is overwritten by a newer one. By the session's
    /// sequential discipline at most one source ever has a legitimate
    /// request outstanding, so an overwrite only happens for spurious or
    /// duplicated events.
    pub fn request_transition(&mut self, next: SessionState) {
        critical_section::with(|_| {
            self.pending = Some(next);
        });
    }

    /// Advances the state machine by one polling-loop iteration.
    ///
    /// Consumes at most one pending transition request, then performs the
    /// current state's action. Radio or timer failures never end the
    /// session: the error is logged and the session retreats to its
    /// mode's restart point (or retries the timer on the next iteration).
    pub fn poll(&mut self) {
        if let Some(next) = critical_section::with(|_| self.pending.take()) {
            self.state = next;
        }

        match self.state {
            SessionState::AwaitingTxSlot => match self.timer.arm(TX_INTERVAL_UNITS) {
                Ok(()) => self.state = SessionState::Idle,
                // Stay put; the next iteration retries the arm.
                Err(_e) => error!("slot timer arm failed"),
            },

            SessionState::ChannelScan => match self.start_scan() {
                Ok(()) => self.state = SessionState::Idle,
                Err(_e) => {
                    error!("channel scan start failed");
                    self.state = self.mode.restart_state();
                }
            },

            SessionState::Transmitting => {
                debug!("transmitting");
                match self.start_transmit() {
                    Ok(()) => self.state = SessionState::Idle,
                    Err(_e) => {
                        error!("transmit start failed");
                        self.state = self.mode.restart_state();
                    }
                }
            }

            SessionState::Listening => match self.start_listen() {
                Ok(()) => self.state = SessionState::Idle,
                Err(_e) => {
                    error!("receive start failed");
                    self.state = self.mode.restart_state();
                }
            },

            SessionState::ChannelDetected => self.state = SessionState::Listening,

            SessionState::TxComplete => {
                critical_section::with(|_| {
                    self.tx_count = self.tx_count.wrapping_add(1);
                    self.tx_led_on = !self.tx_led_on;
                    if self.tx_led_on {
                        let _ = self.tx_led.set_high();
                    } else {
                        let _ = self.tx_led.set_low();
                    }
                    self.state = SessionState::AwaitingTxSlot;
                });
                info!("TX done: {}", self.tx_count);
            }

            SessionState::RxComplete => {
                let status = self.radio.packet_status();
                critical_section::with(|_| {
                    self.rx_count = self.rx_count.wrapping_add(1);
                    self.rx_led_on = !self.rx_led_on;
                    if self.rx_led_on {
                        let _ = self.rx_led.set_high();
                    } else {
                        let _ = self.rx_led.set_low();
                    }
                    self.state = SessionState::ScanComplete;
                });
                match status {
                    Ok(status) => {
                        info!("RX: {} rssi={} snr={}", self.rx_count, status.rssi, status.snr);
                    }
                    Err(_e) => error!("packet status read failed"),
                }
            }

            SessionState::ScanComplete => match self.timer.arm(SCAN_INTERVAL_UNITS) {
                Ok(()) => self.state = SessionState::Idle,
                // Stay put; the next iteration retries the arm.
                Err(_e) => error!("scan timer arm failed"),
            },

            SessionState::Idle => {}

            SessionState::RxFault => {
                error!("reception fault reported");
                self.state = SessionState::Idle;
            }

            SessionState::TimedOut => {
                debug!("radio window timed out");
                critical_section::with(|_| {
                    self.state = self.mode.restart_state();
                });
            }
        }
    }

    /// Entry point for the radio's interrupt line.
    ///
    /// Reads and clears the raised interrupt flags, classifies them in
    /// fixed priority order (reception complete, scan complete, transmit
    /// complete, timeout; first match wins), and posts the corresponding
    /// transition request. Unclassifiable flag sets are logged and
    /// dropped.
    pub fn handle_radio_irq(&mut self) {
        let flags = match self.radio.irq_flags() {
            Ok(flags) => flags,
            Err(_e) => {
                error!("interrupt flag read failed");
                return;
            }
        };
        if let Err(_e) = self.radio.clear_irq_flags(IrqFlags::ALL) {
            error!("interrupt flag clear failed");
        }

        let request = if flags.contains(IrqFlags::RX_DONE) {
            Some(SessionState::RxComplete)
        } else if flags.contains(IrqFlags::CAD_DONE) {
            if flags.contains(IrqFlags::CAD_ACTIVITY_DETECTED) {
                Some(SessionState::Listening)
            } else {
                Some(SessionState::ScanComplete)
            }
        } else if flags.contains(IrqFlags::TX_DONE) {
            Some(SessionState::TxComplete)
        } else if flags.contains(IrqFlags::RX_TX_TIMEOUT) {
            Some(SessionState::TimedOut)
        } else {
            warn!("spurious radio interrupt, flags {}", flags.bits());
            None
        };

        if let Some(next) = request {
            self.request_transition(next);
        }
    }

    /// Entry point for the slot timer's expiry interrupt.
    ///
    /// Stops the one-shot timer and posts the mode's periodic action:
    /// a transmit slot for a transmitter, a channel scan for a receiver.
    pub fn handle_timer_expiry(&mut self) {
        if let Err(_e) = self.timer.stop() {
            error!("slot timer stop failed");
        }
        let next = match self.mode {
            OperatingMode::Transmitter => SessionState::Transmitting,
            OperatingMode::Receiver => SessionState::ChannelScan,
        };
        self.request_transition(next);
    }

    fn start_scan(&mut self) -> Result<(), R::Error> {
        self.radio.arm_interrupts(IrqFlags::ALL)?;
        self.radio.start_cad(&self.cad)
    }

    fn start_transmit(&mut self) -> Result<(), R::Error> {
        self.radio.set_standby()?;
        self.radio
            .arm_interrupts(IrqFlags::TX_DONE | IrqFlags::RX_TX_TIMEOUT)?;
        self.radio.transmit(&self.payload, 0)
    }

    fn start_listen(&mut self) -> Result<(), R::Error> {
        self.radio.set_standby()?;
        self.radio
            .arm_interrupts(IrqFlags::RX_DONE | IrqFlags::RX_TX_TIMEOUT)?;
        self.radio.receive(0)
    }
}
