//! Shared mock facades for the unit tests.

use crate::config::{CadConfig, ModulationConfig, PacketConfig};
use crate::console::Console;
use crate::radio::{IrqFlags, LinkRadio, PacketStatus, RadioError, RampTime};
use crate::timer::LinkTimer;
use core::convert::Infallible;

/// A radio command as recorded by [`MockRadio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    ConfigureModulation,
    ConfigurePacket,
    Standby,
    Frequency(u32),
    TxPower(i8),
    ArmInterrupts(u16),
    StartCad,
    Transmit(usize, u32),
    Receive(u32),
    SymbolTimeout(u16),
    IrqRead,
    IrqClear(u16),
    PacketStatus,
    Sleep(bool),
}

/// Records every facade command and plays back scripted interrupt flags
/// and packet status.
#[derive(Debug, Default)]
pub(crate) struct MockRadio {
    pub ops: Vec<Op>,
    pub irq: IrqFlags,
    pub status: PacketStatus,
    pub fail_cad: bool,
    pub fail_transmit: bool,
}

impl MockRadio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkRadio for MockRadio {
    type Error = RadioError;

    fn configure_modulation(&mut self, _config: &ModulationConfig) -> Result<(), Self::Error> {
        self.ops.push(Op::ConfigureModulation);
        Ok(())
    }

    fn configure_packet(&mut self, _config: &PacketConfig) -> Result<(), Self::Error> {
        self.ops.push(Op::ConfigurePacket);
        Ok(())
    }

    fn set_standby(&mut self) -> Result<(), Self::Error> {
        self.ops.push(Op::Standby);
        Ok(())
    }

    fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        self.ops.push(Op::Frequency(frequency_hz));
        Ok(())
    }

    fn set_tx_power(&mut self, power_dbm: i8, _ramp: RampTime) -> Result<(), Self::Error> {
        self.ops.push(Op::TxPower(power_dbm));
        Ok(())
    }

    fn arm_interrupts(&mut self, mask: IrqFlags) -> Result<(), Self::Error> {
        self.ops.push(Op::ArmInterrupts(mask.bits()));
        Ok(())
    }

    fn start_cad(&mut self, _config: &CadConfig) -> Result<(), Self::Error> {
        self.ops.push(Op::StartCad);
        if self.fail_cad {
            return Err(RadioError::Busy);
        }
        Ok(())
    }

    fn transmit(&mut self, payload: &[u8], timeout_units: u32) -> Result<(), Self::Error> {
        self.ops.push(Op::Transmit(payload.len(), timeout_units));
        if self.fail_transmit {
            return Err(RadioError::Busy);
        }
        Ok(())
    }

    fn receive(&mut self, timeout_units: u32) -> Result<(), Self::Error> {
        self.ops.push(Op::Receive(timeout_units));
        Ok(())
    }

    fn set_symbol_timeout(&mut self, symbols: u16) -> Result<(), Self::Error> {
        self.ops.push(Op::SymbolTimeout(symbols));
        Ok(())
    }

    fn irq_flags(&mut self) -> Result<IrqFlags, Self::Error> {
        self.ops.push(Op::IrqRead);
        Ok(self.irq)
    }

    fn clear_irq_flags(&mut self, mask: IrqFlags) -> Result<(), Self::Error> {
        self.ops.push(Op::IrqClear(mask.bits()));
        self.irq = IrqFlags::from_bits(self.irq.bits() & !mask.bits());
        Ok(())
    }

    fn packet_status(&mut self) -> Result<PacketStatus, Self::Error> {
        self.ops.push(Op::PacketStatus);
        Ok(self.status)
    }

    fn sleep(&mut self, warm_start: bool) -> Result<(), Self::Error> {
        self.ops.push(Op::Sleep(warm_start));
        Ok(())
    }
}

/// Records arm intervals and stop calls.
#[derive(Debug, Default)]
pub(crate) struct MockTimer {
    pub armed: Vec<u32>,
    pub stops: usize,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkTimer for MockTimer {
    type Error = Infallible;

    fn arm(&mut self, units: u32) -> Result<(), Self::Error> {
        self.armed.push(units);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.stops += 1;
        Ok(())
    }
}

/// Plays back scripted operator input and collects prompt output.
#[derive(Debug, Default)]
pub(crate) struct MockConsole {
    input: Vec<u8>,
    cursor: usize,
    pub output: String,
}

impl MockConsole {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.to_vec(),
            cursor: 0,
            output: String::new(),
        }
    }
}

impl Console for MockConsole {
    type Error = Infallible;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        match self.input.get(self.cursor) {
            Some(byte) => {
                self.cursor += 1;
                Ok(*byte)
            }
            None => panic!("console input script exhausted"),
        }
    }

    fn write_str(&mut self, line: &str) -> Result<(), Self::Error> {
        self.output.push_str(line);
        Ok(())
    }
}
