//! Validated radio configuration records.
//!
//! The radio facade is configured through plain records with enumerated,
//! validated option sets rather than raw register constants: modulation
//! settings reuse the `lora-modulation` vocabulary, and the CAD scan
//! parameters are bundled with their consistency checks.
//!
//! The [`Default`] implementations describe the exerciser's link profile:
//! SF7 over a 500 kHz channel with 4/5 coding, a 250-symbol preamble, a
//! 255-byte CRC-protected payload, and a four-symbol scan-only CAD burst.

use crate::consts::{CAD_DETECTION_MIN, CAD_DETECTION_PEAK, PREAMBLE_LEN, TEST_PAYLOAD_LEN};
use thiserror::Error;

pub use lora_modulation::{Bandwidth, CodingRate, SpreadingFactor};

/// Rejected configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ConfigError {
    /// The preamble must contain at least one symbol.
    #[error("preamble length must be non-zero")]
    PreambleLength,
    /// The CAD detection minimum must stay below the detection peak.
    #[error("CAD detection minimum must be below the detection peak")]
    CadThresholds,
}

/// LoRa modulation settings for both directions of the link.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ModulationConfig {
    spreading_factor: SpreadingFactor,
    bandwidth: Bandwidth,
    coding_rate: CodingRate,
    low_data_rate_optimize: bool,
}

impl ModulationConfig {
    /// Builds a modulation configuration.
    ///
    /// The low-data-rate optimization flag is derived from the symbol
    /// duration: it is enabled whenever a symbol lasts 16.384 ms or
    /// longer, the point where the radio needs the relaxed timing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cadlink::config::{Bandwidth, CodingRate, ModulationConfig, SpreadingFactor};
    ///
    /// let slow = ModulationConfig::new(
    ///     SpreadingFactor::_12,
    ///     Bandwidth::_125KHz,
    ///     CodingRate::_4_5,
    /// );
    /// assert!(slow.low_data_rate_optimize());
    /// ```
    pub fn new(
        spreading_factor: SpreadingFactor,
        bandwidth: Bandwidth,
        coding_rate: CodingRate,
    ) -> Self {
        let low_data_rate_optimize =
            symbol_duration_us(&spreading_factor, &bandwidth) >= 16_384;
        Self {
            spreading_factor,
            bandwidth,
            coding_rate,
            low_data_rate_optimize,
        }
    }

    /// The configured spreading factor.
    pub fn spreading_factor(&self) -> SpreadingFactor {
        self.spreading_factor.clone()
    }

    /// The configured channel bandwidth.
    pub fn bandwidth(&self) -> Bandwidth {
        self.bandwidth.clone()
    }

    /// The configured coding rate.
    pub fn coding_rate(&self) -> CodingRate {
        self.coding_rate.clone()
    }

    /// Whether the radio should enable its low-data-rate optimization.
    pub fn low_data_rate_optimize(&self) -> bool {
        self.low_data_rate_optimize
    }

    /// Duration of one LoRa symbol under this configuration, in
    /// microseconds. Useful for sizing receive windows and scan bursts.
    pub fn symbol_duration_us(&self) -> u32 {
        symbol_duration_us(&self.spreading_factor, &self.bandwidth)
    }
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self::new(SpreadingFactor::_7, Bandwidth::_500KHz, CodingRate::_4_5)
    }
}

fn symbol_duration_us(spreading_factor: &SpreadingFactor, bandwidth: &Bandwidth) -> u32 {
    let chips: u64 = 1 << spreading_factor_order(spreading_factor);
    let hz = u64::from(bandwidth_hz(bandwidth));
    (chips * 1_000_000 / hz) as u32
}

fn spreading_factor_order(spreading_factor: &SpreadingFactor) -> u32 {
    match spreading_factor {
        SpreadingFactor::_5 => 5,
        SpreadingFactor::_6 => 6,
        SpreadingFactor::_7 => 7,
        SpreadingFactor::_8 => 8,
        SpreadingFactor::_9 => 9,
        SpreadingFactor::_10 => 10,
        SpreadingFactor::_11 => 11,
        SpreadingFactor::_12 => 12,
    }
}

fn bandwidth_hz(bandwidth: &Bandwidth) -> u32 {
    match bandwidth {
        Bandwidth::_7KHz => 7_800,
        Bandwidth::_10KHz => 10_400,
        Bandwidth::_15KHz => 15_600,
        Bandwidth::_20KHz => 20_800,
        Bandwidth::_31KHz => 31_250,
        Bandwidth::_41KHz => 41_700,
        Bandwidth::_62KHz => 62_500,
        Bandwidth::_125KHz => 125_000,
        Bandwidth::_250KHz => 250_000,
        Bandwidth::_500KHz => 500_000,
    }
}

/// LoRa packet framing settings shared by transmit and receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct PacketConfig {
    preamble_length: u16,
    fixed_length: bool,
    payload_length: u8,
    crc_on: bool,
    iq_inverted: bool,
}

impl PacketConfig {
    /// Builds a packet configuration.
    ///
    /// The payload length is bounded to the radio buffer by its `u8`
    /// type; the preamble must contain at least one symbol.
    pub fn new(
        preamble_length: u16,
        fixed_length: bool,
        payload_length: u8,
        crc_on: bool,
        iq_inverted: bool,
    ) -> Result<Self, ConfigError> {
        if preamble_length == 0 {
            return Err(ConfigError::PreambleLength);
        }
        Ok(Self {
            preamble_length,
            fixed_length,
            payload_length,
            crc_on,
            iq_inverted,
        })
    }

    /// Preamble length in symbols.
    pub fn preamble_length(&self) -> u16 {
        self.preamble_length
    }

    /// Whether the payload length is fixed (implicit header) rather than
    /// carried in an explicit header.
    pub fn fixed_length(&self) -> bool {
        self.fixed_length
    }

    /// Payload length in bytes.
    pub fn payload_length(&self) -> u8 {
        self.payload_length
    }

    /// Whether the radio appends and checks a payload CRC.
    pub fn crc_on(&self) -> bool {
        self.crc_on
    }

    /// Whether the IQ signal path is inverted.
    pub fn iq_inverted(&self) -> bool {
        self.iq_inverted
    }
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            preamble_length: PREAMBLE_LEN,
            fixed_length: false,
            payload_length: TEST_PAYLOAD_LEN,
            crc_on: true,
            iq_inverted: false,
        }
    }
}

/// Number of symbols sampled by a single CAD burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum CadSymbols {
    /// Sample one symbol.
    _1 = 0x00,
    /// Sample two symbols.
    _2 = 0x01,
    /// Sample four symbols.
    _4 = 0x02,
    /// Sample eight symbols.
    _8 = 0x03,
    /// Sample sixteen symbols.
    _16 = 0x04,
}

impl CadSymbols {
    /// Radio parameter code for this symbol count.
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// What the radio does when a CAD burst completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum CadExitMode {
    /// Report the scan outcome and return to standby; committing to a
    /// receive window is the caller's decision.
    ScanOnly = 0x00,
    /// Enter receive directly when activity is detected.
    Receive = 0x01,
}

impl CadExitMode {
    /// Radio parameter code for this exit mode.
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Channel-activity-detection scan parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct CadConfig {
    symbols: CadSymbols,
    detection_peak: u8,
    detection_min: u8,
    exit_mode: CadExitMode,
    timeout_units: u32,
}

impl CadConfig {
    /// Builds a CAD configuration, rejecting threshold pairs where the
    /// minimum does not stay below the peak.
    pub fn new(
        symbols: CadSymbols,
        detection_peak: u8,
        detection_min: u8,
        exit_mode: CadExitMode,
        timeout_units: u32,
    ) -> Result<Self, ConfigError> {
        if detection_min >= detection_peak {
            return Err(ConfigError::CadThresholds);
        }
        Ok(Self {
            symbols,
            detection_peak,
            detection_min,
            exit_mode,
            timeout_units,
        })
    }

    /// Number of symbols sampled per scan.
    pub fn symbols(&self) -> CadSymbols {
        self.symbols
    }

    /// Detection peak sensitivity.
    pub fn detection_peak(&self) -> u8 {
        self.detection_peak
    }

    /// Detection minimum sensitivity.
    pub fn detection_min(&self) -> u8 {
        self.detection_min
    }

    /// Behavior on scan completion.
    pub fn exit_mode(&self) -> CadExitMode {
        self.exit_mode
    }

    /// Scan timeout in timer units; zero disables the timeout.
    pub fn timeout_units(&self) -> u32 {
        self.timeout_units
    }
}

impl Default for CadConfig {
    fn default() -> Self {
        Self {
            symbols: CadSymbols::_4,
            detection_peak: CAD_DETECTION_PEAK,
            detection_min: CAD_DETECTION_MIN,
            exit_mode: CadExitMode::ScanOnly,
            timeout_units: 0,
        }
    }
}
