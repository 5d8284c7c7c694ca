//! SPI transfer configuration
//!
//! Every field maps onto a CTRLR0 field; [`SpiConfig::ctrlr0`] composes the
//! register value for a given transfer direction.

use tock_registers::{
    fields::FieldValue,
    interfaces::{ReadWriteable, Readable},
    registers::InMemoryRegister,
};

use crate::regs::{self, CTRLR0};

/// Bits per data frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameSize {
    Bits4,
    Bits8,
    Bits16,
}

impl FrameSize {
    /// Bytes of caller buffer consumed per FIFO entry
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits4 | Self::Bits8 => 1,
            Self::Bits16 => 2,
        }
    }

    fn field(self) -> FieldValue<u32, CTRLR0::Register> {
        match self {
            Self::Bits4 => CTRLR0::DFS::Bits4,
            Self::Bits8 => CTRLR0::DFS::Bits8,
            Self::Bits16 => CTRLR0::DFS::Bits16,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockPolarity {
    IdleLow,
    IdleHigh,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockPhase {
    /// Sample on the first clock edge
    FirstEdge,
    /// Sample on the second clock edge
    SecondEdge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// APB access width the controller transforms FIFO data for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApbTransform {
    Apb16,
    Apb8,
}

/// Delay between SS_N assertion and the first SCLK edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SsDelay {
    HalfCycle,
    OneCycle,
}

/// Direction of a transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferMode {
    TransmitReceive,
    TransmitOnly,
    ReceiveOnly,
}

/// Complete controller configuration for a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpiConfig {
    pub frame_size: FrameSize,
    pub polarity: ClockPolarity,
    pub phase: ClockPhase,
    pub bit_order: BitOrder,
    pub endian: Endian,
    pub apb_transform: ApbTransform,
    pub ss_delay: SsDelay,
    /// SS_N high cycles between frames (0..=3)
    pub csm_cycles: u8,
    /// Requested SCLK in Hz
    pub speed_hz: u32,
}

impl Default for SpiConfig {
    /// Controller defaults after init: master, 8-bit APB, big endian,
    /// one-cycle SSD and no CS toggling between frames.
    fn default() -> Self {
        Self {
            frame_size: FrameSize::Bits8,
            polarity: ClockPolarity::IdleLow,
            phase: ClockPhase::FirstEdge,
            bit_order: BitOrder::MsbFirst,
            endian: Endian::Big,
            apb_transform: ApbTransform::Apb8,
            ss_delay: SsDelay::OneCycle,
            csm_cycles: 0,
            speed_hz: 1_000_000,
        }
    }
}

impl SpiConfig {
    /// Target speed after clamping to the master-mode maximum.
    pub const fn effective_speed(&self) -> u32 {
        if self.speed_hz > regs::MASTER_MAX_SCLK {
            regs::MASTER_MAX_SCLK
        } else {
            self.speed_hz
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.speed_hz != 0 && self.csm_cycles <= 3
    }

    /// CTRLR0 value for a master-mode Motorola transfer in `mode`.
    pub fn ctrlr0(&self, mode: TransferMode) -> u32 {
        let reg: InMemoryRegister<u32, CTRLR0::Register> = InMemoryRegister::new(0);

        reg.modify(
            CTRLR0::OPM::Master
                + CTRLR0::FRF::Motorola
                + self.frame_size.field()
                + CTRLR0::CSM.val(u32::from(self.csm_cycles)),
        );

        reg.modify(match mode {
            TransferMode::TransmitReceive => CTRLR0::XFM::TransmitReceive,
            TransferMode::TransmitOnly => CTRLR0::XFM::TransmitOnly,
            TransferMode::ReceiveOnly => CTRLR0::XFM::ReceiveOnly,
        });

        reg.modify(match self.apb_transform {
            ApbTransform::Apb16 => CTRLR0::BHT::Apb16,
            ApbTransform::Apb8 => CTRLR0::BHT::Apb8,
        });
        reg.modify(match self.endian {
            Endian::Little => CTRLR0::EM::Little,
            Endian::Big => CTRLR0::EM::Big,
        });
        reg.modify(match self.ss_delay {
            SsDelay::HalfCycle => CTRLR0::SSD::HalfCycle,
            SsDelay::OneCycle => CTRLR0::SSD::OneCycle,
        });

        // Mode: polarity, phase and bit order
        reg.modify(match self.polarity {
            ClockPolarity::IdleLow => CTRLR0::SCPOL::Low,
            ClockPolarity::IdleHigh => CTRLR0::SCPOL::High,
        });
        reg.modify(match self.phase {
            ClockPhase::FirstEdge => CTRLR0::SCPH::FirstEdge,
            ClockPhase::SecondEdge => CTRLR0::SCPH::SecondEdge,
        });
        reg.modify(match self.bit_order {
            BitOrder::MsbFirst => CTRLR0::FBM::Msb,
            BitOrder::LsbFirst => CTRLR0::FBM::Lsb,
        });

        reg.get()
    }
}
