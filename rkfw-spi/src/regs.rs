//! Rockchip SPI controller register map

use tock_registers::register_bitfields;

// -- Register offsets

/// Control Register 0
pub const CTRLR0: usize = 0x0000;
/// Control Register 1 (receive-only frame count)
pub const CTRLR1: usize = 0x0004;
/// SPI Enable
pub const ENR: usize = 0x0008;
/// Slave Enable (chip select)
pub const SER: usize = 0x000C;
/// Baud Rate Select (clock divider)
pub const BAUDR: usize = 0x0010;
/// Transmit FIFO Threshold Level
pub const TXFTLR: usize = 0x0014;
/// Receive FIFO Threshold Level
pub const RXFTLR: usize = 0x0018;
/// Transmit FIFO Level
pub const TXFLR: usize = 0x001C;
/// Receive FIFO Level
pub const RXFLR: usize = 0x0020;
/// Status Register
pub const SR: usize = 0x0024;
/// Interrupt Polarity
pub const IPR: usize = 0x0028;
/// Interrupt Mask
pub const IMR: usize = 0x002C;
/// Interrupt Status
pub const ISR: usize = 0x0030;
/// Raw Interrupt Status
pub const RISR: usize = 0x0034;
/// Interrupt Clear
pub const ICR: usize = 0x0038;
/// DMA Control
pub const DMACR: usize = 0x003C;
/// DMA Transmit Data Level
pub const DMATDLR: usize = 0x0040;
/// DMA Receive Data Level
pub const DMARDLR: usize = 0x0044;
/// Transmit FIFO Data
pub const TXDR: usize = 0x0400;
/// Receive FIFO Data
pub const RXDR: usize = 0x0800;

// -- Controller limits

/// Depth of each FIFO in frames
pub const FIFO_LENGTH: u32 = 64;

/// Chip-select lines present in SER
pub const SER_MASK: u32 = 0x3;

/// Maximum SCLK in master mode (Hz)
pub const MASTER_MAX_SCLK: u32 = 50_000_000;

/// Largest even value BAUDR accepts
pub const BAUDR_MAX: u32 = 0xfffe;

register_bitfields![u32,
    /// Control Register 0
    pub CTRLR0 [
        /// Data Frame Size
        DFS OFFSET(0) NUMBITS(2) [
            Bits4 = 0,
            Bits8 = 1,
            Bits16 = 2
        ],
        /// Control Frame Size (Microwire)
        CFS OFFSET(2) NUMBITS(4) [],
        /// Serial Clock Phase
        SCPH OFFSET(6) NUMBITS(1) [
            FirstEdge = 0,
            SecondEdge = 1
        ],
        /// Serial Clock Polarity
        SCPOL OFFSET(7) NUMBITS(1) [
            Low = 0,
            High = 1
        ],
        /// Chip select high cycles between frames
        CSM OFFSET(8) NUMBITS(2) [],
        /// SS_N to SCLK delay
        SSD OFFSET(10) NUMBITS(1) [
            HalfCycle = 0,
            OneCycle = 1
        ],
        /// Endian Mode
        EM OFFSET(11) NUMBITS(1) [
            Little = 0,
            Big = 1
        ],
        /// First Bit Mode
        FBM OFFSET(12) NUMBITS(1) [
            Msb = 0,
            Lsb = 1
        ],
        /// Byte and Halfword Transform
        BHT OFFSET(13) NUMBITS(1) [
            Apb16 = 0,
            Apb8 = 1
        ],
        /// Rxd Sample Delay
        RSD OFFSET(14) NUMBITS(2) [],
        /// Frame Format
        FRF OFFSET(16) NUMBITS(2) [
            Motorola = 0
        ],
        /// Transfer Mode
        XFM OFFSET(18) NUMBITS(2) [
            TransmitReceive = 0,
            TransmitOnly = 1,
            ReceiveOnly = 2
        ],
        /// Operation Mode
        OPM OFFSET(20) NUMBITS(1) [
            Master = 0,
            Slave = 1
        ]
    ],

    /// Status Register
    pub SR [
        /// Transfer in progress
        BUSY OFFSET(0) NUMBITS(1) [],
        /// Transmit FIFO full
        TF_FULL OFFSET(1) NUMBITS(1) [],
        /// Transmit FIFO empty
        TF_EMPTY OFFSET(2) NUMBITS(1) [],
        /// Receive FIFO empty
        RF_EMPTY OFFSET(3) NUMBITS(1) [],
        /// Receive FIFO full
        RF_FULL OFFSET(4) NUMBITS(1) []
    ]
];
