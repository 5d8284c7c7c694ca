//! Regulator identifiers
//!
//! A regulator is named by its family, its zero-based index within the
//! family and the PMIC it sits on. Identifiers are validated once at
//! construction; everything downstream works on the decoded fields.

use core::fmt;

/// Regulator family
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Switching step-down converter
    Buck,
    /// N-channel LDO
    Nldo,
    /// P-channel LDO
    Pldo,
}

impl Family {
    /// Instances of this family on one RK806
    pub const fn count(self) -> u8 {
        match self {
            Self::Buck => 10,
            Self::Nldo => 5,
            Self::Pldo => 6,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Buck => "buck",
            Self::Nldo => "nldo",
            Self::Pldo => "pldo",
        }
    }
}

/// Which RK806 on the shared SPI bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chip {
    Master,
    Slave,
}

impl Chip {
    /// SPI chip-select line for this chip
    pub const fn chip_select(self) -> u8 {
        match self {
            Self::Master => 0,
            Self::Slave => 1,
        }
    }
}

/// A validated regulator identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegulatorId {
    family: Family,
    index: u8,
    chip: Chip,
}

impl RegulatorId {
    /// Master PLDO5 (zero-based index 5), the SD card I/O rail on the
    /// reference board
    pub const MASTER_PLDO5: Self = Self { family: Family::Pldo, index: 5, chip: Chip::Master };

    /// Build an identifier, or `None` if `index` does not exist in `family`.
    pub const fn new(family: Family, index: u8, chip: Chip) -> Option<Self> {
        if index < family.count() {
            Some(Self { family, index, chip })
        } else {
            None
        }
    }

    pub const fn family(&self) -> Family {
        self.family
    }

    /// Zero-based index within the family
    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn chip(&self) -> Chip {
        self.chip
    }

    /// One-based regulator number as printed on the datasheet
    pub const fn number(&self) -> u8 {
        self.index + 1
    }
}

impl fmt::Display for RegulatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chip = match self.chip {
            Chip::Master => "master",
            Chip::Slave => "slave",
        };
        write!(f, "{}/{}{}", chip, self.family.name(), self.index)
    }
}
