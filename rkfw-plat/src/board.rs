//! Voltage domains of the RK3588 reference board
//!
//! One domain, the SD card I/O rail (`vccio_sd_s0`), fed by PLDO5 of the
//! master RK806. The SD/MMC SiP service switches its signalling voltage
//! through the same registry the SCMI agent uses, so both see one cached
//! level.

use rkfw_mmio::MmioRegion;
use rkfw_pal::GenericTimer;
use rkfw_rk806::{PmicError, RegisterBus, RegulatorId, Rk806, SpiRegisterBus};
use rkfw_scmi::{
    DomainIndex, DomainOps, DomainRegistry, Response, ScmiResult, ScmiStatus, VoltageDomain,
    VoltdPlatform, VoltdResponder,
};
use rkfw_spi::RkSpi;
use spin::{Mutex, Once};

use crate::config::{BoardConfig, SPI_REGION_SIZE};

/// SCMI domain id of the SD card I/O rail
pub const VCCIO_SD_S0: u32 = 0;

/// Number of voltage domains on this board
pub const DOMAIN_COUNT: usize = 1;

/// Agent the SD/MMC service acts as
const SDMMC_AGENT: u32 = 0;

/// Responder over an RK806 reached through `B`.
pub type BoardVoltd<B> = VoltdResponder<DomainRegistry<Rk806<B>, RegulatorId, DOMAIN_COUNT>>;

type HwBus = SpiRegisterBus<RkSpi<MmioRegion, GenericTimer>>;

static VOLTD: Once<Mutex<BoardVoltd<HwBus>>> = Once::new();

/// Map a PMIC failure onto the status reported to agents.
pub fn pmic_status(err: PmicError) -> ScmiStatus {
    match err {
        PmicError::InvalidArgument => ScmiStatus::InvalidParameters,
        PmicError::Bus(_) | PmicError::VerifyFailed => ScmiStatus::HardwareError,
    }
}

fn level_uv(level: i32) -> ScmiResult<u32> {
    u32::try_from(level).map_err(|_| ScmiStatus::InvalidParameters)
}

fn pmic_get_level<B: RegisterBus>(pmic: &mut Rk806<B>, id: RegulatorId) -> ScmiResult<i32> {
    // A selector that does not decode on read-back is a hardware fault
    let uv = pmic.get_voltage(id).map_err(|_| ScmiStatus::HardwareError)?;
    i32::try_from(uv).map_err(|_| ScmiStatus::HardwareError)
}

fn pmic_set_level<B: RegisterBus>(pmic: &mut Rk806<B>, id: RegulatorId, level: i32) -> ScmiResult {
    pmic.set_voltage(id, level_uv(level)?).map_err(pmic_status)
}

fn pmic_get_state<B: RegisterBus>(pmic: &mut Rk806<B>, id: RegulatorId) -> ScmiResult<bool> {
    pmic.get_enable(id).map_err(pmic_status)
}

fn pmic_set_state<B: RegisterBus>(pmic: &mut Rk806<B>, id: RegulatorId, enable: bool) -> ScmiResult {
    pmic.set_enable(id, enable).map_err(pmic_status)
}

fn rk806_ops<B: RegisterBus>() -> DomainOps<Rk806<B>, RegulatorId> {
    DomainOps {
        get_level: Some(pmic_get_level::<B>),
        set_level: Some(pmic_set_level::<B>),
        get_state: Some(pmic_get_state::<B>),
        set_state: Some(pmic_set_state::<B>),
        get_state_custom: None,
        set_state_custom: None,
    }
}

/// Domain table, indexed by SCMI domain id.
pub fn domains<B: RegisterBus>() -> [VoltageDomain<Rk806<B>, RegulatorId>; DOMAIN_COUNT] {
    [VoltageDomain::new(
        "scmi_vccio_sd_s0",
        1_800_000,
        3_300_000,
        12_500,
        3_300_000,
        RegulatorId::MASTER_PLDO5,
        rk806_ops(),
    )]
}

/// Build the responder around a PMIC register bus.
pub fn build<B: RegisterBus>(bus: B) -> BoardVoltd<B> {
    VoltdResponder::new(DomainRegistry::new(Rk806::new(bus), domains()))
}

/// Set the SD signalling voltage through the registry.
pub fn set_signal_voltage<P: VoltdPlatform>(voltd: &mut VoltdResponder<P>, microvolts: u32) -> ScmiResult {
    let count = voltd.platform().domain_count(SDMMC_AGENT);
    let domain = DomainIndex::new(VCCIO_SD_S0, count).ok_or(ScmiStatus::NotFound)?;
    let level = i32::try_from(microvolts).map_err(|_| ScmiStatus::InvalidParameters)?;
    voltd.platform_mut().set_level(SDMMC_AGENT, domain, level)
}

/// Bring up the timer, debug console and logger.
///
/// # Safety
///
/// `config.console_base` must be the mapped register block of an
/// initialised DW8250 UART.
pub unsafe fn early_init(config: &BoardConfig) {
    rkfw_pal::timer::init();
    // SAFETY: Caller guarantees the console base is a live UART
    unsafe { rkfw_pal::console::init(config.console_base) };
    rkfw_pal::println!("rkfw: rk3588 reference, console @ {:#x}", config.console_base);
    rkfw_pal::logger::init(config.log_level);
}

/// Bring up the PMIC SPI bus and install the voltage domain responder.
///
/// Later calls are no-ops.
///
/// # Safety
///
/// `config.spi_base` must be the mapped register block of the SPI
/// controller wired to the RK806, clocked at `config.spi_clock_hz`, and
/// nothing else may drive that controller.
pub unsafe fn init(config: &BoardConfig) {
    VOLTD.call_once(|| {
        // SAFETY: Caller guarantees exclusive ownership of the SPI block
        let regs = unsafe { MmioRegion::new(config.spi_base, SPI_REGION_SIZE) };
        let spi = RkSpi::new(regs, GenericTimer, config.spi_clock_hz);
        let bus = SpiRegisterBus::with_speed(spi, config.pmic_speed_hz);
        Mutex::new(build(bus))
    });
    log::info!(
        "board: voltd ready, {} domain(s), spi@{:#x}",
        DOMAIN_COUNT,
        config.spi_base
    );
}

fn with_voltd<R>(f: impl FnOnce(&mut BoardVoltd<HwBus>) -> R) -> Option<R> {
    VOLTD.get().map(|voltd| f(&mut voltd.lock()))
}

/// SCMI transport entry: handle one voltage domain request.
pub fn scmi_voltd_dispatch(agent: u32, message_id: u32, payload: &[u8]) -> Response {
    with_voltd(|voltd| voltd.dispatch(agent, message_id, payload)).unwrap_or_else(|| {
        log::warn!("board: voltd request before init");
        Response::status(ScmiStatus::GenericError)
    })
}

/// SD/MMC SiP entry: switch the card I/O rail to `microvolts`.
pub fn sdmmc_set_signal_voltage(microvolts: u32) -> ScmiResult {
    with_voltd(|voltd| set_signal_voltage(voltd, microvolts)).unwrap_or(Err(ScmiStatus::GenericError))
}
