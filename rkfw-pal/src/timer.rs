//! ARM Generic Timer Support
//!
//! Microsecond time for driver timeouts. The physical counter is read on
//! AArch64; other targets report zero so the free functions stay callable
//! from host tests.
//!
//! Drivers take a [`TimeSource`] instead of calling [`now_us`] directly,
//! which lets tests advance time deterministically.

use core::sync::atomic::{AtomicU64, Ordering};

/// Counter frequency, latched from CNTFRQ_EL0 by [`init`]
static TIMER_FREQ: AtomicU64 = AtomicU64::new(0);

#[cfg(target_arch = "aarch64")]
fn read_cntfrq() -> u64 {
    use aarch64_cpu::registers::CNTFRQ_EL0;
    use tock_registers::interfaces::Readable;

    CNTFRQ_EL0.get()
}

#[cfg(not(target_arch = "aarch64"))]
fn read_cntfrq() -> u64 {
    0
}

/// Read the physical counter
#[cfg(target_arch = "aarch64")]
pub fn read_counter() -> u64 {
    use aarch64_cpu::registers::CNTPCT_EL0;
    use tock_registers::interfaces::Readable;

    CNTPCT_EL0.get()
}

/// Read the physical counter
#[cfg(not(target_arch = "aarch64"))]
pub fn read_counter() -> u64 {
    0
}

/// Initialise the timer subsystem
pub fn init() {
    TIMER_FREQ.store(read_cntfrq(), Ordering::Relaxed);
}

/// Get the timer frequency in Hz
pub fn frequency() -> u64 {
    TIMER_FREQ.load(Ordering::Relaxed)
}

/// Convert a counter value to microseconds at `freq` Hz
///
/// Split into whole seconds and remainder so `count * 1e6` cannot overflow.
pub const fn ticks_to_us(count: u64, freq: u64) -> u64 {
    if freq == 0 {
        return 0;
    }
    let secs = count / freq;
    let frac = count % freq;
    secs * 1_000_000 + (frac * 1_000_000) / freq
}

/// Get current time in microseconds since the counter started
pub fn now_us() -> u64 {
    ticks_to_us(read_counter(), frequency())
}

/// Get current time in milliseconds since the counter started
pub fn now_ms() -> u64 {
    now_us() / 1000
}

/// A monotonic microsecond clock.
pub trait TimeSource {
    fn now_us(&self) -> u64;

    /// Busy-wait for `us` microseconds.
    fn delay_us(&self, us: u64) {
        let start = self.now_us();
        while self.now_us().wrapping_sub(start) < us {
            core::hint::spin_loop();
        }
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// The architectural counter as a [`TimeSource`].
///
/// [`init`] must have run, otherwise time stands still at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericTimer;

impl TimeSource for GenericTimer {
    #[inline]
    fn now_us(&self) -> u64 {
        now_us()
    }
}

/// A point in time after which a poll loop gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_us: u64,
}

impl Deadline {
    /// Deadline `timeout_us` microseconds from now.
    pub fn after<T: TimeSource>(timer: &T, timeout_us: u64) -> Self {
        Self {
            expires_us: timer.now_us().saturating_add(timeout_us),
        }
    }

    pub fn expired<T: TimeSource>(&self, timer: &T) -> bool {
        timer.now_us() > self.expires_us
    }

    pub const fn expires_us(&self) -> u64 {
        self.expires_us
    }
}

/// Poll `condition` until it holds or `timeout_us` elapses.
///
/// Returns `true` if the condition was observed, `false` on timeout. The
/// condition is sampled once more after the deadline so a slow clock cannot
/// cause a spurious timeout.
pub fn poll_until<T, F>(timer: &T, timeout_us: u64, mut condition: F) -> bool
where
    T: TimeSource,
    F: FnMut() -> bool,
{
    let deadline = Deadline::after(timer, timeout_us);
    loop {
        if condition() {
            return true;
        }
        if deadline.expired(timer) {
            return condition();
        }
        core::hint::spin_loop();
    }
}
