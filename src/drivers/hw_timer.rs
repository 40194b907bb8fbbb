//! One-second timer slot using ESP-IDF's esp_timer API.
//!
//! [`EspSecondsTimer`] creates a 1 Hz periodic timer on `start` and deletes
//! it on `stop`.  Its callback executes in the ESP timer task context and
//! does nothing but tick the installed [`SecondsCounter`].
//!
//! [`SimSecondsTimer`] is the host stand-in: every `idle` poll advances
//! virtual time, and the span of every armed period is recorded so tests
//! can assert on phase durations without waiting for them.

use crate::app::ports::SecondsTimer;
use crate::app::sequencer::SecondsCounter;
use crate::error::TimerError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── ESP-IDF timer ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct EspSecondsTimer {
    handle: esp_timer_handle_t,
    /// Boxed so the callback argument stays put while the timer runs.
    slot: Option<Box<SecondsCounter>>,
    poll_ms: u32,
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn seconds_tick_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` points at the boxed counter in `EspSecondsTimer::slot`,
    // which outlives the timer: `stop()` deletes the timer before the box.
    let counter = unsafe { &*(arg as *const SecondsCounter) };
    counter.tick();
}

#[cfg(target_os = "espidf")]
impl EspSecondsTimer {
    /// `poll_ms` is how long the sequencer sleeps between counter reads.
    pub fn new(poll_ms: u32) -> Self {
        Self {
            handle: core::ptr::null_mut(),
            slot: None,
            poll_ms,
        }
    }
}

#[cfg(target_os = "espidf")]
impl SecondsTimer for EspSecondsTimer {
    fn start(&mut self, counter: SecondsCounter) -> Result<(), TimerError> {
        if self.slot.is_some() {
            return Err(TimerError::SlotBusy);
        }
        let slot = Box::new(counter);
        let args = esp_timer_create_args_t {
            callback: Some(seconds_tick_cb),
            arg: core::ptr::from_ref::<SecondsCounter>(&slot).cast_mut().cast(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"seconds\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };

        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: `args` and the boxed counter are valid for the lifetime of
        // the timer; the handle is only used from this (main) task.
        unsafe {
            let ret = esp_timer_create(&args, &mut handle);
            if ret != ESP_OK as i32 {
                return Err(TimerError::CreateFailed(ret));
            }
            let ret = esp_timer_start_periodic(handle, 1_000_000); // 1s
            if ret != ESP_OK as i32 {
                esp_timer_delete(handle);
                return Err(TimerError::StartFailed(ret));
            }
        }

        self.handle = handle;
        self.slot = Some(slot);
        Ok(())
    }

    fn stop(&mut self) {
        if !self.handle.is_null() {
            // SAFETY: handle came from esp_timer_create in start(); null-check
            // prevents a double delete.
            unsafe {
                esp_timer_stop(self.handle);
                esp_timer_delete(self.handle);
            }
            self.handle = core::ptr::null_mut();
        }
        self.slot = None;
    }

    fn idle(&mut self) {
        esp_idf_hal::delay::FreeRtos::delay_ms(self.poll_ms);
    }
}

#[cfg(target_os = "espidf")]
impl Drop for EspSecondsTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Simulated timer ───────────────────────────────────────────

/// Virtual-time timer: one `idle` poll = `step` seconds.
#[derive(Debug, Default)]
pub struct SimSecondsTimer {
    slot: Option<SecondsCounter>,
    step: u32,
    span: u32,
    spans: Vec<u32>,
    fail_start: bool,
}

impl SimSecondsTimer {
    pub fn new() -> Self {
        Self::with_step(1)
    }

    /// Each poll delivers `step` ticks at once, as a slow poller would see.
    pub fn with_step(step: u32) -> Self {
        Self {
            step: step.max(1),
            ..Self::default()
        }
    }

    /// A timer whose `start` always fails.
    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::new()
        }
    }

    /// Seconds elapsed in every completed armed period, in order.
    pub fn spans(&self) -> &[u32] {
        &self.spans
    }

    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }
}

impl SecondsTimer for SimSecondsTimer {
    fn start(&mut self, counter: SecondsCounter) -> Result<(), TimerError> {
        if self.fail_start {
            return Err(TimerError::StartFailed(-1));
        }
        if self.slot.is_some() {
            return Err(TimerError::SlotBusy);
        }
        self.slot = Some(counter);
        self.span = 0;
        Ok(())
    }

    fn stop(&mut self) {
        if self.slot.take().is_some() {
            self.spans.push(self.span);
        }
    }

    fn idle(&mut self) {
        match &self.slot {
            Some(counter) => {
                for _ in 0..self.step {
                    counter.tick();
                }
                self.span += self.step;
            }
            None => std::thread::yield_now(),
        }
    }
}
