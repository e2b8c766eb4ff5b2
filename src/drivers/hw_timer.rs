//! Hardware tick timer using ESP-IDF's esp_timer API.
//!
//! A periodic timer calls [`Tick::on_compare`] on the process-wide
//! [`TICK`] counter.  On simulation targets no timer is started and the
//! counter stays at zero.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR); they
//! only touch the atomics inside [`Tick`].

use crate::config::TICK_US_PER_COMPARE;
use crate::drivers::tick::Tick;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

/// Uptime counter, written only by the tick callback.
pub static TICK: Tick = Tick::new(TICK_US_PER_COMPARE);

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: TICK_TIMER is written once in `start_tick_timer()` before any
/// timer callbacks fire.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn tick_timer() -> esp_timer_handle_t { unsafe { TICK_TIMER } }

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    TICK.on_compare();
}

/// Start the periodic tick timer (one compare every
/// [`TICK_US_PER_COMPARE`] microseconds).
#[cfg(target_os = "espidf")]
pub fn start_tick_timer() {
    // SAFETY: TICK_TIMER is written here once at boot from the single
    // main-task context before any timer callbacks fire.  The callback
    // only touches atomics.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"tick\0".as_ptr() as *const _,
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer create failed (rc={}); uptime will read 0", ret);
            return;
        }
        let ret = esp_timer_start_periodic(tick_timer(), u64::from(TICK_US_PER_COMPARE));
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer start failed (rc={})", ret);
            return;
        }
        info!("hw_timer: tick every {}us started", TICK_US_PER_COMPARE);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer() {
    log::info!("hw_timer(sim): tick timer not started");
}
