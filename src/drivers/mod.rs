pub mod coil;
pub mod hw_init;
pub mod hw_timer;
pub mod i2c_bang;
pub mod ring_buffer;
pub mod task_pin;
pub mod tick;
pub mod uart;
