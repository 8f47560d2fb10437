pub mod burst;
pub mod scheduler;

pub use burst::{Burst, BurstReport};
pub use scheduler::{Scheduler, TICK_PERIOD};
