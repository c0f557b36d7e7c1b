//! Timer engine: the countdown state machine, the micro-break prompt
//! scheduler and the clock abstraction that keeps both testable.

pub mod clock;
pub mod controller;
pub mod prompt;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{TimerController, BREAK_AUTOSTART_DELAY_SECS};
pub use prompt::{PromptScheduler, PromptSignal};
