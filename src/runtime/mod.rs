//! Idle scheduler adapters for host event loops and the tokio runtime.

pub mod manual;
#[cfg(feature = "tokio-runtime")]
pub mod timer;

pub use manual::ManualIdleScheduler;
#[cfg(feature = "tokio-runtime")]
pub use timer::TimerIdleScheduler;
