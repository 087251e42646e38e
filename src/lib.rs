// Library surface for headless/integration tests and reuse.
// Terminal drawing stays in the binary (main.rs + ui/).
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod controller;
pub mod engine;
pub mod entry;
pub mod feedback;
pub mod logging;
pub mod presenter;
pub mod runtime;

pub use controller::RingController;
pub use engine::{BoundaryEvent, InvalidDurationError, Snapshot, TimerSession};
