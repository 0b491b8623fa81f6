pub mod blocking_queue;
pub mod config;
pub mod countdown_latch;
pub mod phase;
pub mod random;
pub mod traffic_light;

pub use blocking_queue::BlockingQueue;
pub use config::{ConfigError, LightConfig};
pub use countdown_latch::CountdownLatch;
pub use phase::{AtomicPhase, Phase};
pub use traffic_light::TrafficLight;

/// Error returned by most functions.
///
/// Failures here are rare and never on a hot path: a rejected
/// [`LightConfig`] or the OS refusing to spawn the timing thread. A boxed
/// `std::error::Error` carries either one to the caller. [`ConfigError`]
/// is the specialized error for configuration problems and converts into
/// this type with `?`.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` type for traffic light operations.
///
/// This is defined as a convenience.
pub type Result<T> = std::result::Result<T, Error>;
