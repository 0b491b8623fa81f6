use crate::blocking_queue::BlockingQueue;
use crate::config::LightConfig;
use crate::phase::{AtomicPhase, Phase};
use crate::random::random_duration;
use crate::Result;
use std::mem;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info, trace, warn};

struct Shared {
    phase: AtomicPhase,
    queue: BlockingQueue<Phase>,
    stopped: AtomicBool,
    toggles: AtomicU64,
}

/// A single light alternating between red and green on a random timer.
///
/// The light starts red. [`simulate`](Self::simulate) starts the timing
/// loop on its own thread; from then on every phase change is published to
/// an internal [`BlockingQueue`] that [`wait_for_green`](Self::wait_for_green)
/// consumes. Each notification reaches exactly one waiter, so with several
/// vehicles waiting only one of them is released per green phase.
///
/// Dropping the light stops the timing loop and joins its thread.
pub struct TrafficLight {
    shared: Arc<Shared>,
    config: LightConfig,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl TrafficLight {
    pub fn new() -> TrafficLight {
        TrafficLight {
            shared: Arc::new(Shared {
                phase: AtomicPhase::new(Phase::Red),
                queue: BlockingQueue::new(),
                stopped: AtomicBool::new(false),
                toggles: AtomicU64::new(0),
            }),
            config: LightConfig::default(),
            threads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_config(config: LightConfig) -> Result<TrafficLight> {
        config.validate()?;
        let mut light = TrafficLight::new();
        light.config = config;
        Ok(light)
    }

    pub fn config(&self) -> &LightConfig {
        &self.config
    }

    /// Current phase, read without synchronizing with the timing thread.
    ///
    /// The value may already be outdated when the caller looks at it.
    pub fn current_phase(&self) -> Phase {
        self.shared.phase.load()
    }

    /// Number of phase changes published so far.
    pub fn toggle_count(&self) -> u64 {
        self.shared.toggles.load(Ordering::Relaxed)
    }

    /// Another handle to the queue phase changes are published on.
    ///
    /// Values taken from it are no longer seen by `wait_for_green`.
    pub fn phase_queue(&self) -> BlockingQueue<Phase> {
        self.shared.queue.clone()
    }

    /// Starts the timing loop on a new thread and returns immediately.
    ///
    /// Calling this more than once starts competing loops that toggle the
    /// same phase. Fails only if the OS refuses to create the thread.
    pub fn simulate(&self) -> Result<()> {
        if self.shared.stopped.load(Ordering::Acquire) {
            warn!("simulate called on a stopped traffic light, the timing loop will exit at once");
        }

        let shared = self.shared.clone();
        let config = self.config;
        let handle = thread::Builder::new()
            .name("traffic-light".into())
            .spawn(move || cycle_through_phases(&shared, &config))?;

        let mut threads = self.threads.lock().unwrap_or_else(PoisonError::into_inner);
        threads.push(handle);
        if threads.len() > 1 {
            warn!(loops = threads.len(), "more than one timing loop running");
        }
        Ok(())
    }

    /// Blocks until a green notification is delivered to this caller.
    ///
    /// Red notifications taken along the way are discarded. The green one may
    /// be stale: the light can already have turned red again when this
    /// returns. There is no timeout, and stopping the light does not release
    /// callers blocked here.
    pub fn wait_for_green(&self) {
        loop {
            let phase = self.shared.queue.receive();
            if phase.is_green() {
                debug!("green notification received");
                return;
            }
            trace!(%phase, "discarding notification");
        }
    }

    /// Asks the timing loop to exit. It notices within one poll interval.
    ///
    /// Stopping is permanent.
    pub fn stop(&self) {
        self.shared.stopped.store(true, Ordering::Release);
    }

    /// Stops the timing loop and waits for its thread to finish.
    pub fn join(&self) {
        self.stop();
        let handles = {
            let mut threads = self.threads.lock().unwrap_or_else(PoisonError::into_inner);
            mem::take(&mut *threads)
        };
        for handle in handles {
            if let Err(e) = handle.join() {
                error!("timing loop panicked: {:?}", e);
            }
        }
    }
}

impl Drop for TrafficLight {
    fn drop(&mut self) {
        self.join();
    }
}

fn cycle_through_phases(shared: &Shared, config: &LightConfig) {
    info!(
        min_ms = config.min_cycle.as_millis() as u64,
        max_ms = config.max_cycle.as_millis() as u64,
        "timing loop started"
    );

    let mut cycle = random_duration(config.min_cycle, config.max_cycle);
    let mut start = Instant::now();
    while !shared.stopped.load(Ordering::Acquire) {
        let elapsed = start.elapsed();
        if elapsed >= cycle {
            let phase = shared.phase.toggle();
            shared.toggles.fetch_add(1, Ordering::Relaxed);
            info!(%phase, elapsed_ms = elapsed.as_millis() as u64, "phase changed");
            shared.queue.send(phase);

            start = Instant::now();
            cycle = random_duration(config.min_cycle, config.max_cycle);
        }
        thread::sleep(config.poll_interval);
    }

    info!(toggles = shared.toggles.load(Ordering::Relaxed), "timing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::TrafficLight;
    use crate::config::LightConfig;
    use crate::phase::Phase;
    use std::time::Duration;

    #[test]
    fn starts_red_and_idle() {
        let light = TrafficLight::new();
        assert_eq!(light.current_phase(), Phase::Red);
        assert_eq!(light.toggle_count(), 0);
        assert!(light.phase_queue().is_empty());
    }

    #[test]
    fn rejects_invalid_config() {
        let config = LightConfig::default().with_poll_interval(Duration::ZERO);
        assert!(TrafficLight::with_config(config).is_err());
    }

    #[test]
    fn green_after_red_is_taken_first() {
        let light = TrafficLight::new();
        let queue = light.phase_queue();
        queue.send(Phase::Red);
        queue.send(Phase::Green);

        light.wait_for_green();
        assert_eq!(queue.try_receive(), Some(Phase::Red));
    }

    #[test]
    fn red_on_top_is_discarded() {
        let light = TrafficLight::new();
        let queue = light.phase_queue();
        queue.send(Phase::Green);
        queue.send(Phase::Red);

        light.wait_for_green();
        assert!(queue.is_empty());
    }

    #[test]
    fn join_without_simulate() {
        let light = TrafficLight::new();
        light.join();
        light.join();
        assert_eq!(light.toggle_count(), 0);
    }
}
