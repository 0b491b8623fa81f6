use clap::Parser;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber;
use traffic_light::{CountdownLatch, LightConfig, Result, TrafficLight};

struct Vehicle {
    id: usize,
    rounds: usize,
    light: Arc<TrafficLight>,
    crossed: CountdownLatch,
}

impl Vehicle {
    fn run(self) {
        let start = Instant::now();
        for round in 1..=self.rounds {
            info!("vehicle-{} waiting at red, round {}", self.id, round);
            self.light.wait_for_green();
            info!(
                "vehicle-{} crossed after {:.3}s, light is {}",
                self.id,
                start.elapsed().as_secs_f64(),
                self.light.current_phase()
            );
        }
        self.crossed.countdown();
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Options {
    /// number of vehicles queued at the light
    #[clap(short, long)]
    #[clap(default_value_t = 3)]
    vehicles: usize,

    /// times each vehicle goes through the intersection
    #[clap(short, long)]
    #[clap(default_value_t = 1)]
    rounds: usize,

    /// shortest phase in milliseconds
    #[clap(long)]
    #[clap(default_value_t = 4000)]
    min_cycle_ms: u64,

    /// longest phase in milliseconds
    #[clap(long)]
    #[clap(default_value_t = 6000)]
    max_cycle_ms: u64,

    /// timing loop polling interval in milliseconds
    #[clap(short, long)]
    #[clap(default_value_t = 1)]
    poll_ms: u64,
}

fn main() -> Result<()> {
    // install global collector configured based on RUST_LOG env var.
    tracing_subscriber::fmt::init();

    let options = Options::parse();
    let config = LightConfig::default()
        .with_cycle(
            Duration::from_millis(options.min_cycle_ms),
            Duration::from_millis(options.max_cycle_ms),
        )
        .with_poll_interval(Duration::from_millis(options.poll_ms));

    let light = match TrafficLight::with_config(config) {
        Ok(light) => Arc::new(light),
        Err(e) => {
            error!("invalid configuration: {}", e);
            return Err(e);
        }
    };

    let crossed = CountdownLatch::new(options.vehicles);
    let mut handles = Vec::with_capacity(options.vehicles);
    for id in 1..=options.vehicles {
        let vehicle = Vehicle {
            id,
            rounds: options.rounds,
            light: light.clone(),
            crossed: crossed.clone(),
        };
        let handle = thread::Builder::new()
            .name(format!("vehicle-{}", id))
            .spawn(move || vehicle.run())?;
        handles.push(handle);
    }

    light.simulate()?;
    info!("{} vehicles waiting, light is {}", options.vehicles, light.current_phase());

    crossed.wait();
    for handle in handles {
        if handle.join().is_err() {
            error!("vehicle thread panicked");
        }
    }

    light.join();
    info!("all vehicles crossed after {} phase changes", light.toggle_count());

    Ok(())
}
