use std::process;

use tracing::error;
use tracing_subscriber::EnvFilter;

use skiff_core::Settings;

mod demo;
mod map;
mod physics;
mod race;
mod store;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!("could not read settings: {}", e);
            process::exit(1);
        }
    };

    // kick off the race loop
    if let Err(e) = demo::run(&settings) {
        error!("race setup failed: {}", e);
        process::exit(1);
    }
}
