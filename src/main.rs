use clap::Parser;
use tracing_subscriber::EnvFilter;

use shader_preview::clock::FrameClock;
use shader_preview::window::GlBackend;
use shader_preview::{App, PreviewConfig};

mod args;

use args::Args;

fn main() {
    let args = <Args as Parser>::parse();

    initialise_tracing(if args.verbose { "debug" } else { "info" });

    let clock = FrameClock::start();
    let config = PreviewConfig::from(args);

    // no window means nothing to show, leave quietly
    let backend = match GlBackend::new(&config.window) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("Could not create window: {e}");
            return;
        }
    };

    let result = App::new(backend, clock, &config).and_then(App::run);

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn initialise_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
