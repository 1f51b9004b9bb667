use tracing_subscriber::EnvFilter;

mod config;
mod engine;
mod library;
mod now_playing;
mod persist;
mod remote;
mod runtime;
mod session;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("segue=info")),
        )
        .init();

    runtime::run()
}
