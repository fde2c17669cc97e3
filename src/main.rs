use env_logger::Env;
use log::error;
use std::process::ExitCode;
use std::sync::Arc;
use weather_collector::{error_chain, CollectorError, Config, Job, Scheduler};

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

async fn start() -> Result<(), CollectorError> {
    let config = Config::from_env()?;
    let job = Arc::new(Job::from_config(&config));
    Scheduler::new(config.schedule).run(job).await;
    Ok(())
}
