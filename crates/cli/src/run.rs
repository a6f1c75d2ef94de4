use crate::cli::{Cli, Command};
use crate::error::Error;
use cloudapi::HttpCloudApi;
use config::Config;
use orchestrator::clock::{Clock, SystemClock};
use orchestrator::notify;
use orchestrator::persistence::{JsonFileRepository, RetryPolicy};
use orchestrator::{Scheduler, Services};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};

/// Run the pass selected on the command line and write its report to `out`.
///
/// The exit code is a failure when the pending state could not be saved.
pub async fn run(cli: &Cli, out: &mut impl Write) -> Result<ExitCode, Error> {
    if cli.command == Command::Config {
        let config = match &cli.conffile {
            Some(path) => Config::load(path)?,
            None => Config::new(),
        };
        write!(out, "{}", config.to_toml()?)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &cli.conffile {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    debug!(?config, "configuration loaded");

    let scheduler = Scheduler::new(config.clone(), services(&config)?);
    let state_saved = match cli.command {
        Command::Create { dry_run } => {
            let report = scheduler.create_pass(dry_run).await?;
            write!(out, "{report}")?;
            !report.persisted.is_failed()
        }
        Command::Check => {
            let report = scheduler.check_pass().await?;
            write!(out, "{report}")?;
            !report.persisted.is_failed()
        }
        Command::Reap { dry_run } => {
            let report = scheduler.reap_pass(dry_run).await?;
            write!(out, "{report}")?;
            true
        }
        Command::Config => true,
    };

    if state_saved {
        Ok(ExitCode::SUCCESS)
    } else {
        error!(path = %config.persistence.state_path.display(), "pending state was lost");
        Ok(ExitCode::FAILURE)
    }
}

fn services(config: &Config) -> Result<Services, Error> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    Ok(Services {
        api: Box::new(HttpCloudApi::new(&config.api)?),
        repo: Box::new(JsonFileRepository::new(
            &config.persistence.state_path,
            RetryPolicy::from_config(&config.persistence),
            clock.clone(),
        )),
        notifier: notify::from_config(&config.notification)?,
        clock,
    })
}
