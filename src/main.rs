use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info, warn};

use sentence_logger::display::{spawn_display, DEFAULT_REFRESH_INTERVAL};
use sentence_logger::{
    run_to_completion, telemetry, CategoryLogger, CliArgs, LoggerConfig, SerialLineSource,
    StopSignal, SystemClock,
};

fn main() -> Result<ExitCode> {
    let config = LoggerConfig::from(CliArgs::from_cli());

    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("cannot create log directory {}", config.log_dir.display()))?;
    let _guard = telemetry::init(&config.log_dir, config.display);

    let mut logger = CategoryLogger::create(&config.log_dir, Local::now())
        .context("cannot open run logs")?
        .with_flush_interval(config.flush_interval);
    info!(stamp = %logger.run_stamp(), port = %config.serial_port, "starting sentence logger");

    let stop = StopSignal::new();
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.request_stop())
            .context("cannot install interrupt handler")?;
    }

    let opened = SerialLineSource::open(&config.serial_port, config.baud_rate, config.read_timeout);
    let mut source = match opened {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error opening serial port '{}': {}", config.serial_port, err);
            error!(error = %err, "cannot open line source");
            if let Err(err) = logger.shutdown() {
                warn!(error = %err, "shutdown after failed open");
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let display = if config.display {
        let handle = spawn_display(logger.snapshot(), stop.clone(), DEFAULT_REFRESH_INTERVAL)
            .context("cannot start display")?;
        Some(handle)
    } else {
        None
    };

    let outcome = run_to_completion(&mut source, &mut logger, &SystemClock, &stop);

    stop.request_stop();
    if let Some(handle) = display {
        if handle.join().is_err() {
            warn!("display thread panicked");
        }
    }

    let stats = outcome.context("logging aborted")?;
    println!("Logging stopped.");
    info!(lines = stats.lines(), "sentence logger finished");
    Ok(ExitCode::SUCCESS)
}
