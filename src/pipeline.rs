use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::category_logger::{CategoryLogger, IngestStats};
use crate::clock::Clock;
use crate::destination::LogDestination;
use crate::error::Result;
use crate::line_source::{LineSource, ReadOutcome};

/// Cooperative cancellation token for the ingestion loop.
///
/// Cloning shares the flag. The loop checks it once per iteration, so a stop
/// takes effect within one read timeout. Interrupt handlers only ever set it.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Reads lines until stopped or the source runs dry.
///
/// Each line is ingested and followed by a flush check. Timeouts also get a
/// flush check, so a quiet device is still flushed on schedule. A stop request
/// and the end of a finite stream both end the loop with `Ok`.
///
/// This does not shut the logger down; see [`run_to_completion`].
pub fn run<S, D, C>(
    source: &mut S,
    logger: &mut CategoryLogger<D>,
    clock: &C,
    stop: &StopSignal,
) -> Result<IngestStats>
where
    S: LineSource + ?Sized,
    D: LogDestination,
    C: Clock + ?Sized,
{
    loop {
        if stop.is_stop_requested() {
            info!("stop requested, leaving ingestion loop");
            break;
        }

        match source.read_line()? {
            ReadOutcome::Line(raw) => {
                logger.ingest(&raw, clock.now())?;
                logger.maybe_flush(clock.now())?;
            }
            ReadOutcome::Timeout => {
                logger.maybe_flush(clock.now())?;
            }
            ReadOutcome::EndOfStream => {
                debug!("line source exhausted");
                break;
            }
        }
    }

    Ok(logger.stats())
}

/// Runs the loop and then always shuts the logger down and closes the source,
/// whether the loop ended cleanly or with an error.
///
/// A loop error takes precedence over a shutdown error; both are logged.
pub fn run_to_completion<S, D, C>(
    source: &mut S,
    logger: &mut CategoryLogger<D>,
    clock: &C,
    stop: &StopSignal,
) -> Result<IngestStats>
where
    S: LineSource + ?Sized,
    D: LogDestination,
    C: Clock + ?Sized,
{
    let outcome = run(source, logger, clock, stop);
    if let Err(err) = &outcome {
        warn!(error = %err, "ingestion loop failed, shutting down");
    }

    let shutdown = logger.shutdown();
    source.close();

    let stats = outcome?;
    shutdown?;
    Ok(stats)
}
