use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::category::{classify, Category};
use crate::clock::format_run_stamp;
use crate::destination::{FileDestination, LogDestination};
use crate::error::{LoggerError, Result};
use crate::log_line::LogLine;

/// Core of the sentence logger: classify, append, remember, flush.
///
/// This module provides [`CategoryLogger`], which owns the four per-run log
/// destinations and routes every ingested line to the raw log plus at most
/// one category log.

/// Flush cadence used unless the caller picks another one.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Text shown for a category that has not seen a line yet.
pub const NO_DATA: &str = "No data";

/// The most recent line seen per category.
///
/// This is the only state the terminal view is allowed to read. It is shared
/// behind a mutex and cloned out before rendering, so a slow terminal never
/// holds up ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastSeen {
    lines: [Option<LogLine>; 4],
}

impl LastSeen {
    pub fn get(&self, category: Category) -> Option<&LogLine> {
        self.lines[category.index()].as_ref()
    }

    /// Last sentence for `category`, or [`NO_DATA`].
    pub fn text(&self, category: Category) -> &str {
        self.get(category).map_or(NO_DATA, LogLine::text)
    }

    fn record(&mut self, category: Category, line: LogLine) {
        self.lines[category.index()] = Some(line);
    }
}

/// Last-seen state shared between the ingestion loop and a display thread.
pub type SharedLastSeen = Arc<Mutex<LastSeen>>;

/// Number of records appended per destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    counts: [u64; 4],
}

impl IngestStats {
    pub fn count(&self, category: Category) -> u64 {
        self.counts[category.index()]
    }

    /// Lines ingested so far; every one of them hit the raw log.
    pub fn lines(&self) -> u64 {
        self.count(Category::Raw)
    }

    /// Lines that matched none of the prefix rules.
    pub fn unclassified(&self) -> u64 {
        let classified: u64 = [Category::Gps, Category::Ais, Category::Debug]
            .iter()
            .map(|&c| self.count(c))
            .sum();
        self.lines() - classified
    }
}

/// Routes timestamped sentences into per-category append-only logs.
///
/// All four destinations share one lifecycle: they are opened together when
/// the logger is built, flushed together on a wall-clock cadence, and closed
/// together by [`shutdown`](CategoryLogger::shutdown). Dropping a logger that
/// was never shut down performs the shutdown.
///
/// # Thread Safety
///
/// The logger is driven by a single ingestion loop and is not shared. Only the
/// [`SharedLastSeen`] snapshot crosses threads.
///
/// # Examples
///
/// ```no_run
/// # use chrono::Local;
/// # use sentence_logger::{CategoryLogger, Category};
/// # fn main() -> sentence_logger::Result<()> {
/// let mut logger = CategoryLogger::create(".", Local::now())?;
/// let category = logger.ingest(b"$GNGLL,4916.45,N,12311.12,W,225444,A\r\n", Local::now())?;
/// assert_eq!(category, Some(Category::Gps));
/// logger.shutdown()?;
/// # Ok(())
/// # }
/// ```
pub struct CategoryLogger<D: LogDestination> {
    run_start: DateTime<Local>,
    destinations: [D; 4],
    last_seen: SharedLastSeen,
    stats: IngestStats,
    flush_interval: Duration,
    last_flush: DateTime<Local>,
    closed: bool,
}

impl CategoryLogger<FileDestination> {
    /// Opens the four log files of a run inside `dir`.
    ///
    /// Files are named `raw<stamp>.log`, `GPS<stamp>.log`, `AIS<stamp>.log` and
    /// `DBG<stamp>.log`, where `<stamp>` is `run_start` as `DDMMYYYYHHMMSS`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::OpenLog`] for the first file that cannot be
    /// opened. Files opened before it are closed first.
    pub fn create(dir: impl AsRef<Path>, run_start: DateTime<Local>) -> Result<Self> {
        let dir = dir.as_ref();
        let stamp = format_run_stamp(&run_start);
        let mut opened = Vec::with_capacity(Category::ALL.len());

        for category in Category::ALL {
            let path = dir.join(category.file_name(&stamp));
            match FileDestination::open(&path) {
                Ok(destination) => opened.push(destination),
                Err(source) => {
                    for destination in opened.iter_mut() {
                        if let Err(err) = destination.close() {
                            let path = destination.path().display();
                            warn!(path = %path, error = %err, "close after failed open");
                        }
                    }
                    return Err(LoggerError::OpenLog { path, source });
                }
            }
        }

        let destinations: [FileDestination; 4] = match opened.try_into() {
            Ok(destinations) => destinations,
            Err(_) => unreachable!("one destination is opened per category"),
        };

        info!(dir = %dir.display(), stamp = %stamp, "opened run logs");
        Ok(Self::with_destinations(run_start, destinations))
    }
}

impl<D: LogDestination> CategoryLogger<D> {
    /// Builds a logger over caller-supplied destinations, indexed by
    /// [`Category::index`].
    pub fn with_destinations(run_start: DateTime<Local>, destinations: [D; 4]) -> Self {
        Self {
            run_start,
            destinations,
            last_seen: Arc::new(Mutex::new(LastSeen::default())),
            stats: IngestStats::default(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            last_flush: run_start,
            closed: false,
        }
    }

    /// Replaces the flush cadence.
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn run_start(&self) -> &DateTime<Local> {
        &self.run_start
    }

    pub fn run_stamp(&self) -> String {
        format_run_stamp(&self.run_start)
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn is_shut_down(&self) -> bool {
        self.closed
    }

    /// Handle on the last-seen state, for display.
    pub fn snapshot(&self) -> SharedLastSeen {
        Arc::clone(&self.last_seen)
    }

    pub fn destination(&self, category: Category) -> &D {
        &self.destinations[category.index()]
    }

    /// Timestamps one raw line and appends it to the raw log and, if it
    /// matches a prefix rule, to that category's log.
    ///
    /// Undecodable bytes are replaced, never rejected. Returns the category
    /// the line was routed to, or `None` if it went to the raw log only.
    ///
    /// # Errors
    ///
    /// [`LoggerError::Write`] if a destination rejects the record, or
    /// [`LoggerError::Closed`] after shutdown.
    pub fn ingest(&mut self, raw: &[u8], now: DateTime<Local>) -> Result<Option<Category>> {
        if self.closed {
            return Err(LoggerError::Closed);
        }

        let line = LogLine::decode(raw, now);
        let record = line.to_record();

        self.append(Category::Raw, &record)?;
        let category = classify(line.text());
        if let Some(category) = category {
            self.append(category, &record)?;
        }
        trace!(category = ?category, text = line.text(), "ingested line");

        let mut last_seen = self.last_seen.lock();
        if let Some(category) = category {
            last_seen.record(category, line.clone());
        }
        last_seen.record(Category::Raw, line);

        Ok(category)
    }

    fn append(&mut self, category: Category, record: &str) -> Result<()> {
        self.destinations[category.index()]
            .append(record)
            .map_err(|source| LoggerError::Write { category, source })?;
        self.stats.counts[category.index()] += 1;
        Ok(())
    }

    /// Flushes every destination if at least the flush interval has passed
    /// since the previous flush. Returns whether a flush happened.
    ///
    /// If the wall clock steps backwards the interval restarts from `now`.
    /// After shutdown this is a no-op.
    pub fn maybe_flush(&mut self, now: DateTime<Local>) -> Result<bool> {
        if self.closed {
            return Ok(false);
        }

        let due = match now.signed_duration_since(self.last_flush).to_std() {
            Ok(elapsed) => elapsed >= self.flush_interval,
            Err(_) => {
                debug!("wall clock moved backwards, restarting flush interval");
                self.last_flush = now;
                false
            }
        };
        if !due {
            return Ok(false);
        }

        self.flush_all()?;
        self.last_flush = now;
        debug!(lines = self.stats.lines(), "flushed run logs");
        Ok(true)
    }

    /// Flushes every destination, attempting all of them even if one fails.
    fn flush_all(&mut self) -> Result<()> {
        let mut first_err = None;
        for category in Category::ALL {
            if let Err(source) = self.destinations[category.index()].flush() {
                warn!(%category, error = %source, "flush failed");
                first_err.get_or_insert(LoggerError::Flush { category, source });
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Flushes and then closes all four destinations.
    ///
    /// Every destination is closed even if flushing or closing another one
    /// fails; the first failure is returned. Calling this again is a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut first_err = self.flush_all().err();
        for category in Category::ALL {
            if let Err(source) = self.destinations[category.index()].close() {
                warn!(%category, error = %source, "close failed");
                first_err.get_or_insert(LoggerError::Close { category, source });
            }
        }

        info!(
            lines = self.stats.lines(),
            gps = self.stats.count(Category::Gps),
            ais = self.stats.count(Category::Ais),
            debug = self.stats.count(Category::Debug),
            unclassified = self.stats.unclassified(),
            "closed run logs"
        );
        first_err.map_or(Ok(()), Err)
    }
}

impl<D: LogDestination> Drop for CategoryLogger<D> {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!(error = %err, "shutdown on drop failed");
        }
    }
}
