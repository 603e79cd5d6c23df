//! # Sentence Logger
//!
//! Reads line-oriented sentences from a serial device and files each one,
//! timestamped, into append-only logs by sentence type:
//!
//! * **NMEA GPS** sentences starting with `$GNGLL`
//! * **AIS** sentences starting with `!AIVDM`
//! * **Vendor debug** sentences starting with `$P`
//!
//! Every line also lands in a raw log, so nothing received is ever dropped.
//!
//! ## Main Components
//!
//! * `LineSource`: one raw line per call, or a timeout (serial device or any reader)
//! * `CategoryLogger`: classifies, timestamps and appends; flushes every few seconds
//! * `pipeline`: the read/ingest/flush loop with a cooperative stop signal
//! * `LogReader`: reads the run logs back into timestamps and sentences
//! * `display`: live terminal view of the latest sentence per category
//!
//! ## Quick Start
//!
//! ```
//! use std::io::Cursor;
//! use chrono::Local;
//! use sentence_logger::{
//!     run_to_completion, Category, CategoryLogger, MemoryDestination, StopSignal,
//!     StreamLineSource, SystemClock,
//! };
//!
//! let input = "$GNGLL,4916.45,N,12311.12,W,225444,A\r\n$PGRMZ,wobble\r\n";
//! let mut source = StreamLineSource::new(Cursor::new(input));
//! let mut logger = CategoryLogger::with_destinations(Local::now(), MemoryDestination::set());
//!
//! let stats = run_to_completion(&mut source, &mut logger, &SystemClock, &StopSignal::new()).unwrap();
//! assert_eq!(stats.lines(), 2);
//! assert_eq!(stats.count(Category::Gps), 1);
//! assert!(logger.is_shut_down());
//! ```

pub mod category;
pub mod category_logger;
pub mod clock;
pub mod config;
pub mod destination;
pub mod display;
pub mod error;
pub mod line_source;
pub mod log_line;
pub mod log_reader;
pub mod pipeline;
pub mod telemetry;

pub use category::{classify, Category};
pub use category_logger::{CategoryLogger, IngestStats, LastSeen, SharedLastSeen, NO_DATA};
pub use clock::{Clock, SystemClock};
pub use config::{CliArgs, LoggerConfig};
pub use destination::{FileDestination, LogDestination, MemoryDestination};
pub use error::{LoggerError, Result};
pub use line_source::{LineSource, ReadOutcome, SerialLineSource, StreamLineSource};
pub use log_line::LogLine;
pub use log_reader::{LogEntry, LogReader};
pub use pipeline::{run, run_to_completion, StopSignal};
