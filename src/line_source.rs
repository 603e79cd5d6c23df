use std::io::{self, BufRead, BufReader};
use std::mem;
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use crate::error::{LoggerError, Result};

/// Line-oriented input for the classifying logger.
///
/// A source hands out one raw line per call, or reports that nothing arrived
/// within its read timeout. Text decoding is left to the logger so that the
/// replacement policy lives in exactly one place.

/// Outcome of a single [`LineSource::read_line`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Raw bytes up to and including the line terminator (the last line of a
    /// finite stream may lack one).
    Line(Vec<u8>),
    /// Nothing complete arrived within the read timeout. Not an error.
    Timeout,
    /// A finite stream has been fully consumed.
    EndOfStream,
}

/// The contract the pipeline needs from an input device.
pub trait LineSource {
    /// Blocks for at most the source's read timeout.
    fn read_line(&mut self) -> Result<ReadOutcome>;

    /// Releases the underlying device. Calling it more than once is harmless.
    fn close(&mut self);
}

/// A [`LineSource`] over any buffered reader.
///
/// Bytes of a line that is cut short by a timeout are kept and completed on
/// the next call, so a slow sender never produces split records.
pub struct StreamLineSource<R> {
    reader: Option<R>,
    pending: Vec<u8>,
}

impl<R: BufRead> StreamLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            pending: Vec::with_capacity(128),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

impl<R: BufRead> LineSource for StreamLineSource<R> {
    fn read_line(&mut self) -> Result<ReadOutcome> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(ReadOutcome::EndOfStream);
        };

        match reader.read_until(b'\n', &mut self.pending) {
            Ok(0) if self.pending.is_empty() => Ok(ReadOutcome::EndOfStream),
            // Either a full line, or the tail of a stream without a final newline.
            Ok(_) => Ok(ReadOutcome::Line(mem::take(&mut self.pending))),
            Err(err) if is_timeout(&err) => Ok(ReadOutcome::Timeout),
            Err(err) => Err(LoggerError::Read(err)),
        }
    }

    fn close(&mut self) {
        self.reader = None;
        self.pending.clear();
    }
}

#[inline]
fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

/// A serial device read one line at a time.
pub struct SerialLineSource {
    device: String,
    stream: StreamLineSource<BufReader<Box<dyn SerialPort>>>,
}

impl SerialLineSource {
    /// Opens `device` at `baud_rate` with the given read timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::DeviceUnavailable`] if the device is missing,
    /// not permitted, or already in use.
    pub fn open(device: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self> {
        let port = serialport::new(device, baud_rate)
            .timeout(read_timeout)
            .open()
            .map_err(|source| LoggerError::DeviceUnavailable {
                device: device.to_owned(),
                source,
            })?;

        info!(device, baud_rate, ?read_timeout, "opened serial device");

        Ok(Self {
            device: device.to_owned(),
            stream: StreamLineSource::new(BufReader::new(port)),
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl LineSource for SerialLineSource {
    fn read_line(&mut self) -> Result<ReadOutcome> {
        match self.stream.read_line()? {
            // A tty only reports end-of-file once the device has gone away.
            ReadOutcome::EndOfStream if !self.stream.is_closed() => Err(LoggerError::Read(
                io::Error::new(io::ErrorKind::UnexpectedEof, "serial device disconnected"),
            )),
            outcome => Ok(outcome),
        }
    }

    fn close(&mut self) {
        if !self.stream.is_closed() {
            debug!(device = %self.device, "closing serial device");
        }
        self.stream.close();
    }
}
