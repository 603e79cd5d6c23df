use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where a category's records end up.
///
/// Implementations decide what "durable" means. The logger only promises to
/// call `flush` on its cadence and `close` exactly once, after a final flush.
/// The file-backed destination is what the tool uses; tests plug in counting
/// or in-memory destinations to observe the logger from the outside.
pub trait LogDestination {
    /// Appends one fully rendered record (newline included).
    fn append(&mut self, record: &str) -> io::Result<()>;

    /// Pushes buffered records to durable storage.
    fn flush(&mut self) -> io::Result<()>;

    /// Releases the destination. Appends after this fail.
    fn close(&mut self) -> io::Result<()>;
}

/// An append-mode log file with a write buffer in front of it.
///
/// Opening never truncates: a second run that lands on the same run stamp
/// appends after the first run's records.
#[derive(Debug)]
pub struct FileDestination {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileDestination {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "log destination is closed")
}

impl LogDestination for FileDestination {
    fn append(&mut self, record: &str) -> io::Result<()> {
        let writer = self.writer.as_mut().ok_or_else(closed_error)?;
        writer.write_all(record.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        let writer = self.writer.as_mut().ok_or_else(closed_error)?;
        writer.flush()?;
        writer.get_ref().sync_data()
    }

    fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => {
                writer.flush()?;
                writer.get_ref().sync_all()
            }
            None => Ok(()),
        }
    }
}

/// A destination that keeps records in memory and counts physical flushes.
///
/// Used for replaying captures without touching the disk, and for observing
/// the logger's flush and close behaviour in tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryDestination {
    contents: String,
    flushes: usize,
    closes: usize,
    closed: bool,
}

impl MemoryDestination {
    /// One fresh destination per category.
    pub fn set() -> [MemoryDestination; 4] {
        Default::default()
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Number of records held (one per line).
    pub fn records(&self) -> usize {
        self.contents.lines().count()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn closes(&self) -> usize {
        self.closes
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl LogDestination for MemoryDestination {
    fn append(&mut self, record: &str) -> io::Result<()> {
        if self.closed {
            return Err(closed_error());
        }
        self.contents.push_str(record);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(closed_error());
        }
        self.flushes += 1;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if !self.closed {
            self.closed = true;
            self.closes += 1;
        }
        Ok(())
    }
}

impl<D: LogDestination + ?Sized> LogDestination for Box<D> {
    fn append(&mut self, record: &str) -> io::Result<()> {
        (**self).append(record)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_append_mode_preserves_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.log");
        fs::write(&path, "earlier\n").unwrap();

        let mut dest = FileDestination::open(&path).unwrap();
        dest.append("later\n").unwrap();
        dest.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn test_flush_makes_records_visible() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gps.log");
        let mut dest = FileDestination::open(&path).unwrap();
        dest.append("one\n").unwrap();
        dest.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\n");
    }

    #[test]
    fn test_append_after_close_fails() {
        let dir = tempdir().unwrap();
        let mut dest = FileDestination::open(dir.path().join("x.log")).unwrap();
        dest.close().unwrap();
        dest.close().unwrap();
        assert!(dest.is_closed());
        assert!(dest.append("late\n").is_err());
        assert!(dest.flush().is_err());
    }
}
