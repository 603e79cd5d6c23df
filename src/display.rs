use std::io::{self, Write};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tracing::{debug, warn};

use crate::category::Category;
use crate::category_logger::{LastSeen, SharedLastSeen, NO_DATA};
use crate::clock::format_record_timestamp;
use crate::log_line::RECORD_SEPARATOR;
use crate::pipeline::StopSignal;

/// Default pause between two looks at the last-seen snapshot.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(200);

/// Header colour and, where it differs from the terminal default, body colour.
fn palette(category: Category) -> (Color, Option<Color>) {
    match category {
        Category::Raw => (Color::Cyan, None),
        Category::Gps => (Color::Green, None),
        Category::Ais => (Color::Blue, Some(Color::Red)),
        Category::Debug => (Color::Yellow, None),
    }
}

/// Clears the screen and draws one block per category.
pub fn render<W: Write>(out: &mut W, last_seen: &LastSeen) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    for category in Category::ALL {
        render_block(out, category, last_seen)?;
    }
    out.flush()
}

fn render_block<W: Write>(
    out: &mut W,
    category: Category,
    last_seen: &LastSeen,
) -> io::Result<()> {
    let (header, body) = palette(category);
    queue!(
        out,
        SetForegroundColor(header),
        Print(category.label()),
        ResetColor,
        Print("\r\n")
    )?;

    match last_seen.get(category) {
        Some(line) => {
            queue!(
                out,
                Print(format_record_timestamp(line.timestamp())),
                Print(RECORD_SEPARATOR)
            )?;
            if let Some(color) = body {
                queue!(out, SetForegroundColor(color))?;
            }
            queue!(out, Print(line.text()), ResetColor, Print("\r\n"))
        }
        None => queue!(out, Print(NO_DATA), Print("\r\n")),
    }
}

/// Starts a thread that redraws the terminal whenever the snapshot changes.
///
/// The thread clones the snapshot under the lock and renders outside it, so
/// ingestion never waits on the terminal. It exits once `stop` is raised.
pub fn spawn_display(
    snapshot: SharedLastSeen,
    stop: StopSignal,
    refresh: Duration,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("display".into())
        .spawn(move || {
            let mut shown: Option<LastSeen> = None;
            while !stop.is_stop_requested() {
                let current = snapshot.lock().clone();
                if shown.as_ref() != Some(&current) {
                    if let Err(err) = render(&mut io::stdout().lock(), &current) {
                        warn!(error = %err, "terminal rendering failed, display stopped");
                        return;
                    }
                    shown = Some(current);
                }
                thread::sleep(refresh);
            }
            debug!("display thread stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::MemoryDestination;
    use crate::LogLine;
    use chrono::Local;

    fn rendered(last_seen: &LastSeen) -> String {
        let mut out = Vec::new();
        render(&mut out, last_seen).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_view_shows_sentinel() {
        let text = rendered(&LastSeen::default());
        for category in Category::ALL {
            assert!(text.contains(category.label()));
        }
        assert_eq!(text.matches(NO_DATA).count(), 4);
    }

    #[test]
    fn test_view_shows_latest_sentence() {
        let mut logger =
            crate::CategoryLogger::with_destinations(Local::now(), MemoryDestination::set());
        logger.ingest(b"!AIVDM,1,1,,B,abc,0*1A\n", Local::now()).unwrap();
        let view = logger.snapshot().lock().clone();

        let text = rendered(&view);
        assert!(text.contains("!AIVDM,1,1,,B,abc,0*1A"));
        assert_eq!(text.matches(NO_DATA).count(), 2);
        assert_eq!(view.get(Category::Ais).map(LogLine::text), Some("!AIVDM,1,1,,B,abc,0*1A"));
    }
}
