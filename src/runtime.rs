use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::error::Result;

/// Unified event type consumed by the session loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// one line of console input, line ending stripped
    Line(String),
    /// SIGINT or SIGTERM
    Interrupted,
    /// stdin reached EOF or failed
    Closed,
}

/// Source of console events (input lines, signals)
pub trait GameEventSource {
    /// Block until the next event arrives. A source with no producers left yields `Closed`.
    fn next_event(&self) -> GameEvent;
}

/// Production event source: a stdin reader thread and the signal handler share one channel,
/// so whichever fires first wins.
pub struct ConsoleEventSource {
    rx: Receiver<GameEvent>,
}

impl ConsoleEventSource {
    /// Installs the process-wide signal handler. Call at most once per process.
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let signal_tx = tx.clone();
        ctrlc::set_handler(move || {
            let _ = signal_tx.send(GameEvent::Interrupted);
        })?;

        spawn_line_reader(io::BufReader::new(io::stdin()), tx);

        Ok(Self { rx })
    }
}

impl GameEventSource for ConsoleEventSource {
    fn next_event(&self) -> GameEvent {
        self.rx.recv().unwrap_or(GameEvent::Closed)
    }
}

/// Forwards every line of `reader` to `tx`, then a final `Closed`.
pub fn spawn_line_reader<R>(reader: R, tx: Sender<GameEvent>) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.send(GameEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
        let _ = tx.send(GameEvent::Closed);
    })
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }

    /// Source that replays `events` and then reports `Closed`.
    pub fn scripted<I: IntoIterator<Item = GameEvent>>(events: I) -> Self {
        let (tx, rx) = mpsc::channel();
        for ev in events {
            // receiver is alive in this scope
            let _ = tx.send(ev);
        }
        Self { rx }
    }

    /// Convenience for a script made only of input lines.
    pub fn lines(lines: &[&str]) -> Self {
        Self::scripted(lines.iter().map(|l| GameEvent::Line((*l).to_string())))
    }
}

impl GameEventSource for TestEventSource {
    fn next_event(&self) -> GameEvent {
        self.rx.recv().unwrap_or(GameEvent::Closed)
    }
}

/// Second-granularity wall clock
pub trait Clock {
    fn now_secs(&self) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock that replays fixed readings, repeating the last one once exhausted
#[derive(Debug)]
pub struct ScriptedClock {
    readings: RefCell<VecDeque<i64>>,
    last: Cell<i64>,
}

impl ScriptedClock {
    pub fn new<I: IntoIterator<Item = i64>>(readings: I) -> Self {
        Self {
            readings: RefCell::new(readings.into_iter().collect()),
            last: Cell::new(0),
        }
    }

    /// Readings such that consecutive rounds take `durations` seconds each.
    pub fn with_response_times(durations: &[u64]) -> Self {
        let mut readings = Vec::with_capacity(durations.len() * 2);
        let mut t = 1_000_000i64;
        for &d in durations {
            readings.push(t);
            t += d as i64;
            readings.push(t);
        }
        Self::new(readings)
    }
}

impl Clock for ScriptedClock {
    fn now_secs(&self) -> i64 {
        if let Some(next) = self.readings.borrow_mut().pop_front() {
            self.last.set(next);
        }
        self.last.get()
    }
}

/// Whole seconds between two clock readings; never negative.
pub fn elapsed_secs(start: i64, end: i64) -> u64 {
    end.saturating_sub(start).max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn scripted_source_ends_with_closed() {
        let es = TestEventSource::lines(&["16", "x2d"]);
        assert_eq!(es.next_event(), GameEvent::Line("16".into()));
        assert_eq!(es.next_event(), GameEvent::Line("x2d".into()));
        assert_eq!(es.next_event(), GameEvent::Closed);
        assert_eq!(es.next_event(), GameEvent::Closed);
    }

    #[test]
    fn test_source_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Interrupted).unwrap();
        let es = TestEventSource::new(rx);
        assert_eq!(es.next_event(), GameEvent::Interrupted);
    }

    #[test]
    fn line_reader_strips_endings_and_reports_eof() {
        let (tx, rx) = mpsc::channel();
        let reader = Cursor::new(b"31\r\na\n\nlast".to_vec());
        spawn_line_reader(reader, tx).join().unwrap();

        let es = TestEventSource::new(rx);
        assert_eq!(es.next_event(), GameEvent::Line("31".into()));
        assert_eq!(es.next_event(), GameEvent::Line("a".into()));
        assert_eq!(es.next_event(), GameEvent::Line(String::new()));
        assert_eq!(es.next_event(), GameEvent::Line("last".into()));
        assert_eq!(es.next_event(), GameEvent::Closed);
    }

    #[test]
    fn signal_and_lines_share_one_queue() {
        let (tx, rx) = mpsc::channel();
        let signal_tx = tx.clone();
        signal_tx.send(GameEvent::Interrupted).unwrap();
        spawn_line_reader(Cursor::new(b"late\n".to_vec()), tx)
            .join()
            .unwrap();

        let es = TestEventSource::new(rx);
        assert_eq!(es.next_event(), GameEvent::Interrupted);
        assert_eq!(es.next_event(), GameEvent::Line("late".into()));
    }

    #[test]
    fn system_clock_is_unix_seconds() {
        let now = SystemClock.now_secs();
        assert!(now > 1_600_000_000);
    }

    #[test]
    fn scripted_clock_replays_then_holds() {
        let clock = ScriptedClock::new([5, 9]);
        assert_eq!(clock.now_secs(), 5);
        assert_eq!(clock.now_secs(), 9);
        assert_eq!(clock.now_secs(), 9);
    }

    #[test]
    fn scripted_clock_response_times() {
        let clock = ScriptedClock::with_response_times(&[3, 0, 7]);
        for expected in [3u64, 0, 7] {
            let start = clock.now_secs();
            let end = clock.now_secs();
            assert_eq!(elapsed_secs(start, end), expected);
        }
    }

    #[test]
    fn elapsed_never_negative() {
        assert_eq!(elapsed_secs(10, 12), 2);
        assert_eq!(elapsed_secs(10, 10), 0);
        assert_eq!(elapsed_secs(12, 10), 0);
    }
}
