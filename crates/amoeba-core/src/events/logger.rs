//! Event Logger
//!
//! Streams simulation events as JSON lines, optionally keeping only some
//! event types.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use amoeba_events::{EventType, SimEvent};

/// Writes events to any sink, one JSON object per line
pub struct EventLogger<W: Write = BufWriter<File>> {
    writer: Option<W>,
    only: Option<Vec<EventType>>,
    seen: u64,
    written: u64,
}

impl EventLogger<BufWriter<File>> {
    /// Log to a file, truncating anything already there
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLogger<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
            only: None,
            seen: 0,
            written: 0,
        }
    }

    /// A logger that counts events but writes nothing
    pub fn null() -> Self {
        Self {
            writer: None,
            only: None,
            seen: 0,
            written: 0,
        }
    }

    /// Keep only the given event types. An empty list keeps everything.
    pub fn only(mut self, types: &[EventType]) -> Self {
        self.only = (!types.is_empty()).then(|| types.to_vec());
        self
    }

    pub fn accepts(&self, event: &SimEvent) -> bool {
        self.only
            .as_ref()
            .map_or(true, |types| types.contains(&event.event_type()))
    }

    /// Events offered to the logger, kept or not
    pub fn seen_count(&self) -> u64 {
        self.seen
    }

    /// Events that passed the filter
    pub fn written_count(&self) -> u64 {
        self.written
    }

    pub fn log(&mut self, event: &SimEvent) -> io::Result<()> {
        self.seen += 1;
        if !self.accepts(event) {
            return Ok(());
        }
        self.written += 1;
        if let Some(writer) = self.writer.as_mut() {
            writeln!(writer, "{}", event.to_jsonl()?)?;
        }
        Ok(())
    }

    pub fn log_batch(&mut self, events: &[SimEvent]) -> io::Result<()> {
        events.iter().try_for_each(|event| self.log(event))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Flush and hand back the sink
    pub fn into_inner(mut self) -> io::Result<Option<W>> {
        self.flush()?;
        Ok(self.writer.take())
    }
}

impl<W: Write> Drop for EventLogger<W> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(written = self.written, "Failed to flush event log: {}", e);
        }
    }
}
