use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Mutex;

use crate::trace::event::FillEvent;

/// Append-only JSONL sink for fill-pipeline events. Logging problems are
/// reported on stderr and never interrupt a scan.
pub struct TraceLogger {
    sink: Option<Mutex<BufWriter<File>>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                sink: Some(Mutex::new(BufWriter::new(file))),
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self { sink: None }
            }
        }
    }

    /// A logger that drops everything. Used by tests and dry runs.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn log(&self, event: &FillEvent) {
        let Some(sink) = &self.sink else {
            return; // tracing disabled
        };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Warning: failed to serialize trace event: {}", e);
                return;
            }
        };

        // One flush per event; a trace cut off mid-scan must still parse.
        let written = match sink.lock() {
            Ok(mut writer) => writeln!(writer, "{}", line).and_then(|_| writer.flush()),
            Err(e) => {
                eprintln!("Warning: trace logger lock poisoned: {}", e);
                return;
            }
        };

        if let Err(e) = written {
            eprintln!("Warning: failed to write trace event: {}", e);
        }
    }
}
