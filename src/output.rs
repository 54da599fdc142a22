use std::io::{self, Write};

use serde::Serialize;

use crate::generator::{BatchReport, ProgressEvent, ProgressSink};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Commands,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_batch(report: &BatchReport) -> io::Result<()> {
        Self::print_json(report)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

pub struct CommandOutput;

impl CommandOutput {
    pub fn print(text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }
}

impl ProgressSink for CommandOutput {
    fn event(&self, event: ProgressEvent) {
        tracing::info!("{}", event.message);
    }
}
