use crate::error::{CliError, Result};
use crate::ui::UiEvent;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer,
    filter::LevelFilter,
    fmt::{self, MakeWriter},
    prelude::*,
    registry::LookupSpan,
};

/// Forwards console log lines through the UI task so they do not tear progress bars.
#[derive(Clone)]
pub struct UiLogWriter {
    sender: mpsc::Sender<UiEvent>,
}

impl UiLogWriter {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }
}

impl Write for UiLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf).trim_end().to_string();
        if !line.is_empty() && self.sender.try_send(UiEvent::Log(line.clone())).is_err() {
            eprintln!("{}", line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for UiLogWriter {
    type Writer = UiLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::OFF
    } else {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Plain-text layer for `--log-file`; records at least INFO whatever the console level.
fn file_layer<S>(file: File, verbosity: u8) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(level_filter(verbosity.max(1), false))
}

pub fn setup_logging(
    verbosity: u8,
    quiet: bool,
    log_file: Option<PathBuf>,
    ui_sender: mpsc::Sender<UiEvent>,
) -> Result<()> {
    let console_layer = fmt::layer()
        .with_writer(UiLogWriter::new(ui_sender))
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(level_filter(verbosity, quiet));

    let subscriber = tracing_subscriber::registry().with(console_layer);

    if let Some(path) = log_file {
        let file = File::create(&path).map_err(CliError::Io)?;
        subscriber
            .with(file_layer(file, verbosity))
            .try_init()
            .map_err(|e| CliError::Other(anyhow::anyhow!(e)))?;
    } else {
        subscriber
            .try_init()
            .map_err(|e| CliError::Other(anyhow::anyhow!(e)))?;
    }

    Ok(())
}
