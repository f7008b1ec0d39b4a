use std::io::{self, Write};
use std::sync::OnceLock;

use tracing_subscriber::{filter::LevelFilter, fmt::MakeWriter};

/// Buffers one formatted event and hands it to the Workers console on drop.
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        worker::console_log!("{}", line.trim_end());
    }
}

pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buf: Vec::new() }
    }
}

/// Installs the global subscriber once per isolate. Later calls are no-ops,
/// so a changed `LOG_LEVEL` takes effect on the next cold start.
pub fn init(level: LevelFilter) {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        if let Err(e) = tracing_subscriber::fmt()
            .with_writer(ConsoleMakeWriter)
            .with_max_level(level)
            .without_time()
            .with_ansi(false)
            .try_init()
        {
            worker::console_error!("failed to install tracing subscriber: {}", e);
        }
    });
}
