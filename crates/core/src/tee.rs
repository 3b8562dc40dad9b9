//! Fan-out writer used to copy captured output to several sinks.

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes every line to each of its sinks, in the order they were added.
///
/// Sinks are borrowed so the caller keeps ownership of the log file and can
/// append to it after the tee is dropped.
#[derive(Default)]
pub struct Tee<'a> {
    sinks: Vec<&'a mut (dyn AsyncWrite + Unpin + Send)>,
}

impl<'a> Tee<'a> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sink(mut self, sink: &'a mut (dyn AsyncWrite + Unpin + Send)) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Write `line` verbatim (terminator included) to every sink and flush.
    ///
    /// Stops at the first failing sink.
    pub async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.write_all(line.as_bytes()).await?;
            sink.flush().await?;
        }
        Ok(())
    }
}
