use crossterm::style::Stylize;
use std::io::{self, BufRead, BufReader, PipeReader, Read, Write};

/// One-shot sequence of output lines read from a child's merged stdout/stderr
///
/// Each item keeps its trailing newline (the final line may lack one). Bytes
/// that are not valid UTF-8 are replaced. The iterator ends at EOF and cannot
/// be restarted.
pub struct OutputLines<R = PipeReader> {
    reader: BufReader<R>,
    done: bool,
}

impl<R: Read> OutputLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            done: false,
        }
    }
}

impl<R: Read> Iterator for OutputLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(String::from_utf8_lossy(&buf).into_owned())),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Receives command output as it arrives
pub trait OutputSink {
    /// Called once before the command is spawned
    fn command_started(&mut self, _command: &str) {}

    fn line(&mut self, line: &str);
}

/// Writes every line to stdout immediately
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn command_started(&mut self, command: &str) {
        println!("\n{} {}", ">>".cyan(), command);
    }

    fn line(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(line.as_bytes());
        let _ = stdout.flush();
    }
}

/// Discards output; the executor still accumulates it
#[derive(Debug, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn line(&mut self, _line: &str) {}
}

impl OutputSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}
