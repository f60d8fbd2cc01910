use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-oriented user input
pub trait Console {
    /// Show `prompt` and read one line without its newline
    ///
    /// Returns `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Reads from stdin, prompting on stdout
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            // EOF: finish the prompt line
            writeln!(stdout)?;
            return Ok(None);
        }

        Ok(Some(input.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Replays canned answers; used to drive the assistant without a terminal
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
