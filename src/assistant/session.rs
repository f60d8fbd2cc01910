use crate::assistant::console::{Console, TerminalConsole};
use crate::audit::{CommandResult, SessionLogger};
use crate::error::AppResult;
use crate::llm::{LLMClient, parse_commands};
use crate::security::SafetyGate;
use crate::shell::{CommandExecutor, ConsoleSink, EscalationSession, OutputSink};
use crossterm::style::Stylize;

pub const TASK_PROMPT: &str = "\nEnter task for AI (or 'exit'): ";
pub const CONFIRM_PROMPT: &str = "Execute these commands? [y/N]: ";
pub const EXIT_KEYWORD: &str = "exit";
pub const DRY_RUN_PLACEHOLDER: &str = "[DRY-RUN]";

/// Where the assistant loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantState {
    AwaitingTask,
    AwaitingAiResponse,
    AwaitingConfirmation,
    Executing,
    Exit,
}

/// How a single task ended
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// The exit keyword was entered
    Exit,
    /// The service failed or returned nothing
    NoSuggestions,
    /// The reply held no runnable lines
    NoCommands,
    /// The user declined the batch
    Aborted,
    /// The batch ran (possibly with every command blocked) and was logged
    Executed(Vec<CommandResult>),
}

/// Interactive task → commands → confirm → execute → log loop
pub struct Assistant<C: Console = TerminalConsole> {
    client: Box<dyn LLMClient>,
    console: C,
    gate: SafetyGate,
    executor: CommandExecutor,
    session: EscalationSession,
    logger: SessionLogger,
    sink: Box<dyn OutputSink>,
    dry_run: bool,
    state: AssistantState,
}

impl<C: Console> Assistant<C> {
    pub fn new(client: Box<dyn LLMClient>, console: C, logger: SessionLogger) -> Self {
        Self {
            client,
            console,
            gate: SafetyGate::new(),
            executor: CommandExecutor::new(),
            session: EscalationSession::interactive(),
            logger,
            sink: Box::new(ConsoleSink),
            dry_run: false,
            state: AssistantState::AwaitingTask,
        }
    }

    pub fn with_gate(mut self, gate: SafetyGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_executor(mut self, executor: CommandExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_session(mut self, session: EscalationSession) -> Self {
        self.session = session;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run until the exit keyword or end of input
    pub async fn run(&mut self) -> AppResult<()> {
        println!("{}", "=== AI AUTOMATION ASSISTANT ===".bold());
        println!("Dry-run: {}", if self.dry_run { "ON" } else { "OFF" });

        loop {
            self.state = AssistantState::AwaitingTask;
            let Some(task) = self.console.read_line(TASK_PROMPT)? else {
                break;
            };

            if self.handle_task(task.trim()).await? == TaskOutcome::Exit {
                break;
            }
        }

        self.state = AssistantState::Exit;
        Ok(())
    }

    /// Drive one task through the pipeline
    ///
    /// Only console and log-file I/O errors are returned; everything else is
    /// reported on the console and folded into the outcome.
    pub async fn handle_task(&mut self, task: &str) -> AppResult<TaskOutcome> {
        if task.eq_ignore_ascii_case(EXIT_KEYWORD) {
            self.state = AssistantState::Exit;
            return Ok(TaskOutcome::Exit);
        }

        self.state = AssistantState::AwaitingAiResponse;
        let raw = match self.client.suggest(task).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "completion request failed");
                println!("{} {}", "[AI ERROR]".red(), e);
                String::new()
            }
        };

        if raw.trim().is_empty() {
            println!("No AI commands generated.");
            self.state = AssistantState::AwaitingTask;
            return Ok(TaskOutcome::NoSuggestions);
        }

        println!("\n{}", "[AI suggested commands]".bold());
        println!("{}", raw);

        let commands = parse_commands(&raw);
        if commands.is_empty() {
            println!("No commands to execute.");
            self.state = AssistantState::AwaitingTask;
            return Ok(TaskOutcome::NoCommands);
        }

        if !self.dry_run {
            self.state = AssistantState::AwaitingConfirmation;
            println!("\n===== CONFIRM =====");
            for command in &commands {
                println!("{}", command);
            }

            let answer = self.console.read_line(CONFIRM_PROMPT)?.unwrap_or_default();
            // Exactly one character; padding counts as a refusal
            if !answer.eq_ignore_ascii_case("y") {
                println!("Aborted.");
                self.state = AssistantState::AwaitingTask;
                return Ok(TaskOutcome::Aborted);
            }
        }

        self.state = AssistantState::Executing;
        let results = self.run_batch(&commands);
        self.logger.log_batch(&results)?;

        println!(
            "\n{} Done. Logged to {}",
            "[✔]".green(),
            self.logger.log_path().display()
        );

        self.state = AssistantState::AwaitingTask;
        Ok(TaskOutcome::Executed(results))
    }

    /// Gate and execute commands in order, one result per permitted command
    pub fn run_batch(&mut self, commands: &[String]) -> Vec<CommandResult> {
        let mut results = Vec::new();

        for command in commands {
            if !self.gate.check(command) {
                continue;
            }

            if self.dry_run {
                println!("{} {}", DRY_RUN_PLACEHOLDER.yellow(), command);
                results.push(CommandResult::new(command.as_str(), DRY_RUN_PLACEHOLDER, None));
                continue;
            }

            match self
                .executor
                .execute(command, &mut self.session, self.sink.as_mut())
            {
                Ok(outcome) => {
                    results.push(CommandResult::new(
                        command.as_str(),
                        outcome.output,
                        outcome.exit_code,
                    ));
                }
                Err(e) => {
                    println!("{} {}", "[ERROR]".red(), e);
                    let output = match e.partial_output() {
                        Some(partial) => format!("{}{}", partial, e),
                        None => e.to_string(),
                    };
                    results.push(CommandResult::new(command.as_str(), output, None));
                }
            }
        }

        results
    }

    pub fn state(&self) -> AssistantState {
        self.state
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn logger(&self) -> &SessionLogger {
        &self.logger
    }
}
