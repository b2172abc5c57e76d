//! Console menu loop.
//!
//! The session moves between three live states and one terminal state:
//!
//! ```text
//!   Menu --1--> AwaitingSizeInput  --size--> Menu
//!   Menu --2--> AwaitingIndexInput --index-> Menu
//!   Menu --3--> Menu
//!   Menu --4--> Exited   (leak report)
//! ```
//!
//! End of input also leads to `Exited`, since no exit choice can arrive.

use std::io::{BufRead, Write};

use memsim_core::{BlockSource, LeakReport, Registry, RegistryError, SimulatedHeap};
use memsim_telemetry::MetricsRecorder;
use tracing::{info, warn};

use crate::error::CliError;
use crate::prompt::Prompter;
use crate::report;

const SIZE_PROMPT: &str = "Enter the size of memory block to allocate (in bytes): ";
const CHOICE_PROMPT: &str = "Enter your choice: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Allocate,
    Free,
    Status,
    Exit,
}

impl Choice {
    pub fn from_input(value: i32) -> Option<Self> {
        match value {
            1 => Some(Choice::Allocate),
            2 => Some(Choice::Free),
            3 => Some(Choice::Status),
            4 => Some(Choice::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Menu,
    AwaitingSizeInput,
    AwaitingIndexInput,
    Exited,
}

pub struct Session<R, W, S = SimulatedHeap> {
    prompter: Prompter<R, W>,
    registry: Registry<S>,
    metrics: Option<MetricsRecorder>,
    state: State,
    report: Option<LeakReport>,
}

impl<R: BufRead, W: Write, S: BlockSource> Session<R, W, S> {
    pub fn new(registry: Registry<S>, input: R, output: W) -> Self {
        Self {
            prompter: Prompter::new(input, output),
            registry,
            metrics: None,
            state: State::Menu,
            report: None,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Drives the session until it exits, returning the leak report.
    pub fn run(&mut self) -> Result<LeakReport, CliError> {
        info!(capacity = self.registry.capacity(), "session started");
        loop {
            match self.step() {
                Ok(State::Exited) => break,
                Ok(_) => {}
                Err(CliError::InputClosed) => {
                    warn!("input closed before exit was chosen");
                    self.exit()?;
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        self.report.clone().ok_or(CliError::InputClosed)
    }

    /// Performs one transition and returns the resulting state.
    pub fn step(&mut self) -> Result<State, CliError> {
        match self.state {
            State::Menu => self.on_menu()?,
            State::AwaitingSizeInput => self.on_size()?,
            State::AwaitingIndexInput => self.on_index()?,
            State::Exited => {}
        }
        Ok(self.state)
    }

    fn on_menu(&mut self) -> Result<(), CliError> {
        report::write_menu(self.prompter.output())?;
        let choice = self.prompter.read_int(CHOICE_PROMPT)?;

        match Choice::from_input(choice) {
            Some(Choice::Allocate) => {
                if self.registry.check_capacity().is_ok() {
                    self.state = State::AwaitingSizeInput;
                } else {
                    if let Some(metrics) = &self.metrics {
                        metrics.capacity_rejections.inc();
                    }
                    writeln!(
                        self.prompter.output(),
                        "Error: Maximum number of memory blocks reached."
                    )?;
                }
            }
            Some(Choice::Free) => {
                if self.registry.is_empty() {
                    writeln!(self.prompter.output(), "No memory blocks to free.")?;
                } else {
                    self.state = State::AwaitingIndexInput;
                }
            }
            Some(Choice::Status) => report::write_status(self.prompter.output(), &self.registry)?,
            Some(Choice::Exit) => self.exit()?,
            None => writeln!(self.prompter.output(), "Invalid choice. Please try again.")?,
        }
        Ok(())
    }

    fn on_size(&mut self) -> Result<(), CliError> {
        let size = self.prompter.read_size(SIZE_PROMPT)?;
        self.state = State::Menu;

        match self.registry.allocate(size) {
            Ok(handle) => {
                if let Some(metrics) = &self.metrics {
                    metrics.allocations.inc();
                }
                writeln!(
                    self.prompter.output(),
                    "Memory allocated: Address={}, Size={} bytes",
                    handle, size
                )?;
            }
            Err(err) => {
                let capacity = matches!(err, RegistryError::CapacityExceeded { .. });
                if let Some(metrics) = &self.metrics {
                    if capacity {
                        metrics.capacity_rejections.inc();
                    } else {
                        metrics.failed_allocations.inc();
                    }
                }
                let message = if capacity {
                    "Error: Maximum number of memory blocks reached."
                } else {
                    "Error: Memory allocation failed."
                };
                writeln!(self.prompter.output(), "{message}")?;
            }
        }
        self.observe_usage();
        Ok(())
    }

    fn on_index(&mut self) -> Result<(), CliError> {
        let prompt = format!(
            "Enter the index of the memory block to free (0-{}): ",
            self.registry.len().saturating_sub(1)
        );
        let index = self.prompter.read_int(&prompt)?;
        self.state = State::Menu;

        let result = match usize::try_from(index) {
            Ok(index) => self.registry.free(index),
            Err(_) => Err(RegistryError::InvalidIndex {
                index: i64::from(index),
                count: self.registry.len(),
            }),
        };

        match result {
            Ok(block) => {
                if let Some(metrics) = &self.metrics {
                    metrics.frees.inc();
                }
                writeln!(
                    self.prompter.output(),
                    "Memory block freed: Address={}, Size={} bytes",
                    block.handle, block.size
                )?;
            }
            Err(RegistryError::InvalidIndex { index, count }) => {
                warn!(index, count, "free rejected, invalid index");
                writeln!(self.prompter.output(), "Error: Invalid index.")?;
            }
            Err(err) => {
                writeln!(self.prompter.output(), "Error: {err}.")?;
            }
        }
        self.observe_usage();
        Ok(())
    }

    /// Emits the leak report. Only the first call has any effect.
    fn exit(&mut self) -> Result<(), CliError> {
        if self.report.is_some() {
            return Ok(());
        }
        self.state = State::Exited;

        let report = self.registry.leak_report();
        let out = self.prompter.output();
        report::write_leak_report(out, &report)?;
        writeln!(out, "Exiting program.")?;
        out.flush()?;

        if !report.is_clean() {
            warn!(
                blocks = report.blocks.len(),
                bytes = report.total_bytes,
                "memory leaked at exit"
            );
        }
        self.report = Some(report);
        Ok(())
    }

    fn observe_usage(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.observe_usage(self.registry.total_allocated(), self.registry.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tracing_test::traced_test;

    fn run_with(registry: Registry, input: &str) -> (LeakReport, String) {
        let mut session = Session::new(registry, Cursor::new(input.to_string()), Vec::new());
        let report = session.run().unwrap();
        let out = String::from_utf8(session.into_output()).unwrap();
        (report, out)
    }

    fn run(input: &str) -> (LeakReport, String) {
        run_with(Registry::default(), input)
    }

    #[test]
    fn test_allocate_free_exit_scenario() {
        let (report, out) = run("1\n100\n3\n1\n50\n3\n2\n0\n3\n4\n");

        assert!(out.contains("Total allocated memory: 100 bytes\nNumber of active blocks: 1\n"));
        assert!(out.contains("Total allocated memory: 150 bytes\nNumber of active blocks: 2\n"));
        assert!(out.contains("Total allocated memory: 50 bytes\nNumber of active blocks: 1\n"));
        assert!(out.contains("Enter the index of the memory block to free (0-1): "));

        assert_eq!(report.blocks.len(), 1);
        assert_eq!(report.blocks[0].size, 50);
        let survivor = format!(
            "Block 0 -> Address: {}, Size: 50 bytes",
            report.blocks[0].handle
        );
        assert!(out.contains(&survivor));
        assert!(out.contains("--- Memory Leaks Detected ---\nUnfreed blocks: 1\n"));
        assert!(out.ends_with("Exiting program.\n"));
    }

    #[test]
    fn test_allocation_echoes_address_and_size() {
        let (report, out) = run("1\n64\n4\n");
        let expected = format!(
            "Memory allocated: Address={}, Size=64 bytes",
            report.blocks[0].handle
        );
        assert!(out.contains(&expected));
        assert!(out.contains("Address=0x10000"));
    }

    #[test]
    fn test_non_numeric_size_is_reprompted() {
        let (report, out) = run("1\nabc\n12x\n\n-5\n99999999999999999999999\n64\n4\n");

        assert_eq!(out.matches(SIZE_PROMPT).count(), 6);
        assert_eq!(
            out.matches("Invalid input. Please enter a valid size in bytes.")
                .count(),
            3
        );
        assert_eq!(
            out.matches("Number out of range. Please try again.").count(),
            2
        );
        assert_eq!(report.total_bytes, 64);
    }

    #[test]
    fn test_invalid_choices_keep_looping() {
        let (report, out) = run("7\nzero\n0\n4\n");
        assert_eq!(out.matches("Invalid choice. Please try again.").count(), 2);
        assert_eq!(
            out.matches("Invalid input. Please enter a valid integer.").count(),
            1
        );
        assert!(report.is_clean());
    }

    #[test]
    fn test_free_from_empty_registry() {
        let (report, out) = run("2\n4\n");
        assert!(out.contains("No memory blocks to free."));
        assert!(!out.contains("Enter the index"));
        assert!(report.is_clean());
    }

    #[test]
    fn test_invalid_index_returns_to_menu() {
        let (report, out) = run("1\n8\n2\n5\n2\n-1\n4\n");
        assert_eq!(out.matches("Error: Invalid index.").count(), 2);
        assert!(out.contains("(0-0): "));
        assert_eq!(report.blocks.len(), 1);
    }

    #[test]
    fn test_capacity_reached_skips_prompt() {
        let registry = Registry::new(1, SimulatedHeap::default());
        let (report, out) = run_with(registry, "1\n8\n1\n4\n");

        assert_eq!(out.matches(SIZE_PROMPT).count(), 1);
        assert!(out.contains("Error: Maximum number of memory blocks reached."));
        assert_eq!(report.blocks.len(), 1);
    }

    #[test]
    fn test_capacity_rejections_are_counted() {
        let mut session = Session::new(
            Registry::new(1, SimulatedHeap::default()),
            Cursor::new("1\n8\n1\n1\n4\n"),
            Vec::new(),
        );
        session.run().unwrap();

        let stats = *session.registry().stats();
        assert_eq!(stats.capacity_rejections(), 2);
        assert_eq!(stats.failed_allocations(), 0);
        assert_eq!(stats.allocations(), 1);

        let out = String::from_utf8(session.into_output()).unwrap();
        assert_eq!(
            out.matches("Error: Maximum number of memory blocks reached.")
                .count(),
            2
        );
    }

    #[test]
    fn test_refused_allocation_is_reported() {
        let registry = Registry::new(4, SimulatedHeap::new(0x1000, 10));
        let (report, out) = run_with(registry, "1\n11\n4\n");

        assert!(out.contains("Error: Memory allocation failed."));
        assert!(report.is_clean());
    }

    #[test]
    fn test_clean_exit_report() {
        let (report, out) = run("1\n8\n2\n0\n4\n");
        assert!(report.is_clean());
        assert!(out.contains("No memory leaks detected. All memory was freed successfully."));
        assert_eq!(out.matches("Exiting program.").count(), 1);
    }

    #[test]
    fn test_status_is_idempotent() {
        let (_, out) = run("1\n8\n1\n16\n3\n3\n4\n");
        let statuses: Vec<&str> = out
            .split("--- Memory Status ---")
            .skip(1)
            .map(|chunk| chunk.split("---------------------").next().unwrap_or(""))
            .collect();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0], statuses[1]);
    }

    #[traced_test]
    #[test]
    fn test_closed_input_still_reports_leaks() {
        let (report, out) = run("1\n10\n");
        assert_eq!(report.blocks.len(), 1);
        assert_eq!(out.matches("--- Memory Leaks Detected ---").count(), 1);
        assert!(logs_contain("input closed before exit was chosen"));
    }

    #[test]
    fn test_step_walks_the_state_machine() {
        let mut session = Session::new(
            Registry::default(),
            Cursor::new("1\n32\n2\n0\n4\n"),
            Vec::new(),
        );
        assert_eq!(session.state(), State::Menu);
        assert_eq!(session.step().unwrap(), State::AwaitingSizeInput);
        assert_eq!(session.step().unwrap(), State::Menu);
        assert_eq!(session.registry().total_allocated(), 32);
        assert_eq!(session.step().unwrap(), State::AwaitingIndexInput);
        assert_eq!(session.step().unwrap(), State::Menu);
        assert!(session.registry().is_empty());
        assert_eq!(session.step().unwrap(), State::Exited);
        assert_eq!(session.step().unwrap(), State::Exited);
    }

    #[test]
    fn test_metrics_follow_operations() {
        let metrics = MetricsRecorder::new().unwrap();
        let mut session = Session::new(
            Registry::new(1, SimulatedHeap::default()),
            Cursor::new("1\n40\n1\n2\n0\n1\n24\n4\n"),
            Vec::new(),
        )
        .with_metrics(metrics.clone());
        session.run().unwrap();

        assert_eq!(metrics.allocations.get(), 2);
        assert_eq!(metrics.capacity_rejections.get(), 1);
        assert_eq!(metrics.failed_allocations.get(), 0);
        assert_eq!(metrics.frees.get(), 1);
        assert_eq!(metrics.bytes_in_use.get(), 24);
        assert_eq!(metrics.active_blocks.get(), 1);
    }
}
