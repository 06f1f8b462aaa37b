//! Interactive cleanup of the container runtime hosting the index
//! services.
//!
//! Eight maintenance actions run in a fixed order. Each one prints a
//! header, asks a yes/no question, and on "y" runs exactly one runtime
//! command; anything else skips the step. Steps are independent: no
//! answer changes any other step's availability, wording, or order. The
//! final system prune is the only branch — a nested question picks the
//! volume-inclusive or volume-excluding variant.

use std::io::{self, BufRead, Write};
use std::process::Command;

const STOP_ALL_CONTAINERS: &str = "docker stop $(docker ps -q)";
const REMOVE_ALL_CONTAINERS: &str = "docker rm $(docker ps -aq)";
const REMOVE_ALL_IMAGES: &str = "docker rmi $(docker images -q)";
const PRUNE_CONTAINERS: &str = "docker container prune -f";
const PRUNE_IMAGES: &str = "docker image prune -f";
const PRUNE_VOLUMES: &str = "docker volume prune -f";
const PRUNE_NETWORKS: &str = "docker network prune -f";
const SYSTEM_PRUNE: &str = "docker system prune -a -f";
const SYSTEM_PRUNE_WITH_VOLUMES: &str = "docker system prune -a --volumes -f";

/// One gated action: a header, a question, one runtime command
struct CleanupStep {
    title: &'static str,
    question: &'static str,
    command: &'static str,
}

/// Every step before the final system prune, in execution order
const STEPS: [CleanupStep; 7] = [
    CleanupStep {
        title: "Stop all containers",
        question: "Stop all running containers?",
        command: STOP_ALL_CONTAINERS,
    },
    CleanupStep {
        title: "Remove all containers",
        question: "Remove all containers?",
        command: REMOVE_ALL_CONTAINERS,
    },
    CleanupStep {
        title: "Remove all images",
        question: "Remove all images?",
        command: REMOVE_ALL_IMAGES,
    },
    CleanupStep {
        title: "Prune containers",
        question: "Prune stopped containers?",
        command: PRUNE_CONTAINERS,
    },
    CleanupStep {
        title: "Prune images",
        question: "Prune dangling images?",
        command: PRUNE_IMAGES,
    },
    CleanupStep {
        title: "Prune volumes",
        question: "Prune unused volumes?",
        command: PRUNE_VOLUMES,
    },
    CleanupStep {
        title: "Prune networks",
        question: "Prune unused networks?",
        command: PRUNE_NETWORKS,
    },
];

const SYSTEM_PRUNE_TITLE: &str = "Full system prune";
const SYSTEM_PRUNE_QUESTION: &str = "Run a full system prune?";
const SYSTEM_PRUNE_VOLUMES_QUESTION: &str = "Include volumes in the system prune?";

/// Seam for running runtime commands, so the gating logic is testable
/// without touching the runtime
pub trait CommandExecutor {
    /// Run a command line, returning its exit code
    fn run(&mut self, command: &str) -> io::Result<i32>;
}

/// Runs command lines through `sh -c`, keeping the "all containers"
/// steps one command each
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn run(&mut self, command: &str) -> io::Result<i32> {
        let status = Command::new("sh").arg("-c").arg(command).status()?;
        Ok(status.code().unwrap_or(-1))
    }
}

/// The confirmation-gated runner.
///
/// Stateless across steps: every prompt is asked in the same fixed order
/// no matter what was answered before, and a failing command never halts
/// the sequence.
pub struct CleanupRunner<R, W, E> {
    input: R,
    output: W,
    executor: E,
}

impl<R: BufRead, W: Write, E: CommandExecutor> CleanupRunner<R, W, E> {
    pub fn new(input: R, output: W, executor: E) -> Self {
        Self {
            input,
            output,
            executor,
        }
    }

    /// Walk every step once, in order
    pub fn run(mut self) -> io::Result<()> {
        for step in &STEPS {
            self.banner(step.title)?;
            if self.confirm(step.question)? {
                self.execute(step.command)?;
            } else {
                self.skip(step.title)?;
            }
        }

        self.banner(SYSTEM_PRUNE_TITLE)?;
        if self.confirm(SYSTEM_PRUNE_QUESTION)? {
            if self.confirm(SYSTEM_PRUNE_VOLUMES_QUESTION)? {
                self.execute(SYSTEM_PRUNE_WITH_VOLUMES)?;
            } else {
                self.execute(SYSTEM_PRUNE)?;
            }
        } else {
            self.skip(SYSTEM_PRUNE_TITLE)?;
        }

        writeln!(self.output, "\nCleanup finished.")?;
        Ok(())
    }

    fn banner(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output, "\n=== {title} ===")
    }

    fn skip(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output, "Skipping: {title}.")
    }

    /// Ask a yes/no question; `y`/`yes` (any case) affirms, anything
    /// else — including end of input — declines
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{question} [y/N] ")?;
        self.output.flush()?;

        let mut answer = String::new();
        let bytes = self.input.read_line(&mut answer)?;
        if bytes == 0 {
            return Ok(false);
        }
        Ok(is_affirmative(&answer))
    }

    /// Run one runtime command; failures are reported and the sequence
    /// continues
    fn execute(&mut self, command: &str) -> io::Result<()> {
        writeln!(self.output, "-> {command}")?;
        match self.executor.run(command) {
            Ok(0) => {}
            Ok(code) => {
                log::warn!("'{command}' exited with status {code}");
                writeln!(self.output, "Command exited with status {code}; continuing.")?;
            }
            Err(e) => {
                log::warn!("'{command}' could not be run: {e}");
                writeln!(self.output, "Command could not be run ({e}); continuing.")?;
            }
        }
        Ok(())
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Run the cleanup against the real runtime with stdin/stdout attached
pub fn run() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    CleanupRunner::new(stdin.lock(), stdout.lock(), ShellExecutor).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// Records command lines instead of running them
    struct RecordingExecutor {
        commands: Vec<String>,
        exit_code: i32,
    }

    impl RecordingExecutor {
        fn new() -> Self {
            Self {
                commands: Vec::new(),
                exit_code: 0,
            }
        }

        fn failing(exit_code: i32) -> Self {
            Self {
                commands: Vec::new(),
                exit_code,
            }
        }
    }

    impl CommandExecutor for &mut RecordingExecutor {
        fn run(&mut self, command: &str) -> io::Result<i32> {
            self.commands.push(command.to_string());
            Ok(self.exit_code)
        }
    }

    fn run_with(answers: &str, executor: &mut RecordingExecutor) -> String {
        let mut output = Vec::new();
        CleanupRunner::new(Cursor::new(answers), &mut output, executor)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn prompt_lines(output: &str) -> Vec<&str> {
        output
            .lines()
            .filter(|line| line.starts_with("=== "))
            .collect()
    }

    const ALL_COMMANDS: [&str; 8] = [
        STOP_ALL_CONTAINERS,
        REMOVE_ALL_CONTAINERS,
        REMOVE_ALL_IMAGES,
        PRUNE_CONTAINERS,
        PRUNE_IMAGES,
        PRUNE_VOLUMES,
        PRUNE_NETWORKS,
        SYSTEM_PRUNE_WITH_VOLUMES,
    ];

    #[test]
    fn negative_answers_never_run_commands() {
        let mut executor = RecordingExecutor::new();
        let output = run_with("n\nn\nn\nn\nn\nn\nn\nn\n", &mut executor);

        assert!(executor.commands.is_empty());
        assert_eq!(output.matches("Skipping:").count(), 8);
    }

    #[test]
    fn affirmative_answers_run_every_command_in_order() {
        let mut executor = RecordingExecutor::new();
        // 8 outer answers plus the nested volume answer
        run_with("y\ny\ny\ny\ny\ny\ny\ny\ny\n", &mut executor);

        assert_eq!(executor.commands, ALL_COMMANDS);
    }

    #[test]
    fn system_prune_without_volumes() {
        let mut executor = RecordingExecutor::new();
        run_with("n\nn\nn\nn\nn\nn\nn\ny\nn\n", &mut executor);

        assert_eq!(executor.commands, vec![SYSTEM_PRUNE]);
    }

    #[test]
    fn system_prune_with_volumes() {
        let mut executor = RecordingExecutor::new();
        run_with("n\nn\nn\nn\nn\nn\nn\ny\ny\n", &mut executor);

        assert_eq!(executor.commands, vec![SYSTEM_PRUNE_WITH_VOLUMES]);
    }

    #[test]
    fn declining_system_prune_never_asks_about_volumes() {
        let mut executor = RecordingExecutor::new();
        let output = run_with("n\nn\nn\nn\nn\nn\nn\nn\n", &mut executor);

        assert!(executor.commands.is_empty());
        assert!(!output.contains(SYSTEM_PRUNE_VOLUMES_QUESTION));
    }

    #[test]
    fn single_affirmative_runs_only_that_command() {
        let mut executor = RecordingExecutor::new();
        run_with("n\nn\ny\nn\nn\nn\nn\nn\n", &mut executor);

        assert_eq!(executor.commands, vec![REMOVE_ALL_IMAGES]);
    }

    #[test]
    fn prompt_order_is_fixed_regardless_of_answers() {
        let mut all_yes = RecordingExecutor::new();
        let yes_output = run_with("y\ny\ny\ny\ny\ny\ny\ny\ny\n", &mut all_yes);

        let mut all_no = RecordingExecutor::new();
        let no_output = run_with("n\nn\nn\nn\nn\nn\nn\nn\n", &mut all_no);

        let mut mixed = RecordingExecutor::new();
        let mixed_output = run_with("y\nn\ny\nn\ny\nn\ny\nn\n", &mut mixed);

        assert_eq!(prompt_lines(&yes_output), prompt_lines(&no_output));
        assert_eq!(prompt_lines(&yes_output), prompt_lines(&mixed_output));
        assert_eq!(prompt_lines(&yes_output).len(), 8);
    }

    #[test]
    fn end_of_input_counts_as_declining() {
        let mut executor = RecordingExecutor::new();
        let output = run_with("", &mut executor);

        assert!(executor.commands.is_empty());
        assert_eq!(output.matches("Skipping:").count(), 8);
        assert!(output.contains("Cleanup finished."));
    }

    #[test]
    fn affirmative_is_case_insensitive() {
        let mut executor = RecordingExecutor::new();
        run_with("Y\nYES\nyes\nn\nn\nn\nn\nn\n", &mut executor);

        assert_eq!(
            executor.commands,
            vec![STOP_ALL_CONTAINERS, REMOVE_ALL_CONTAINERS, REMOVE_ALL_IMAGES]
        );
    }

    #[test]
    fn unrecognized_answers_count_as_declining() {
        let mut executor = RecordingExecutor::new();
        let output = run_with("maybe\nok\n1\n\nyep\nnope\nq\nn\n", &mut executor);

        assert!(executor.commands.is_empty());
        assert_eq!(output.matches("Skipping:").count(), 8);
    }

    #[test]
    fn failing_command_does_not_halt_the_sequence() {
        let mut executor = RecordingExecutor::failing(1);
        let output = run_with("y\ny\ny\ny\ny\ny\ny\ny\ny\n", &mut executor);

        assert_eq!(executor.commands, ALL_COMMANDS);
        assert_eq!(output.matches("exited with status 1").count(), 8);
        assert!(output.contains("Cleanup finished."));
    }
}
