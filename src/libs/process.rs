// Subprocess execution.
// Every stage runs its external commands through `CommandRunner`, so the whole
// sequence can be driven by a scripted runner in tests. There are no timeouts:
// a hung pip call blocks the bootstrap until the operator interrupts it.

use crate::log_debug;
use std::io;
use std::process::{Command, Stdio};

/// Exit status and captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr. Old interpreters print `--version` to stderr.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    pub fn describe_exit(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by a signal".to_string(),
        }
    }
}

/// Runs external commands on behalf of the stages.
pub trait CommandRunner {
    /// Runs to completion, capturing stdout and stderr.
    fn capture(&mut self, command: &mut Command) -> io::Result<CommandOutput>;

    /// Runs to completion with inherited stdio so the operator sees progress
    /// (pip downloads, venv creation). Output fields stay empty.
    fn stream(&mut self, command: &mut Command) -> io::Result<CommandOutput>;

    /// Starts a command without waiting for it (launching the application).
    fn spawn_detached(&mut self, command: &mut Command) -> io::Result<()>;
}

/// `CommandRunner` backed by real processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn capture(&mut self, command: &mut Command) -> io::Result<CommandOutput> {
        log_debug!("[Process] Capturing: {}", describe(command));
        let output = command.stdin(Stdio::null()).output()?;
        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log_debug!(
            "[Process] {} -> {} (stdout: {:?}, stderr: {:?})",
            describe(command),
            result.describe_exit(),
            result.stdout.trim(),
            result.stderr.trim()
        );
        Ok(result)
    }

    fn stream(&mut self, command: &mut Command) -> io::Result<CommandOutput> {
        log_debug!("[Process] Running: {}", describe(command));
        let status = command.status()?;
        Ok(CommandOutput {
            code: status.code(),
            ..CommandOutput::default()
        })
    }

    fn spawn_detached(&mut self, command: &mut Command) -> io::Result<()> {
        log_debug!("[Process] Spawning: {}", describe(command));
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_child| ())
    }
}

/// Program and arguments of `command`, as a single line for logs.
pub fn describe(command: &Command) -> String {
    argv(command).join(" ")
}

/// Program followed by its arguments.
pub fn argv(command: &Command) -> Vec<String> {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    type Responder = Box<dyn FnMut(&[String]) -> io::Result<CommandOutput>>;

    /// Records every command and answers from a closure.
    pub struct ScriptedRunner {
        pub calls: Vec<Vec<String>>,
        pub detached: Vec<Vec<String>>,
        responder: Responder,
    }

    impl ScriptedRunner {
        pub fn new(responder: impl FnMut(&[String]) -> io::Result<CommandOutput> + 'static) -> Self {
            ScriptedRunner {
                calls: Vec::new(),
                detached: Vec::new(),
                responder: Box::new(responder),
            }
        }

        fn answer(&mut self, command: &Command) -> io::Result<CommandOutput> {
            let args = argv(command);
            self.calls.push(args.clone());
            (self.responder)(&args)
        }

        /// Whether any recorded call contains `needle` as a whole argument.
        pub fn ran_with(&self, needle: &str) -> bool {
            self.calls.iter().any(|call| call.iter().any(|arg| arg == needle))
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn capture(&mut self, command: &mut Command) -> io::Result<CommandOutput> {
            self.answer(command)
        }

        fn stream(&mut self, command: &mut Command) -> io::Result<CommandOutput> {
            self.answer(command)
        }

        fn spawn_detached(&mut self, command: &mut Command) -> io::Result<()> {
            self.detached.push(argv(command));
            Ok(())
        }
    }

    pub fn ok(stdout: &str) -> io::Result<CommandOutput> {
        Ok(CommandOutput {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub fn exit(code: i32, stderr: &str) -> io::Result<CommandOutput> {
        Ok(CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    pub fn not_found() -> io::Result<CommandOutput> {
        Err(io::Error::new(io::ErrorKind::NotFound, "program not found"))
    }
}
