use crate::error::{Result, TaskError};
use crate::executor::CommandExecutor;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// A recorded call to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// `program arg1 arg2 ...`
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn starts_with(&self, program: &str, prefix: &[String]) -> bool {
        self.program == program && self.args.starts_with(prefix)
    }
}

struct Failure {
    program: String,
    prefix: Vec<String>,
    code: i32,
}

/// Mock executor for testing without spawning processes.
///
/// Every call is recorded, including failing ones. By default every command
/// succeeds with empty output and every program is reported as available.
pub struct MockExecutor {
    invocations: RefCell<Vec<Invocation>>,
    failures: Vec<Failure>,
    outputs: HashMap<String, String>,
    unavailable: HashSet<String>,
}

fn to_owned_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

impl MockExecutor {
    /// Create a mock where everything succeeds
    pub fn new() -> Self {
        MockExecutor {
            invocations: RefCell::new(Vec::new()),
            failures: Vec::new(),
            outputs: HashMap::new(),
            unavailable: HashSet::new(),
        }
    }

    /// Make calls to `program` whose arguments start with `prefix` exit with `code`
    pub fn fail_on(mut self, program: &str, prefix: &[&str], code: i32) -> Self {
        self.failures.push(Failure {
            program: program.to_string(),
            prefix: to_owned_args(prefix),
            code,
        });
        self
    }

    /// Script the stdout returned by [CommandExecutor::output] for an exact command line
    pub fn with_output(mut self, command_line: &str, stdout: &str) -> Self {
        self.outputs
            .insert(command_line.to_string(), stdout.to_string());
        self
    }

    /// Report `program` as missing from the search path
    pub fn without_program(mut self, program: &str) -> Self {
        self.unavailable.insert(program.to_string());
        self
    }

    /// All recorded invocations, in call order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Recorded invocations rendered as command lines
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    /// Number of recorded calls to `program` whose arguments start with `prefix`
    pub fn count(&self, program: &str, prefix: &[&str]) -> usize {
        let prefix = to_owned_args(prefix);
        self.invocations
            .borrow()
            .iter()
            .filter(|invocation| invocation.starts_with(program, &prefix))
            .count()
    }

    fn record(&self, program: &str, args: &[&str]) -> Result<Invocation> {
        let invocation = Invocation {
            program: program.to_string(),
            args: to_owned_args(args),
        };
        self.invocations.borrow_mut().push(invocation.clone());

        match self
            .failures
            .iter()
            .find(|failure| invocation.starts_with(&failure.program, &failure.prefix))
        {
            Some(failure) => Err(TaskError::ExternalTool {
                program: invocation.program,
                args: invocation.args,
                code: Some(failure.code),
            }),
            None => Ok(invocation),
        }
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for MockExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        self.record(program, args).map(|_| ())
    }

    fn output(&self, program: &str, args: &[&str]) -> Result<String> {
        let invocation = self.record(program, args)?;
        Ok(self
            .outputs
            .get(&invocation.command_line())
            .cloned()
            .unwrap_or_default())
    }

    fn is_available(&self, program: &str) -> bool {
        !self.unavailable.contains(program)
    }
}
