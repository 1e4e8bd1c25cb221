//! Named tasks with prerequisites
//!
//! A [Registry] maps task names to a body and a list of prerequisite task
//! names. [Registry::run] walks the prerequisites depth-first, runs each task
//! at most once per run and stops at the first failure.

pub mod builtin;

pub use builtin::TaskContext;

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, TaskError};

/// Work performed by a task once all prerequisites are done.
pub type TaskBody<'a> = Box<dyn Fn() -> Result<()> + 'a>;

/// A named unit of work with declared prerequisites.
pub struct Task<'a> {
    name: String,
    description: String,
    dependencies: Vec<String>,
    body: TaskBody<'a>,
}

impl<'a> Task<'a> {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        body: impl Fn() -> Result<()> + 'a,
    ) -> Self {
        Task {
            name: name.into(),
            description: description.into(),
            dependencies: Vec::new(),
            body: Box::new(body),
        }
    }

    /// Declare prerequisites, run in the given order.
    pub fn depends_on(mut self, dependencies: &[&str]) -> Self {
        self.dependencies
            .extend(dependencies.iter().map(|name| name.to_string()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

/// Lifecycle of a task within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Done,
    Failed,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunReport {
    /// Task names in the order their bodies completed
    pub executed: Vec<String>,
}

/// Registry of tasks, keyed by name.
pub struct Registry<'a> {
    tasks: BTreeMap<String, Task<'a>>,
}

impl<'a> Registry<'a> {
    pub fn new() -> Self {
        Registry {
            tasks: BTreeMap::new(),
        }
    }

    /// Add a task. Names must be unique.
    pub fn register(&mut self, task: Task<'a>) -> Result<()> {
        if self.tasks.contains_key(task.name()) {
            return Err(TaskError::task(format!(
                "task '{}' is already registered",
                task.name()
            )));
        }
        self.tasks.insert(task.name.clone(), task);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Task<'a>> {
        self.tasks.get(name)
    }

    /// Registered tasks, sorted by name.
    pub fn tasks(&self) -> impl Iterator<Item = &Task<'a>> {
        self.tasks.values()
    }

    /// Run `name` after its prerequisites.
    ///
    /// # Returns
    /// * `Ok(RunReport)` - Every reached task succeeded
    /// * `Err` - Unknown task, dependency cycle, or the first failing task's own error
    pub fn run(&self, name: &str) -> Result<RunReport> {
        let mut run = TaskRun {
            registry: self,
            states: HashMap::new(),
            stack: Vec::new(),
            executed: Vec::new(),
        };
        run.visit(name)?;

        Ok(RunReport {
            executed: run.executed,
        })
    }
}

impl Default for Registry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

struct TaskRun<'r, 'a> {
    registry: &'r Registry<'a>,
    states: HashMap<&'r str, TaskState>,
    stack: Vec<&'r str>,
    executed: Vec<String>,
}

impl<'r, 'a> TaskRun<'r, 'a> {
    fn state(&self, name: &str) -> TaskState {
        self.states.get(name).copied().unwrap_or(TaskState::Pending)
    }

    fn visit(&mut self, name: &str) -> Result<()> {
        let registry = self.registry;
        let task = registry.get(name).ok_or_else(|| match self.stack.last() {
            Some(parent) => TaskError::task(format!(
                "task '{}' depends on unknown task '{}'",
                parent, name
            )),
            None => TaskError::task(format!("unknown task '{}'", name)),
        })?;
        let name = task.name();

        match self.state(name) {
            TaskState::Done => return Ok(()),
            TaskState::Running => {
                let mut cycle: Vec<&str> = self
                    .stack
                    .iter()
                    .copied()
                    .skip_while(|entry| *entry != name)
                    .collect();
                cycle.push(name);
                return Err(TaskError::task(format!(
                    "dependency cycle: {}",
                    cycle.join(" -> ")
                )));
            }
            TaskState::Failed => {
                return Err(TaskError::task(format!("task '{}' already failed", name)))
            }
            TaskState::Pending => {}
        }

        self.states.insert(name, TaskState::Running);
        self.stack.push(name);

        let result = task
            .dependencies()
            .iter()
            .try_for_each(|dependency| self.visit(dependency))
            .and_then(|()| {
                log::debug!("Running task {}", name);
                (task.body)()
            });

        self.stack.pop();
        match result {
            Ok(()) => {
                self.states.insert(name, TaskState::Done);
                self.executed.push(name.to_string());
                Ok(())
            }
            Err(e) => {
                log::debug!("Task {} failed: {}", name, e);
                self.states.insert(name, TaskState::Failed);
                Err(e)
            }
        }
    }
}
