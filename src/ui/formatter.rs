//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Functions here only print; styling goes through `console` so it is dropped
//! automatically when output is not a terminal.

use console::style;

use crate::release::{ReleaseRequest, ReleaseStep};
use crate::tasks::Task;
use crate::warning::ReleaseWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a release warning to the user.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Render one line per task: name, description, then prerequisites if any.
pub fn format_task_line(task: &Task<'_>, name_width: usize) -> String {
    let dependencies = if task.dependencies().is_empty() {
        String::new()
    } else {
        format!(" (after {})", task.dependencies().join(", "))
    };
    format!(
        "  {:<width$}  {}{}",
        task.name(),
        task.description(),
        dependencies,
        width = name_width
    )
}

/// Display the registered tasks.
///
/// # Arguments
/// * `tasks` - Tasks to list, in display order
pub fn display_tasks<'t, 'a: 't>(tasks: impl IntoIterator<Item = &'t Task<'a>>) {
    let tasks: Vec<&Task<'a>> = tasks.into_iter().collect();
    let width = tasks.iter().map(|task| task.name().len()).max().unwrap_or(0);

    println!("{}", style("Tasks:").bold());
    for task in tasks {
        println!("{}", format_task_line(task, width));
    }
}

/// Display what a release is about to do.
///
/// # Arguments
/// * `project` - Project name used in the release commit
/// * `request` - Release and next versions
pub fn display_release_plan(project: &str, request: &ReleaseRequest) {
    println!(
        "\n{} {} {}",
        style("Release").bold(),
        project,
        style(request.release_version()).green()
    );
    println!(
        "  Next development version: {}",
        style(request.next_version()).cyan()
    );
    for (index, step) in ReleaseStep::ALL.iter().enumerate() {
        println!("  {:>2}. {}", index + 1, step);
    }
}
