// Terminal output
// json is machine-readable, pretty is for people

use chrono::NaiveDate;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;
use crate::models::{Dashboard, Group, GroupStats, Priority, Task, User};
use crate::services::LoadingObserver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn priority_label(priority: &Priority) -> String {
    let label = priority.as_str();
    match priority {
        Priority::High => label.red().to_string(),
        Priority::Medium => label.yellow().to_string(),
        Priority::Low => label.green().to_string(),
        Priority::Other(_) => label.dimmed().to_string(),
    }
}

fn due_label(task: &Task, today: NaiveDate) -> Option<String> {
    let due = task.due_date?;
    let text = format!("due {}", due.format("%b %-d, %Y"));
    Some(if !task.is_complete && due < today {
        text.red().to_string()
    } else if due == today {
        text.yellow().to_string()
    } else {
        text
    })
}

/// One-line summary used in lists
pub fn task_line(task: &Task, groups: &[Group], today: NaiveDate) -> String {
    let check = if task.is_complete {
        "[x]".green().to_string()
    } else {
        "[ ]".to_string()
    };
    let title = if task.is_complete {
        task.title.strikethrough().to_string()
    } else {
        task.title.bold().to_string()
    };

    let mut parts = vec![
        format!("{} {:>4}  {}", check, task.id.to_string().dimmed(), title),
        format!("({})", priority_label(&task.priority)),
    ];
    if let Some(due) = due_label(task, today) {
        parts.push(due);
    }
    if let Some(group_id) = &task.group {
        let name = groups
            .iter()
            .find(|g| &g.id == group_id)
            .map(|g| g.name.clone())
            .unwrap_or_else(|| format!("group {}", group_id));
        parts.push(format!("[{}]", name).cyan().to_string());
    }
    parts.join("  ")
}

pub fn print_task(task: &Task, groups: &[Group], today: NaiveDate, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(task)?,
        Format::Pretty => {
            println!("{}", task_line(task, groups, today));
            if let Some(desc) = task.description.as_deref().filter(|d| !d.is_empty()) {
                println!("        {}", desc);
            }
        }
    }
    Ok(())
}

pub fn print_tasks(tasks: &[Task], groups: &[Group], today: NaiveDate, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(tasks)?,
        Format::Pretty => {
            if tasks.is_empty() {
                println!("{}", "No tasks found.".dimmed());
            }
            for task in tasks {
                println!("{}", task_line(task, groups, today));
            }
        }
    }
    Ok(())
}

pub fn print_group(group: &Group, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(group)?,
        Format::Pretty => {
            println!(
                "{:>4}  {}  {} tasks, {:.1}% complete",
                group.id.to_string().dimmed(),
                group.name.bold(),
                group.total_tasks,
                group.progress_percent()
            );
            if let Some(desc) = group.description.as_deref().filter(|d| !d.is_empty()) {
                println!("      {}", desc);
            }
        }
    }
    Ok(())
}

pub fn print_groups(groups: &[Group], format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(groups)?,
        Format::Pretty => {
            if groups.is_empty() {
                println!(
                    "{}",
                    "No groups found. Create a new one to get started.".dimmed()
                );
            }
            for group in groups {
                print_group(group, Format::Pretty)?;
            }
        }
    }
    Ok(())
}

pub fn print_group_stats(stats: &GroupStats, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(stats)?,
        Format::Pretty => {
            println!("Total:     {}", stats.total_tasks);
            println!("Completed: {}", stats.completed_tasks.to_string().green());
            println!("Pending:   {}", stats.pending_tasks.to_string().yellow());
            for (key, value) in &stats.extra {
                println!("{}: {}", key, value);
            }
        }
    }
    Ok(())
}

pub fn print_dashboard(dashboard: &Dashboard, today: NaiveDate, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(dashboard)?,
        Format::Pretty => {
            let stats = &dashboard.stats;
            println!("{}", "Dashboard".bold());
            println!(
                "  Total Tasks {}   Completed {}   Pending {}",
                stats.total_tasks.to_string().blue(),
                stats.total_done.to_string().green(),
                stats.total_pending.to_string().yellow()
            );
            println!();
            println!("{}", "Due Today".bold());
            if dashboard.due_today.is_empty() {
                println!("  {}", "No tasks due today".dimmed());
            }
            for task in &dashboard.due_today {
                println!("  {}", task_line(task, &[], today));
            }
        }
    }
    Ok(())
}

pub fn print_user(user: &User, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(user)?,
        Format::Pretty => println!("{} <{}>", user.display_name().bold(), user.email),
    }
    Ok(())
}

pub fn print_message(message: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(&serde_json::json!({ "status": "ok", "message": message }))?,
        Format::Pretty => println!("{}", message),
    }
    Ok(())
}

/// Status line on stderr while requests are in flight.
/// Overlapping requests share one indicator; it clears when the last ends.
pub struct BusyIndicator {
    in_flight: AtomicUsize,
    enabled: bool,
}

impl BusyIndicator {
    /// Only draws when stderr is a terminal and output is for people
    pub fn new(format: Format) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            enabled: format == Format::Pretty && std::io::stderr().is_terminal(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl LoadingObserver for BusyIndicator {
    fn on_request_start(&self) {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 && self.enabled {
            eprint!("\r{}", "working...".dimmed());
        }
    }

    fn on_request_end(&self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 && self.enabled {
            eprint!("\r\x1b[K");
        }
    }
}
