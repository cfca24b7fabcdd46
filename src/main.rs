// Taskhub CLI
// Command-line front end for the task API

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fmt::Write as FmtWrite;
use std::fs::{self, OpenOptions};
use std::io::LineWriter;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use taskhub_client::commands::{auth, dashboard, groups, tasks, AppContext};
use taskhub_client::filter::{DueDateFilter, PriorityFilter, SortBy, StatusFilter};
use taskhub_client::models::{Priority, ResourceId, UpdateTaskRequest};
use taskhub_client::output::Format;
use taskhub_client::{ClientError, Config};

/// Custom time formatter: [HH:mm:ss] [taskhub]
#[derive(Clone)]
struct TaskhubTimer;

impl FormatTime for TaskhubTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        write!(w, "[{}] [taskhub]", now.format("%H:%M:%S"))
    }
}

#[derive(Parser)]
#[command(name = "taskhub", version, about = "Command-line client for the task API")]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    format: Format,
    /// Shorthand for --format json
    #[arg(long, global = true, hide = true)]
    json: bool,
    /// Base URL of the API (overrides TASKHUB_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Where tokens are kept (overrides TASKHUB_SESSION_FILE)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the token pair
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Forget the stored tokens
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Work with tasks
    #[command(subcommand)]
    Tasks(TaskCommands),
    /// Work with task groups
    #[command(subcommand)]
    Groups(GroupCommands),
    /// Task totals and what is due today
    Dashboard,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks, filtered and sorted locally
    List {
        /// recent or oldest
        #[arg(long)]
        sort: Option<SortBy>,
        /// all, completed or pending
        #[arg(long)]
        status: Option<StatusFilter>,
        /// all, low, medium or high
        #[arg(long)]
        priority: Option<PriorityFilter>,
        /// all, upcoming or missed (ignored when --from and --to are set)
        #[arg(long)]
        due: Option<DueDateFilter>,
        /// Group ID (repeatable)
        #[arg(long = "group")]
        groups: Vec<ResourceId>,
        /// Case-insensitive match on title and description
        #[arg(long, short)]
        search: Option<String>,
        /// Due on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Due on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Create a task
    Add {
        title: String,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short)]
        priority: Option<Priority>,
        #[arg(long, short)]
        group: Option<ResourceId>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Change fields of a task
    Edit {
        id: ResourceId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short)]
        priority: Option<Priority>,
        #[arg(long, short)]
        group: Option<ResourceId>,
        /// Remove the task from its group
        #[arg(long, conflicts_with = "group")]
        clear_group: bool,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },
    /// Mark a task complete
    Done { id: ResourceId },
    /// Mark a task not complete
    Undone { id: ResourceId },
    /// Delete a task
    Rm { id: ResourceId },
    /// Tasks due today
    Today,
}

#[derive(Subcommand)]
enum GroupCommands {
    /// List groups with progress
    List {
        /// Case-insensitive match on name and description
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Create a group
    Add {
        name: String,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Rename or redescribe a group
    Edit {
        id: ResourceId,
        #[arg(long)]
        name: String,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Delete a group
    Rm { id: ResourceId },
    /// Tasks in a group
    Tasks { id: ResourceId },
    /// Completion numbers for a group
    Stats { id: ResourceId },
}

/// Open the log file for appending, creating its directory
fn open_log_file(path: &Path) -> std::io::Result<LineWriter<fs::File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(LineWriter::new(file))
}

async fn run(cli: Cli, ctx: AppContext) -> taskhub_client::Result<()> {
    match cli.command {
        Commands::Login { email, password } => auth::login(&ctx, email, password).await,
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
        } => auth::register(&ctx, email, password, first_name, last_name).await,
        Commands::Logout => auth::logout(&ctx).await,
        Commands::Whoami => auth::whoami(&ctx).await,
        Commands::Dashboard => dashboard::run(&ctx).await,
        Commands::Tasks(command) => match command {
            TaskCommands::List {
                sort,
                status,
                priority,
                due,
                groups,
                search,
                from,
                to,
            } => {
                let options = tasks::ListOptions {
                    sort,
                    status,
                    priority,
                    due,
                    groups,
                    search,
                    from,
                    to,
                };
                tasks::list(&ctx, &options).await
            }
            TaskCommands::Add {
                title,
                description,
                priority,
                group,
                due,
            } => tasks::add(&ctx, title, description, priority, group, due).await,
            TaskCommands::Edit {
                id,
                title,
                description,
                priority,
                group,
                clear_group,
                due,
                clear_due,
            } => {
                let changes = UpdateTaskRequest {
                    title,
                    description,
                    priority,
                    group: tasks::field_update(group, clear_group),
                    due_date: tasks::field_update(due, clear_due),
                    is_complete: None,
                };
                tasks::edit(&ctx, &id, changes).await
            }
            TaskCommands::Done { id } => tasks::set_done(&ctx, &id, true).await,
            TaskCommands::Undone { id } => tasks::set_done(&ctx, &id, false).await,
            TaskCommands::Rm { id } => tasks::remove(&ctx, &id).await,
            TaskCommands::Today => tasks::today(&ctx).await,
        },
        Commands::Groups(command) => match command {
            GroupCommands::List { search } => groups::list(&ctx, search.as_deref()).await,
            GroupCommands::Add { name, description } => {
                groups::add(&ctx, name, description).await
            }
            GroupCommands::Edit {
                id,
                name,
                description,
            } => groups::edit(&ctx, &id, name, description).await,
            GroupCommands::Rm { id } => groups::remove(&ctx, &id).await,
            GroupCommands::Tasks { id } => groups::tasks(&ctx, &id).await,
            GroupCommands::Stats { id } => groups::stats(&ctx, &id).await,
        },
    }
}

fn report(error: &anyhow::Error, format: Format) -> i32 {
    let client_error = error.downcast_ref::<ClientError>();
    let auth_failure = client_error.is_some_and(ClientError::is_auth_failure);

    match format {
        Format::Json => {
            eprintln!(
                "{}",
                serde_json::json!({
                    "error": client_error.map(ClientError::code).unwrap_or("internal"),
                    "message": error.to_string()
                })
            );
        }
        Format::Pretty => {
            eprintln!("error: {error:#}");
            if auth_failure {
                eprintln!("hint: run `taskhub login` to sign in again");
            }
        }
    }

    if auth_failure {
        2
    } else {
        1
    }
}

async fn start(cli: Cli, format: Format) -> anyhow::Result<()> {
    let mut config = Config::from_env();
    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }
    if let Some(path) = cli.session_file.clone() {
        config.session_file = path;
    }
    config.validate().map_err(ClientError::Config)?;

    tracing::info!("Using API at {}", config.api_url);
    let ctx = AppContext::from_config(&config, format)?;
    run(cli, ctx).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let format = if cli.json { Format::Json } else { cli.format };

    // Log file path is needed before tracing starts; flags do not move it
    let log_path = Config::from_env().log_file;
    let (file_layer, log_guard) = match open_log_file(&log_path) {
        Ok(writer) => {
            // Use non_blocking for proper async file writing
            let (non_blocking, guard) = tracing_appender::non_blocking(writer);
            let layer = fmt::layer()
                .with_timer(TaskhubTimer)
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "taskhub=info,taskhub_client=info".into()),
                );
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("warning: cannot open log file {}: {}", log_path.display(), e);
            (None, None)
        }
    };

    // Format: [HH:mm:ss] [taskhub] LEVEL message
    tracing_subscriber::registry()
        // Stderr layer, warnings and errors only
        .with(
            fmt::layer()
                .with_timer(TaskhubTimer)
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(LevelFilter::WARN),
        )
        // File layer (no ANSI colors)
        .with(file_layer)
        .init();

    let code = match start(cli, format).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("Command failed: {:#}", e);
            report(&e, format)
        }
    };

    // Flush the file writer before exiting
    drop(log_guard);
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_flags_parse() {
        let cli = Cli::try_parse_from([
            "taskhub", "tasks", "list", "--status", "done", "--priority", "high", "--group", "3",
            "--group", "4", "--from", "2024-01-01", "--to", "2024-01-31",
        ])
        .unwrap();
        match cli.command {
            Commands::Tasks(TaskCommands::List {
                status,
                priority,
                groups,
                from,
                ..
            }) => {
                assert_eq!(status, Some(StatusFilter::Completed));
                assert_eq!(priority, Some(PriorityFilter::Only(Priority::High)));
                assert_eq!(groups, vec![ResourceId::Number(3), ResourceId::Number(4)]);
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1));
            }
            _ => panic!("expected tasks list"),
        }
    }

    #[test]
    fn test_edit_clear_flags() {
        let cli = Cli::try_parse_from(["taskhub", "tasks", "edit", "7", "--clear-due"]).unwrap();
        match cli.command {
            Commands::Tasks(TaskCommands::Edit {
                clear_due, due, ..
            }) => {
                assert!(clear_due);
                assert_eq!(due, None);
            }
            _ => panic!("expected tasks edit"),
        }

        assert!(Cli::try_parse_from([
            "taskhub", "tasks", "edit", "7", "--due", "2024-01-01", "--clear-due",
        ])
        .is_err());
    }

    #[test]
    fn test_groups_list_search() {
        let cli = Cli::try_parse_from(["taskhub", "groups", "list", "--search", "home"]).unwrap();
        match cli.command {
            Commands::Groups(GroupCommands::List { search }) => {
                assert_eq!(search.as_deref(), Some("home"))
            }
            _ => panic!("expected groups list"),
        }
    }

    #[test]
    fn test_json_shorthand_and_overrides() {
        let cli = Cli::try_parse_from([
            "taskhub",
            "--json",
            "--api-url",
            "https://tasks.example.com",
            "whoami",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.api_url.as_deref(), Some("https://tasks.example.com"));
        assert!(matches!(cli.command, Commands::Whoami));
    }

    #[test]
    fn test_auth_failures_exit_with_two() {
        let err = anyhow::Error::from(ClientError::Auth(
            taskhub_client::AuthError::RefreshFailed,
        ));
        assert_eq!(report(&err, Format::Json), 2);

        let err = anyhow::Error::from(ClientError::Network("down".to_string()));
        assert_eq!(report(&err, Format::Json), 1);
    }
}
