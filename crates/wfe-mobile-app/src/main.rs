/*
[INPUT]:  CLI arguments, YAML configuration file, WFE_* environment variables
[OUTPUT]: One orchestrator operation per invocation, printed as text
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or logging setup
*/

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use wfe_mobile_app::view::{ProcessView, task_views};
use wfe_mobile_app::{App, AppConfig, Notice, Tab, TaskView};

const LOGIN_ENV: &str = "WFE_LOGIN";
const PASSWORD_ENV: &str = "WFE_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "wfe-mobile", version, about = "Workflow engine mobile client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
    /// Login name; falls back to WFE_LOGIN
    #[arg(long = "login", value_name = "NAME", global = true)]
    login: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tracked processes
    Processes {
        #[arg(long, value_enum, default_value_t = ProcessTab::Active)]
        tab: ProcessTab,
    },
    /// List the tasks of a tracked process
    Tasks { process_id: i64 },
    /// List the tasks assigned to the current user
    MyTasks,
    /// Start a new instance of a tracked process
    Start { process_id: i64 },
    /// Complete a task of a tracked process
    Complete {
        process_id: i64,
        task_id: i64,
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_variable)]
        vars: Vec<(String, String)>,
    },
    /// Hand a task over to other executors
    Delegate {
        task_id: i64,
        #[arg(long = "current-owner", value_name = "NAME")]
        current_owner: String,
        #[arg(long = "keep-owner")]
        keep_owner: bool,
        #[arg(long = "assignee", value_name = "NAME", required = true)]
        assignees: Vec<String>,
    },
    /// Show process and task counts
    Stats,
    /// Show the current user's executor profile
    Profile,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ProcessTab {
    Active,
    Ended,
}

impl From<ProcessTab> for Tab {
    fn from(tab: ProcessTab) -> Self {
        match tab {
            ProcessTab::Active => Tab::Active,
            ProcessTab::Ended => Tab::Ended,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let _log_guard = init_tracing(&args.log_level, args.log_file.as_deref())?;

    let config = AppConfig::load(args.config_path.as_deref()).context("load config")?;
    info!(
        base_url = %config.server.base_url,
        tracked = config.tracked_processes.len(),
        "configuration loaded"
    );

    let app = App::new(config).context("create client")?;
    let login = args
        .login
        .or_else(|| std::env::var(LOGIN_ENV).ok())
        .with_context(|| format!("--login or {LOGIN_ENV} is required"))?;
    let password =
        std::env::var(PASSWORD_ENV).with_context(|| format!("{PASSWORD_ENV} is required"))?;

    let session = app.login(&login, &password).await.context("login")?;
    println!("Logged in as {}", session.display_name);
    report_notice(&app);

    run(&app, args.command).await?;
    app.logout();
    Ok(())
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Processes { tab } => {
            app.select_tab(tab.into()).await?;
            let processes = app.snapshot().visible_processes();
            if processes.is_empty() {
                println!("No processes");
            }
            for process in &processes {
                print_process(process);
            }
        }
        Command::Tasks { process_id } => {
            app.ensure_tasks_loaded(process_id).await?;
            let state = app.snapshot();
            let process = state
                .process(process_id)
                .ok_or_else(|| anyhow!("process {process_id} is not tracked"))?;
            let mut view = ProcessView::from_tracked(process);
            view.tasks = task_views(&process.tasks);
            print_process(&view);
            print_tasks(&view.tasks);
        }
        Command::MyTasks => {
            app.select_tab(Tab::MyTasks).await?;
            print_tasks(&app.snapshot().my_task_views());
        }
        Command::Start { process_id } => {
            app.start_process(process_id).await?;
            println!("Process {process_id} started");
        }
        Command::Complete {
            process_id,
            task_id,
            vars,
        } => {
            let variables = (!vars.is_empty()).then(|| vars.into_iter().collect::<BTreeMap<_, _>>());
            app.complete_task(process_id, task_id, variables).await?;
            report_notice(app);
        }
        Command::Delegate {
            task_id,
            current_owner,
            keep_owner,
            assignees,
        } => {
            let mut executors = Vec::with_capacity(assignees.len());
            for name in &assignees {
                let found = app.lookup_executors(name).await?;
                let executor = found
                    .into_iter()
                    .next()
                    .with_context(|| format!("no executor named {name}"))?;
                executors.push(executor);
            }
            app.delegate_task(task_id, &current_owner, keep_owner, &executors)
                .await?;
            report_notice(app);
        }
        Command::Stats => {
            let stats = app.load_statistics().await?;
            for (label, value) in stats.series() {
                println!("{label:<10} {value:>5}  {:>5.1}%", stats.share(value));
            }
        }
        Command::Profile => match app.load_profile().await? {
            Some(profile) => {
                println!("{} ({})", profile.full_name.as_deref().unwrap_or(&profile.name), profile.name);
                println!("  id: {}", profile.id);
                if let Some(kind) = &profile.executor_type {
                    println!("  type: {kind}");
                }
            }
            None => report_notice(app),
        },
    }
    Ok(())
}

fn print_process(process: &ProcessView) {
    println!("[{}] {} ({})", process.badge, process.title, process.status);
    println!("  started: {}", process.started);
    if let Some(completed) = &process.completed {
        println!("  completed: {completed}");
    }
}

fn print_tasks(tasks: &[TaskView]) {
    if tasks.is_empty() {
        println!("No tasks");
    }
    for task in tasks {
        println!("{:>3}. {} [{}] owner: {}", task.position, task.name, task.state, task.owner);
        if let Some(process_name) = &task.process_name {
            println!("     process: {process_name}");
        }
    }
}

fn report_notice(app: &App) {
    if let Some(Notice { message, .. }) = app.snapshot().notice {
        println!("{message}");
    }
}

fn parse_variable(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw}"))?;
    if name.is_empty() {
        return Err("variable name must not be empty".to_string());
    }
    Ok((name.to_string(), value.to_string()))
}

fn init_tracing(log_level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().context("log file path has no file name")?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            builder
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(Some(guard))
        }
        None => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(None)
        }
    }
}
