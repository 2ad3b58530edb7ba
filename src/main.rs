use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use tokio::io::BufReader;
use tracing::info;

use tasksched::{loader, Config, OutputFormat, Shell};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("tasksched")
        .version("0.1.0")
        .about("Interactive running/ready/waiting task state engine")
        .arg(
            Arg::new("tasks")
                .long("tasks")
                .help("Initial task file (header line, then id;priority;state;wait_id)")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("JSON configuration file")
                .required(false),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("trace, debug, info, warn or error")
                .required(false),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Render the queues as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Do not print the command prompt")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("failed to load config {}", path))?,
        None => Config::default(),
    };
    if let Some(tasks) = matches.get_one::<String>("tasks") {
        config.tasks_path = tasks.into();
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.log_level = level.clone();
    }
    if matches.get_flag("json") {
        config.output = OutputFormat::Json;
    }
    if matches.get_flag("quiet") {
        config.prompt = false;
    }

    tracing_subscriber::fmt()
        .with_max_level(config.max_level()?)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting task scheduler with {:?}", config);

    let registry = loader::load_file(&config.tasks_path, config.default_task_id)
        .await
        .with_context(|| format!("failed to load initial tasks from {}", config.tasks_path.display()))?;

    let mut shell = Shell::new(registry, config);
    let mut stdout = tokio::io::stdout();
    shell.run(BufReader::new(tokio::io::stdin()), &mut stdout).await?;

    info!("Task scheduler stopped");
    Ok(())
}
