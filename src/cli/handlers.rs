use chrono::Local;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::identity;
use crate::io::{config_io, paths};
use crate::model::{AppConfig, Backing, Task, TaskDraft, TaskId, parse_due_date};
use crate::store::client::RemoteClient;
use crate::store::views;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let data_dir = paths::data_dir(cli.data_dir.as_deref());
    let config = config_io::load_config(&data_dir)?;

    // main routes the no-subcommand case to the TUI before calling here
    let Some(command) = cli.command else {
        return Ok(());
    };
    match command {
        Commands::Add(args) => cmd_add(args, &config, &data_dir, json),
        Commands::List(args) => cmd_list(args, &config, &data_dir, json),
        Commands::Completed => cmd_completed(&config, &data_dir, json),
        Commands::Done(args) => cmd_set_completed(args, true, &config, &data_dir),
        Commands::Reopen(args) => cmd_set_completed(args, false, &config, &data_dir),
        Commands::Delete(args) => cmd_delete(args, &config, &data_dir),
        Commands::DeviceId => cmd_device_id(&data_dir, json),
    }
}

/// Synchronous store access for one-shot commands. The remote backing is
/// the one worth scripting against; the local backing lives only as long
/// as the process, so reads come back empty and writes validate, print,
/// and vanish.
enum CliStore {
    Local,
    Remote(RemoteClient),
}

fn open(
    config: &AppConfig,
    data_dir: &std::path::Path,
) -> Result<CliStore, Box<dyn std::error::Error>> {
    match config.store.backing {
        Backing::Local => Ok(CliStore::Local),
        Backing::Remote => {
            let device = identity::device_id(data_dir)?;
            Ok(CliStore::Remote(RemoteClient::new(
                &config.store.remote,
                device,
            )?))
        }
    }
}

impl CliStore {
    fn list(&self) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
        match self {
            CliStore::Local => Ok(Vec::new()),
            CliStore::Remote(client) => Ok(client.list()?),
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_add(
    args: AddArgs,
    config: &AppConfig,
    data_dir: &std::path::Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let draft = TaskDraft {
        title: args.title,
        description: args.description,
        due_date: args.due.as_deref().map(parse_due_date).transpose()?,
    };
    let draft = draft.validate(Local::now().date_naive())?;

    let id = match open(config, data_dir)? {
        CliStore::Local => TaskId::new_random(),
        CliStore::Remote(client) => client.add(&draft)?,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&AddedJson { id: id.to_string() })?
        );
    } else {
        println!("added {}", id);
    }
    Ok(())
}

fn cmd_list(
    args: ListArgs,
    config: &AppConfig,
    data_dir: &std::path::Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = open(config, data_dir)?.list()?;
    let selected: Vec<&Task> = if args.all {
        tasks.iter().collect()
    } else {
        views::pending_tasks(&tasks)
    };
    print_tasks(&selected, json, "(no pending tasks)")
}

fn cmd_completed(
    config: &AppConfig,
    data_dir: &std::path::Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = open(config, data_dir)?.list()?;
    let completed = views::completed_tasks(&tasks);
    print_tasks(&completed, json, "(no completed tasks)")
}

fn print_tasks(
    tasks: &[&Task],
    json: bool,
    empty_message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let out: Vec<TaskJson> = tasks.iter().map(|t| task_to_json(t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if tasks.is_empty() {
        println!("{}", empty_message);
        return Ok(());
    }
    for task in tasks {
        for line in format_task_block(task) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_set_completed(
    args: IdArg,
    completed: bool,
    config: &AppConfig,
    data_dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    // An unknown id is a no-op; the command still reports what it asked
    // for.
    if let CliStore::Remote(client) = open(config, data_dir)? {
        client.set_completed(&TaskId(args.id.clone()), completed)?;
    }
    println!(
        "{} {}",
        if completed { "done" } else { "reopened" },
        args.id
    );
    Ok(())
}

fn cmd_delete(
    args: IdArg,
    config: &AppConfig,
    data_dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let CliStore::Remote(client) = open(config, data_dir)? {
        client.delete(&TaskId(args.id.clone()))?;
    }
    println!("deleted {}", args.id);
    Ok(())
}

fn cmd_device_id(
    data_dir: &std::path::Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = identity::device_id(data_dir)?;
    if json {
        println!("{}", serde_json::json!({ "device_id": id }));
    } else {
        println!("{}", id);
    }
    Ok(())
}
