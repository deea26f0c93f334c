use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tm", about = concat!("[/] taskmate v", env!("CARGO_PKG_VERSION"), " - organize your day with ease"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// List pending tasks
    List(ListArgs),
    /// List completed tasks
    Completed,
    /// Mark a task done
    Done(IdArg),
    /// Mark a done task pending again
    Reopen(IdArg),
    /// Delete a task
    Delete(IdArg),
    /// Print this installation's device identifier
    DeviceId,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Longer description
    #[arg(long, short)]
    pub description: Option<String>,
    /// Due date (YYYY-MM-DD, today or later)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Include completed tasks
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct IdArg {
    /// Task id
    pub id: String,
}
