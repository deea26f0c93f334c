use clap::Parser;
use taskmate::cli::commands::Cli;
use taskmate::cli::handlers;
use taskmate::io::{logging, paths};

fn main() {
    let cli = Cli::parse();
    let data_dir = paths::data_dir(cli.data_dir.as_deref());
    logging::init(&data_dir);

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = taskmate::tui::run(&data_dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
