mod args;
mod error;
mod paths;
mod render;
mod settings;
mod table;

use std::process::ExitCode;

use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use crate::args::{Cli, Command};
use crate::error::CliError;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::load(cli.config.as_deref()).await?;
    init_logging(settings.log_level(cli.verbose)?);

    match cli.command {
        Command::Show(view_args) => {
            let view = table::build(&view_args, settings.table).await?;
            print!("{}", render::render(&view));
        }
        Command::Export { view, format, out } => {
            let table = table::build(&view, settings.table).await?;
            let path = table.export_to(&out, format.into()).await?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn init_logging(level: LevelFilter) {
    if let Err(e) = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Failed to initialize logger: {}", e);
    }
}
