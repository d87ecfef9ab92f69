use std::process::ExitCode;

use clap::Parser;

mod args;
mod commands;

use args::{Args, Commands};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let result = match args.command {
        Commands::Compile(args) => commands::compile_command(&args),
        Commands::Pack(args) => commands::pack_command(&args),
        Commands::View(args) => commands::view_command(args),
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
