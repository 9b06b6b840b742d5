use clap::Parser;
use foldersort::cli::{Cli, run_cli, stop_on_ctrl_c};
use foldersort::engine::RunState;
use foldersort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let state = RunState::new();
    if let Err(e) = stop_on_ctrl_c(state.clone()) {
        log::warn!("Ctrl-C will not stop runs cleanly: {}", e);
    }

    match run_cli(&cli, state) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
