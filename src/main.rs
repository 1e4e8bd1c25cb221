use clap::Parser;

use temply_tasks::cli::{orchestration, Args};
use temply_tasks::ui;

fn initialize_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("temply_tasks={}", level)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();
}

fn main() {
    let args = Args::parse();

    initialize_logger(args.verbose);

    if let Err(e) = orchestration::execute(&args) {
        ui::display_error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
