use std::io::BufReader;

use orderly::prelude::*;
use tracing::Level;

fn main() {
    let level = std::env::var("ORDERLY_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    CliApp::new("orderly")
        .with_args(|args| parse_args(args, std::env::var(WORKERS_ENV).ok()))
        .run(run_command_per_line);
}

/// Main application logic - runs the command once per stdin line
async fn run_command_per_line(mut writers: Writers, args: Args) -> Result<(), AppError> {
    let Args {
        config,
        operation,
        program,
        args,
    } = args;
    let command = CommandLine::new(program, args);

    // Commands block; keep them off the async workers
    let report = tokio::task::spawn_blocking(move || {
        run_commands(BufReader::new(std::io::stdin()), operation, config, &command)
    })
    .await??;

    match report {
        Report::Done => Ok(()),
        Report::Outputs(outputs) => write_all(&mut writers, &outputs).await,
    }
}
