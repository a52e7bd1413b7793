use std::future::Future;

use tokio::io::{AsyncWriteExt, BufWriter, Stdout};
use tracing::warn;

use super::error::AppError;

/// Output handles passed to the application body
pub struct Writers {
    pub stdout: BufWriter<Stdout>,
}

impl Writers {
    fn new() -> Self {
        Self {
            stdout: BufWriter::new(tokio::io::stdout()),
        }
    }
}

/// Reusable CLI application runner that handles:
/// - Argument parsing before the runtime starts
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Stdout buffering and flushing
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM, 129 = SIGHUP)
pub struct CliApp {
    name: String,
}

/// A [`CliApp`] with a parser for its arguments
pub struct CliCommand<P> {
    app: CliApp,
    parse: P,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach the parser for the process arguments
    pub fn with_args<P, A>(self, parse: P) -> CliCommand<P>
    where
        P: FnOnce(Vec<String>) -> Result<A, AppError>,
    {
        CliCommand { app: self, parse }
    }

    /// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C
    /// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
    async fn wait_for_signal(&self) -> i32 {
        match self.listen().await {
            Ok(code) => code,
            Err(e) => {
                warn!(error = %e, "Signal handlers unavailable");
                std::future::pending().await
            }
        }
    }

    async fn listen(&self) -> std::io::Result<i32> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sighup = signal(SignalKind::hangup())?;

            let code = tokio::select! {
                _ = sigterm.recv() => {
                    eprintln!("{}: received SIGTERM", self.name);
                    143 // 128 + 15
                }
                _ = sigint.recv() => {
                    eprintln!("{}: received SIGINT", self.name);
                    130 // 128 + 2
                }
                _ = sighup.recv() => {
                    eprintln!("{}: received SIGHUP", self.name);
                    129 // 128 + 1
                }
            };
            Ok(code)
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await?;
            eprintln!("{}: received Ctrl+C", self.name);
            Ok(130)
        }
    }
}

impl<P> CliCommand<P> {
    /// Parse the process arguments, then run `main_fn` on a fresh Tokio runtime
    /// raced against signal reception.
    ///
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub fn run<A, F, Fut>(self, main_fn: F) -> !
    where
        P: FnOnce(Vec<String>) -> Result<A, AppError>,
        F: FnOnce(Writers, A) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let Self { app, parse } = self;

        let args = match parse(std::env::args().collect()) {
            Ok(args) => args,
            Err(e) => {
                eprintln!("{}: {}", app.name, e);
                std::process::exit(1);
            }
        };

        let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("{}: failed to start runtime: {}", app.name, e);
                std::process::exit(1);
            }
        };

        let code = runtime.block_on(async {
            tokio::select! {
                result = main_fn(Writers::new(), args) => exit_code(&app, result),
                code = app.wait_for_signal() => code,
            }
        });

        // Blocking engine tasks may still be running after a signal
        runtime.shutdown_background();
        std::process::exit(code);
    }
}

fn exit_code(app: &CliApp, result: Result<(), AppError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}: {}", app.name, e);
            1
        }
    }
}

/// Write `chunks` to stdout in order and flush
pub async fn write_all(writers: &mut Writers, chunks: &[Vec<u8>]) -> Result<(), AppError> {
    for chunk in chunks {
        writers.stdout.write_all(chunk).await?;
    }
    writers.stdout.flush().await?;
    Ok(())
}
