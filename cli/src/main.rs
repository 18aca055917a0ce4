mod error_formatter;
mod server;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::{Parser, Subcommand};
use matlite::{Engine, ExecutionResult, ResourceLimits};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "matlite")]
#[command(about = "MATLAB-style control scripts, translated and run in a sandbox.")]
#[command(
    long_about = "matlite translates MATLAB-like scripts (transfer functions, step and Bode plots, root locus, ...) into\nsandboxed instructions, runs them and returns the printed output and every figure as a PNG.\nThe CLI runs script files, shows their translation, or serves the same pipeline over HTTP."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script file and write its figures as PNG files
    ///
    /// Prints the console transcript (translated program followed by the output) and writes one
    /// plot_<N>.png per figure. Exits with status 1 when the run fails.
    Run {
        /// Script to run
        file: PathBuf,
        /// Directory the figures are written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        /// Print the raw result record as JSON instead of the transcript
        #[arg(long)]
        json: bool,
        /// Execution time limit in milliseconds
        #[arg(long, default_value_t = ResourceLimits::default().max_execution_time_ms)]
        timeout_ms: u64,
    },
    /// Show the translated program of a script without running it
    ///
    /// Lines the statement grammar rejects are reported with their position and make the
    /// command exit with status 1.
    Translate {
        /// Script to translate
        file: PathBuf,
    },
    /// Start HTTP server (default: localhost:3000)
    ///
    /// API: POST /api/run with {code}, answered with {success, plots, console, error}.
    /// GET /health reports the service status.
    Server {
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port number to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Execution time limit per request in milliseconds
        #[arg(long, default_value_t = ResourceLimits::default().max_execution_time_ms)]
        timeout_ms: u64,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Server { .. }));

    let result = match &cli.command {
        Commands::Run {
            file,
            out,
            json,
            timeout_ms,
        } => run_command(file, out, *json, *timeout_ms),
        Commands::Translate { file } => translate_command(file),
        Commands::Server {
            host,
            port,
            timeout_ms,
        } => server_command(host, *port, *timeout_ms),
    };

    if let Err(e) = result {
        if let Some(matlite_err) = e.downcast_ref::<matlite::MatliteError>() {
            eprintln!("{}", error_formatter::format_error(matlite_err));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default filter
fn init_tracing(server: bool) {
    let default_filter = if server {
        "matlite=info,tower_http=info"
    } else {
        "matlite=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn engine_with_timeout(timeout_ms: u64) -> Engine {
    Engine::with_limits(ResourceLimits {
        max_execution_time_ms: timeout_ms,
        ..ResourceLimits::default()
    })
}

fn read_script(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("cannot read script {}", file.display()))
}

fn run_command(file: &Path, out: &Path, json: bool, timeout_ms: u64) -> Result<()> {
    let code = read_script(file)?;
    let result = engine_with_timeout(timeout_ms).run(&code);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.console);
        if !result.console.is_empty() && !result.console.ends_with('\n') {
            println!();
        }
        write_figures(&result, out)?;
    }

    match &result.error {
        Some(error) if !result.success => {
            if !json {
                eprintln!("{}", error);
            }
            std::process::exit(1);
        }
        _ => Ok(()),
    }
}

fn write_figures(result: &ExecutionResult, out: &Path) -> Result<()> {
    if result.plots.is_empty() {
        return Ok(());
    }
    fs::create_dir_all(out)
        .with_context(|| format!("cannot create output directory {}", out.display()))?;
    for plot in &result.plots {
        let png = STANDARD
            .decode(&plot.image)
            .with_context(|| format!("figure {} is not valid base64", plot.id))?;
        let path = out.join(format!("{}.png", plot.id));
        fs::write(&path, png).with_context(|| format!("cannot write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn translate_command(file: &Path) -> Result<()> {
    let code = read_script(file)?;
    let program = Engine::new().translate(&code)?;
    println!("{}", program);

    let errors: Vec<_> = program.syntax_errors().collect();
    if errors.is_empty() {
        return Ok(());
    }
    for error in &errors {
        eprintln!("{}", error_formatter::format_error(error));
    }
    eprintln!("{} line(s) could not be translated", errors.len());
    std::process::exit(1);
}

fn server_command(host: &str, port: u16, timeout_ms: u64) -> Result<()> {
    #[cfg(feature = "server")]
    {
        use tokio::runtime::Runtime;
        let rt = Runtime::new()?;
        rt.block_on(async {
            println!(
                "Starting HTTP server with a {}ms execution limit",
                timeout_ms
            );
            server::http::start_server(engine_with_timeout(timeout_ms), host, port).await
        })?;
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (host, port, timeout_ms);
        eprintln!("Error: Server feature not enabled");
        eprintln!("Recompile with: cargo build --features server");
        std::process::exit(1);
    }

    Ok(())
}
