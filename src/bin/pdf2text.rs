//! CLI binary for pdf2text-relay.
//!
//! `pdf2text serve` runs the HTTP relay; `pdf2text extract` relays one local
//! file through the same two services and prints the text.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdf2text_relay::{server, Relay, RelayConfig, ResponseEnvelope};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Run the relay on the default port
  pdf2text serve

  # Call it
  curl -F pdf=@document.pdf http://localhost:8787/pdf

  # One-shot extraction of a local file
  pdf2text extract document.pdf -o document.txt

  # Point at self-hosted services
  pdf2text serve --upload-endpoint http://files.internal/api/v1/upload \
                 --download-base http://files.internal/dl \
                 --extraction-endpoint http://extract.internal/pdf-to-text

ENVIRONMENT VARIABLES:
  PDF2TEXT_HOST                 Bind address (serve)
  PDF2TEXT_PORT                 Bind port (serve)
  PDF2TEXT_UPLOAD_ENDPOINT      File-host upload endpoint
  PDF2TEXT_DOWNLOAD_BASE        File-host direct-download prefix
  PDF2TEXT_EXTRACTION_ENDPOINT  Text-extraction endpoint
  PDF2TEXT_EXTRACTION_TIMEOUT   Extraction timeout in seconds
  PDF2TEXT_UPLOAD_TIMEOUT       Upload timeout in seconds (unset = none)
  RUST_LOG                      Overrides -v / -q log filtering
"#;

/// Relay uploaded PDFs to a file host and a text-extraction service.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2text",
    version,
    about = "Relay PDFs to a file host and a text-extraction service",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF2TEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDF2TEXT_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP relay.
    Serve {
        /// Address to bind.
        #[arg(long, env = "PDF2TEXT_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to bind.
        #[arg(short, long, env = "PDF2TEXT_PORT", default_value_t = 8787)]
        port: u16,

        /// Largest accepted request body in MiB.
        #[arg(long, env = "PDF2TEXT_MAX_UPLOAD_MB", default_value_t = 100)]
        max_upload_mb: usize,

        #[command(flatten)]
        services: ServiceArgs,
    },

    /// Relay one local PDF and print its text.
    Extract {
        /// Local PDF file path.
        input: PathBuf,

        /// Write text to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the JSON response envelope instead of raw text.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        services: ServiceArgs,
    },
}

/// Upstream service settings shared by both subcommands.
#[derive(Args, Debug)]
struct ServiceArgs {
    /// File-host upload endpoint.
    #[arg(long, env = "PDF2TEXT_UPLOAD_ENDPOINT", default_value = pdf2text_relay::config::DEFAULT_UPLOAD_ENDPOINT)]
    upload_endpoint: String,

    /// Prefix of direct-download links on the file host.
    #[arg(long, env = "PDF2TEXT_DOWNLOAD_BASE", default_value = pdf2text_relay::config::DEFAULT_DOWNLOAD_BASE)]
    download_base: String,

    /// Text-extraction endpoint.
    #[arg(long, env = "PDF2TEXT_EXTRACTION_ENDPOINT", default_value = pdf2text_relay::config::DEFAULT_EXTRACTION_ENDPOINT)]
    extraction_endpoint: String,

    /// Extraction timeout in seconds.
    #[arg(long, env = "PDF2TEXT_EXTRACTION_TIMEOUT", default_value_t = 60)]
    extraction_timeout: u64,

    /// Upload timeout in seconds. Unset means no client-side timeout.
    #[arg(long, env = "PDF2TEXT_UPLOAD_TIMEOUT")]
    upload_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve {
            host,
            port,
            max_upload_mb,
            services,
        } => {
            let config = build_config(&services, Some(max_upload_mb))?;
            let relay = Relay::new(config).context("Failed to initialise relay")?;

            let addr: SocketAddr = format!("{host}:{port}")
                .parse()
                .with_context(|| format!("Invalid bind address {host}:{port}"))?;
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;

            server::serve(listener, Arc::new(relay))
                .await
                .context("Server error")?;
        }
        Command::Extract {
            input,
            output,
            json,
            services,
        } => {
            let config = build_config(&services, None)?;
            let relay = Relay::new(config).context("Failed to initialise relay")?;
            run_extract(&relay, &input, output.as_deref(), json, cli.quiet).await?;
        }
    }

    Ok(())
}

/// Map CLI args to `RelayConfig`.
fn build_config(args: &ServiceArgs, max_upload_mb: Option<usize>) -> Result<RelayConfig> {
    let mut builder = RelayConfig::builder()
        .upload_endpoint(&args.upload_endpoint)
        .download_base(&args.download_base)
        .extraction_endpoint(&args.extraction_endpoint)
        .extraction_timeout_secs(args.extraction_timeout)
        .upload_timeout_secs(args.upload_timeout);

    if let Some(mb) = max_upload_mb {
        builder = builder.max_upload_bytes(mb.saturating_mul(1024 * 1024));
    }

    builder.build().context("Invalid configuration")
}

async fn run_extract(
    relay: &Relay,
    input: &Path,
    output: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let spinner = (!quiet).then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message(format!("Relaying {}…", input.display()));
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let start = Instant::now();
    let result = relay.process_file(input).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    // JSON mode reports failures in-band, exactly as the HTTP relay would.
    if json {
        let envelope = match &result {
            Ok(text) => ResponseEnvelope::success(text.clone()),
            Err(e) => ResponseEnvelope::failure(e.message()),
        };
        let body = serde_json::to_string_pretty(&envelope).context("Failed to serialise envelope")?;
        write_output(output, &body)?;
        if let Err(e) = result {
            if !quiet {
                eprintln!("{} {}", red("✘"), e.message());
            }
            std::process::exit(1);
        }
        return Ok(());
    }

    let text = result.context("Extraction failed")?;
    write_output(output, &text)?;

    if !quiet {
        eprintln!(
            "{} {} chars  {}",
            green("✔"),
            text.chars().count(),
            dim(&format!("{}ms", start.elapsed().as_millis())),
        );
    }
    Ok(())
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write output file {}", path.display())),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(text.as_bytes())
                .context("Failed to write to stdout")?;
            // Ensure a trailing newline on stdout.
            if !text.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
            Ok(())
        }
    }
}
