//! ddrop: one-time encrypted file sharing CLI
//!
//! Commands:
//!   send <file>       - encrypt a file, upload it, and print the share link
//!   recv <link>       - decode a share link, download, decrypt, and save
//!   config show       - display current configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ddrop_core::DdropConfig;
use ddrop_crypto::KdfParams;
use ddrop_share::{user_message, FsDeliver, RecvOp, SendOp, SendPhase};
use ddrop_store::HttpStore;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "ddrop",
    version,
    about = "One-time encrypted file sharing",
    long_about = "ddrop: encrypt a file client-side, upload the ciphertext, and share a \
                  single-use link carrying the key in its URL fragment"
)]
struct Cli {
    /// Path to ddrop.toml configuration file
    #[arg(long, short = 'c', env = "DDROP_CONFIG", default_value = "~/.config/ddrop/ddrop.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a file and create a single-use share link
    ///
    /// The passphrase is prompted interactively (or read from
    /// DDROP_PASSPHRASE for scripting). The printed link works exactly once.
    Send {
        /// File to share
        file: PathBuf,
    },

    /// Download and decrypt a shared file
    ///
    /// Accepts the full share URL or just its fragment. The file is gone
    /// from the relay the moment this succeeds.
    Recv {
        /// Share link (URL or fragment)
        link: String,
        /// Directory to save the decrypted file into
        #[arg(long, short = 'o', default_value = ".")]
        output: PathBuf,
        /// Skip the download confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the resolved configuration
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DdropConfig::load(&expand_tilde(&cli.config))?;
    init_tracing(&config.log.level);

    match cli.command {
        Commands::Send { file } => cmd_send(&config, &file).await,
        Commands::Recv { link, output, yes } => cmd_recv(&config, &link, &output, yes).await,
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(&config, &cli.config),
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Expand `~` in path to the user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_default();
        PathBuf::from(format!("{home}/{rest}"))
    } else {
        path.to_path_buf()
    }
}

fn read_passphrase() -> Result<SecretString> {
    if let Ok(passphrase) = std::env::var("DDROP_PASSPHRASE") {
        return Ok(SecretString::from(passphrase));
    }
    let passphrase =
        rpassword::prompt_password("Passphrase: ").context("reading passphrase")?;
    if passphrase.is_empty() {
        anyhow::bail!("empty passphrase refused; set DDROP_PASSPHRASE to force one");
    }
    Ok(SecretString::from(passphrase))
}

// ── Progress bar helpers ──────────────────────────────────────────────────────

fn make_progress_bar(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn make_spinner(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{prefix:.bold} {spinner} {msg}").unwrap());
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ── `ddrop send` ──────────────────────────────────────────────────────────────

async fn cmd_send(config: &DdropConfig, file: &Path) -> Result<()> {
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .context("file has no usable name")?
        .to_string();
    let payload = tokio::fs::read(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    tracing::info!(file = %file.display(), bytes = payload.len(), "sealing and uploading");

    let passphrase = read_passphrase()?;
    let store = HttpStore::new(&config.relay)?;

    let (op, mut rx) = SendOp::new();
    let pb = make_progress_bar("send");
    let pb_task = pb.clone();
    let watcher = tokio::spawn(async move {
        loop {
            let phase = rx.borrow_and_update().clone();
            match phase {
                SendPhase::Encrypting => pb_task.set_message("encrypting"),
                SendPhase::Uploading { percent } => {
                    pb_task.set_message("uploading");
                    pb_task.set_position(u64::from(percent));
                }
                SendPhase::LinkReady { .. } => {
                    pb_task.set_position(100);
                    break;
                }
                SendPhase::Failed { .. } => break,
                SendPhase::Idle => {}
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    });

    let outcome = op
        .run(&store, payload, &filename, passphrase, KdfParams::from(&config.crypto))
        .await;
    watcher.await.ok();
    pb.finish_and_clear();

    match outcome {
        Ok(outcome) => {
            println!(
                "{}/#{}",
                config.relay.endpoint.trim_end_matches('/'),
                outcome.fragment
            );
            eprintln!("Copy this link and send it. It will only work once.");
            Ok(())
        }
        Err(err) => anyhow::bail!("{}", user_message(&err)),
    }
}

// ── `ddrop recv` ──────────────────────────────────────────────────────────────

async fn cmd_recv(config: &DdropConfig, link: &str, output: &Path, yes: bool) -> Result<()> {
    let store = HttpStore::new(&config.relay)?;
    let (op, _rx) = RecvOp::new();

    let share = match op.inspect(link) {
        Ok(share) => share,
        Err(err) => anyhow::bail!("{}", user_message(&err)),
    };
    tracing::debug!(id = %share.id, filename = %share.filename, "share link accepted");

    if !yes && !confirm(&format!("Download and decrypt '{}'?", share.filename))? {
        println!("Aborted; the file remains available.");
        return Ok(());
    }

    std::fs::create_dir_all(output)
        .with_context(|| format!("creating output dir {}", output.display()))?;
    let deliver = FsDeliver::new(output);

    let pb = make_spinner("recv");
    pb.set_message("downloading and decrypting");
    let result = op.run(&store, share.clone(), &deliver).await;
    pb.finish_and_clear();

    match result {
        Ok(()) => {
            println!("Saved {} to {}", share.filename, output.display());
            Ok(())
        }
        Err(err) => anyhow::bail!("{}", user_message(&err)),
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

// ── `ddrop config show` ───────────────────────────────────────────────────────

fn cmd_config_show(config: &DdropConfig, path: &Path) -> Result<()> {
    println!("# config: {}", path.display());
    print!("{}", toml::to_string_pretty(config).context("serializing config")?);
    Ok(())
}
