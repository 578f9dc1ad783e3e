use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;

use steamwebmail::auth::credential_store;
use steamwebmail::config::{Config, load_config};
use steamwebmail::daemon::{WatchConfig, run_watch};
use steamwebmail::mail::render::{self, DEFAULT_WIDTH};
use steamwebmail::{Credentials, WebMail};

#[derive(Parser)]
#[command(name = "steamwebmail")]
#[command(about = "steamwebmail.com client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the account password in the keyring (read from stdin)
    SetPassword {
        #[arg(long)]
        email: Option<String>,
    },

    /// List folders
    Folders {
        /// Print the raw JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// List one page of messages
    List {
        #[arg(long)]
        folder: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Print a message body
    Read {
        #[arg(long)]
        uid: String,

        #[arg(long)]
        folder: Option<String>,

        /// Print HTML as-is instead of rendering it to text
        #[arg(long)]
        raw_html: bool,

        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: usize,
    },

    /// Poll a folder and print new messages until Ctrl-C
    Watch {
        #[arg(long)]
        folder: Option<String>,

        #[arg(long, default_value_t = 60)]
        interval: u64,
    },
}

fn login(cfg: &Config) -> Result<WebMail> {
    let email = cfg.email()?;
    let password = credential_store::lookup_password(email)?;
    let credentials = Credentials::new(email, password).with_proxy(cfg.proxy.clone());

    let mut mail = WebMail::connect(credentials, cfg.base_url(), cfg.timeout())?;
    if !mail.authenticate() {
        bail!("login failed for {email} (run with RUST_LOG=warn for details)");
    }
    Ok(mail)
}

fn folder_names(envelope: &Value) -> Vec<&str> {
    envelope
        .get("Result")
        .and_then(|r| r.get("@Collection"))
        .and_then(Value::as_array)
        .map(|folders| {
            folders
                .iter()
                .filter_map(|f| f.get("FullName").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::SetPassword { email } => {
            let email = match email {
                Some(e) => e,
                None => {
                    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
                    cfg.email()?.to_string()
                }
            };
            eprintln!("Paste password (end with Ctrl-D):");
            let mut password = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut password)?;
            let password = password.trim_end_matches(['\r', '\n']);
            credential_store::store_password(&email, password)?;
            println!("Saved password for {}", email);
            Ok(())
        }

        Command::Folders { json } => {
            let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let mail = login(&cfg)?;
            let envelope = mail.get_folders()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else {
                for name in folder_names(&envelope) {
                    println!("{name}");
                }
            }
            Ok(())
        }

        Command::List { folder, page } => {
            let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let folder = folder.unwrap_or_else(|| cfg.default_folder().to_string());
            let mail = login(&cfg)?;
            let messages = mail.get_messages(&folder, page);
            eprintln!("{} message(s) in {folder}, page {page}", messages.len());
            for m in &messages {
                println!("{}", render::summary_line(m));
            }
            Ok(())
        }

        Command::Read {
            uid,
            folder,
            raw_html,
            width,
        } => {
            let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let folder = folder.unwrap_or_else(|| cfg.default_folder().to_string());
            let mail = login(&cfg)?;
            let body = mail.get_message_content(&uid, &folder).unwrap_or_default();
            println!("{}", render::body_to_text(&body, width, raw_html)?);
            Ok(())
        }

        Command::Watch { folder, interval } => {
            let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let folder = folder.unwrap_or_else(|| cfg.default_folder().to_string());
            let mut mail = login(&cfg)?;
            run_watch(
                &mut mail,
                WatchConfig {
                    folder,
                    interval_secs: interval,
                },
                |m| println!("{}", render::summary_line(m)),
            )
        }
    }
}
