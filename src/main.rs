//! timesheet - command-line client for the timesheet REST API
//!
//! Keeps a bearer token in ~/.timesheet/session.json and sends it with every
//! request. A 401 from the server ends the session; sign in again with
//! `timesheet login`.

use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use timesheet::config::{ClientConfig, FileConfig};
use timesheet::models::{DateRange, NewTimesheetEntry, RegisterForm, SLOT_COUNT, slot_label};
use timesheet::{AuthClient, ClientError, ConsoleNavigator, FileStore};

#[derive(Parser)]
#[command(name = "timesheet")]
#[command(about = "Track daily goals and two-hour work reports")]
struct Args {
    /// REST API base URL
    #[arg(long, env = "TIMESHEET_API_URL", global = true)]
    api_url: Option<String>,

    /// Session file holding the bearer token
    #[arg(long, env = "TIMESHEET_SESSION_FILE", global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with phone number and password
    Login {
        #[arg(long)]
        phone: String,

        /// Prompted for when omitted
        #[arg(long, env = "TIMESHEET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        pincode: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        district: String,
    },

    /// Check that the stored session is still accepted
    Status,

    /// End the session
    Logout,

    /// Show what is stored locally
    Whoami,

    /// List timesheet entries
    List {
        /// First day (YYYY-MM-DD); requires --to
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD); requires --from
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },

    /// Add an entry for one day
    Add {
        /// Day of the entry (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Goal of the day
        #[arg(long)]
        goal: String,

        #[arg(long, default_value = "")]
        target: String,

        #[arg(long)]
        achieved: bool,

        /// Two-hour report as N=TEXT, N from 1 to 12 (repeatable)
        #[arg(long = "slot", value_parser = parse_slot)]
        slots: Vec<(usize, String)>,
    },
}

fn parse_slot(raw: &str) -> std::result::Result<(usize, String), String> {
    let (index, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected N=TEXT, got '{}'", raw))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("slot number must be 1-{}", SLOT_COUNT))?;
    if !(1..=SLOT_COUNT).contains(&index) {
        return Err(format!("slot number must be 1-{}", SLOT_COUNT));
    }
    Ok((index - 1, text.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from ~/.timesheet/.env or current dir)
    let env_path = dirs::home_dir()
        .map(|h| h.join(".timesheet").join(".env"))
        .filter(|p| p.exists());
    if let Some(path) = env_path {
        let _ = dotenvy::from_path(&path);
    } else {
        let _ = dotenvy::dotenv();
    }

    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // CLI args > env vars (handled by clap) > config file > defaults
    let config = ClientConfig::resolve(args.api_url, args.session_file, FileConfig::load());
    tracing::debug!(api_url = %config.api_url, session = %config.session_file.display(), "resolved config");

    let store = Arc::new(FileStore::new(&config.session_file));
    let client = AuthClient::new(&config, store, Arc::new(ConsoleNavigator))?;

    match args.command {
        Command::Login { phone, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let outcome = client
                .auth()
                .login(&phone, &password)
                .await
                .map_err(|e| match e {
                    ClientError::Unauthorized => anyhow!("Login failed"),
                    e => inline(e, "Login failed"),
                })?;
            match outcome.username {
                Some(name) => println!("Welcome, {}", name),
                None => println!("Welcome"),
            }
        }

        Command::Register {
            firstname,
            lastname,
            phone,
            email,
            address,
            pincode,
            state,
            district,
        } => {
            let password = prompt("Password: ")?;
            let confirm_password = prompt("Confirm password: ")?;
            let form = RegisterForm {
                firstname,
                lastname,
                phone,
                password,
                confirm_password,
                address_ln1: address,
                email,
                pincode,
                state,
                district,
            };
            client
                .auth()
                .register(form)
                .await
                .map_err(|e| inline(e, "Registration failed"))?;
            println!("Registration successful!");
        }

        Command::Status => {
            client
                .auth()
                .secure()
                .await
                .map_err(|e| inline(e, "Session check failed"))?;
            println!("Session active");
        }

        Command::Logout => {
            if !client.auth().logout().await? {
                println!("Server did not confirm logout; local session cleared anyway");
            }
        }

        Command::Whoami => {
            let session = client.session();
            match session.username()? {
                Some(name) => println!("User: {}", name),
                None => println!("User: (unknown)"),
            }
            println!(
                "Token: {}",
                if session.is_authenticated() { "stored" } else { "none" }
            );
            println!("API: {}", client.base_url());
        }

        Command::List { from, to } => {
            let range = match (from, to) {
                (Some(from), Some(to)) => Some(DateRange::new(from, to)?),
                _ => None,
            };
            let entries = client
                .timesheet()
                .list(range)
                .await
                .map_err(|e| inline(e, "Failed to load timesheet data."))?;

            if entries.is_empty() {
                println!("No entries in selected date range.");
            }
            for entry in entries {
                println!("{}  goal: {}", entry.date, entry.goal);
                if !entry.target.is_empty() {
                    println!("  target: {}{}", entry.target, if entry.achieved { " (achieved)" } else { "" });
                }
                for (i, (label, report)) in entry.labelled_reports().enumerate() {
                    if report.is_empty() {
                        continue;
                    }
                    let label = label.unwrap_or_else(|| format!("Entry {}", i + 1));
                    println!("  {}  {}", label, report);
                }
            }
        }

        Command::Add {
            date,
            goal,
            target,
            achieved,
            slots,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let mut entry = NewTimesheetEntry::new(date, goal)
                .with_target(target)
                .with_achieved(achieved);
            for (index, text) in slots {
                entry.set_slot(index, text)?;
            }
            client
                .timesheet()
                .create(&entry)
                .await
                .map_err(|e| inline(e, "Failed to save timesheet entry."))?;
            println!("Saved entry for {}", date);
            for i in 0..SLOT_COUNT {
                if let (Some(label), Some(text)) = (slot_label(i), entry.slot(i)) {
                    if !text.is_empty() {
                        println!("  {}  {}", label, text);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Turn a client error into the one-line message a form would show
fn inline(err: ClientError, fallback: &str) -> anyhow::Error {
    tracing::debug!("request error: {:?}", err);
    if err.is_unauthorized() {
        return anyhow!("Not signed in");
    }
    anyhow!(err.display_message(fallback))
}

fn prompt(label: &str) -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{}", label)?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
