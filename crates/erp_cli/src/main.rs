//! Command-line driver for `erp_core`.
//!
//! # Responsibility
//! - Verify core linkage (`ping`) and drive every core store by hand.
//! - Map command-line flags onto `CoreConfig`.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use erp_core::db::open_db;
use erp_core::service::export_service::{default_file_name, render};
use erp_core::{
    init_logging, CoreConfig, DataProvider, DemoFixture, ExportFormat, FixtureError, LogLevel,
    NotificationStore, SessionStore, SignupProfile, SqliteStateRepository,
};
use log::info;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "erp_cli", version, about = "ERP dashboard core driver")]
struct Cli {
    /// SQLite file holding persisted session state.
    #[arg(long, default_value = erp_core::config::DEFAULT_DB_FILE_NAME)]
    db: PathBuf,
    /// Absolute directory for rolling log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[arg(long, value_parser = LogLevel::parse, default_value_t = erp_core::default_log_level())]
    log_level: LogLevel,
    /// Artificial delay applied to login/signup/onboarding.
    #[arg(long, default_value_t = 1000)]
    latency_ms: u64,
    /// Fixture JSON replacing the bundled demo data.
    #[arg(long)]
    fixture: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints core ping and version.
    Ping,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Sign in through the employee portal.
        #[arg(long)]
        as_employee: bool,
    },
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        company: Option<String>,
    },
    /// Stores onboarding company data given as a JSON object.
    Onboard {
        #[arg(long)]
        data: String,
    },
    Logout,
    Whoami,
    /// Lists notifications newest first.
    Notifications {
        #[arg(long)]
        unread: bool,
    },
    /// Marks one notification read and persists the read-state.
    Read { id: String },
    Export {
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
        /// Output file; defaults to a dated name in the working directory.
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "ERP Report")]
        title: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Html,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Html => ExportFormat::Html,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = CoreConfig {
        db_path: cli.db,
        log_level: cli.log_level,
        log_dir: cli.log_dir,
        simulated_latency: Duration::from_millis(cli.latency_ms),
    };
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }
    info!("event=cli_start module=cli status=ok");

    if let Command::Ping = cli.command {
        println!("erp_core ping={}", erp_core::ping());
        println!("erp_core version={}", erp_core::core_version());
        return Ok(());
    }

    let conn = open_db(&config.db_path)?;
    let repo = SqliteStateRepository::new(&conn);

    match cli.command {
        Command::Ping => {}
        Command::Login {
            email,
            password,
            as_employee,
        } => {
            let mut sessions = SessionStore::open(&repo, config.session_config())?;
            if sessions.login(&email, &password, as_employee)? {
                print_session(&sessions);
            } else {
                return Err("invalid email or password".into());
            }
        }
        Command::Signup {
            name,
            email,
            password,
            company,
        } => {
            let mut sessions = SessionStore::open(&repo, config.session_config())?;
            let profile = SignupProfile {
                name,
                email,
                password,
                company_name: company,
            };
            if !sessions.signup(&profile)? {
                return Err("name, email and password are required".into());
            }
            print_session(&sessions);
        }
        Command::Onboard { data } => {
            let mut sessions = SessionStore::open(&repo, config.session_config())?;
            let company_data: serde_json::Value = serde_json::from_str(&data)?;
            sessions.complete_onboarding(&company_data)?;
            println!("onboarding completed");
        }
        Command::Logout => {
            let mut sessions = SessionStore::open(&repo, config.session_config())?;
            sessions.logout()?;
            println!("logged out");
        }
        Command::Whoami => {
            let sessions = SessionStore::open(&repo, config.session_config())?;
            print_session(&sessions);
            println!(
                "signup_completed={} onboarding_completed={}",
                sessions.has_completed_signup()?,
                sessions.has_completed_onboarding()?
            );
        }
        Command::Notifications { unread } => {
            let provider = load_provider(cli.fixture.as_deref())?;
            let mut notifications = NotificationStore::new(&provider)?;
            notifications.restore_read_state(&repo)?;
            println!("unread={}", notifications.unread_count());
            for notification in notifications.recent_first() {
                if unread && notification.read {
                    continue;
                }
                println!(
                    "{} [{}] {:?} {} - {}",
                    notification.id,
                    if notification.read { "read" } else { "new" },
                    notification.kind,
                    format_epoch_ms(notification.created_at),
                    notification.title
                );
            }
        }
        Command::Read { id } => {
            let provider = load_provider(cli.fixture.as_deref())?;
            let mut notifications = NotificationStore::new(&provider)?;
            notifications.restore_read_state(&repo)?;
            if notifications.get(&id).is_none() {
                return Err(format!("unknown notification `{id}`").into());
            }
            notifications.mark_as_read(&id);
            notifications.save_read_state(&repo)?;
            println!("unread={}", notifications.unread_count());
        }
        Command::Export { format, out, title } => {
            let provider = load_provider(cli.fixture.as_deref())?;
            let format = ExportFormat::from(format);
            let generated_at = Utc::now().timestamp_millis();
            let report = provider.report_data(title.as_str(), generated_at);
            match out {
                Some(path) => {
                    erp_core::write_report(&path, format, &report)?;
                    println!("wrote {}", path.display());
                }
                None if format == ExportFormat::Csv => print!("{}", render(&report, format)?),
                None => {
                    let path = PathBuf::from(default_file_name(&title, format, generated_at));
                    erp_core::write_report(&path, format, &report)?;
                    println!("wrote {}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// Only data-backed commands pay for fixture parsing.
fn load_provider(fixture: Option<&Path>) -> Result<DataProvider, FixtureError> {
    match fixture {
        Some(path) => Ok(DataProvider::new(DemoFixture::from_path(path)?)),
        None => DataProvider::bundled(),
    }
}

fn print_session<R: erp_core::StateRepository>(sessions: &SessionStore<R>) {
    match sessions.current() {
        Some(session) => println!(
            "authenticated id={} name={} role={} company={} employee={}",
            session.id,
            session.name,
            session.role.as_str(),
            session.company_id,
            session.is_employee()
        ),
        None => println!("not authenticated"),
    }
}

fn format_epoch_ms(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}
