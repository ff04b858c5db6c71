mod render;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use client::services::auth::{self, AuthError, GoogleConfig, SessionStore};
use client::services::weather::{City, WeatherService};
use client::state::chat::ChatComposer;
use client::state::notifications::NotificationQueue;
use client::{ConfigError, ObserverCallbacks, ObserverClient, ObserverConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("google login is not configured; set GOOGLE_CLIENT_ID and GOOGLE_REDIRECT_URI")]
    LoginDisabled,
    #[error("not logged in; run `observer login` first")]
    NotLoggedIn,
    #[error("no callback url entered")]
    MissingCallback,
    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "observer", about = "Observer client for the weather robots chat")]
struct Cli {
    /// Observer websocket endpoint (overrides OBSERVER_URL).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Delay before reconnecting after a close (overrides OBSERVER_RECONNECT_DELAY_MS).
    #[arg(long, global = true)]
    reconnect_delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect as observer and follow the robot stream.
    Observe,
    /// Sign in with Google.
    Login {
        /// Redirect URL from the browser; prompted for when omitted.
        #[arg(long)]
        callback: Option<String>,
    },
    Logout,
    Whoami,
    /// Current temperature for one or both robot cities.
    Weather { city: Option<City> },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    load_dotenv();
    init_tracing();

    let cli = Cli::parse();
    let mut config = ObserverConfig::from_env()?;
    if let Some(url) = &cli.url {
        config = config.with_url(url)?;
    }
    if let Some(ms) = cli.reconnect_delay_ms {
        config = config.with_reconnect_delay(Duration::from_millis(ms));
    }
    let store = SessionStore::new(config.session_file.clone());

    match cli.command {
        Command::Observe => run_observe(&config, &store).await,
        Command::Login { callback } => run_login(&store, callback).await,
        Command::Logout => {
            if store.clear()? {
                println!("logged out");
            } else {
                println!("not logged in");
            }
            Ok(())
        }
        Command::Whoami => {
            match store.load()? {
                Some(user) => println!("{}", render::user_line(&user)),
                None => println!("not logged in"),
            }
            Ok(())
        }
        Command::Weather { city } => {
            run_weather(city).await;
            Ok(())
        }
    }
}

fn load_dotenv() {
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            eprintln!("ignoring .env: {error}");
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

// =============================================================================
// OBSERVE
// =============================================================================

async fn run_observe(config: &ObserverConfig, store: &SessionStore) -> Result<(), CliError> {
    let user = store.load()?.ok_or(CliError::NotLoggedIn)?;
    println!("👋 {} | {}", render::user_line(&user), render::HELP);

    let toasts = Arc::new(Mutex::new(NotificationQueue::new(config.notification_ttl)));
    let callbacks = ObserverCallbacks::new().on_notification({
        let toasts = Arc::clone(&toasts);
        move |text, severity| {
            toasts.lock().unwrap_or_else(PoisonError::into_inner).push(text, severity, Instant::now());
            eprintln!("{}", render::toast_line(text, severity));
        }
    });

    let client = ObserverClient::start(config, callbacks);
    tracing::info!(url = %config.url, user = %user.id, "observer session started");

    let mut updates = client.updates();
    let mut printed = 0;
    let mut composer = ChatComposer::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut expiry = tokio::time::interval(Duration::from_millis(500));

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                printed = print_since(&client.transcript_since(printed), printed);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "/quit" | "/exit" => break,
                    "/help" => println!("{}", render::HELP),
                    "/reconnect" => client.reconnect(),
                    "/status" => {
                        let toasts = toasts.lock().unwrap_or_else(PoisonError::into_inner);
                        println!("{}", render::status_block(client.connections(), toasts.active()));
                    }
                    _ => {
                        composer.set_input(line.as_str());
                        composer.submit(Some(&client));
                    }
                }
            }
            _ = expiry.tick() => {
                toasts.lock().unwrap_or_else(PoisonError::into_inner).expire(Instant::now());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let transcript = client.shutdown().await;
    print_since(transcript.get(printed..).unwrap_or_default(), printed);
    Ok(())
}

/// Print freshly appended entries; returns the new printed count.
fn print_since(entries: &[client::Message], printed: usize) -> usize {
    for entry in entries {
        println!("{}", render::message_line(entry));
    }
    printed + entries.len()
}

// =============================================================================
// LOGIN / WEATHER
// =============================================================================

async fn run_login(store: &SessionStore, callback: Option<String>) -> Result<(), CliError> {
    let callback = match callback {
        Some(callback) => callback,
        None => {
            let google = GoogleConfig::from_env().ok_or(CliError::LoginDisabled)?;
            println!("Open this URL in a browser and sign in with Google:\n\n  {}\n", google.authorize_url()?);
            println!("Then paste the full URL the browser was redirected to:");
            BufReader::new(tokio::io::stdin())
                .lines()
                .next_line()
                .await?
                .ok_or(CliError::MissingCallback)?
        }
    };

    let token = auth::parse_callback(&callback)?;
    let user = auth::fetch_google_user(&token).await?;
    store.save(&user)?;
    println!("logged in as {}", render::user_line(&user));
    Ok(())
}

async fn run_weather(city: Option<City>) {
    let service = WeatherService::new();
    let cities = city.map_or_else(|| City::ALL.to_vec(), |city| vec![city]);
    for city in cities {
        let weather = service.city_weather(city).await;
        println!("{}", render::weather_line(&weather));
    }
}
