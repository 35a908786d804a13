use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use buddy_core::{
    filter_events, ApiClient, ClientConfig, ClientError, Difficulty, DifficultyFilter, EventRequest,
    FilterCriteria, ListableEvent, LoginRequest, RegisterRequest, ReqwestTransport, Session,
    SessionStore,
};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

mod logging;

#[derive(Parser)]
#[command(name = "buddy", version, about = "Find workout sessions and training buddies")]
struct Cli {
    /// Backend origin; defaults to $BUDDY_API_BASE_URL or http://localhost:8080.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Where the signed-in session is kept between runs.
    #[arg(long, global = true, env = "BUDDY_SESSION_PATH", default_value = ".buddy-session.json")]
    session: PathBuf,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the signed-in user.
    Whoami,
    Events {
        #[command(subcommand)]
        command: EventsCommand,
    },
}

#[derive(Subcommand)]
enum EventsCommand {
    /// List events, optionally filtered.
    List(ListArgs),
    /// Create an event (requires login).
    Create(CreateArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Free text matched against title, description, location and sport.
    #[arg(long, default_value = "")]
    query: String,
    /// any, beginner, intermediate or advanced.
    #[arg(long, default_value = "any")]
    difficulty: DifficultyFilter,
    #[arg(long, value_parser = parse_price)]
    max_price: Option<f64>,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    sport: String,
    /// Exact date, YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,
}

impl From<ListArgs> for FilterCriteria {
    fn from(args: ListArgs) -> Self {
        Self {
            query: args.query,
            difficulty: args.difficulty,
            max_price: args.max_price,
            location: args.location,
            sport: args.sport,
            date: args.date,
        }
    }
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    difficulty: Difficulty,
    #[arg(long)]
    sport: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, value_parser = parse_price)]
    price: f64,
    /// Defaults to the regular price.
    #[arg(long, value_parser = parse_price)]
    members_price: Option<f64>,
    /// ISO start time, e.g. 2025-12-12T18:00:00.
    #[arg(long)]
    start: String,
    #[arg(long)]
    end: String,
    #[arg(long)]
    place: String,
}

impl From<CreateArgs> for EventRequest {
    fn from(args: CreateArgs) -> Self {
        Self {
            event_name: args.name,
            event_difficulty: args.difficulty.to_string(),
            exercise_type: args.sport,
            description: args.description,
            price: args.price,
            members_price: args.members_price.unwrap_or(args.price),
            start_time: args.start,
            end_time: args.end,
            place: args.place,
        }
    }
}

/// Prices are finite and non-negative.
fn parse_price(raw: &str) -> Result<f64, String> {
    let price: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if !price.is_finite() || price < 0.0 {
        return Err(format!("{raw} is not a valid price"));
    }
    Ok(price)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = cli.base_url.map(ClientConfig::new).unwrap_or_else(ClientConfig::from_env);
    debug!(base_url = %config.base_url, "using backend");
    let client = ApiClient::from_config(&config);

    let store = SessionStore::new(cli.session);
    let mut session = store
        .load()
        .with_context(|| format!("loading session from {}", store.path().display()))?;

    match cli.command {
        Command::Register {
            email,
            username,
            name,
            password,
        } => {
            let req = RegisterRequest {
                email,
                username,
                name,
                password,
            };
            let auth = client
                .register(&req)
                .await
                .map_err(|e| describe(e, "Registration failed"))?;
            session = Session::from_auth(&auth);
            store.save(&session)?;
            println!("Registered and signed in as {}", auth.user_response.username);
        }
        Command::Login { username, password } => {
            let auth = client
                .login(&LoginRequest { username, password })
                .await
                .map_err(|e| describe(e, "Login failed"))?;
            session = Session::from_auth(&auth);
            store.save(&session)?;
            println!("Signed in as {}", auth.user_response.username);
        }
        Command::Logout => {
            session.logout();
            store.clear()?;
            println!("Signed out");
        }
        Command::Whoami => match &session.user {
            Some(user) if session.is_authenticated() => {
                println!("{} ({}) <{}>", user.name, user.username, user.email)
            }
            _ => println!("Not signed in"),
        },
        Command::Events { command } => match command {
            EventsCommand::List(args) => list_events(&client, args.into()).await?,
            EventsCommand::Create(args) => {
                let created = client
                    .create_event(&args.into(), session.token())
                    .await
                    .map_err(|e| describe(e, "Could not create event"))?;
                println!("Created event {} ({})", created.event_name, created.event_id);
            }
        },
    }

    Ok(())
}

async fn list_events(client: &ApiClient<ReqwestTransport>, criteria: FilterCriteria) -> Result<()> {
    let page = client
        .list_events()
        .await
        .map_err(|e| describe(e, "Could not load events"))?;

    let events: Vec<ListableEvent> = page
        .data
        .iter()
        .filter_map(|e| match ListableEvent::try_from(e) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(event_id = %e.event_id, error = %err, "skipping event");
                None
            }
        })
        .collect();

    let shown = filter_events(&events, &criteria);
    if shown.is_empty() {
        println!("No events match your filters");
        return Ok(());
    }
    for event in shown {
        println!(
            "{}  {:<28} {:<12} {:<13} {:>7.0} kr  {}",
            event.date,
            event.title,
            event.sport,
            event.difficulty.as_str(),
            event.price,
            event.location
        );
    }
    Ok(())
}

/// Turn a client error into the message a user should see.
fn describe(err: ClientError, fallback: &str) -> anyhow::Error {
    match err {
        ClientError::Api(api) => anyhow!("{} (HTTP {})", api.user_message(fallback), api.status),
        err @ ClientError::Transport(_) => {
            anyhow::Error::new(err).context(format!("{fallback}: backend unreachable"))
        }
        err => anyhow::Error::new(err).context(fallback.to_string()),
    }
}
