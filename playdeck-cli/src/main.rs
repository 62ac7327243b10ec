use anyhow::{anyhow, Error};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use clap::Parser;
use clap_verbosity_flag::Level as VerbosityLevel;
use clap_verbosity_flag::Verbosity;
use playdeck_catalog::{DetailState, DetailView, RelatedOrder};
use playdeck_dto as dto;
use playdeck_dto::client::{Client, ClientConfig};
use playdeck_dto::params::PagingParams;
use playdeck_dto::types::{PlatformType, ResourceId};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn, Level};
use tracing_subscriber::fmt::Subscriber;
use url::Url;

mod store;

use store::TokenStore;

#[derive(Debug, Parser)]
#[command(name = "playdeck", version, about)]
struct Opts {
    #[command(subcommand)]
    pub command: Command,

    /// API server to connect to.
    // In debug mode this is set to localhost:8000, while in production this is set to
    // the URL the client library was built with.
    #[clap(long, env = "PLAYDECK_SERVER", hide_env_values = true)]
    #[cfg_attr(debug_assertions, clap(default_value = "http://localhost:8000/api/"))]
    #[cfg_attr(
        not(debug_assertions),
        clap(default_value = dto::client::DEFAULT_SERVER_URL)
    )]
    pub server: Url,

    /// A token to use for authentication. Defaults to the one saved by
    /// `auth login`.
    #[clap(long, env = "PLAYDECK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout, in seconds.
    #[clap(long, env = "PLAYDECK_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Output pretty formatted JSON (no colors).
    #[clap(
        long,
        global = true,
        env = "PLAYDECK_PRETTY",
        hide_env_values = true
    )]
    pub pretty: bool,

    #[command(flatten)]
    pub verbose: Verbosity,
}

#[derive(Debug, Parser)]
enum Command {
    /// Game catalog commands.
    Games(GameOpts),

    /// Console commands.
    Consoles(ConsoleOpts),

    /// Event commands.
    Events(EventOpts),

    /// Booking commands.
    Bookings(BookingOpts),

    /// Show the dashboard statistics.
    Dashboard,

    /// Account commands.
    Auth(AuthOpts),
}

#[derive(Debug, Parser)]
pub struct GameOpts {
    #[command(subcommand)]
    pub command: GameCommand,
}

#[derive(Debug, Parser)]
pub enum GameCommand {
    /// List games.
    List(GamesListOpts),

    /// Get a game by its identifier.
    Get(IdArg),

    /// Show a game from its slug, along with related games.
    Show(GameShowOpts),

    /// Add a game to the catalog.
    Create(GameCreateOpts),

    /// Update a game.
    Update(GameUpdateOpts),

    /// Remove a game from the catalog.
    Delete(IdArg),
}

#[derive(Debug, Parser)]
pub struct IdArg {
    /// The numerical or textual identifier.
    id: String,
}

impl IdArg {
    fn id(&self) -> ResourceId {
        ResourceId::parse(&self.id)
    }
}

#[derive(Debug, Parser)]
pub struct GamesListOpts {
    /// Only games for this platform (ps5, ps4, ps3).
    #[clap(long)]
    platform: Option<PlatformType>,

    /// Only games of this genre.
    #[clap(long)]
    genre: Option<String>,

    /// Search in titles.
    #[clap(long)]
    search: Option<String>,

    /// Only popular games.
    #[clap(long)]
    popular: bool,

    #[clap(flatten)]
    paging: PagingParams,
}

#[derive(Debug, Parser)]
pub struct GameShowOpts {
    /// The slug from the page path, e.g. `god-of-war`.
    slug: String,

    /// Pick related games by score only, without shuffling.
    #[clap(long)]
    stable: bool,
}

#[derive(Debug, Parser)]
pub struct GameCreateOpts {
    /// The title of the game.
    title: String,

    #[clap(long)]
    platform: PlatformType,

    #[clap(long, default_value = "")]
    description: String,

    /// Rating between 0 and 5.
    #[clap(long, default_value_t = 0.0)]
    rating: f64,

    #[clap(long)]
    genre_id: Option<String>,

    #[clap(long)]
    max_players: Option<u32>,

    #[clap(long)]
    popular: bool,

    /// Flag the game as new.
    #[clap(long = "new")]
    is_new: bool,

    /// Release date, as YYYY-MM-DD.
    #[clap(long)]
    release_date: Option<NaiveDate>,

    #[clap(long)]
    image_url: Option<String>,

    /// Estimated play time, free form.
    #[clap(long)]
    play_time: Option<String>,
}

#[derive(Debug, Parser)]
pub struct GameUpdateOpts {
    /// The game to update.
    id: String,

    #[clap(long)]
    title: Option<String>,

    #[clap(long)]
    platform: Option<PlatformType>,

    #[clap(long)]
    description: Option<String>,

    #[clap(long)]
    rating: Option<f64>,

    #[clap(long)]
    genre_id: Option<String>,

    #[clap(long)]
    max_players: Option<u32>,

    #[clap(long)]
    popular: Option<bool>,

    #[clap(long = "new")]
    is_new: Option<bool>,

    #[clap(long)]
    release_date: Option<NaiveDate>,

    #[clap(long)]
    image_url: Option<String>,

    #[clap(long)]
    play_time: Option<String>,
}

#[derive(Debug, Parser)]
pub struct ConsoleOpts {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

#[derive(Debug, Parser)]
pub enum ConsoleCommand {
    /// List consoles.
    List(ConsolesListOpts),

    /// Get a console by its identifier.
    Get(IdArg),

    /// Remove a console.
    Delete(IdArg),
}

#[derive(Debug, Parser)]
pub struct ConsolesListOpts {
    #[clap(long)]
    platform: Option<PlatformType>,

    /// Only consoles that can be booked (true) or cannot (false).
    #[clap(long)]
    available: Option<bool>,

    #[clap(flatten)]
    paging: PagingParams,
}

#[derive(Debug, Parser)]
pub struct EventOpts {
    #[command(subcommand)]
    pub command: EventCommand,
}

#[derive(Debug, Parser)]
pub enum EventCommand {
    /// List events.
    List(EventsListOpts),

    /// Get an event by its identifier.
    Get(IdArg),

    /// Remove an event.
    Delete(IdArg),
}

#[derive(Debug, Parser)]
pub struct EventsListOpts {
    /// Only events that have not started yet.
    #[clap(long)]
    upcoming: bool,

    #[clap(flatten)]
    paging: PagingParams,
}

#[derive(Debug, Parser)]
pub struct BookingOpts {
    #[command(subcommand)]
    pub command: BookingCommand,
}

#[derive(Debug, Parser)]
pub enum BookingCommand {
    /// List bookings.
    List(BookingsListOpts),

    /// Get a booking by its identifier.
    Get(IdArg),

    /// Book a console.
    Create(BookingCreateOpts),

    /// Cancel a booking.
    Cancel(IdArg),

    /// Check whether a time window is free.
    Check(BookingCheckOpts),
}

#[derive(Debug, Parser)]
pub struct BookingsListOpts {
    /// pending, confirmed, cancelled or completed.
    #[clap(long)]
    status: Option<dto::bookings::BookingStatus>,

    #[clap(long)]
    console: Option<String>,

    #[clap(flatten)]
    paging: PagingParams,
}

/// A time window given as a start and either an end or a duration.
#[derive(Debug, clap::Args)]
pub struct WindowArgs {
    /// Start of the session, RFC 3339 (e.g. 2024-05-01T18:00:00Z).
    #[clap(long)]
    from: DateTime<Utc>,

    /// End of the session, RFC 3339.
    #[clap(long, conflicts_with = "hours")]
    to: Option<DateTime<Utc>>,

    /// Length of the session in hours, instead of `--to`.
    #[clap(long)]
    hours: Option<u32>,
}

impl WindowArgs {
    fn window(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), Error> {
        let ends_at = match (self.to, self.hours) {
            (Some(to), _) => to,
            (None, Some(hours)) => self.from + ChronoDuration::hours(i64::from(hours)),
            (None, None) => return Err(anyhow!("either --to or --hours is required")),
        };
        if ends_at <= self.from {
            return Err(anyhow!("the session must end after it starts"));
        }
        Ok((self.from, ends_at))
    }
}

#[derive(Debug, Parser)]
pub struct BookingCreateOpts {
    /// The console to book.
    #[clap(long)]
    console: String,

    /// The game to play, if any.
    #[clap(long)]
    game: Option<String>,

    #[clap(long)]
    name: String,

    #[clap(long)]
    email: String,

    #[clap(long)]
    phone: Option<String>,

    #[clap(flatten)]
    window: WindowArgs,

    #[clap(long, default_value_t = 1)]
    players: u32,
}

#[derive(Debug, Parser)]
pub struct BookingCheckOpts {
    /// A specific console.
    #[clap(long)]
    console: Option<String>,

    /// Any console of this platform.
    #[clap(long)]
    platform: Option<PlatformType>,

    #[clap(flatten)]
    window: WindowArgs,
}

#[derive(Debug, Parser)]
pub struct AuthOpts {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Parser)]
pub enum AuthCommand {
    /// Create an account and save its token.
    Register(RegisterOpts),

    /// Log in and save the token.
    Login(LoginOpts),

    /// Log out and forget the saved token.
    Logout,

    /// Returns the authentication information.
    Whoami,
}

#[derive(Debug, Parser)]
pub struct RegisterOpts {
    #[clap(long)]
    name: String,

    #[clap(long)]
    email: String,

    /// Prompted for when missing.
    #[clap(long, env = "PLAYDECK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Debug, Parser)]
pub struct LoginOpts {
    #[clap(long)]
    email: String,

    /// Prompted for when missing.
    #[clap(long, env = "PLAYDECK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

/// What `games show` prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameShowOutput<'a> {
    game: &'a dto::games::Game,
    matched_by: &'static str,
    related: &'a [dto::games::Game],
}

fn output_json<J: Serialize>(value: J, opts: &Opts) -> Result<(), anyhow::Error> {
    println!(
        "{}",
        if opts.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        }
    );
    Ok(())
}

fn token_store() -> Result<TokenStore, Error> {
    Ok(TokenStore::default_location()?)
}

/// The explicit `--token`, else the saved one. A broken store is not fatal;
/// requests go out unauthenticated.
fn resolve_token(opts: &Opts) -> Option<String> {
    if let Some(token) = &opts.token {
        return Some(token.clone());
    }
    match token_store().and_then(|store| Ok(store.load()?)) {
        Ok(token) => token,
        Err(e) => {
            warn!(error = %e, "could not read saved credentials");
            None
        }
    }
}

fn client(opts: &Opts, token: Option<&str>) -> Result<Client, Error> {
    let config = ClientConfig {
        url_base: Some(opts.server.clone()),
        ..ClientConfig::new()
    }
    .with_optional_token(token)
    .with_timeout(Duration::from_secs(opts.timeout));

    Ok(Client::new(config)?)
}

fn password(given: &Option<String>) -> Result<String, Error> {
    match given {
        Some(password) => Ok(password.clone()),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

async fn game(opts: &Opts, client: &Client, game_opts: &GameOpts) -> Result<(), anyhow::Error> {
    match &game_opts.command {
        GameCommand::List(GamesListOpts {
            platform,
            genre,
            search,
            popular,
            paging,
        }) => {
            paging.validate().map_err(Error::msg)?;
            let query = dto::games::GameListQuery {
                platform: *platform,
                genre: genre.clone(),
                search: search.clone(),
                popular: popular.then_some(true),
                paging: *paging,
            };
            output_json(client.games_list(&query).await?, opts)
        }
        GameCommand::Get(id) => output_json(client.games_get(&id.id()).await?, opts),
        GameCommand::Show(GameShowOpts { slug, stable }) => {
            let order = if *stable {
                RelatedOrder::Stable
            } else {
                RelatedOrder::Shuffled
            };
            let mut view = DetailView::new(slug.as_str()).with_order(order);
            match view.load(client).await {
                DetailState::Found(detail) => output_json(
                    GameShowOutput {
                        game: &detail.game,
                        matched_by: detail.matched_by.as_str(),
                        related: &detail.related,
                    },
                    opts,
                ),
                DetailState::NotFound(reason) => {
                    Err(anyhow!("no game found for `{slug}` ({})", reason.kind()))
                }
                DetailState::Loading => Err(anyhow!("the game list was never received")),
            }
        }
        GameCommand::Create(GameCreateOpts {
            title,
            platform,
            description,
            rating,
            genre_id,
            max_players,
            popular,
            is_new,
            release_date,
            image_url,
            play_time,
        }) => {
            let response = client
                .games_create(&dto::games::GameCreateRequest {
                    title,
                    description,
                    rating: *rating,
                    platform: *platform,
                    genre_id: genre_id.as_deref().map(ResourceId::parse),
                    max_players: *max_players,
                    popular: *popular,
                    is_new: *is_new,
                    release_date: *release_date,
                    image_url: image_url.as_deref(),
                    play_time: play_time.as_deref(),
                })
                .await?;
            output_json(response, opts)
        }
        GameCommand::Update(GameUpdateOpts {
            id,
            title,
            platform,
            description,
            rating,
            genre_id,
            max_players,
            popular,
            is_new,
            release_date,
            image_url,
            play_time,
        }) => {
            let response = client
                .games_update(
                    &ResourceId::parse(id),
                    &dto::games::GameUpdateRequest {
                        title: title.as_deref(),
                        description: description.as_deref(),
                        rating: *rating,
                        platform: *platform,
                        genre_id: genre_id.as_deref().map(ResourceId::parse),
                        max_players: *max_players,
                        popular: *popular,
                        is_new: *is_new,
                        release_date: *release_date,
                        image_url: image_url.as_deref(),
                        play_time: play_time.as_deref(),
                    },
                )
                .await?;
            output_json(response, opts)
        }
        GameCommand::Delete(id) => output_json(client.games_delete(&id.id()).await?, opts),
    }
}

async fn console(
    opts: &Opts,
    client: &Client,
    console_opts: &ConsoleOpts,
) -> Result<(), anyhow::Error> {
    match &console_opts.command {
        ConsoleCommand::List(ConsolesListOpts {
            platform,
            available,
            paging,
        }) => {
            paging.validate().map_err(Error::msg)?;
            let query = dto::consoles::ConsoleListQuery {
                platform: *platform,
                available: *available,
                paging: *paging,
            };
            output_json(client.consoles_list(&query).await?, opts)
        }
        ConsoleCommand::Get(id) => output_json(client.consoles_get(&id.id()).await?, opts),
        ConsoleCommand::Delete(id) => output_json(client.consoles_delete(&id.id()).await?, opts),
    }
}

async fn event(opts: &Opts, client: &Client, event_opts: &EventOpts) -> Result<(), anyhow::Error> {
    match &event_opts.command {
        EventCommand::List(EventsListOpts { upcoming, paging }) => {
            paging.validate().map_err(Error::msg)?;
            let query = dto::events::EventListQuery {
                upcoming: upcoming.then_some(true),
                paging: *paging,
            };
            output_json(client.events_list(&query).await?, opts)
        }
        EventCommand::Get(id) => output_json(client.events_get(&id.id()).await?, opts),
        EventCommand::Delete(id) => output_json(client.events_delete(&id.id()).await?, opts),
    }
}

async fn booking(
    opts: &Opts,
    client: &Client,
    booking_opts: &BookingOpts,
) -> Result<(), anyhow::Error> {
    match &booking_opts.command {
        BookingCommand::List(BookingsListOpts {
            status,
            console,
            paging,
        }) => {
            paging.validate().map_err(Error::msg)?;
            let query = dto::bookings::BookingListQuery {
                status: *status,
                console_id: console.as_deref().map(ResourceId::parse),
                paging: *paging,
            };
            output_json(client.bookings_list(&query).await?, opts)
        }
        BookingCommand::Get(id) => output_json(client.bookings_get(&id.id()).await?, opts),
        BookingCommand::Create(BookingCreateOpts {
            console,
            game,
            name,
            email,
            phone,
            window,
            players,
        }) => {
            let (starts_at, ends_at) = window.window()?;
            let response = client
                .bookings_create(&dto::bookings::BookingCreateRequest {
                    console_id: ResourceId::parse(console),
                    game_id: game.as_deref().map(ResourceId::parse),
                    customer_name: name,
                    customer_email: email,
                    customer_phone: phone.as_deref(),
                    starts_at,
                    ends_at,
                    players: *players,
                })
                .await?;
            output_json(response, opts)
        }
        BookingCommand::Cancel(id) => {
            let response = client
                .bookings_update(
                    &id.id(),
                    &dto::bookings::BookingUpdateRequest {
                        status: Some(dto::bookings::BookingStatus::Cancelled),
                        ..Default::default()
                    },
                )
                .await?;
            output_json(response, opts)
        }
        BookingCommand::Check(BookingCheckOpts {
            console,
            platform,
            window,
        }) => {
            let (starts_at, ends_at) = window.window()?;
            let response = client
                .bookings_check_availability(&dto::bookings::AvailabilityQuery {
                    console_id: console.as_deref().map(ResourceId::parse),
                    platform: *platform,
                    starts_at,
                    ends_at,
                })
                .await?;
            output_json(response, opts)
        }
    }
}

async fn auth(opts: &Opts, auth_opts: &AuthOpts) -> Result<(), anyhow::Error> {
    match &auth_opts.command {
        AuthCommand::Register(RegisterOpts {
            name,
            email,
            password: given,
        }) => {
            let password = password(given)?;
            let response = client(opts, None)?
                .auth_register(&dto::auth::RegisterRequest {
                    name,
                    email,
                    password: &password,
                })
                .await?;
            token_store()?.save(&response.token, Some(email.as_str()))?;
            output_json(response.user, opts)
        }
        AuthCommand::Login(LoginOpts {
            email,
            password: given,
        }) => {
            let password = password(given)?;
            let response = client(opts, None)?
                .auth_login(&dto::auth::LoginRequest {
                    email,
                    password: &password,
                })
                .await?;
            let store = token_store()?;
            store.save(&response.token, Some(email.as_str()))?;
            debug!(path = %store.path().display(), "saved token");
            output_json(response.user, opts)
        }
        AuthCommand::Logout => {
            let token = resolve_token(opts);
            if token.is_some() {
                if let Err(e) = client(opts, token.as_deref())?.auth_logout().await {
                    warn!(error = %e, "server side logout failed");
                }
            }
            let cleared = token_store()?.clear()?;
            output_json(serde_json::json!({ "loggedOut": cleared }), opts)
        }
        AuthCommand::Whoami => {
            let token = resolve_token(opts);
            let response = client(opts, token.as_deref())?.auth_me().await?;
            output_json(response, opts)
        }
    }
}

async fn run(opts: &Opts) -> Result<(), anyhow::Error> {
    let authenticated = || client(opts, resolve_token(opts).as_deref());

    match &opts.command {
        Command::Games(game_opts) => game(opts, &authenticated()?, game_opts).await,
        Command::Consoles(console_opts) => console(opts, &authenticated()?, console_opts).await,
        Command::Events(event_opts) => event(opts, &authenticated()?, event_opts).await,
        Command::Bookings(booking_opts) => booking(opts, &authenticated()?, booking_opts).await,
        Command::Dashboard => output_json(authenticated()?.dashboard_stats().await?, opts),
        Command::Auth(auth_opts) => auth(opts, auth_opts).await,
    }
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();

    // Initialize tracing.
    let subscriber = Subscriber::builder();
    let subscriber = match opts.verbose.log_level() {
        Some(VerbosityLevel::Error) => subscriber.with_max_level(Level::ERROR),
        Some(VerbosityLevel::Warn) => subscriber.with_max_level(Level::WARN),
        Some(VerbosityLevel::Info) => subscriber.with_max_level(Level::INFO),
        Some(VerbosityLevel::Debug) => subscriber.with_max_level(Level::DEBUG),
        Some(VerbosityLevel::Trace) => subscriber.with_max_level(Level::TRACE),
        None => subscriber.with_max_level(Level::ERROR),
    };
    subscriber
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();
    debug!(?opts);

    if let Err(e) = run(&opts).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Opts::command().debug_assert();
    }

    #[test]
    fn window_from_hours() {
        let opts = Opts::try_parse_from([
            "playdeck",
            "bookings",
            "check",
            "--platform",
            "ps5",
            "--from",
            "2024-05-01T18:00:00Z",
            "--hours",
            "2",
        ])
        .unwrap();

        let Command::Bookings(BookingOpts {
            command: BookingCommand::Check(check),
        }) = opts.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(check.platform, Some(PlatformType::Ps5));
        let (from, to) = check.window.window().unwrap();
        assert_eq!(to - from, ChronoDuration::hours(2));
    }

    #[test]
    fn window_needs_an_end() {
        let window = WindowArgs {
            from: Utc::now(),
            to: None,
            hours: None,
        };
        assert!(window.window().is_err());

        let window = WindowArgs {
            from: Utc::now(),
            to: Some(Utc::now() - ChronoDuration::hours(1)),
            hours: None,
        };
        assert!(window.window().is_err());
    }

    #[test]
    fn games_show_parses() {
        let opts =
            Opts::try_parse_from(["playdeck", "--pretty", "games", "show", "god-of-war", "--stable"])
                .unwrap();
        assert!(opts.pretty);
        match opts.command {
            Command::Games(GameOpts {
                command: GameCommand::Show(GameShowOpts { slug, stable }),
            }) => {
                assert_eq!(slug, "god-of-war");
                assert!(stable);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
