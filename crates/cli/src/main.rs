//! Meal Planner CLI - Command-line front end over the client library.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and log in
//! mealplan register -u ana -n "Ana Diaz" -e ana@example.com
//! mealplan login -e ana@example.com
//!
//! # Browse the catalog
//! mealplan menu
//! mealplan search teriyaki
//! mealplan show 52772
//!
//! # Order two of one meal and one of another
//! mealplan order 52772:2 52795
//!
//! # Premium
//! mealplan plans
//! mealplan purchase monthly
//! mealplan plan --preference Vegetariano
//! ```
//!
//! # Environment Variables
//!
//! - `MEALPLAN_PASSWORD` - Password for `login` and `register` when `--password` is omitted
//! - `MEALPLAN_API_URL`, `MEALDB_API_URL`, `MEALPLAN_STORAGE_PATH` - see the client configuration
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - Sentry error tracking
//! - `RUST_LOG` - Log filter (default: `meal_planner_cli=info,meal_planner_client=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use meal_planner_client::{AppError, AppState, ClientConfig};
use meal_planner_core::UserRole;
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::OrderItem;

#[derive(Parser)]
#[command(name = "mealplan")]
#[command(about = "Meal planner: recipes, cart, premium plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (does not log in)
    Register {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Full name
        #[arg(short = 'n', long)]
        full_name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, env = "MEALPLAN_PASSWORD", hide_env_values = true)]
        password: String,

        /// Account role (user, admin)
        #[arg(short, long, default_value = "user")]
        role: UserRole,
    },

    /// Log in and store the session token
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, env = "MEALPLAN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Delete the stored session token
    Logout,

    /// Show who is logged in
    Whoami,

    /// Show the subscription status
    Status,

    /// List subscription plans
    Plans,

    /// Buy a subscription plan
    Purchase {
        /// Plan ID as listed by `plans`
        plan: String,
    },

    /// Search recipes by name
    Search {
        /// Text to search for
        text: String,
    },

    /// List recipes in a category
    Category {
        /// Category name (e.g. Seafood)
        name: String,
    },

    /// Show one recipe
    Show {
        /// Recipe ID
        id: String,
    },

    /// Show the menu sections
    Menu,

    /// Generate a weekly plan (premium)
    Plan {
        /// Dietary preference (e.g. Vegetariano, Vegano)
        #[arg(short, long, default_value = "Sin restricciones")]
        preference: String,

        /// Calories per day
        #[arg(short, long, default_value_t = 2000)]
        calories: u32,

        /// Meals per day
        #[arg(short, long, default_value_t = 3)]
        meals: u32,
    },

    /// Add recipes to the cart and check out
    Order {
        /// Items as `<id>` or `<id>:<quantity>`
        #[arg(required = true, value_parser = commands::parse_order_item)]
        items: Vec<OrderItem>,
    },

    /// Show or update the profile
    Profile {
        /// New username
        #[arg(long)]
        username: Option<String>,

        /// New full name
        #[arg(long)]
        full_name: Option<String>,

        /// New email address
        #[arg(long)]
        email: Option<String>,
    },

    /// Show or update the settings
    Settings {
        /// Theme (light, dark, system)
        #[arg(long)]
        theme: Option<meal_planner_core::SettingsTheme>,

        /// Language code
        #[arg(long)]
        language: Option<String>,

        /// Enable or disable notifications
        #[arg(long)]
        notifications: Option<bool>,
    },

    /// Show or change the local theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommands>,
    },

    /// Check whether a page may be opened
    Open {
        /// Page path (e.g. /premium/features)
        route: String,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum ThemeCommands {
    /// Switch between light and dark
    Toggle,
    /// Use the light theme
    Light,
    /// Use the dark theme
    Dark,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be initialized before the tracing subscriber
    let config = ClientConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "meal_planner_cli=info,meal_planner_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        e.report();
        // exit() skips destructors; flush Sentry first
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), AppError> {
    let state = AppState::new(config)?;
    state.start().await;

    match cli.command {
        Commands::Register {
            username,
            full_name,
            email,
            password,
            role,
        } => {
            let password = SecretString::from(password);
            commands::session::register(&state, &username, &full_name, &email, &password, role)
                .await
        }
        Commands::Login { email, password } => {
            commands::session::login(&state, &email, &SecretString::from(password)).await
        }
        Commands::Logout => commands::session::logout(&state),
        Commands::Whoami => commands::session::whoami(&state).await,
        Commands::Status => commands::premium::status(&state).await,
        Commands::Plans => commands::premium::plans(&state).await,
        Commands::Purchase { plan } => commands::premium::purchase(&state, &plan).await,
        Commands::Search { text } => commands::catalog::search(&state, &text).await,
        Commands::Category { name } => commands::catalog::category(&state, &name).await,
        Commands::Show { id } => commands::catalog::show(&state, id).await,
        Commands::Menu => commands::catalog::menu(&state).await,
        Commands::Plan {
            preference,
            calories,
            meals,
        } => commands::catalog::plan(&state, &preference, calories, meals).await,
        Commands::Order { items } => commands::cart::order(&state, &items).await,
        Commands::Profile {
            username,
            full_name,
            email,
        } => commands::account::profile(&state, username, full_name, email).await,
        Commands::Settings {
            theme,
            language,
            notifications,
        } => commands::account::settings(&state, theme, language, notifications).await,
        Commands::Theme { action } => commands::account::theme(&state, action.map(Into::into)),
        Commands::Open { route } => commands::session::open(&state, &route).await,
    }
}

impl From<ThemeCommands> for commands::account::ThemeChange {
    fn from(action: ThemeCommands) -> Self {
        match action {
            ThemeCommands::Toggle => Self::Toggle,
            ThemeCommands::Light => Self::Set(meal_planner_core::ThemePreference::Light),
            ThemeCommands::Dark => Self::Set(meal_planner_core::ThemePreference::Dark),
        }
    }
}
