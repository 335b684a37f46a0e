mod cache;
mod command;
mod config;
mod confirm;
mod db;
mod discord;
mod exit_on_err;
mod in_flight;
mod pokemon;
mod trainer;

use std::sync::Mutex;

use dotenvy::dotenv;
use poise::{serenity_prelude as serenity, FrameworkError};
use r2d2_sqlite::SqliteConnectionManager;
use rand::SeedableRng;
use rand_hc::Hc128Rng;

use crate::{cache::SelectionCache, config::Config, exit_on_err::MapOrExit, in_flight::InFlight};

// User data, which is stored and accessible in all command invocations
pub(crate) struct Data {
    pool: r2d2::Pool<SqliteConnectionManager>,
    cache: SelectionCache,
    in_flight: InFlight,
    rng: Mutex<Hc128Rng>,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;
type Result<T> = core::result::Result<T, Error>;

async fn handle_error(error: FrameworkError<'_, Data, Error>) {
    log::error!("Error: {}", error);
    if let Some(ctx) = error.ctx() {
        if let Err(e) = ctx.say(format!("Error: {}", error)).await {
            log::error!("Error sending error message: {}", e);
        }
    }
}

#[tokio::main]
async fn main() {
    // Load values from .env, if available.
    dotenv().ok();
    pretty_env_logger::init();

    let config = Config::from_env().map_or_exit("Invalid configuration");

    let mgr = SqliteConnectionManager::file(&config.db_path);
    let pool = r2d2::Pool::new(mgr).map_or_exit("Failed to create connection pool");
    let cache = SelectionCache::default();
    {
        let conn = pool.get().map_or_exit("Failed to get connection from pool");
        db::setup(&conn).map_or_exit("Failed to setup database");
        cache.refresh(&conn).map_or_exit("Failed to load selected pokémon");
    }
    log::info!("Database ready at {}", config.db_path);

    let guild_id = config.guild_id;
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                command::list(),
                command::nick(),
                command::free(),
                command::select(),
                command::starter(),
                command::info(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(handle_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                log::info!("Connected to Discord as {}!", ready.user.name);
                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            guild_id,
                        )
                        .await?;
                        log::info!("Registered commands in guild {}", guild_id);
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        log::info!("Registered commands globally");
                    }
                }

                Ok(Data {
                    pool,
                    cache,
                    in_flight: InFlight::default(),
                    rng: Mutex::new(Hc128Rng::from_entropy()),
                })
            })
        })
        .build();

    // Prefix commands and yes/no answers are read from message content.
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    log::info!("Connecting to Discord...");
    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .map_or_exit("Failed to create client");
    client.start().await.map_or_exit("Discord client stopped");
}
