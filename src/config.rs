use std::{env, fmt::Display};

use poise::serenity_prelude::GuildId;

const DEFAULT_PREFIX: &str = "!";

#[derive(Debug)]
pub(crate) enum Error {
    Missing(&'static str),
    Invalid { var: &'static str, value: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(var) => write!(f, "Expected {} in the environment", var),
            Error::Invalid { var, value } => write!(f, "{} must be a number, got `{}`", var, value),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub token: String,
    pub db_path: String,
    /// Register slash commands in this guild only; globally when unset.
    pub guild_id: Option<GuildId>,
    pub prefix: String,
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// Required: `DISCORD_TOKEN`, `DATABASE_PATH`.
    /// Optional: `GUILD_ID`, `PREFIX` (defaults to `!`).
    pub(crate) fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |var| lookup(var).ok_or(Error::Missing(var));

        let guild_id = match lookup("GUILD_ID").filter(|v| !v.trim().is_empty()) {
            Some(value) => {
                let id = value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|id| *id != 0)
                    .ok_or_else(|| Error::Invalid {
                        var: "GUILD_ID",
                        value: value.clone(),
                    })?;
                Some(GuildId::new(id))
            }
            None => None,
        };

        Ok(Self {
            token: required("DISCORD_TOKEN")?,
            db_path: required("DATABASE_PATH")?,
            guild_id,
            prefix: lookup("PREFIX")
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        })
    }
}
