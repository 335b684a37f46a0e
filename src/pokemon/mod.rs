mod tests;

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const THUMBNAIL_URL: &str = "https://assets.pokemon.com/assets/cms2/img/pokedex/detail";

/// The six abilities every pokémon carries, in display order.
pub(crate) const ABILITIES: [&str; 6] = ["HP", "Attack", "Defence", "Sp. Atk", "Sp. Def", "Speed"];

/// Ability values, plus whatever else the record keeps next to them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Stats {
    #[serde(rename = "HP")]
    pub hp: i64,
    #[serde(rename = "Attack")]
    pub attack: i64,
    #[serde(rename = "Defence")]
    pub defence: i64,
    #[serde(rename = "Sp. Atk")]
    pub sp_atk: i64,
    #[serde(rename = "Sp. Def")]
    pub sp_def: i64,
    #[serde(rename = "Speed")]
    pub speed: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stats {
    pub(crate) fn values(&self) -> [i64; 6] {
        [
            self.hp,
            self.attack,
            self.defence,
            self.sp_atk,
            self.sp_def,
            self.speed,
        ]
    }
}

/// A pokémon record as it is persisted in the `users` table.
///
/// Fields this bot doesn't know about are kept in `extra` so that rewriting a
/// record (e.g. to set its nickname) never drops data written elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Pokemon {
    pub name: String,
    pub level: i64,
    pub xp: i64,
    pub stats: Stats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Pokemon {
    pub(crate) fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub(crate) fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// The name shown to trainers in titles and replies.
    pub(crate) fn display_name(&self) -> &str {
        &self.name
    }

    pub(crate) fn thumbnail(&self) -> Option<String> {
        self.id
            .filter(|id| *id > 0)
            .map(|id| format!("{}/{:03}.png", THUMBNAIL_URL, id))
    }

    /// Renders the page shown for this pokémon at `slot` out of `total`.
    pub(crate) fn page(&self, slot: usize, total: usize) -> Page {
        let alias = match &self.nickname {
            Some(nick) => format!("**Nickname**: {}\n", nick),
            None => String::new(),
        };
        let description = format!(
            "{}**Level**: {}\n**XP**: {}/{}\n```prolog\n{}\n```",
            alias,
            self.level,
            self.xp,
            calc_xp(self.level),
            StatTable(&self.stats)
        );

        Page {
            title: self.display_name().to_string(),
            description,
            footer: format!("Pokémon ID: {}/{}", slot, total),
            thumbnail: self.thumbnail(),
        }
    }
}

/// Experience needed to finish `level`.
pub(crate) fn calc_xp(level: i64) -> i64 {
    25 * level
}

/// A single embed page of a pokémon listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Page {
    pub title: String,
    pub description: String,
    pub footer: String,
    pub thumbnail: Option<String>,
}

/// Two column ability table. Columns are at least two wider than their
/// header, names are left aligned and values right aligned.
pub(crate) struct StatTable<'a>(pub &'a Stats);

impl<'a> Display for StatTable<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const HEADERS: (&str, &str) = ("Ability", "Value");

        let values = self.0.values().map(|v| v.to_string());
        let name_width = ABILITIES
            .iter()
            .map(|a| a.chars().count())
            .chain([HEADERS.0.len() + 2])
            .max()
            .unwrap_or_default();
        let value_width = values
            .iter()
            .map(String::len)
            .chain([HEADERS.1.len() + 2])
            .max()
            .unwrap_or_default();

        writeln!(f, "{:<name_width$}  {:>value_width$}", HEADERS.0, HEADERS.1)?;
        write!(f, "{}  {}", "-".repeat(name_width), "-".repeat(value_width))?;
        for (ability, value) in ABILITIES.iter().zip(values.iter()) {
            write!(f, "\n{:<name_width$}  {:>value_width$}", ability, value)?;
        }
        Ok(())
    }
}

/// Which pokémon a `select` refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Selector {
    Slot(i64),
    Latest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UnsupportedKeyword(pub String);

impl FromStr for Selector {
    type Err = UnsupportedKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "latest" {
            return Ok(Selector::Latest);
        }
        s.parse()
            .map(Selector::Slot)
            .map_err(|_| UnsupportedKeyword(s.to_string()))
    }
}

/// A pokémon that can be chosen as a starter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Starter {
    pub name: &'static str,
    pub id: i64,
    pub base: [i64; 6],
}

pub(crate) const STARTERS: [Starter; 9] = [
    Starter {
        name: "Bulbasaur",
        id: 1,
        base: [45, 49, 49, 65, 65, 45],
    },
    Starter {
        name: "Charmander",
        id: 4,
        base: [39, 52, 43, 60, 50, 65],
    },
    Starter {
        name: "Squirtle",
        id: 7,
        base: [44, 48, 65, 50, 64, 43],
    },
    Starter {
        name: "Chikorita",
        id: 152,
        base: [45, 49, 65, 49, 65, 45],
    },
    Starter {
        name: "Cyndaquil",
        id: 155,
        base: [39, 52, 43, 60, 50, 65],
    },
    Starter {
        name: "Totodile",
        id: 158,
        base: [50, 65, 64, 44, 48, 43],
    },
    Starter {
        name: "Treecko",
        id: 252,
        base: [40, 45, 35, 65, 55, 70],
    },
    Starter {
        name: "Torchic",
        id: 255,
        base: [45, 60, 40, 70, 50, 45],
    },
    Starter {
        name: "Mudkip",
        id: 258,
        base: [50, 70, 50, 50, 50, 40],
    },
];

/// Highest individual value added on top of a base stat.
pub(crate) const MAX_IV: i64 = 31;

impl Starter {
    pub(crate) fn find(name: &str) -> Option<&'static Starter> {
        let name = name.trim();
        STARTERS.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Creates a fresh level 1 pokémon of this species.
    pub(crate) fn hatch<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Pokemon {
        let [hp, attack, defence, sp_atk, sp_def, speed] =
            self.base.map(|base| base + rng.gen_range(0..=MAX_IV));

        Pokemon {
            name: self.name.to_string(),
            level: 1,
            xp: 0,
            stats: Stats {
                hp,
                attack,
                defence,
                sp_atk,
                sp_def,
                speed,
                extra: Map::new(),
            },
            nickname: None,
            id: Some(self.id),
            extra: Map::new(),
        }
    }
}
