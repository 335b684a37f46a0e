//! Everything a trainer can do with their pokémon, independent of Discord.
//!
//! Each operation takes the connection it works on and returns the reply to
//! send. Anything the trainer did wrong comes back as a [`Rejection`], whose
//! `Display` is the message to show them.


use std::fmt::Display;

use rusqlite::Connection;

use crate::{
    db,
    pokemon::{Page, Pokemon, Selector, Starter, UnsupportedKeyword, STARTERS},
};

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) enum Error {
    Rejected(Rejection),
    Db(db::Error),
}

impl From<Rejection> for Error {
    fn from(r: Rejection) -> Self {
        Error::Rejected(r)
    }
}

impl From<db::Error> for Error {
    fn from(e: db::Error) -> Self {
        Error::Db(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Db(e.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Rejected(r) => write!(f, "{}", r),
            Error::Db(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

/// Reasons a command refuses to do anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Rejection {
    NonPositiveId,
    NoSuchSlot,
    InvalidId,
    NothingToList,
    NothingOwned,
    NothingToSelect,
    UnsupportedKeyword(String),
    NoStarter { prefix: String },
    StarterTaken,
    UnknownStarter { prefix: String },
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NonPositiveId => write!(f, "The ID must be greater than 0!"),
            Rejection::NoSuchSlot => write!(f, "You don't have a pokemon at that slot."),
            Rejection::InvalidId => write!(f, "You've specified an invalid ID."),
            Rejection::NothingToList => {
                write!(f, "You don't have any pokémon, go get catching trainer!")
            }
            Rejection::NothingOwned => write!(f, "You don't have any pokémon, trainer!"),
            Rejection::NothingToSelect => write!(f, "You don't have any pokemon to select."),
            Rejection::UnsupportedKeyword(_) => write!(
                f,
                "Unidentified keyword, the only supported action is `latest` as of now."
            ),
            Rejection::NoStarter { prefix } => write!(
                f,
                "You haven't chosen a starter pokemon yet, check out `{}starter` for more information.",
                prefix
            ),
            Rejection::StarterTaken => write!(f, "You've already claimed your starter pokemon!"),
            Rejection::UnknownStarter { prefix } => write!(
                f,
                "That's not a valid starter pokemon, check `{}starter` for the list.",
                prefix
            ),
        }
    }
}

impl From<UnsupportedKeyword> for Rejection {
    fn from(k: UnsupportedKeyword) -> Self {
        Rejection::UnsupportedKeyword(k.0)
    }
}

/// A pokémon as it sits in its trainer's collection.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Owned {
    pub slot: usize,
    pub message_id: i64,
    pub pokemon: Pokemon,
}

/// Loads a trainer's pokémon, numbering them from slot 1 in storage order.
pub(crate) fn collection(conn: &Connection, user_id: i64) -> Result<Vec<Owned>> {
    db::select_pokemon(conn, user_id)?
        .into_iter()
        .enumerate()
        .map(|(i, row)| -> Result<Owned> {
            Ok(Owned {
                slot: i + 1,
                message_id: row.message_id,
                pokemon: Pokemon::from_json(&row.json)?,
            })
        })
        .collect()
}

// Slots are 1-based; anything outside 1..=len is `invalid`.
fn slot(owned: &[Owned], id: i64, invalid: Rejection) -> Result<&Owned> {
    usize::try_from(id)
        .ok()
        .and_then(|id| id.checked_sub(1))
        .and_then(|i| owned.get(i))
        .ok_or(Error::Rejected(invalid))
}

/// One page per pokémon the trainer owns.
pub(crate) fn list(conn: &Connection, user_id: i64) -> Result<Vec<Page>> {
    let owned = collection(conn, user_id)?;
    if owned.is_empty() {
        return Err(Rejection::NothingToList.into());
    }

    let total = owned.len();
    Ok(owned.iter().map(|o| o.pokemon.page(o.slot, total)).collect())
}

pub(crate) fn nick(conn: &Connection, user_id: i64, id: i64, nickname: &str) -> Result<String> {
    if id <= 0 {
        return Err(Rejection::NonPositiveId.into());
    }
    let owned = collection(conn, user_id)?;
    if owned.is_empty() {
        return Err(Rejection::NothingOwned.into());
    }
    let target = slot(&owned, id, Rejection::NoSuchSlot)?;

    let mut pokemon = target.pokemon.clone();
    pokemon.nickname = Some(nickname.to_string());
    db::update_pokemon(conn, user_id, target.message_id, &pokemon.to_json()?)?;

    log::debug!("User {} renamed slot {} to {}", user_id, target.slot, nickname);
    Ok(format!("Your {} has been named `{}`", pokemon.name, nickname))
}

/// A pokémon the trainer asked to free, awaiting their confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Release {
    pub slot: usize,
    pub message_id: i64,
    pub name: String,
}

impl Release {
    pub(crate) fn prompt(&self) -> String {
        format!(
            "You are about to free {}, if you wish to continue type `yes`, otherwise type `no`.",
            self.name
        )
    }
}

pub(crate) fn prepare_release(conn: &Connection, user_id: i64, id: i64) -> Result<Release> {
    if id <= 0 {
        return Err(Rejection::NonPositiveId.into());
    }
    let owned = collection(conn, user_id)?;
    if owned.is_empty() {
        return Err(Rejection::NothingOwned.into());
    }
    let target = slot(&owned, id, Rejection::NoSuchSlot)?;

    Ok(Release {
        slot: target.slot,
        message_id: target.message_id,
        name: target.pokemon.display_name().to_string(),
    })
}

/// What freeing a slot does to the trainer's selected pokémon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PointerChange {
    /// An earlier slot was freed, so the selected pokémon may now sit elsewhere.
    /// The stored pointer is left as is.
    Shifted,
    /// The selected pokémon itself was freed; the pointer goes back to 1.
    Reset,
    Untouched,
}

impl PointerChange {
    pub(crate) fn of(freed: usize, pointer: i64) -> Self {
        match (freed as i64).cmp(&pointer) {
            std::cmp::Ordering::Less => PointerChange::Shifted,
            std::cmp::Ordering::Equal => PointerChange::Reset,
            std::cmp::Ordering::Greater => PointerChange::Untouched,
        }
    }

    fn note(&self) -> &'static str {
        match self {
            PointerChange::Shifted => {
                "\nYour default pokemon may have changed. I have tried to account for this change."
            }
            PointerChange::Reset => {
                "\nYou have released your selected pokemon. I have reset your selected pokemon to your first pokemon."
            }
            PointerChange::Untouched => "",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Released {
    pub reply: String,
    pub change: PointerChange,
}

/// Frees a confirmed release and repairs the selected pointer.
pub(crate) fn release(conn: &Connection, user_id: i64, release: &Release) -> Result<Released> {
    let pointer = db::get_selected(conn, user_id)?;
    let change = PointerChange::of(release.slot, pointer);
    if change == PointerChange::Reset {
        db::set_selected(conn, user_id, 1)?;
    }
    db::delete_pokemon(conn, release.message_id)?;

    log::debug!(
        "User {} freed slot {} ({:?} pointer {})",
        user_id,
        release.slot,
        change,
        pointer
    );
    Ok(Released {
        reply: format!("Your {} has been freed.{}", release.name, change.note()),
        change,
    })
}

pub(crate) fn selected_reply(name: &str) -> String {
    format!("You have selected {} as your default pokémon.", name)
}

pub(crate) fn select(
    conn: &Connection,
    user_id: i64,
    selector: std::result::Result<Selector, UnsupportedKeyword>,
    prefix: &str,
) -> Result<String> {
    if !db::has_starter(conn, user_id)? {
        return Err(Rejection::NoStarter {
            prefix: prefix.to_string(),
        }
        .into());
    }
    let owned = collection(conn, user_id)?;
    if owned.is_empty() {
        return Err(Rejection::NothingToSelect.into());
    }

    let id = match selector.map_err(Rejection::from)? {
        Selector::Latest => owned.len() as i64,
        Selector::Slot(id) => id,
    };
    let target = slot(&owned, id, Rejection::InvalidId)?;

    db::set_selected(conn, user_id, target.slot as i64)?;
    Ok(selected_reply(target.pokemon.display_name()))
}

/// Selects the pokémon on a listing page, for the owner's select control.
pub(crate) fn select_slot(conn: &Connection, user_id: i64, slot_id: usize) -> Result<String> {
    let owned = collection(conn, user_id)?;
    let target = slot(&owned, slot_id as i64, Rejection::InvalidId)?;

    db::set_selected(conn, user_id, target.slot as i64)?;
    Ok(selected_reply(target.pokemon.display_name()))
}

/// The page for the trainer's selected pokémon.
pub(crate) fn selected_page(conn: &Connection, user_id: i64, pointer: i64) -> Result<Page> {
    let owned = collection(conn, user_id)?;
    if owned.is_empty() {
        return Err(Rejection::NothingToList.into());
    }
    let target = slot(&owned, pointer, Rejection::NoSuchSlot)?;
    Ok(target.pokemon.page(target.slot, owned.len()))
}

pub(crate) fn starters_overview(prefix: &str) -> String {
    let names = STARTERS
        .iter()
        .map(|s| s.name)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Welcome to the world of pokémon! Pick your first companion with `{}starter <name>`.\nAvailable starters: {}",
        prefix, names
    )
}

pub(crate) fn starter<R: rand::Rng + ?Sized>(
    conn: &Connection,
    user_id: i64,
    message_id: i64,
    name: &str,
    prefix: &str,
    rng: &mut R,
) -> Result<String> {
    if db::has_starter(conn, user_id)? {
        return Err(Rejection::StarterTaken.into());
    }
    let starter = Starter::find(name).ok_or_else(|| Rejection::UnknownStarter {
        prefix: prefix.to_string(),
    })?;

    let pokemon = starter.hatch(rng);
    db::insert_pokemon(conn, user_id, message_id, &pokemon.to_json()?)?;
    db::set_starter(conn, user_id)?;
    // The starter is the newest row, so it sits in the last slot.
    let slot = db::select_pokemon(conn, user_id)?.len();
    db::set_selected(conn, user_id, slot as i64)?;

    log::info!("User {} chose {} as their starter", user_id, starter.name);
    Ok(format!(
        "You've chosen {} as your starter pokémon!",
        pokemon.display_name()
    ))
}
