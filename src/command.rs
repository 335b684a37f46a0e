use poise::{command, serenity_prelude as serenity, CreateReply};

use crate::{
    confirm::{Confirmation, CONFIRMATION_WINDOW, DECLINED_REPLY, TIMED_OUT_REPLY},
    discord,
    in_flight::{InFlightGuard, BUSY_MESSAGE},
    pokemon::Selector,
    trainer::{self, PointerChange, Rejection},
    Context, Result,
};

/// Claims `command` for the author, telling them off if it is already running.
async fn claim(ctx: Context<'_>, command: &'static str) -> Result<Option<InFlightGuard>> {
    let guard = ctx.data().in_flight.acquire(command, ctx.author().id.get());
    if guard.is_none() {
        ctx.say(BUSY_MESSAGE).await?;
    }
    Ok(guard)
}

// Splits off what the trainer should be told from what the framework should handle.
fn triage<T>(result: trainer::Result<T>) -> Result<std::result::Result<T, Rejection>> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(trainer::Error::Rejected(r)) => Ok(Err(r)),
        Err(trainer::Error::Db(e)) => Err(e.into()),
    }
}

async fn respond(ctx: Context<'_>, result: trainer::Result<String>) -> Result<()> {
    let reply = match triage(result)? {
        Ok(reply) => reply,
        Err(r) => r.to_string(),
    };
    ctx.say(reply).await?;
    Ok(())
}

fn author_id(ctx: Context<'_>) -> i64 {
    ctx.author().id.get() as i64
}

/// List a trainer's or your own pokémon!
#[command(prefix_command, slash_command)]
pub(crate) async fn list(
    ctx: Context<'_>,
    #[description = "Trainer"] user: Option<serenity::User>,
) -> Result<()> {
    let Some(_guard) = claim(ctx, "list").await? else {
        return Ok(());
    };
    let user = user.as_ref().unwrap_or_else(|| ctx.author());
    let owner = user.id == ctx.author().id;

    let pages = {
        let conn = ctx.data().pool.get()?;
        trainer::list(&conn, user.id.get() as i64)
    };
    let pages = match triage(pages)? {
        Ok(pages) => pages,
        Err(r) => {
            ctx.say(r.to_string()).await?;
            return Ok(());
        }
    };

    log::debug!("Listing {} pokémon of {}", pages.len(), user.name);
    if let Some(slot) = discord::menu(ctx, &pages, owner).await? {
        let conn = ctx.data().pool.get()?;
        let reply = trainer::select_slot(&conn, author_id(ctx), slot);
        if reply.is_ok() {
            ctx.data().cache.refresh(&conn)?;
        }
        respond(ctx, reply).await?;
    }
    Ok(())
}

/// Set a pokémon's nickname.
#[command(prefix_command, slash_command)]
pub(crate) async fn nick(
    ctx: Context<'_>,
    #[description = "Pokémon ID"] id: i64,
    #[description = "Nickname"]
    #[rest]
    nickname: String,
) -> Result<()> {
    let Some(_guard) = claim(ctx, "nick").await? else {
        return Ok(());
    };

    let reply = {
        let conn = ctx.data().pool.get()?;
        trainer::nick(&conn, author_id(ctx), id, &nickname)
    };
    respond(ctx, reply).await
}

/// Free a pokémon.
#[command(prefix_command, slash_command)]
pub(crate) async fn free(ctx: Context<'_>, #[description = "Pokémon ID"] id: i64) -> Result<()> {
    let Some(_guard) = claim(ctx, "free").await? else {
        return Ok(());
    };
    let user_id = author_id(ctx);

    let release = {
        let conn = ctx.data().pool.get()?;
        trainer::prepare_release(&conn, user_id, id)
    };
    let release = match triage(release)? {
        Ok(release) => release,
        Err(r) => {
            ctx.say(r.to_string()).await?;
            return Ok(());
        }
    };

    ctx.say(release.prompt()).await?;
    match discord::ask_yes_or_no(ctx, CONFIRMATION_WINDOW).await {
        Confirmation::Accepted => {}
        Confirmation::Declined => {
            ctx.say(DECLINED_REPLY).await?;
            return Ok(());
        }
        Confirmation::TimedOut => {
            ctx.say(TIMED_OUT_REPLY).await?;
            return Ok(());
        }
    }

    let released = {
        let conn = ctx.data().pool.get()?;
        let released = trainer::release(&conn, user_id, &release)?;
        if released.change == PointerChange::Reset {
            ctx.data().cache.refresh(&conn)?;
        }
        released
    };
    ctx.say(released.reply).await?;
    Ok(())
}

/// Select your default pokémon.
#[command(prefix_command, slash_command, guild_only)]
pub(crate) async fn select(
    ctx: Context<'_>,
    #[description = "Pokémon ID or `latest`"] id_or_latest: String,
) -> Result<()> {
    let Some(_guard) = claim(ctx, "select").await? else {
        return Ok(());
    };
    let selector = id_or_latest.parse::<Selector>();

    let reply = {
        let conn = ctx.data().pool.get()?;
        let reply = trainer::select(&conn, author_id(ctx), selector, ctx.prefix());
        if reply.is_ok() {
            ctx.data().cache.refresh(&conn)?;
        }
        reply
    };
    respond(ctx, reply).await
}

/// Choose your starter pokémon.
#[command(prefix_command, slash_command)]
pub(crate) async fn starter(
    ctx: Context<'_>,
    #[description = "Starter pokémon"] name: Option<String>,
) -> Result<()> {
    let Some(name) = name else {
        ctx.say(trainer::starters_overview(ctx.prefix())).await?;
        return Ok(());
    };
    let Some(_guard) = claim(ctx, "starter").await? else {
        return Ok(());
    };

    let reply = {
        let conn = ctx.data().pool.get()?;
        let reply = {
            let mut rng = ctx.data().rng.lock().unwrap_or_else(|e| e.into_inner());
            trainer::starter(
                &conn,
                author_id(ctx),
                ctx.id() as i64,
                &name,
                ctx.prefix(),
                &mut *rng,
            )
        };
        if reply.is_ok() {
            ctx.data().cache.refresh(&conn)?;
        }
        reply
    };
    respond(ctx, reply).await
}

/// Show your selected pokémon.
#[command(prefix_command, slash_command)]
pub(crate) async fn info(ctx: Context<'_>) -> Result<()> {
    let user_id = author_id(ctx);

    let page = {
        let conn = ctx.data().pool.get()?;
        let pointer = ctx.data().cache.selected(&conn, user_id)?;
        trainer::selected_page(&conn, user_id, pointer)
    };
    match triage(page)? {
        Ok(page) => {
            ctx.send(CreateReply::default().embed(discord::embed(&page))).await?;
        }
        Err(r) => {
            ctx.say(r.to_string()).await?;
        }
    }
    Ok(())
}
