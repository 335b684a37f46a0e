use std::time::Duration;

use futures::{future, StreamExt};
use poise::{serenity_prelude as serenity, CreateReply};

use crate::{
    confirm::{self, Confirmation},
    pokemon::Page,
    Context, Result,
};

/// How long a listing stays interactive after the last button press.
const MENU_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn embed(page: &Page) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::new()
        .title(&page.title)
        .description(&page.description)
        .footer(serenity::CreateEmbedFooter::new(&page.footer));

    match &page.thumbnail {
        Some(url) => embed.thumbnail(url),
        None => embed,
    }
}

/// Waits for the invoking user to answer yes or no in the invoking channel.
/// Other messages from them are ignored.
pub(crate) async fn ask_yes_or_no(ctx: Context<'_>, window: Duration) -> Confirmation {
    let mut answers = Box::pin(
        serenity::MessageCollector::new(ctx.serenity_context())
            .author_id(ctx.author().id)
            .channel_id(ctx.channel_id())
            .stream()
            .filter_map(|msg| future::ready(confirm::parse_yes_no(&msg.content))),
    );

    let confirmation = confirm::await_confirmation(answers.next(), window).await;
    log::debug!("User {} answered {:?}", ctx.author().id, confirmation);
    confirmation
}

/// Shows `pages` one at a time with previous/close/next buttons.
///
/// With `selectable`, a select button is added as well; pressing it closes
/// the menu and returns the 1-based slot of the page it was pressed on.
pub(crate) async fn menu(
    ctx: Context<'_>,
    pages: &[Page],
    selectable: bool,
) -> Result<Option<usize>> {
    if pages.is_empty() {
        return Ok(None);
    }

    let ctx_id = ctx.id();
    let prev_id = format!("{}prev", ctx_id);
    let close_id = format!("{}close", ctx_id);
    let next_id = format!("{}next", ctx_id);
    let select_id = format!("{}select", ctx_id);

    let mut buttons = vec![
        serenity::CreateButton::new(&prev_id).emoji('⬅'),
        serenity::CreateButton::new(&close_id)
            .emoji('❌')
            .style(serenity::ButtonStyle::Danger),
        serenity::CreateButton::new(&next_id).emoji('➡'),
    ];
    if selectable {
        buttons.push(
            serenity::CreateButton::new(&select_id)
                .emoji('✅')
                .style(serenity::ButtonStyle::Success),
        );
    }
    let controls = vec![serenity::CreateActionRow::Buttons(buttons)];

    let handle = ctx
        .send(
            CreateReply::default()
                .embed(embed(&pages[0]))
                .components(controls),
        )
        .await?;

    let mut current = 0;
    while let Some(press) = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
        .author_id(ctx.author().id)
        .filter(move |press| press.data.custom_id.starts_with(&ctx_id.to_string()))
        .timeout(MENU_TIMEOUT)
        .await
    {
        let pressed = press.data.custom_id.as_str();
        if pressed == close_id || pressed == select_id {
            press
                .create_response(
                    ctx.serenity_context(),
                    serenity::CreateInteractionResponse::Acknowledge,
                )
                .await?;
            handle.delete(ctx).await?;

            let selected = (pressed == select_id).then_some(current + 1);
            log::debug!("Menu {} closed, selected {:?}", ctx_id, selected);
            return Ok(selected);
        }

        if pressed == next_id {
            current = (current + 1) % pages.len();
        } else if pressed == prev_id {
            current = current.checked_sub(1).unwrap_or(pages.len() - 1);
        } else {
            continue;
        }

        press
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new().embed(embed(&pages[current])),
                ),
            )
            .await?;
    }

    // Timed out, leave the current page up without its controls.
    handle
        .edit(
            ctx,
            CreateReply::default()
                .embed(embed(&pages[current]))
                .components(vec![]),
        )
        .await?;
    Ok(None)
}
