use std::time::{SystemTime, UNIX_EPOCH};

use poise::serenity_prelude::Mentionable;

use crate::types::{Context, Error};
use crate::util::check_reply;

/// Tests the bot connection.
#[poise::command(slash_command, prefix_command, aliases("latency", "test"))]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;
    check_reply(
        ctx.say(format!("🏓 Pong! Latency is {}ms", latency.as_millis()))
            .await,
    );
    Ok(())
}

/// Sends a connection/latency report to the owner.
#[poise::command(slash_command, prefix_command, aliases("problem"), user_cooldown = 120)]
pub async fn report(ctx: Context<'_>) -> Result<(), Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let owner_id = match ctx.data().owner_id {
        Some(owner_id) => owner_id,
        None => {
            check_reply(
                ctx.say(format!(
                    "❌ Your report was not sent. Current timestamp: <t:{now}>"
                ))
                .await,
            );
            return Ok(());
        }
    };

    let latency = ctx.ping().await;
    let dm = owner_id
        .create_dm_channel(ctx.serenity_context())
        .await?;
    dm.say(
        &ctx.serenity_context().http,
        format!(
            "A latency report was made by {} ({})!\nCurrent timestamp: <t:{now}>\nGateway latency: {}ms",
            ctx.author().tag(),
            ctx.author().mention(),
            latency.as_millis(),
        ),
    )
    .await?;

    check_reply(ctx.say("✅ Your report has been sent!").await);
    Ok(())
}

/// (OWNER ONLY) Re-registers the application commands, the closest thing to
/// a live reload the framework offers.
#[poise::command(prefix_command, owners_only, aliases("reload"))]
pub async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx).await?;
    Ok(())
}

/// Shows this help menu.
#[poise::command(slash_command, prefix_command, track_edits)]
pub async fn help(
    ctx: Context<'_>,
    #[rest]
    #[description = "Specific command to show help about"]
    command: Option<String>,
) -> Result<(), Error> {
    let config = poise::builtins::HelpConfiguration {
        extra_text_at_bottom: &ctx.data().settings.description,
        ..Default::default()
    };
    poise::builtins::help(ctx, command.as_deref(), config).await?;
    Ok(())
}
