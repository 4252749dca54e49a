extern crate dotenv;

use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use rand::seq::SliceRandom;
use songbird::register_from_config;
use tracing::{error, info};

mod commands;
mod config;
mod events;
mod gate;
mod logging;
mod node;
mod player;
mod routing;
mod types;
mod util;
mod version;

use config::{build_activity, BotSettings};
use types::Data;

#[tokio::main]
async fn main() {
    dotenv().ok();
    let _log_guard = logging::init();

    version::check_versions().await;

    // One optional numeric argument picks the settings file; anything else
    // falls back to configuration 0.
    let settings_version = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0);
    let settings = BotSettings::load(settings_version);

    node::launch_if_configured().await;

    let owner_id = std::env::var("OWNER_ID")
        .ok()
        .and_then(|raw| raw.trim_matches('"').parse().ok())
        .map(serenity::UserId);
    let owners = owner_id.into_iter().collect();

    let prefix_config = settings.prefix_config();
    let commands = vec![
        commands::music(),
        commands::ping(),
        commands::report(),
        commands::register(),
        commands::help(),
        commands::calculate_difficulty(),
    ];

    let framework = poise::Framework::builder()
        .token(std::env::var("DISCORD_TOKEN").expect("DISCORD_TOKEN must be set"))
        .options(poise::FrameworkOptions {
            commands,
            owners,
            on_error: |err| {
                Box::pin(async move {
                    match err {
                        poise::FrameworkError::Command { error, ctx } => {
                            error!("command {} failed: {error}", ctx.invoked_command_name());
                            let mention = ctx
                                .data()
                                .owner_id
                                .map(|id| format!(" <@{id}>"))
                                .unwrap_or_default();
                            let policy = ctx.data().settings.allowed_mentions;
                            let _ = ctx
                                .send(|m| {
                                    m.content(format!(
                                        "❌ Error occurred.{mention}\nInvocation Context: \
                                         `{}`\nError: `{error}`\n\n*This feature is still in \
                                         development. Please forward all bug reports to the \
                                         owner!*",
                                        ctx.invoked_command_name()
                                    ))
                                    .allowed_mentions(|am| policy.apply(am))
                                })
                                .await;
                        }
                        poise::FrameworkError::CooldownHit {
                            remaining_cooldown,
                            ctx,
                        } => {
                            let _ = ctx
                                .say(format!(
                                    "❌ The command is on cooldown! Please try again in {} \
                                     seconds!",
                                    remaining_cooldown.as_secs()
                                ))
                                .await;
                        }
                        err => {
                            if let Err(e) = poise::builtins::on_error(err).await {
                                error!("error handler failed: {e}");
                            }
                        }
                    }
                })
            },
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    handle_event(ctx, event, data).await;
                    Ok(())
                })
            },
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: prefix_config.primary.clone(),
                additional_prefixes: prefix_config
                    .additional
                    .iter()
                    .map(|prefix| {
                        poise::Prefix::Literal(Box::leak(prefix.clone().into_boxed_str()))
                    })
                    .collect(),
                mention_as_prefix: prefix_config.mention_as_prefix,
                case_insensitive_commands: settings.case_insensitive,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let activity = settings.activities.choose(&mut rand::thread_rng());
                if let Some(activity) = build_activity(activity) {
                    ctx.set_activity(activity).await;
                }

                info!("logged in as {}", ready.user.name);
                Ok(Data::new(settings, owner_id))
            })
        })
        .intents(
            serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT,
        )
        .client_settings(|c| register_from_config(c, Default::default()));

    framework
        .run_autosharded()
        .await
        .expect("client startup failed");
}

/// Resets a guild's routing state when the bot's own voice connection fully
/// drops, whatever caused the disconnect.
async fn handle_event(ctx: &serenity::Context, event: &poise::Event<'_>, data: &Data) {
    if let poise::Event::VoiceStateUpdate { new, .. } = event {
        if new.user_id == ctx.cache.current_user_id() && new.channel_id.is_none() {
            if let Some(guild_id) = new.guild_id {
                let mut sessions = data.sessions.lock().await;
                if let Some(mut session) = sessions.remove(&guild_id) {
                    session.cancel_pending_resume();
                    info!("voice session in guild {guild_id} ended, routing state reset");
                }
            }
        }
    }
}
