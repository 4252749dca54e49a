//! Settings files select between the named bot configurations; the numeric
//! CLI argument picks which file to load. A missing or malformed file falls
//! back to the built-in defaults so a bad deploy still comes online.

use poise::serenity_prelude::{Activity, CreateAllowedMentions, ParseValue};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    pub activities: Vec<ActivityDescriptor>,
    pub allowed_mentions: MentionPolicy,
    pub command_prefix: Vec<String>,
    pub description: String,
    pub case_insensitive: bool,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            activities: Vec::new(),
            allowed_mentions: MentionPolicy::default(),
            command_prefix: vec!["!".to_string()],
            description: "A Discord music bot.".to_string(),
            case_insensitive: false,
        }
    }
}

impl BotSettings {
    pub fn load(version: u32) -> Self {
        let path = format!("config/bot_settings_{}.json", version);
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("could not parse {}: {e}; using defaults", path);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("could not read {}: {e}; using defaults", path);
                Self::default()
            }
        }
    }

    pub fn prefix_config(&self) -> PrefixConfig {
        split_prefixes(&self.command_prefix)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityDescriptor {
    pub kind: String,
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Maps a settings activity record to a presence. Anything unrecognized
/// yields no activity instead of failing startup.
pub fn build_activity(descriptor: Option<&ActivityDescriptor>) -> Option<Activity> {
    let descriptor = descriptor?;
    let name = descriptor.name.as_deref().unwrap_or("something");

    match descriptor.kind.as_str() {
        "Playing" => Some(Activity::playing(name)),
        "Streaming" => {
            let url = descriptor.url.as_deref()?;
            Some(Activity::streaming(name, url))
        }
        "Listening" => Some(Activity::listening(name)),
        "Watching" => Some(Activity::watching(name)),
        "Competing" => Some(Activity::competing(name)),
        _ => None,
    }
}

/// The bot-wide mention filter, applied wherever a reply interpolates
/// user-controlled or error text.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MentionPolicy {
    pub everyone: bool,
    pub users: bool,
    pub roles: bool,
    pub replied_user: bool,
}

impl Default for MentionPolicy {
    fn default() -> Self {
        Self {
            everyone: false,
            users: true,
            roles: false,
            replied_user: true,
        }
    }
}

impl MentionPolicy {
    pub fn apply<'a>(&self, builder: &'a mut CreateAllowedMentions) -> &'a mut CreateAllowedMentions {
        builder.empty_parse();
        if self.everyone {
            builder.parse(ParseValue::Everyone);
        }
        if self.users {
            builder.parse(ParseValue::Users);
        }
        if self.roles {
            builder.parse(ParseValue::Roles);
        }
        builder.replied_user(self.replied_user)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixConfig {
    pub primary: Option<String>,
    pub additional: Vec<String>,
    pub mention_as_prefix: bool,
}

/// `"@"` in the prefix list stands for "respond when mentioned"; the first
/// literal prefix becomes the primary one and the rest become alternates.
pub fn split_prefixes(prefixes: &[String]) -> PrefixConfig {
    let mut config = PrefixConfig::default();

    for prefix in prefixes {
        if prefix == "@" {
            config.mention_as_prefix = true;
        } else if config.primary.is_none() {
            config.primary = Some(prefix.clone());
        } else {
            config.additional.push(prefix.clone());
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_activity_kind_yields_none() {
        let descriptor = ActivityDescriptor {
            kind: "Juggling".to_string(),
            name: Some("chainsaws".to_string()),
            url: None,
        };
        assert!(build_activity(Some(&descriptor)).is_none());
        assert!(build_activity(None).is_none());
    }

    #[test]
    fn known_activity_kinds_build() {
        for kind in ["Playing", "Listening", "Watching", "Competing"] {
            let descriptor = ActivityDescriptor {
                kind: kind.to_string(),
                name: Some("music".to_string()),
                url: None,
            };
            assert!(build_activity(Some(&descriptor)).is_some(), "{kind}");
        }
    }

    #[test]
    fn streaming_without_url_yields_none() {
        let descriptor = ActivityDescriptor {
            kind: "Streaming".to_string(),
            name: Some("music".to_string()),
            url: None,
        };
        assert!(build_activity(Some(&descriptor)).is_none());
    }

    #[test]
    fn prefixes_split() {
        let prefixes: Vec<String> = ["@", "!", "p!"].iter().map(|s| s.to_string()).collect();
        let config = split_prefixes(&prefixes);

        assert!(config.mention_as_prefix);
        assert_eq!(config.primary.as_deref(), Some("!"));
        assert_eq!(config.additional, vec!["p!".to_string()]);

        let mention_only: Vec<String> = vec!["@".to_string()];
        let config = split_prefixes(&mention_only);
        assert!(config.mention_as_prefix);
        assert_eq!(config.primary, None);
    }

    #[test]
    fn settings_parse_from_json() {
        let raw = r#"{
            "activities": [{"kind": "Playing", "name": "music"}],
            "allowed_mentions": {"everyone": false, "users": true, "roles": false, "replied_user": true},
            "command_prefix": ["p!", "@"],
            "description": "dj in a box",
            "case_insensitive": true
        }"#;
        let settings: BotSettings = serde_json::from_str(raw).unwrap();

        assert_eq!(settings.activities.len(), 1);
        assert!(settings.case_insensitive);
        assert_eq!(settings.prefix_config().primary.as_deref(), Some("p!"));
    }
}
