//! Startup comparison of the pinned framework/audio crates against the
//! latest releases on crates.io. Purely informational; every failure path
//! degrades to "Unknown".

use tracing::{info, warn};

/// Versions pinned in Cargo.toml. Kept in sync by hand; the comparison only
/// has to be truthful about what this binary was built against.
const TRACKED: [(&str, &str); 2] = [("poise", "0.5.5"), ("songbird", "0.3.2")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    UpToDate,
    Outdated,
    Unknown,
}

pub fn compare(current: &str, latest: &str) -> VersionStatus {
    if latest == "Unknown" {
        VersionStatus::Unknown
    } else if latest != current {
        VersionStatus::Outdated
    } else {
        VersionStatus::UpToDate
    }
}

pub async fn check_versions() {
    let client = match reqwest::Client::builder()
        .user_agent(concat!("discord-dj-bot/", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!("version check skipped, could not build http client: {e}");
            return;
        }
    };

    for (name, current) in TRACKED {
        let latest = fetch_latest(&client, name)
            .await
            .unwrap_or_else(|e| {
                warn!("could not fetch latest {name} version: {e}");
                "Unknown".to_string()
            });

        match compare(current, &latest) {
            VersionStatus::UpToDate => info!("{name} {current} is up to date"),
            VersionStatus::Outdated => {
                warn!("{name} {current} is outdated, latest is {latest}; consider updating")
            }
            VersionStatus::Unknown => {
                warn!("{name} {current} could not be checked against the latest release")
            }
        }
    }
}

async fn fetch_latest(client: &reqwest::Client, name: &str) -> Result<String, reqwest::Error> {
    let url = format!("https://crates.io/api/v1/crates/{name}");
    let body: serde_json::Value = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(body["crate"]["max_stable_version"]
        .as_str()
        .unwrap_or("Unknown")
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_classes() {
        assert_eq!(compare("0.5.5", "0.5.5"), VersionStatus::UpToDate);
        assert_eq!(compare("0.5.5", "0.6.1"), VersionStatus::Outdated);
        assert_eq!(compare("0.5.5", "Unknown"), VersionStatus::Unknown);
    }
}
