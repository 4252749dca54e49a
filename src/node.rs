//! Optional launcher for a colocated external audio node. Deployments that
//! front playback through a Lavalink-compatible node set `AUDIO_NODE_PATH`
//! to its install directory; everyone else runs without it and songbird
//! handles audio in-process.

use tracing::{info, warn};

pub async fn launch_if_configured() {
    let path = match std::env::var("AUDIO_NODE_PATH") {
        Ok(path) => path,
        Err(_) => {
            info!("AUDIO_NODE_PATH not set, no external audio node to launch");
            return;
        }
    };

    match tokio::process::Command::new("java")
        .arg("-jar")
        .arg("Lavalink.jar")
        .current_dir(&path)
        .spawn()
    {
        Ok(mut child) => {
            info!("audio node started from {path}");
            // Fire and forget; the node has its own lifecycle and we only
            // care to log when it goes away.
            tokio::spawn(async move {
                match child.wait().await {
                    Ok(status) => warn!("audio node exited: {status}"),
                    Err(e) => warn!("audio node wait failed: {e}"),
                }
            });
        }
        Err(e) => warn!("could not start audio node from {path}: {e}"),
    }
}
