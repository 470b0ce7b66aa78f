//! Desktop notifications
//!
//! Notifications are a side effect only: the orchestrator spawns them as a
//! detached task and never waits for or reacts to the result.

use crate::player::osascript::quote;
use crate::player::{Osascript, TrackInfo};
use crate::{Error, Result};
use async_trait::async_trait;

/// Content of one desktop notification
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub icon_url: Option<String>,
}

impl Notification {
    /// "<name> by <artist>" for the given track
    pub fn for_track(title: impl Into<String>, track: &TrackInfo, icon_url: Option<String>) -> Self {
        Self {
            title: title.into(),
            message: format!("{} by {}", track.name, track.artist),
            icon_url,
        }
    }
}

/// Something that can show a [`Notification`]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Platform notifier: AppleScript on macOS, `notify-send` elsewhere
#[derive(Debug, Default, Clone)]
pub struct DesktopNotifier {
    script: Osascript,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    async fn display_with_applescript(&self, notification: &Notification) -> Result<()> {
        // AppleScript notifications have no custom icon support
        let script = format!(
            "display notification {} with title {}",
            quote(&notification.message),
            quote(&notification.title)
        );
        self.script.run(&script).await.map(|_| ()).map_err(Error::Notify)
    }

    async fn display_with_notify_send(&self, notification: &Notification) -> Result<()> {
        let mut command = tokio::process::Command::new("notify-send");
        if let Some(icon) = &notification.icon_url {
            command.arg("--icon").arg(icon);
        }
        let status = command
            .arg(&notification.title)
            .arg(&notification.message)
            .status()
            .await
            .map_err(|e| Error::Notify(format!("failed to run notify-send: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Notify(format!("notify-send exited with {}", status)))
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        if cfg!(target_os = "macos") {
            self.display_with_applescript(notification).await
        } else {
            self.display_with_notify_send(notification).await
        }
    }
}
