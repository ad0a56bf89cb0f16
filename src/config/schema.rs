use serde::Deserialize;

/// Top-level service settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/rondo/config.toml` or `~/.config/rondo/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `RONDO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub remote: RemoteSettings,
    pub notification: NotificationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            library: LibrarySettings::default(),
            playback: PlaybackSettings::default(),
            remote: RemoteSettings::default(),
            notification: NotificationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether playback starts as soon as the service is up.
    pub autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self { autoplay: false }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Whether to expose the transport-control surface on the session bus.
    pub enabled: bool,
    /// Identity used for the bus name suffix and the Identity property.
    pub identity: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            identity: "rondo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Whether to present the playback notification.
    pub enabled: bool,
    /// Application name shown by the notification server.
    pub app_name: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: "rondo".to_string(),
        }
    }
}
