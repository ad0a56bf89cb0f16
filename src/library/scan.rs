use std::path::Path;

use lofty::prelude::{ItemKey, TaggedFileExt};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::playlist::Track;

pub(super) const UNKNOWN_ARTIST: &str = "Unknown Artist";

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            let mut title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string();
            let mut artist = UNKNOWN_ARTIST.to_string();

            if let Ok(tagged) = lofty::read_from_path(path) {
                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.get_string(ItemKey::TrackTitle) {
                        if !v.trim().is_empty() {
                            title = v.to_string();
                        }
                    }
                    if let Some(v) = tag.get_string(ItemKey::TrackArtist) {
                        let v = v.trim();
                        if !v.is_empty() {
                            artist = v.to_string();
                        }
                    }
                }
            }

            tracks.push(Track {
                path: path.to_path_buf(),
                title,
                artist,
            });
        }
    }

    // The playlist is fixed for the process lifetime; sort so its order does
    // not depend on directory iteration.
    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    tracks
}
