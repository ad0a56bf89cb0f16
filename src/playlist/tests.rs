use std::path::PathBuf;

use super::*;

fn track(name: &str) -> Track {
    Track {
        path: PathBuf::from(format!("/tmp/music/{name}.mp3")),
        title: name.to_string(),
        artist: "Artist".to_string(),
    }
}

fn cursor(names: &[&str]) -> PlaylistCursor {
    let playlist = Playlist::new(names.iter().map(|n| track(n)).collect()).unwrap();
    PlaylistCursor::new(playlist)
}

#[test]
fn empty_playlist_is_a_construction_error() {
    assert!(matches!(Playlist::new(vec![]), Err(PlaylistError::Empty)));
}

#[test]
fn cursor_starts_at_first_track() {
    let cursor = cursor(&["a", "b", "c"]);
    assert_eq!(cursor.position(), 0);
    assert_eq!(cursor.current().title, "a");
}

#[test]
fn next_wraps_from_last_to_first() {
    let mut cursor = cursor(&["a", "b", "c"]);
    assert_eq!(cursor.next().title, "b");
    assert_eq!(cursor.next().title, "c");
    assert_eq!(cursor.next().title, "a");
    assert_eq!(cursor.position(), 0);
}

#[test]
fn previous_wraps_from_first_to_last() {
    let mut cursor = cursor(&["a", "b", "c"]);
    assert_eq!(cursor.previous().title, "c");
    assert_eq!(cursor.position(), 2);
    assert_eq!(cursor.previous().title, "b");
}

#[test]
fn index_stays_in_range_under_any_walk() {
    let mut cursor = cursor(&["a", "b", "c"]);
    for step in 0..100 {
        if step % 3 == 0 {
            cursor.previous();
        } else {
            cursor.next();
        }
        assert!(cursor.position() < cursor.len());
    }
}

#[test]
fn single_track_playlist_wraps_onto_itself() {
    let mut cursor = cursor(&["only"]);
    assert_eq!(cursor.next().title, "only");
    assert_eq!(cursor.previous().title, "only");
    assert_eq!(cursor.position(), 0);
}
