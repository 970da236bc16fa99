// SPDX-License-Identifier: GPL-3.0-or-later

//! Console progress table.

use s2am_domain::TrackRecord;

const RULE_WIDTH: usize = 80;
const TEXT_WIDTH: usize = 20;
const STATUS_WIDTH: usize = 7;
const RESULT_WIDTH: usize = 13;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Cut `text` to `limit` characters, ending in `...` when shortened.
pub fn truncate_text(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn columns(title: &str, artist: &str, album: &str, found: &str, result: &str) -> String {
    format!(
        "{:<tw$} {:<tw$} {:<tw$} {:<sw$} {:<rw$}",
        truncate_text(title, TEXT_WIDTH),
        truncate_text(artist, TEXT_WIDTH),
        truncate_text(album, TEXT_WIDTH),
        truncate_text(found, STATUS_WIDTH),
        truncate_text(result, RESULT_WIDTH),
        tw = TEXT_WIDTH,
        sw = STATUS_WIDTH,
        rw = RESULT_WIDTH,
    )
}

pub fn format_header(playlist_name: &str, track_count: usize) -> String {
    [
        rule(),
        format!("Spotify to Apple Music Converter v{}", env!("CARGO_PKG_VERSION")),
        format!("Playlist Name: {playlist_name}"),
        format!("Number of Tracks: {track_count}"),
        rule(),
        columns("Title", "Artist", "Album", "Found", "Result"),
        rule(),
    ]
    .join("\n")
}

pub fn format_row(record: &TrackRecord) -> String {
    let found = record
        .search_status
        .map(|s| s.to_string())
        .unwrap_or_default();
    let result = record.result.map(|r| r.to_string()).unwrap_or_default();
    columns(
        &record.query.title,
        &record.query.artist,
        &record.query.album,
        &found,
        &result,
    )
}

pub fn format_footer(search_results: &str, playlist_results: &str) -> String {
    [
        rule(),
        format!("Search Results: {search_results}"),
        format!("Add to Playlist Result: {playlist_results}"),
        rule(),
    ]
    .join("\n")
}
