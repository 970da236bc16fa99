// SPDX-License-Identifier: GPL-3.0-or-later

//! Reading Exportify playlist CSV exports.

use crate::normalize::strip_apostrophes;
use s2am_domain::TrackQuery;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const TITLE_COLUMN: usize = 1;
const ARTIST_COLUMN: usize = 3;
const ALBUM_COLUMN: usize = 5;
const ISRC_COLUMN: usize = 16;
const MIN_COLUMNS: usize = ISRC_COLUMN + 1;

/// Printed when a CSV does not have the Exportify layout.
pub const CSV_FORMAT_HINT: &str = "The CSV file is not in the correct format!\n\
Please be sure to download the CSV file(s) only from https://watsonbox.github.io/exportify/.";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected CSV header: {0}")]
    InvalidFormat(String),
}

pub type ImportResult<T> = Result<T, ImportError>;

/// Read every usable track row from the CSV at `path`.
pub fn read_track_queries(path: &Path) -> ImportResult<Vec<TrackQuery>> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let tracks = parse_track_queries(file)?;
    debug!(target: "import", path = %path.display(), tracks = tracks.len(), "read playlist CSV");
    Ok(tracks)
}

/// Parse an Exportify CSV.
///
/// The header must name `Track Name`, `Artist Name(s)`, `Album Name` and
/// `ISRC` in columns 1, 3, 5 and 16. Rows too short to hold an ISRC column
/// are skipped with a warning. Apostrophes are dropped from title, artist and
/// album so they compare equal to catalog text after normalization.
pub fn parse_track_queries<R: Read>(reader: R) -> ImportResult<Vec<TrackQuery>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv.records();

    let header = match records.next() {
        Some(header) => header?,
        None => return Err(ImportError::InvalidFormat("empty file".to_string())),
    };
    if !header_is_valid(&header) {
        return Err(ImportError::InvalidFormat(
            header.iter().collect::<Vec<_>>().join(","),
        ));
    }

    let mut tracks = Vec::new();
    for record in records {
        let record = record?;
        if record.len() < MIN_COLUMNS {
            warn!(
                target: "import",
                row = ?record.iter().collect::<Vec<_>>(),
                "row does not have enough columns, skipping"
            );
            continue;
        }
        tracks.push(TrackQuery::new(
            strip_apostrophes(&record[TITLE_COLUMN]),
            strip_apostrophes(&record[ARTIST_COLUMN]),
            strip_apostrophes(&record[ALBUM_COLUMN]),
            &record[ISRC_COLUMN],
        ));
    }
    Ok(tracks)
}

fn header_is_valid(header: &csv::StringRecord) -> bool {
    header.len() >= MIN_COLUMNS
        && &header[TITLE_COLUMN] == "Track Name"
        && &header[ARTIST_COLUMN] == "Artist Name(s)"
        && &header[ALBUM_COLUMN] == "Album Name"
        && &header[ISRC_COLUMN] == "ISRC"
}

/// Playlist name derived from a CSV path: the file name up to its first
/// `.`, underscores as spaces, first letter upper case and the rest lower.
pub fn playlist_display_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default().replace('_', " ");

    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Track URI,Track Name,Artist URI(s),Artist Name(s),Album URI,Album Name,\
Album Artist URI(s),Album Artist Name(s),Album Release Date,Album Image URL,Disc Number,\
Track Number,Track Duration (ms),Track Preview URL,Explicit,Popularity,ISRC,Added By,Added At";

    fn row(title: &str, artist: &str, album: &str, isrc: &str) -> String {
        format!(
            "spotify:track:x,\"{title}\",spotify:artist:y,\"{artist}\",spotify:album:z,\"{album}\",,,2008,,1,1,200000,,false,50,{isrc},,"
        )
    }

    #[test]
    fn parses_rows_and_strips_apostrophes() {
        let csv = format!(
            "{HEADER}\n{}\n{}\n",
            row("Don't Stop Me Now", "Queen", "Jazz", "GBUM71029604"),
            row("Help!", "The Beatles", "Help!", ""),
        );

        let tracks = parse_track_queries(csv.as_bytes()).unwrap();

        assert_eq!(
            tracks,
            vec![
                TrackQuery::new("Dont Stop Me Now", "Queen", "Jazz", "GBUM71029604"),
                TrackQuery::new("Help!", "The Beatles", "Help!", ""),
            ]
        );
    }

    #[test]
    fn short_rows_are_skipped() {
        let csv = format!(
            "{HEADER}\nspotify:track:x,Short,a,b,c,d\n{}\n",
            row("Yesterday", "The Beatles", "Help!", "GBAYE0601498")
        );

        let tracks = parse_track_queries(csv.as_bytes()).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Yesterday");
    }

    #[test]
    fn rejects_foreign_header() {
        let csv = "Title,Artist,Album\nYesterday,The Beatles,Help!\n";
        assert!(matches!(
            parse_track_queries(csv.as_bytes()),
            Err(ImportError::InvalidFormat(_))
        ));

        let renamed = HEADER.replace("ISRC", "Code");
        assert!(matches!(
            parse_track_queries(renamed.as_bytes()),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_empty_file() {
        assert!(matches!(
            parse_track_queries("".as_bytes()),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("road_trip.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "{}", row("Beyoncé", "Artist", "Album", "")).unwrap();

        let tracks = read_track_queries(&path).unwrap();
        assert_eq!(tracks[0].title, "Beyoncé");

        let missing = read_track_queries(&dir.path().join("missing.csv"));
        assert!(matches!(missing, Err(ImportError::Io { .. })));
    }

    #[test]
    fn display_name_follows_file_name() {
        assert_eq!(playlist_display_name(Path::new("exports/road_trip.csv")), "Road trip");
        assert_eq!(playlist_display_name(Path::new("MY_MIX.v2.csv")), "My mix");
        assert_eq!(playlist_display_name(Path::new("éTÉ.csv")), "Été");
        assert_eq!(playlist_display_name(Path::new(".csv")), "");
    }
}
