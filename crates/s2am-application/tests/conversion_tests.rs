// SPDX-License-Identifier: GPL-3.0-or-later

use s2am_applemusic::{AppleMusicClient, ItunesSearchClient, Session, Throttle};
use s2am_application::{ConversionError, PlaylistConverter};
use s2am_domain::{AddResult, SearchMethod, SearchStatus, TrackQuery, SKIPPED_ID};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const YESTERDAY_ID: &str = "1441133180";
const PLAYLIST_ID: &str = "p.mix";

fn converter_for(server: &MockServer) -> PlaylistConverter {
    let apple_music = AppleMusicClient::builder()
        .base_url(server.uri())
        .storefront("us")
        .session(Session::new("Bearer test-token", "test-media-token", "itspod=25"))
        .throttle(Throttle::disabled())
        .build()
        .unwrap();
    let itunes = ItunesSearchClient::builder()
        .base_url(format!("{}/search", server.uri()))
        .country("us")
        .throttle(Throttle::disabled())
        .build()
        .unwrap();
    PlaylistConverter::from_clients(apple_music, itunes, "created by tests")
}

fn yesterday(isrc: &str) -> TrackQuery {
    TrackQuery::new("Yesterday", "The Beatles", "Help!", isrc)
}

async fn mount_playlist(server: &MockServer, catalog_ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/me/library/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "p.other", "attributes": { "name": "Other" } },
                { "id": PLAYLIST_ID, "attributes": { "name": "Mix" } }
            ]
        })))
        .mount(server)
        .await;

    let tracks = if catalog_ids.is_empty() {
        ResponseTemplate::new(404)
    } else {
        let data: Vec<_> = catalog_ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                json!({
                    "id": format!("i.{i}"),
                    "type": "library-songs",
                    "attributes": { "name": "Track", "playParams": { "catalogId": id } }
                })
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
    };

    Mock::given(method("GET"))
        .and(path(format!("/me/library/playlists/{PLAYLIST_ID}/tracks")))
        .respond_with(tracks)
        .mount(server)
        .await;
}

async fn mount_isrc(server: &MockServer, isrc: &str, songs: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/catalog/us/songs"))
        .and(query_param("filter[isrc]", isrc))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": songs })))
        .mount(server)
        .await;
}

async fn mount_no_equivalents(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/catalog/us/songs"))
        .and(query_param("filter[equivalents]", YESTERDAY_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(server)
        .await;
}

fn yesterday_song() -> serde_json::Value {
    json!([{
        "id": YESTERDAY_ID,
        "type": "songs",
        "attributes": {
            "name": "Yesterday",
            "artistName": "The Beatles",
            "albumName": "Help!",
            "isrc": "GBAYE0601498"
        }
    }])
}

#[tokio::test]
async fn test_isrc_hit_is_added() {
    let server = MockServer::start().await;
    mount_playlist(&server, &[]).await;
    mount_isrc(&server, "GBAYE0601498", yesterday_song()).await;
    mount_no_equivalents(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/me/library/playlists/{PLAYLIST_ID}/tracks")))
        .and(body_json(json!({ "data": [{ "id": YESTERDAY_ID, "type": "songs" }] })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let converter = converter_for(&server);
    let run = converter
        .convert("Mix", vec![yesterday("GBAYE0601498")], |_, _| {})
        .await
        .unwrap();

    let record = &run.records()[0];
    assert_eq!(record.track_id.as_deref(), Some(YESTERDAY_ID));
    assert_eq!(record.search_method, Some(SearchMethod::Identifier));
    assert_eq!(record.search_status, Some(SearchStatus::Ok));
    assert_eq!(record.result, Some(AddResult::Added));
    assert_eq!(record.added_track_id.as_deref(), Some(YESTERDAY_ID));
}

#[tokio::test]
async fn test_incomplete_later_isrc_result_keeps_first_match() {
    let server = MockServer::start().await;
    mount_playlist(&server, &[]).await;
    mount_no_equivalents(&server).await;

    let mut songs = yesterday_song();
    songs
        .as_array_mut()
        .unwrap()
        .push(json!({ "id": "999", "type": "songs", "attributes": { "name": "Yesterday" } }));
    mount_isrc(&server, "GBAYE0601498", songs).await;

    Mock::given(method("POST"))
        .and(path(format!("/me/library/playlists/{PLAYLIST_ID}/tracks")))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let converter = converter_for(&server);
    let run = converter
        .convert("Mix", vec![yesterday("GBAYE0601498")], |_, _| {})
        .await
        .unwrap();

    let record = &run.records()[0];
    assert_eq!(record.track_id.as_deref(), Some(YESTERDAY_ID));
    assert_eq!(record.search_method, Some(SearchMethod::Identifier));
    assert_eq!(record.result, Some(AddResult::Added));
}

#[tokio::test]
async fn test_empty_isrc_result_falls_back_to_text_search() {
    let server = MockServer::start().await;
    mount_playlist(&server, &[]).await;
    mount_isrc(&server, "GBAYE0601498", json!([])).await;
    mount_no_equivalents(&server).await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("term", "yesterday the beatles help!"))
        .and(query_param("entity", "song"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCount": 1,
            "results": [{
                "trackId": 1441133180u64,
                "trackName": "Yesterday",
                "artistName": "The Beatles",
                "collectionName": "Help!"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/me/library/playlists/{PLAYLIST_ID}/tracks")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let converter = converter_for(&server);
    let run = converter
        .convert("Mix", vec![yesterday("GBAYE0601498")], |_, _| {})
        .await
        .unwrap();

    let record = &run.records()[0];
    assert_eq!(record.search_method, Some(SearchMethod::Text));
    assert_eq!(record.search_status, Some(SearchStatus::Ok));
    assert_eq!(record.result, Some(AddResult::Added));
}

#[tokio::test]
async fn test_track_already_in_playlist_is_not_added() {
    let server = MockServer::start().await;
    mount_playlist(&server, &[YESTERDAY_ID]).await;
    mount_isrc(&server, "GBAYE0601498", yesterday_song()).await;

    Mock::given(method("POST"))
        .and(path(format!("/me/library/playlists/{PLAYLIST_ID}/tracks")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let converter = converter_for(&server);
    let mut playlist = converter.prepare_playlist("Mix").await.unwrap();
    let record = converter
        .process_track(yesterday("GBAYE0601498"), &mut playlist)
        .await
        .unwrap();

    assert_eq!(record.search_status, Some(SearchStatus::Duplicate));
    assert_eq!(record.result, Some(AddResult::Skipped));
    assert_eq!(record.added_track_id.as_deref(), Some(SKIPPED_ID));
    assert_eq!(playlist.len(), 1);
}

#[tokio::test]
async fn test_add_failure_is_recorded_and_run_continues() {
    let server = MockServer::start().await;
    mount_playlist(&server, &[]).await;
    mount_isrc(&server, "GBAYE0601498", yesterday_song()).await;
    mount_no_equivalents(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/me/library/playlists/{PLAYLIST_ID}/tracks")))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let converter = converter_for(&server);
    let mut playlist = converter.prepare_playlist("Mix").await.unwrap();

    let first = converter
        .process_track(yesterday("GBAYE0601498"), &mut playlist)
        .await
        .unwrap();
    assert_eq!(first.result, Some(AddResult::Error));
    assert!(playlist.is_empty());

    // Not recorded as added, so the same song is attempted again.
    let second = converter
        .process_track(yesterday("GBAYE0601498"), &mut playlist)
        .await
        .unwrap();
    assert_eq!(second.search_status, Some(SearchStatus::Ok));
    assert_eq!(second.result, Some(AddResult::Error));
}

#[tokio::test]
async fn test_missing_playlist_is_created() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/library/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/me/library/playlists"))
        .and(body_json(json!({
            "attributes": { "name": "Road trip", "description": "created by tests" }
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "data": [{ "id": "p.new" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/me/library/playlists/p.new/tracks"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let converter = converter_for(&server);
    let playlist = converter.prepare_playlist("Road trip").await.unwrap();

    assert_eq!(playlist.id, "p.new");
    assert!(playlist.is_empty());
}

#[tokio::test]
async fn test_forbidden_playlist_creation_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/library/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/me/library/playlists"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let converter = converter_for(&server);
    let err = converter
        .convert("Road trip", vec![yesterday("")], |_, _| {})
        .await
        .unwrap_err();

    assert!(matches!(err, ConversionError::Forbidden { .. }));
    assert!(err.remediation().is_some());
}
