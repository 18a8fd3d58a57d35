use mockito::Server;
use playlist_plex_importer::api::http::HttpBackend;
use playlist_plex_importer::api::ImportBackend;
use playlist_plex_importer::errors::ClientError;
use playlist_plex_importer::extract::ExtractionClient;
use playlist_plex_importer::models::Source;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn backend_for(server: &Server) -> Arc<dyn ImportBackend> {
    Arc::new(HttpBackend::new(&server.url(), Duration::from_secs(5)).unwrap())
}

#[test]
fn extract_returns_songs_in_playlist_order() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/playlist/extract")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "playlist_title": "Road Trip",
                "songs": [
                    { "title": "First", "artist": "A" },
                    { "title": "Second", "artist": "B" },
                    { "title": "Third", "artist": "C" }
                ]
            })
            .to_string(),
        )
        .create();

    let client = ExtractionClient::new(backend_for(&server));
    let rt = tokio::runtime::Runtime::new().unwrap();
    let playlist = rt
        .block_on(client.extract(Source::Netease, " 123456 "))
        .unwrap();

    assert_eq!(playlist.playlist_title, "Road Trip");
    let titles: Vec<_> = playlist.songs.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[test]
fn empty_playlist_is_ok_and_distinct_from_failure() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/playlist/extract")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "playlist_title": "", "songs": [] }).to_string())
        .create();

    let client = ExtractionClient::new(backend_for(&server));
    let rt = tokio::runtime::Runtime::new().unwrap();
    let playlist = rt.block_on(client.extract(Source::Qq, "42")).unwrap();
    assert!(playlist.songs.is_empty());
}

#[test]
fn extract_failure_carries_normalized_detail() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/playlist/extract")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(json!({ "detail": "playlist not found or not public" }).to_string())
        .expect(1)
        .create();

    let client = ExtractionClient::new(backend_for(&server));
    let rt = tokio::runtime::Runtime::new().unwrap();
    let err = rt
        .block_on(client.extract(Source::Netease, "nope"))
        .unwrap_err();

    match err {
        ClientError::Request { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "playlist not found or not public");
        }
        other => panic!("expected request error, got {:?}", other),
    }

    // One exchange per call, no retry.
    _m.assert();
}

#[test]
fn extract_sends_source_and_locator_on_the_wire() {
    let mut server = Server::new();
    let m = server
        .mock("POST", "/playlist/extract")
        .match_body(mockito::Matcher::Json(json!({
            "source": "qq",
            "url_or_id": "7654321"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "songs": [] }).to_string())
        .create();

    let client = ExtractionClient::new(backend_for(&server));
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(client.extract(Source::Qq, "7654321")).unwrap();
    m.assert();
}
