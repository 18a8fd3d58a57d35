use mockito::Server;
use playlist_plex_importer::api::http::HttpBackend;
use playlist_plex_importer::api::ImportBackend;
use playlist_plex_importer::errors::ClientError;
use playlist_plex_importer::models::PlexConfig;
use serde_json::json;
use std::time::Duration;

#[test]
fn fetches_stored_plex_config() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/config/plex")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "plex_url": "http://plex:32400",
                "plex_token": "secret",
                "plex_playlist_name": "Plexlist",
                "plex_import_mode": "create_new"
            })
            .to_string(),
        )
        .create();

    let backend = HttpBackend::new(&server.url(), Duration::from_secs(5)).unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cfg = rt.block_on(backend.plex_config()).unwrap();
    assert_eq!(cfg.plex_url.as_deref(), Some("http://plex:32400"));
    assert_eq!(cfg.plex_import_mode.as_deref(), Some("create_new"));
}

#[test]
fn save_sends_only_set_fields() {
    let mut server = Server::new();
    let m = server
        .mock("POST", "/config/plex")
        .match_body(mockito::Matcher::Json(json!({
            "plex_playlist_name": "Summer"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "message": "saved" }).to_string())
        .create();

    let backend = HttpBackend::new(&server.url(), Duration::from_secs(5)).unwrap();
    let update = PlexConfig {
        plex_playlist_name: Some("Summer".into()),
        ..Default::default()
    };
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(backend.save_plex_config(&update)).unwrap();
    m.assert();
}

#[test]
fn save_failure_shares_error_normalization() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/config/plex")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(json!({ "detail": "could not write config file" }).to_string())
        .create();

    let backend = HttpBackend::new(&server.url(), Duration::from_secs(5)).unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let err = rt
        .block_on(backend.save_plex_config(&PlexConfig::default()))
        .unwrap_err();
    match err {
        ClientError::Request { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "could not write config file");
        }
        other => panic!("expected request error, got {:?}", other),
    }
}
