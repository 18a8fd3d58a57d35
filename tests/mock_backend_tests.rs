use playlist_plex_importer::api::mock::MockBackend;
use playlist_plex_importer::extract::ExtractionClient;
use playlist_plex_importer::importer::ImportController;
use playlist_plex_importer::models::{ImportForm, Song, TaskStatus};
use playlist_plex_importer::progress::{ProgressSnapshot, SessionState};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

fn song(title: &str, artist: &str) -> Song {
    Song {
        title: title.into(),
        artist: artist.into(),
        extra: BTreeMap::new(),
    }
}

fn status(v: serde_json::Value) -> TaskStatus {
    serde_json::from_value(v).unwrap()
}

/// Full extract-then-import flow against the in-crate mock backend,
/// the same shape a UI drives: extract, show songs, import, watch progress.
#[tokio::test]
async fn extract_then_import_flow_with_mock_backend() {
    let backend = Arc::new(
        MockBackend::new()
            .with_songs(vec![song("Blue", "Ana"), song("Red", "Bo")])
            .with_statuses(vec![
                status(json!({ "status": "pending", "message": "queued" })),
                status(json!({ "status": "processing", "processed": 1, "total": 2 })),
                status(json!({ "status": "completed", "processed": 2, "total": 2 })),
            ]),
    );

    let extractor = ExtractionClient::new(backend.clone());
    let playlist = extractor
        .extract("netease".parse().unwrap(), "123")
        .await
        .unwrap();
    assert_eq!(playlist.songs.len(), 2);
    assert_eq!(playlist.songs[0].title, "Blue");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ProgressSnapshot>();
    let mut ctrl = ImportController::new(backend, Arc::new(tx))
        .with_poll_interval(Duration::from_millis(5));

    let form = ImportForm {
        playlist_url: "https://music.163.com/#/playlist?id=123".into(),
        plex_url: "http://mock-plex:32400".into(),
        plex_token: "mock-token".into(),
        plex_playlist_name: "Plexlist".into(),
        import_mode: "create_new".into(),
    };
    ctrl.start_import(form).await.unwrap();

    let mut states = Vec::new();
    loop {
        let snap = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out")
            .expect("channel closed");
        let terminal = snap.state.is_terminal();
        states.push(snap);
        if terminal {
            break;
        }
    }

    let last = states.last().unwrap();
    assert_eq!(last.state, SessionState::Completed);
    assert_eq!(last.percent, Some(100));
    assert!(states
        .iter()
        .any(|s| s.state == SessionState::Polling && s.percent == Some(50)));
    assert!(states
        .iter()
        .any(|s| s.state == SessionState::Polling && s.message == "queued"));
}
