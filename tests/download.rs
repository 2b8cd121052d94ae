mod common;

use common::{fast_progress, template_body, RecordingView};
use pretty_assertions::assert_eq;
use video_insight::session::MINDMAP_FETCH_FAILED;
use video_insight::{AnalysisClient, AnalysisFlow, SessionState};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn flow_for(server: &MockServer) -> AnalysisFlow<AnalysisClient> {
    AnalysisFlow::new(AnalysisClient::new(server.uri()), fast_progress(), 50 * 1024 * 1024)
}

#[tokio::test]
async fn download_uses_session_path_and_attachment_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-mindmap"))
        .and(query_param("path", "/tmp/my map.xmind"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"video_mindmap.xmind\"")
                .set_body_bytes(b"PK\x03\x04xmind".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let flow = flow_for(&server);
    let mut session = SessionState {
        xmind_path: Some("/tmp/my map.xmind".to_string()),
        ..Default::default()
    };
    let mut view = RecordingView::default();

    let saved = flow
        .download_mindmap(&mut session, dir.path(), &mut view)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(saved, dir.path().join("video_mindmap.xmind"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"PK\x03\x04xmind".to_vec());
    assert!(view.alerts.is_empty());
}

#[tokio::test]
async fn download_without_path_asks_template_data_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/template-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download-mindmap"))
        .and(query_param("path", "/tmp/example.xmind"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"map".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let flow = flow_for(&server);
    let mut session = SessionState::default();
    let mut view = RecordingView::default();

    let saved = flow
        .download_mindmap(&mut session, dir.path(), &mut view)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(saved.file_name().unwrap(), "video_mindmap.xmind");
    assert_eq!(session.xmind_path.as_deref(), Some("/tmp/example.xmind"));
}

#[tokio::test]
async fn download_failure_is_alerted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/template-data"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let flow = flow_for(&server);
    let mut session = SessionState::default();
    let mut view = RecordingView::default();

    let saved = flow
        .download_mindmap(&mut session, dir.path(), &mut view)
        .await
        .unwrap();

    assert!(saved.is_none());
    assert_eq!(view.alerts, vec![MINDMAP_FETCH_FAILED.to_string()]);
}

#[tokio::test]
async fn preload_records_template_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/template-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_body()))
        .mount(&server)
        .await;

    let flow = flow_for(&server);
    let mut session = SessionState::default();
    flow.preload_template(&mut session).await;

    assert_eq!(session.xmind_path.as_deref(), Some("/tmp/example.xmind"));
    assert!(session.analysis.is_none());
}
