mod common;

use common::{fast_typing, RecordingView};
use pretty_assertions::assert_eq;
use serde_json::json;
use video_insight::chat::{ChatEvent, CHAT_APOLOGY};
use video_insight::models::Speaker;
use video_insight::{AnalysisClient, ChatFlow};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn question_is_echoed_then_answer_typed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"question": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "Hi, ask me about the video."})))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnalysisClient::new(server.uri());
    let mut chat = ChatFlow::new(&client, fast_typing());
    let mut view = RecordingView::default();

    let answer = chat.send("hello", &mut view).await;

    assert_eq!(answer.as_deref(), Some("Hi, ask me about the video."));
    assert_eq!(view.chat[0], ChatEvent::UserMessage("hello".to_string()));
    assert_eq!(view.chat[1], ChatEvent::AssistantStarted);
    assert_eq!(view.revealed_text(), "Hi, ask me about the video.");
    let tail = &view.chat[view.chat.len() - 2..];
    assert_eq!(tail, [ChatEvent::Cursor { visible: false }, ChatEvent::AssistantFinished]);

    let speakers: Vec<_> = chat.transcript().entries().iter().map(|e| e.speaker).collect();
    assert_eq!(speakers, vec![Speaker::User, Speaker::Assistant]);
}

#[tokio::test]
async fn chat_error_shows_apology_and_next_question_works() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"question": "first"})))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"question": "second"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "fine"})))
        .mount(&server)
        .await;

    let client = AnalysisClient::new(server.uri());
    let mut chat = ChatFlow::new(&client, fast_typing());

    let mut view = RecordingView::default();
    assert_eq!(chat.send("first", &mut view).await.as_deref(), Some(CHAT_APOLOGY));
    assert_eq!(view.revealed_text(), CHAT_APOLOGY);

    let mut view = RecordingView::default();
    assert_eq!(chat.send("second", &mut view).await.as_deref(), Some("fine"));
    assert_eq!(view.revealed_text(), "fine");
    assert_eq!(chat.transcript().len(), 4);
}

#[tokio::test]
async fn cancelled_client_reveals_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "never"})))
        .mount(&server)
        .await;

    let client = AnalysisClient::new(server.uri());
    client.cancellation_token().cancel();
    let mut chat = ChatFlow::new(&client, fast_typing());
    let mut view = RecordingView::default();

    assert_eq!(chat.send("anything", &mut view).await.as_deref(), Some(CHAT_APOLOGY));
}
