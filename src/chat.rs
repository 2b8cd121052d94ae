// src/chat.rs
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::analysis_client::AnalysisBackend;
use crate::models::{ChatTranscript, Speaker};
use crate::view::Presenter;

/// Shown in place of an answer when the chat request fails.
pub const CHAT_APOLOGY: &str = "Sorry, something went wrong while handling your question.";

#[derive(Debug, Clone)]
pub struct TypingConfig {
    /// Pause before the question is sent.
    pub thinking_delay: Duration,
    /// Base delay between revealed characters.
    pub char_delay: Duration,
    /// Maximum random deviation from `char_delay`, either way.
    pub jitter: Duration,
    pub cursor_blink: Duration,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            thinking_delay: Duration::from_millis(2000),
            char_delay: Duration::from_millis(100),
            jitter: Duration::from_millis(20),
            cursor_blink: Duration::from_millis(500),
        }
    }
}

impl TypingConfig {
    fn next_char_delay(&self) -> Duration {
        let base = self.char_delay.as_millis() as i64;
        let jitter = self.jitter.as_millis() as i64;
        let offset = if jitter > 0 {
            rand::thread_rng().gen_range(-jitter..=jitter)
        } else {
            0
        };
        Duration::from_millis((base + offset).max(0) as u64)
    }
}

/// What the chat pane shows, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    UserMessage(String),
    /// An empty assistant message with a visible cursor was added.
    AssistantStarted,
    Cursor { visible: bool },
    Char(char),
    AssistantFinished,
}

/// One chat session against the analysis service.
pub struct ChatFlow<'a, B: AnalysisBackend + ?Sized> {
    backend: &'a B,
    typing: TypingConfig,
    transcript: ChatTranscript,
}

impl<'a, B: AnalysisBackend + ?Sized> ChatFlow<'a, B> {
    pub fn new(backend: &'a B, typing: TypingConfig) -> Self {
        Self {
            backend,
            typing,
            transcript: ChatTranscript::new(),
        }
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// Sends `question` and reveals the answer character by character.
    ///
    /// The user message is shown immediately. Blank questions are ignored
    /// and return `None`. A failed request reveals [`CHAT_APOLOGY`] instead
    /// of an answer.
    pub async fn send(&mut self, question: &str, view: &mut dyn Presenter) -> Option<String> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        self.transcript.push(Speaker::User, question);
        view.chat(&ChatEvent::UserMessage(question.to_string()));
        view.chat(&ChatEvent::AssistantStarted);

        let mut cursor = CursorBlink::new(self.typing.cursor_blink);

        cursor
            .blink_during(tokio::time::sleep(self.typing.thinking_delay), view)
            .await;

        let answer = match cursor.blink_during(self.backend.ask(question), view).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Chat error: {}", e);
                CHAT_APOLOGY.to_string()
            }
        };

        for ch in answer.chars() {
            view.chat(&ChatEvent::Char(ch));
            cursor
                .blink_during(tokio::time::sleep(self.typing.next_char_delay()), view)
                .await;
        }

        view.chat(&ChatEvent::Cursor { visible: false });
        view.chat(&ChatEvent::AssistantFinished);
        self.transcript.push(Speaker::Assistant, answer.clone());
        Some(answer)
    }
}

struct CursorBlink {
    interval: Interval,
    visible: bool,
}

impl CursorBlink {
    fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            interval,
            visible: true,
        }
    }

    /// Drives `fut` to completion, toggling the cursor on every blink.
    async fn blink_during<F: Future>(&mut self, fut: F, view: &mut dyn Presenter) -> F::Output {
        tokio::pin!(fut);
        loop {
            tokio::select! {
                output = &mut fut => return output,
                _ = self.interval.tick() => {
                    self.visible = !self.visible;
                    view.chat(&ChatEvent::Cursor { visible: self.visible });
                }
            }
        }
    }
}
