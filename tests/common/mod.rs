#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use video_insight::chat::ChatEvent;
use video_insight::models::MindmapDocument;
use video_insight::progress::{ProgressConfig, ProgressTick};
use video_insight::{Presenter, RenderError, TypingConfig};

/// Records everything the flows show.
#[derive(Default)]
pub struct RecordingView {
    pub alerts: Vec<String>,
    pub loading: Vec<bool>,
    pub analysis_panel: Vec<bool>,
    pub ticks: Vec<ProgressTick>,
    pub accepted: Vec<Option<String>>,
    pub summaries: Vec<String>,
    pub mindmaps: Vec<Result<MindmapDocument, String>>,
    pub videos: Vec<String>,
    pub video_errors: Vec<String>,
    pub chat: Vec<ChatEvent>,
}

impl RecordingView {
    pub fn revealed_text(&self) -> String {
        self.chat
            .iter()
            .filter_map(|e| match e {
                ChatEvent::Char(c) => Some(*c),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingView {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
    fn set_loading(&mut self, loading: bool) {
        self.loading.push(loading);
    }
    fn show_analysis_panel(&mut self, visible: bool) {
        self.analysis_panel.push(visible);
    }
    fn progress(&mut self, tick: &ProgressTick) {
        self.ticks.push(tick.clone());
    }
    fn upload_accepted(&mut self, redirect_url: Option<&str>) {
        self.accepted.push(redirect_url.map(str::to_string));
    }
    fn show_summary(&mut self, summary: &str) {
        self.summaries.push(summary.to_string());
    }
    fn show_mindmap(&mut self, outcome: &Result<MindmapDocument, RenderError>) {
        self.mindmaps
            .push(outcome.as_ref().map(Clone::clone).map_err(|e| e.to_string()));
    }
    fn show_video(&mut self, source: &str) {
        self.videos.push(source.to_string());
    }
    fn video_error(&mut self, message: &str) {
        self.video_errors.push(message.to_string());
    }
    fn chat(&mut self, event: &ChatEvent) {
        self.chat.push(event.clone());
    }
}

pub fn fast_progress() -> ProgressConfig {
    ProgressConfig {
        total_duration: Duration::from_millis(40),
        tick: Duration::from_millis(10),
        settle_delay: Duration::from_millis(5),
        ..Default::default()
    }
}

pub fn fast_typing() -> TypingConfig {
    TypingConfig {
        thinking_delay: Duration::from_millis(20),
        char_delay: Duration::from_millis(1),
        jitter: Duration::ZERO,
        cursor_blink: Duration::from_millis(5),
    }
}

pub fn template_body() -> Value {
    json!({
        "status": "success",
        "summary": "This is a sample analysis result.",
        "mindmap": {
            "root": {
                "text": "Sample mind map",
                "children": [
                    {"text": "Topic 1", "children": [{"text": "Subtopic 1.1"}, {"text": "Subtopic 1.2"}]},
                    {"text": "Topic 2", "children": [{"text": "Subtopic 2.1"}]}
                ]
            }
        },
        "xmind_path": "/tmp/example.xmind"
    })
}
