// src/view.rs
//! Visible surfaces of the client and their terminal rendering.

use std::io::{self, Write};

use crate::chat::ChatEvent;
use crate::error::RenderError;
use crate::mindmap;
use crate::models::MindmapDocument;
use crate::progress::ProgressTick;
use crate::summary::{self, SummaryBlock};

pub const VIDEO_LOAD_FAILED: &str = "Video failed to load, try refreshing or uploading again";

/// Everything the analysis and chat flows show to the user.
pub trait Presenter: Send {
    /// Blocking notice the user has to see.
    fn alert(&mut self, message: &str);
    fn set_loading(&mut self, loading: bool);
    fn show_analysis_panel(&mut self, visible: bool);
    fn progress(&mut self, tick: &ProgressTick);
    fn upload_accepted(&mut self, redirect_url: Option<&str>);
    fn show_summary(&mut self, summary: &str);
    fn show_mindmap(&mut self, outcome: &Result<MindmapDocument, RenderError>);
    fn show_video(&mut self, source: &str);
    /// Hides the player and leaves a persistent error panel.
    fn video_error(&mut self, message: &str);
    fn chat(&mut self, event: &ChatEvent);
}

const BAR_WIDTH: usize = 30;
const CURSOR: char = '▌';

/// Renders to stdout.
pub struct TerminalView {
    out: io::Stdout,
    cursor_drawn: bool,
    last_document: Option<MindmapDocument>,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            cursor_drawn: false,
            last_document: None,
        }
    }

    /// Document shown by the last successful mind-map render.
    pub fn last_document(&self) -> Option<&MindmapDocument> {
        self.last_document.as_ref()
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    fn erase_cursor(&mut self) {
        if self.cursor_drawn {
            let _ = write!(self.out, "\u{8} \u{8}");
            self.cursor_drawn = false;
        }
    }

    fn draw_cursor(&mut self) {
        if !self.cursor_drawn {
            let _ = write!(self.out, "{}", CURSOR);
            self.cursor_drawn = true;
        }
    }
}

pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

impl Presenter for TerminalView {
    fn alert(&mut self, message: &str) {
        let _ = writeln!(io::stderr(), "⚠️  {}", message);
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.line("⏳ Uploading...");
        }
    }

    fn show_analysis_panel(&mut self, visible: bool) {
        if visible {
            self.line("🔍 Analyzing video");
        }
    }

    fn progress(&mut self, tick: &ProgressTick) {
        let _ = write!(
            self.out,
            "\r{} {:>3}% | about {} s left | {}\x1b[K",
            progress_bar(tick.percent),
            tick.percent,
            tick.remaining_seconds,
            tick.message
        );
        if tick.percent >= 100 {
            let _ = writeln!(self.out);
        }
        let _ = self.out.flush();
    }

    fn upload_accepted(&mut self, redirect_url: Option<&str>) {
        match redirect_url {
            Some(url) => self.line(&format!("✅ Upload succeeded, results at {}", url)),
            None => self.line("✅ Upload succeeded"),
        }
    }

    fn show_summary(&mut self, text: &str) {
        self.line("");
        self.line("📝 Summary");
        for block in summary::parse(text) {
            match block {
                SummaryBlock::Title(title) => {
                    self.line("");
                    self.line(&format!("## {}", title));
                }
                SummaryBlock::Paragraph(paragraph) => self.line(&paragraph),
                SummaryBlock::ListItem(item) => self.line(&format!("  • {}", item)),
                SummaryBlock::Tags(tags) => self.line(&tags.join(" ")),
            }
        }
    }

    fn show_mindmap(&mut self, outcome: &Result<MindmapDocument, RenderError>) {
        self.line("");
        self.line("🧠 Mind map");
        match outcome {
            Ok(document) => {
                let text = mindmap::outline(&document.data);
                let _ = write!(self.out, "{}", text);
                self.last_document = Some(document.clone());
            }
            Err(e) => self.line(&e.to_string()),
        }
    }

    fn show_video(&mut self, source: &str) {
        self.line(&format!("🎞️ Video: {}", source));
    }

    fn video_error(&mut self, message: &str) {
        self.line(&format!("❌ {}", message));
    }

    fn chat(&mut self, event: &ChatEvent) {
        match event {
            ChatEvent::UserMessage(text) => self.line(&format!("You: {}", text)),
            ChatEvent::AssistantStarted => {
                let _ = write!(self.out, "AI: ");
                self.draw_cursor();
            }
            ChatEvent::Cursor { visible: true } => self.draw_cursor(),
            ChatEvent::Cursor { visible: false } => self.erase_cursor(),
            ChatEvent::Char(ch) => {
                let redraw = self.cursor_drawn;
                self.erase_cursor();
                let _ = write!(self.out, "{}", ch);
                if redraw {
                    self.draw_cursor();
                }
            }
            ChatEvent::AssistantFinished => {
                self.erase_cursor();
                self.line("");
            }
        }
        let _ = self.out.flush();
    }
}
