// src/models/analysis.rs
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::mindmap::MindmapData;

/// Video source used when no uploaded video path is known.
pub const FIXED_VIDEO_SOURCE: &str = "/fixed-video";

/// Response of `POST /upload`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mindmap: Option<MindmapData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmind_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// The analysis carried inline, when the service sent one.
    pub fn analysis(&self) -> Option<AnalysisResult> {
        let summary = self.summary.clone()?;
        Some(AnalysisResult {
            summary,
            mindmap: self.mindmap.clone(),
            xmind_path: self.xmind_path.clone(),
            video_path: self.video_path.clone(),
        })
    }
}

/// Response of `GET /template-data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mindmap: Option<MindmapData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmind_path: Option<String>,
}

impl From<TemplateData> for AnalysisResult {
    fn from(data: TemplateData) -> Self {
        Self {
            summary: data.summary,
            mindmap: data.mindmap,
            xmind_path: data.xmind_path,
            video_path: None,
        }
    }
}

/// Summary plus mind map, whether real or fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mindmap: Option<MindmapData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmind_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
}

impl AnalysisResult {
    pub fn video_source(&self) -> &str {
        self.video_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .unwrap_or(FIXED_VIDEO_SOURCE)
    }
}

/// Mind-map file saved to disk.
#[derive(Debug, Clone)]
pub struct MindmapDownload {
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
}
