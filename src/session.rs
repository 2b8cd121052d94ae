// src/session.rs
//! Upload, fallback and result presentation for one client session.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::analysis_client::AnalysisBackend;
use crate::error::{InsightError, InsightResult};
use crate::mindmap;
use crate::models::AnalysisResult;
use crate::progress::{ProgressConfig, ProgressSimulator};
use crate::template;
use crate::view::{Presenter, VIDEO_LOAD_FAILED};

pub const MINDMAP_FETCH_FAILED: &str = "Could not fetch the mind map, please try again later";

/// State that lives as long as the client: the shown analysis and the
/// mind-map file the service last pointed at.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub analysis: Option<AnalysisResult>,
    pub xmind_path: Option<String>,
}

/// Where the simulated flow got its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackSource {
    TemplateData,
    Embedded,
}

/// Why the simulated flow ran instead of showing a real upload result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NoFileSelected,
    /// Transport failure or non-2xx response.
    UploadFailed(String),
    /// 2xx response whose `status` was not `success`.
    UploadRejected(String),
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Uploaded {
        redirect_url: Option<String>,
        analysis: Option<AnalysisResult>,
    },
    Simulated {
        analysis: AnalysisResult,
        source: FallbackSource,
        reason: FallbackReason,
    },
}

pub struct AnalysisFlow<B: AnalysisBackend> {
    backend: B,
    progress: ProgressConfig,
    max_upload_bytes: u64,
}

impl<B: AnalysisBackend> AnalysisFlow<B> {
    pub fn new(backend: B, progress: ProgressConfig, max_upload_bytes: u64) -> Self {
        Self {
            backend,
            progress,
            max_upload_bytes,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetches template data ahead of time so a download works before any
    /// analysis. Failures are only logged.
    pub async fn preload_template(&self, session: &mut SessionState) {
        match self.backend.template_data().await {
            Ok(data) => {
                if data.xmind_path.is_some() {
                    session.xmind_path = data.xmind_path;
                }
                info!("📋 Template data preloaded");
            }
            Err(e) => error!("Template data preload failed: {}", e),
        }
    }

    /// Template data from the service, or the embedded payload when the
    /// service cannot provide it.
    pub async fn template_or_embedded(&self) -> AnalysisResult {
        match self.backend.template_data().await {
            Ok(data) => data.into(),
            Err(e) => {
                error!("Template data fetch failed: {}", e);
                template::embedded_payload()
            }
        }
    }

    /// Uploads `file` and shows the result.
    ///
    /// Only an oversized or unreadable file is returned as an error; it is
    /// alerted and nothing is sent. Any upload failure, and a missing file,
    /// switch to template data replayed through the progress simulation.
    pub async fn submit(
        &self,
        session: &mut SessionState,
        file: Option<&Path>,
        view: &mut dyn Presenter,
    ) -> InsightResult<SubmitOutcome> {
        view.set_loading(true);

        let Some(path) = file else {
            info!("No file selected, showing template analysis");
            return self
                .simulate_from_template(session, view, FallbackReason::NoFileSelected)
                .await;
        };

        if let Err(e) = self.check_upload_size(path).await {
            match &e {
                InsightError::FileTooLarge { limit, .. } => view.alert(&format!(
                    "File size exceeds the limit ({}MB)",
                    limit / (1024 * 1024)
                )),
                other => view.alert(&format!("Could not read the selected file: {}", other)),
            }
            view.set_loading(false);
            return Err(e);
        }

        let reason = match self.backend.upload_video(path).await {
            Ok(response) if response.is_success() => {
                view.set_loading(false);
                view.upload_accepted(response.redirect_url.as_deref());
                let analysis = response.analysis();
                if let Some(analysis) = &analysis {
                    self.present(session, analysis.clone(), view).await;
                }
                return Ok(SubmitOutcome::Uploaded {
                    redirect_url: response.redirect_url,
                    analysis,
                });
            }
            Ok(response) => {
                let message = response.error.unwrap_or_else(|| "Upload failed".to_string());
                warn!("Upload rejected by service: {}", message);
                FallbackReason::UploadRejected(message)
            }
            Err(e) => {
                error!("Upload failed: {}", e);
                FallbackReason::UploadFailed(e.to_string())
            }
        };

        self.simulate_from_template(session, view, reason).await
    }

    async fn check_upload_size(&self, path: &Path) -> InsightResult<u64> {
        let size = tokio::fs::metadata(path).await?.len();
        if size > self.max_upload_bytes {
            return Err(InsightError::FileTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }
        Ok(size)
    }

    async fn simulate_from_template(
        &self,
        session: &mut SessionState,
        view: &mut dyn Presenter,
        reason: FallbackReason,
    ) -> InsightResult<SubmitOutcome> {
        view.set_loading(false);
        view.show_analysis_panel(true);

        let data = match self.backend.template_data().await {
            Ok(data) => Some(AnalysisResult::from(data)),
            Err(e) => {
                error!("Template data fetch failed: {}", e);
                None
            }
        };
        let source = if data.is_some() {
            FallbackSource::TemplateData
        } else {
            FallbackSource::Embedded
        };

        let mut simulator = ProgressSimulator::new(self.progress.clone())?;
        let analysis = simulator
            .run_with_fallback(data, template::embedded_payload, |tick| view.progress(tick), |result| result)
            .await?;

        view.show_analysis_panel(false);
        self.present(session, analysis.clone(), view).await;

        Ok(SubmitOutcome::Simulated {
            analysis,
            source,
            reason,
        })
    }

    /// Shows video, summary and mind map, then records the analysis in the
    /// session.
    pub async fn present(&self, session: &mut SessionState, analysis: AnalysisResult, view: &mut dyn Presenter) {
        if analysis.xmind_path.is_some() {
            session.xmind_path = analysis.xmind_path.clone();
        }

        let source = analysis.video_source();
        view.show_video(source);
        if let Err(e) = self.backend.probe_video(source).await {
            error!("Video load error for {}: {}", source, e);
            view.video_error(VIDEO_LOAD_FAILED);
            view.alert(VIDEO_LOAD_FAILED);
        }

        view.show_summary(&analysis.summary);
        view.show_mindmap(&mindmap::render_document(analysis.mindmap.as_ref()));

        session.analysis = Some(analysis);
    }

    /// Downloads the session's mind-map file into `dest_dir`.
    ///
    /// Without a known path the template data is asked for one first.
    /// Service failures are alerted and yield `Ok(None)`.
    pub async fn download_mindmap(
        &self,
        session: &mut SessionState,
        dest_dir: &Path,
        view: &mut dyn Presenter,
    ) -> InsightResult<Option<PathBuf>> {
        let xmind_path = match session.xmind_path.clone() {
            Some(path) => path,
            None => match self.backend.template_data().await {
                Ok(data) => match data.xmind_path {
                    Some(path) => path,
                    None => {
                        view.alert(MINDMAP_FETCH_FAILED);
                        return Ok(None);
                    }
                },
                Err(e) => {
                    error!("Template data fetch failed: {}", e);
                    view.alert(MINDMAP_FETCH_FAILED);
                    return Ok(None);
                }
            },
        };
        session.xmind_path = Some(xmind_path.clone());

        match self.backend.download_mindmap(&xmind_path, dest_dir).await {
            Ok(download) => {
                info!("💾 Saved mind map to {}", download.path.display());
                Ok(Some(download.path))
            }
            Err(e) => {
                error!("Mind map download failed: {}", e);
                view.alert(MINDMAP_FETCH_FAILED);
                Ok(None)
            }
        }
    }
}
