// src/analysis_client.rs
use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{InsightError, InsightResult};
use crate::models::{ChatRequest, ChatResponse, MindmapDownload, TemplateData, UploadResponse};

pub const DEFAULT_MINDMAP_FILE_NAME: &str = "video_mindmap.xmind";

/// Operations the analysis service exposes.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// `POST /upload` with the file in the `video` multipart field.
    async fn upload_video(&self, path: &Path) -> InsightResult<UploadResponse>;
    /// `GET /template-data`.
    async fn template_data(&self) -> InsightResult<TemplateData>;
    /// `POST /chat`, returning the answer text.
    async fn ask(&self, question: &str) -> InsightResult<String>;
    /// `GET /download-mindmap?path=...`, streamed into `dest_dir` under the
    /// attachment name.
    async fn download_mindmap(&self, xmind_path: &str, dest_dir: &Path) -> InsightResult<MindmapDownload>;
    /// Checks that a video source can be fetched.
    async fn probe_video(&self, source: &str) -> InsightResult<()>;
}

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: String,
    cancel: CancellationToken,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &Config) -> InsightResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cancel: CancellationToken::new(),
        })
    }

    /// Cancelling this token aborts every in-flight and future request made
    /// through this client.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub fn mindmap_download_url(&self, xmind_path: &str) -> String {
        format!(
            "{}?path={}",
            self.endpoint("/download-mindmap"),
            urlencoding::encode(xmind_path)
        )
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> InsightResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();
        debug!(request_id = %request_id, endpoint = %endpoint, "outgoing request");

        let response = tokio::select! {
            _ = self.cancel.cancelled() => {
                info!(request_id = %request_id, endpoint = %endpoint, "🛑 Request cancelled");
                return Err(InsightError::Cancelled);
            }
            result = request.send() => result.map_err(|e| {
                error!(request_id = %request_id, endpoint = %endpoint, error = %e, "request failed");
                InsightError::from(e)
            })?,
        };

        let status = response.status();
        debug!(
            request_id = %request_id,
            endpoint = %endpoint,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "request completed"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!("Analysis service error on {} ({}): {}", endpoint, status, body);
            return Err(InsightError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Writes the body to `path` chunk by chunk, stopping as soon as the
    /// token is cancelled.
    async fn save_body(&self, response: Response, path: &Path) -> InsightResult<u64> {
        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        loop {
            let chunk = tokio::select! {
                _ = self.cancel.cancelled() => return Err(InsightError::Cancelled),
                chunk = stream.next() => chunk,
            };
            let Some(chunk) = chunk else { break };
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(written)
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> InsightResult<T> {
        let text = tokio::select! {
            _ = self.cancel.cancelled() => return Err(InsightError::Cancelled),
            text = response.text() => text?,
        };
        Ok(serde_json::from_str(&text)?)
    }
}

/// Content type sent with the upload, chosen by file extension.
pub fn video_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("mp4") => "video/mp4",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        _ => "application/octet-stream",
    }
}

/// Extracts `filename` from a `Content-Disposition` header value.
pub fn attachment_file_name(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[async_trait]
impl AnalysisBackend for AnalysisClient {
    async fn upload_video(&self, path: &Path) -> InsightResult<UploadResponse> {
        let endpoint = self.endpoint("/upload");
        let file = tokio::fs::File::open(path).await?;
        let length = file.metadata().await?.len();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());

        info!("📤 Uploading {} ({} bytes) to {}", file_name, length, endpoint);

        let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), length)
            .file_name(file_name)
            .mime_str(video_mime_type(path))?;
        let form = Form::new().part("video", part);

        let response = self.send(&endpoint, self.client.post(&endpoint).multipart(form)).await?;
        let upload: UploadResponse = self.read_json(response).await?;
        info!("✅ Upload finished with status '{}'", upload.status);
        Ok(upload)
    }

    async fn template_data(&self) -> InsightResult<TemplateData> {
        let endpoint = self.endpoint("/template-data");
        let response = self.send(&endpoint, self.client.get(&endpoint)).await?;
        let data = self.read_json(response).await?;
        info!("📋 Template data loaded");
        Ok(data)
    }

    async fn ask(&self, question: &str) -> InsightResult<String> {
        let endpoint = self.endpoint("/chat");
        let request = ChatRequest {
            question: question.to_string(),
        };
        let response = self
            .send(&endpoint, self.client.post(&endpoint).json(&request))
            .await?;
        let chat: ChatResponse = self.read_json(response).await?;
        Ok(chat.answer)
    }

    async fn download_mindmap(&self, xmind_path: &str, dest_dir: &Path) -> InsightResult<MindmapDownload> {
        let url = self.mindmap_download_url(xmind_path);
        info!("📥 Downloading mind map from {}", url);
        let response = self.send(&url, self.client.get(&url)).await?;

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(attachment_file_name)
            .and_then(|name| Path::new(&name).file_name()?.to_str().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_MINDMAP_FILE_NAME.to_string());

        tokio::fs::create_dir_all(dest_dir).await?;
        let path = dest_dir.join(&file_name);
        let size = match self.save_body(response, &path).await {
            Ok(size) => size,
            Err(e) => {
                // no half-written files left behind
                let _ = tokio::fs::remove_file(&path).await;
                return Err(e);
            }
        };

        info!("✅ Downloaded {} ({} bytes)", file_name, size);
        Ok(MindmapDownload { file_name, path, size })
    }

    async fn probe_video(&self, source: &str) -> InsightResult<()> {
        let url = self.endpoint(source);
        self.send(&url, self.client.head(&url)).await?;
        debug!("🎞️ Video source reachable: {}", url);
        Ok(())
    }
}
