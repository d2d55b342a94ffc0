//! Personalization Pipeline - Single Entry Point
//!
//! CRITICAL: generate MUST validate the layout internally. No bypass.
//! Optional branding layers absorb their own failures; only the template
//! itself is a hard dependency.

use std::sync::Arc;

use base64::Engine as _;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::branding::BrandingSnapshot;
use crate::compose::{flatten, OutputFormat};
use crate::fetch::{FetchError, ImageFetcher};
use crate::layout::{ImageFit, ImageZone, LayoutConfig};
use crate::provenance::{job_hash, sha256_hex, snapshot_hash};
use crate::render::{render_fill, render_image, render_text, FontStore, Layer, RenderError};
use crate::validation::LayoutValidator;
use crate::zones::{resolve_zones, RenderTask};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("template fetch failed: {0}")]
    TemplateFetch(#[source] FetchError),

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub template_url: String,
    pub layout: LayoutConfig,
    pub branding: BrandingSnapshot,
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Engine output. The surrounding application uploads `bytes`, then records
/// the rest as its generated-asset row; the snapshot and hashes travel with
/// the asset for reproducibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub content_hash: String,
    pub snapshot_hash: String,
    pub job_hash: String,
    pub branding: BrandingSnapshot,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, self.format.extension())
    }

    /// Inline preview without a storage round trip.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.media_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// The personalization engine. Stateless between calls: every invocation
/// builds new buffers from its inputs.
pub struct PersonalizationEngine {
    fetcher: Arc<dyn ImageFetcher>,
    fonts: Arc<FontStore>,
    validator: LayoutValidator,
}

impl PersonalizationEngine {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, fonts: FontStore) -> Self {
        Self {
            fetcher,
            fonts: Arc::new(fonts),
            validator: LayoutValidator::new(),
        }
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedImage, EngineError> {
        // MANDATORY: validation runs before any fetch or pixel work.
        let report = self.validator.validate(&request.layout);
        if !report.valid {
            return Err(EngineError::InvalidLayout(report.summary()));
        }

        let template_bytes = self
            .fetcher
            .fetch(&request.template_url)
            .await
            .map_err(EngineError::TemplateFetch)?;
        let base = image::load_from_memory(&template_bytes)?.to_rgba8();
        let (width, height) = base.dimensions();

        let tasks = resolve_zones(&request.layout, &request.branding);
        debug!(
            template = %request.template_url,
            tasks = tasks.len(),
            "resolved zones"
        );

        // Layers render concurrently; join_all preserves task order so the
        // z-order stays fixed.
        let canvas = (request.layout.canvas_width, request.layout.canvas_height);
        let rendered = join_all(tasks.iter().map(|task| self.render_layer(task, canvas))).await;
        let layers: Vec<Layer> = rendered.into_iter().flatten().collect();

        let bytes = flatten(base, &layers, request.output_format)?;

        Ok(GeneratedImage {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            format: request.output_format,
            width,
            height,
            content_hash: sha256_hex(&bytes),
            snapshot_hash: snapshot_hash(&request.branding)?,
            job_hash: job_hash(
                &request.template_url,
                &request.layout,
                &request.branding,
                ENGINE_VERSION,
            )?,
            branding: request.branding.clone(),
            bytes,
        })
    }

    /// A broken branding asset drops its layer, never the request. Text and
    /// fill layers have no external fetch and cannot fail.
    async fn render_layer(&self, task: &RenderTask, canvas: (u32, u32)) -> Option<Layer> {
        match task {
            RenderTask::Photo { zone, url } => self.image_layer(task, zone, url, ImageFit::Cover).await,
            RenderTask::Logo { zone, url } => self.image_layer(task, zone, url, ImageFit::Inside).await,
            RenderTask::Name {
                zone,
                text,
                color,
                font_size,
            } => Some(render_text(
                text,
                zone,
                color,
                self.fonts.bold(),
                *font_size,
                canvas.0,
                canvas.1,
            )),
            RenderTask::Tagline {
                zone,
                text,
                color,
                font_size,
            } => Some(render_text(
                text,
                zone,
                color,
                self.fonts.regular(),
                *font_size,
                canvas.0,
                canvas.1,
            )),
            RenderTask::BrandBar { zone, color } => Some(render_fill(zone, color)),
        }
    }

    async fn image_layer(
        &self,
        task: &RenderTask,
        zone: &ImageZone,
        url: &str,
        default_fit: ImageFit,
    ) -> Option<Layer> {
        match self.fetch_and_render(url, zone, default_fit).await {
            Ok(layer) => Some(layer),
            Err(err) => {
                warn!(kind = task.kind(), url, error = %err, "dropping image layer");
                None
            }
        }
    }

    async fn fetch_and_render(
        &self,
        url: &str,
        zone: &ImageZone,
        default_fit: ImageFit,
    ) -> Result<Layer, RenderError> {
        let bytes = self.fetcher.fetch(url).await?;
        render_image(&bytes, zone, default_fit)
    }
}
