//! BrandCast Core - Template Personalization Engine
//!
//! # Engine Guarantees (Non-Negotiable)
//! 1. Layouts Are Contracts
//! 2. Validation Runs Before Pixels
//! 3. Z-Order Is Fixed, Output Is Deterministic
//! 4. Missing Branding Skips The Layer, Never The Request
//! 5. Snapshots Enable Reproduction

pub mod branding;
pub mod caption;
pub mod compose;
pub mod engine;
pub mod fetch;
pub mod layout;
pub mod provenance;
pub mod render;
pub mod validation;
pub mod zones;

pub use branding::{resolve_color, BrandingSnapshot};
pub use caption::{
    platform_char_limit, AnthropicGenerator, CaptionRewriter, RewriteError, TextGenerator,
    VoiceProfile,
};
pub use compose::{compose, OutputFormat};
pub use engine::{EngineError, GenerateRequest, GeneratedImage, PersonalizationEngine};
pub use fetch::{FetchError, HttpImageFetcher, ImageFetcher};
pub use layout::{FillZone, ImageFit, ImageZone, LayoutConfig, TextZone, ZoneShape, Zones};
pub use provenance::{canonical_json, job_hash, sha256_hex, snapshot_hash};
pub use render::{FontStore, Layer};
pub use validation::{LayoutValidator, LayoutViolation, ValidationReport};
pub use zones::{resolve_zones, RenderTask};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
