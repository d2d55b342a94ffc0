//! Provenance Hashing - reproducible generation records
//!
//! Canonical JSON (sorted keys, no whitespace) keeps hashes stable
//! regardless of map iteration order.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::branding::BrandingSnapshot;
use crate::layout::LayoutConfig;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Hash of the branding snapshot embedded with a generated asset.
pub fn snapshot_hash(branding: &BrandingSnapshot) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(canonical_json(branding)?.as_bytes()))
}

/// Identifies a generation job for audit records:
/// job_hash = sha256(template_url : canonical_layout : canonical_snapshot : engine_version)
pub fn job_hash(
    template_url: &str,
    layout: &LayoutConfig,
    branding: &BrandingSnapshot,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let combined = format!(
        "{}:{}:{}:{}",
        template_url,
        canonical_json(layout)?,
        canonical_json(branding)?,
        engine_version
    );
    Ok(sha256_hex(combined.as_bytes()))
}

// We need hex encoding
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_hash_deterministic() {
        let data = b"test data";
        assert_eq!(sha256_hex(data), sha256_hex(data));
    }

    #[test]
    fn test_snapshot_hash_stable() {
        let branding = BrandingSnapshot {
            name: Some("Jane Doe".to_string()),
            color_primary: Some("#112233".to_string()),
            ..Default::default()
        };
        assert_eq!(snapshot_hash(&branding).unwrap(), snapshot_hash(&branding).unwrap());
    }

    #[test]
    fn test_job_hash_varies_with_inputs() {
        let layout = LayoutConfig::new(1080, 1080);
        let branding = BrandingSnapshot::default();
        let a = job_hash("https://cdn.example.com/t.png", &layout, &branding, "1.0.0").unwrap();
        let b = job_hash("https://cdn.example.com/other.png", &layout, &branding, "1.0.0").unwrap();
        let c = job_hash("https://cdn.example.com/t.png", &layout, &branding, "1.0.1").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
