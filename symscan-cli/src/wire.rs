//! JSON request/response shapes and base64 payload handling.

use base64::{prelude::BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};
use symscan::{
    DetectionReport, DetectionRequest, ImageId, Rect, SymScanError, SymScanResult,
    TemplateDescriptor, TemplateId,
};

/// Incoming request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireRequest {
    /// Target drawing, base64 or a data URI.
    pub blueprint_image: Option<String>,
    pub symbols: Option<Vec<WireSymbol>>,
    /// Older clients send bare template images here.
    pub symbol_image: Option<LegacySymbols>,
    pub threshold: Option<f32>,
}

/// One template: either an image of its own or an `[x, y, w, h]` box cut
/// out of the blueprint.
#[derive(Debug, Deserialize)]
pub struct WireSymbol {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub bbox: Option<[u32; 4]>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegacySymbols {
    One(String),
    Many(Vec<String>),
}

impl WireRequest {
    /// Decodes every payload and validates the result.
    pub fn into_request(self) -> SymScanResult<DetectionRequest> {
        let blueprint = self
            .blueprint_image
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| invalid("blueprint_image is required"))?;
        let target = decode_payload(&blueprint, ImageId::Target)?;

        let symbols = match (self.symbols, self.symbol_image) {
            (Some(symbols), _) if !symbols.is_empty() => symbols,
            (_, Some(LegacySymbols::One(image))) => vec![bare_symbol(image)],
            (_, Some(LegacySymbols::Many(images))) => {
                images.into_iter().map(bare_symbol).collect()
            }
            _ => return Err(invalid("symbols must list at least one template")),
        };

        let mut templates = Vec::with_capacity(symbols.len());
        for (idx, symbol) in symbols.into_iter().enumerate() {
            let id = TemplateId(idx);
            let mut desc = match (symbol.image, symbol.bbox) {
                (Some(image), None) => {
                    TemplateDescriptor::new(decode_payload(&image, ImageId::Template(id))?)?
                }
                (None, Some([x, y, w, h])) => TemplateDescriptor::from_region(Rect::new(x, y, w, h)?)?,
                _ => {
                    return Err(invalid(&format!(
                        "symbol {idx} needs exactly one of image or bbox"
                    )))
                }
            };
            if let Some(label) = symbol.label {
                desc = desc.with_label(label);
            }
            if let Some(color) = symbol.color.as_deref() {
                desc = desc.with_color_hex(color);
            }
            templates.push(desc);
        }

        DetectionRequest::new(target, templates, self.threshold)
    }
}

fn bare_symbol(image: String) -> WireSymbol {
    WireSymbol {
        image: Some(image),
        bbox: None,
        label: None,
        color: None,
    }
}

fn invalid(reason: &str) -> SymScanError {
    SymScanError::Validation {
        reason: reason.to_owned(),
    }
}

/// Strips an optional `data:<mime>;base64,` prefix and decodes the rest.
pub fn decode_payload(text: &str, image: ImageId) -> SymScanResult<Vec<u8>> {
    let text = text.trim();
    let body = match text.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, body)| body),
        None => text,
    };
    BASE64_STANDARD
        .decode(body)
        .map_err(|err| SymScanError::Decode {
            image,
            reason: format!("invalid base64: {err}"),
        })
}

pub fn encode_payload(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

#[derive(Debug, Serialize)]
pub struct WireDetection {
    pub id: String,
    pub template: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub confidence: f32,
    pub bbox: [u32; 4],
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct WireSkipped {
    pub template: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub reason: String,
}

/// Successful response body.
#[derive(Debug, Serialize)]
pub struct WireResponse {
    pub marked_image: String,
    pub symbol_count: usize,
    pub detections: Vec<WireDetection>,
    pub skipped_templates: Vec<WireSkipped>,
}

impl WireResponse {
    pub fn from_report(report: &DetectionReport, request: &DetectionRequest) -> Self {
        let label_of = |id: TemplateId| {
            request
                .templates()
                .get(id.index())
                .and_then(|t| t.label())
                .map(str::to_owned)
        };
        let detections = report
            .detections
            .iter()
            .map(|det| WireDetection {
                id: det.id.to_string(),
                template: det.template.index(),
                label: label_of(det.template),
                confidence: det.confidence,
                bbox: det.bbox.into(),
                color: det.color.to_string(),
            })
            .collect();
        let skipped_templates = report
            .skipped
            .iter()
            .map(|s| WireSkipped {
                template: s.template.index(),
                label: s.label.clone(),
                reason: s.reason.to_string(),
            })
            .collect();
        Self {
            marked_image: encode_payload(&report.annotated_png),
            symbol_count: report.symbol_count(),
            detections,
            skipped_templates,
        }
    }
}

/// Failure body. Internal failures carry a generic message.
#[derive(Debug, Serialize)]
pub struct WireError {
    pub error: String,
    pub kind: &'static str,
}

impl From<&SymScanError> for WireError {
    fn from(err: &SymScanError) -> Self {
        let kind = err.kind();
        let error = match kind {
            "internal" => "internal error while processing the request".to_owned(),
            _ => err.to_string(),
        };
        Self { error, kind }
    }
}
