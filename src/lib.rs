//! symscan finds occurrences of small symbol templates inside a larger
//! drawing.
//!
//! Images are normalized into binary masks, every template is scored against
//! the target with ZNCC, overlapping candidates from all templates are pruned
//! by greedy IoU suppression, and the accepted boxes are drawn on a copy of
//! the original target. Optional features add row-parallel scanning
//! (`rayon`), a vectorized kernel (`simd`) and `tracing` instrumentation.

pub mod annotate;
pub mod cancel;
mod candidate;
pub mod color;
pub mod geometry;
pub mod image;
pub mod kernel;
pub mod normalize;
pub mod pipeline;
pub mod request;
pub mod search;
pub mod template;
mod trace;
pub mod util;

pub use annotate::{AnnotateConfig, Annotator};
pub use cancel::CancelToken;
pub use candidate::nms::{suppress, suppress_with_limit, IOU_SUPPRESSION_LIMIT};
pub use candidate::{Detection, DetectionId, DetectionPool, Peak};
pub use color::{Color, PALETTE};
pub use geometry::Rect;
pub use crate::image::{ImageView, OwnedImage};
pub use kernel::{Kernel, ScanParams};
pub use normalize::{BinaryMask, NormalizeConfig, Normalizer};
pub use pipeline::{ColorSource, DetectionReport, Pipeline, PipelineConfig, SkippedTemplate};
pub use request::{DetectionRequest, TemplateDescriptor, TemplateSource};
pub use search::{MatchConfig, Matcher, DEFAULT_THRESHOLD};
pub use template::{Template, TemplateId, TemplatePlan};
pub use util::{ImageId, MatchFailure, SymScanError, SymScanResult};
