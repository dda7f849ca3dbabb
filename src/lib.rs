//! # parabreak
//!
//! The paragraph line-breaking core of a typesetting engine: segment text
//! by Unicode line-break rules, measure its shaped width under a font, and
//! emit a box/glue/penalty item stream — then search it for either greedy
//! or Knuth-Plass optimal break points.
//!
//! ## Architecture
//!
//! ```text
//! text ── (hyphenate?) ──▶ [generate] ──▶ items ──▶ [greedy | optimal] ──▶ break indices
//!                              ▲
//!                    [font] + [segment]
//! ```
//!
//! [`font::Font`], [`segment::Segmenter`], and [`hyphenate::Hyphenator`] are
//! the external collaborators: text shaping, Unicode segmentation, and
//! hyphenation are modeled as traits so callers can plug in their own
//! backends, but each ships one concrete, real implementation so the crate
//! is usable standalone.

pub mod error;
pub mod font;
pub mod generate;
pub mod greedy;
pub mod hyphenate;
pub mod item;
pub mod measure;
pub mod optimal;
pub mod segment;

pub use error::Error;
pub use font::{Font, Glyph, RustybuzzFont};
pub use generate::{items, items_default};
pub use greedy::greedy_line_breaks;
pub use hyphenate::{HypherHyphenator, Hyphenator};
pub use item::ParagraphItem;
pub use optimal::{optimal_line_breaks, OptimiserParams};
pub use segment::{Segmenter, UnicodeSegmenter};

/// Target-width plus tuning parameters for a full break pass, as a single
/// config-as-data value (so callers can load it from JSON/TOML rather than
/// constructing it in code — the same role `serde` plays for
/// `danmolitor-forme`'s document model, scoped here to breaker tuning).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBreakConfig {
    pub width: f64,
    #[serde(default)]
    pub params: OptimiserParams,
}

impl LineBreakConfig {
    pub fn new(width: f64) -> Self {
        LineBreakConfig {
            width,
            params: OptimiserParams::default(),
        }
    }
}

/// Convenience: shape `text` under `font`, generate its items with the
/// default Unicode segmenter, and return the optimal break indices at
/// `config.width`.
pub fn break_paragraph(
    text: &str,
    font: &dyn Font,
    config: &LineBreakConfig,
) -> Result<Vec<usize>, Error> {
    let paragraph_items = items_default(text, font)?;
    Ok(optimal_line_breaks(&paragraph_items, config.width, &config.params))
}
