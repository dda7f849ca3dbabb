//! # Incremental width measurement
//!
//! Shaping is context-sensitive — kerning and ligatures mean
//! `width(a) + width(b) != width(a + b)` in general. The item generator
//! measures each new stem by shaping the *whole accumulated prefix* and
//! subtracting the previously-measured width, rather than shaping each
//! piece in isolation (spec §4.1). Ported from the teacher's
//! `shaping::shaped_width`, generalized from "one shape call per piece" to
//! "one shape call per growing prefix".

use crate::font::Font;
use crate::Error;

/// Sum of `x_advance` over every shaped glyph in `text`.
pub fn shape_width(font: &dyn Font, text: &str) -> Result<f64, Error> {
    if text.is_empty() {
        return Ok(0.0);
    }
    Ok(font.shape(text)?.iter().map(|g| g.x_advance).sum())
}

/// Accumulates a paragraph's already-measured prefix so each new stem can
/// be measured in the context of what precedes it.
#[derive(Debug, Default)]
pub struct StemAccumulator {
    stems: String,
    running_width: f64,
}

impl StemAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `stem` to the accumulated prefix and return the width that
    /// stem alone contributed, given everything measured before it.
    pub fn push(&mut self, font: &dyn Font, stem: &str) -> Result<f64, Error> {
        self.stems.push_str(stem);
        let total = shape_width(font, &self.stems)?;
        let delta = total - self.running_width;
        self.running_width = total;
        Ok(delta)
    }

    /// Discard the accumulated prefix. Called whenever a break is imminent
    /// (an empty line-break-unit stem) so the next stem is measured fresh.
    pub fn reset(&mut self) {
        self.stems.clear();
        self.running_width = 0.0;
    }
}
