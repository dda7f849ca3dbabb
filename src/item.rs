//! # Paragraph Item Model
//!
//! The box/glue/penalty representation that the item generator emits and
//! both line breakers consume. Kept as a tagged enum rather than a single
//! struct with a `kind` field and unused slots — every downstream match is
//! exhaustive and a `Penalty` can't carry a stray `text`.

/// Penalties at or beyond this value are treated as "forbidden to break".
pub const MAX_PENALTY: f64 = 1e6;

/// Stretchability at or beyond this value is treated as "infinitely elastic".
pub const MAX_STRETCH: f64 = 1e5;

/// One atom in a paragraph's item stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphItem {
    /// Fixed-width typeset material.
    Box {
        width: f64,
        /// The substring of the source text this box renders.
        text: String,
    },
    /// Elastic inter-word spacing.
    Glue {
        width: f64,
        stretchability: f64,
        shrinkability: f64,
        /// The substring of the source text this glue represents, if any.
        text: String,
    },
    /// A permitted or forced break candidate. `width` is only realized on
    /// the line if the break is actually taken here (e.g. a discretionary
    /// hyphen).
    Penalty {
        width: f64,
        penalty: f64,
        flagged: bool,
    },
}

impl ParagraphItem {
    /// A fixed-width box. Errors if `width` is negative or non-finite.
    pub fn new_box(width: f64, text: impl Into<String>) -> Result<Self, crate::Error> {
        validate_nonneg("box width", width)?;
        Ok(ParagraphItem::Box {
            width,
            text: text.into(),
        })
    }

    /// Elastic glue. Errors if any of the three magnitudes are negative or
    /// non-finite.
    pub fn new_glue(
        width: f64,
        stretchability: f64,
        shrinkability: f64,
        text: impl Into<String>,
    ) -> Result<Self, crate::Error> {
        validate_nonneg("glue width", width)?;
        validate_nonneg("glue stretchability", stretchability)?;
        validate_nonneg("glue shrinkability", shrinkability)?;
        Ok(ParagraphItem::Glue {
            width,
            stretchability,
            shrinkability,
            text: text.into(),
        })
    }

    /// A break candidate. `penalty` may be any finite value, or
    /// `±MAX_PENALTY`/`±infinity` to forbid/force the break; `width` (the
    /// material that appears if the break is taken, e.g. a hyphen) must
    /// still be non-negative and finite.
    pub fn new_penalty(width: f64, penalty: f64, flagged: bool) -> Result<Self, crate::Error> {
        validate_nonneg("penalty width", width)?;
        if penalty.is_nan() {
            return Err(crate::Error::InvalidItem("penalty must not be NaN".into()));
        }
        Ok(ParagraphItem::Penalty {
            width,
            penalty,
            flagged,
        })
    }

    /// Is this a break forced no matter what (e.g. an explicit paragraph end)?
    pub fn is_forced_break(&self) -> bool {
        matches!(self, ParagraphItem::Penalty { penalty, .. } if *penalty <= -MAX_PENALTY)
    }

    /// Width this item contributes to a line's natural width when it is
    /// *not* the break taken at the end of the line (i.e. during prefix-sum
    /// accumulation). Penalties never contribute width this way.
    pub fn running_width(&self) -> f64 {
        match self {
            ParagraphItem::Box { width, .. } => *width,
            ParagraphItem::Glue { width, .. } => *width,
            ParagraphItem::Penalty { .. } => 0.0,
        }
    }
}

fn validate_nonneg(label: &str, value: f64) -> Result<(), crate::Error> {
    if !value.is_finite() || value < 0.0 {
        return Err(crate::Error::InvalidItem(format!(
            "{label} must be a non-negative finite number, got {value}"
        )));
    }
    Ok(())
}

/// Cumulative `(width, stretch, shrink)` up to some item index. Penalties
/// never contribute; only `Box`/`Glue` advance it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningSum {
    pub width: f64,
    pub stretch: f64,
    pub shrink: f64,
}

impl RunningSum {
    /// Advance the running sum by one item's contribution.
    pub fn advance(self, item: &ParagraphItem) -> Self {
        match item {
            ParagraphItem::Box { width, .. } => RunningSum {
                width: self.width + width,
                ..self
            },
            ParagraphItem::Glue {
                width,
                stretchability,
                shrinkability,
                ..
            } => RunningSum {
                width: self.width + width,
                stretch: self.stretch + stretchability,
                shrink: self.shrink + shrinkability,
            },
            ParagraphItem::Penalty { .. } => self,
        }
    }
}

/// A candidate break point captured mid-scan: the item it sits at, its
/// index, and the running sum accumulated *before* this item.
#[derive(Debug, Clone)]
pub struct BreakPoint {
    pub item_idx: usize,
    pub item: ParagraphItem,
    pub running_sum: RunningSum,
}
