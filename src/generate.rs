//! # Item generator
//!
//! Converts paragraph text into a `ParagraphItem` sequence: ported from
//! `original_source/typesetting/layout/_types.py::text_to_paragraph_items`
//! (the teacher's own `knuth_plass::build_items` reimplements the same
//! shape over `char`/`char_widths` slices; this version follows the
//! original's text-and-`Font`-trait shape instead, since widths here come
//! from the `Font`/`measure` abstraction rather than precomputed per-char
//! arrays).

use crate::font::Font;
use crate::item::ParagraphItem;
use crate::measure::{shape_width, StemAccumulator};
use crate::segment::{Segmenter, UnicodeSegmenter};
use crate::Error;

const SOFT_HYPHEN: char = '\u{00AD}';
const HYPHEN_PENALTY: f64 = 50.0;

/// Mandatory line-break characters per UAX #14 (beyond the ASCII `\n` the
/// spec calls out explicitly): CR, NEL, LINE SEPARATOR, PARAGRAPH SEPARATOR.
/// Any UAX #14 mandatory-break character ends a line-break unit the same
/// way `\n` does.
fn is_mandatory_break_char(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Generate the paragraph item sequence for `text` under `font`, using
/// `segmenter` for UAX #14 line-break units.
///
/// `text` is expected to already contain any soft hyphens (U+00AD) a
/// hyphenator inserted; this function treats them purely as discretionary
/// break markers.
pub fn items(
    text: &str,
    font: &dyn Font,
    segmenter: &dyn Segmenter,
) -> Result<Vec<ParagraphItem>, Error> {
    let space_width = shape_width(font, " ")?;
    let hyphen_width = shape_width(font, "-")?;

    let mut out = Vec::new();
    let mut accumulator = StemAccumulator::new();

    for unit in segmenter.line_break_units(text) {
        let trailing = trailing_marker(unit);
        let stem = strip_trailing_marker(unit, trailing);

        if !stem.is_empty() {
            let width = accumulator.push(font, stem)?;
            out.push(ParagraphItem::new_box(width, stem)?);
        } else {
            accumulator.reset();
        }

        match trailing {
            Some(TrailingMarker::SoftHyphen) => {
                out.push(ParagraphItem::new_penalty(hyphen_width, HYPHEN_PENALTY, true)?);
            }
            Some(TrailingMarker::Mandatory) => {
                out.push(ParagraphItem::new_glue(
                    0.0,
                    crate::item::MAX_STRETCH,
                    0.0,
                    "",
                )?);
                out.push(ParagraphItem::new_penalty(0.0, f64::NEG_INFINITY, true)?);
            }
            Some(TrailingMarker::Space) => {
                out.push(ParagraphItem::new_glue(
                    space_width,
                    0.5 * space_width,
                    0.3 * space_width,
                    " ",
                )?);
            }
            None => {}
        }
    }

    // Terminal forced break: the paragraph must end somewhere, even for
    // empty input (spec S6: zero-item input still yields this pair).
    out.push(ParagraphItem::new_glue(
        0.0,
        crate::item::MAX_STRETCH,
        0.0,
        "",
    )?);
    out.push(ParagraphItem::new_penalty(0.0, f64::NEG_INFINITY, true)?);

    Ok(out)
}

/// Convenience entry point using the default Unicode segmenter.
pub fn items_default(text: &str, font: &dyn Font) -> Result<Vec<ParagraphItem>, Error> {
    items(text, font, &UnicodeSegmenter)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TrailingMarker {
    SoftHyphen,
    Mandatory,
    Space,
}

fn trailing_marker(unit: &str) -> Option<TrailingMarker> {
    let last = unit.chars().last()?;
    if last == SOFT_HYPHEN {
        Some(TrailingMarker::SoftHyphen)
    } else if is_mandatory_break_char(last) {
        Some(TrailingMarker::Mandatory)
    } else if last == ' ' {
        Some(TrailingMarker::Space)
    } else {
        None
    }
}

/// Strip every trailing space, soft hyphen, or mandatory-break character —
/// not just the single last one — mirroring the original's
/// `unit.rstrip(" \u{00AD}\n")`. A line-break unit such as `"a  "` (a word
/// followed by a run of spaces the segmenter kept together) must yield the
/// stem `"a"`, with the whole run represented by one glue item.
fn strip_trailing_marker(unit: &str, marker: Option<TrailingMarker>) -> &str {
    match marker {
        Some(_) => {
            unit.trim_end_matches(|c| c == ' ' || c == SOFT_HYPHEN || is_mandatory_break_char(c))
        }
        None => unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Glyph;

    struct MonospaceFont {
        advance_per_char: f64,
    }

    impl Font for MonospaceFont {
        fn shape(&self, text: &str) -> Result<Vec<Glyph>, Error> {
            Ok(text
                .chars()
                .enumerate()
                .map(|(i, c)| Glyph {
                    index: c as u32,
                    cluster: c.to_string(),
                    cluster_code_point_index: i,
                    x_advance: self.advance_per_char,
                    y_advance: 0.0,
                    x_offset: 0.0,
                    y_offset: 0.0,
                })
                .collect())
        }
        fn ascender(&self) -> f64 {
            self.advance_per_char
        }
        fn descender(&self) -> f64 {
            -self.advance_per_char * 0.25
        }
        fn em_size(&self) -> (f64, f64) {
            (self.advance_per_char, self.advance_per_char)
        }
    }

    fn mono() -> MonospaceFont {
        MonospaceFont {
            advance_per_char: 1.0,
        }
    }

    /// S1 from spec §8: `"a b c"` -> Box Glue Box Glue Box Glue(inf) Penalty(-inf).
    #[test]
    fn s1_trivial_paragraph() {
        let font = mono();
        let result = items_default("a b c", &font).unwrap();
        assert_eq!(result.len(), 7);
        assert!(matches!(result[0], ParagraphItem::Box { .. }));
        assert!(matches!(result[1], ParagraphItem::Glue { .. }));
        assert!(matches!(result[2], ParagraphItem::Box { .. }));
        assert!(matches!(result[3], ParagraphItem::Glue { .. }));
        assert!(matches!(result[4], ParagraphItem::Box { .. }));
        assert!(matches!(result[5], ParagraphItem::Glue { .. }));
        assert!(result.last().unwrap().is_forced_break());
    }

    /// S6 from spec §8: empty paragraph has only the terminal glue+penalty.
    #[test]
    fn s6_empty_paragraph() {
        let font = mono();
        let result = items_default("", &font).unwrap();
        assert_eq!(result.len(), 2);
        assert!(matches!(result[0], ParagraphItem::Glue { .. }));
        assert!(result[1].is_forced_break());
    }

    #[test]
    fn soft_hyphen_emits_flagged_penalty() {
        let font = mono();
        let text = "su\u{00AD}per";
        let result = items_default(text, &font).unwrap();
        let penalty = result
            .iter()
            .find(|i| matches!(i, ParagraphItem::Penalty { flagged: true, penalty, .. } if *penalty == 50.0));
        assert!(penalty.is_some());
    }

    #[test]
    fn newline_forces_a_break() {
        let font = mono();
        let result = items_default("ab\ncd", &font).unwrap();
        let forced_count = result.iter().filter(|i| i.is_forced_break()).count();
        // one mid-paragraph forced break plus the terminal one
        assert_eq!(forced_count, 2);
    }

    #[test]
    fn box_text_concatenation_round_trips_with_normalized_whitespace() {
        let font = mono();
        let result = items_default("a  b", &font).unwrap();
        let rebuilt: String = result
            .iter()
            .filter_map(|i| match i {
                ParagraphItem::Box { text, .. } => Some(text.clone()),
                ParagraphItem::Glue { text, .. } if !text.is_empty() => Some(text.clone()),
                _ => None,
            })
            .collect();
        // Two consecutive spaces collapse to one glue, matching UAX#14 units.
        assert_eq!(rebuilt, "a b");
    }
}
