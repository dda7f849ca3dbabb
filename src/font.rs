//! # Font interface
//!
//! The core never assumes a concrete font backend — it only needs
//! something that can shape text into advances. `Font` is the trait the
//! item generator and width measurer consume; `RustybuzzFont` is the one
//! concrete implementation this crate ships, wrapping the same
//! `rustybuzz` + `ttf-parser` pair the teacher engine used for OpenType
//! shaping and metrics.

use crate::Error;

/// A single shaped glyph, positioned in device units.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Glyph ID from the font's GSUB table (not a Unicode code point).
    pub index: u32,
    /// The grapheme-cluster string this glyph realizes.
    pub cluster: String,
    /// Code point index (into the shaped text) of the start of that cluster.
    pub cluster_code_point_index: usize,
    pub x_advance: f64,
    pub y_advance: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

/// External collaborator: given text, returns shaped glyphs with advances.
///
/// Shaping is context-sensitive (kerning, ligatures) — callers must not sum
/// independently-shaped substrings and expect the result to match a single
/// shaping call over the concatenation. See [`crate::measure`].
pub trait Font {
    /// Shape `text`, in reading order, returning one entry per glyph.
    fn shape(&self, text: &str) -> Result<Vec<Glyph>, Error>;

    /// Font ascender in points.
    fn ascender(&self) -> f64;

    /// Font descender in points (typically negative).
    fn descender(&self) -> f64;

    /// The em box size `(width, height)` in points.
    fn em_size(&self) -> (f64, f64);
}

/// A `Font` backed by a real OpenType/TrueType font via `rustybuzz`
/// (GSUB/GPOS shaping) and `ttf-parser` (static metrics).
pub struct RustybuzzFont {
    data: Vec<u8>,
    font_size: f64,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
}

impl RustybuzzFont {
    /// Parse `data` (a complete font file) and scale metrics for
    /// `font_size` points.
    pub fn new(data: Vec<u8>, font_size: f64) -> Result<Self, Error> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| Error::ShapingFailure(format!("could not parse font: {e}")))?;
        Ok(RustybuzzFont {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            data,
            font_size,
        })
    }

    fn scale(&self) -> f64 {
        self.font_size / self.units_per_em as f64
    }
}

impl Font for RustybuzzFont {
    fn shape(&self, text: &str) -> Result<Vec<Glyph>, Error> {
        let face = rustybuzz::Face::from_slice(&self.data, 0)
            .ok_or_else(|| Error::ShapingFailure("could not load font face".into()))?;

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        let output = rustybuzz::shape(&face, &[], buffer);

        let scale = self.scale();
        let infos = output.glyph_infos();
        let positions = output.glyph_positions();

        // Map byte cluster -> code point index, so `cluster_code_point_index`
        // is in the same units the item generator counts in.
        let byte_to_char: Vec<usize> = {
            let mut map = vec![0usize; text.len() + 1];
            let mut idx = 0;
            for (byte_idx, _) in text.char_indices() {
                map[byte_idx] = idx;
                idx += 1;
            }
            map[text.len()] = idx;
            map
        };

        let glyphs = infos
            .iter()
            .zip(positions.iter())
            .map(|(info, pos)| {
                let byte_cluster = info.cluster as usize;
                let cp_idx = byte_to_char.get(byte_cluster).copied().unwrap_or(0);
                let cluster_text = text[byte_cluster..]
                    .chars()
                    .next()
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                Glyph {
                    index: info.glyph_id,
                    cluster: cluster_text,
                    cluster_code_point_index: cp_idx,
                    x_advance: pos.x_advance as f64 * scale,
                    y_advance: pos.y_advance as f64 * scale,
                    x_offset: pos.x_offset as f64 * scale,
                    y_offset: pos.y_offset as f64 * scale,
                }
            })
            .collect();

        Ok(glyphs)
    }

    fn ascender(&self) -> f64 {
        self.ascender as f64 * self.scale()
    }

    fn descender(&self) -> f64 {
        self.descender as f64 * self.scale()
    }

    fn em_size(&self) -> (f64, f64) {
        (self.font_size, self.font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_font_data_fails_to_parse() {
        let result = RustybuzzFont::new(vec![0, 1, 2, 3], 12.0);
        assert!(result.is_err());
    }
}
