//! # breakdemo
//!
//! Usage:
//!   breakdemo input.txt -w 40
//!   echo "some paragraph text" | breakdemo -w 40
//!
//! Reads paragraph text, breaks it at the given width using a built-in
//! monospace font, and prints the resulting lines. The CLI is glue, not
//! core — font loading and real shaping are left to callers who embed this
//! crate, the way `danmolitor-forme`'s own `main.rs` keeps the CLI thin
//! around `forme::render_json`.

use std::env;
use std::fs;
use std::io::{self, Read};

use parabreak::font::{Font, Glyph};
use parabreak::{items_default, optimal_line_breaks, Error, OptimiserParams, ParagraphItem};

/// A fixed-advance-per-character font, good enough to demo breaking without
/// needing a real font file on disk.
struct MonospaceFont {
    advance: f64,
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
                x_advance: self.advance,
                y_advance: 0.0,
                x_offset: 0.0,
                y_offset: 0.0,
            })
            .collect())
    }
    fn ascender(&self) -> f64 {
        self.advance
    }
    fn descender(&self) -> f64 {
        -self.advance * 0.25
    }
    fn em_size(&self) -> (f64, f64) {
        (self.advance, self.advance)
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let width = args
        .windows(2)
        .find(|w| w[0] == "-w")
        .and_then(|w| w[1].parse::<f64>().ok())
        .unwrap_or(40.0);

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .expect("failed to read stdin");
        buf
    };

    let font = MonospaceFont { advance: 1.0 };
    let paragraph_items = match items_default(&input, &font) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("failed to generate items: {e}");
            std::process::exit(1);
        }
    };

    let breaks = optimal_line_breaks(&paragraph_items, width, &OptimiserParams::default());
    print_lines(&paragraph_items, &breaks);
}

fn print_lines(items: &[ParagraphItem], breaks: &[usize]) {
    let mut start = 0;
    for &break_idx in breaks {
        let mut line = String::new();
        for item in &items[start..=break_idx] {
            match item {
                ParagraphItem::Box { text, .. } => line.push_str(text),
                ParagraphItem::Glue { text, .. } => line.push_str(text),
                ParagraphItem::Penalty { flagged, .. } => {
                    if *flagged {
                        line.push('-');
                    }
                }
            }
        }
        println!("{}", line.trim_end());
        start = break_idx + 1;
    }
}
