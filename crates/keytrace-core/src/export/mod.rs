pub mod vector;

pub use vector::{render as render_svg, Viewport};

use strum::{Display as StrumDisplay, EnumIter};

pub const FILE_PREFIX: &str = "typing-pattern";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// `typing-pattern-<text>.<ext>`, with each run of whitespace in `text` turned into
/// a single hyphen.
pub fn file_name(display_text: &str, format: ExportFormat) -> String {
    let mut stem = String::with_capacity(display_text.len());
    let mut in_gap = false;
    for c in display_text.chars() {
        if c.is_whitespace() {
            if !in_gap {
                stem.push('-');
            }
            in_gap = true;
        } else {
            stem.push(c);
            in_gap = false;
        }
    }
    format!("{FILE_PREFIX}-{stem}.{}", format.extension())
}
