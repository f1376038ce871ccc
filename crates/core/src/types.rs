//! Domain types for planned name-card decks.

use serde::{Deserialize, Serialize};

/// One visitor record from the delimited input, destined for exactly
/// one name card.
///
/// Fields map by position in the source row: 0 → name, 1 → title,
/// 2 → graduate cohort, 3 → hometown. Missing trailing fields are
/// absent values, never errors; no validation is performed anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    /// Visitor name, rendered large and bold on the card.
    pub name: String,

    /// Title or role, rendered centered below the name.
    pub title: String,

    /// Graduate cohort label. `None` suppresses the cohort line on the
    /// card entirely.
    pub graduate: Option<String>,

    /// Hometown, rendered in parentheses next to the cohort label.
    /// Only visible when `graduate` is present.
    pub hometown: Option<String>,
}

/// A position on a slide, in inches from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A rectangular extent, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A single draw command: one styled text box placed on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Paragraphs from top to bottom. Empty strings are blank lines
    /// used to push the visible text down inside the box.
    pub lines: Vec<String>,

    /// Top-left corner of the box, in inches.
    pub position: Position,

    /// Extent of the box, in inches.
    pub size: Size,

    /// Typeface for every run in the box.
    pub font_face: String,

    /// Font size in points.
    pub font_size: u32,

    /// Whether the text is bold. All text is centered regardless.
    pub bold: bool,

    /// Solid fill color as a 6-digit hex string, if any.
    pub fill: Option<String>,

    /// Outline color as a 6-digit hex string, if any.
    pub outline: Option<String>,
}

/// The planned content of one slide: draw commands in z-order.
///
/// Boxes belonging to one card partially overlap by design (the title
/// and cohort lines sit inside the name box footprint), so emission
/// order matters and is preserved as written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlidePlan {
    /// Text boxes in emission order.
    pub boxes: Vec<TextBox>,
}

impl SlidePlan {
    /// Create an empty slide plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text box to this slide.
    pub fn add_box(&mut self, text_box: TextBox) {
        self.boxes.push(text_box);
    }
}

/// An ordered sequence of planned slides.
///
/// This is the sole hand-off artifact between the layout engine and a
/// presentation writer; it carries no renderer state of any kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    /// Slides in presentation order.
    pub slides: Vec<SlidePlan>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide to the deck.
    pub fn add_slide(&mut self, slide: SlidePlan) {
        self.slides.push(slide);
    }

    /// Number of slides in the deck.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Get all text lines from all boxes, flattened, in emission order.
    pub fn all_text(&self) -> Vec<&str> {
        self.slides
            .iter()
            .flat_map(|s| s.boxes.iter())
            .flat_map(|b| b.lines.iter().map(String::as_str))
            .collect()
    }
}
