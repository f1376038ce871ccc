//! Card layout engine.
//!
//! Deterministically partitions an ordered visitor list into slides
//! and grid cells, and emits the text boxes for every card. Pure
//! arithmetic over the input: no I/O, no renderer handle, no state
//! retained across calls.

use crate::types::{Deck, Position, Size, SlidePlan, TextBox, Visitor};

/// Centimeters per inch; card dimensions are authored in centimeters
/// and converted to the renderer's native inches.
pub const CM_PER_INCH: f64 = 2.54;

/// Card width in centimeters.
pub const CARD_WIDTH_CM: f64 = 8.0;

/// Card height in centimeters.
pub const CARD_HEIGHT_CM: f64 = 6.0;

/// Slide margin and inter-card gap, authored directly in inches.
///
/// The mixed unit basis (cards in centimeters, gaps in inches) is kept
/// as-is for output compatibility with existing decks.
pub const CARD_MARGIN_IN: f64 = 0.1;

/// Cards per row.
pub const CARDS_PER_ROW: usize = 3;

/// Cards per slide, two rows of three.
pub const CARDS_PER_SLIDE: usize = 6;

/// Typeface for every text box; must cover Hangul for the cohort line.
pub const FONT_FACE: &str = "Malgun Gothic";

const NAME_FONT_SIZE: u32 = 35;
const GRADUATE_FONT_SIZE: u32 = 20;
const TITLE_FONT_SIZE: u32 = 18;

const WHITE: &str = "FFFFFF";
const BLACK: &str = "000000";

const ONE_CM_IN: f64 = 1.0 / CM_PER_INCH;
const TWO_CM_IN: f64 = 2.0 / CM_PER_INCH;

/// Card extent in inches.
fn card_size() -> Size {
    Size {
        width: CARD_WIDTH_CM / CM_PER_INCH,
        height: CARD_HEIGHT_CM / CM_PER_INCH,
    }
}

/// Plan a whole deck: one slide per group of up to six visitors, in
/// input order. An empty input yields an empty deck.
pub fn plan_deck(visitors: &[Visitor]) -> Deck {
    let mut deck = Deck::new();
    for chunk in visitors.chunks(CARDS_PER_SLIDE) {
        deck.add_slide(plan_slide(chunk));
    }
    deck
}

/// Plan one slide: the first three visitors fill the top row, the
/// rest fill the bottom row. A short chunk fills fewer cells and
/// leaves the remainder blank.
fn plan_slide(visitors: &[Visitor]) -> SlidePlan {
    let size = card_size();
    let mut slide = SlidePlan::new();

    let origin = Position {
        x: CARD_MARGIN_IN,
        y: CARD_MARGIN_IN,
    };
    let top = &visitors[..visitors.len().min(CARDS_PER_ROW)];
    fill_row(&mut slide, origin, size, top);

    if visitors.len() > CARDS_PER_ROW {
        let origin = Position {
            x: CARD_MARGIN_IN,
            y: CARD_MARGIN_IN + size.height + CARD_MARGIN_IN,
        };
        fill_row(&mut slide, origin, size, &visitors[CARDS_PER_ROW..]);
    }

    slide
}

/// Place a row of cards left to right, each stepped by card width
/// plus the gap.
fn fill_row(slide: &mut SlidePlan, origin: Position, size: Size, visitors: &[Visitor]) {
    let mut position = origin;
    for visitor in visitors {
        add_card(slide, position, size, visitor);
        position.x += size.width + CARD_MARGIN_IN;
    }
}

/// Emit the text boxes for one card: name, title, and (for graduates)
/// the cohort line.
///
/// The title and cohort boxes overlay the lower part of the name box
/// footprint rather than stacking below it, so the order emitted here
/// is also the z-order a writer must preserve.
fn add_card(slide: &mut SlidePlan, position: Position, size: Size, visitor: &Visitor) {
    // Two leading blank lines push the name toward the card center.
    slide.add_box(TextBox {
        lines: vec![String::new(), String::new(), visitor.name.clone()],
        position,
        size,
        font_face: FONT_FACE.to_string(),
        font_size: NAME_FONT_SIZE,
        bold: true,
        fill: Some(WHITE.to_string()),
        outline: Some(BLACK.to_string()),
    });

    slide.add_box(TextBox {
        lines: vec![String::new(), visitor.title.clone()],
        position: Position {
            x: position.x,
            y: position.y + TWO_CM_IN,
        },
        size: Size {
            width: size.width,
            height: ONE_CM_IN,
        },
        font_face: FONT_FACE.to_string(),
        font_size: TITLE_FONT_SIZE,
        bold: true,
        fill: None,
        outline: None,
    });

    if let Some(graduate) = &visitor.graduate {
        let hometown = visitor.hometown.as_deref().unwrap_or_default();
        slide.add_box(TextBox {
            lines: vec![format!("{}회 ({})", graduate, hometown)],
            position: Position {
                x: position.x,
                y: position.y + ONE_CM_IN,
            },
            size: Size {
                width: size.width,
                height: ONE_CM_IN,
            },
            font_face: FONT_FACE.to_string(),
            font_size: GRADUATE_FONT_SIZE,
            bold: true,
            fill: None,
            outline: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn guest(name: &str) -> Visitor {
        Visitor {
            name: name.to_string(),
            title: "Guest".to_string(),
            graduate: None,
            hometown: None,
        }
    }

    fn graduate(name: &str, cohort: &str, hometown: &str) -> Visitor {
        Visitor {
            name: name.to_string(),
            title: "Speaker".to_string(),
            graduate: Some(cohort.to_string()),
            hometown: Some(hometown.to_string()),
        }
    }

    fn guests(count: usize) -> Vec<Visitor> {
        (0..count).map(|i| guest(&format!("Visitor {}", i))).collect()
    }

    /// Name boxes are the only filled boxes, one per card.
    fn name_boxes(slide: &SlidePlan) -> Vec<&TextBox> {
        slide.boxes.iter().filter(|b| b.fill.is_some()).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {} to be close to {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_empty_input_yields_empty_deck() {
        let deck = plan_deck(&[]);
        assert_eq!(deck.slide_count(), 0);
    }

    #[test]
    fn test_slide_count_is_ceiling_of_six() {
        assert_eq!(plan_deck(&guests(1)).slide_count(), 1);
        assert_eq!(plan_deck(&guests(6)).slide_count(), 1);
        assert_eq!(plan_deck(&guests(7)).slide_count(), 2);
        assert_eq!(plan_deck(&guests(12)).slide_count(), 2);
        assert_eq!(plan_deck(&guests(13)).slide_count(), 3);
    }

    #[test]
    fn test_seven_visitors_split_six_and_one() {
        let deck = plan_deck(&guests(7));

        assert_eq!(deck.slide_count(), 2);
        assert_eq!(name_boxes(&deck.slides[0]).len(), 6);
        let overflow = name_boxes(&deck.slides[1]);
        assert_eq!(overflow.len(), 1);
        assert_close(overflow[0].position.x, CARD_MARGIN_IN);
        assert_close(overflow[0].position.y, CARD_MARGIN_IN);
    }

    #[test]
    fn test_row_one_x_positions_step_by_card_width_plus_gap() {
        let deck = plan_deck(&guests(3));
        let cards = name_boxes(&deck.slides[0]);
        let width = CARD_WIDTH_CM / CM_PER_INCH;

        for (i, card) in cards.iter().enumerate() {
            let expected = CARD_MARGIN_IN + i as f64 * (width + CARD_MARGIN_IN);
            assert_close(card.position.x, expected);
            assert_close(card.position.y, CARD_MARGIN_IN);
        }
    }

    #[test]
    fn test_row_two_starts_below_row_one() {
        let deck = plan_deck(&guests(4));
        let cards = name_boxes(&deck.slides[0]);
        let height = CARD_HEIGHT_CM / CM_PER_INCH;

        assert_eq!(cards.len(), 4);
        assert_close(cards[3].position.x, CARD_MARGIN_IN);
        assert_close(cards[3].position.y, CARD_MARGIN_IN + height + CARD_MARGIN_IN);
    }

    #[test]
    fn test_guest_card_has_two_boxes() {
        let deck = plan_deck(&[guest("John Smith")]);
        assert_eq!(deck.slides[0].boxes.len(), 2);
    }

    #[test]
    fn test_graduate_card_has_three_boxes() {
        let deck = plan_deck(&[graduate("Jane Doe", "12", "Seoul")]);
        assert_eq!(deck.slides[0].boxes.len(), 3);
    }

    #[test]
    fn test_card_text_contents() {
        let deck = plan_deck(&[graduate("Jane Doe", "12", "Seoul")]);
        let boxes = &deck.slides[0].boxes;

        assert_eq!(boxes[0].lines, vec!["", "", "Jane Doe"]);
        assert_eq!(boxes[1].lines, vec!["", "Speaker"]);
        assert_eq!(boxes[2].lines, vec!["12회 (Seoul)"]);
    }

    #[test]
    fn test_graduate_without_hometown_renders_empty_parens() {
        let mut visitor = graduate("Jane Doe", "12", "Seoul");
        visitor.hometown = None;

        let deck = plan_deck(&[visitor]);
        assert_eq!(deck.slides[0].boxes[2].lines, vec!["12회 ()"]);
    }

    #[test]
    fn test_title_and_cohort_boxes_overlay_the_card() {
        let deck = plan_deck(&[graduate("Jane Doe", "12", "Seoul")]);
        let boxes = &deck.slides[0].boxes;
        let card = &boxes[0];

        assert_close(boxes[1].position.x, card.position.x);
        assert_close(boxes[1].position.y, card.position.y + TWO_CM_IN);
        assert_close(boxes[1].size.height, ONE_CM_IN);

        assert_close(boxes[2].position.x, card.position.x);
        assert_close(boxes[2].position.y, card.position.y + ONE_CM_IN);
        assert_close(boxes[2].size.height, ONE_CM_IN);
    }

    #[test]
    fn test_fonts_and_styles() {
        let deck = plan_deck(&[graduate("Jane Doe", "12", "Seoul")]);
        let boxes = &deck.slides[0].boxes;

        assert_eq!(boxes[0].font_size, 35);
        assert_eq!(boxes[1].font_size, 18);
        assert_eq!(boxes[2].font_size, 20);
        for text_box in boxes {
            assert!(text_box.bold);
            assert_eq!(text_box.font_face, FONT_FACE);
        }

        assert_eq!(boxes[0].fill.as_deref(), Some("FFFFFF"));
        assert_eq!(boxes[0].outline.as_deref(), Some("000000"));
        assert_eq!(boxes[1].fill, None);
        assert_eq!(boxes[2].outline, None);
    }

    #[test]
    fn test_input_order_is_preserved_across_slides() {
        let visitors = guests(13);
        let deck = plan_deck(&visitors);

        let mut names = Vec::new();
        for slide in &deck.slides {
            for card in name_boxes(slide) {
                names.push(card.lines[2].as_str());
            }
        }

        let expected: Vec<&str> = visitors.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_empty_name_still_yields_a_card() {
        // Malformed rows render blank elements, never errors.
        let deck = plan_deck(&[guest("")]);
        assert_eq!(deck.slides[0].boxes[0].lines, vec!["", "", ""]);
    }
}
