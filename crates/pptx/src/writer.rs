//! PPTX package writer implementation.

use namecard_core::{Deck, Error, Result, SlidePlan, TextBox};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Seek, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::parts;

/// English Metric Units per inch, the native unit of OOXML geometry.
const EMU_PER_INCH: f64 = 914_400.0;

/// Page size: 10in x 5.625in, the 16:9 default of common renderers.
const SLIDE_WIDTH_EMU: i64 = 9_144_000;
const SLIDE_HEIGHT_EMU: i64 = 5_143_500;

const XMLNS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const XMLNS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XMLNS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// Writer for PPTX (Office Open XML) presentation packages.
pub struct PptxWriter;

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self
    }

    /// Write a planned deck as a complete .pptx package.
    ///
    /// Slides are emitted in deck order; shapes within a slide are
    /// emitted in plan order, which preserves the intended z-order of
    /// overlapping card boxes. A zero-slide deck still produces a
    /// valid, openable package.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, out: W) -> Result<()> {
        let slide_count = deck.slides.len();
        log::debug!("writing package with {} slides", slide_count);

        let mut archive = ZipWriter::new(out);
        let options =
            FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        write_entry(
            &mut archive,
            options,
            "[Content_Types].xml",
            content_types(slide_count).as_bytes(),
        )?;
        write_entry(&mut archive, options, "_rels/.rels", parts::ROOT_RELS.as_bytes())?;
        write_entry(
            &mut archive,
            options,
            "docProps/core.xml",
            parts::CORE_PROPS.as_bytes(),
        )?;
        write_entry(
            &mut archive,
            options,
            "docProps/app.xml",
            parts::APP_PROPS.as_bytes(),
        )?;
        write_entry(
            &mut archive,
            options,
            "ppt/presentation.xml",
            presentation_xml(slide_count).as_bytes(),
        )?;
        write_entry(
            &mut archive,
            options,
            "ppt/_rels/presentation.xml.rels",
            presentation_rels(slide_count).as_bytes(),
        )?;
        write_entry(
            &mut archive,
            options,
            "ppt/slideMasters/slideMaster1.xml",
            parts::SLIDE_MASTER.as_bytes(),
        )?;
        write_entry(
            &mut archive,
            options,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            parts::SLIDE_MASTER_RELS.as_bytes(),
        )?;
        write_entry(
            &mut archive,
            options,
            "ppt/slideLayouts/slideLayout1.xml",
            parts::SLIDE_LAYOUT.as_bytes(),
        )?;
        write_entry(
            &mut archive,
            options,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            parts::SLIDE_LAYOUT_RELS.as_bytes(),
        )?;
        write_entry(
            &mut archive,
            options,
            "ppt/theme/theme1.xml",
            parts::THEME.as_bytes(),
        )?;

        for (idx, slide) in deck.slides.iter().enumerate() {
            let number = idx + 1;
            let xml = slide_xml(slide)?;
            write_entry(
                &mut archive,
                options,
                &format!("ppt/slides/slide{}.xml", number),
                &xml,
            )?;
            write_entry(
                &mut archive,
                options,
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                parts::SLIDE_RELS.as_bytes(),
            )?;
        }

        archive
            .finish()
            .map_err(|e| Error::Zip(format!("Failed to finalize archive: {}", e)))?;

        Ok(())
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert inches to EMU, rounding to the nearest unit.
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Add one entry to the package.
fn write_entry<W: Write + Seek>(
    archive: &mut ZipWriter<W>,
    options: FileOptions,
    path: &str,
    bytes: &[u8],
) -> Result<()> {
    archive
        .start_file(path, options)
        .map_err(|e| Error::Zip(format!("Failed to add '{}': {}", path, e)))?;
    archive
        .write_all(bytes)
        .map_err(|e| Error::Zip(format!("Failed to write '{}': {}", path, e)))?;
    Ok(())
}

/// Content types part, listing every slide override.
fn content_types(slide_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
    );
    for number in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            number
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// The presentation part: master reference, slide list, page size.
fn presentation_xml(slide_count: usize) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>"#,
        XMLNS_A, XMLNS_R, XMLNS_P
    );
    // Slide ids start at 256 by convention; rId1 is taken by the master.
    for number in 1..=slide_count {
        xml.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            255 + number,
            number + 1
        ));
    }
    xml.push_str(&format!(
        r#"</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        SLIDE_WIDTH_EMU, SLIDE_HEIGHT_EMU
    ));
    xml
}

/// Relationships of the presentation part: the master, then one
/// relationship per slide in deck order.
fn presentation_rels(slide_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
    );
    for number in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            number + 1,
            number
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Write an event, mapping XML errors into our error type.
fn emit<W: Write>(writer: &mut Writer<W>, event: Event) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Xml(format!("Failed to write slide XML: {}", e)))
}

/// Generate the XML for one slide from its plan.
fn slide_xml(slide: &SlidePlan) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;

    let mut sld = BytesStart::new("p:sld");
    sld.push_attribute(("xmlns:a", XMLNS_A));
    sld.push_attribute(("xmlns:r", XMLNS_R));
    sld.push_attribute(("xmlns:p", XMLNS_P));
    emit(&mut writer, Event::Start(sld))?;

    emit(&mut writer, Event::Start(BytesStart::new("p:cSld")))?;
    emit(&mut writer, Event::Start(BytesStart::new("p:spTree")))?;

    // Required group-shape header of the shape tree.
    emit(&mut writer, Event::Start(BytesStart::new("p:nvGrpSpPr")))?;
    let mut group_props = BytesStart::new("p:cNvPr");
    group_props.push_attribute(("id", "1"));
    group_props.push_attribute(("name", ""));
    emit(&mut writer, Event::Empty(group_props))?;
    emit(&mut writer, Event::Empty(BytesStart::new("p:cNvGrpSpPr")))?;
    emit(&mut writer, Event::Empty(BytesStart::new("p:nvPr")))?;
    emit(&mut writer, Event::End(BytesEnd::new("p:nvGrpSpPr")))?;
    emit(&mut writer, Event::Empty(BytesStart::new("p:grpSpPr")))?;

    // Shape ids 1 is the group shape above; boxes start at 2.
    for (idx, text_box) in slide.boxes.iter().enumerate() {
        write_shape(&mut writer, text_box, idx as u64 + 2)?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("p:spTree")))?;
    emit(&mut writer, Event::End(BytesEnd::new("p:cSld")))?;

    emit(&mut writer, Event::Start(BytesStart::new("p:clrMapOvr")))?;
    emit(
        &mut writer,
        Event::Empty(BytesStart::new("a:masterClrMapping")),
    )?;
    emit(&mut writer, Event::End(BytesEnd::new("p:clrMapOvr")))?;

    emit(&mut writer, Event::End(BytesEnd::new("p:sld")))?;

    Ok(writer.into_inner())
}

/// Write one text box as a `p:sp` shape.
fn write_shape<W: Write>(writer: &mut Writer<W>, text_box: &TextBox, shape_id: u64) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("p:sp")))?;

    // Non-visual properties.
    emit(writer, Event::Start(BytesStart::new("p:nvSpPr")))?;
    let id = shape_id.to_string();
    let name = format!("TextBox {}", shape_id);
    let mut shape_props = BytesStart::new("p:cNvPr");
    shape_props.push_attribute(("id", id.as_str()));
    shape_props.push_attribute(("name", name.as_str()));
    emit(writer, Event::Empty(shape_props))?;
    let mut text_flag = BytesStart::new("p:cNvSpPr");
    text_flag.push_attribute(("txBox", "1"));
    emit(writer, Event::Empty(text_flag))?;
    emit(writer, Event::Empty(BytesStart::new("p:nvPr")))?;
    emit(writer, Event::End(BytesEnd::new("p:nvSpPr")))?;

    // Placement, geometry, fill, outline.
    emit(writer, Event::Start(BytesStart::new("p:spPr")))?;
    emit(writer, Event::Start(BytesStart::new("a:xfrm")))?;
    let x = inches_to_emu(text_box.position.x).to_string();
    let y = inches_to_emu(text_box.position.y).to_string();
    let mut off = BytesStart::new("a:off");
    off.push_attribute(("x", x.as_str()));
    off.push_attribute(("y", y.as_str()));
    emit(writer, Event::Empty(off))?;
    let cx = inches_to_emu(text_box.size.width).to_string();
    let cy = inches_to_emu(text_box.size.height).to_string();
    let mut ext = BytesStart::new("a:ext");
    ext.push_attribute(("cx", cx.as_str()));
    ext.push_attribute(("cy", cy.as_str()));
    emit(writer, Event::Empty(ext))?;
    emit(writer, Event::End(BytesEnd::new("a:xfrm")))?;

    let mut geometry = BytesStart::new("a:prstGeom");
    geometry.push_attribute(("prst", "rect"));
    emit(writer, Event::Start(geometry))?;
    emit(writer, Event::Empty(BytesStart::new("a:avLst")))?;
    emit(writer, Event::End(BytesEnd::new("a:prstGeom")))?;

    match &text_box.fill {
        Some(color) => write_solid_fill(writer, color)?,
        None => emit(writer, Event::Empty(BytesStart::new("a:noFill")))?,
    }
    if let Some(color) = &text_box.outline {
        emit(writer, Event::Start(BytesStart::new("a:ln")))?;
        write_solid_fill(writer, color)?;
        emit(writer, Event::End(BytesEnd::new("a:ln")))?;
    }
    emit(writer, Event::End(BytesEnd::new("p:spPr")))?;

    // Text body: one paragraph per line, all centered.
    emit(writer, Event::Start(BytesStart::new("p:txBody")))?;
    emit(writer, Event::Empty(BytesStart::new("a:bodyPr")))?;
    emit(writer, Event::Empty(BytesStart::new("a:lstStyle")))?;
    for line in &text_box.lines {
        write_paragraph(writer, line, text_box)?;
    }
    emit(writer, Event::End(BytesEnd::new("p:txBody")))?;

    emit(writer, Event::End(BytesEnd::new("p:sp")))?;
    Ok(())
}

/// Write a solid fill with an explicit sRGB color.
fn write_solid_fill<W: Write>(writer: &mut Writer<W>, color: &str) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("a:solidFill")))?;
    let mut srgb = BytesStart::new("a:srgbClr");
    srgb.push_attribute(("val", color));
    emit(writer, Event::Empty(srgb))?;
    emit(writer, Event::End(BytesEnd::new("a:solidFill")))?;
    Ok(())
}

/// Write one paragraph of a text box.
///
/// Empty lines become empty paragraphs carrying only end-of-paragraph
/// run properties, which keeps their line height consistent with the
/// visible text they push down.
fn write_paragraph<W: Write>(writer: &mut Writer<W>, line: &str, text_box: &TextBox) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("a:p")))?;
    let mut paragraph_props = BytesStart::new("a:pPr");
    paragraph_props.push_attribute(("algn", "ctr"));
    emit(writer, Event::Empty(paragraph_props))?;

    // OOXML font sizes are in hundredths of a point.
    let size = (text_box.font_size * 100).to_string();

    if line.is_empty() {
        let mut end_props = BytesStart::new("a:endParaRPr");
        end_props.push_attribute(("sz", size.as_str()));
        if text_box.bold {
            end_props.push_attribute(("b", "1"));
        }
        emit(writer, Event::Empty(end_props))?;
    } else {
        emit(writer, Event::Start(BytesStart::new("a:r")))?;
        let mut run_props = BytesStart::new("a:rPr");
        run_props.push_attribute(("lang", "ko-KR"));
        run_props.push_attribute(("sz", size.as_str()));
        if text_box.bold {
            run_props.push_attribute(("b", "1"));
        }
        emit(writer, Event::Start(run_props))?;
        let mut latin = BytesStart::new("a:latin");
        latin.push_attribute(("typeface", text_box.font_face.as_str()));
        emit(writer, Event::Empty(latin))?;
        let mut east_asian = BytesStart::new("a:ea");
        east_asian.push_attribute(("typeface", text_box.font_face.as_str()));
        emit(writer, Event::Empty(east_asian))?;
        emit(writer, Event::End(BytesEnd::new("a:rPr")))?;
        emit(writer, Event::Start(BytesStart::new("a:t")))?;
        emit(writer, Event::Text(BytesText::new(line)))?;
        emit(writer, Event::End(BytesEnd::new("a:t")))?;
        emit(writer, Event::End(BytesEnd::new("a:r")))?;
    }

    emit(writer, Event::End(BytesEnd::new("a:p")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use namecard_core::{plan_deck, Visitor};
    use std::io::{Cursor, Read};

    fn guest(name: &str) -> Visitor {
        Visitor {
            name: name.to_string(),
            title: "Guest".to_string(),
            graduate: None,
            hometown: None,
        }
    }

    fn write_deck(deck: &Deck) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        PptxWriter::new().write(deck, &mut cursor).unwrap();
        cursor.into_inner()
    }

    fn read_entry(bytes: &[u8], path: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(path).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_inches_to_emu() {
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(inches_to_emu(0.1), 91_440);
        assert_eq!(inches_to_emu(0.0), 0);
    }

    #[test]
    fn test_empty_deck_is_a_valid_package() {
        let bytes = write_deck(&Deck::new());

        let presentation = read_entry(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains("<p:sldIdLst></p:sldIdLst>"));

        let mut archive = zip::ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        assert!(archive.by_name("ppt/slides/slide1.xml").is_err());
    }

    #[test]
    fn test_one_slide_entry_per_plan() {
        let visitors: Vec<Visitor> = (0..7).map(|i| guest(&format!("V{}", i))).collect();
        let bytes = write_deck(&plan_deck(&visitors));

        let mut archive = zip::ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        assert!(archive.by_name("ppt/slides/slide1.xml").is_ok());
        assert!(archive.by_name("ppt/slides/slide2.xml").is_ok());
        assert!(archive.by_name("ppt/slides/slide3.xml").is_err());
    }

    #[test]
    fn test_content_types_lists_each_slide() {
        let visitors: Vec<Visitor> = (0..7).map(|i| guest(&format!("V{}", i))).collect();
        let bytes = write_deck(&plan_deck(&visitors));

        let content_types = read_entry(&bytes, "[Content_Types].xml");
        assert!(content_types.contains("/ppt/slides/slide1.xml"));
        assert!(content_types.contains("/ppt/slides/slide2.xml"));
        assert!(!content_types.contains("/ppt/slides/slide3.xml"));
    }

    #[test]
    fn test_presentation_rels_point_at_slides_in_order() {
        let visitors: Vec<Visitor> = (0..7).map(|i| guest(&format!("V{}", i))).collect();
        let bytes = write_deck(&plan_deck(&visitors));

        let rels = read_entry(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"#));
        assert!(rels.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"#));
    }

    #[test]
    fn test_slide_contains_card_text_and_geometry() {
        let visitor = Visitor {
            name: "Jane Doe".to_string(),
            title: "Speaker".to_string(),
            graduate: Some("12".to_string()),
            hometown: Some("Seoul".to_string()),
        };
        let bytes = write_deck(&plan_deck(&[visitor]));

        let slide = read_entry(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains("Jane Doe"));
        assert!(slide.contains("Speaker"));
        assert!(slide.contains("12회 (Seoul)"));
        assert!(slide.contains(r#"typeface="Malgun Gothic""#));
        // Card origin is 0.1in in both axes.
        assert!(slide.contains(r#"<a:off x="91440" y="91440"/>"#));
        // Name font is 35pt, in hundredths of a point.
        assert!(slide.contains(r#"sz="3500""#));
    }

    #[test]
    fn test_slide_text_is_escaped() {
        let bytes = write_deck(&plan_deck(&[guest("A & B <C>")]));

        let slide = read_entry(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains("A &amp; B &lt;C&gt;"));
        assert!(!slide.contains("A & B <C>"));
    }

    #[test]
    fn test_guest_card_has_no_cohort_shape() {
        let bytes = write_deck(&plan_deck(&[guest("John Smith")]));

        let slide = read_entry(&bytes, "ppt/slides/slide1.xml");
        assert_eq!(slide.matches("<p:sp>").count(), 2);
    }

    #[test]
    fn test_required_static_parts_are_present() {
        let bytes = write_deck(&Deck::new());

        for path in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
        ] {
            let mut archive = zip::ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
            assert!(archive.by_name(path).is_ok(), "missing {}", path);
        }
    }
}
