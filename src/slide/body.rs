use std::borrow::Cow;
use std::fmt::Write as _;
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::error::SlideError;
use super::package::attribute;
use super::{Paragraph, Run, FONT};

/// Shape currently being read, and whether it is the body placeholder.
struct ShapeScope {
    depth: usize,
    prefix: Option<String>,
    is_body: bool,
}

/// Text body of the body placeholder while it is being rewritten.
struct FrameScope {
    depth: usize,
    seen_paragraph: bool,
    first_paragraph: Option<usize>,
}

/// Rewrite a slide so its first body placeholder holds `paragraphs`.
///
/// The text frame is cleared first: body properties and list styles stay,
/// the first paragraph stays without its runs, every other paragraph goes.
/// All other shapes are copied through untouched.
pub fn replace_body_text(xml: &str, paragraphs: &[Paragraph]) -> Result<Vec<u8>, SlideError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut depth = 0usize;
    let mut skip_from: Option<usize> = None;
    let mut tree: Option<usize> = None;
    let mut shape: Option<ShapeScope> = None;
    let mut frame: Option<FrameScope> = None;
    let mut done = false;

    loop {
        let event = reader.read_event()?;
        if matches!(event, Event::Eof) {
            break;
        }

        if let Some(start) = skip_from {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == start {
                        skip_from = None;
                    }
                }
                _ => {}
            }
            continue;
        }

        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let opens = matches!(event, Event::Start(_));
                let local = e.local_name().as_ref().to_vec();

                if let Some(f) = frame.as_mut() {
                    if depth == f.depth + 1 && local == b"p" {
                        if f.seen_paragraph {
                            if opens {
                                skip_from = Some(depth);
                                depth += 1;
                            }
                            continue;
                        }
                        f.seen_paragraph = true;
                        if opens {
                            f.first_paragraph = Some(depth);
                        }
                    } else if let Some(pd) = f.first_paragraph {
                        if depth == pd + 1 && local != b"pPr" && local != b"endParaRPr" {
                            if opens {
                                skip_from = Some(depth);
                                depth += 1;
                            }
                            continue;
                        }
                    }
                } else if !done {
                    match local.as_slice() {
                        b"spTree" if opens && tree.is_none() => tree = Some(depth),
                        // grouped shapes are not placeholders of the slide
                        b"sp" if opens && tree.is_some_and(|t| depth == t + 1) => {
                            shape = Some(ShapeScope {
                                depth,
                                prefix: prefix_of(e),
                                is_body: false,
                            });
                        }
                        b"ph" => {
                            if let Some(s) = shape.as_mut() {
                                if attribute(e, b"type", false)?.as_deref() == Some("body") {
                                    s.is_body = true;
                                }
                            }
                        }
                        b"txBody" if shape.as_ref().is_some_and(|s| s.is_body) => {
                            if opens {
                                frame = Some(FrameScope {
                                    depth,
                                    seen_paragraph: false,
                                    first_paragraph: None,
                                });
                            } else {
                                // `<p:txBody/>` carries nothing worth keeping
                                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                                write_text_body(&mut writer, &name, paragraphs)?;
                                done = true;
                                continue;
                            }
                        }
                        _ => {}
                    }
                }

                if opens {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth -= 1;
                if let Some(f) = frame.as_mut() {
                    if f.first_paragraph == Some(depth) {
                        f.first_paragraph = None;
                    } else if depth == f.depth {
                        if !f.seen_paragraph {
                            writer.write_event(Event::Empty(BytesStart::new("a:p")))?;
                        }
                        write_paragraphs(&mut writer, paragraphs)?;
                        frame = None;
                        shape = None;
                        done = true;
                    }
                } else if let Some(s) = shape.take() {
                    if depth == s.depth {
                        if s.is_body && !done {
                            let name = match &s.prefix {
                                Some(prefix) => format!("{prefix}:txBody"),
                                None => "txBody".to_string(),
                            };
                            write_text_body(&mut writer, &name, paragraphs)?;
                            done = true;
                        }
                    } else {
                        shape = Some(s);
                    }
                }
            }
            _ => {}
        }

        writer.write_event(event)?;
    }

    if !done {
        return Err(SlideError::MissingBodyPlaceholder);
    }
    Ok(writer.into_inner())
}

fn prefix_of(e: &BytesStart) -> Option<String> {
    e.name()
        .prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Characters XML 1.0 cannot carry are written as `_xHHHH_`, the escape
/// PowerPoint reads back as the original character.
fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if is_xml_char(c) {
            out.push(c);
        } else {
            let _ = write!(out, "_x{:04X}_", c as u32);
        }
    }
    Cow::Owned(out)
}

fn write_text_body<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    paragraphs: &[Paragraph],
) -> Result<(), SlideError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Empty(BytesStart::new("a:bodyPr")))?;
    writer.write_event(Event::Empty(BytesStart::new("a:lstStyle")))?;
    writer.write_event(Event::Empty(BytesStart::new("a:p")))?;
    write_paragraphs(writer, paragraphs)?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_paragraphs<W: Write>(
    writer: &mut Writer<W>,
    paragraphs: &[Paragraph],
) -> Result<(), SlideError> {
    for paragraph in paragraphs {
        write_paragraph(writer, paragraph)?;
    }
    Ok(())
}

fn write_paragraph<W: Write>(writer: &mut Writer<W>, paragraph: &Paragraph) -> Result<(), SlideError> {
    writer.write_event(Event::Start(BytesStart::new("a:p")))?;

    let mut ppr = BytesStart::new("a:pPr");
    let margin = paragraph.margin_left.map(|emu| emu.to_string());
    if let Some(margin) = &margin {
        ppr.push_attribute(("marL", margin.as_str()));
        ppr.push_attribute(("indent", "0"));
    }
    let level = paragraph.level.to_string();
    if paragraph.level > 0 {
        ppr.push_attribute(("lvl", level.as_str()));
    }
    writer.write_event(Event::Start(ppr))?;
    writer.write_event(Event::Empty(BytesStart::new("a:buNone")))?;
    writer.write_event(Event::End(BytesEnd::new("a:pPr")))?;

    for run in &paragraph.runs {
        write_run(writer, run)?;
    }

    writer.write_event(Event::End(BytesEnd::new("a:p")))?;
    Ok(())
}

fn write_run<W: Write>(writer: &mut Writer<W>, run: &Run) -> Result<(), SlideError> {
    writer.write_event(Event::Start(BytesStart::new("a:r")))?;

    let mut rpr = BytesStart::new("a:rPr");
    rpr.push_attribute(("lang", "en-US"));
    if let Some(bold) = run.bold {
        rpr.push_attribute(("b", if bold { "1" } else { "0" }));
    }
    writer.write_event(Event::Start(rpr))?;
    if let Some(color) = run.color {
        let hex = color.hex();
        writer.write_event(Event::Start(BytesStart::new("a:solidFill")))?;
        let mut clr = BytesStart::new("a:srgbClr");
        clr.push_attribute(("val", hex.as_str()));
        writer.write_event(Event::Empty(clr))?;
        writer.write_event(Event::End(BytesEnd::new("a:solidFill")))?;
    }
    let mut latin = BytesStart::new("a:latin");
    latin.push_attribute(("typeface", FONT));
    writer.write_event(Event::Empty(latin))?;
    writer.write_event(Event::End(BytesEnd::new("a:rPr")))?;

    writer.write_event(Event::Start(BytesStart::new("a:t")))?;
    writer.write_event(Event::Text(BytesText::new(&xml_safe(&run.text))))?;
    writer.write_event(Event::End(BytesEnd::new("a:t")))?;

    writer.write_event(Event::End(BytesEnd::new("a:r")))?;
    Ok(())
}
