use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

pub const SLIDE_WITHOUT_TEXT_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp></p:spTree></p:cSld></p:sld>"#;

/// Slides in part order plus the order the id list presents them in.
pub struct PackageSpec {
    pub slides: Vec<String>,
    pub order: Vec<usize>,
}

impl PackageSpec {
    pub fn with_slides(slides: Vec<String>) -> Self {
        let order = (0..slides.len()).collect();
        Self { slides, order }
    }
}

/// A title shape and a second shape that is a body placeholder only when
/// `with_body` is set (otherwise a plain content placeholder).
pub fn slide_xml(tag: &str, with_body: bool) -> String {
    let ph = if with_body {
        r#"<p:ph type="body" idx="1"/>"#
    } else {
        r#"<p:ph idx="1"/>"#
    };
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<p:sld {ns}><p:cSld><p:spTree>"#,
            r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/>"#,
            r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>Sprint Review {tag}</a:t></a:r></a:p></p:txBody></p:sp>"#,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content"/><p:cNvSpPr/><p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr/>"#,
            r#"<p:txBody><a:bodyPr anchor="t"/><a:lstStyle/>"#,
            r#"<a:p><a:pPr marL="0"/><a:r><a:rPr lang="en-US"/><a:t>old body line</a:t></a:r><a:endParaRPr lang="en-US"/></a:p>"#,
            r#"<a:p><a:r><a:rPr lang="en-US"/><a:t>second old line</a:t></a:r></a:p>"#,
            r#"</p:txBody></p:sp>"#,
            r#"</p:spTree></p:cSld></p:sld>"#,
        ),
        ns = NS,
        tag = tag,
        ph = ph,
    )
}

fn presentation_xml(order: &[usize]) -> String {
    let ids: String = order
        .iter()
        .enumerate()
        .map(|(pos, slide)| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + pos, slide + 1))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {NS}><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#
    )
}

fn presentation_rels(count: usize) -> String {
    let rels: String = (0..count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
                i + 1,
                i + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
    )
}

/// Minimal `.pptx` archive holding the given slides.
pub fn package_bytes(spec: &PackageSpec) -> Vec<u8> {
    let mut parts: Vec<(String, String)> = vec![
        (
            "[Content_Types].xml".into(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#.into(),
        ),
        ("ppt/presentation.xml".into(), presentation_xml(&spec.order)),
        ("ppt/_rels/presentation.xml.rels".into(), presentation_rels(spec.slides.len())),
    ];
    for (i, slide) in spec.slides.iter().enumerate() {
        parts.push((format!("ppt/slides/slide{}.xml", i + 1), slide.clone()));
    }

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in parts {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}
