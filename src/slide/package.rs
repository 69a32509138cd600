use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use super::error::SlideError;

const PRESENTATION: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

/// A `.pptx` package held in memory as its ordered list of parts.
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    pub fn read<R: Read + Seek>(reader: R) -> Result<Self, SlideError> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            parts.push((name, data));
        }
        Ok(Self { parts })
    }

    pub fn open(path: &Path) -> Result<Self, SlideError> {
        Self::read(File::open(path)?)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(part, _)| part == name)
            .map(|(_, data)| data.as_slice())
    }

    pub fn part_str(&self, name: &str) -> Result<&str, SlideError> {
        let data = self
            .part(name)
            .ok_or_else(|| SlideError::MissingPart(name.to_string()))?;
        std::str::from_utf8(data).map_err(|_| SlideError::Encoding(name.to_string()))
    }

    /// Replace a part in place, keeping its position in the archive.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|(part, _)| part == name) {
            Some((_, existing)) => *existing = data,
            None => self.parts.push((name.to_string(), data)),
        }
    }

    pub fn write<W: Write + Seek>(&self, writer: W) -> Result<W, SlideError> {
        let mut zip = zip::ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }
        Ok(zip.finish()?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SlideError> {
        self.write(File::create(path)?)?;
        Ok(())
    }

    /// Slide part names in presentation order, following `p:sldIdLst`
    /// through the presentation relationships.
    pub fn slide_parts(&self) -> Result<Vec<String>, SlideError> {
        let rel_ids = slide_rel_ids(self.part_str(PRESENTATION)?)?;
        let targets = relationship_targets(self.part_str(PRESENTATION_RELS)?)?;

        rel_ids
            .into_iter()
            .map(|rid| match targets.get(&rid) {
                Some(target) => Ok(resolve_target("ppt", target)),
                None => Err(SlideError::DanglingRelationship(rid)),
            })
            .collect()
    }
}

/// Value of the attribute with the given local name. With `prefixed`, only a
/// namespaced attribute (such as `r:id`) matches.
pub(super) fn attribute(
    e: &BytesStart,
    local: &[u8],
    prefixed: bool,
) -> Result<Option<String>, SlideError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == local && attr.key.prefix().is_some() == prefixed {
            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
        }
    }
    Ok(None)
}

fn slide_rel_ids(xml: &str) -> Result<Vec<String>, SlideError> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                if let Some(rid) = attribute(&e, b"id", true)? {
                    ids.push(rid);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(ids)
}

fn relationship_targets(xml: &str) -> Result<HashMap<String, String>, SlideError> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) =
                    (attribute(&e, b"Id", false)?, attribute(&e, b"Target", false)?)
                {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(targets)
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}
