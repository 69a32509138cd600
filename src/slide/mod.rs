pub mod body;
pub mod error;
pub mod package;
pub mod theme;

#[cfg(test)]
pub mod fixtures;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::model::feature::{Feature, Grouping};
use crate::model::work_item::WorkItem;
use error::SlideError;
use package::Package;
use theme::{state_color, Rgb};

pub const FONT: &str = "Segoe UI Light";
pub const BULLET: &str = "▪ ";
/// Half an inch in EMU.
pub const STORY_INDENT: i64 = 457_200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    /// `None` inherits the placeholder's weight.
    pub bold: Option<bool>,
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub level: u8,
    pub margin_left: Option<i64>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

fn bullet(color: Rgb) -> Run {
    Run {
        text: BULLET.to_string(),
        bold: None,
        color: Some(color),
    }
}

fn feature_heading(feature: &Feature) -> Paragraph {
    let text = if feature.is_none() {
        feature.title.clone()
    } else {
        format!("[Feature {}] - {}", feature.id.unwrap_or_default(), feature.title)
    };
    Paragraph {
        level: 0,
        margin_left: None,
        runs: vec![
            bullet(state_color(feature.state)),
            Run {
                text,
                bold: Some(true),
                color: None,
            },
        ],
    }
}

fn story_row(story: &WorkItem) -> Paragraph {
    Paragraph {
        level: 1,
        margin_left: Some(STORY_INDENT),
        runs: vec![
            bullet(state_color(story.state)),
            Run {
                text: format!("US {}: ", story.id),
                bold: Some(true),
                color: None,
            },
            Run {
                text: story.title.clone(),
                bold: Some(false),
                color: None,
            },
        ],
    }
}

/// One heading per feature followed by its stories one level down.
pub fn layout(grouping: &Grouping) -> Vec<Paragraph> {
    let mut paragraphs = Vec::with_capacity(grouping.len() + grouping.story_count());
    for (feature, stories) in grouping.iter() {
        paragraphs.push(feature_heading(feature));
        paragraphs.extend(stories.iter().map(story_row));
    }
    paragraphs
}

pub fn output_file_name(date: NaiveDate) -> String {
    format!("MeetingMinutes-{}-SprintReview.pptx", date.format("%d%m%Y"))
}

/// Fill the body placeholder of the slide at `slide_index` in place.
pub fn fill_slide(
    package: &mut Package,
    slide_index: usize,
    paragraphs: &[Paragraph],
) -> Result<(), SlideError> {
    let slides = package.slide_parts()?;
    let part = slides
        .get(slide_index)
        .ok_or(SlideError::SlideOutOfRange {
            index: slide_index,
            count: slides.len(),
        })?
        .clone();
    let xml = body::replace_body_text(package.part_str(&part)?, paragraphs)?;
    package.set_part(&part, xml);
    Ok(())
}

/// Copy `template` to `output` with the backlog written into one slide.
pub fn write_review(
    template: &Path,
    slide_index: usize,
    paragraphs: &[Paragraph],
    output: &Path,
) -> Result<()> {
    let mut package = Package::open(template)
        .with_context(|| format!("Failed to open template {}", template.display()))?;
    fill_slide(&mut package, slide_index, paragraphs)
        .with_context(|| format!("Failed to fill slide {slide_index} of {}", template.display()))?;
    package
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(path = %output.display(), paragraphs = paragraphs.len(), "Presentation written");
    Ok(())
}
