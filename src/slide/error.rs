use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlideError {
    #[error("No BODY placeholder found on the specified slide.")]
    MissingBodyPlaceholder,
    #[error("Slide index {index} is out of range, template has {count} slides")]
    SlideOutOfRange { index: usize, count: usize },
    #[error("Package part {0} is missing from the template")]
    MissingPart(String),
    #[error("Slide relationship {0} has no target")]
    DanglingRelationship(String),
    #[error("Package part {0} is not valid UTF-8")]
    Encoding(String),
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Malformed package: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
