mod poppler;

pub use poppler::{PopplerDocument, collect_tool_versions};

use anyhow::Result;

use crate::model::OutlineEntry;

pub trait DocumentSource {
    fn outline(&self) -> Result<Vec<OutlineEntry>>;
    fn pages(&self) -> Result<Vec<String>>;
}
