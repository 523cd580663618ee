use std::collections::BTreeMap;

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::OutlineEntry;

pub(crate) const CONTROL_MARKERS: [&str; 2] = ["(Manual)", "(Automated)"];

#[derive(Debug, Default)]
pub(crate) struct AncestorTrail {
    titles: BTreeMap<usize, String>,
}

impl AncestorTrail {
    pub(crate) fn record(&mut self, depth: usize, title: &str) {
        self.titles.insert(depth, title.to_string());
    }

    pub(crate) fn at_depth(&self, depth: usize) -> Option<&str> {
        self.titles.get(&depth).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ControlHeading {
    pub(crate) section_number: String,
    pub(crate) section_name: String,
    pub(crate) control_number: String,
    pub(crate) control_description: String,
    pub(crate) raw_title: String,
    pub(crate) page: i64,
}

#[derive(Debug)]
pub(crate) struct OutlineWalker {
    numbered_heading: Regex,
}

impl OutlineWalker {
    pub(crate) fn new() -> Result<Self> {
        let numbered_heading =
            Regex::new(r"^([\d.]+)\s+(.*)").context("failed to compile numbered heading regex")?;

        Ok(Self { numbered_heading })
    }

    pub(crate) fn collect_controls(&self, outline: &[OutlineEntry]) -> Vec<ControlHeading> {
        let mut inside = false;
        let mut trail = AncestorTrail::default();
        let mut controls = Vec::new();

        for entry in outline {
            let title = entry.title.trim();

            if title.starts_with("Recommendations") {
                inside = true;
            }
            if title.starts_with("Appendix") {
                break;
            }
            if !inside {
                continue;
            }

            trail.record(entry.depth, title);

            if !CONTROL_MARKERS.iter().any(|marker| title.contains(marker)) {
                continue;
            }

            let parent_title = trail
                .at_depth(entry.depth.saturating_sub(1))
                .unwrap_or_default();
            let (section_number, section_name) = self.split_numbered_heading(parent_title);
            let (control_number, control_description) = self.split_numbered_heading(title);

            controls.push(ControlHeading {
                section_number,
                section_name,
                control_number,
                control_description,
                raw_title: title.to_string(),
                page: entry.page,
            });
        }

        controls
    }

    pub(crate) fn split_numbered_heading(&self, title: &str) -> (String, String) {
        match self.numbered_heading.captures(title) {
            Some(captures) => (captures[1].to_string(), captures[2].to_string()),
            None => (String::new(), title.to_string()),
        }
    }
}
