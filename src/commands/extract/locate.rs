use anyhow::{Context, Result};
use regex::Regex;

use super::normalize::normalize_page_text;
use super::sections::SectionGrammar;
use crate::model::NarrativeSections;

pub(crate) fn title_pattern(title: &str) -> Result<Regex> {
    let escaped = title
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<String>>()
        .join(r"\s+");

    Regex::new(&format!("(?i){escaped}"))
        .with_context(|| format!("failed to compile title pattern for {title:?}"))
}

pub(crate) fn locate_sections(
    pages: &[String],
    title: &str,
    grammar: &SectionGrammar,
) -> Result<NarrativeSections> {
    let pattern = title_pattern(title)?;
    let mut occurrence_count = 0_usize;
    let mut collected = String::new();

    for page_text in pages {
        let page_norm = normalize_page_text(page_text);

        if collected.is_empty() {
            if let Some(found) = pattern.find(&page_norm) {
                occurrence_count += 1;
                if occurrence_count == 2 {
                    collected.push_str(&page_norm[found.end()..]);
                    collected.push(' ');
                }
            }
        } else {
            collected.push_str(&page_norm);
            collected.push(' ');
        }

        if let Some(sections) = grammar.extract(&collected) {
            return Ok(sections);
        }
    }

    Ok(NarrativeSections::default())
}
