use anyhow::{Context, Result};
use regex::Regex;

use crate::model::NarrativeSections;

#[derive(Debug)]
pub(crate) struct SectionGrammar {
    pattern: Regex,
}

impl SectionGrammar {
    pub(crate) fn new() -> Result<Self> {
        let pattern = Regex::new(
            r"(?is)Profile Applicability:\s*(.*?)\s*Description:\s*(.*?)\s*Rationale:\s*(.*?)\s*Impact:\s*(.*?)\s*Audit:\s*(.*?)\s*Remediation:\s*(.*?)\s*(?:Default Value|\z)",
        )
        .context("failed to compile narrative section regex")?;

        Ok(Self { pattern })
    }

    pub(crate) fn extract(&self, text: &str) -> Option<NarrativeSections> {
        let captures = self.pattern.captures(text)?;
        let field = |index: usize| {
            captures
                .get(index)
                .map(|value| value.as_str().trim().to_string())
        };

        Some(NarrativeSections {
            profile_applicability: field(1),
            description: field(2),
            rationale: field(3),
            impact: field(4),
            audit: field(5),
            remediation: field(6),
        })
    }
}
