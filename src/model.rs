use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub depth: usize,
    pub title: String,
    pub page: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarrativeSections {
    pub profile_applicability: Option<String>,
    pub description: Option<String>,
    pub rationale: Option<String>,
    pub impact: Option<String>,
    pub audit: Option<String>,
    pub remediation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlRecord {
    pub section_number: String,
    pub section_name: String,
    pub control_number: String,
    pub control_description: String,
    pub profile_applicability: Option<String>,
    pub description: Option<String>,
    pub rationale: Option<String>,
    pub impact: Option<String>,
    pub audit: Option<String>,
    pub remediation: Option<String>,
}

impl ControlRecord {
    pub fn column_values(&self) -> [&str; 10] {
        [
            &self.section_number,
            &self.section_name,
            &self.control_number,
            &self.control_description,
            self.profile_applicability.as_deref().unwrap_or(""),
            self.description.as_deref().unwrap_or(""),
            self.rationale.as_deref().unwrap_or(""),
            self.impact.as_deref().unwrap_or(""),
            self.audit.as_deref().unwrap_or(""),
            self.remediation.as_deref().unwrap_or(""),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub pdftotext: String,
    pub pdftohtml: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PdfSource {
    pub filename: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractCounts {
    pub outline_entries: usize,
    pub pages_extracted: usize,
    pub controls_found: usize,
    pub controls_with_sections: usize,
    pub controls_missing_sections: usize,
}

#[derive(Debug, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub tool_versions: ToolVersions,
    pub source: PdfSource,
    pub report_path: String,
    pub styled_report_path: String,
    pub counts: ExtractCounts,
    pub warnings: Vec<String>,
}
