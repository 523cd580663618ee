use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use super::locate::locate_sections;
use super::report::{derive_report_path, derive_styled_path, write_report, write_styled_report};
use super::sections::SectionGrammar;
use super::walker::{ControlHeading, OutlineWalker};
use crate::cli::ExtractArgs;
use crate::document::{DocumentSource, PopplerDocument, collect_tool_versions};
use crate::model::{
    ControlRecord, ExtractCounts, ExtractRunManifest, NarrativeSections, PdfSource,
};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

#[derive(Debug)]
pub(crate) struct ExtractionOutcome {
    pub(crate) outline_entries: usize,
    pub(crate) pages_extracted: usize,
    pub(crate) records: Vec<ControlRecord>,
    pub(crate) warnings: Vec<String>,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let Some(pdf_path) = args.pdf.clone() else {
        println!("No file selected.");
        return Ok(());
    };

    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    info!(pdf = %pdf_path.display(), run_id = %run_id, "starting control extraction");

    let document = PopplerDocument::new(&pdf_path, args.max_pages);
    let Some(outcome) = extract_from_source(&document)? else {
        println!("No embedded Table of Contents found.");
        return Ok(());
    };

    if args.json {
        write_json_records(&outcome.records)?;
    } else {
        println!("\n===== AUTOMATED / MANUAL CONTROLS =====\n");
        for record in &outcome.records {
            println!(
                "{} | {} | {} | {}",
                record.section_number,
                record.section_name,
                record.control_number,
                record.control_description
            );
        }
    }

    for warning in &outcome.warnings {
        warn!(warning = %warning, "degraded extraction");
    }

    if outcome.records.is_empty() {
        warn!("no qualifying controls found; no report written");
        return Ok(());
    }

    let report_path = args
        .report_path
        .clone()
        .unwrap_or_else(|| derive_report_path(&pdf_path));
    let styled_path = derive_styled_path(&report_path);

    write_report(&report_path, &outcome.records)?;
    write_styled_report(&styled_path, &outcome.records)?;
    println!("\nStyled Excel saved as: {}", styled_path.display());

    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| derive_manifest_path(&report_path));
    let manifest = build_run_manifest(
        &args,
        &pdf_path,
        &report_path,
        &styled_path,
        run_id,
        started_at,
        &outcome,
    )?;
    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote extraction run manifest");
    info!(
        controls = outcome.records.len(),
        report = %styled_path.display(),
        "extraction completed"
    );

    Ok(())
}

pub(crate) fn extract_from_source(
    document: &impl DocumentSource,
) -> Result<Option<ExtractionOutcome>> {
    let outline = document.outline()?;
    if outline.is_empty() {
        return Ok(None);
    }

    let walker = OutlineWalker::new()?;
    let grammar = SectionGrammar::new()?;
    let controls = walker.collect_controls(&outline);
    let pages = document.pages()?;

    info!(
        outline_entries = outline.len(),
        controls = controls.len(),
        pages = pages.len(),
        "scanning controls"
    );

    let mut records = Vec::with_capacity(controls.len());
    let mut warnings = Vec::new();

    for control in controls {
        let sections = locate_sections(&pages, &control.raw_title, &grammar)?;
        if sections.profile_applicability.is_none() {
            warnings.push(format!(
                "narrative sections not found for control: {}",
                control.raw_title
            ));
        }
        records.push(assemble_record(control, sections));
    }

    Ok(Some(ExtractionOutcome {
        outline_entries: outline.len(),
        pages_extracted: pages.len(),
        records,
        warnings,
    }))
}

fn assemble_record(heading: ControlHeading, sections: NarrativeSections) -> ControlRecord {
    ControlRecord {
        section_number: heading.section_number,
        section_name: heading.section_name,
        control_number: heading.control_number,
        control_description: heading.control_description,
        profile_applicability: sections.profile_applicability,
        description: sections.description,
        rationale: sections.rationale,
        impact: sections.impact,
        audit: sections.audit,
        remediation: sections.remediation,
    }
}

fn write_json_records(records: &[ControlRecord]) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, records)
        .context("failed to serialize control records")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn derive_manifest_path(report_path: &Path) -> PathBuf {
    let stem = report_path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("extract");

    report_path.with_file_name(format!("{stem}_run.json"))
}

fn build_run_manifest(
    args: &ExtractArgs,
    pdf_path: &Path,
    report_path: &Path,
    styled_path: &Path,
    run_id: String,
    started_at: String,
    outcome: &ExtractionOutcome,
) -> Result<ExtractRunManifest> {
    let filename = pdf_path
        .file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .with_context(|| format!("invalid UTF-8 filename: {}", pdf_path.display()))?;

    let controls_with_sections = outcome
        .records
        .iter()
        .filter(|record| record.profile_applicability.is_some())
        .count();

    Ok(ExtractRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_extract_command(args, pdf_path),
        tool_versions: collect_tool_versions()?,
        source: PdfSource {
            filename,
            sha256: sha256_file(pdf_path)?,
        },
        report_path: report_path.display().to_string(),
        styled_report_path: styled_path.display().to_string(),
        counts: ExtractCounts {
            outline_entries: outcome.outline_entries,
            pages_extracted: outcome.pages_extracted,
            controls_found: outcome.records.len(),
            controls_with_sections,
            controls_missing_sections: outcome.records.len() - controls_with_sections,
        },
        warnings: outcome.warnings.clone(),
    })
}

fn render_extract_command(args: &ExtractArgs, pdf_path: &Path) -> String {
    let mut command = vec![
        "cisbench".to_string(),
        "extract".to_string(),
        pdf_path.display().to_string(),
    ];

    if let Some(path) = &args.report_path {
        command.push("--report-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(max_pages) = args.max_pages {
        command.push("--max-pages".to_string());
        command.push(max_pages.to_string());
    }
    if args.json {
        command.push("--json".to_string());
    }

    command.join(" ")
}
