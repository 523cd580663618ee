use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use regex::Regex;

use super::DocumentSource;
use crate::model::{OutlineEntry, ToolVersions};

#[derive(Debug, Clone)]
pub struct PopplerDocument {
    pdf_path: PathBuf,
    max_pages: Option<usize>,
}

impl PopplerDocument {
    pub fn new(pdf_path: impl Into<PathBuf>, max_pages: Option<usize>) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            max_pages,
        }
    }
}

impl DocumentSource for PopplerDocument {
    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        let output = Command::new("pdftohtml")
            .arg("-xml")
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg("1")
            .arg(&self.pdf_path)
            .arg("-stdout")
            .output()
            .with_context(|| {
                format!("failed to execute pdftohtml for {}", self.pdf_path.display())
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "pdftohtml returned non-zero exit status for {}: {}",
                self.pdf_path.display(),
                stderr.trim()
            );
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        parse_outline_xml(&xml)
    }

    fn pages(&self) -> Result<Vec<String>> {
        let mut command = Command::new("pdftotext");
        command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
        if let Some(max_pages) = self.max_pages {
            command.arg("-l").arg(max_pages.to_string());
        }
        command.arg(&self.pdf_path).arg("-");

        let output = command.output().with_context(|| {
            format!("failed to execute pdftotext for {}", self.pdf_path.display())
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "pdftotext returned non-zero exit status for {}: {}",
                self.pdf_path.display(),
                stderr.trim()
            );
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(split_form_feed_pages(&raw))
    }
}

pub(crate) fn parse_outline_xml(xml: &str) -> Result<Vec<OutlineEntry>> {
    let token_regex = Regex::new(r#"<outline\b[^>]*>|</outline>|<item\s+page="(\d+)"[^>]*>([^<]*)"#)
        .context("failed to compile outline token regex")?;

    let mut entries = Vec::<OutlineEntry>::new();
    let mut depth = 0_usize;

    for captures in token_regex.captures_iter(xml) {
        let token = captures.get(0).map(|value| value.as_str()).unwrap_or("");

        if token.starts_with("</outline") {
            depth = depth.saturating_sub(1);
            continue;
        }
        if token.starts_with("<outline") {
            depth += 1;
            continue;
        }
        if depth == 0 {
            continue;
        }

        let page = captures
            .get(1)
            .and_then(|value| value.as_str().parse::<i64>().ok())
            .unwrap_or(1);

        let raw_label = captures.get(2).map(|value| value.as_str()).unwrap_or("");
        let title = normalize_outline_label(raw_label);
        if title.is_empty() {
            continue;
        }

        entries.push(OutlineEntry { depth, title, page });
    }

    Ok(entries)
}

pub(crate) fn split_form_feed_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    pages
}

pub(crate) fn normalize_outline_label(raw_label: &str) -> String {
    raw_label
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace('\u{00a0}', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

pub fn collect_tool_versions() -> Result<ToolVersions> {
    Ok(ToolVersions {
        pdftotext: command_version("pdftotext", &["-v"])?,
        pdftohtml: command_version("pdftohtml", &["-v"])?,
    })
}

fn command_version(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to run {} {}", program, args.join(" ")))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    let version_line = source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .unwrap_or("unknown");

    Ok(version_line.to_string())
}
