use anyhow::Result;
use tracing::info;

use crate::cli::OutlineArgs;
use crate::document::{DocumentSource, PopplerDocument};

pub fn run(args: OutlineArgs) -> Result<()> {
    let Some(pdf_path) = args.pdf else {
        println!("No file selected.");
        return Ok(());
    };

    let document = PopplerDocument::new(&pdf_path, None);
    let entries = document.outline()?;

    if entries.is_empty() {
        println!("No embedded Table of Contents found.");
        return Ok(());
    }

    info!(
        entries = entries.len(),
        pdf = %pdf_path.display(),
        "loaded embedded outline"
    );

    for entry in &entries {
        let indent = "  ".repeat(entry.depth.saturating_sub(1));
        println!("{}{} (p. {})", indent, entry.title, entry.page);
    }

    Ok(())
}
