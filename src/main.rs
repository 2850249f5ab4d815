//! Main entry point for the docpreview CLI application.
//!
//! Opens a local file or HTTP URL through a preview session, optionally
//! edits and saves it, then prints a summary or one page.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::Path;

use docpreview::Cli;
use docpreview::io::{ByteSource, HttpSource, LocalFileSink, LocalFileSource};
use docpreview::ooxml::xml::escape_html;
use docpreview::preview::{
    DocumentSummary, PageData, PageEdit, PreviewEngine, PreviewSession, PreviewState,
};

/// Separates per-page sections in an edits file.
const PAGE_BREAK: char = '\x0c';

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let source: Box<dyn ByteSource> = if cli.is_http_url() {
        Box::new(HttpSource::new(cli.file.clone())?.with_content_type(cli.content_type.clone()))
    } else {
        Box::new(
            LocalFileSource::new(Path::new(&cli.file)).with_content_type(cli.content_type.clone()),
        )
    };

    let session = PreviewSession::new(cli.config());
    session.open(source.as_ref()).await?;

    let edits = match &cli.edits {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };

    session
        .with_engine(|engine| prepare(engine, &cli, edits.as_deref()))
        .await?;

    if let Some(output) = &cli.output {
        let saved = session.save_to(&LocalFileSink::new(output)).await?;
        if !cli.quiet {
            eprintln!(
                "saved {} ({}, {}) to {}",
                saved.name,
                saved.content_type,
                format_size(saved.size as u64),
                output.display()
            );
        }
    }

    let summary = session
        .summary()
        .await
        .ok_or_else(|| anyhow!("no document to show"))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if cli.page.is_some() {
        let content = session
            .with_engine(|engine| {
                engine
                    .document()
                    .and_then(|doc| doc.current())
                    .map(|page| page.data.render())
            })
            .await
            .unwrap_or_default();
        println!("{}", content);
    } else if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Apply page, zoom and edit options to the freshly opened document.
fn prepare(engine: &mut PreviewEngine, cli: &Cli, edits: Option<&str>) -> Result<()> {
    if let PreviewState::Error { message } = engine.state() {
        bail!("{}", message);
    }

    if let Some(page) = cli.page {
        // Page 0 clamps to the first page like any other out-of-range value
        engine.navigate(page as isize - 1)?;
    }
    if let Some(zoom) = cli.zoom {
        engine.set_zoom(zoom)?;
    }

    if let Some(text) = edits {
        engine.begin_edit()?;

        let sections: Vec<&str> = text.split(PAGE_BREAK).collect();
        let changes: Vec<PageEdit> = match engine.document() {
            Some(doc) => doc
                .pages
                .iter()
                .zip(&sections)
                .map(|(page, section)| page_edit(&page.data, section))
                .collect(),
            None => Vec::new(),
        };
        if sections.len() > changes.len() {
            log::warn!(
                "{} edit section(s) but only {} page(s); extra sections ignored",
                sections.len(),
                changes.len()
            );
        }

        for (index, change) in changes.into_iter().enumerate() {
            engine.edit_page(index, change)?;
        }
    }

    Ok(())
}

/// Translate one plain-text section into the edit that fits `data`.
///
/// Documents get one paragraph per line, spreadsheets one row per line
/// with tab-separated cells.
fn page_edit(data: &PageData, section: &str) -> PageEdit {
    let section = section.strip_suffix('\n').unwrap_or(section);
    match data {
        PageData::Html { .. } => PageEdit::Html(
            section
                .lines()
                .map(|line| format!("<p>{}</p>", escape_html(line)))
                .collect(),
        ),
        PageData::Spreadsheet { .. } => PageEdit::Grid(
            section
                .lines()
                .map(|line| line.split('\t').map(str::to_string).collect())
                .collect(),
        ),
        _ => PageEdit::Text(section.to_string()),
    }
}

fn print_summary(summary: &DocumentSummary) {
    println!(
        "{}: {} ({}), {} page(s)",
        summary.file.name,
        summary.kind,
        format_size(summary.file.size as u64),
        summary.pages.len()
    );
    println!(
        "zoom {:.0}%{} (fit {:.0}%)",
        summary.zoom * 100.0,
        if summary.manual_zoom { " manual" } else { "" },
        summary.fit_zoom * 100.0
    );

    println!("{:>5}  {:>14}  Label", "Page", "Size");
    println!("{}", "-".repeat(40));
    for (i, page) in summary.pages.iter().enumerate() {
        let marker = if i == summary.current_page { '*' } else { ' ' };
        let size = format!("{:.0}x{:.0}", page.width, page.height);
        println!("{:>4}{}  {:>14}  {}", i + 1, marker, size, page.label);
    }

    for warning in &summary.warnings {
        eprintln!("warning: {}", warning);
    }
}

/// Format a byte size into a human-readable string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
