use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use reponamer_core::{NamingStyle, RenamePlan};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Txt,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => ReportFormat::Csv,
            Some("json") => ReportFormat::Json,
            _ => ReportFormat::Txt,
        }
    }
}

/// Everything a report records besides the plan itself.
pub struct ReportContext<'a> {
    pub folder: &'a Path,
    pub style: NamingStyle,
    pub ignore_dirs: Vec<String>,
    pub generated: DateTime<Local>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    timestamp: String,
    folder: String,
    style: NamingStyle,
    ignore_dirs: &'a [String],
    changes: &'a RenamePlan,
}

pub fn write_report(
    path: &Path,
    format: ReportFormat,
    context: &ReportContext,
    plan: &RenamePlan,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create report {:?}", path))?;
    let mut writer = BufWriter::new(file);

    match format {
        ReportFormat::Txt => write_txt(&mut writer, context, plan)?,
        ReportFormat::Csv => write_csv(&mut writer, plan)?,
        ReportFormat::Json => write_json(&mut writer, context, plan)?,
    }

    writer.flush()?;
    Ok(())
}

fn write_txt<W: Write>(writer: &mut W, context: &ReportContext, plan: &RenamePlan) -> Result<()> {
    writeln!(writer, "Repo Namer Report")?;
    writeln!(writer, "Generated: {}", context.generated.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(writer, "Folder: {}", context.folder.display())?;
    writeln!(writer, "Style: {}", context.style)?;
    writeln!(writer, "Ignore: {}", context.ignore_dirs.join(","))?;
    writeln!(writer)?;
    writeln!(writer, "Changes ({} items):", plan.len())?;
    for entry in plan {
        writeln!(writer, "  {} → {}", entry.old.display(), entry.new.display())?;
    }
    Ok(())
}

fn write_csv<W: Write>(writer: &mut W, plan: &RenamePlan) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Old Path", "New Path"])?;
    for entry in plan {
        csv_writer.write_record([
            entry.old.to_string_lossy().as_bytes(),
            entry.new.to_string_lossy().as_bytes(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_json<W: Write>(writer: &mut W, context: &ReportContext, plan: &RenamePlan) -> Result<()> {
    let report = JsonReport {
        timestamp: context.generated.to_rfc3339(),
        folder: context.folder.display().to_string(),
        style: context.style,
        ignore_dirs: &context.ignore_dirs,
        changes: plan,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}
