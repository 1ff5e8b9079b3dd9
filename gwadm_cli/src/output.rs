//! Rendering of command results for terminal and machine consumption

use anyhow::Result;
use colored::*;
use gwadm_client_core::{MoveReport, OrgUnitInfo};
use serde_json::json;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Unknown output format: {}", s),
        }
    }
}

/// Render a membership move report
pub fn format_move_report(report: &MoveReport, unit: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let skipped: Vec<_> = report
                .skipped
                .iter()
                .map(|s| {
                    json!({
                        "member": s.member.to_string(),
                        "reason": s.reason.to_string(),
                    })
                })
                .collect();

            let value = json!({
                "unit": unit,
                "requested": report.requested,
                "duplicates": report.duplicates,
                "already_present": report.already_present,
                "moved": report.moved,
                "skipped": skipped,
                "calls_made": report.calls_made,
                "metadata_applied": report.metadata_applied,
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();

            out.push_str(&format!(
                "{} {}\n",
                "Updated org unit".green().bold(),
                unit.bold()
            ));
            out.push_str(&format!("  Requested: {}\n", report.requested));
            if report.duplicates > 0 {
                out.push_str(&format!("  Duplicates dropped: {}\n", report.duplicates));
            }
            if report.already_present > 0 {
                out.push_str(&format!(
                    "  Already in unit: {}\n",
                    report.already_present
                ));
            }
            out.push_str(&format!("  Moved: {}\n", report.moved.to_string().green()));

            if !report.skipped.is_empty() {
                out.push_str(&format!(
                    "  Skipped: {}\n",
                    report.skipped.len().to_string().yellow()
                ));
                for skip in &report.skipped {
                    out.push_str(&format!(
                        "    {} {} ({})\n",
                        "!".yellow(),
                        skip.member,
                        skip.reason
                    ));
                }
            }

            out.push_str(&format!("  API calls: {}\n", report.calls_made));
            if report.metadata_applied {
                out.push_str("  Metadata changes applied\n");
            }

            Ok(out)
        }
    }
}

/// Render org-unit metadata
pub fn format_unit_info(info: &OrgUnitInfo, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(info)?),
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("{}: {}\n", "Name".bold(), info.name));
            if let Some(description) = &info.description {
                out.push_str(&format!("{}: {}\n", "Description".bold(), description));
            }
            if let Some(parent) = &info.parent_path {
                out.push_str(&format!("{}: {}\n", "Parent".bold(), parent));
            }
            out.push_str(&format!(
                "{}: {}\n",
                "Block inheritance".bold(),
                info.block_inheritance
            ));
            Ok(out)
        }
    }
}
