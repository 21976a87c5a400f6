//! Terminal rendering for snapshots, series, diagnostics and document cards.
//!
//! Everything renders into a `String` so the layout can be tested; callers
//! print the result.

use std::fmt::{self, Write};

use regstock_analysis::{AnalyzedDocument, CorpusDiagnostics, RequirementCount, Snapshot, Totals};
use regstock_core::{Document, IndustryCode, LegislationType};
use regstock_store::LoadReport;

const MAX_TITLE_CHARS: usize = 60;
const MAX_DETAILS_SHOWN: usize = 10;

// ── Corpus ──

pub fn load_report(report: &LoadReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Corpus")?;
    writeln!(out, "  {:<26} {:?}", "layout", report.envelope)?;
    writeln!(out, "  {:<26} {}", "records", report.records)?;
    writeln!(out, "  {:<26} {}", "loaded", report.loaded)?;
    if report.malformed > 0 {
        writeln!(out, "  {:<26} {}", "malformed (skipped)", report.malformed)?;
    }
    out.push('\n');
    Ok(out)
}

pub fn diagnostics(diag: &CorpusDiagnostics) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Diagnostics")?;
    writeln!(out, "  {:<26} {}", "processed", diag.processed)?;
    writeln!(out, "  {:<26} {}", "excluded", diag.excluded_total())?;
    for (category, count) in &diag.excluded {
        writeln!(out, "    {:<24} {}", category, count)?;
    }
    writeln!(out, "  {:<26} {}", "unresolved dates", diag.unresolved_dates.len())?;
    for id in diag.unresolved_dates.iter().take(MAX_DETAILS_SHOWN) {
        writeln!(out, "    {id}")?;
    }
    if diag.unresolved_dates.len() > MAX_DETAILS_SHOWN {
        writeln!(out, "    ... and {} more", diag.unresolved_dates.len() - MAX_DETAILS_SHOWN)?;
    }
    writeln!(out, "  {:<26} {}", "empty text", diag.empty_text)?;
    writeln!(out, "  {:<26} {}", "missing title", diag.missing_title)?;
    writeln!(out, "  {:<26} {}", "source says not in force", diag.flagged_not_in_force)?;
    if !diag.commencement_sources.is_empty() {
        writeln!(out, "  commencement source")?;
        for (source, count) in &diag.commencement_sources {
            writeln!(out, "    {:<24} {}", source.as_str(), count)?;
        }
    }
    out.push('\n');
    Ok(out)
}

// ── Snapshots ──

pub fn snapshot_table(snapshot: &Snapshot) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "=== In force at {} ===", snapshot.reference_date)?;
    writeln!(
        out,
        "{:<10} {:<52} {:>8} {:>10} {:>10}",
        "type", "industry", "docs", "bc", "regdata"
    )?;
    for row in &snapshot.rows {
        writeln!(
            out,
            "{:<10} {:<52} {:>8} {:>10} {:>10}",
            row.legislation_type.as_str(),
            row.industry.label(),
            row.document_count,
            row.bc_total,
            row.regdata_total
        )?;
    }
    out.push('\n');
    for (legislation_type, totals) in snapshot.by_type() {
        totals_line(&mut out, legislation_type.as_str(), &totals)?;
    }
    totals_line(&mut out, "Total", &snapshot.totals())?;
    Ok(out)
}

/// One line per snapshot with Primary and Secondary columns.
pub fn series_table(series: &[Snapshot]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<12} {:>9} {:>9} {:>11} {:>11} {:>11} {:>11}",
        "date", "primary", "second.", "bc prim.", "bc sec.", "rd prim.", "rd sec."
    )?;
    for snapshot in series {
        let by_type = snapshot.by_type();
        let primary = by_type.get(&LegislationType::Primary).copied().unwrap_or_default();
        let secondary = by_type.get(&LegislationType::Secondary).copied().unwrap_or_default();
        writeln!(
            out,
            "{:<12} {:>9} {:>9} {:>11} {:>11} {:>11} {:>11}",
            snapshot.reference_date.to_string(),
            primary.document_count,
            secondary.document_count,
            primary.bc_total,
            secondary.bc_total,
            primary.regdata_total,
            secondary.regdata_total
        )?;
    }
    Ok(out)
}

fn totals_line(out: &mut String, label: &str, totals: &Totals) -> fmt::Result {
    writeln!(
        out,
        "{:<63} {:>8} {:>10} {:>10}",
        label, totals.document_count, totals.bc_total, totals.regdata_total
    )
}

// ── Document card ──

/// Vertical card for one analysed document, grouped by section.
pub fn document_card(doc: &AnalyzedDocument, source: Option<&Document>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "=== {} ===", doc.register_id)?;
    if !doc.title.is_empty() {
        writeln!(out, "{}", doc.title)?;
    }
    out.push('\n');

    writeln!(out, "Classification")?;
    field(&mut out, "legislation_type", doc.legislation_type.as_str())?;
    field(&mut out, "subtype", &doc.subtype)?;
    field(&mut out, "subtype_group", doc.subtype_group.as_str())?;
    field(&mut out, "industry", &doc.industry.code.label())?;
    field(&mut out, "confidence", doc.industry.confidence.as_str())?;
    if !doc.industry.matched_keywords.is_empty() {
        field(&mut out, "matched_keywords", &doc.industry.matched_keywords.join(", "))?;
    }
    if doc.industry.scores.len() > 1 {
        let mut scores: Vec<(IndustryCode, u64)> =
            doc.industry.scores.iter().map(|(c, s)| (*c, *s)).collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let rendered: Vec<String> = scores.iter().map(|(c, s)| format!("{c}={s}")).collect();
        field(&mut out, "scores", &rendered.join(" "))?;
    }
    if let Some(category) = &doc.excluded_by {
        field(&mut out, "excluded_by", category)?;
    }
    out.push('\n');

    writeln!(out, "Dates")?;
    match &doc.dates {
        Some(dates) => {
            field(&mut out, "commencement", &dates.commencement.to_string())?;
            field(&mut out, "commencement_source", dates.source.as_str())?;
            field(
                &mut out,
                "repeal",
                &dates.repeal.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            )?;
        }
        None => field(&mut out, "commencement", "(unresolved)")?,
    }
    if let Some(src) = source {
        if let Some(making) = &src.making_date {
            field(&mut out, "making_date", making)?;
        }
        if !src.status_history.is_empty() {
            let history: Vec<String> = src
                .status_history
                .iter()
                .map(|e| format!("{}@{}", e.status, e.start.as_deref().unwrap_or("?")))
                .collect();
            field(&mut out, "status_history", &history.join(", "))?;
        }
    }
    if let Some(flag) = doc.source_in_force {
        field(&mut out, "source_in_force", if flag { "yes" } else { "no" })?;
    }
    out.push('\n');

    requirement_section(&mut out, "BC requirements", &doc.bc)?;
    requirement_section(&mut out, "RegData restrictions", &doc.regdata)?;
    Ok(out)
}

pub fn requirement_section(out: &mut String, header: &str, count: &RequirementCount) -> fmt::Result {
    writeln!(out, "{header}")?;
    field(out, "total", &count.total.to_string())?;
    for (term, n) in &count.by_term {
        if *n > 0 {
            field(out, term, &n.to_string())?;
        }
    }
    if !count.details.is_empty() {
        writeln!(out, "  matches ({}):", count.details.len())?;
        for detail in count.details.iter().take(MAX_DETAILS_SHOWN) {
            writeln!(out, "    {:<10} @{:<8} {}", detail.term, detail.position, detail.context)?;
        }
        if count.details.len() > MAX_DETAILS_SHOWN {
            writeln!(out, "    ... and {} more", count.details.len() - MAX_DETAILS_SHOWN)?;
        }
    }
    out.push('\n');
    Ok(())
}

// ── Helpers ──

fn field(out: &mut String, name: &str, value: &str) -> fmt::Result {
    writeln!(out, "  {:<26} {}", name, value)
}

/// Shorten to [`MAX_TITLE_CHARS`] characters with a trailing ellipsis.
pub fn short_title(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let head: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
        format!("{head}...")
    } else {
        title.to_string()
    }
}
