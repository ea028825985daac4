//! Printable plain-text rendering of an `AnalysisReport`.
//!
//! Purely a formatting pass: nothing here recomputes statuses or scores.

use chrono::{DateTime, Utc};

use crate::models::{AnalysisReport, MetaTagObservation, TagStatus};

pub const LINES_PER_PAGE: usize = 60;
pub const LINE_WIDTH: usize = 96;
const PAGE_BREAK: char = '\u{000C}';
const PRODUCT: &str = "SEO Analyzer";
const OVERVIEW_LABEL_WIDTH: usize = 18;

pub fn status_label(status: TagStatus) -> &'static str {
    match status {
        TagStatus::Good => "Good",
        TagStatus::Warning => "Needs Improvement",
        TagStatus::Error => "Missing",
        TagStatus::Info => "Information",
    }
}

pub fn score_band(score: u8) -> &'static str {
    match score {
        80..=u8::MAX => "Good",
        50..=79 => "Needs Work",
        _ => "Poor",
    }
}

/// `seo-analysis-<url with every non-alphanumeric replaced by '-'>.txt`
pub fn report_filename(url: &str) -> String {
    let slug: String = url
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("seo-analysis-{slug}.txt")
}

/// Greedy word wrap; words longer than the width are split.
fn wrap(text: &str, width: usize, indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    let avail = width.saturating_sub(indent).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > avail {
                if !current.is_empty() {
                    lines.push(format!("{pad}{current}"));
                    current.clear();
                }
                let rest = word.split_off(avail);
                lines.push(format!("{pad}{}", word.iter().collect::<String>()));
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word.chars().count() > avail {
                lines.push(format!("{pad}{current}"));
                current.clear();
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(format!("{pad}{current}"));
    }
    lines
}

fn heading(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push("=".repeat(title.chars().count()));
}

fn tag_section(lines: &mut Vec<String>, title: &str, tags: &[MetaTagObservation]) {
    if tags.is_empty() {
        return;
    }
    heading(lines, title);
    for tag in tags {
        let key = tag.key.as_str();
        let label = status_label(tag.status);
        let gap = LINE_WIDTH.saturating_sub(key.chars().count() + label.len()).max(1);
        lines.push(format!("{key}{}{label}", " ".repeat(gap)));
        if let Some(message) = &tag.message {
            lines.extend(wrap(&format!("Note: {message}"), LINE_WIDTH, 2));
        }
        if let Some(content) = &tag.content {
            lines.extend(wrap(content, LINE_WIDTH, 4));
        }
    }
}

fn body_lines(report: &AnalysisReport, generated_at: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        "SEO Analysis Report".to_string(),
        format!("Generated on: {}", generated_at.format("%B %-d, %Y %H:%M UTC")),
        format!("Website: {}", report.url),
    ];

    heading(&mut lines, "Overview");
    let page_title = report.page_title.as_deref().unwrap_or("Untitled Page");
    for (i, line) in wrap(page_title, LINE_WIDTH, OVERVIEW_LABEL_WIDTH)
        .into_iter()
        .enumerate()
    {
        if i == 0 {
            let label = format!("{:<width$}", "Page Title:", width = OVERVIEW_LABEL_WIDTH);
            lines.push(format!("{label}{}", line.trim_start()));
        } else {
            lines.push(line);
        }
    }
    lines.push(format!(
        "SEO Score:        {}/100 ({})",
        report.seo_score,
        score_band(report.seo_score)
    ));
    lines.push(format!("Meta Tags Found:  {}", report.meta_tags_count));
    lines.push(format!("Issues Found:     {}", report.issues_count));

    tag_section(&mut lines, "Basic SEO Meta Tags", &report.basic_meta_tags);
    tag_section(&mut lines, "Social Media Meta Tags", &report.social_meta_tags);
    tag_section(&mut lines, "Technical Meta Tags", &report.technical_meta_tags);

    if !report.recommendations.is_empty() {
        heading(&mut lines, "Recommendations");
        for (i, rec) in report.recommendations.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, rec.title));
            lines.extend(wrap(&rec.description, LINE_WIDTH, 3));
            if let Some(code) = &rec.code {
                lines.extend(code.lines().map(|l| format!("      {l}")));
            }
            lines.push(String::new());
        }
    }
    lines
}

/// Render the report as paginated plain text, each page ending in a footer
/// and pages separated by form feeds.
pub fn render_report(report: &AnalysisReport, generated_at: DateTime<Utc>) -> String {
    let lines = body_lines(report, generated_at);
    // two lines per page go to the footer rule and footer text
    let per_page = LINES_PER_PAGE - 2;
    let pages: Vec<&[String]> = lines.chunks(per_page).collect();
    let total = pages.len();

    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push(PAGE_BREAK);
        }
        for line in page.iter() {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&"-".repeat(LINE_WIDTH));
        out.push('\n');
        out.push_str(&format!(
            "Page {} of {total} | {PRODUCT} | {}\n",
            i + 1,
            report.url
        ));
    }
    out
}
