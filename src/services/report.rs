//! Report rendering
//!
//! Deterministic template substitution, never a second model call. The
//! output is one self-contained HTML document: inline CSS, no scripts, no
//! external assets. Rendering has no failure mode; absent narrative fields
//! come out as empty strings.

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::model::{AuditRequest, AuditResult, CategoryScore, Priority, CATEGORY_MAX};
use crate::services::grading;

/// Renders a structured audit result into a branded HTML report
pub struct ReportRenderer {
    cta_url: String,
}

impl ReportRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            cta_url: config.report_cta_url.clone(),
        }
    }

    /// Render the full report document
    pub fn render(
        &self,
        result: &AuditResult,
        request: &AuditRequest,
        assessment_date: DateTime<Utc>,
    ) -> String {
        let mut html = String::with_capacity(8 * 1024);

        html.push_str(&self.header(request, assessment_date));
        html.push_str(&self.executive_summary(result));
        html.push_str(&self.category_cards(result));
        html.push_str(&self.recommendations(result));
        html.push_str(&self.competitive_insight(result));
        html.push_str(&self.call_to_action());
        html.push_str(FOOTER);

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>Website Audit — {}</title>\n<style>{}</style>\n</head>\n<body>\n\
             <div class=\"page\">\n{}</div>\n</body>\n</html>\n",
            escape_html(&request.display_name()),
            STYLES,
            html
        )
    }

    fn header(&self, request: &AuditRequest, assessment_date: DateTime<Utc>) -> String {
        format!(
            "<header class=\"report-header\">\n\
             <div class=\"brand\">WEBSITE AUDIT SCORECARD</div>\n\
             <h1>{}</h1>\n\
             <p class=\"meta\"><a href=\"{}\">{}</a> · assessed {}</p>\n\
             </header>\n",
            escape_html(&request.display_name()),
            escape_html(&request.target_url),
            escape_html(&request.target_url),
            assessment_date.format("%B %-d, %Y"),
        )
    }

    fn executive_summary(&self, result: &AuditResult) -> String {
        let color = grading::score_color(result.overall_score).hex();
        format!(
            "<section class=\"summary\">\n\
             <div class=\"score-ring\" style=\"border-color:{color}\">\n\
             <span class=\"score\" style=\"color:{color}\">{score}</span>\n\
             <span class=\"score-max\">/100</span>\n\
             </div>\n\
             <div class=\"grade\" style=\"background:{color}\">Grade {grade}</div>\n\
             <p class=\"verdict\">{summary}</p>\n\
             </section>\n",
            color = color,
            score = result.overall_score,
            grade = escape_html(&result.grade),
            summary = escape_html(&result.summary),
        )
    }

    fn category_cards(&self, result: &AuditResult) -> String {
        let mut section = String::from("<section class=\"categories\">\n<h2>Category Breakdown</h2>\n");
        for (name, category) in result.categories.iter() {
            section.push_str(&category_card(name, category));
        }
        section.push_str("</section>\n");
        section
    }

    fn recommendations(&self, result: &AuditResult) -> String {
        if result.recommendations.is_empty() {
            return String::new();
        }

        let mut section =
            String::from("<section class=\"recommendations\">\n<h2>Top Fixes</h2>\n<ol>\n");
        // capped at 3 regardless of what validation let through
        for rec in result.recommendations.iter().take(3) {
            let class = match rec.priority {
                Priority::High => "priority-high",
                Priority::Medium => "priority-medium",
            };
            section.push_str(&format!(
                "<li class=\"{}\">\n\
                 <span class=\"priority\">{}</span>\n\
                 <strong>{}</strong>\n\
                 <p class=\"impact\">{}</p>\n\
                 <p class=\"fix\">{}</p>\n\
                 </li>\n",
                class,
                rec.priority.label(),
                escape_html(&rec.issue),
                escape_html(&rec.impact),
                escape_html(&rec.recommendation),
            ));
        }
        section.push_str("</ol>\n</section>\n");
        section
    }

    fn competitive_insight(&self, result: &AuditResult) -> String {
        format!(
            "<section class=\"insight\">\n<h2>Competitive Insight</h2>\n<p>{}</p>\n\
             <p class=\"bottom-line\">{}</p>\n</section>\n",
            escape_html(&result.competitive_insight),
            escape_html(&result.bottom_line),
        )
    }

    fn call_to_action(&self) -> String {
        format!(
            "<section class=\"cta\">\n\
             <p>Your website should be your hardest-working employee — not your weakest link.</p>\n\
             <a class=\"cta-button\" href=\"{}\">Book a free strategy call</a>\n\
             </section>\n",
            escape_html(&self.cta_url),
        )
    }
}

// ========== helpers ==========

/// Proportional bar width: `score × (100 / CATEGORY_MAX)` percent
fn bar_width_percent(score: u32) -> u32 {
    score * (100 / CATEGORY_MAX)
}

fn category_card(name: &str, category: &CategoryScore) -> String {
    let percent = bar_width_percent(category.score);
    let color = grading::score_color(percent).hex();
    format!(
        "<div class=\"category-card\">\n\
         <div class=\"category-head\"><h3>{name}</h3><span class=\"category-score\">{score}/{max}</span></div>\n\
         <div class=\"bar-track\"><div class=\"bar-fill\" style=\"width:{percent}%;background:{color}\"></div></div>\n\
         <p class=\"findings\">{findings}</p>\n\
         <p class=\"opportunity\">{opportunity}</p>\n\
         </div>\n",
        name = escape_html(name),
        score = category.score,
        max = CATEGORY_MAX,
        percent = percent,
        color = color,
        findings = escape_html(&category.findings),
        opportunity = escape_html(&category.opportunity),
    )
}

/// Minimal HTML escaping for interpolated request/model text
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLES: &str = "\
body{margin:0;font-family:-apple-system,'Segoe UI',Roboto,Helvetica,Arial,sans-serif;background:#f8fafc;color:#0f172a}\
.page{max-width:760px;margin:0 auto;padding:32px 20px}\
.report-header{text-align:center;margin-bottom:28px}\
.brand{font-size:12px;letter-spacing:3px;color:#64748b;margin-bottom:8px}\
.report-header h1{margin:0;font-size:28px}\
.meta{color:#64748b;font-size:14px}\
.meta a{color:#64748b}\
.summary{text-align:center;background:#fff;border-radius:12px;padding:28px;margin-bottom:20px;box-shadow:0 1px 3px rgba(0,0,0,.08)}\
.score-ring{display:inline-block;border:6px solid;border-radius:50%;width:120px;height:120px;line-height:112px}\
.score{font-size:40px;font-weight:700}\
.score-max{color:#94a3b8;font-size:16px}\
.grade{display:inline-block;color:#fff;font-weight:700;border-radius:6px;padding:4px 14px;margin:14px 0 6px}\
.verdict{color:#334155}\
.categories,.recommendations,.insight{background:#fff;border-radius:12px;padding:24px;margin-bottom:20px;box-shadow:0 1px 3px rgba(0,0,0,.08)}\
h2{font-size:18px;margin-top:0}\
.category-card{padding:12px 0;border-bottom:1px solid #e2e8f0}\
.category-card:last-child{border-bottom:none}\
.category-head{display:flex;justify-content:space-between;align-items:baseline}\
.category-head h3{margin:0;font-size:15px}\
.category-score{font-weight:700}\
.bar-track{background:#e2e8f0;border-radius:4px;height:8px;margin:8px 0}\
.bar-fill{height:8px;border-radius:4px}\
.findings,.opportunity{font-size:14px;color:#475569;margin:4px 0}\
.recommendations ol{padding-left:0;list-style:none;margin:0}\
.recommendations li{padding:12px;border-radius:8px;margin-bottom:10px;border-left:4px solid #e2e8f0}\
.priority{font-size:11px;font-weight:700;letter-spacing:1px;border-radius:4px;padding:2px 8px;color:#fff}\
.priority-high{border-left-color:#ef4444}\
.priority-high .priority{background:#ef4444}\
.priority-medium{border-left-color:#f97316}\
.priority-medium .priority{background:#f97316}\
.impact,.fix{font-size:14px;color:#475569;margin:6px 0 0}\
.bottom-line{font-weight:600}\
.cta{text-align:center;background:#0f172a;color:#fff;border-radius:12px;padding:28px;margin-bottom:20px}\
.cta-button{display:inline-block;background:#22c55e;color:#fff;text-decoration:none;font-weight:700;border-radius:8px;padding:12px 28px}\
.report-footer{text-align:center;color:#94a3b8;font-size:12px}";

const FOOTER: &str =
    "<footer class=\"report-footer\"><p>Generated automatically from a live screenshot of the site.</p></footer>\n";
