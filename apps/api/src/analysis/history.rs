//! History view: renders a user's analyses as a markdown report.

use crate::analysis::report::JobRecommendation;
use crate::models::analysis::HistoryEntry;

pub const EMPTY_HISTORY_MESSAGE: &str = "No analyses yet. Upload a resume to get started!";

/// Qualitative band for a 0–100 match score.
pub fn match_tier(score: u8) -> &'static str {
    match score {
        80.. => "strong",
        60..=79 => "moderate",
        _ => "low",
    }
}

/// Renders analyses in the order given (callers pass newest first).
pub fn render_history_to_md(entries: &[HistoryEntry]) -> String {
    let mut md = String::from("# Resume Analysis History\n\n");
    if entries.is_empty() {
        md.push_str(EMPTY_HISTORY_MESSAGE);
        md.push('\n');
        return md;
    }

    for entry in entries {
        let analysis = &entry.analysis;
        let report = &analysis.report;

        md.push_str(&format!("## {}\n\n", entry.resume.file_name));
        md.push_str(&format!(
            "- **Analyzed:** {}\n",
            analysis.created_at.format("%B %-d, %Y")
        ));
        md.push_str(&format!(
            "- **Uploaded:** {}\n",
            entry.resume.upload_date.format("%B %-d, %Y")
        ));
        md.push_str(&format!(
            "- **Experience:** {} years\n\n",
            report.experience_years
        ));

        if !report.job_recommendations.is_empty() {
            md.push_str("### Job Recommendations\n\n");
            for job in &report.job_recommendations {
                render_recommendation(&mut md, job);
            }
        }

        md.push_str("### Skills & Expertise\n\n");
        if report.skills.is_empty() {
            md.push_str("_None listed_\n\n");
        } else {
            md.push_str(&report.skills.join(", "));
            md.push_str("\n\n");
        }

        if !report.education.is_empty() {
            md.push_str("### Education\n\n");
            for edu in &report.education {
                md.push_str(&format!("- **{}**\n", edu.degree));
                md.push_str(&format!("  {} • {}\n", edu.institution, edu.year));
            }
            md.push('\n');
        }

        md.push_str("### Key Strengths\n\n");
        for strength in &report.strengths {
            md.push_str(&format!("- ✓ {strength}\n"));
        }
        md.push('\n');

        md.push_str("### Growth Areas\n\n");
        for improvement in &report.improvements {
            md.push_str(&format!("- → {improvement}\n"));
        }
        md.push('\n');
    }
    md
}

fn render_recommendation(md: &mut String, job: &JobRecommendation) {
    md.push_str(&format!("#### {}\n\n", job.title));
    md.push_str(&format!("_{}_\n\n", job.company_type));
    if let Some(score) = job.match_score {
        md.push_str(&format!(
            "- **Match Score:** {score}% ({})\n",
            match_tier(score)
        ));
    }
    md.push_str(&format!("- **Requirements:** {}\n", job.requirements));
    md.push_str(&format!("- **Salary Range:** {}\n", job.salary_range));
    if let Some(growth) = job.growth_potential {
        md.push_str(&format!("- **Growth Potential:** {}\n", growth.as_str()));
    }
    if let Some(why) = &job.why_good_fit {
        md.push_str(&format!("\n> {why}\n"));
    }
    md.push('\n');
}
