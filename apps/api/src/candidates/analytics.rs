use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::store::CandidateRow;

/// How many missing skills the summary reports.
pub const TOP_MISSING_SKILLS: usize = 20;

/// Bucket for rows whose status is blank.
const UNKNOWN_STATUS: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total: usize,
    pub avg_score: f64,
    pub status_counts: BTreeMap<String, usize>,
    pub top_missing_skills: Vec<SkillCount>,
}

/// Read-only summary over stored rows, optionally restricted to one job.
///
/// Missing skills are split on any of `|`, `;`, `,` and lower-cased before
/// counting. Ties keep first-seen order.
pub fn summarize(rows: &[CandidateRow], job_id: Option<&str>) -> AnalyticsSummary {
    let rows: Vec<&CandidateRow> = rows
        .iter()
        .filter(|row| job_id.map_or(true, |job_id| row.job_id == job_id))
        .collect();

    let total = rows.len();
    let avg_score = if total == 0 {
        0.0
    } else {
        let sum: i64 = rows.iter().map(|row| row.total_score).sum();
        round_2dp(sum as f64 / total as f64)
    };

    let mut status_counts = BTreeMap::new();
    for row in &rows {
        let status = row.status.trim().to_lowercase();
        let status = if status.is_empty() {
            UNKNOWN_STATUS.to_string()
        } else {
            status
        };
        *status_counts.entry(status).or_insert(0) += 1;
    }

    AnalyticsSummary {
        total,
        avg_score,
        status_counts,
        top_missing_skills: top_missing_skills(&rows),
    }
}

fn top_missing_skills(rows: &[&CandidateRow]) -> Vec<SkillCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    let tokens = rows
        .iter()
        .flat_map(|row| row.missing_skills.split(['|', ';', ',']))
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty());

    for token in tokens {
        let count = counts.entry(token.clone()).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    let mut ranked: Vec<SkillCount> = order
        .into_iter()
        .map(|skill| {
            let count = counts[&skill];
            SkillCount { skill, count }
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(TOP_MISSING_SKILLS);
    ranked
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(job_id: &str, total: i64, status: &str, missing: &str) -> CandidateRow {
        CandidateRow {
            job_id: job_id.to_string(),
            total_score: total,
            status: status.to_string(),
            missing_skills: missing.to_string(),
            ..CandidateRow::default()
        }
    }

    #[test]
    fn test_empty_store_summary() {
        let summary = summarize(&[], None);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.avg_score, 0.0);
        assert!(summary.status_counts.is_empty());
        assert!(summary.top_missing_skills.is_empty());
    }

    #[test]
    fn test_average_is_rounded_to_two_places() {
        let rows = [
            row("J", 7, "applied", ""),
            row("J", 9, "applied", ""),
            row("J", 9, "applied", ""),
        ];
        assert_eq!(summarize(&rows, None).avg_score, 8.33);
    }

    #[test]
    fn test_status_counts_lowercase_with_unknown_bucket() {
        let rows = [
            row("J", 5, "Applied", ""),
            row("J", 5, "applied", ""),
            row("J", 5, "", ""),
            row("J", 0, "error", ""),
        ];
        let counts = summarize(&rows, None).status_counts;
        assert_eq!(counts["applied"], 2);
        assert_eq!(counts["unknown"], 1);
        assert_eq!(counts["error"], 1);
        assert_eq!(counts.values().sum::<usize>(), 4);
    }

    #[test]
    fn test_missing_skills_split_on_any_delimiter() {
        let rows = [
            row("J", 5, "applied", "Docker | AWS"),
            row("J", 5, "applied", "docker;kubernetes"),
            row("J", 5, "applied", "aws, docker,,"),
        ];
        let top = summarize(&rows, None).top_missing_skills;
        assert_eq!(
            top,
            vec![
                SkillCount { skill: "docker".to_string(), count: 3 },
                SkillCount { skill: "aws".to_string(), count: 2 },
                SkillCount { skill: "kubernetes".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_job_filter_and_top_limit() {
        let many: String = (0..30).map(|i| format!("skill{i}")).collect::<Vec<_>>().join(" | ");
        let rows = [row("A", 10, "review", &many), row("B", 2, "review", "python")];

        let summary = summarize(&rows, Some("A"));
        assert_eq!(summary.total, 1);
        assert_eq!(summary.avg_score, 10.0);
        assert_eq!(summary.top_missing_skills.len(), TOP_MISSING_SKILLS);
        assert_eq!(summary.top_missing_skills[0].skill, "skill0");
        assert!(summary.top_missing_skills.iter().all(|s| s.skill != "python"));
    }
}
