// ✅ Data Quality Report - Surface the soft errors the ranking tolerates
//
// Nothing here ever fails the pipeline. A team with a missing numeric field
// still gets ranked (without a score), and a team whose name is spelled two
// ways across sources still shows up twice. This report says so out loud.

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::warn;

use crate::team::Team;

/// Names this similar are probably the same team spelled two ways
pub const NEAR_DUPLICATE_THRESHOLD: f64 = 0.95;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Nothing to rank
    Warning,  // Ranking is degraded for this team
    Info,     // Ranking is fine, display is incomplete
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub team: Option<String>,
    pub field: String,
    pub issue: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub team_count: usize,
    pub issues: Vec<QualityIssue>,
}

/// Lowercase and collapse whitespace runs
fn loose_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl QualityReport {
    /// Inspect merged base teams
    pub fn inspect(teams: &[Team]) -> QualityReport {
        let mut issues = Vec::new();

        if teams.is_empty() {
            issues.push(QualityIssue {
                severity: Severity::Critical,
                team: None,
                field: "teams".to_string(),
                issue: "No teams found in any source".to_string(),
                recommendation: "Check that the leaderboard and points files are not empty".to_string(),
            });
        }

        for team in teams {
            let required: [(&str, bool); 3] = [
                ("pct", team.pct.is_some()),
                ("pointsFor", team.points_for.is_some()),
                ("ecrRank", team.ecr_rank.is_some()),
            ];

            for (field, present) in required {
                if !present {
                    issues.push(QualityIssue {
                        severity: Severity::Warning,
                        team: Some(team.name.clone()),
                        field: field.to_string(),
                        issue: format!("{} has no {}; it will be ranked without a score", team.name, field),
                        recommendation: "Check the team name matches across sources".to_string(),
                    });
                }
            }

            if team.previous_rank.is_none() {
                issues.push(QualityIssue {
                    severity: Severity::Info,
                    team: Some(team.name.clone()),
                    field: "previousRank".to_string(),
                    issue: format!("{} has no previous rank; no movement shown", team.name),
                    recommendation: "Add the team to the ECR feed or previous ranks".to_string(),
                });
            }
        }

        for (i, a) in teams.iter().enumerate() {
            for b in &teams[i + 1..] {
                let (la, lb) = (loose_name(&a.name), loose_name(&b.name));
                let similarity = jaro_winkler(&la, &lb);

                if la == lb || similarity >= NEAR_DUPLICATE_THRESHOLD {
                    issues.push(QualityIssue {
                        severity: Severity::Warning,
                        team: Some(a.name.clone()),
                        field: "name".to_string(),
                        issue: format!(
                            "{:?} and {:?} look like the same team ({:.2})",
                            a.name, b.name, similarity
                        ),
                        recommendation: "Use identical spelling and spacing in every source".to_string(),
                    });
                }
            }
        }

        QualityReport {
            team_count: teams.len(),
            issues,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} teams, {} issues ({} critical, {} warnings)",
            self.team_count,
            self.issues.len(),
            self.count(Severity::Critical),
            self.count(Severity::Warning)
        )
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.count(Severity::Critical) > 0
    }

    /// No warnings or criticals (info is fine)
    pub fn is_clean(&self) -> bool {
        self.issues.iter().all(|i| i.severity == Severity::Info)
    }

    /// Emit warnings/criticals through tracing
    pub fn log(&self) {
        for issue in self.issues.iter().filter(|i| i.severity != Severity::Info) {
            warn!(severity = ?issue.severity, field = %issue.field, "{}", issue.issue);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(name: &str) -> Team {
        Team {
            pct: Some(0.5),
            points_for: Some(1000.0),
            ecr_rank: Some(4),
            previous_rank: Some(3),
            ..Team::named(name)
        }
    }

    #[test]
    fn test_clean_league() {
        let report = QualityReport::inspect(&[complete("Team Lengyel"), complete("Off Constantly")]);
        assert!(report.is_clean());
        assert!(!report.has_critical_issues());
        assert_eq!(report.summary(), "2 teams, 0 issues (0 critical, 0 warnings)");
    }

    #[test]
    fn test_empty_league_is_critical() {
        let report = QualityReport::inspect(&[]);
        assert!(report.has_critical_issues());
    }

    #[test]
    fn test_missing_fields() {
        let mut team = complete("League Champ");
        team.points_for = None;
        team.previous_rank = None;

        let report = QualityReport::inspect(&[team]);
        assert!(!report.is_clean());
        assert!(report.issues.iter().any(|i| i.field == "pointsFor" && i.severity == Severity::Warning));
        assert!(report.issues.iter().any(|i| i.field == "previousRank" && i.severity == Severity::Info));
    }

    #[test]
    fn test_whitespace_variant_flagged() {
        let report = QualityReport::inspect(&[complete("Choke  Champs"), complete("Choke Champs")]);
        assert!(report.issues.iter().any(|i| i.field == "name"));
    }

    #[test]
    fn test_distinct_names_not_flagged() {
        let report = QualityReport::inspect(&[
            complete("Puttin' on the  Fitz"),
            complete("When I Palm'er It Fitz"),
        ]);
        assert!(!report.issues.iter().any(|i| i.field == "name"));
    }
}
