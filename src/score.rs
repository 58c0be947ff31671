use serde::{Deserialize, Serialize};
use crate::config::AnalysisConfig;
use crate::suspicion::{Finding, TriageCounts};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum)]
pub enum ThreatLevel { Low, Medium, High, Critical }

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self { ThreatLevel::Low => "Low", ThreatLevel::Medium => "Medium", ThreatLevel::High => "High", ThreatLevel::Critical => "Critical" };
        write!(f, "{}", s)
    }
}

/// Step function over the accumulated score. Boundaries are inclusive lower
/// bounds; the score itself is displayed "out of 100" but never clamped.
pub fn level_for(score: u32) -> ThreatLevel {
    if score >= 80 { ThreatLevel::Critical }
    else if score >= 50 { ThreatLevel::High }
    else if score >= 20 { ThreatLevel::Medium }
    else { ThreatLevel::Low }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    pub score: u32,
    pub level: ThreatLevel,
    pub issues: Vec<String>,
}

/// The score is exactly the sum of finding weights; per-record findings carry
/// the profile category weight and flood findings carry the flat bonuses, so
/// no term is ever recomputed partially.
pub fn assess(cfg: &AnalysisConfig, findings: &[Finding], counts: &TriageCounts) -> ThreatAssessment {
    let score: u32 = findings.iter().map(|f| f.weight).sum();
    let mut issues: Vec<String> = Vec::new();
    if counts.suspicious_processes > 0 {
        issues.push(format!("Found {} suspicious processes", counts.suspicious_processes));
    }
    if counts.suspicious_connections > 0 {
        issues.push(format!("Found {} suspicious network connections", counts.suspicious_connections));
    }
    if counts.external_connections > cfg.external_conn_flood {
        issues.push(format!("High external connection count ({})", counts.external_connections));
    }
    if cfg.profile.high_memory_bonus() && counts.high_memory_processes > cfg.high_memory_flood {
        issues.push(format!("Found {} high-memory processes", counts.high_memory_processes));
    }
    if counts.orphan_processes > cfg.orphan_flood {
        issues.push(format!("Found {} orphan processes", counts.orphan_processes));
    }
    if counts.admin_users > cfg.admin_user_flood {
        issues.push(format!("High administrator account count ({})", counts.admin_users));
    }
    if counts.failed_logins > cfg.failed_login_flood {
        issues.push(format!("High failed logon count ({})", counts.failed_logins));
    }
    issues.dedup();
    ThreatAssessment { score, level: level_for(score), issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suspicion::FindingCategory;

    fn finding(weight: u32) -> Finding {
        Finding { category: FindingCategory::ProcessSuspicion, record: None, reason: "x".to_string(), weight }
    }

    #[test]
    fn level_boundaries_are_exact() {
        assert_eq!(level_for(0), ThreatLevel::Low);
        assert_eq!(level_for(19), ThreatLevel::Low);
        assert_eq!(level_for(20), ThreatLevel::Medium);
        assert_eq!(level_for(49), ThreatLevel::Medium);
        assert_eq!(level_for(50), ThreatLevel::High);
        assert_eq!(level_for(79), ThreatLevel::High);
        assert_eq!(level_for(80), ThreatLevel::Critical);
    }

    #[test]
    fn score_is_not_clamped_to_100() {
        let findings: Vec<Finding> = (0..10).map(|_| finding(25)).collect();
        let a = assess(&AnalysisConfig::default(), &findings, &TriageCounts::default());
        assert_eq!(a.score, 250);
        assert_eq!(a.level, ThreatLevel::Critical);
    }

    #[test]
    fn score_is_sum_of_weights() {
        let findings = vec![finding(20), finding(25), finding(15)];
        let a = assess(&AnalysisConfig::default(), &findings, &TriageCounts::default());
        assert_eq!(a.score, 60);
        assert_eq!(a.level, ThreatLevel::High);
    }

    #[test]
    fn assessment_is_deterministic() {
        let cfg = AnalysisConfig::default();
        let findings = vec![finding(20), finding(11)];
        let counts = TriageCounts { suspicious_processes: 1, failed_logins: 11, ..TriageCounts::default() };
        let a = assess(&cfg, &findings, &counts);
        let b = assess(&cfg, &findings, &counts);
        assert_eq!(a, b);
    }

    #[test]
    fn failed_logon_issue_mentions_the_count() {
        let cfg = AnalysisConfig::default();
        let counts = TriageCounts { failed_logins: 11, ..TriageCounts::default() };
        let a = assess(&cfg, &[finding(11)], &counts);
        assert_eq!(a.score, 11);
        assert!(a.issues.iter().any(|i| i.contains("11")));
    }

    #[test]
    fn empty_input_scores_zero_low() {
        let a = assess(&AnalysisConfig::default(), &[], &TriageCounts::default());
        assert_eq!(a.score, 0);
        assert_eq!(a.level, ThreatLevel::Low);
        assert!(a.issues.is_empty());
    }
}
