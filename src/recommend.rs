use serde::{Deserialize, Serialize};
use crate::suspicion::{Finding, FindingCategory};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority { Low, Medium, High }

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub description: String,
    pub action: String,
}

fn entry(priority: Priority, category: &str, description: &str, action: &str) -> Recommendation {
    Recommendation {
        priority,
        category: category.to_string(),
        description: description.to_string(),
        action: action.to_string(),
    }
}

/// Fixed catalog keyed on the distinct finding categories present. Category
/// entries come first in category order, then the two baseline entries,
/// which are always emitted.
pub fn recommend(findings: &[Finding]) -> Vec<Recommendation> {
    let has = |cat: FindingCategory| findings.iter().any(|f| f.category == cat);
    let mut out = Vec::new();
    if has(FindingCategory::ProcessSuspicion) {
        out.push(entry(
            Priority::High,
            "Process security",
            "Suspicious processes found; verify their legitimacy immediately",
            "Use tasklist /v to inspect the processes and taskkill to terminate them if required",
        ));
    }
    if has(FindingCategory::NetworkSuspicion) {
        out.push(entry(
            Priority::High,
            "Network security",
            "Suspicious network connections found; possible malicious communication",
            "Use netstat -ano to inspect the connections and consider blocking the remote addresses",
        ));
    }
    if has(FindingCategory::UserSuspicion) {
        out.push(entry(
            Priority::Medium,
            "User management",
            "Administrator account count is high; review privilege assignments",
            "Use net localgroup Administrators to audit the member list",
        ));
    }
    if has(FindingCategory::EventSuspicion) {
        out.push(entry(
            Priority::Medium,
            "Access control",
            "Repeated failed logons detected; possible brute-force attempt",
            "Review the Security event log and consider enabling an account lockout policy",
        ));
    }
    out.push(entry(
        Priority::Low,
        "System maintenance",
        "Apply operating system patches regularly",
        "Run Windows Update or wuauclt /detectnow",
    ));
    out.push(entry(
        Priority::Low,
        "Security monitoring",
        "Keep real-time protection enabled",
        "Check the Windows Security settings",
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(category: FindingCategory) -> Finding {
        Finding { category, record: None, reason: "r".to_string(), weight: 1 }
    }

    #[test]
    fn baselines_are_always_present() {
        let out = recommend(&[]);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.priority == Priority::Low));
    }

    #[test]
    fn category_entries_require_a_matching_finding() {
        let out = recommend(&[finding(FindingCategory::ProcessSuspicion)]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].priority, Priority::High);
        assert_eq!(out[0].category, "Process security");
        assert!(!out.iter().any(|r| r.category == "Network security"));
    }

    #[test]
    fn category_order_then_baselines_last() {
        let findings = vec![
            finding(FindingCategory::EventSuspicion),
            finding(FindingCategory::NetworkSuspicion),
            finding(FindingCategory::UserSuspicion),
            finding(FindingCategory::ProcessSuspicion),
        ];
        let out = recommend(&findings);
        let cats: Vec<&str> = out.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(cats, vec![
            "Process security", "Network security", "User management",
            "Access control", "System maintenance", "Security monitoring",
        ]);
        assert_eq!(out[out.len() - 1].priority, Priority::Low);
        assert_eq!(out[out.len() - 2].priority, Priority::Low);
    }

    #[test]
    fn duplicate_findings_emit_one_entry_per_category() {
        let findings = vec![
            finding(FindingCategory::ProcessSuspicion),
            finding(FindingCategory::ProcessSuspicion),
        ];
        let out = recommend(&findings);
        assert_eq!(out.iter().filter(|r| r.category == "Process security").count(), 1);
    }
}
