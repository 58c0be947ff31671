use serde::{Deserialize, Serialize};
use crate::config::AnalysisConfig;
use crate::records::{ConnectionRecord, ProcessRecord, RecordCategory, RecordRef, Severity};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory { ProcessSuspicion, NetworkSuspicion, UserSuspicion, EventSuspicion }

/// One fired rule. Per-record findings reference their source record;
/// aggregate (flood) findings carry no record and their weight is the flat
/// scoring bonus for the condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub record: Option<RecordRef>,
    pub reason: String,
    pub weight: u32,
}

const EXTERNAL_FLOOD_WEIGHT: u32 = 15;
const HIGH_MEMORY_FLOOD_WEIGHT: u32 = 10;
const ORPHAN_FLOOD_WEIGHT: u32 = 15;
const ADMIN_FLOOD_WEIGHT: u32 = 10;

pub fn process_findings(cfg: &AnalysisConfig, index: usize, rec: &ProcessRecord) -> Vec<Finding> {
    let weight = cfg.profile.process_weight();
    let record = Some(RecordRef { category: RecordCategory::Process, index });
    let mut out = Vec::new();
    let mut push = |reason: String| out.push(Finding { category: FindingCategory::ProcessSuspicion, record, reason, weight });
    if cfg.name_is_suspicious(&rec.name) {
        push(format!("suspicious process name: {}", rec.name));
    }
    if let Some(path) = rec.exe_path.as_ref() && cfg.path_is_suspicious(path) {
        push(format!("suspicious path: {}", path));
    }
    if let Some(mb) = rec.memory_mb && mb > cfg.memory_mb_threshold {
        push(format!("unusual memory use: {:.2} MB", mb));
    }
    if let Some(cpu) = rec.cpu_percent && cpu > cfg.cpu_percent_threshold {
        push(format!("unusual CPU use: {:.2}%", cpu));
    }
    if rec.parent_pid == Some(0) && rec.pid.is_some_and(|p| p != 0) {
        push("no parent process (possible injection)".to_string());
    }
    out
}

pub fn connection_finding(cfg: &AnalysisConfig, index: usize, rec: &ConnectionRecord) -> Option<Finding> {
    if !rec.remote_is_external() { return None; }
    if !cfg.suspicious_ports.contains(&rec.remote_port) { return None; }
    Some(Finding {
        category: FindingCategory::NetworkSuspicion,
        record: Some(RecordRef { category: RecordCategory::Connection, index }),
        reason: format!("suspicious port: {}", rec.remote_port),
        weight: cfg.profile.connection_weight(),
    })
}

pub fn event_severity(cfg: &AnalysisConfig, event_id: u32) -> Severity {
    if cfg.high_severity_event_ids.contains(&event_id) { Severity::High } else { Severity::Medium }
}

/// Whole-run counts the flood rules and the scorer's issue strings work from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageCounts {
    pub suspicious_processes: usize,
    pub suspicious_connections: usize,
    pub external_connections: usize,
    pub high_memory_processes: usize,
    pub high_cpu_processes: usize,
    pub orphan_processes: usize,
    pub admin_users: usize,
    pub failed_logins: usize,
}

pub fn aggregate_findings(cfg: &AnalysisConfig, counts: &TriageCounts) -> Vec<Finding> {
    let mut out = Vec::new();
    if counts.external_connections > cfg.external_conn_flood {
        out.push(Finding {
            category: FindingCategory::NetworkSuspicion,
            record: None,
            reason: format!("high external connection count ({})", counts.external_connections),
            weight: EXTERNAL_FLOOD_WEIGHT,
        });
    }
    if cfg.profile.high_memory_bonus() && counts.high_memory_processes > cfg.high_memory_flood {
        out.push(Finding {
            category: FindingCategory::ProcessSuspicion,
            record: None,
            reason: format!("high memory process count ({})", counts.high_memory_processes),
            weight: HIGH_MEMORY_FLOOD_WEIGHT,
        });
    }
    if counts.orphan_processes > cfg.orphan_flood {
        out.push(Finding {
            category: FindingCategory::ProcessSuspicion,
            record: None,
            reason: format!("orphan process count ({})", counts.orphan_processes),
            weight: ORPHAN_FLOOD_WEIGHT,
        });
    }
    if counts.admin_users > cfg.admin_user_flood {
        out.push(Finding {
            category: FindingCategory::UserSuspicion,
            record: None,
            reason: format!("administrator account count ({})", counts.admin_users),
            weight: ADMIN_FLOOD_WEIGHT,
        });
    }
    if counts.failed_logins > cfg.failed_login_flood {
        out.push(Finding {
            category: FindingCategory::EventSuspicion,
            record: None,
            reason: format!("failed logon count ({})", counts.failed_logins),
            weight: counts.failed_logins as u32,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringProfile;
    use crate::records::ProcessRecord;

    fn conn(remote_ip: &str, remote_port: u16) -> ConnectionRecord {
        ConnectionRecord {
            protocol: "TCP".to_string(),
            local_ip: "192.168.1.5".to_string(),
            local_port: 51000,
            remote_ip: remote_ip.to_string(),
            remote_port,
            state: "ESTABLISHED".to_string(),
            pid: Some(999),
        }
    }

    #[test]
    fn denylisted_name_yields_exactly_one_finding() {
        let cfg = AnalysisConfig::default();
        let rec = ProcessRecord::named("cmd.exe", Some(1234));
        let out = process_findings(&cfg, 0, &rec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].reason, "suspicious process name: cmd.exe");
        assert_eq!(out[0].weight, 20);
        assert!(out[0].record.is_some());
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let cfg = AnalysisConfig::default();
        let rec = ProcessRecord::named("MIMIKATZ.EXE", Some(7));
        assert_eq!(process_findings(&cfg, 0, &rec).len(), 1);
    }

    #[test]
    fn one_record_can_fire_multiple_rules() {
        let cfg = AnalysisConfig::default();
        let mut rec = ProcessRecord::named("cmd.exe", Some(1234));
        rec.memory_mb = Some(2048.0);
        rec.exe_path = Some(r"C:\Users\Public\cmd.exe".to_string());
        let out = process_findings(&cfg, 0, &rec);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn missing_parent_only_counts_when_resolved_to_zero() {
        let cfg = AnalysisConfig::default();
        let mut rec = ProcessRecord::named("app.exe", Some(50));
        assert!(process_findings(&cfg, 0, &rec).is_empty());
        rec.parent_pid = Some(0);
        let out = process_findings(&cfg, 0, &rec);
        assert_eq!(out.len(), 1);
        assert!(out[0].reason.contains("injection"));
    }

    #[test]
    fn denylisted_port_on_external_remote_fires() {
        let cfg = AnalysisConfig::default();
        for port in [4444u16, 6666, 1337, 31337, 8080, 9999, 12345, 54321] {
            let f = connection_finding(&cfg, 0, &conn("1.2.3.4", port)).unwrap();
            assert_eq!(f.category, FindingCategory::NetworkSuspicion);
            assert!(f.reason.contains(&port.to_string()));
        }
    }

    #[test]
    fn loopback_never_fires_regardless_of_port() {
        let cfg = AnalysisConfig::default();
        for ip in ["127.0.0.1", "0.0.0.0", "::1"] {
            assert!(connection_finding(&cfg, 0, &conn(ip, 4444)).is_none());
        }
    }

    #[test]
    fn ordinary_port_does_not_fire() {
        let cfg = AnalysisConfig::default();
        assert!(connection_finding(&cfg, 0, &conn("1.2.3.4", 443)).is_none());
    }

    #[test]
    fn high_severity_set_tags_events() {
        let cfg = AnalysisConfig::default();
        assert_eq!(event_severity(&cfg, 4625), Severity::High);
        assert_eq!(event_severity(&cfg, 4648), Severity::High);
        assert_eq!(event_severity(&cfg, 4719), Severity::High);
        assert_eq!(event_severity(&cfg, 4624), Severity::Medium);
    }

    #[test]
    fn flood_rules_need_counts_above_threshold() {
        let cfg = AnalysisConfig::default();
        let counts = TriageCounts { external_connections: 10, admin_users: 3, failed_logins: 10, ..TriageCounts::default() };
        assert!(aggregate_findings(&cfg, &counts).is_empty());
        let counts = TriageCounts { external_connections: 11, admin_users: 4, failed_logins: 11, ..TriageCounts::default() };
        let out = aggregate_findings(&cfg, &counts);
        assert_eq!(out.len(), 3);
        let failed = out.iter().find(|f| f.category == FindingCategory::EventSuspicion).unwrap();
        assert_eq!(failed.weight, 11);
        assert!(failed.reason.contains("11"));
    }

    #[test]
    fn high_memory_flood_is_live_profile_only() {
        let counts = TriageCounts { high_memory_processes: 11, ..TriageCounts::default() };
        let text = AnalysisConfig::default();
        assert!(aggregate_findings(&text, &counts).is_empty());
        let live = AnalysisConfig::with_profile(ScoringProfile::LiveHost);
        let out = aggregate_findings(&live, &counts);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].weight, 10);
    }
}
