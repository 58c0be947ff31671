use std::collections::HashSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::config::{AnalysisConfig, ScoringProfile};
use crate::extract::{self, SecurityExtract, UserExtract};
use crate::records::{ConnectionRecord, ProcessRecord, SecurityEventRecord, UserRecord};
use crate::recommend::{self, Recommendation};
use crate::score::{self, ThreatAssessment};
use crate::suspicion::{self, Finding, TriageCounts};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub total_processes: usize,
    pub suspicious_count: usize,
    pub high_memory_count: usize,
    pub high_cpu_count: usize,
    pub orphan_count: usize,
    pub process_list: Vec<ProcessRecord>,
    pub suspicious_list: Vec<ProcessRecord>,
    pub top_memory: Vec<ProcessRecord>,
    pub top_cpu: Vec<ProcessRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkReport {
    pub total_connections: usize,
    pub external_count: usize,
    pub suspicious_count: usize,
    pub connection_list: Vec<ConnectionRecord>,
    pub suspicious_list: Vec<ConnectionRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserReport {
    pub total_users: usize,
    pub admin_count: usize,
    pub user_list: Vec<UserRecord>,
    pub admin_list: Vec<UserRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SecurityReport {
    pub failed_logins: usize,
    pub successful_logins: usize,
    pub system_starts: usize,
    pub event_list: Vec<SecurityEventRecord>,
}

/// One immutable result per analysis run. Scoring always runs over the
/// uncapped record sets; only the `*_list` fields are capped for display,
/// while every flagged record survives uncapped in its `suspicious_list`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub profile: ScoringProfile,
    pub generated_at: DateTime<Utc>,
    pub processes: ProcessReport,
    pub network: NetworkReport,
    pub users: UserReport,
    pub security: SecurityReport,
    pub findings: Vec<Finding>,
    pub threat_assessment: ThreatAssessment,
    pub recommendations: Vec<Recommendation>,
}

/// Structured observations handed over by a live acquisition collaborator.
#[derive(Clone, Debug, Default)]
pub struct LiveFeed {
    pub processes: Vec<ProcessRecord>,
    pub connections: Vec<ConnectionRecord>,
    pub users: UserExtract,
    pub security: SecurityExtract,
}

pub struct Analyzer {
    cfg: AnalysisConfig,
}

impl Analyzer {
    pub fn new(cfg: AnalysisConfig) -> Self { Self { cfg } }

    pub fn analyze_bytes(&self, raw: &[u8]) -> AnalysisResult {
        let text = crate::normalize::decode_bytes(raw);
        self.analyze_text(&text)
    }

    /// Extractors for the four categories are independent, so they fan out on
    /// scoped threads and join before scoring. A panicking extractor leaves
    /// its category empty; the other categories still complete.
    pub fn analyze_text(&self, text: &str) -> AnalysisResult {
        let (processes, connections, users, security) = std::thread::scope(|s| {
            let p = s.spawn(|| extract::extract_processes(text));
            let c = s.spawn(|| extract::extract_connections(text));
            let u = s.spawn(|| extract::extract_users(text));
            let e = s.spawn(|| extract::extract_security_events(text));
            (
                p.join().unwrap_or_default(),
                c.join().unwrap_or_default(),
                u.join().unwrap_or_default(),
                e.join().unwrap_or_default(),
            )
        });
        self.assemble(processes, connections, users, security)
    }

    pub fn analyze_records(&self, feed: LiveFeed) -> AnalysisResult {
        self.assemble(feed.processes, feed.connections, feed.users, feed.security)
    }

    fn assemble(
        &self,
        processes: Vec<ProcessRecord>,
        connections: Vec<ConnectionRecord>,
        users: UserExtract,
        mut security: SecurityExtract,
    ) -> AnalysisResult {
        let cfg = &self.cfg;
        for ev in &mut security.events {
            ev.severity = suspicion::event_severity(cfg, ev.event_id);
        }

        let mut findings: Vec<Finding> = Vec::new();
        let mut suspicious_procs: Vec<ProcessRecord> = Vec::new();
        for (i, rec) in processes.iter().enumerate() {
            let fired = suspicion::process_findings(cfg, i, rec);
            if !fired.is_empty() { suspicious_procs.push(rec.clone()); }
            findings.extend(fired);
        }
        let mut suspicious_conns: Vec<ConnectionRecord> = Vec::new();
        for (i, rec) in connections.iter().enumerate() {
            if let Some(f) = suspicion::connection_finding(cfg, i, rec) {
                suspicious_conns.push(rec.clone());
                findings.push(f);
            }
        }

        let pids: HashSet<u32> = processes.iter().filter_map(|p| p.pid).collect();
        let orphan_count = processes.iter()
            .filter(|p| p.parent_pid.is_some_and(|pp| pp != 0 && !pids.contains(&pp)))
            .count();
        let high_memory: Vec<&ProcessRecord> = processes.iter()
            .filter(|p| p.memory_mb.is_some_and(|mb| mb > cfg.high_memory_mb))
            .collect();
        let high_cpu: Vec<&ProcessRecord> = processes.iter()
            .filter(|p| p.cpu_percent.is_some_and(|c| c > cfg.high_cpu_percent))
            .collect();
        let external_count = connections.iter().filter(|c| c.remote_is_external()).count();

        let counts = TriageCounts {
            suspicious_processes: suspicious_procs.len(),
            suspicious_connections: suspicious_conns.len(),
            external_connections: external_count,
            high_memory_processes: high_memory.len(),
            high_cpu_processes: high_cpu.len(),
            orphan_processes: orphan_count,
            admin_users: users.admins.len(),
            failed_logins: security.failed_logins,
        };
        findings.extend(suspicion::aggregate_findings(cfg, &counts));

        let threat_assessment = score::assess(cfg, &findings, &counts);
        let recommendations = recommend::recommend(&findings);

        let mut top_memory: Vec<ProcessRecord> = high_memory.into_iter().cloned().collect();
        top_memory.sort_by(|a, b| b.memory_mb.partial_cmp(&a.memory_mb).unwrap_or(std::cmp::Ordering::Equal));
        top_memory.truncate(cfg.top_list_len);
        let mut top_cpu: Vec<ProcessRecord> = high_cpu.into_iter().cloned().collect();
        top_cpu.sort_by(|a, b| b.cpu_percent.partial_cmp(&a.cpu_percent).unwrap_or(std::cmp::Ordering::Equal));
        top_cpu.truncate(cfg.top_list_len);

        let distinct_users: HashSet<String> = users.users.iter().map(|u| u.name.to_lowercase()).collect();

        let mut process_list = processes;
        let total_processes = process_list.len();
        process_list.truncate(cfg.display_cap_processes);
        let mut connection_list = connections;
        let total_connections = connection_list.len();
        connection_list.truncate(cfg.display_cap_connections);
        let mut user_list = users.users;
        user_list.truncate(cfg.display_cap_users);
        let mut event_list = security.events;
        event_list.truncate(cfg.display_cap_events);

        AnalysisResult {
            profile: cfg.profile,
            generated_at: Utc::now(),
            processes: ProcessReport {
                total_processes,
                suspicious_count: counts.suspicious_processes,
                high_memory_count: counts.high_memory_processes,
                high_cpu_count: counts.high_cpu_processes,
                orphan_count,
                process_list,
                suspicious_list: suspicious_procs,
                top_memory,
                top_cpu,
            },
            network: NetworkReport {
                total_connections,
                external_count,
                suspicious_count: counts.suspicious_connections,
                connection_list,
                suspicious_list: suspicious_conns,
            },
            users: UserReport {
                total_users: distinct_users.len(),
                admin_count: counts.admin_users,
                user_list,
                admin_list: users.admins,
            },
            security: SecurityReport {
                failed_logins: security.failed_logins,
                successful_logins: security.successful_logins,
                system_starts: security.system_starts,
                event_list,
            },
            findings,
            threat_assessment,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Severity;
    use crate::score::ThreatLevel;
    use crate::suspicion::FindingCategory;

    fn analyzer() -> Analyzer { Analyzer::new(AnalysisConfig::default()) }

    #[test]
    fn tasklist_scenario_yields_record_and_finding() {
        let r = analyzer().analyze_text("cmd.exe 1234 SYSTEM 0 50000 K");
        assert_eq!(r.processes.total_processes, 1);
        assert_eq!(r.processes.process_list[0].name, "cmd.exe");
        assert_eq!(r.processes.process_list[0].pid, Some(1234));
        assert_eq!(r.findings.len(), 1);
        assert_eq!(r.findings[0].category, FindingCategory::ProcessSuspicion);
        assert_eq!(r.findings[0].reason, "suspicious process name: cmd.exe");
        assert_eq!(r.threat_assessment.score, 20);
        assert_eq!(r.threat_assessment.level, ThreatLevel::Medium);
        assert!(r.recommendations.iter().any(|rec| rec.category == "Process security"));
    }

    #[test]
    fn netstat_scenario_yields_connection_and_finding() {
        let r = analyzer().analyze_text("TCP 192.168.1.5:51000 1.2.3.4:4444 ESTABLISHED 999");
        assert_eq!(r.network.total_connections, 1);
        assert_eq!(r.network.suspicious_count, 1);
        assert_eq!(r.findings.len(), 1);
        assert_eq!(r.findings[0].category, FindingCategory::NetworkSuspicion);
        assert!(r.findings[0].reason.contains("4444"));
        assert_eq!(r.threat_assessment.score, 25);
    }

    #[test]
    fn empty_blob_yields_clean_low_result() {
        let r = analyzer().analyze_bytes(&[]);
        assert_eq!(r.processes.total_processes, 0);
        assert_eq!(r.network.total_connections, 0);
        assert_eq!(r.users.total_users, 0);
        assert_eq!(r.security.failed_logins, 0);
        assert!(r.findings.is_empty());
        assert_eq!(r.threat_assessment.score, 0);
        assert_eq!(r.threat_assessment.level, ThreatLevel::Low);
        assert_eq!(r.recommendations.len(), 2);
    }

    #[test]
    fn failed_logon_flood_contributes_its_count() {
        let mut text = String::new();
        for _ in 0..11 { text.push_str("Event ID: 4625 logon failure\n"); }
        let r = analyzer().analyze_text(&text);
        assert_eq!(r.security.failed_logins, 11);
        assert_eq!(r.threat_assessment.score, 11);
        assert!(r.threat_assessment.issues.iter().any(|i| i.contains("11")));
        assert!(r.recommendations.iter().any(|rec| rec.category == "Access control"));
    }

    #[test]
    fn score_runs_over_uncapped_sets() {
        let mut text = String::new();
        for i in 0..60 { text.push_str(&format!("Name: cmd{}.exe ProcessId: {}\n", i, 1000 + i)); }
        // Every one of the 60 rows matches the denylist via the rules file path,
        // so cap the display list but not the scoring set.
        let mut cfg = AnalysisConfig::default();
        cfg.suspicious_names = (0..60).map(|i| format!("cmd{}.exe", i)).collect();
        let r = Analyzer::new(cfg).analyze_text(&text);
        assert_eq!(r.processes.total_processes, 60);
        assert_eq!(r.processes.process_list.len(), 50);
        assert_eq!(r.processes.suspicious_list.len(), 60);
        assert_eq!(r.threat_assessment.score, 60 * 20);
    }

    #[test]
    fn findings_reference_records_present_in_the_result() {
        let r = analyzer().analyze_text("cmd.exe 1234 SYSTEM 0 50000 K\nTCP 10.0.0.2:1 1.2.3.4:4444 ESTABLISHED 7");
        for f in &r.findings {
            let Some(rref) = f.record else { continue };
            match rref.category {
                crate::records::RecordCategory::Process => assert!(r.processes.suspicious_list.iter().any(|p| p.pid == r.processes.process_list[rref.index].pid)),
                crate::records::RecordCategory::Connection => assert!(!r.network.suspicious_list.is_empty()),
                _ => {}
            }
        }
    }

    #[test]
    fn orphan_flood_fires_in_live_feed() {
        let mut feed = LiveFeed::default();
        for i in 0..6u32 {
            let mut p = ProcessRecord::named(&format!("app{}.exe", i), Some(100 + i));
            p.parent_pid = Some(90000 + i);
            feed.processes.push(p);
        }
        let cfg = AnalysisConfig::with_profile(ScoringProfile::LiveHost);
        let r = Analyzer::new(cfg).analyze_records(feed);
        assert_eq!(r.processes.orphan_count, 6);
        assert_eq!(r.threat_assessment.score, 15);
        assert!(r.threat_assessment.issues.iter().any(|i| i.contains("orphan")));
    }

    #[test]
    fn event_records_are_severity_tagged_but_weightless() {
        let r = analyzer().analyze_text("Event ID: 4625 at 2024-01-02 03:04:05\nEvent ID: 4624 at 2024-01-02 03:05:06");
        assert_eq!(r.security.event_list.len(), 2);
        assert_eq!(r.security.event_list[0].severity, Severity::High);
        assert_eq!(r.security.event_list[1].severity, Severity::Medium);
        assert_eq!(r.threat_assessment.score, 0);
    }

    #[test]
    fn result_round_trips_through_json() {
        let r = analyzer().analyze_text("cmd.exe 1234 SYSTEM 0 50000 K\nTCP 10.0.0.2:1 1.2.3.4:4444 ESTABLISHED 7\nnet user alice bob");
        let json = serde_json::to_string(&r).unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }

    #[test]
    fn live_profile_weighs_heavier() {
        let text = "cmd.exe 1234 SYSTEM 0 50000 K";
        let text_score = analyzer().analyze_text(text).threat_assessment.score;
        let live_score = Analyzer::new(AnalysisConfig::with_profile(ScoringProfile::LiveHost))
            .analyze_text(text).threat_assessment.score;
        assert_eq!(text_score, 20);
        assert_eq!(live_score, 25);
    }
}
