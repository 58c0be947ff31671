use std::collections::HashSet;
use std::sync::OnceLock;
use regex::Regex;
use crate::records::{ConnectionRecord, ProcessRecord, SecurityEventRecord, Severity, UserRecord};

/// Known textual layouts for process listings: column-aligned tasklist rows,
/// wmic attribute pairs, and the pid-first attribute ordering. Every dialect
/// is evaluated against the whole text; matches are unioned.
fn process_dialects() -> &'static [(ProcessGroups, Regex)] {
    static RES: OnceLock<Vec<(ProcessGroups, Regex)>> = OnceLock::new();
    RES.get_or_init(|| vec![
        (ProcessGroups::Columns, Regex::new(r"(?im)(\w+\.exe)\s+(\d+)\s+(\w+)\s+(\d+)\s+([\d,]+)\s*K").unwrap()),
        (ProcessGroups::NameFirst, Regex::new(r"(?im)Name:\s*(\w+\.exe).*?ProcessId:\s*(\d+)").unwrap()),
        (ProcessGroups::PidFirst, Regex::new(r"(?im)PID:\s*(\d+).*?Name:\s*(\w+\.exe)").unwrap()),
    ])
}

#[derive(Clone, Copy, Debug)]
enum ProcessGroups { Columns, NameFirst, PidFirst }

fn connection_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(TCP|UDP)\s+(\d+\.\d+\.\d+\.\d+):(\d+)\s+(\d+\.\d+\.\d+\.\d+):(\d+)\s+(\w+)\s+(\d+)").unwrap())
}

pub fn extract_processes(text: &str) -> Vec<ProcessRecord> {
    let mut out: Vec<ProcessRecord> = Vec::new();
    let mut seen: HashSet<(String, Option<u32>)> = HashSet::new();
    for (groups, re) in process_dialects() {
        for cap in re.captures_iter(text) {
            let (name, pid_s) = match groups {
                ProcessGroups::PidFirst => (cap.get(2), cap.get(1)),
                _ => (cap.get(1), cap.get(2)),
            };
            let (Some(name), Some(pid_s)) = (name, pid_s) else { continue };
            // A pid that does not parse means the row is garbage, not a record.
            let Ok(pid) = pid_s.as_str().parse::<u32>() else { continue };
            let mut rec = ProcessRecord::named(name.as_str(), Some(pid));
            if matches!(groups, ProcessGroups::Columns) {
                rec.username = cap.get(3).map(|m| m.as_str().to_string());
                rec.memory_mb = cap.get(5)
                    .and_then(|m| m.as_str().replace(',', "").parse::<u64>().ok())
                    .map(|kb| kb as f64 / 1024.0);
            }
            if seen.insert(rec.identity()) { out.push(rec); }
        }
    }
    out
}

pub fn extract_connections(text: &str) -> Vec<ConnectionRecord> {
    let mut out: Vec<ConnectionRecord> = Vec::new();
    for cap in connection_re().captures_iter(text) {
        let (Ok(local_port), Ok(remote_port)) = (cap[3].parse::<u16>(), cap[5].parse::<u16>()) else { continue };
        out.push(ConnectionRecord {
            protocol: cap[1].to_uppercase(),
            local_ip: cap[2].to_string(),
            local_port,
            remote_ip: cap[4].to_string(),
            remote_port,
            state: cap[6].to_string(),
            pid: cap[7].parse::<u32>().ok(),
        });
    }
    out
}

#[derive(Clone, Debug, Default)]
pub struct UserExtract {
    pub users: Vec<UserRecord>,
    pub admins: Vec<UserRecord>,
}

/// Best-effort token scan over `net user` style output. There is no reliable
/// grammar here: names can be missed and ordinary words can be picked up, so
/// this output must never drive high-severity findings on its own.
pub fn extract_users(text: &str) -> UserExtract {
    let mut out = UserExtract::default();
    let mut seen: HashSet<String> = HashSet::new();
    for line in text.lines() {
        let lower = line.to_lowercase();
        if !(lower.contains("net user") || lower.contains("user accounts")) { continue; }
        for word in line.split_whitespace() {
            if word.len() > 2 && word.chars().all(|c| c.is_alphanumeric()) && seen.insert(word.to_lowercase()) {
                out.users.push(UserRecord { name: word.to_string(), admin: false });
            }
        }
    }
    static ADMIN_RE: OnceLock<Regex> = OnceLock::new();
    let admin_re = ADMIN_RE.get_or_init(|| Regex::new(r"(?is)Administrators.*?\n(.*?)\n").unwrap());
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    let word_re = WORD_RE.get_or_init(|| Regex::new(r"\w+").unwrap());
    for cap in admin_re.captures_iter(text) {
        for m in word_re.find_iter(&cap[1]) {
            if m.as_str().len() > 2 {
                out.admins.push(UserRecord { name: m.as_str().to_string(), admin: true });
            }
        }
    }
    out
}

#[derive(Clone, Debug, Default)]
pub struct SecurityExtract {
    pub failed_logins: usize,
    pub successful_logins: usize,
    pub system_starts: usize,
    pub events: Vec<SecurityEventRecord>,
}

pub fn extract_security_events(text: &str) -> SecurityExtract {
    static FAILED: OnceLock<Regex> = OnceLock::new();
    static SUCCESS: OnceLock<Regex> = OnceLock::new();
    static START: OnceLock<Regex> = OnceLock::new();
    static DETAIL: OnceLock<Regex> = OnceLock::new();
    let failed = FAILED.get_or_init(|| Regex::new(r"(?i)Event ID.*?4625").unwrap());
    let success = SUCCESS.get_or_init(|| Regex::new(r"(?i)Event ID.*?4624").unwrap());
    let start = START.get_or_init(|| Regex::new(r"(?i)Event ID.*?6005").unwrap());
    let detail = DETAIL.get_or_init(|| Regex::new(r"(?i)Event ID.*?(\d+).*?(\d{4}-\d{2}-\d{2}.*?\d{2}:\d{2}:\d{2})").unwrap());
    let mut out = SecurityExtract {
        failed_logins: failed.find_iter(text).count(),
        successful_logins: success.find_iter(text).count(),
        system_starts: start.find_iter(text).count(),
        events: Vec::new(),
    };
    for cap in detail.captures_iter(text) {
        let Ok(event_id) = cap[1].parse::<u32>() else { continue };
        out.events.push(SecurityEventRecord {
            event_id,
            timestamp: Some(cap[2].to_string()),
            severity: Severity::Medium,
        });
    }
    out
}
