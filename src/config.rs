use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringProfile { LiveHost, TextReport }

impl ScoringProfile {
    pub fn process_weight(self) -> u32 {
        match self { ScoringProfile::LiveHost => 25, ScoringProfile::TextReport => 20 }
    }
    pub fn connection_weight(self) -> u32 {
        match self { ScoringProfile::LiveHost => 30, ScoringProfile::TextReport => 25 }
    }
    pub fn high_memory_bonus(self) -> bool {
        matches!(self, ScoringProfile::LiveHost)
    }
}

/// Immutable knob set handed to the analyzer at construction. Defaults mirror
/// the stock triage lists; a rules file can substitute any of them.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub profile: ScoringProfile,
    pub suspicious_names: Vec<String>,
    pub suspicious_paths: Vec<String>,
    pub suspicious_ports: Vec<u16>,
    pub memory_mb_threshold: f64,
    pub cpu_percent_threshold: f32,
    pub high_memory_mb: f64,
    pub high_cpu_percent: f32,
    pub external_conn_flood: usize,
    pub high_memory_flood: usize,
    pub orphan_flood: usize,
    pub admin_user_flood: usize,
    pub failed_login_flood: usize,
    pub high_severity_event_ids: Vec<u32>,
    pub display_cap_processes: usize,
    pub display_cap_connections: usize,
    pub display_cap_users: usize,
    pub display_cap_events: usize,
    pub top_list_len: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            profile: ScoringProfile::TextReport,
            suspicious_names: [
                "cmd.exe", "powershell.exe", "nc.exe", "netcat.exe",
                "psexec.exe", "mimikatz.exe", "procdump.exe", "wce.exe",
                "fgdump.exe", "pwdump.exe", "gsecdump.exe", "cachedump.exe",
                "lsadump.exe", "pwdumpx.exe", "servpw.exe", "htool.exe",
            ].into_iter().map(|s| s.to_string()).collect(),
            suspicious_paths: [
                "temp", "tmp", "appdata\\local\\temp", "windows\\temp",
                "programdata", "users\\public", "recycle",
            ].into_iter().map(|s| s.to_string()).collect(),
            suspicious_ports: vec![4444, 6666, 1337, 31337, 8080, 9999, 12345, 54321],
            memory_mb_threshold: 1000.0,
            cpu_percent_threshold: 80.0,
            high_memory_mb: 500.0,
            high_cpu_percent: 50.0,
            external_conn_flood: 10,
            high_memory_flood: 10,
            orphan_flood: 5,
            admin_user_flood: 3,
            failed_login_flood: 10,
            high_severity_event_ids: vec![4625, 4648, 4719],
            display_cap_processes: 50,
            display_cap_connections: 50,
            display_cap_users: 20,
            display_cap_events: 20,
            top_list_len: 20,
        }
    }
}

impl AnalysisConfig {
    pub fn with_profile(profile: ScoringProfile) -> Self {
        Self { profile, ..Self::default() }
    }

    pub fn name_is_suspicious(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.suspicious_names.iter().any(|s| s.to_lowercase() == lower)
    }

    pub fn path_is_suspicious(&self, path: &str) -> bool {
        let lower = path.to_lowercase();
        self.suspicious_paths.iter().any(|s| lower.contains(&s.to_lowercase()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct RulesConfig {
    pub suspicious_names: Option<Vec<String>>,
    pub suspicious_paths: Option<Vec<String>>,
    pub suspicious_ports: Option<Vec<u16>>,
    pub memory_mb_threshold: Option<f64>,
    pub cpu_percent_threshold: Option<f32>,
    pub admin_user_flood: Option<usize>,
    pub external_conn_flood: Option<usize>,
    pub failed_login_flood: Option<usize>,
    pub high_severity_event_ids: Option<Vec<u32>>,
}

pub fn load_rules(path_opt: Option<&str>) -> Option<RulesConfig> {
    let path = path_opt
        .map(|s| s.to_string())
        .or_else(|| std::env::var("WINTRIAGE_RULES_PATH").ok())
        .unwrap_or_else(|| "rules.json".to_string());
    let p = std::path::PathBuf::from(&path);
    let data = match std::fs::read(&p) { Ok(d) => d, Err(e) => { log::warn!("Failed to read rules file {}: {}", p.to_string_lossy(), e); return None } };
    let cfg: RulesConfig = match serde_json::from_slice(&data) { Ok(c) => c, Err(e) => { log::warn!("Failed to parse rules file {}: {}", p.to_string_lossy(), e); return None } };
    Some(cfg)
}

pub fn apply_rules(cfg: &mut AnalysisConfig, rules: RulesConfig) {
    if let Some(v) = rules.suspicious_names { cfg.suspicious_names = v; }
    if let Some(v) = rules.suspicious_paths { cfg.suspicious_paths = v; }
    if let Some(v) = rules.suspicious_ports { cfg.suspicious_ports = v; }
    if let Some(v) = rules.memory_mb_threshold { cfg.memory_mb_threshold = v; }
    if let Some(v) = rules.cpu_percent_threshold { cfg.cpu_percent_threshold = v; }
    if let Some(v) = rules.admin_user_flood { cfg.admin_user_flood = v; }
    if let Some(v) = rules.external_conn_flood { cfg.external_conn_flood = v; }
    if let Some(v) = rules.failed_login_flood { cfg.failed_login_flood = v; }
    if let Some(v) = rules.high_severity_event_ids { cfg.high_severity_event_ids = v; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_stock_lists() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.name_is_suspicious("CMD.EXE"));
        assert!(cfg.name_is_suspicious("mimikatz.exe"));
        assert!(!cfg.name_is_suspicious("explorer.exe"));
        assert_eq!(cfg.suspicious_ports.len(), 8);
        assert!(cfg.suspicious_ports.contains(&31337));
    }

    #[test]
    fn path_match_is_substring_and_case_insensitive() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.path_is_suspicious(r"C:\Users\Public\run.exe"));
        assert!(cfg.path_is_suspicious(r"C:\Windows\TEMP\x.exe"));
        assert!(!cfg.path_is_suspicious(r"C:\Program Files\App\app.exe"));
    }

    #[test]
    fn rules_override_merges_partially() {
        let mut cfg = AnalysisConfig::default();
        let rules = RulesConfig {
            suspicious_ports: Some(vec![4444]),
            memory_mb_threshold: Some(256.0),
            ..RulesConfig::default()
        };
        apply_rules(&mut cfg, rules);
        assert_eq!(cfg.suspicious_ports, vec![4444]);
        assert_eq!(cfg.memory_mb_threshold, 256.0);
        assert!(cfg.name_is_suspicious("cmd.exe"));
    }

    #[test]
    fn profile_weights_differ() {
        assert_eq!(ScoringProfile::TextReport.process_weight(), 20);
        assert_eq!(ScoringProfile::LiveHost.process_weight(), 25);
        assert_eq!(ScoringProfile::TextReport.connection_weight(), 25);
        assert_eq!(ScoringProfile::LiveHost.connection_weight(), 30);
        assert!(ScoringProfile::LiveHost.high_memory_bonus());
        assert!(!ScoringProfile::TextReport.high_memory_bonus());
    }
}
