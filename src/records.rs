use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity { Medium, High }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory { Process, Connection, User, SecurityEvent }

/// Weak reference to a record inside the same analysis result: category plus
/// position in that category's (uncapped) extraction order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub category: RecordCategory,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub name: String,
    pub pid: Option<u32>,
    pub parent_pid: Option<u32>,
    pub username: Option<String>,
    pub cmdline: Option<String>,
    pub exe_path: Option<String>,
    pub memory_mb: Option<f64>,
    pub cpu_percent: Option<f32>,
    pub start_time: Option<DateTime<Utc>>,
}

impl ProcessRecord {
    pub fn named(name: &str, pid: Option<u32>) -> Self {
        Self {
            name: name.to_string(),
            pid,
            parent_pid: None,
            username: None,
            cmdline: None,
            exe_path: None,
            memory_mb: None,
            cpu_percent: None,
            start_time: None,
        }
    }

    pub fn identity(&self) -> (String, Option<u32>) {
        (self.name.to_lowercase(), self.pid)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub protocol: String,
    pub local_ip: String,
    pub local_port: u16,
    pub remote_ip: String,
    pub remote_port: u16,
    pub state: String,
    pub pid: Option<u32>,
}

impl ConnectionRecord {
    /// Loopback and unspecified remotes are internal; everything else counts
    /// as an external peer.
    pub fn remote_is_external(&self) -> bool {
        let r = self.remote_ip.as_str();
        !(r.starts_with("127.") || r == "0.0.0.0" || r == "::1" || r == "::" || r == "*")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub admin: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SecurityEventRecord {
    pub event_id: u32,
    pub timestamp: Option<String>,
    pub severity: Severity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_and_unspecified_are_not_external() {
        let mut c = ConnectionRecord {
            protocol: "TCP".to_string(),
            local_ip: "192.168.1.5".to_string(),
            local_port: 51000,
            remote_ip: "127.0.0.1".to_string(),
            remote_port: 4444,
            state: "ESTABLISHED".to_string(),
            pid: Some(999),
        };
        assert!(!c.remote_is_external());
        c.remote_ip = "0.0.0.0".to_string();
        assert!(!c.remote_is_external());
        c.remote_ip = "::1".to_string();
        assert!(!c.remote_is_external());
        c.remote_ip = "1.2.3.4".to_string();
        assert!(c.remote_is_external());
    }

    #[test]
    fn process_identity_is_case_insensitive() {
        let a = ProcessRecord::named("CMD.EXE", Some(1234));
        let b = ProcessRecord::named("cmd.exe", Some(1234));
        assert_eq!(a.identity(), b.identity());
    }
}
