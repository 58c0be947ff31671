use chrono::{DateTime, Utc};
use sysinfo::System;
use crate::extract;
use crate::records::ProcessRecord;
use crate::report::LiveFeed;

/// Snapshot of the live process table. CPU usage needs two samples, so this
/// blocks for one minimum update interval; a process that vanishes between
/// refreshes simply yields its last observed values.
pub fn collect_processes() -> Vec<ProcessRecord> {
    let mut sys = System::new_all();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_processes();
    let users = sysinfo::Users::new_with_refreshed_list();
    let mut out = Vec::new();
    for (pid, proc) in sys.processes() {
        let username = proc.user_id()
            .and_then(|uid| users.get_user_by_id(uid))
            .map(|u| u.name().to_string());
        let cmdline = if proc.cmd().is_empty() { None } else { Some(proc.cmd().join(" ")) };
        out.push(ProcessRecord {
            name: proc.name().to_string(),
            pid: Some(pid.as_u32()),
            // No resolvable parent is reported as 0, the tasklist convention.
            parent_pid: Some(proc.parent().map(|p| p.as_u32()).unwrap_or(0)),
            username,
            cmdline,
            exe_path: proc.exe().map(|p| p.to_string_lossy().into_owned()),
            memory_mb: Some(proc.memory() as f64 / (1024.0 * 1024.0)),
            cpu_percent: Some(proc.cpu_usage()),
            start_time: DateTime::<Utc>::from_timestamp(proc.start_time() as i64, 0),
        });
    }
    out
}

/// Runs a system command and returns its output as a capture-style dump:
/// the invoking command line first, then stdout, so the text extractors see
/// the same markers they would in an uploaded capture file.
#[cfg(target_os = "windows")]
fn capture_command(cmd: &str, args: &[&str]) -> Option<String> {
    match std::process::Command::new(cmd).args(args).output() {
        Ok(out) => {
            let text = crate::normalize::decode_bytes(&out.stdout);
            Some(format!("{} {}\n{}", cmd, args.join(" "), text))
        }
        Err(e) => {
            log::warn!("command capture failed for {}: {}", cmd, e);
            None
        }
    }
}

#[cfg(target_os = "windows")]
fn collect_connections() -> Vec<crate::records::ConnectionRecord> {
    capture_command("netstat", &["-ano"])
        .map(|t| extract::extract_connections(&t))
        .unwrap_or_default()
}

#[cfg(not(target_os = "windows"))]
fn collect_connections() -> Vec<crate::records::ConnectionRecord> {
    log::warn!("live connection enumeration is only implemented on Windows");
    Vec::new()
}

#[cfg(target_os = "windows")]
fn collect_users() -> extract::UserExtract {
    let mut text = String::new();
    if let Some(t) = capture_command("net", &["user"]) { text.push_str(&t); text.push('\n'); }
    if let Some(t) = capture_command("net", &["localgroup", "Administrators"]) { text.push_str(&t); }
    extract::extract_users(&text)
}

#[cfg(not(target_os = "windows"))]
fn collect_users() -> extract::UserExtract {
    extract::UserExtract::default()
}

/// Full live snapshot. Category failures degrade to empty record sets; the
/// analysis still runs over whatever was collected.
pub fn collect_feed() -> LiveFeed {
    LiveFeed {
        processes: collect_processes(),
        connections: collect_connections(),
        users: collect_users(),
        security: extract::SecurityExtract::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_process_table_is_nonempty() {
        let procs = collect_processes();
        assert!(!procs.is_empty());
        assert!(procs.iter().all(|p| p.pid.is_some()));
    }
}
