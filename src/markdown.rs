use crate::recommend::Priority;
use crate::report::AnalysisResult;

pub fn render_markdown(rep: &AnalysisResult) -> String {
    let mut s = String::new();
    s.push_str("# WinTriage Report\n\n");
    s.push_str(&format!("Generated: {}\n\n", rep.generated_at.format("%Y-%m-%d %H:%M")));
    s.push_str(&format!("Threat Level: {}\n", rep.threat_assessment.level));
    s.push_str(&format!("Threat Score: {}/100\n\n", rep.threat_assessment.score));

    s.push_str("## Summary\n");
    s.push_str(&format!("- Total Processes: {}\n", rep.processes.total_processes));
    s.push_str(&format!("- Suspicious Processes: {}\n", rep.processes.suspicious_count));
    s.push_str(&format!("- Total Connections: {}\n", rep.network.total_connections));
    s.push_str(&format!("- External Connections: {}\n", rep.network.external_count));
    s.push_str(&format!("- Suspicious Connections: {}\n", rep.network.suspicious_count));
    s.push_str(&format!("- User Accounts: {}\n", rep.users.total_users));
    s.push_str(&format!("- Administrator Accounts: {}\n", rep.users.admin_count));
    s.push_str(&format!("- Failed Logons: {}\n\n", rep.security.failed_logins));

    s.push_str("## Issues\n");
    if rep.threat_assessment.issues.is_empty() { s.push_str("None\n\n"); } else {
        for i in &rep.threat_assessment.issues { s.push_str(&format!("- {}\n", i)); }
        s.push('\n');
    }

    if !rep.findings.is_empty() {
        s.push_str("## Findings\n");
        for f in &rep.findings { s.push_str(&format!("- [{:?}] {} (weight {})\n", f.category, f.reason, f.weight)); }
        s.push('\n');
    }

    if !rep.processes.suspicious_list.is_empty() {
        s.push_str("## Suspicious Processes\n");
        for p in &rep.processes.suspicious_list {
            let pid = p.pid.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());
            s.push_str(&format!("- {} (PID {})", p.name, pid));
            if let Some(path) = p.exe_path.as_ref() { s.push_str(&format!(" — {}", path)); }
            s.push('\n');
        }
        s.push('\n');
    }

    if !rep.network.suspicious_list.is_empty() {
        s.push_str("## Suspicious Connections\n");
        for c in &rep.network.suspicious_list {
            s.push_str(&format!(
                "- {} {}:{} -> {}:{} {}\n",
                c.protocol, c.local_ip, c.local_port, c.remote_ip, c.remote_port, c.state
            ));
        }
        s.push('\n');
    }

    s.push_str("## Recommendations\n");
    for r in &rep.recommendations {
        let mark = match r.priority { Priority::High => "[High]", Priority::Medium => "[Medium]", Priority::Low => "[Low]" };
        s.push_str(&format!("- {} {} — {}\n", mark, r.category, r.description));
        s.push_str(&format!("  Action: {}\n", r.action));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::report::Analyzer;

    #[test]
    fn markdown_carries_score_and_recommendations() {
        let r = Analyzer::new(AnalysisConfig::default()).analyze_text("cmd.exe 1234 SYSTEM 0 50000 K");
        let md = render_markdown(&r);
        assert!(md.contains("Threat Score: 20/100"));
        assert!(md.contains("Threat Level: Medium"));
        assert!(md.contains("Process security"));
        assert!(md.contains("suspicious process name: cmd.exe"));
    }

    #[test]
    fn empty_result_still_renders_baselines() {
        let r = Analyzer::new(AnalysisConfig::default()).analyze_text("");
        let md = render_markdown(&r);
        assert!(md.contains("Threat Score: 0/100"));
        assert!(md.contains("System maintenance"));
        assert!(md.contains("Security monitoring"));
    }
}
