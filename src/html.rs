use crate::recommend::Priority;
use crate::report::AnalysisResult;
use crate::score::ThreatLevel;

pub fn render_html(rep: &AnalysisResult, theme: crate::Theme) -> String {
    let mut s = String::new();
    s.push_str("<html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>WinTriage Report</title><style>");
    match theme {
        crate::Theme::Dark => s.push_str(":root{--bg:#0a0e13;--fg:#ffffff;--muted:#c0c4cc;--card:#0d131a;--border:#243041;--accent:#3b82f6;--ok:#22c55e;--warn:#f59e0b;--err:#ef4444} body{margin:0;background:var(--bg);color:var(--fg);font-family:Segoe UI,system-ui,-apple-system,Arial,sans-serif} .container{max-width:1200px;margin:0 auto;padding:24px} .header{display:flex;align-items:center;justify-content:space-between;gap:12px;margin-bottom:16px} .title{font-size:20px;font-weight:600} .sub{color:var(--muted);font-size:13px} .banner{border-radius:10px;padding:18px;margin-bottom:16px;text-align:center;font-size:18px;font-weight:600} .level-low{background:#06220f;color:#86efac} .level-medium{background:#2a2206;color:#fde68a} .level-high{background:#2c1208;color:#fdba74} .level-critical{background:#2c0a0e;color:#fca5a5} .grid{display:grid;grid-template-columns:repeat(4,minmax(0,1fr));gap:12px} .card{background:var(--card);border:1px solid var(--border);border-radius:10px;padding:14px} .metric{display:flex;align-items:center;justify-content:space-between} .metric .label{color:var(--muted);font-size:12px} .metric .value{font-size:22px;font-weight:700} .value.err{color:var(--err)} .section{margin-top:18px} .section h3{margin:0 0 10px 0;font-size:16px;font-weight:600} .table{width:100%;border-collapse:separate;border-spacing:0;background:var(--card);border:1px solid var(--border);border-radius:10px;overflow:hidden} .table th{background:#0c1118;text-align:left;font-weight:600;padding:10px;border-bottom:1px solid var(--border)} .table td{padding:10px;border-bottom:1px solid var(--border)} .pill{display:inline-block;background:#0c1118;padding:6px 10px;border-radius:999px;border:1px solid var(--border);font-size:12px;margin:4px 6px 0 0} .pri-high{color:var(--err)} .pri-medium{color:var(--warn)} .pri-low{color:var(--ok)} .footer{margin-top:22px;color:var(--muted);font-size:12px} @media (max-width:900px){.grid{grid-template-columns:repeat(2,minmax(0,1fr))}} @media (max-width:600px){.grid{grid-template-columns:1fr}}"),
        crate::Theme::Light => s.push_str(":root{--bg:#f7fafc;--fg:#111827;--muted:#6b7280;--card:#ffffff;--border:#e5e7eb;--accent:#2563eb;--ok:#16a34a;--warn:#d97706;--err:#dc2626} body{margin:0;background:var(--bg);color:var(--fg);font-family:Segoe UI,system-ui,-apple-system,Arial,sans-serif} .container{max-width:1200px;margin:0 auto;padding:24px} .header{display:flex;align-items:center;justify-content:space-between;gap:12px;margin-bottom:16px} .title{font-size:20px;font-weight:600} .sub{color:var(--muted);font-size:13px} .banner{border-radius:10px;padding:18px;margin-bottom:16px;text-align:center;font-size:18px;font-weight:600} .level-low{background:#d4edda;color:#155724} .level-medium{background:#fff3cd;color:#856404} .level-high{background:#ffe5d0;color:#7c2d12} .level-critical{background:#f8d7da;color:#721c24} .grid{display:grid;grid-template-columns:repeat(4,minmax(0,1fr));gap:12px} .card{background:var(--card);border:1px solid var(--border);border-radius:10px;padding:14px} .metric{display:flex;align-items:center;justify-content:space-between} .metric .label{color:var(--muted);font-size:12px} .metric .value{font-size:22px;font-weight:700} .value.err{color:var(--err)} .section{margin-top:18px} .section h3{margin:0 0 10px 0;font-size:16px;font-weight:600} .table{width:100%;border-collapse:separate;border-spacing:0;background:var(--card);border:1px solid var(--border);border-radius:10px;overflow:hidden} .table th{background:#f3f4f6;text-align:left;font-weight:600;padding:10px;border-bottom:1px solid var(--border)} .table td{padding:10px;border-bottom:1px solid var(--border)} .pill{display:inline-block;background:#eef2f7;padding:6px 10px;border-radius:999px;border:1px solid var(--border);font-size:12px;margin:4px 6px 0 0} .pri-high{color:var(--err)} .pri-medium{color:var(--warn)} .pri-low{color:var(--ok)} .footer{margin-top:22px;color:var(--muted);font-size:12px} @media (max-width:900px){.grid{grid-template-columns:repeat(2,minmax(0,1fr))}} @media (max-width:600px){.grid{grid-template-columns:1fr}}"),
    }
    s.push_str("</style></head><body><div class=\"container\">");
    s.push_str("<div class=\"header\"><div class=\"title\">WinTriage Report</div>");
    s.push_str(&format!("<div class=\"sub\">{}</div></div>", rep.generated_at.format("%Y-%m-%d %H:%M")));
    let level_cls = match rep.threat_assessment.level {
        ThreatLevel::Low => "level-low",
        ThreatLevel::Medium => "level-medium",
        ThreatLevel::High => "level-high",
        ThreatLevel::Critical => "level-critical",
    };
    s.push_str(&format!(
        "<div class=\"banner {}\">Threat Level: {} · Score {}/100 · {} issues</div>",
        level_cls, rep.threat_assessment.level, rep.threat_assessment.score, rep.threat_assessment.issues.len()
    ));
    s.push_str("<div class=\"grid\">");
    s.push_str(&format!("<div class=\"card metric\"><div class=\"label\">Processes</div><div class=\"value\">{}</div></div>", rep.processes.total_processes));
    s.push_str(&format!("<div class=\"card metric\"><div class=\"label\">Suspicious Processes</div><div class=\"value err\">{}</div></div>", rep.processes.suspicious_count));
    s.push_str(&format!("<div class=\"card metric\"><div class=\"label\">External Connections</div><div class=\"value\">{}</div></div>", rep.network.external_count));
    s.push_str(&format!("<div class=\"card metric\"><div class=\"label\">Suspicious Connections</div><div class=\"value err\">{}</div></div>", rep.network.suspicious_count));
    s.push_str(&format!("<div class=\"card metric\"><div class=\"label\">User Accounts</div><div class=\"value\">{}</div></div>", rep.users.total_users));
    s.push_str(&format!("<div class=\"card metric\"><div class=\"label\">Administrators</div><div class=\"value\">{}</div></div>", rep.users.admin_count));
    s.push_str(&format!("<div class=\"card metric\"><div class=\"label\">Failed Logons</div><div class=\"value err\">{}</div></div>", rep.security.failed_logins));
    s.push_str(&format!("<div class=\"card metric\"><div class=\"label\">Findings</div><div class=\"value\">{}</div></div>", rep.findings.len()));
    s.push_str("</div>");
    if !rep.threat_assessment.issues.is_empty() {
        s.push_str("<div class=\"section\"><h3>Issues</h3><div class=\"card\">");
        for i in &rep.threat_assessment.issues { s.push_str(&format!("<div class=\"pill\">{}</div>", html_escape(i))); }
        s.push_str("</div></div>");
    }
    if !rep.findings.is_empty() {
        s.push_str("<div class=\"section\"><h3>Findings</h3><table class=\"table\"><thead><tr><th>Category</th><th>Reason</th><th>Weight</th></tr></thead><tbody>");
        for f in &rep.findings {
            s.push_str(&format!("<tr><td>{:?}</td><td>{}</td><td>{}</td></tr>", f.category, html_escape(&f.reason), f.weight));
        }
        s.push_str("</tbody></table></div>");
    }
    if !rep.processes.suspicious_list.is_empty() {
        s.push_str("<div class=\"section\"><h3>Suspicious Processes</h3><table class=\"table\"><thead><tr><th>Name</th><th>PID</th><th>User</th><th>Path</th><th>Memory (MB)</th></tr></thead><tbody>");
        for p in &rep.processes.suspicious_list {
            let pid = p.pid.map(|v| v.to_string()).unwrap_or_default();
            let user = p.username.clone().unwrap_or_default();
            let path = p.exe_path.clone().unwrap_or_default();
            let mem = p.memory_mb.map(|m| format!("{:.1}", m)).unwrap_or_default();
            s.push_str(&format!("<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>", html_escape(&p.name), pid, html_escape(&user), html_escape(&path), mem));
        }
        s.push_str("</tbody></table></div>");
    }
    if !rep.network.connection_list.is_empty() {
        s.push_str("<div class=\"section\"><h3>Connections</h3><table class=\"table\"><thead><tr><th>Protocol</th><th>Local</th><th>Remote</th><th>State</th><th>PID</th></tr></thead><tbody>");
        for c in &rep.network.connection_list {
            let pid = c.pid.map(|v| v.to_string()).unwrap_or_default();
            s.push_str(&format!(
                "<tr><td>{}</td><td>{}:{}</td><td>{}:{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&c.protocol), html_escape(&c.local_ip), c.local_port,
                html_escape(&c.remote_ip), c.remote_port, html_escape(&c.state), pid
            ));
        }
        s.push_str("</tbody></table></div>");
    }
    if !rep.security.event_list.is_empty() {
        s.push_str("<div class=\"section\"><h3>Security Events</h3><table class=\"table\"><thead><tr><th>Event ID</th><th>Timestamp</th><th>Severity</th></tr></thead><tbody>");
        for e in &rep.security.event_list {
            let ts = e.timestamp.clone().unwrap_or_default();
            s.push_str(&format!("<tr><td>{}</td><td>{}</td><td>{:?}</td></tr>", e.event_id, html_escape(&ts), e.severity));
        }
        s.push_str("</tbody></table></div>");
    }
    s.push_str("<div class=\"section\"><h3>Recommendations</h3><div class=\"card\">");
    for r in &rep.recommendations {
        let cls = match r.priority { Priority::High => "pri-high", Priority::Medium => "pri-medium", Priority::Low => "pri-low" };
        s.push_str(&format!(
            "<div style=\"margin:8px 0\"><span class=\"pill {}\">{:?} · {}</span><div>{}</div><div class=\"sub\">{}</div></div>",
            cls, r.priority, html_escape(&r.category), html_escape(&r.description), html_escape(&r.action)
        ));
    }
    s.push_str("</div></div>");
    s.push_str("<div class=\"footer\">Generated by WinTriage</div></div></body></html>");
    s
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
