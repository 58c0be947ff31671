use std::path::PathBuf;
use std::sync::OnceLock;
use anyhow::Context;
use clap::{ArgAction, ColorChoice, CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use comfy_table::{ContentArrangement, Table};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
mod normalize;
mod records;
mod extract;
mod config;
mod suspicion;
mod score;
mod recommend;
mod report;
mod live;
mod markdown;
mod html;

use crate::config::{AnalysisConfig, ScoringProfile};
use crate::recommend::Priority;
use crate::report::{AnalysisResult, Analyzer};
use crate::score::ThreatLevel;

static ENABLE_COLOR: OnceLock<bool> = OnceLock::new();

#[derive(Clone, Copy, Debug, ValueEnum, Serialize, Deserialize)]
enum OutputFmt { Text, Json }

#[derive(Clone, Copy, Debug, ValueEnum, Serialize, Deserialize)]
enum TextFormat { Lines, Table }

#[derive(Clone, Copy, Debug, ValueEnum, Serialize, Deserialize)]
pub enum Theme { Dark, Light }

#[derive(Clone, Copy, Debug, ValueEnum, Serialize, Deserialize)]
enum LogLevel { Error, Warn, Info, Debug, Trace }

#[derive(Clone, Copy, Debug, ValueEnum, Serialize, Deserialize)]
enum LogFormat { Text, Json }

#[derive(Parser, Debug)]
#[command(
    name = "WinTriage",
    about = "Host triage analyzer for live machines and captured command output",
    long_about = "Host triage analyzer that enumerates a live machine or parses captured text dumps (tasklist, wmic, netstat, net user, event-log exports), flags suspicious processes, connections, users and events, and emits a scored threat assessment with remediation advice.",
    after_long_help = "Examples:\n  WinTriage capture.txt\n  WinTriage --live --output json\n  WinTriage --scan-path C:\\Captures --file-glob *.log --html report.html\n  WinTriage capture.txt --profile live-host --fail-on-level high\n  WinTriage capture.txt --rules rules.json --export-dir reports",
    color = ColorChoice::Auto
)]
struct Args {
    /// Capture files to analyze (tasklist/netstat/net user/event-log dumps)
    files: Vec<String>,
    #[arg(long, short = 'L', default_value_t = false, help = "Analyze the live host instead of capture files")]
    live: bool,
    /// Scoring profile; defaults to live-host for --live and text-report for captures
    #[arg(long, value_enum)]
    profile: Option<ScoringProfile>,
    #[arg(long, short = 's')]
    scan_path: Option<String>,
    #[arg(long, short = 'g')]
    file_glob: Option<String>,
    /// Path to JSON rules registry (default ./rules.json)
    #[arg(long)]
    rules: Option<String>,
    #[arg(long)]
    config: Option<String>,
    #[arg(long, short = 'o', value_enum, default_value = "text")]
    output: OutputFmt,
    #[arg(long, value_enum, default_value = "lines")]
    text_format: TextFormat,
    #[arg(long, value_enum, default_value = "dark")]
    theme: Theme,
    #[arg(long, short = 'n', default_value_t = 20, help = "Length of the top-by-memory/CPU lists")]
    top: usize,
    #[arg(long)]
    html: Option<String>,
    #[arg(long, short = 'j')]
    json_path: Option<String>,
    #[arg(long)]
    csv_path: Option<String>,
    #[arg(long)]
    md_path: Option<String>,
    #[arg(long, help = "Write a bundled set of outputs to this directory")]
    export_dir: Option<String>,
    #[arg(long, default_value_t = false)]
    no_open: bool,
    #[arg(long, short = 'C', default_value_t = false)]
    no_color: bool,
    #[arg(long, default_value_t = false)]
    force_color: bool,
    #[arg(long, default_value_t = false)]
    no_emoji: bool,
    #[arg(short = 'q', long, default_value_t = false)]
    quiet: bool,
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long)]
    log_level: Option<LogLevel>,
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
    #[arg(long)]
    log_path: Option<String>,
    #[arg(long, default_value_t = false)]
    progress: bool,
    #[arg(long, default_value_t = false)]
    summary_only: bool,
    /// Exit with code 1 when any result reaches this threat level
    #[arg(long, value_enum)]
    fail_on_level: Option<ThreatLevel>,
    #[arg(long, value_enum)]
    completions: Option<Shell>,
    #[arg(long)]
    completions_out: Option<String>,
}

#[derive(Deserialize)]
struct AppConfig {
    profile: Option<ScoringProfile>,
    rules: Option<String>,
    scan_path: Option<String>,
    file_glob: Option<String>,
    output: Option<OutputFmt>,
    text_format: Option<TextFormat>,
    theme: Option<Theme>,
    top: Option<usize>,
    html: Option<String>,
    json_path: Option<String>,
    csv_path: Option<String>,
    md_path: Option<String>,
    export_dir: Option<String>,
    force_color: Option<bool>,
    no_emoji: Option<bool>,
    summary_only: Option<bool>,
    fail_on_level: Option<ThreatLevel>,
    log_format: Option<LogFormat>,
    log_path: Option<String>,
}

fn main() {
    let mut args = Args::parse();
    if let Some(sh) = args.completions {
        let mut cmd = Args::command();
        if let Some(path) = args.completions_out.as_ref() {
            if let Ok(mut f) = std::fs::File::create(path) { clap_complete::generate(sh, &mut cmd, "WinTriage", &mut f); } else { clap_complete::generate(sh, &mut cmd, "WinTriage", &mut std::io::stdout()); }
        } else {
            clap_complete::generate(sh, &mut cmd, "WinTriage", &mut std::io::stdout());
        }
        return;
    }
    if let Some(p) = args.config.as_ref()
        && let Ok(s) = std::fs::read_to_string(p)
        && let Ok(cfg) = toml::from_str::<AppConfig>(&s) { apply_config(&mut args, cfg); }
    else {
        let def = "WinTriage.toml";
        if let Ok(s) = std::fs::read_to_string(def)
            && let Ok(cfg) = toml::from_str::<AppConfig>(&s) { apply_config(&mut args, cfg); }
    }
    {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if args.quiet {
            builder.filter_level(log::LevelFilter::Error);
        } else if let Some(lvl) = args.log_level {
            let f = match lvl { LogLevel::Error => log::LevelFilter::Error, LogLevel::Warn => log::LevelFilter::Warn, LogLevel::Info => log::LevelFilter::Info, LogLevel::Debug => log::LevelFilter::Debug, LogLevel::Trace => log::LevelFilter::Trace };
            builder.filter_level(f);
        } else if args.verbose > 0 {
            let f = if args.verbose >= 3 { log::LevelFilter::Trace } else if args.verbose == 2 { log::LevelFilter::Debug } else { log::LevelFilter::Info };
            builder.filter_level(f);
        }
        if let Some(fmt) = args.log_format {
            match fmt {
                LogFormat::Json => {
                    builder.format(|buf, record| {
                        use std::io::Write;
                        let ts = chrono::Local::now().to_rfc3339();
                        let obj = serde_json::json!({
                            "ts": ts,
                            "level": record.level().to_string(),
                            "target": record.target(),
                            "msg": record.args().to_string(),
                        });
                        writeln!(buf, "{}", obj)
                    });
                }
                LogFormat::Text => {
                    builder.format(|buf, record| {
                        use std::io::Write;
                        let ts = chrono::Local::now().format("%H:%M:%S");
                        writeln!(buf, "[{:<5} {}] {}", record.level(), ts, record.args())
                    });
                }
            }
        }
        if let Some(path) = args.log_path.as_ref() {
            match std::fs::File::create(path) {
                Ok(f) => {
                    builder.target(env_logger::Target::Pipe(Box::new(f)));
                }
                Err(e) => {
                    eprintln!("Failed to open log file {}: {}", path, e);
                }
            }
        }
        builder.init();
    }
    let term = std::env::var("TERM").unwrap_or_default();
    let no_color_env = std::env::var_os("NO_COLOR").is_some();
    let color_default = std::io::stdout().is_terminal() && !no_color_env && term != "dumb";
    let enable_color = if args.force_color { true } else { color_default && !args.no_color };
    let _ = ENABLE_COLOR.set(enable_color);
    match run(&args) {
        Ok(exit) => std::process::exit(exit),
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("{}", paint(&format!("Analysis failed: {:#}", e), "1;31"));
            std::process::exit(2);
        }
    }
}

fn apply_config(args: &mut Args, cfg: AppConfig) {
    if args.profile.is_none() && let Some(v) = cfg.profile { args.profile = Some(v); }
    if args.rules.is_none() && let Some(v) = cfg.rules { args.rules = Some(v); }
    if args.scan_path.is_none() && let Some(v) = cfg.scan_path { args.scan_path = Some(v); }
    if args.file_glob.is_none() && let Some(v) = cfg.file_glob { args.file_glob = Some(v); }
    if let Some(v) = cfg.output { args.output = v; }
    if let Some(v) = cfg.text_format { args.text_format = v; }
    if let Some(v) = cfg.theme { args.theme = v; }
    if args.top == 20 && let Some(v) = cfg.top { args.top = v; }
    if args.html.is_none() && let Some(v) = cfg.html { args.html = Some(v); }
    if args.json_path.is_none() && let Some(v) = cfg.json_path { args.json_path = Some(v); }
    if args.csv_path.is_none() && let Some(v) = cfg.csv_path { args.csv_path = Some(v); }
    if args.md_path.is_none() && let Some(v) = cfg.md_path { args.md_path = Some(v); }
    if args.export_dir.is_none() && let Some(v) = cfg.export_dir { args.export_dir = Some(v); }
    if let Some(v) = cfg.force_color { args.force_color = v; }
    if let Some(v) = cfg.no_emoji { args.no_emoji = v; }
    if let Some(v) = cfg.summary_only { args.summary_only = v; }
    if args.fail_on_level.is_none() && let Some(v) = cfg.fail_on_level { args.fail_on_level = Some(v); }
    if let Some(v) = cfg.log_format { args.log_format = Some(v); }
    if args.log_path.is_none() && let Some(v) = cfg.log_path { args.log_path = Some(v); }
}

fn run(args: &Args) -> anyhow::Result<i32> {
    let go_live = args.live || (args.files.is_empty() && args.scan_path.is_none());
    let profile = args.profile.unwrap_or(if go_live { ScoringProfile::LiveHost } else { ScoringProfile::TextReport });
    let mut cfg = AnalysisConfig::with_profile(profile);
    cfg.top_list_len = args.top;
    if let Some(rules) = config::load_rules(args.rules.as_deref()) {
        config::apply_rules(&mut cfg, rules);
    }
    let analyzer = Analyzer::new(cfg);

    let mut results: Vec<(String, AnalysisResult)> = Vec::new();
    if go_live {
        log::info!("Collecting live host snapshot");
        let feed = live::collect_feed();
        results.push(("live host".to_string(), analyzer.analyze_records(feed)));
    }
    for f in &args.files {
        // An unreadable blob is an explicit failure, never a clean zero-finding
        // result.
        let raw = std::fs::read(f).with_context(|| format!("cannot read capture file {}", f))?;
        results.push((f.clone(), analyzer.analyze_bytes(&raw)));
    }
    if let Some(root) = args.scan_path.as_ref() {
        for (path, raw) in scan_captures(root, args.file_glob.as_deref(), args.progress) {
            results.push((path, analyzer.analyze_bytes(&raw)));
        }
    }

    let total = results.len();
    for (i, (label, rep)) in results.iter().enumerate() {
        match args.output {
            OutputFmt::Text => match args.text_format {
                TextFormat::Lines => print_text(label, rep, args.summary_only, !args.no_emoji),
                TextFormat::Table => print_text_table(label, rep, !args.no_emoji),
            },
            OutputFmt::Json => {
                if args.json_path.is_none() && !args.quiet {
                    println!("{}", serde_json::to_string_pretty(rep)?);
                }
            }
        }
        if let Some(p) = args.json_path.as_ref() {
            let p = out_path(p, i, total);
            match std::fs::write(&p, serde_json::to_vec_pretty(rep)?) {
                Ok(_) => { if !args.quiet { println!("{}", paint(&format!("JSON written: {}", p), "1;36")); } }
                Err(e) => log::error!("JSON write failed for {}: {}", p, e),
            }
        }
        if let Some(p) = args.csv_path.as_ref() {
            let p = out_path(p, i, total);
            if let Err(e) = write_csv(&p, rep) { log::error!("CSV write failed for {}: {}", p, e); } else if !args.quiet { println!("{}", paint(&format!("CSV written: {}", p), "1;36")); }
        }
        if let Some(p) = args.md_path.as_ref() {
            let p = out_path(p, i, total);
            match std::fs::write(&p, markdown::render_markdown(rep)) {
                Ok(_) => { if !args.quiet { println!("{}", paint(&format!("Markdown written: {}", p), "1;36")); } }
                Err(e) => log::error!("Markdown write failed for {}: {}", p, e),
            }
        }
        if let Some(p) = args.html.as_ref() {
            let p = out_path(p, i, total);
            match std::fs::write(&p, html::render_html(rep, args.theme)) {
                Ok(_) => {
                    if !args.no_open { open_file_default(PathBuf::from(&p)); }
                    if !args.quiet { println!("{}", paint(&format!("HTML generated: {}", p), "1;36")); }
                }
                Err(e) => log::error!("HTML write failed for {}: {}", p, e),
            }
        }
        if let Some(dir) = args.export_dir.as_ref() {
            export_bundle(dir, i, rep, args);
        }
    }

    if let Some(threshold) = args.fail_on_level
        && results.iter().any(|(_, r)| r.threat_assessment.level >= threshold) {
        return Ok(1);
    }
    Ok(0)
}

fn scan_captures(root: &str, file_glob: Option<&str>, progress: bool) -> Vec<(String, Vec<u8>)> {
    let mut set_opt = None;
    if let Some(g) = file_glob
        && let Ok(glob) = globset::GlobBuilder::new(g).case_insensitive(true).build() {
        let mut gb = globset::GlobSetBuilder::new();
        gb.add(glob);
        set_opt = gb.build().ok();
    }
    let pb = if progress { Some(indicatif::ProgressBar::new_spinner()) } else { None };
    let mut out = Vec::new();
    for de in walkdir::WalkDir::new(root).follow_links(false).into_iter().filter_map(Result::ok) {
        let p = de.path();
        if !p.is_file() { continue; }
        if let Some(set) = &set_opt && !set.is_match(p) { continue; }
        if let Some(ref pb) = pb { pb.tick(); pb.set_message(format!("Scanning {}", p.to_string_lossy())); }
        match std::fs::read(p) {
            Ok(raw) => out.push((p.to_string_lossy().into_owned(), raw)),
            Err(e) => log::error!("cannot read capture file {}: {}", p.to_string_lossy(), e),
        }
    }
    if let Some(pb) = pb { pb.finish_and_clear(); }
    out
}

fn export_bundle(dir: &str, idx: usize, rep: &AnalysisResult, args: &Args) {
    let _ = std::fs::create_dir_all(dir);
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let base = PathBuf::from(dir);
    let suffix = if idx == 0 { ts } else { format!("{}-{}", ts, idx) };
    let html_path = base.join(format!("report-{}.html", suffix));
    match std::fs::write(&html_path, html::render_html(rep, args.theme)) {
        Ok(_) => { if !args.no_open { open_file_default(html_path.clone()); } if !args.quiet { println!("{}", paint(&format!("HTML generated: {}", html_path.to_string_lossy()), "1;36")); } }
        Err(e) => log::error!("HTML write failed for {}: {}", html_path.to_string_lossy(), e),
    }
    let json_path = base.join(format!("report-{}.json", suffix));
    match serde_json::to_vec_pretty(rep) {
        Ok(doc) => match std::fs::write(&json_path, doc) {
            Ok(_) => { if !args.quiet { println!("{}", paint(&format!("JSON written: {}", json_path.to_string_lossy()), "1;36")); } }
            Err(e) => log::error!("JSON write failed for {}: {}", json_path.to_string_lossy(), e),
        },
        Err(e) => log::error!("JSON encode failed: {}", e),
    }
    let csv_path = base.join(format!("findings-{}.csv", suffix));
    if let Err(e) = write_csv(&csv_path.to_string_lossy(), rep) { log::error!("CSV write failed for {}: {}", csv_path.to_string_lossy(), e); } else if !args.quiet { println!("{}", paint(&format!("CSV written: {}", csv_path.to_string_lossy()), "1;36")); }
    let md_path = base.join(format!("summary-{}.md", suffix));
    match std::fs::write(&md_path, markdown::render_markdown(rep)) {
        Ok(_) => { if !args.quiet { println!("{}", paint(&format!("Markdown written: {}", md_path.to_string_lossy()), "1;36")); } }
        Err(e) => log::error!("Markdown write failed for {}: {}", md_path.to_string_lossy(), e),
    }
}

fn out_path(base: &str, idx: usize, total: usize) -> String {
    if total <= 1 || idx == 0 { return base.to_string(); }
    let p = PathBuf::from(base);
    match (p.file_stem().and_then(|s| s.to_str()), p.extension().and_then(|e| e.to_str())) {
        (Some(stem), Some(ext)) => p.with_file_name(format!("{}-{}.{}", stem, idx, ext)).to_string_lossy().into_owned(),
        _ => format!("{}-{}", base, idx),
    }
}

fn print_text(label: &str, rep: &AnalysisResult, summary_only: bool, emoji: bool) {
    println!("{}", paint(&format!("Input: {}", label), "1;36"));
    println!("{}", paint(&format!("Profile: {:?}", rep.profile), "2"));
    let level = rep.threat_assessment.level;
    let mark = if emoji { level_emoji(level) } else { "" };
    println!("{}", paint(&format!("{}Threat Level: {} (score {}/100)", mark, level, rep.threat_assessment.score), level_code(level)));
    if rep.threat_assessment.issues.is_empty() {
        println!("{}", paint("Status: No issues detected.", "1;32"));
    } else {
        println!("{}", paint("Issues:", "1"));
        for i in &rep.threat_assessment.issues { println!("- {}", i); }
    }
    println!("{}", paint("Statistics:", "1"));
    println!("• Processes: {} total, {} suspicious, {} high-memory, {} high-CPU, {} orphans", rep.processes.total_processes, rep.processes.suspicious_count, rep.processes.high_memory_count, rep.processes.high_cpu_count, rep.processes.orphan_count);
    println!("• Connections: {} total, {} external, {} suspicious", rep.network.total_connections, rep.network.external_count, rep.network.suspicious_count);
    println!("• Users: {} accounts, {} administrators", rep.users.total_users, rep.users.admin_count);
    println!("• Security: {} failed logons, {} successful logons, {} system starts", rep.security.failed_logins, rep.security.successful_logins, rep.security.system_starts);
    if summary_only {
        print_recommendations(rep);
        return;
    }
    if !rep.findings.is_empty() {
        println!("{}", paint("Findings:", "1"));
        for f in &rep.findings {
            println!("[{:?}] {} (weight {})", f.category, f.reason, f.weight);
        }
    }
    if !rep.processes.suspicious_list.is_empty() {
        println!("{}", paint("Suspicious Processes:", "1"));
        for p in &rep.processes.suspicious_list {
            let pid = p.pid.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());
            let mut line = format!("• {} (PID {})", p.name, pid);
            if let Some(u) = p.username.as_ref() { line.push_str(&format!(" user {}", u)); }
            if let Some(path) = p.exe_path.as_ref() { line.push_str(&format!(" at {}", path)); }
            if let Some(mb) = p.memory_mb { line.push_str(&format!(" mem {:.1} MB", mb)); }
            println!("{}", line);
        }
    }
    if !rep.network.suspicious_list.is_empty() {
        println!("{}", paint("Suspicious Connections:", "1"));
        for c in &rep.network.suspicious_list {
            let pid = c.pid.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());
            println!("• {} {}:{} -> {}:{} {} (PID {})", c.protocol, c.local_ip, c.local_port, c.remote_ip, c.remote_port, c.state, pid);
        }
    }
    print_recommendations(rep);
}

fn print_recommendations(rep: &AnalysisResult) {
    println!("{}", paint("Recommendations:", "1"));
    for r in &rep.recommendations {
        println!("- [{:?}] {}: {}", r.priority, r.category, r.description);
        println!("  Action: {}", r.action);
    }
    println!("{}", paint("Checklist:", "1"));
    for r in &rep.recommendations { println!("[ ] {}", r.description); }
}

fn print_text_table(label: &str, rep: &AnalysisResult, emoji: bool) {
    println!("{}", paint(&format!("Input: {}", label), "1;36"));
    let level = rep.threat_assessment.level;
    let mark = if emoji { level_emoji(level) } else { "" };
    println!("{}", paint(&format!("{}Threat Level: {} (score {}/100)", mark, level, rep.threat_assessment.score), level_code(level)));
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![paint("Category", "1"), paint("Reason", "1"), paint("Weight", "1")]);
    for f in &rep.findings {
        table.add_row(vec![format!("{:?}", f.category), f.reason.clone(), f.weight.to_string()]);
    }
    println!("{}", table);
    let mut recs = Table::new();
    recs.set_content_arrangement(ContentArrangement::Dynamic);
    recs.set_header(vec![paint("Priority", "1"), paint("Category", "1"), paint("Description", "1"), paint("Action", "1")]);
    for r in &rep.recommendations {
        let pri = match r.priority { Priority::High => paint("High", "1;31"), Priority::Medium => paint("Medium", "1;33"), Priority::Low => paint("Low", "1;32") };
        recs.add_row(vec![pri, r.category.clone(), r.description.clone(), r.action.clone()]);
    }
    println!("{}", recs);
}

fn write_csv(path: &str, rep: &AnalysisResult) -> Result<(), std::io::Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["category", "reason", "weight", "record_category", "record_index"])?;
    for f in &rep.findings {
        let (rc, ri) = match f.record {
            Some(r) => (format!("{:?}", r.category), r.index.to_string()),
            None => (String::new(), String::new()),
        };
        wtr.write_record([format!("{:?}", f.category), f.reason.clone(), f.weight.to_string(), rc, ri])?;
    }
    wtr.flush()?;
    Ok(())
}

fn paint(s: &str, code: &str) -> String {
    if *ENABLE_COLOR.get().unwrap_or(&true) { format!("\x1b[{}m{}\x1b[0m", code, s) } else { s.to_string() }
}

fn level_code(level: ThreatLevel) -> &'static str {
    match level { ThreatLevel::Low => "1;32", ThreatLevel::Medium => "1;33", ThreatLevel::High => "31", ThreatLevel::Critical => "1;31" }
}

fn level_emoji(level: ThreatLevel) -> &'static str {
    match level { ThreatLevel::Low => "🟢 ", ThreatLevel::Medium => "🟡 ", ThreatLevel::High => "🟠 ", ThreatLevel::Critical => "🔴 " }
}

#[cfg(target_os = "windows")]
fn open_file_default(p: PathBuf) {
    let mut s = p.to_string_lossy().into_owned();
    if s.starts_with("\\\\?\\") { s = s.trim_start_matches("\\\\?\\").to_string(); }
    if s.ends_with('\\') || s.ends_with('/') { s = s.trim_end_matches(['\\', '/']).to_string(); }
    let _ = std::process::Command::new("explorer").arg(&s).spawn()
        .or_else(|_| std::process::Command::new("cmd").args(["/C", "start", "", &s]).spawn())
        .map_err(|e| log::error!("Failed to open file {}: {}", s, e));
}

#[cfg(not(target_os = "windows"))]
fn open_file_default(p: PathBuf) {
    let s = p.to_string_lossy().into_owned();
    let _ = std::process::Command::new("xdg-open").arg(&s).spawn().map_err(|e| log::error!("Failed to open file {}: {}", s, e));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_path_suffixes_only_multi_result_runs() {
        assert_eq!(out_path("report.json", 0, 1), "report.json");
        assert_eq!(out_path("report.json", 0, 3), "report.json");
        assert_eq!(out_path("report.json", 2, 3), "report-2.json");
        assert_eq!(out_path("report", 1, 2), "report-1");
    }

    #[test]
    fn csv_writes_findings() {
        let rep = Analyzer::new(AnalysisConfig::default()).analyze_text("cmd.exe 1234 SYSTEM 0 50000 K");
        let p = std::env::temp_dir().join("wintriage-findings.csv");
        write_csv(&p.to_string_lossy(), &rep).unwrap();
        let body = std::fs::read_to_string(&p).unwrap();
        assert!(body.starts_with("category,reason,weight"));
        assert!(body.contains("suspicious process name: cmd.exe"));
        let _ = std::fs::remove_file(&p);
    }

    #[test]
    fn scan_reads_matching_files() {
        let dir = std::env::temp_dir().join("wintriage-scan-test");
        let _ = std::fs::create_dir_all(&dir);
        std::fs::write(dir.join("a.log"), "cmd.exe 1 SYSTEM 0 10 K").unwrap();
        std::fs::write(dir.join("b.bin"), "ignored").unwrap();
        let out = scan_captures(&dir.to_string_lossy(), Some("*.log"), false);
        assert_eq!(out.len(), 1);
        assert!(out[0].0.ends_with("a.log"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
