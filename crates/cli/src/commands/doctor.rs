//! Doctor command - validate configuration and show status

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    source: CheckResult,
    cache: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        source: CheckResult::error("Not checked"),
        cache: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.source = check_source(config);
        report.cache = check_cache(config);
    }

    let checks = [&report.config, &report.source, &report.cache];
    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn check_source(config: &AppConfig) -> CheckResult {
    match config.source.provider.as_str() {
        "ghost" => {
            if config.ghost.api_url.trim().is_empty() {
                return CheckResult::error("Provider: ghost, api_url is empty");
            }
            check_credential("ghost", &config.ghost.content_key_env)
        }
        "hashnode" => {
            if config.hashnode.host.trim().is_empty() {
                return CheckResult::error("Provider: hashnode, host is empty");
            }
            // Token is optional for public publications
            match env_set(&config.hashnode.token_env) {
                true => CheckResult::ok(format!(
                    "Provider: hashnode, host: {}, token: {} (set)",
                    config.hashnode.host, config.hashnode.token_env
                )),
                false => CheckResult::ok(format!(
                    "Provider: hashnode, host: {}, no token (public access)",
                    config.hashnode.host
                )),
            }
        }
        "notion" => {
            if config.notion.database_id.trim().is_empty() {
                return CheckResult::error("Provider: notion, database_id is empty");
            }
            check_credential("notion", &config.notion.token_env)
        }
        "stub" => CheckResult::ok("Provider: stub (offline)"),
        other => CheckResult::warn(format!("Unknown provider: {}", other)),
    }
}

fn check_credential(provider: &str, env_var: &str) -> CheckResult {
    if env_var.trim().is_empty() {
        return CheckResult::error(format!("No credential env var configured for {}", provider));
    }

    if env_set(env_var) {
        CheckResult::ok(format!("Provider: {}, credential: {} (set)", provider, env_var))
    } else {
        CheckResult::warn(format!(
            "Provider: {}, credential: {} (not set)",
            provider, env_var
        ))
    }
}

fn env_set(env_var: &str) -> bool {
    std::env::var(env_var).is_ok_and(|v| !v.trim().is_empty())
}

fn check_cache(config: &AppConfig) -> CheckResult {
    if !config.source.cache_enabled {
        return CheckResult::ok("Cache disabled");
    }

    if config.source.cache_ttl_secs == 0 {
        return CheckResult::warn("Cache enabled with ttl 0; every call refetches");
    }

    CheckResult::ok(format!("Cache enabled, ttl {}s", config.source.cache_ttl_secs))
}

fn print_report(report: &DoctorReport) {
    println!("postfeed Doctor Report");
    println!("======================");
    println!();

    print_check("Config", &report.config);
    print_check("Source", &report.source);
    print_check("Cache", &report.cache);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall == "ok" {
        println!();
        println!("Ready to run! Try: postfeed list");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
