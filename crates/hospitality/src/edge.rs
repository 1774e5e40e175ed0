use crate::prelude::{println, *};
use colored::Colorize;
use hospitality_core::edge::{Decision, EdgePolicy, RequestAttributes, Verdict};
use serde::Serialize;

#[derive(Debug, clap::Parser)]
#[command(name = "edge")]
#[command(about = "Edge request filter operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Classify a request the way the server's edge filter would
    #[clap(name = "check")]
    Check(CheckOptions),

    /// Print the configured policy
    #[clap(name = "policy")]
    Policy,
}

#[derive(Debug, clap::Args, Clone)]
pub struct CheckOptions {
    /// Request path
    #[arg(default_value = "/")]
    path: String,

    /// ISO-2 country code of the client
    #[arg(short, long)]
    country: Option<String>,

    /// User agent the client sent
    #[arg(short = 'a', long)]
    user_agent: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub path: String,
    pub exempt: bool,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub status: Option<u16>,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let config = crate::config::load(global.config.as_deref())?;
    let policy = config.edge_policy();

    if global.verbose {
        println!(
            "Edge filter {} in configuration",
            if config.edge.enabled { "enabled" } else { "disabled" }
        );
        println!();
    }

    match app.command {
        Commands::Check(options) => check(&policy, options),
        Commands::Policy => print_policy(&policy),
    }
}

/// Verdict for a single request, exemptions included
pub fn check_data(
    policy: &EdgePolicy,
    path: &str,
    country: Option<&str>,
    user_agent: Option<&str>,
) -> CheckOutput {
    let exempt = policy.is_exempt(path);
    let verdict = if exempt {
        Verdict {
            decision: Decision::Allow,
            check: None,
        }
    } else {
        policy.evaluate(&RequestAttributes {
            country,
            client_identity: user_agent,
            path,
        })
    };

    CheckOutput {
        path: path.to_string(),
        exempt,
        verdict,
        status: verdict.decision.status_code(),
    }
}

fn check(policy: &EdgePolicy, options: CheckOptions) -> Result<()> {
    let output = check_data(
        policy,
        &options.path,
        options.country.as_deref(),
        options.user_agent.as_deref(),
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let decision = match output.verdict.decision {
        Decision::Allow => "ALLOW".green().bold(),
        Decision::DenyForbidden => "403 FORBIDDEN".red().bold(),
        Decision::DenyNotFound => "404 NOT FOUND".yellow().bold(),
    };
    println!("{decision}");

    if output.exempt {
        println!("Path {} is exempt from the filter", output.path);
    } else if let Some(check) = output.verdict.check {
        println!("Matched check: {check:?}");
    }
    if let Some(body) = output.verdict.decision.body() {
        println!("Body: {body}");
    }

    Ok(())
}

fn print_policy(policy: &EdgePolicy) -> Result<()> {
    let countries: Vec<&str> = policy.blocked_countries().collect();
    let identity = match policy.min_identity_length() {
        0 => "not checked".to_string(),
        n => f!("at least {n} characters"),
    };
    let prefixes = if policy.blocked_path_prefixes().is_empty() {
        "-".to_string()
    } else {
        policy.blocked_path_prefixes().join("\n")
    };

    let mut table = new_table();
    table.add_row(prettytable::row!["Policy", f!("{:?}", policy.version())]);
    table.add_row(prettytable::row!["Blocked countries", countries.join(", ")]);
    table.add_row(prettytable::row!["User agent", identity]);
    table.add_row(prettytable::row!["Blocked paths", prefixes]);
    table.printstd();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hospitality_core::edge::{Check, PolicyVersion};

    const AGENT: &str = "Mozilla/5.0 (Macintosh)";

    #[test]
    fn test_check_blocked_country() {
        let policy = EdgePolicy::default();
        let output = check_data(&policy, "/articles", Some("ir"), Some(AGENT));
        assert_eq!(output.verdict.decision, Decision::DenyForbidden);
        assert_eq!(output.verdict.check, Some(Check::Geography));
        assert_eq!(output.status, Some(403));
    }

    #[test]
    fn test_check_exploit_path() {
        let policy = EdgePolicy::default();
        let output = check_data(&policy, "/.env", Some("US"), Some(AGENT));
        assert_eq!(output.verdict.decision, Decision::DenyNotFound);
        assert_eq!(output.status, Some(404));
    }

    #[test]
    fn test_check_exempt_asset() {
        let policy = EdgePolicy::default();
        let output = check_data(&policy, "/_next/static/chunk.js", Some("RU"), None);
        assert!(output.exempt);
        assert_eq!(output.verdict.decision, Decision::Allow);
        assert_eq!(output.status, None);
    }

    #[test]
    fn test_check_v1_ignores_identity() {
        let policy = EdgePolicy::for_version(PolicyVersion::V1);
        let output = check_data(&policy, "/wp-admin", Some("VN"), None);
        assert_eq!(output.verdict.decision, Decision::Allow);
    }

    #[test]
    fn test_check_output_json() {
        let policy = EdgePolicy::default();
        let output = check_data(&policy, "/", None, Some("bot"));
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["decision"], "deny_forbidden");
        assert_eq!(value["check"], "client_identity");
    }
}
