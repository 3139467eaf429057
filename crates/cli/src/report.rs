//! Finding report rendering.

use colored::Colorize;
use gqlguard_types::{ScanResult, Severity, VulnerabilityFinding};

/// Findings sorted by severity descending; ties keep emission order.
fn sorted_findings(result: &ScanResult) -> Vec<&VulnerabilityFinding> {
    let mut findings: Vec<&VulnerabilityFinding> = result.findings.iter().collect();
    findings.sort_by_key(|f| std::cmp::Reverse(f.severity));
    findings
}

fn severity_tag(severity: Severity) -> colored::ColoredString {
    let tag = format!("[{severity}]");
    match severity {
        Severity::Critical => tag.red().bold(),
        Severity::High => tag.red(),
        Severity::Medium => tag.yellow(),
        Severity::Low => tag.blue(),
        Severity::Info => tag.green(),
    }
}

/// Prints the human-readable report.
pub fn print_human(result: &ScanResult, show_info: bool) {
    if show_info {
        println!("{} Target: {}", "[*]".cyan(), result.target.url);
        println!(
            "{} Scan {} finished with status {}",
            "[*]".cyan(),
            result.scan_id,
            result.status
        );
        println!();
    }

    if let Some(error) = &result.error {
        println!("{} {}", "[-]".red().bold(), error.red());
        println!();
    }

    let findings = sorted_findings(result);
    if findings.is_empty() {
        if show_info {
            println!("{} No findings", "[+]".green());
        }
        return;
    }

    for finding in &findings {
        println!(
            "{} {} - {}",
            severity_tag(finding.severity),
            finding.title.bold(),
            finding.description
        );
        println!("    {}", finding.recommendation.dimmed());
        if let Some(query) = finding
            .evidence
            .as_ref()
            .and_then(|e| e.get("query"))
            .and_then(|q| q.as_str())
        {
            println!("    {} {}", "Probe:".dimmed(), query.dimmed());
        }
        println!();
    }

    if show_info {
        let blocking = findings.iter().filter(|f| f.severity.is_blocking()).count();
        println!(
            "{} {} finding(s), {} blocking",
            "[!]".yellow(),
            findings.len(),
            blocking
        );
    }
}

/// Prints the result as pretty JSON, findings sorted by severity.
///
/// # Errors
///
/// Fails only if serialization fails, which would indicate a bug in the
/// result types.
pub fn print_json(result: &ScanResult) -> anyhow::Result<()> {
    let mut sorted = result.clone();
    sorted.findings.sort_by_key(|f| std::cmp::Reverse(f.severity));
    println!("{}", serde_json::to_string_pretty(&sorted)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gqlguard_types::{ScanStatus, ScanTarget};
    use uuid::Uuid;

    fn result_with(severities: &[Severity]) -> ScanResult {
        let target: ScanTarget = serde_json::from_str(r#"{"url": "http://x/gql"}"#).unwrap();
        ScanResult {
            scan_id: Uuid::new_v4(),
            target,
            status: ScanStatus::Completed,
            findings: severities
                .iter()
                .enumerate()
                .map(|(i, s)| VulnerabilityFinding::new(*s, format!("t{i}"), "d", "r"))
                .collect(),
            error: None,
            started_at: Utc::now(),
            completed_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let result = result_with(&[
            Severity::Low,
            Severity::Critical,
            Severity::Medium,
            Severity::Critical,
        ]);
        let sorted = sorted_findings(&result);
        let titles: Vec<&str> = sorted.iter().map(|f| f.title.as_str()).collect();
        // Both Criticals first, in emission order, then Medium, then Low.
        assert_eq!(titles, ["t1", "t3", "t2", "t0"]);
    }

    #[test]
    fn test_json_report_serializes() {
        let result = result_with(&[Severity::Info]);
        print_json(&result).unwrap();
    }
}
