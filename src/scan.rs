// Scan runner for unauthcheck
// Sequential endpoint loop: generate values, probe three cases, append rows

use crate::agent::ValueAgent;
use crate::confidence::score_response;
use crate::error::Result;
use crate::loader::{self, LoadedSpec};
use crate::models::{Endpoint, ProbeOutcome, ProbeRecord, ValueSet};
use crate::prober::Prober;
use crate::report::{hostname_slug, versioned_path, ReportWriter};
use std::io::Write;
use std::path::PathBuf;

pub struct ScanConfig {
    pub url: Option<String>,
    pub file: Option<String>,
    pub output: Option<String>,
    pub verbose: bool,
    pub api_key: String,
}

/// Run a full scan: load the spec, then for every endpoint probe the empty
/// case and two AI-generated value sets, scoring and appending each result
/// immediately. Only spec loading and report writing can abort the run.
pub async fn run_scan(config: ScanConfig) -> Result<()> {
    let LoadedSpec {
        base_url,
        endpoints,
    } = match (&config.url, &config.file) {
        (Some(url), _) => loader::load_from_url(url).await?,
        (_, Some(file)) => loader::load_from_file(file)?,
        _ => unreachable!("CLI enforces that one of url/file is present"),
    };

    let requested = config
        .output
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{}.csv", hostname_slug(&base_url))));
    let output = versioned_path(&requested);

    let mut writer = ReportWriter::create(&output)?;
    let agent = ValueAgent::new(config.api_key.clone());
    let prober = Prober::new()?;

    let total = endpoints.len();
    if config.verbose {
        println!("[*] OpenAPI loaded successfully");
        println!("[*] Base URL: {}", base_url);
        println!("[*] Total endpoints detected: {}", total);
        println!("[*] Output file: {}", output.display());
    }

    // Three cases per endpoint: empty, set_1, set_2
    let total_cases = total * 3;
    let mut completed_cases = 0;

    for (index, endpoint) in endpoints.iter().enumerate() {
        if config.verbose {
            println!(
                "\n[+] Testing endpoint ({}/{}): {} {}",
                index + 1,
                total,
                endpoint.method,
                endpoint.path
            );
            let names: Vec<&str> = endpoint.params.iter().map(|p| p.name.as_str()).collect();
            println!(
                "    Detected parameters ({}): {}",
                names.len(),
                if names.is_empty() {
                    "None".to_string()
                } else {
                    names.join(", ")
                }
            );
        }

        // Stage 1: generate both value sets for the endpoint. Endpoints
        // without parameters still get all three cases, just with empty sets.
        if config.verbose && !endpoint.params.is_empty() {
            println!("    [*] Agent generating sample values...");
        }
        let generated = agent.generate_value_sets(&endpoint.params).await;
        let suffix = if generated.used_fallback {
            "; fallback values used (generation failed)"
        } else {
            ""
        };
        let cases: Vec<(ValueSet, String)> = vec![
            (ValueSet::new(), "empty".to_string()),
            (generated.set_1, format!("set_1{}", suffix)),
            (generated.set_2, format!("set_2{}", suffix)),
        ];

        // Stage 2: probe each case in order
        for (case_index, (values, case_name)) in cases.iter().enumerate() {
            let params_values =
                serde_json::to_string(values).unwrap_or_else(|_| "{}".to_string());

            if config.verbose {
                println!(
                    "    [*] Test case {}/{}: {}",
                    case_index + 1,
                    cases.len(),
                    if values.is_empty() {
                        "Empty parameters".to_string()
                    } else {
                        params_values.clone()
                    }
                );
            }

            let outcome = prober.probe(&base_url, endpoint, values).await;
            let record = build_record(endpoint, &params_values, case_name, &outcome);

            if config.verbose {
                match &outcome {
                    ProbeOutcome::Success { status, .. } => {
                        println!("        -> Status: {}", status)
                    }
                    ProbeOutcome::NetworkFailure { error } => {
                        println!("        [!] Error: {}", error)
                    }
                }
            }

            writer.append(&record)?;
        }

        completed_cases += 3;
        update_progress(completed_cases, total_cases);
    }

    if config.verbose {
        println!("\n[*] Scan completed successfully");
        println!("[*] Results stored in {}", output.display());
    } else {
        println!();
    }

    Ok(())
}

fn build_record(
    endpoint: &Endpoint,
    params_values: &str,
    case_name: &str,
    outcome: &ProbeOutcome,
) -> ProbeRecord {
    let (confidence, level) = score_response(outcome.status(), outcome.body());

    let (status_codes, response, notes) = match outcome {
        ProbeOutcome::Success { status, body } => (
            status.to_string(),
            body.clone(),
            format!("Test case: {}", case_name),
        ),
        ProbeOutcome::NetworkFailure { error } => (
            "0".to_string(),
            format!("Request Error: {}", error),
            format!("Test case: {}; network error", case_name),
        ),
    };

    ProbeRecord {
        endpoint: endpoint.path.clone(),
        method: endpoint.method.to_string(),
        params_count: endpoint.params.len(),
        params_values: params_values.to_string(),
        status_codes,
        response,
        confidence,
        confidence_level: level.to_string(),
        notes,
    }
}

// 25-char progress bar, redrawn in place after every endpoint
fn update_progress(current: usize, total: usize) {
    const BAR_LEN: usize = 25;
    let filled = if total == 0 {
        BAR_LEN
    } else {
        BAR_LEN * current / total
    };
    let bar: String = "\u{2588}".repeat(filled) + &"-".repeat(BAR_LEN - filled);
    print!(
        "\rProgress: [{}] {} / {} test cases evaluated",
        bar, current, total
    );
    let _ = std::io::stdout().flush();
}
