// Main CLI entry point for unauthcheck
// Uses clap for argument parsing

use clap::{Arg, ArgAction, Command};
use unauthcheck::scan::{run_scan, ScanConfig};

const API_KEY_VAR: &str = "MISTRAL_API_KEY";

#[tokio::main]
async fn main() {
    let matches = Command::new("unauthcheck")
        .version(clap::crate_version!())
        .about("Checks OpenAPI-described endpoints for likely unauthenticated access")
        .after_help(
            "EXAMPLES:\n  unauthcheck --url https://api.example.com/openapi.json\n  \
             unauthcheck -f ./openapi.json -o results.csv -v\n\n\
             The MISTRAL_API_KEY environment variable must hold the AI service API key.",
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .num_args(1)
                .help("URL to OpenAPI JSON"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .num_args(1)
                .help("Path to local OpenAPI JSON"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .num_args(1)
                .help("CSV output file (auto-generated from hostname if not provided, with versioning)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Show execution progress and runtime activity"),
        )
        .get_matches();

    let url = matches.get_one::<String>("url").cloned();
    let file = matches.get_one::<String>("file").cloned();
    let output = matches.get_one::<String>("output").cloned();
    let verbose = matches.get_flag("verbose");

    match (&url, &file) {
        (None, None) => {
            eprintln!("[-] Either --url or --file must be provided");
            std::process::exit(2);
        }
        (Some(_), Some(_)) => {
            eprintln!("[-] Provide only one of --url or --file");
            std::process::exit(2);
        }
        _ => {}
    }

    // Read the API key once here; components receive it explicitly
    let api_key = match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("[-] {} environment variable not set", API_KEY_VAR);
            std::process::exit(1);
        }
    };

    let config = ScanConfig {
        url,
        file,
        output,
        verbose,
        api_key,
    };

    if let Err(e) = run_scan(config).await {
        if verbose {
            eprintln!("\n[-] Scan failed: {:?}", e);
        } else {
            eprintln!("\n[-] {}", e);
        }
        std::process::exit(1);
    }
}
