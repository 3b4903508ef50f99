use std::env;
use std::fs;
use std::process;

use bindcheck::guest::FixtureGuest;
use bindcheck::script::{parse_script, Check, Runner};
use bindcheck::smoke;
use regex::Regex;

fn main() {
    let mut script_path: Option<String> = None;
    let mut filter: Option<Regex> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--filter" => {
                let pattern = match args.next() {
                    Some(pattern) => pattern,
                    None => usage("--filter needs a pattern"),
                };
                match Regex::new(&pattern) {
                    Ok(re) => filter = Some(re),
                    Err(e) => usage(&format!("bad filter pattern: {e}")),
                }
            }
            "--help" | "-h" => usage(""),
            other if script_path.is_none() => script_path = Some(other.to_string()),
            other => usage(&format!("unexpected argument: {other}")),
        }
    }

    let (name, checks): (String, Vec<Check>) = match &script_path {
        Some(path) => {
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(e) => {
                    eprintln!("cannot read {path}: {e}");
                    process::exit(1);
                }
            };
            match parse_script(&source) {
                Ok(script) => (script.name.unwrap_or_else(|| path.clone()), script.checks),
                Err(e) => {
                    eprintln!("cannot parse {path}: {e}");
                    process::exit(1);
                }
            }
        }
        None => ("smoke".to_string(), smoke::checks().to_vec()),
    };

    let checks: Vec<Check> = match &filter {
        Some(re) => checks
            .into_iter()
            .filter(|check| re.is_match(&check.describe()))
            .collect(),
        None => checks,
    };

    let mut runner = Runner::new(smoke::interface(), smoke::host(), FixtureGuest::new());
    if let Err(e) = runner.run_entry("start") {
        eprintln!("{name}: entry point failed: {e}");
        process::exit(1);
    }

    let report = runner.run(&checks);
    println!("{name}: {report}");

    let mut failed = !report.ok();
    if let Err(e) = runner.finish() {
        eprintln!("{name}: {e}");
        failed = true;
    }
    if failed {
        process::exit(1);
    }
}

fn usage(message: &str) -> ! {
    if !message.is_empty() {
        eprintln!("{message}");
    }
    eprintln!("usage: bindcheck [script.json] [--filter <regex>]");
    process::exit(if message.is_empty() { 0 } else { 1 });
}
