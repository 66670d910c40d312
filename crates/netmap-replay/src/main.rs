//! NetMap tool replay
//!
//! Runs a JSON script of raw map input through the measurement tools on a
//! headless map and prints what was left on it.
//!
//! ```text
//! netmap-replay <script.json> [--config <tools.json>]
//! ```

mod script;

use netmap_core::ToolConfig;
use script::{Replay, ReplayError, ReplayResult, Script};
use std::process::ExitCode;

const USAGE: &str = "netmap-replay <script.json> [--config <tools.json>]";

#[derive(Debug, PartialEq)]
struct Args {
    script: String,
    config: Option<String>,
}

fn parse_args(args: &[String]) -> ReplayResult<Args> {
    let mut script = None;
    let mut config = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| ReplayError::Usage(USAGE.to_string()))?;
                config = Some(path.clone());
            }
            "-h" | "--help" => return Err(ReplayError::Usage(USAGE.to_string())),
            _ if script.is_none() => script = Some(arg.clone()),
            _ => return Err(ReplayError::Usage(USAGE.to_string())),
        }
    }
    let script = script.ok_or_else(|| ReplayError::Usage(USAGE.to_string()))?;
    Ok(Args { script, config })
}

fn run(args: &Args) -> ReplayResult<()> {
    let script = Script::load(&args.script)?;
    let config = match &args.config {
        Some(path) => ToolConfig::load(path)?,
        None => script.config.clone().unwrap_or_default(),
    };
    log::info!("replaying {} steps from {}", script.steps.len(), args.script);

    let mut replay = Replay::new(&script, config);
    replay.run(&script.steps)?;

    let report = replay.report();
    log::info!(
        "{} annotations, {} overlays on the map, {} tracked",
        report.annotations.len(),
        report.overlays,
        replay.controller().registry().len()
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args).and_then(|args| run(&args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            parse_args(&args(&["survey.json", "--config", "tools.json"])).unwrap(),
            Args {
                script: "survey.json".to_string(),
                config: Some("tools.json".to_string()),
            }
        );
        assert!(matches!(parse_args(&args(&[])), Err(ReplayError::Usage(_))));
        assert!(matches!(
            parse_args(&args(&["a.json", "--config"])),
            Err(ReplayError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&args(&["a.json", "b.json"])),
            Err(ReplayError::Usage(_))
        ));
    }
}
