//! floorplan-eval - score a floor-plan JSON file against the scorer service.
//!
//! Usage:
//!   floorplan-eval <plan.json> [--server URL] [--timeout SECS] [--offline] [--json]
//!
//! Prints the legend and the rectangles in draw order, then (unless
//! `--offline`) the four result tables. Exits non-zero when the file does
//! not parse or the evaluation fails.

use anyhow::{bail, Context, Result};
use floorplan_client::report::{self, Report};
use floorplan_client::{ClientConfig, EvaluationClient, HttpScorer, Session};
use floorplan_logic::grid::MapGrid;
use floorplan_logic::state::NoticeLevel;
use floorplan_logic::{FloorPlanDocument, ViewState};

const USAGE: &str =
    "usage: floorplan-eval <plan.json> [--server URL] [--timeout SECS] [--offline] [--json]";

struct Options {
    path: String,
    offline: bool,
    json: bool,
}

fn parse_options(rest: Vec<String>) -> Result<Options> {
    let mut path = None;
    let mut offline = false;
    let mut json = false;
    for arg in rest {
        match arg.as_str() {
            "--offline" => offline = true,
            "--json" => json = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
            _ if path.is_some() => bail!("only one floor plan may be given\n{USAGE}"),
            _ => path = Some(arg),
        }
    }
    let path = path.with_context(|| format!("missing floor plan path\n{USAGE}"))?;
    Ok(Options {
        path,
        offline,
        json,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config, rest) = ClientConfig::from_env()?.with_args(std::env::args().skip(1))?;
    let options = parse_options(rest)?;

    let text = tokio::fs::read_to_string(&options.path)
        .await
        .with_context(|| format!("reading {}", options.path))?;

    let state = if options.offline {
        let doc = FloorPlanDocument::from_json_str(&text)
            .with_context(|| format!("parsing {}", options.path))?;
        ViewState::default().with_document(doc).0
    } else {
        log::info!(
            "scorer {} (timeout {:?})",
            config.server_url,
            config.timeout
        );
        let scorer = HttpScorer::new(&config)?;
        let mut session = Session::new(EvaluationClient::new(scorer, config.timeout));
        session
            .load_str(&text)
            .with_context(|| format!("parsing {}", options.path))?;
        session.settle().await;
        session.state().clone()
    };

    let grid = MapGrid::default();
    if options.json {
        let report = Report::new(&state, grid);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::notice(&state));
        println!("{}", report::legend());
        println!("{}", report::rectangles(&grid, state.rectangles()));
        if !options.offline {
            print!("{}", report::view(state.view()));
        }
    }

    match state.notice() {
        Some(n) if n.level == NoticeLevel::Error => bail!("{}", n.message),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_options() {
        let o = parse_options(args(&["plan.json", "--offline"])).unwrap();
        assert_eq!(o.path, "plan.json");
        assert!(o.offline);
        assert!(!o.json);
    }

    #[test]
    fn test_options_require_one_path() {
        assert!(parse_options(args(&["--json"])).is_err());
        assert!(parse_options(args(&["a.json", "b.json"])).is_err());
        assert!(parse_options(args(&["a.json", "--verbose"])).is_err());
    }
}
