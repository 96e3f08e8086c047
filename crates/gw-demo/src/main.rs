//! Example searches over small discretized grids.
//!
//! Usage: `gw-demo [local|paraboloid]`. Search settings other than the trial
//! count can be supplied as JSON through the file named by `GRIDWALK_SETTINGS`.

mod models;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use gw_optimizer::SearchSettings;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = load_settings()?;
    let model = std::env::args().nth(1).unwrap_or_else(|| "local".to_string());

    match model.as_str() {
        "local" => models::local_minima(&settings),
        "paraboloid" => models::paraboloid(&settings),
        other => bail!("unknown model '{other}', expected 'local' or 'paraboloid'"),
    }
}

fn load_settings() -> anyhow::Result<SearchSettings> {
    let Ok(path) = std::env::var("GRIDWALK_SETTINGS") else {
        return Ok(SearchSettings::default());
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading search settings from {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing search settings in {path}"))
}
