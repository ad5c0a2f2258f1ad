use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use gantt_engine::{EngineConfig, HeaderLayout, TimelineEngine, TooltipResult};

// ========================================
// Output
// ========================================

#[derive(Debug, Serialize)]
struct Report {
    layout: HeaderLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    tooltip: Option<TooltipResult>,
}

fn parse_date(value: &str, name: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid {} date '{}', expected YYYY-MM-DD", name, value))
}

fn load_engine() -> Result<TimelineEngine> {
    let config = match std::env::var("GANTT_CONFIG") {
        Ok(path) => EngineConfig::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        Err(_) => EngineConfig::from_default_location().unwrap_or_else(|e| {
            eprintln!("Using built-in configuration ({})", e);
            EngineConfig::default()
        }),
    };
    TimelineEngine::from_config(&config).context("Invalid engine configuration")
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        bail!(
            "Usage: {} <level> <start> <end> [factor] [scroll viewport_width]",
            args.first().map(|s| s.as_str()).unwrap_or("gantt-headers")
        );
    }

    let level = &args[1];
    let start = parse_date(&args[2], "start")?;
    let end = parse_date(&args[3], "end")?;
    let factor: f64 = match args.get(4) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid zoom factor '{}'", raw))?,
        None => 1.0,
    };

    let engine = load_engine()?;
    let layout = engine.header_layout(level, factor, start, end);
    if layout.fallback {
        eprintln!("Unknown zoom level '{}', using '{}'", level, layout.level_id);
    }

    let tooltip = match (args.get(5), args.get(6)) {
        (Some(scroll), Some(width)) => {
            let scroll: f64 = scroll
                .parse()
                .with_context(|| format!("Invalid scroll offset '{}'", scroll))?;
            let width: f64 = width
                .parse()
                .with_context(|| format!("Invalid viewport width '{}'", width))?;
            Some(engine.tooltip(&layout, &engine.tooltip_request(scroll, width)))
        }
        _ => None,
    };

    let report = Report { layout, tooltip };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize header layout")?
    );
    Ok(())
}
