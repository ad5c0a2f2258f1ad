//! Integration tests for loading engine configuration from disk.

use std::fs;

use chrono::{NaiveDate, Weekday};
use gantt_engine::{EngineConfig, LayoutError, TimelineEngine, Tier};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("gantt.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_custom_zoom_table_drives_engine() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [zoom]
        default_level = "sprint"

        [[zoom.levels]]
        id = "sprint"
        base_day_width = 16.0
        primary = "month"
        secondary = "week"
        description = "Two-week planning view"

        [[zoom.levels]]
        id = "roadmap"
        base_day_width = 2.0
        primary = "year"
        secondary = "quarter"
        min_factor = 1.0
        max_factor = 1.0

        [header]
        week_start = "sun"

        [rows]
        header_height = 64.0
        default_row_height = 28.0
        "#,
    );

    let config = EngineConfig::from_file(&path).unwrap();
    let engine = TimelineEngine::from_config(&config).unwrap();
    assert_eq!(engine.week_start(), Weekday::Sun);
    assert_eq!(engine.rows().header_height(), 64.0);
    assert_eq!(engine.rows().default_row_height(), 28.0);

    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

    let layout = engine.header_layout("roadmap", 3.0, start, end);
    assert_eq!(layout.day_width, 2.0);

    let layout = engine.header_layout("day", 1.0, start, end);
    assert!(layout.fallback);
    assert_eq!(layout.level_id, "sprint");
    // Sunday weeks: the first cell starts on 2024-12-29
    assert_eq!(
        layout.secondary[0].period_start,
        NaiveDate::from_ymd_opt(2024, 12, 29).unwrap()
    );
}

#[test]
fn test_tooltip_section() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[tooltip]\nthreshold = 0.25\ntier = \"secondary\"\nright_arrow = \" >>\"\n",
    );
    let config = EngineConfig::from_file(&path).unwrap();
    assert_eq!(config.tooltip.tier, Tier::Secondary);

    let engine = TimelineEngine::from_config(&config).unwrap();
    let request = engine.tooltip_request(0.0, 60.0);
    assert_eq!(request.threshold, 0.25);
}

#[test]
fn test_invalid_files_are_rejected() {
    let dir = TempDir::new().unwrap();

    let path = write_config(&dir, "[zoom\nbroken");
    assert!(matches!(
        EngineConfig::from_file(&path),
        Err(LayoutError::Configuration(_))
    ));

    let path = write_config(
        &dir,
        r#"
        [zoom]
        default_level = "x"

        [[zoom.levels]]
        id = "x"
        base_day_width = -1.0
        primary = "month"
        secondary = "day"
        "#,
    );
    let err = EngineConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("base_day_width"), "{}", err);
}
