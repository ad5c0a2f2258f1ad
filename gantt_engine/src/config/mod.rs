//! TOML configuration for the layout engine.

pub mod engine_config;

pub use engine_config::{
    BarSettings, EngineConfig, HeaderSettings, RowSettings, TooltipSettings, ZoomSettings,
};
