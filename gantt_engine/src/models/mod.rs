//! Static configuration records.

pub mod zoom;

pub use zoom::{
    builtin_levels, HeaderPattern, ZoomLevelConfig, DEFAULT_LEVEL_ID, DEFAULT_MAX_FACTOR,
    DEFAULT_MIN_FACTOR, MIN_DAY_WIDTH,
};
