//! Header label formatting through an injected format resolver.
//!
//! The engine never carries display strings of its own. A [`FormatResolver`]
//! maps semantic keys such as `date.quarter-year` to a pattern, and
//! [`LabelFormatter`] renders that pattern for a period's calendar start.
//!
//! Patterns use chrono's strftime syntax plus four tokens chrono lacks:
//!
//! - `{Q}` quarter number (1–4)
//! - `{W}` week number for the configured week start
//! - `{WY}` week-numbering year
//! - `{DECADE}` first year of the decade

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::core::{Notifier, SubscriptionId, Tier};
use crate::time::{decade_of, quarter_of, week_number, TimeUnit};

/// Source of format patterns, keyed by semantic identifier.
pub trait FormatResolver {
    fn resolve(&self, key: &str) -> Option<String>;
}

impl FormatResolver for HashMap<String, String> {
    fn resolve(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Shared, read-only resolver handle.
pub type SharedResolver = Arc<dyn FormatResolver + Send + Sync>;

/// In-memory resolver.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    patterns: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.patterns.insert(key.into(), pattern.into());
        self
    }

    /// English header patterns.
    pub fn english() -> Self {
        Self::new()
            .with(keys::DAY, "%-d")
            .with(keys::DAY_MONTH, "%-d %b")
            .with(keys::WEEK, "W{W}")
            .with(keys::WEEK_YEAR, "W{W} {WY}")
            .with(keys::MONTH, "%b")
            .with(keys::MONTH_YEAR, "%b %Y")
            .with(keys::QUARTER, "Q{Q}")
            .with(keys::QUARTER_YEAR, "Q{Q} %Y")
            .with(keys::YEAR, "%Y")
            .with(keys::DECADE, "{DECADE}s")
    }
}

impl FormatResolver for StaticResolver {
    fn resolve(&self, key: &str) -> Option<String> {
        self.patterns.get(key).cloned()
    }
}

/// Semantic keys looked up for each unit and tier.
pub mod keys {
    pub const DAY: &str = "date.day";
    pub const DAY_MONTH: &str = "date.day-month";
    pub const WEEK: &str = "date.week";
    pub const WEEK_YEAR: &str = "date.week-year";
    pub const MONTH: &str = "date.month";
    pub const MONTH_YEAR: &str = "date.month-year";
    pub const QUARTER: &str = "date.quarter";
    pub const QUARTER_YEAR: &str = "date.quarter-year";
    pub const YEAR: &str = "date.year";
    pub const DECADE: &str = "date.decade";
}

/// Semantic key for a unit shown on a tier. Primary cells carry the enclosing
/// year or month, secondary cells only their own ordinal.
pub fn format_key(unit: TimeUnit, tier: Tier) -> &'static str {
    match (unit, tier) {
        (TimeUnit::Day, Tier::Secondary) => keys::DAY,
        (TimeUnit::Day, Tier::Primary) => keys::DAY_MONTH,
        (TimeUnit::Week, Tier::Secondary) => keys::WEEK,
        (TimeUnit::Week, Tier::Primary) => keys::WEEK_YEAR,
        (TimeUnit::Month, Tier::Secondary) => keys::MONTH,
        (TimeUnit::Month, Tier::Primary) => keys::MONTH_YEAR,
        (TimeUnit::Quarter, Tier::Secondary) => keys::QUARTER,
        (TimeUnit::Quarter, Tier::Primary) => keys::QUARTER_YEAR,
        (TimeUnit::Year, _) => keys::YEAR,
        (TimeUnit::Decade, _) => keys::DECADE,
    }
}

/// Locale-neutral pattern used when the resolver has no usable entry.
fn fallback_pattern(unit: TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Day | TimeUnit::Week => "%Y-%m-%d",
        TimeUnit::Month => "%Y-%m",
        TimeUnit::Quarter => "%Y-Q{Q}",
        TimeUnit::Year => "%Y",
        TimeUnit::Decade => "{DECADE}",
    }
}

/// Renders period labels from resolver patterns.
#[derive(Clone)]
pub struct LabelFormatter {
    resolver: SharedResolver,
    week_start: Weekday,
}

impl std::fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFormatter")
            .field("week_start", &self.week_start)
            .finish_non_exhaustive()
    }
}

impl LabelFormatter {
    pub fn new(resolver: SharedResolver, week_start: Weekday) -> Self {
        Self {
            resolver,
            week_start,
        }
    }

    /// English patterns, Monday weeks.
    pub fn english() -> Self {
        Self::new(Arc::new(StaticResolver::english()), Weekday::Mon)
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Label for the period of `unit` starting at `period_start`.
    pub fn format(&self, period_start: NaiveDate, unit: TimeUnit, tier: Tier) -> String {
        let key = format_key(unit, tier);
        if let Some(pattern) = self.resolver.resolve(key) {
            if let Some(label) = self.render(&pattern, period_start) {
                return label;
            }
            log::warn!("Malformed format pattern '{}' for key '{}'", pattern, key);
        } else {
            log::debug!("No format pattern for key '{}', using fallback", key);
        }
        self.render(fallback_pattern(unit), period_start)
            .unwrap_or_else(|| period_start.to_string())
    }

    /// Renders `pattern` for `date`; `None` if chrono rejects the pattern.
    pub fn render(&self, pattern: &str, date: NaiveDate) -> Option<String> {
        let expanded = self.expand_tokens(pattern, date);
        let items: Vec<Item> = StrftimeItems::new(&expanded).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return None;
        }
        let mut out = String::new();
        // Time-of-day specifiers fail at write time for a bare date.
        write!(out, "{}", date.format_with_items(items.iter())).ok()?;
        Some(out)
    }

    fn expand_tokens(&self, pattern: &str, date: NaiveDate) -> String {
        if !pattern.contains('{') {
            return pattern.to_string();
        }
        let (week, week_year) = week_number(date, self.week_start);
        pattern
            .replace("{Q}", &quarter_of(date).to_string())
            .replace("{WY}", &week_year.to_string())
            .replace("{W}", &week.to_string())
            .replace("{DECADE}", &decade_of(date).to_string())
    }
}

impl Default for LabelFormatter {
    fn default() -> Self {
        Self::english()
    }
}

// ============ Language switching ============

/// Payload delivered to catalog subscribers when the active language changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageChange {
    pub previous: String,
    pub current: String,
}

/// Resolvers per language with one active entry.
///
/// Surfaces that render labels subscribe directly and rebuild their headers
/// on change, instead of receiving the language through their parents.
pub struct FormatCatalog {
    resolvers: HashMap<String, SharedResolver>,
    active: String,
    notifier: Notifier<LanguageChange>,
}

impl std::fmt::Debug for FormatCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut languages: Vec<&String> = self.resolvers.keys().collect();
        languages.sort();
        f.debug_struct("FormatCatalog")
            .field("languages", &languages)
            .field("active", &self.active)
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl FormatCatalog {
    /// Creates a catalog whose only (and active) language is `language`.
    pub fn new(language: impl Into<String>, resolver: SharedResolver) -> Self {
        let language = language.into();
        let mut resolvers = HashMap::new();
        resolvers.insert(language.clone(), resolver);
        Self {
            resolvers,
            active: language,
            notifier: Notifier::new(),
        }
    }

    /// Catalog with the English patterns registered as `en`.
    pub fn english() -> Self {
        Self::new("en", Arc::new(StaticResolver::english()))
    }

    /// Adds or replaces a language. Does not change the active language.
    pub fn register(&mut self, language: impl Into<String>, resolver: SharedResolver) {
        self.resolvers.insert(language.into(), resolver);
    }

    pub fn active_language(&self) -> &str {
        &self.active
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.resolvers.contains_key(language)
    }

    /// Switches the active language and notifies subscribers.
    ///
    /// Returns `false` (and notifies nobody) for an unknown language or when
    /// `language` is already active.
    pub fn set_language(&mut self, language: &str) -> bool {
        if language == self.active {
            return false;
        }
        if !self.resolvers.contains_key(language) {
            log::warn!("Unknown language '{}', keeping '{}'", language, self.active);
            return false;
        }
        let change = LanguageChange {
            previous: std::mem::replace(&mut self.active, language.to_string()),
            current: language.to_string(),
        };
        log::info!("Header language changed from '{}' to '{}'", change.previous, change.current);
        self.notifier.notify(&change);
        true
    }

    /// Resolver of the active language.
    pub fn resolver(&self) -> SharedResolver {
        // The active language is always registered.
        Arc::clone(&self.resolvers[&self.active])
    }

    /// Formatter bound to the active language.
    pub fn formatter(&self, week_start: Weekday) -> LabelFormatter {
        LabelFormatter::new(self.resolver(), week_start)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&LanguageChange) + Send + 'static,
    {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}
