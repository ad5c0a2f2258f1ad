//! Core value types shared by every layout component.
//!
//! This module defines the header periods, row metrics and tooltip records
//! exchanged with the rendering surfaces, the engine error type, and the
//! subscriber list used for change notifications.

pub mod domain;
pub mod error;
pub mod notify;

pub use domain::{
    EntityId, HeaderPeriod, HierarchicalEntity, RowMetrics, TaskNode, Tier, TooltipRequest,
    TooltipResult, DEFAULT_HIDDEN_THRESHOLD,
};
pub use error::{LayoutError, LayoutResult};
pub use notify::{Notifier, SubscriptionId};
