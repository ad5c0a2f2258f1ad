//! Row geometry shared by the task list and the timeline.
//!
//! The tracker is the single source of truth for per-row vertical offsets.
//! Both surfaces subscribe to it and receive the complete [`RowLayout`] after
//! every successful mutation, so they never compute offsets on their own.
//!
//! ## Layout rules
//! - The first visible row starts at `header_height`
//! - Consecutive visible rows stack: `top(next) = top(row) + height(row)`
//! - A row is visible when every ancestor is visible and expanded
//! - Hidden rows keep their index and nominal height but occupy no space;
//!   their `top` is the top of the next visible row
//!
//! Entities arrive in display order with parents before children. A parent
//! id that is unknown or appears later in the list is treated as a root.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::core::{EntityId, HierarchicalEntity, Notifier, RowMetrics, SubscriptionId};

pub const DEFAULT_HEADER_HEIGHT: f64 = 56.0;
pub const DEFAULT_ROW_HEIGHT: f64 = 32.0;

/// Snapshot of every row's geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowLayout {
    /// Rows by index.
    pub rows: Vec<RowMetrics>,
    pub header_height: f64,
    /// Bottom of the last visible row (header included).
    pub total_height: f64,
    /// Incremented on every mutation.
    pub version: u64,
}

impl RowLayout {
    fn empty(header_height: f64) -> Self {
        Self {
            rows: Vec::new(),
            header_height,
            total_height: header_height,
            version: 0,
        }
    }

    pub fn get(&self, index: usize) -> Option<&RowMetrics> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &RowMetrics> {
        self.rows.iter().filter(|row| row.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    /// Index-keyed view of the rows.
    pub fn to_map(&self) -> BTreeMap<usize, RowMetrics> {
        self.rows.iter().map(|row| (row.index, row.clone())).collect()
    }
}

/// Computes and caches row geometry, notifying subscribers on change.
#[derive(Debug)]
pub struct RowAlignmentTracker {
    default_row_height: f64,
    layout: RowLayout,
    /// Indices of visible rows, ascending (and therefore ascending by `top`).
    visible_index: Vec<usize>,
    entity_index: HashMap<EntityId, usize>,
    notifier: Notifier<RowLayout>,
}

impl RowAlignmentTracker {
    /// Creates an empty tracker. Non-positive sizes fall back to the defaults.
    pub fn new(header_height: f64, default_row_height: f64) -> Self {
        let header_height = if header_height.is_finite() && header_height >= 0.0 {
            header_height
        } else {
            log::warn!("Invalid header height {}, using {}", header_height, DEFAULT_HEADER_HEIGHT);
            DEFAULT_HEADER_HEIGHT
        };
        let default_row_height = sanitize_height(default_row_height).unwrap_or_else(|| {
            log::warn!(
                "Invalid default row height {}, using {}",
                default_row_height,
                DEFAULT_ROW_HEIGHT
            );
            DEFAULT_ROW_HEIGHT
        });
        Self {
            default_row_height,
            layout: RowLayout::empty(header_height),
            visible_index: Vec::new(),
            entity_index: HashMap::new(),
            notifier: Notifier::new(),
        }
    }

    pub fn header_height(&self) -> f64 {
        self.layout.header_height
    }

    pub fn default_row_height(&self) -> f64 {
        self.default_row_height
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> &RowLayout {
        &self.layout
    }

    pub fn total_height(&self) -> f64 {
        self.layout.total_height
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entity_index.get(&id).copied()
    }

    /// Full recompute after a structural change (add, remove, reorder).
    ///
    /// ## Arguments
    /// * `entities` - Rows in display order, parents before children
    /// * `expanded_state` - Expand flags overriding each entity's own flag
    ///
    /// ## Returns
    /// The new snapshot. Subscribers are notified once.
    pub fn calculate_positions<E: HierarchicalEntity>(
        &mut self,
        entities: &[E],
        expanded_state: &HashMap<EntityId, bool>,
    ) -> &RowLayout {
        let mut rows: Vec<RowMetrics> = Vec::with_capacity(entities.len());
        let mut entity_index: HashMap<EntityId, usize> = HashMap::with_capacity(entities.len());

        for (index, entity) in entities.iter().enumerate() {
            let entity_id = entity.entity_id();

            let parent_index = match entity.parent_id() {
                Some(parent_id) => match entity_index.get(&parent_id) {
                    Some(&p) => Some(p),
                    None => {
                        log::warn!(
                            "Row {} (entity {}): parent {} does not precede it, treating as root",
                            index,
                            entity_id,
                            parent_id
                        );
                        None
                    }
                },
                None => None,
            };
            let depth = parent_index.map_or(0, |p| rows[p].depth + 1);
            if let Some(p) = parent_index {
                rows[p].has_children = true;
            }

            let height = entity
                .row_height()
                .and_then(sanitize_height)
                .unwrap_or(self.default_row_height);
            let expanded = expanded_state
                .get(&entity_id)
                .copied()
                .unwrap_or_else(|| entity.is_expanded());

            if entity_index.insert(entity_id, index).is_some() {
                log::warn!("Duplicate entity id {} at row {}", entity_id, index);
            }

            rows.push(RowMetrics {
                index,
                entity_id,
                height,
                top: 0.0,
                visible: true,
                expanded,
                depth,
                parent_index,
                has_children: false,
            });
        }

        self.layout.rows = rows;
        self.entity_index = entity_index;
        self.reflow_from(0);
        self.commit();
        &self.layout
    }

    /// Expands or collapses the row at `parent_index`.
    ///
    /// Only rows after `parent_index` are repositioned. Returns `false`
    /// without notifying when the index is out of range or the row is
    /// already in the requested state.
    pub fn handle_toggle(&mut self, parent_index: usize, expanded: bool) -> bool {
        let Some(row) = self.layout.rows.get_mut(parent_index) else {
            log::warn!(
                "Toggle ignored: row {} out of range ({} rows)",
                parent_index,
                self.layout.rows.len()
            );
            return false;
        };
        if row.expanded == expanded {
            return false;
        }
        row.expanded = expanded;
        self.reflow_from(parent_index + 1);
        self.commit();
        true
    }

    /// [`handle_toggle`](Self::handle_toggle) addressed by entity id.
    pub fn toggle_entity(&mut self, id: EntityId, expanded: bool) -> bool {
        match self.index_of(id) {
            Some(index) => self.handle_toggle(index, expanded),
            None => {
                log::warn!("Toggle ignored: unknown entity {}", id);
                false
            }
        }
    }

    /// Expands or collapses every row that has children, with one notification.
    pub fn set_all_expanded(&mut self, expanded: bool) -> bool {
        let mut changed = false;
        for row in self.layout.rows.iter_mut().filter(|row| row.has_children) {
            if row.expanded != expanded {
                row.expanded = expanded;
                changed = true;
            }
        }
        if changed {
            self.reflow_from(0);
            self.commit();
        }
        changed
    }

    /// Visible row under the content y coordinate `y`, for hit-testing.
    pub fn get_row_at(&self, y: f64) -> Option<&RowMetrics> {
        if !y.is_finite() || y < self.layout.header_height {
            return None;
        }
        let rows = &self.layout.rows;
        let pos = self.visible_index.partition_point(|&i| rows[i].top <= y);
        let candidate = &rows[*self.visible_index.get(pos.checked_sub(1)?)?];
        (y < candidate.bottom()).then_some(candidate)
    }

    /// Indices of visible rows intersecting `[top, top + height)`, for
    /// virtualized rendering.
    pub fn visible_rows_in(&self, top: f64, height: f64) -> &[usize] {
        if !(top.is_finite() && height.is_finite()) || height <= 0.0 {
            return &[];
        }
        let bottom = top + height;
        let rows = &self.layout.rows;
        let first = self
            .visible_index
            .partition_point(|&i| rows[i].bottom() <= top);
        let last = self.visible_index.partition_point(|&i| rows[i].top < bottom);
        if first >= last {
            return &[];
        }
        &self.visible_index[first..last]
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&RowLayout) + Send + 'static,
    {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Recomputes visibility and offsets for rows `first..`, leaving earlier
    /// rows untouched.
    fn reflow_from(&mut self, first: usize) {
        let header_height = self.layout.header_height;
        let rows = &mut self.layout.rows;
        let mut cursor = match first.checked_sub(1).and_then(|i| rows.get(i)) {
            Some(previous) => previous.bottom(),
            None => header_height,
        };

        for i in first..rows.len() {
            let visible = match rows[i].parent_index {
                Some(p) => rows[p].visible && rows[p].expanded,
                None => true,
            };
            let row = &mut rows[i];
            row.visible = visible;
            row.top = cursor;
            cursor += row.rendered_height();
        }
        self.layout.total_height = cursor;

        let keep = self.visible_index.partition_point(|&i| i < first);
        self.visible_index.truncate(keep);
        self.visible_index
            .extend(rows.iter().skip(first).filter(|row| row.visible).map(|row| row.index));
    }

    fn commit(&mut self) {
        self.layout.version += 1;
        self.notifier.notify(&self.layout);
    }
}

impl Default for RowAlignmentTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_HEIGHT, DEFAULT_ROW_HEIGHT)
    }
}

fn sanitize_height(height: f64) -> Option<f64> {
    (height.is_finite() && height > 0.0).then_some(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskNode;
    use std::sync::{Arc, Mutex};

    /// 0 root(1)
    /// 1   child(2)
    /// 2     grandchild(3)
    /// 3   child(4)
    /// 4 root(5)
    fn tree() -> Vec<TaskNode> {
        vec![
            TaskNode::root(1),
            TaskNode::child(2, 1),
            TaskNode::child(3, 2),
            TaskNode::child(4, 1),
            TaskNode::root(5),
        ]
    }

    fn tops(layout: &RowLayout) -> Vec<f64> {
        layout.rows.iter().map(|r| r.top).collect()
    }

    #[test]
    fn test_all_expanded_stacks_rows() {
        let mut tracker = RowAlignmentTracker::new(50.0, 20.0);
        let layout = tracker.calculate_positions(&tree(), &HashMap::new());
        assert_eq!(tops(layout), vec![50.0, 70.0, 90.0, 110.0, 130.0]);
        assert_eq!(layout.total_height, 150.0);
        assert_eq!(layout.rows[2].depth, 2);
        assert!(layout.rows[0].has_children);
        assert!(!layout.rows[4].has_children);
        assert_eq!(layout.rows[3].parent_index, Some(0));
    }

    #[test]
    fn test_expanded_state_map_overrides_entity_flag() {
        let mut tracker = RowAlignmentTracker::new(50.0, 20.0);
        let mut state = HashMap::new();
        state.insert(EntityId(2), false);
        let layout = tracker.calculate_positions(&tree(), &state);
        assert!(!layout.rows[2].visible);
        // hidden row sits at the top of the next visible row
        assert_eq!(layout.rows[2].top, 90.0);
        assert_eq!(layout.rows[3].top, 90.0);
        assert_eq!(layout.total_height, 130.0);
    }

    #[test]
    fn test_collapsed_entity_hides_descendants() {
        let mut nodes = tree();
        nodes[0] = TaskNode::root(1).collapsed();
        let mut tracker = RowAlignmentTracker::new(0.0, 10.0);
        let layout = tracker.calculate_positions(&nodes, &HashMap::new());
        let visible: Vec<bool> = layout.rows.iter().map(|r| r.visible).collect();
        assert_eq!(visible, vec![true, false, false, false, true]);
        assert_eq!(layout.rows[4].top, 10.0);
    }

    #[test]
    fn test_toggle_only_moves_later_rows_and_round_trips() {
        let mut tracker = RowAlignmentTracker::new(50.0, 20.0);
        let before = tracker.calculate_positions(&tree(), &HashMap::new()).clone();

        assert!(tracker.handle_toggle(1, false));
        let collapsed = tracker.snapshot().clone();
        assert_eq!(&tops(&collapsed)[..2], &tops(&before)[..2]);
        assert_eq!(tops(&collapsed), vec![50.0, 70.0, 90.0, 90.0, 110.0]);

        assert!(tracker.handle_toggle(1, true));
        let restored = tracker.snapshot();
        assert_eq!(restored.rows, before.rows);
        assert_eq!(restored.total_height, before.total_height);
        assert_eq!(restored.version, before.version + 2);
    }

    #[test]
    fn test_toggle_no_op_cases_do_not_notify() {
        let mut tracker = RowAlignmentTracker::new(50.0, 20.0);
        tracker.calculate_positions(&tree(), &HashMap::new());
        let count = Arc::new(Mutex::new(0));
        let c = Arc::clone(&count);
        tracker.subscribe(move |_| *c.lock().unwrap() += 1);

        assert!(!tracker.handle_toggle(99, false));
        assert!(!tracker.handle_toggle(0, true));
        assert_eq!(*count.lock().unwrap(), 0);

        assert!(tracker.handle_toggle(0, false));
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_nested_collapse_keeps_inner_state() {
        let mut tracker = RowAlignmentTracker::new(0.0, 10.0);
        tracker.calculate_positions(&tree(), &HashMap::new());
        tracker.handle_toggle(1, false);
        tracker.handle_toggle(0, false);
        tracker.handle_toggle(0, true);
        let layout = tracker.snapshot();
        // row 1 is still collapsed, so its child stays hidden
        assert!(layout.rows[1].visible);
        assert!(!layout.rows[2].visible);
        assert!(layout.rows[3].visible);
    }

    #[test]
    fn test_get_row_at() {
        let mut tracker = RowAlignmentTracker::new(50.0, 20.0);
        tracker.calculate_positions(&tree(), &HashMap::new());
        assert!(tracker.get_row_at(10.0).is_none());
        assert_eq!(tracker.get_row_at(50.0).map(|r| r.index), Some(0));
        assert_eq!(tracker.get_row_at(69.9).map(|r| r.index), Some(0));
        assert_eq!(tracker.get_row_at(70.0).map(|r| r.index), Some(1));
        assert_eq!(tracker.get_row_at(149.0).map(|r| r.index), Some(4));
        assert!(tracker.get_row_at(150.0).is_none());
        assert!(tracker.get_row_at(f64::NAN).is_none());

        tracker.handle_toggle(1, false);
        // hidden row 2 is skipped; row 3 now occupies 90..110
        assert_eq!(tracker.get_row_at(95.0).map(|r| r.index), Some(3));
    }

    #[test]
    fn test_visible_rows_in_viewport() {
        let mut tracker = RowAlignmentTracker::new(0.0, 10.0);
        tracker.calculate_positions(&tree(), &HashMap::new());
        assert_eq!(tracker.visible_rows_in(5.0, 20.0), &[0, 1, 2]);
        assert_eq!(tracker.visible_rows_in(10.0, 10.0), &[1]);
        assert!(tracker.visible_rows_in(100.0, 10.0).is_empty());
        assert!(tracker.visible_rows_in(0.0, 0.0).is_empty());
    }

    #[test]
    fn test_custom_heights_and_orphans() {
        let nodes = vec![
            TaskNode::root(1).with_height(40.0),
            TaskNode::child(2, 99),
            TaskNode::child(3, 1).with_height(-5.0),
        ];
        let mut tracker = RowAlignmentTracker::new(10.0, 20.0);
        let layout = tracker.calculate_positions(&nodes, &HashMap::new());
        assert_eq!(layout.rows[1].parent_index, None);
        assert_eq!(layout.rows[1].depth, 0);
        assert_eq!(layout.rows[2].height, 20.0);
        assert_eq!(tops(layout), vec![10.0, 50.0, 70.0]);
    }

    #[test]
    fn test_set_all_expanded() {
        let mut tracker = RowAlignmentTracker::new(0.0, 10.0);
        tracker.calculate_positions(&tree(), &HashMap::new());
        assert!(tracker.set_all_expanded(false));
        assert_eq!(tracker.snapshot().visible_count(), 2);
        assert!(!tracker.set_all_expanded(false));
        assert!(tracker.set_all_expanded(true));
        assert_eq!(tracker.snapshot().visible_count(), 5);
    }

    #[test]
    fn test_toggle_entity_and_snapshot_delivery() {
        let mut tracker = RowAlignmentTracker::new(0.0, 10.0);
        tracker.calculate_positions(&tree(), &HashMap::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tracker.subscribe(move |layout: &RowLayout| sink.lock().unwrap().push(layout.total_height));

        assert!(tracker.toggle_entity(EntityId(1), false));
        assert!(!tracker.toggle_entity(EntityId(42), false));
        assert_eq!(*seen.lock().unwrap(), vec![20.0]);
        assert_eq!(tracker.snapshot().to_map().len(), 5);
    }
}
