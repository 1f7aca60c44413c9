// Per-session timelines: the session anchor first, then its items by time.

use std::collections::HashMap;

use super::hierarchy::SessionIndex;
use crate::model::EventItem;

/// One slot on a session's ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TimelineEntry<'a> {
    /// The session itself.
    Anchor,
    /// An item, with its position in the layout input.
    Item { index: usize, item: &'a EventItem },
}

/// Items split by owner, each list in input order.
#[derive(Debug, Default)]
pub struct PartitionedItems<'a> {
    by_session: HashMap<&'a str, Vec<(usize, &'a EventItem)>>,
    /// Items whose session key is missing or unknown, in input order.
    pub orphans: Vec<(usize, &'a EventItem)>,
}

impl<'a> PartitionedItems<'a> {
    pub fn items_for(&self, key: &str) -> &[(usize, &'a EventItem)] {
        self.by_session.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn timeline_for(&self, key: &str) -> Vec<TimelineEntry<'a>> {
        build_timeline(self.items_for(key))
    }
}

pub fn partition_items<'a>(items: &'a [EventItem], index: &SessionIndex<'_>) -> PartitionedItems<'a> {
    let mut partitioned = PartitionedItems::default();
    for (i, item) in items.iter().enumerate() {
        match item.session_key.as_deref() {
            Some(key) if index.contains(key) => {
                partitioned.by_session.entry(key).or_default().push((i, item));
            }
            _ => partitioned.orphans.push((i, item)),
        }
    }
    partitioned
}

/// `[Anchor, items...]` with items sorted by timestamp. Ties keep input order.
pub fn build_timeline<'a>(items: &[(usize, &'a EventItem)]) -> Vec<TimelineEntry<'a>> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|(_, item)| item.timestamp);

    let mut timeline = Vec::with_capacity(sorted.len() + 1);
    timeline.push(TimelineEntry::Anchor);
    timeline.extend(sorted.into_iter().map(|(index, item)| TimelineEntry::Item { index, item }));
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventKind, Session};
    use chrono::{TimeZone, Utc};

    fn item(key: &str, secs: i64, id: &str) -> EventItem {
        EventItem::new(key, EventKind::Action, Utc.timestamp_opt(secs, 0).unwrap()).with_id(id)
    }

    fn ids(timeline: &[TimelineEntry<'_>]) -> Vec<String> {
        timeline
            .iter()
            .map(|e| match e {
                TimelineEntry::Anchor => "anchor".to_string(),
                TimelineEntry::Item { item, .. } => item.id.clone().unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_anchor_first_then_sorted_stable() {
        let items = vec![item("s", 30, "late"), item("s", 10, "early-a"), item("s", 10, "early-b"), item("s", 20, "mid")];
        let indexed: Vec<(usize, &EventItem)> = items.iter().enumerate().collect();
        let timeline = build_timeline(&indexed);
        assert_eq!(ids(&timeline), vec!["anchor", "early-a", "early-b", "mid", "late"]);
    }

    #[test]
    fn test_empty_timeline_is_just_anchor() {
        assert_eq!(build_timeline(&[]), vec![TimelineEntry::Anchor]);
    }

    #[test]
    fn test_partition_sends_unknown_sessions_to_orphans() {
        let sessions = vec![Session::new("a")];
        let index = SessionIndex::new(&sessions);
        let mut no_key = item("x", 0, "no-key");
        no_key.session_key = None;
        let items = vec![item("a", 2, "mine"), item("b", 1, "stray"), no_key, item("a", 1, "mine-early")];

        let partitioned = partition_items(&items, &index);
        let orphan_indexes: Vec<usize> = partitioned.orphans.iter().map(|(i, _)| *i).collect();
        assert_eq!(orphan_indexes, vec![1, 2]);
        assert_eq!(partitioned.items_for("a").len(), 2);
        assert!(partitioned.items_for("b").is_empty());
        assert_eq!(ids(&partitioned.timeline_for("a")), vec!["anchor", "mine-early", "mine"]);
    }
}
