// Root session placement ("orbit" ring).
//
// Depth-0 sessions are spread evenly around the origin, first one straight up,
// then clockwise. Every session, root or child, then radiates its timeline
// outward along its own ray:
//
//   origin ---- anchor -- item -- item -- ...
//
// Each timeline slot is checked against everything placed before it and pushed
// further out in fixed steps while it collides, up to a bounded total.

use std::f64::consts::{FRAC_PI_2, TAU};

use tracing::debug;

use super::collision::settle_along_ray;
use super::timeline::{PartitionedItems, TimelineEntry};
use super::{
    item_node_id, session_node_id, EdgeKind, LayoutEdge, NodeData, PlacementPass, Point,
    SessionNode, SessionPlacement, ORIGIN_ID,
};
use crate::model::Session;

/// Ray of the `i`-th of `n` root sessions: top first, clockwise.
pub fn root_angle(i: usize, n: usize) -> f64 {
    i as f64 * (TAU / n as f64) - FRAC_PI_2
}

pub(crate) fn place_roots(pass: &mut PlacementPass<'_>, roots: &[&Session], items: &PartitionedItems<'_>) {
    let n = roots.len();
    for (i, session) in roots.iter().enumerate() {
        let angle = root_angle(i, n);
        let start = Point::ORIGIN.offset(angle, pass.cfg.base_radius);
        let timeline = items.timeline_for(&session.key);

        let anchor = radiate_timeline(pass, session, None, 0, start, angle, &timeline);
        pass.edges.push(LayoutEdge::new(ORIGIN_ID, session_node_id(&session.key), EdgeKind::Root));
        pass.placed_sessions.insert(session.key.clone(), SessionPlacement { position: anchor, angle });
    }
}

/// Place a session's timeline along `angle`, starting at `start`.
/// Returns where the anchor ended up.
pub(crate) fn radiate_timeline(
    pass: &mut PlacementPass<'_>,
    session: &Session,
    parent: Option<&str>,
    depth: usize,
    start: Point,
    angle: f64,
    timeline: &[TimelineEntry<'_>],
) -> Point {
    let cfg = pass.cfg;
    let session_id = session_node_id(&session.key);
    let mut anchor = start;
    let mut current_radius = 0.0;
    let mut previous: Option<String> = None;

    for entry in timeline {
        let (id, data, size) = match entry {
            TimelineEntry::Anchor => (
                session_id.clone(),
                NodeData::Session(SessionNode {
                    key: session.key.clone(),
                    parent: parent.map(str::to_string),
                    depth,
                    angle,
                    kind: session.kind,
                    last_activity_at: session.last_activity_at,
                }),
                cfg.dimensions.for_session(session.kind),
            ),
            TimelineEntry::Item { index, item } => (
                item_node_id(*index, item),
                NodeData::for_event(item, false),
                cfg.dimensions.for_event(item.kind),
            ),
        };

        let settled = settle_along_ray(
            start,
            angle,
            current_radius,
            size,
            &pass.registry,
            cfg.padding,
            cfg.radius_step,
            cfg.max_radius_adjustment,
        );
        if settled.overlapping {
            debug!(node = %id, session = %session.key, "retry budget exhausted, accepting overlap");
        }
        if matches!(entry, TimelineEntry::Anchor) {
            anchor = settled.position;
        }

        let id = pass.place(id, data, settled.position, size, settled.overlapping);
        if let Some(prev) = previous.take() {
            pass.edges.push(LayoutEdge::new(prev, id.clone(), EdgeKind::Timeline));
        }
        previous = Some(id);

        current_radius += size.h + cfg.item_spacing + settled.extra;
    }

    anchor
}
