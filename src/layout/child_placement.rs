// Spawned session placement.
//
// Depth by depth, each parent's children fan out around the parent's own ray.
// The fan widens with the number of siblings so large families don't pile up,
// and a child that lands on something already placed is pushed further from
// its parent in fixed steps.

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::FRAC_PI_2;

use tracing::warn;

use super::collision::settle_along_ray;
use super::radial_placement::radiate_timeline;
use super::timeline::PartitionedItems;
use super::{session_node_id, EdgeKind, LayoutConfig, LayoutEdge, PlacementPass, Point, SessionPlacement};
use crate::model::Session;

/// Total fan angle for a family of `count` siblings.
pub fn sibling_spread(count: usize, cfg: &LayoutConfig) -> f64 {
    cfg.min_spread_angle.max(cfg.per_sibling_min_angle * count as f64)
}

/// Offset of sibling `i` from the parent's angle, centred on zero.
pub fn sibling_offset(i: usize, count: usize, spread: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (i as f64 - (count as f64 - 1.0) / 2.0) * (spread / count as f64)
}

/// Children at one depth grouped by parent, both in encounter order.
fn families<'a>(sessions: &[&'a Session]) -> Vec<(&'a str, Vec<&'a Session>)> {
    let mut out: Vec<(&'a str, Vec<&'a Session>)> = Vec::new();
    let mut slot: HashMap<&'a str, usize> = HashMap::new();
    for &session in sessions {
        let parent = session.spawned_by.as_deref().unwrap_or_default();
        match slot.get(parent) {
            Some(&i) => out[i].1.push(session),
            None => {
                slot.insert(parent, out.len());
                out.push((parent, vec![session]));
            }
        }
    }
    out
}

pub(crate) fn place_children(
    pass: &mut PlacementPass<'_>,
    depths: &BTreeMap<usize, Vec<&Session>>,
    items: &PartitionedItems<'_>,
) {
    for (&depth, sessions) in depths.range(1..) {
        for (parent_key, children) in families(sessions) {
            let parent = match pass.placed_sessions.get(parent_key) {
                Some(p) => *p,
                None => {
                    // Depth resolution guarantees the parent sits one level up.
                    warn!(parent = %parent_key, depth, "parent not placed, anchoring children at origin");
                    SessionPlacement { position: Point::ORIGIN, angle: -FRAC_PI_2 }
                }
            };

            let count = children.len();
            let spread = sibling_spread(count, pass.cfg);
            for (i, child) in children.into_iter().enumerate() {
                let angle = parent.angle + sibling_offset(i, count, spread);
                let size = pass.cfg.dimensions.for_session(child.kind);
                let settled = settle_along_ray(
                    parent.position,
                    angle,
                    pass.cfg.child_offset,
                    size,
                    &pass.registry,
                    pass.cfg.padding,
                    pass.cfg.offset_step,
                    pass.cfg.max_offset_adjustment,
                );

                // Two budgets apply to a child anchor: the offset retry above
                // only picks the start, then radiate_timeline re-checks the
                // anchor and may push it further out with the radius budget.
                let timeline = items.timeline_for(&child.key);
                let anchor = radiate_timeline(pass, child, Some(parent_key), depth, settled.position, angle, &timeline);
                pass.edges.push(LayoutEdge::new(
                    session_node_id(parent_key),
                    session_node_id(&child.key),
                    EdgeKind::Spawn,
                ));
                pass.placed_sessions.insert(child.key.clone(), SessionPlacement { position: anchor, angle });
            }
        }
    }
}
