// Fallback ring for items whose session we can't find.
//
// Orphans are laid out one fixed angle apart on a circle just outside the root
// ring, starting at the top. No collision checks: the point is only that every
// item ends up somewhere visible.

use std::f64::consts::FRAC_PI_2;

use tracing::trace;

use super::{item_node_id, NodeData, PlacementPass, Point};
use crate::model::EventItem;

pub(crate) fn place_orphans(pass: &mut PlacementPass<'_>, orphans: &[(usize, &EventItem)]) {
    let radius = pass.cfg.base_radius + pass.cfg.orphan_ring_offset;
    for (slot, &(index, item)) in orphans.iter().enumerate() {
        let angle = -FRAC_PI_2 + slot as f64 * pass.cfg.orphan_angle_step;
        let position = Point::ORIGIN.offset(angle, radius);
        let id = item_node_id(index, item);
        trace!(node = %id, session = ?item.session_key, "placing orphan item");
        let size = pass.cfg.dimensions.for_event(item.kind);
        pass.place_unregistered(id, NodeData::for_event(item, true), position, size);
    }
}
