// Radial session layout.
//
// Places a forest of sessions and their event timelines around a fixed origin:
// - Root sessions sit on a circle, evenly spaced, starting at the top
// - Spawned sessions fan out next to their parent, spread by sibling count
// - Each session's timeline radiates outward along the session's own ray
// - Items that belong to no known session go on a fallback ring
//
// Collision handling is local and bounded: every candidate is checked against
// what was placed before it and nudged outward a limited number of times.
// A candidate that still collides after that is accepted and flagged.
//
// Submodules:
// - collision: overlap test, placement registry, bounded ray retry
// - hierarchy: spawn depth resolution
// - timeline: per-session item ordering, orphan detection
// - radial_placement: depth-0 sessions + timeline radiation
// - child_placement: depth >= 1 sessions
// - orphan_placement: fallback ring
//
// The pass is stateless: everything lives in a PlacementPass local to
// layout_sessions, so concurrent or repeated calls never share state.

use std::collections::{HashMap, HashSet};
use std::f64::consts::FRAC_PI_3;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::model::{EventItem, EventKind, LayoutInput, SessionKind};

pub mod collision;
pub mod hierarchy;
pub mod timeline;
mod child_placement;
mod edges;
mod orphan_placement;
mod radial_placement;

use collision::PlacementRegistry;
use hierarchy::{group_by_depth, SessionIndex};
use timeline::partition_items;

pub use child_placement::{sibling_offset, sibling_spread};
pub use edges::{EdgeKind, LayoutEdge};
pub use radial_placement::root_angle;

/// Node id of the fixed origin.
pub const ORIGIN_ID: &str = "origin";

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Move `distance` along `angle` (radians, screen coordinates: y grows down).
    pub fn offset(self, angle: f64, distance: f64) -> Point {
        Point {
            x: self.x + distance * angle.cos(),
            y: self.y + distance * angle.sin(),
        }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Box with its top-left corner at `p`.
    pub fn at(p: Point, size: Size) -> Rect {
        Rect { x: p.x, y: p.y, w: size.w, h: size.h }
    }

    pub fn right(&self) -> f64 { self.x + self.w }
    pub fn bottom(&self) -> f64 { self.y + self.h }

    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect { x: x0, y: y0, w: x1 - x0, h: y1 - y0 }
    }
}

/// Bounding box per node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dimensions {
    pub origin: Size,
    pub session: Size,
    pub scheduled_session: Size,
    pub action: Size,
    pub exec: Size,
    /// Used for item kinds we have no entry for.
    pub fallback: Size,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            origin: Size::new(120.0, 120.0),
            session: Size::new(280.0, 140.0),
            scheduled_session: Size::new(280.0, 140.0),
            action: Size::new(280.0, 100.0),
            exec: Size::new(300.0, 120.0),
            fallback: Size::new(240.0, 100.0),
        }
    }
}

impl Dimensions {
    pub fn for_session(&self, kind: SessionKind) -> Size {
        match kind {
            SessionKind::Ordinary => self.session,
            SessionKind::Scheduled => self.scheduled_session,
        }
    }

    pub fn for_event(&self, kind: EventKind) -> Size {
        match kind {
            EventKind::Action => self.action,
            EventKind::Exec => self.exec,
            EventKind::Unknown => self.fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Distance from the origin to each root session.
    pub base_radius: f64,
    /// Distance from a parent session to its spawned children.
    pub child_offset: f64,
    /// Gap between consecutive timeline entries along a ray.
    pub item_spacing: f64,
    /// Extra clearance required between any two boxes.
    pub padding: f64,
    /// Radial nudge applied per collision retry on a timeline.
    pub radius_step: f64,
    /// Upper bound on the total radial nudge for one timeline entry.
    pub max_radius_adjustment: f64,
    /// Nudge applied per collision retry when placing a child session.
    pub offset_step: f64,
    /// Upper bound on the total nudge for one child session.
    pub max_offset_adjustment: f64,
    /// Smallest fan (radians) used for any sibling group.
    pub min_spread_angle: f64,
    /// Angle (radians) reserved per sibling before the minimum kicks in.
    pub per_sibling_min_angle: f64,
    /// How far beyond `base_radius` the orphan ring sits.
    pub orphan_ring_offset: f64,
    /// Angle (radians) between consecutive orphans.
    pub orphan_angle_step: f64,
    pub dimensions: Dimensions,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_radius: 500.0,
            child_offset: 400.0,
            item_spacing: 160.0,
            padding: 20.0,
            radius_step: 40.0,
            max_radius_adjustment: 400.0,
            offset_step: 40.0,
            max_offset_adjustment: 400.0,
            min_spread_angle: FRAC_PI_3,
            per_sibling_min_angle: 0.4,
            orphan_ring_offset: 300.0,
            orphan_angle_step: 0.2,
            dimensions: Dimensions::default(),
        }
    }
}

impl LayoutConfig {
    /// Reject values that would make the retry loops or geometry meaningless.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("baseRadius", self.base_radius),
            ("childOffset", self.child_offset),
            ("itemSpacing", self.item_spacing),
            ("padding", self.padding),
            ("maxRadiusAdjustment", self.max_radius_adjustment),
            ("maxOffsetAdjustment", self.max_offset_adjustment),
            ("minSpreadAngle", self.min_spread_angle),
            ("perSiblingMinAngle", self.per_sibling_min_angle),
            ("orphanRingOffset", self.orphan_ring_offset),
            ("orphanAngleStep", self.orphan_angle_step),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() {
                return Err(LayoutError::InvalidConfig { field, reason: "must be finite" });
            }
            if value < 0.0 {
                return Err(LayoutError::InvalidConfig { field, reason: "must not be negative" });
            }
        }

        for (field, value) in [("radiusStep", self.radius_step), ("offsetStep", self.offset_step)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidConfig { field, reason: "must be a positive number" });
            }
        }

        let budgets = [
            ("maxRadiusAdjustment", self.max_radius_adjustment / self.radius_step),
            ("maxOffsetAdjustment", self.max_offset_adjustment / self.offset_step),
        ];
        for (field, attempts) in budgets {
            if attempts > collision::MAX_RETRY_ATTEMPTS as f64 {
                return Err(LayoutError::InvalidConfig { field, reason: "allows too many retry steps" });
            }
        }

        let d = &self.dimensions;
        let sizes = [
            ("dimensions.origin", d.origin),
            ("dimensions.session", d.session),
            ("dimensions.scheduledSession", d.scheduled_session),
            ("dimensions.action", d.action),
            ("dimensions.exec", d.exec),
            ("dimensions.fallback", d.fallback),
        ];
        for (field, size) in sizes {
            let ok = size.w.is_finite() && size.h.is_finite() && size.w > 0.0 && size.h > 0.0;
            if !ok {
                return Err(LayoutError::InvalidConfig { field, reason: "must have positive width and height" });
            }
        }
        Ok(())
    }
}

/// Payload of a session anchor node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionNode {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub depth: usize,
    /// Direction of this session's ray, in radians.
    pub angle: f64,
    pub kind: SessionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// Payload of an event item node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// True when the owning session could not be resolved.
    pub orphan: bool,
}

impl EventNode {
    fn from_item(item: &EventItem, orphan: bool) -> Self {
        Self {
            session_key: item.session_key.clone(),
            timestamp: item.timestamp,
            orphan,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeData {
    Origin,
    Session(SessionNode),
    Action(EventNode),
    Exec(EventNode),
    Other(EventNode),
}

impl NodeData {
    pub fn for_event(item: &EventItem, orphan: bool) -> Self {
        let node = EventNode::from_item(item, orphan);
        match item.kind {
            EventKind::Action => NodeData::Action(node),
            EventKind::Exec => NodeData::Exec(node),
            EventKind::Unknown => NodeData::Other(node),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub data: NodeData,
    /// Top-left corner of `bounds`.
    pub position: Point,
    pub bounds: Rect,
    /// Accepted after the retry budget ran out while still colliding.
    pub overlapping: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Origin first, then each session followed by its timeline, then orphans.
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<LayoutEdge>,
    /// Union of all node boxes.
    pub bounds: Rect,
}

impl LayoutResult {
    pub fn node(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

pub fn session_node_id(key: &str) -> String {
    format!("session:{key}")
}

/// `item:{id}`, or `item#{index}` (position in the input) for items without an id.
/// Both forms stay clear of session and origin ids.
pub fn item_node_id(index: usize, item: &EventItem) -> String {
    match &item.id {
        Some(id) => format!("item:{id}"),
        None => format!("item#{index}"),
    }
}

/// Where a session ended up; children are placed relative to this.
#[derive(Debug, Copy, Clone)]
pub(crate) struct SessionPlacement {
    pub position: Point,
    pub angle: f64,
}

/// Mutable state of one layout call.
pub(crate) struct PlacementPass<'a> {
    pub cfg: &'a LayoutConfig,
    pub registry: PlacementRegistry,
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<LayoutEdge>,
    pub placed_sessions: HashMap<String, SessionPlacement>,
    used_ids: HashSet<String>,
}

impl<'a> PlacementPass<'a> {
    fn new(cfg: &'a LayoutConfig) -> Self {
        Self {
            cfg,
            registry: PlacementRegistry::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            placed_sessions: HashMap::new(),
            used_ids: HashSet::new(),
        }
    }

    /// Reserve `id`, suffixing `#2`, `#3`, ... when it is already taken.
    fn claim_id(&mut self, id: String) -> String {
        let mut unique = id.clone();
        let mut n = 2;
        while self.used_ids.contains(&unique) {
            unique = format!("{id}#{n}");
            n += 1;
        }
        self.used_ids.insert(unique.clone());
        unique
    }

    /// Record a node and make it visible to later collision checks.
    /// Returns the id the node was stored under.
    pub fn place(&mut self, id: String, data: NodeData, position: Point, size: Size, overlapping: bool) -> String {
        let id = self.claim_id(id);
        let bounds = Rect::at(position, size);
        self.registry.insert(bounds);
        self.nodes.push(PlacedNode { id: id.clone(), data, position, bounds, overlapping });
        id
    }

    /// Record a node without registering it (origin, orphans).
    pub fn place_unregistered(&mut self, id: String, data: NodeData, position: Point, size: Size) -> String {
        let id = self.claim_id(id);
        let bounds = Rect::at(position, size);
        self.nodes.push(PlacedNode { id: id.clone(), data, position, bounds, overlapping: false });
        id
    }

    fn finish(self) -> LayoutResult {
        let bounds = self
            .nodes
            .iter()
            .map(|n| n.bounds)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or(Rect { x: 0.0, y: 0.0, w: 0.0, h: 0.0 });
        LayoutResult { nodes: self.nodes, edges: self.edges, bounds }
    }
}

/// Lay out every session and item. Never fails and never drops an input entity.
pub fn layout_sessions(input: &LayoutInput, cfg: &LayoutConfig) -> LayoutResult {
    let index = SessionIndex::new(&input.sessions);
    let depths = group_by_depth(&index);
    let items = partition_items(&input.items, &index);

    let mut pass = PlacementPass::new(cfg);
    pass.place_unregistered(
        ORIGIN_ID.to_string(),
        NodeData::Origin,
        Point::ORIGIN,
        cfg.dimensions.origin,
    );

    if let Some(roots) = depths.get(&0) {
        radial_placement::place_roots(&mut pass, roots, &items);
    }
    child_placement::place_children(&mut pass, &depths, &items);
    orphan_placement::place_orphans(&mut pass, &items.orphans);

    let overlapping = pass.nodes.iter().filter(|n| n.overlapping).count();
    debug!(
        sessions = index.len(),
        items = input.items.len(),
        orphans = items.orphans.len(),
        max_depth = depths.keys().next_back().copied().unwrap_or(0),
        overlapping,
        "layout pass complete"
    );

    pass.finish()
}
