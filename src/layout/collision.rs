// Overlap detection for the placement pass.
//
// The registry is a flat, append-only list: every query scans everything placed
// so far. That is O(n) per query and O(n^2) per layout, which is fine for the
// tens to low hundreds of nodes a session graph holds.

use super::{Point, Rect, Size};

/// Hard ceiling on retries for a single placement, whatever the config says.
pub const MAX_RETRY_ATTEMPTS: usize = 10_000;

/// True unless the boxes are separated by more than `padding` on some axis.
pub fn overlaps(a: &Rect, b: &Rect, padding: f64) -> bool {
    !(a.right() + padding < b.x
        || b.right() + padding < a.x
        || a.bottom() + padding < b.y
        || b.bottom() + padding < a.y)
}

/// Boxes placed so far in the current layout call.
#[derive(Debug, Clone, Default)]
pub struct PlacementRegistry {
    placed: Vec<Rect>,
}

impl PlacementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rect: Rect) {
        self.placed.push(rect);
    }

    /// Check a candidate against every earlier placement.
    pub fn collides(&self, rect: &Rect, padding: f64) -> bool {
        self.placed.iter().any(|placed| overlaps(rect, placed, padding))
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}

/// Would a box of `size` with its corner at `position` hit anything placed?
pub fn collides(position: Point, size: Size, registry: &PlacementRegistry, padding: f64) -> bool {
    registry.collides(&Rect::at(position, size), padding)
}

/// Outcome of a bounded walk along a ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Settled {
    pub position: Point,
    /// Distance added on top of the requested one.
    pub extra: f64,
    /// Still colliding when the budget ran out.
    pub overlapping: bool,
}

/// Start `distance` along `angle` from `from` and step outward by `step` until
/// the box is clear or the next step would exceed `max_adjustment`. The last
/// candidate is kept either way. Never more than [`MAX_RETRY_ATTEMPTS`] retries.
#[allow(clippy::too_many_arguments)]
pub fn settle_along_ray(
    from: Point,
    angle: f64,
    distance: f64,
    size: Size,
    registry: &PlacementRegistry,
    padding: f64,
    step: f64,
    max_adjustment: f64,
) -> Settled {
    let attempts = if step > 0.0 && max_adjustment.is_finite() && max_adjustment > 0.0 {
        ((max_adjustment / step).floor() as usize).min(MAX_RETRY_ATTEMPTS)
    } else {
        0
    };

    let mut settled = Settled { position: from.offset(angle, distance), extra: 0.0, overlapping: false };
    for attempt in 0..=attempts {
        let extra = step * attempt as f64;
        let candidate = from.offset(angle, distance + extra);
        settled = Settled { position: candidate, extra, overlapping: true };
        if !collides(candidate, size, registry, padding) {
            settled.overlapping = false;
            break;
        }
    }
    settled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect { x, y, w, h }
    }

    #[test]
    fn test_overlaps_respects_padding() {
        let a = rect(0.0, 0.0, 100.0, 100.0);
        // 30px gap on x
        let b = rect(130.0, 0.0, 100.0, 100.0);
        assert!(!overlaps(&a, &b, 20.0));
        assert!(overlaps(&a, &b, 40.0));
        // symmetric
        assert!(!overlaps(&b, &a, 20.0));
        assert!(overlaps(&b, &a, 40.0));
    }

    #[test]
    fn test_overlaps_needs_separation_on_one_axis_only() {
        let a = rect(0.0, 0.0, 100.0, 100.0);
        // Same column, far below.
        let b = rect(50.0, 500.0, 100.0, 100.0);
        assert!(!overlaps(&a, &b, 20.0));
        // Touching edges count as overlapping once padding applies.
        let c = rect(100.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &c, 0.0) && overlaps(&a, &c, 1.0));
    }

    #[test]
    fn test_registry_collides_with_any() {
        let mut registry = PlacementRegistry::new();
        assert!(registry.is_empty());
        registry.insert(rect(0.0, 0.0, 50.0, 50.0));
        registry.insert(rect(1000.0, 1000.0, 50.0, 50.0));
        assert_eq!(registry.len(), 2);

        assert!(collides(Point::new(1020.0, 1020.0), Size::new(10.0, 10.0), &registry, 0.0));
        assert!(!collides(Point::new(500.0, 500.0), Size::new(10.0, 10.0), &registry, 20.0));
    }

    #[test]
    fn test_settle_returns_base_candidate_when_clear() {
        let registry = PlacementRegistry::new();
        let settled = settle_along_ray(
            Point::ORIGIN, 0.0, 100.0, Size::new(10.0, 10.0), &registry, 20.0, 40.0, 400.0,
        );
        assert_eq!(settled.extra, 0.0);
        assert!(!settled.overlapping);
        assert!((settled.position.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_settle_bumps_until_clear() {
        let mut registry = PlacementRegistry::new();
        registry.insert(rect(0.0, -50.0, 100.0, 100.0));
        let size = Size::new(50.0, 50.0);
        let settled = settle_along_ray(Point::ORIGIN, 0.0, 0.0, size, &registry, 20.0, 40.0, 400.0);

        // Needs x > 120: 0, 40, 80, 120 collide, 160 is clear.
        assert!(!settled.overlapping);
        assert_eq!(settled.extra, 160.0);
        assert!(!overlaps(&Rect::at(settled.position, size), &rect(0.0, -50.0, 100.0, 100.0), 20.0));
    }

    #[test]
    fn test_settle_accepts_last_candidate_when_budget_exhausted() {
        let mut registry = PlacementRegistry::new();
        registry.insert(rect(-5000.0, -5000.0, 10000.0, 10000.0));
        let settled = settle_along_ray(
            Point::ORIGIN, 0.0, 0.0, Size::new(10.0, 10.0), &registry, 20.0, 40.0, 400.0,
        );
        assert!(settled.overlapping);
        assert_eq!(settled.extra, 400.0);
        assert!((settled.position.x - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_settle_caps_attempts_for_tiny_steps() {
        let mut registry = PlacementRegistry::new();
        registry.insert(rect(-5000.0, -5000.0, 10000.0, 10000.0));
        let step = 1e-9;
        let settled = settle_along_ray(
            Point::ORIGIN, 0.0, 0.0, Size::new(10.0, 10.0), &registry, 20.0, step, 1e9,
        );
        assert!(settled.overlapping);
        assert_eq!(settled.extra, step * MAX_RETRY_ATTEMPTS as f64);
    }

    #[test]
    fn test_settle_with_zero_step_tries_once() {
        let mut registry = PlacementRegistry::new();
        registry.insert(rect(0.0, 0.0, 10.0, 10.0));
        let settled = settle_along_ray(
            Point::ORIGIN, 0.0, 0.0, Size::new(10.0, 10.0), &registry, 0.0, 0.0, 400.0,
        );
        assert!(settled.overlapping);
        assert_eq!(settled.extra, 0.0);
    }
}
