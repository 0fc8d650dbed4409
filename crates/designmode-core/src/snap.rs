//! Snap geometry for dragged containers.
//!
//! All functions are pure: the controller hands in the proposed rectangle of
//! the moving container, the rectangles of its eligible siblings and the
//! screen box, and gets the adjusted position back.

use kurbo::{Point, Rect, Size};

/// Distance within which an edge attracts a dragged container.
pub const SNAP_THRESHOLD: f64 = 16.0;

/// Modifier state relevant to snapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapModifiers {
    /// Grid snap; overrides sibling and edge snapping entirely.
    pub precision: bool,
    /// Free movement; no snapping at all.
    pub free: bool,
}

/// Snap a coordinate to the nearest grid line.
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size
}

/// Apply the full snapping policy to a proposed top-left position.
///
/// `candidates` are the same-category, interactable, not-held siblings.
/// Precedence: precision modifier, then free modifier, then sibling/edge
/// snapping. Containers whose origin is not their top-left (`anchored`) skip
/// sibling and edge snapping since their rectangles do not line up with the
/// position being written.
pub fn snap_position(
    proposed: Rect,
    candidates: &[Rect],
    screen: Size,
    modifiers: SnapModifiers,
    grid_size: f64,
    anchored: bool,
) -> Point {
    if modifiers.precision {
        if grid_size > 0.0 {
            return Point::new(
                snap_to_grid(proposed.x0, grid_size),
                snap_to_grid(proposed.y0, grid_size),
            );
        }
        return proposed.origin();
    }
    if modifiers.free || anchored {
        return proposed.origin();
    }
    Point::new(
        snap_x(proposed, candidates, screen),
        snap_y(proposed, candidates, screen),
    )
}

/// Horizontal snap of `proposed.x0` against candidate edges and the screen.
///
/// A candidate participates only if its vertical span overlaps the moving
/// container's. Both pairings are measured: this-left to candidate-right and
/// this-right to candidate-left; a screen edge wins when it is strictly
/// closer than the best sibling distance. Ties between the two pairings go to
/// the left-edge pairing.
pub fn snap_x(proposed: Rect, candidates: &[Rect], screen: Size) -> f64 {
    let x = proposed.x0;
    let end_x = proposed.x1;
    let width = proposed.width();

    let mut best_left = SNAP_THRESHOLD;
    let mut left_edge = None;
    let mut best_right = SNAP_THRESHOLD;
    let mut right_edge = None;
    for c in candidates {
        if !spans_overlap(proposed.y0, proposed.y1, c.y0, c.y1) {
            continue;
        }
        let d_left = (x - c.x1).abs();
        if d_left < best_left {
            best_left = d_left;
            left_edge = Some(c.x1);
        }
        let d_right = (end_x - c.x0).abs();
        if d_right < best_right {
            best_right = d_right;
            right_edge = Some(c.x0 - width);
        }
    }

    if best_left > x.abs() {
        return 0.0;
    }
    if best_right > (screen.width - end_x).abs() {
        return screen.width - width;
    }
    if best_left <= best_right {
        left_edge.unwrap_or(x)
    } else {
        right_edge.unwrap_or(x)
    }
}

/// Vertical snap of `proposed.y0`; mirror of [`snap_x`].
pub fn snap_y(proposed: Rect, candidates: &[Rect], screen: Size) -> f64 {
    let y = proposed.y0;
    let end_y = proposed.y1;
    let height = proposed.height();

    let mut best_top = SNAP_THRESHOLD;
    let mut top_edge = None;
    let mut best_bottom = SNAP_THRESHOLD;
    let mut bottom_edge = None;
    for c in candidates {
        if !spans_overlap(proposed.x0, proposed.x1, c.x0, c.x1) {
            continue;
        }
        let d_top = (y - c.y1).abs();
        if d_top < best_top {
            best_top = d_top;
            top_edge = Some(c.y1);
        }
        let d_bottom = (end_y - c.y0).abs();
        if d_bottom < best_bottom {
            best_bottom = d_bottom;
            bottom_edge = Some(c.y0 - height);
        }
    }

    if best_top > y.abs() {
        return 0.0;
    }
    if best_bottom > (screen.height - end_y).abs() {
        return screen.height - height;
    }
    if best_top <= best_bottom {
        top_edge.unwrap_or(y)
    } else {
        bottom_edge.unwrap_or(y)
    }
}

/// Inclusive 1-D interval overlap; touching intervals count.
fn spans_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0 <= b1 && b0 <= a1
}
