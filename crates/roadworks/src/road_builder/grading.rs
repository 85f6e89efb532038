use bevy::prelude::*;

use crate::config::{GRADE_SAMPLE_WINDOW, ROAD_HALF_WIDTH};
use crate::grid::{Direction, GridAccess};
use crate::undo_ledger::EditLedger;

use super::Segment;

/// Cubic ease with zero slope at both ends.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub(crate) fn to_step(height: f32) -> u8 {
    height.round().clamp(0.0, 255.0) as u8
}

fn mean(samples: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = samples.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

/// Where the free run starting at `i` should be heading, as
/// `(last index of the run, height there)`.
///
/// The next anchored segment wins; the run then ends just before it at the
/// anchor's entry height. Without one, the run ends where the running ground
/// average first moves a whole step away from `current`.
fn find_target(segments: &[Segment], i: usize, current: f32) -> (usize, f32) {
    let n = segments.len();
    if let Some(j) = (i + 1..n).find(|&j| segments[j].anchor.is_some()) {
        let near = segments[j].anchor.map_or(current, |(near, _)| near);
        return (j - 1, near);
    }
    let window_avg = |m: usize| {
        let lo = m.saturating_sub(GRADE_SAMPLE_WINDOW - 1).max(i);
        mean(segments[lo..=m].iter().map(|s| s.sample))
    };
    for m in i..n {
        let avg = window_avg(m);
        if (avg - current).abs() >= 1.0 {
            return (m, avg);
        }
    }
    (n - 1, window_avg(n - 1))
}

/// Second pass: resolve one height per segment and store the begin/end pair
/// each cell gets in travel order.
pub(super) fn resolve_heights(segments: &mut [Segment]) {
    let n = segments.len();
    if n == 0 {
        return;
    }
    let mut resolved = vec![0.0f32; n];
    let mut current = match segments[0].anchor {
        Some((near, _)) => near,
        None => segments[0].sample,
    };

    let mut i = 0;
    while i < n {
        if let Some((_, far)) = segments[i].anchor {
            resolved[i] = far;
            current = far;
            i += 1;
            continue;
        }
        let (target, value) = find_target(segments, i, current);
        // Interpolate from the virtual point just before `i`.
        let span = (target + 1 - i) as f32;
        for (step, slot) in resolved[i..=target].iter_mut().enumerate() {
            let t = (step + 1) as f32 / span;
            *slot = current + (value - current) * smoothstep(t);
        }
        current = value;
        i = target + 1;
    }

    for m in 0..n {
        let begin = if m == 0 { resolved[0] } else { resolved[m - 1] };
        segments[m].height_begin = to_step(begin);
        segments[m].height_end = to_step(resolved[m]);
    }
}

/// Flatten the cross street's footprint at a junction and blend the rest of
/// each cross arm from the junction height to wherever that street ends.
///
/// Returns every cell written.
pub(super) fn regrade_cross_street<G: GridAccess + ?Sized>(
    grid: &mut G,
    ledger: &mut EditLedger,
    center: IVec2,
    node_height: u8,
    heading: Direction,
) -> Vec<IVec2> {
    let mut touched = Vec::new();
    for dir in [heading.left(), heading.right()] {
        let mut run = Vec::new();
        let mut end_height = None;
        let mut k = 1;
        loop {
            let pos = center + dir.offset() * k;
            let Some(cell) = grid.cell(pos).filter(|c| c.is_road()) else {
                break;
            };
            if !cell.direction().same_axis(dir) {
                end_height = Some(cell.road_mid_height() as f32);
                break;
            }
            if k <= ROAD_HALF_WIDTH {
                ledger.modify(grid, pos, |c| {
                    c.set_road_node(true);
                    c.set_heights(node_height, node_height);
                    c.set_ground_height(node_height);
                    c.set_emissive(true);
                });
                touched.push(pos);
            } else if cell.is_road_node() {
                end_height = Some(cell.road_mid_height() as f32);
                break;
            } else {
                run.push(pos);
            }
            k += 1;
        }

        let Some(&last) = run.last() else {
            continue;
        };
        let end_height = end_height
            .or_else(|| grid.cell(last).map(|c| c.height_toward(dir) as f32))
            .unwrap_or(node_height as f32);
        let from = node_height as f32;
        let count = run.len() as f32;
        let mut previous = from;
        for (i, pos) in run.into_iter().enumerate() {
            let h = from + (end_height - from) * smoothstep((i + 1) as f32 / count);
            let (begin, end) = (to_step(previous), to_step(h));
            ledger.modify(grid, pos, |c| {
                c.set_heights_along(dir, begin, end);
                c.set_ground_height(begin.min(end));
                c.set_emissive(true);
            });
            touched.push(pos);
            previous = h;
        }
    }
    touched
}
