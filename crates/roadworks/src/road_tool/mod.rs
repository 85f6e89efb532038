//! Drag-to-build road tool.
//!
//! `Idle -> Started` on press, `Started/Previewed -> Previewed` on every drag
//! that moves, and back to `Idle` on release, committing the preview or
//! rolling it back. Each preview is rebuilt from scratch after rolling back
//! the previous one, so the same pointer always yields the same grid.

mod systems;


use bevy::prelude::*;

use crate::autotile::retile_cells;
use crate::config::{RoadToolConfig, TILE_SELECT};
use crate::decoration::decorate;
use crate::grid::{Direction, GridAccess};
use crate::props::InstancePlacement;
use crate::road_builder::{build_road, lock_axis, RoadBuildError};
use crate::road_topology::snap_endpoint;
use crate::selection::RoadSelection;
use crate::sim_rng::drag_rng;
use crate::undo_ledger::EditLedger;

pub use systems::{handle_road_tool_input, RoadEditOutcome, RoadToolInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolPhase {
    #[default]
    Idle,
    Started {
        start: IVec2,
    },
    Previewed {
        start: IVec2,
        end: IVec2,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackReason {
    ReleasedOutOfBounds,
    NothingBuilt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Committed { cells: usize, junctions: usize },
    RolledBack(RollbackReason),
}

/// Result of one drag tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    /// No gesture in progress, or still settling on the start cell.
    Ignored,
    /// Pointer has not moved since the last preview.
    Unchanged,
    Built { cells: usize, junctions: usize },
    Failed(RoadBuildError),
}

/// Everything a gesture step reads or writes besides the tool itself.
pub struct ToolContext<'a, G: ?Sized, P: ?Sized> {
    pub grid: &'a mut G,
    pub props: &'a mut P,
    pub selection: &'a mut RoadSelection,
    pub config: &'a RoadToolConfig,
}

#[derive(Resource, Debug, Default)]
pub struct RoadTool {
    phase: ToolPhase,
    ledger: EditLedger,
    drag_seed: u64,
    preview_junctions: usize,
}

/// `to` lies strictly ahead of `from` along `heading`.
fn is_ahead_on_axis(from: IVec2, to: IVec2, heading: Direction) -> bool {
    let delta = to - from;
    let across = if heading.is_vertical() { delta.x } else { delta.y };
    across == 0 && Direction::from_delta(delta) == Some(heading)
}

impl RoadTool {
    pub fn phase(&self) -> ToolPhase {
        self.phase
    }

    pub fn ledger(&self) -> &EditLedger {
        &self.ledger
    }

    /// Throw away any preview and go idle.
    pub fn cancel<G, P>(&mut self, ctx: &mut ToolContext<'_, G, P>)
    where
        G: GridAccess + ?Sized,
        P: InstancePlacement + ?Sized,
    {
        self.ledger.rollback(ctx.grid, ctx.props);
        self.phase = ToolPhase::Idle;
        self.preview_junctions = 0;
    }

    /// Start a gesture at `pointer`. Returns false when the press misses the grid.
    pub fn on_press<G, P>(&mut self, ctx: &mut ToolContext<'_, G, P>, pointer: IVec2, seed: u64) -> bool
    where
        G: GridAccess + ?Sized,
        P: InstancePlacement + ?Sized,
    {
        self.cancel(ctx);
        ctx.selection.deselect(ctx.grid);
        if !ctx.grid.in_bounds(pointer) {
            return false;
        }
        let start = snap_endpoint(&*ctx.grid, pointer, ctx.config.snap_extra_distance);
        self.drag_seed = seed;
        if ctx.grid.cell(start).is_some_and(|c| c.is_buildable_ground()) {
            self.ledger.modify(ctx.grid, start, |c| {
                c.set_tile(TILE_SELECT);
                c.set_emissive(true);
            });
        }
        self.phase = ToolPhase::Started { start };
        debug!("road gesture started at {start} (pointer {pointer})");
        true
    }

    pub fn on_drag<G, P>(
        &mut self,
        ctx: &mut ToolContext<'_, G, P>,
        pointer: IVec2,
        last: IVec2,
        drag_start_time: f32,
        now: f32,
    ) -> PreviewStatus
    where
        G: GridAccess + ?Sized,
        P: InstancePlacement + ?Sized,
    {
        let start = match self.phase {
            ToolPhase::Idle => return PreviewStatus::Ignored,
            ToolPhase::Started { start } | ToolPhase::Previewed { start, .. } => start,
        };
        if pointer == start && now - drag_start_time < ctx.config.drag_settle_secs {
            return PreviewStatus::Ignored;
        }
        if pointer == last && matches!(self.phase, ToolPhase::Previewed { .. }) {
            return PreviewStatus::Unchanged;
        }

        self.ledger.rollback(ctx.grid, ctx.props);
        self.phase = ToolPhase::Started { start };
        self.preview_junctions = 0;

        if !ctx.grid.in_bounds(pointer) {
            return PreviewStatus::Failed(RoadBuildError::OutOfBounds);
        }
        let (heading, length) = match lock_axis(start, pointer) {
            Ok(axis) => axis,
            Err(err) => return PreviewStatus::Failed(err),
        };
        let mut end = start + heading.offset() * length;
        let snapped = snap_endpoint(&*ctx.grid, end, ctx.config.snap_extra_distance);
        if snapped != end && is_ahead_on_axis(start, snapped, heading) {
            end = snapped;
        }

        match build_road(ctx.grid, &mut self.ledger, start, end) {
            Ok(report) => {
                retile_cells(ctx.grid, &mut self.ledger, &report.retile);
                if ctx.config.decorate {
                    let mut rng = drag_rng(self.drag_seed);
                    decorate(
                        ctx.grid,
                        ctx.props,
                        &mut self.ledger,
                        &report,
                        &mut rng,
                        ctx.config.road_sign_chance,
                    );
                }
                self.phase = ToolPhase::Previewed { start, end };
                self.preview_junctions = report.junctions.len();
                debug!("road preview {start} -> {end}: {} cells", report.road.len());
                PreviewStatus::Built {
                    cells: report.road.len(),
                    junctions: report.junctions.len(),
                }
            }
            Err(err) => {
                self.ledger.rollback(ctx.grid, ctx.props);
                debug!("road preview {start} -> {end} rejected: {err}");
                PreviewStatus::Failed(err)
            }
        }
    }

    /// Finish the gesture. `None` when no gesture was in progress.
    pub fn on_release<G, P>(&mut self, ctx: &mut ToolContext<'_, G, P>, pointer: IVec2) -> Option<GestureOutcome>
    where
        G: GridAccess + ?Sized,
        P: InstancePlacement + ?Sized,
    {
        let in_bounds = ctx.grid.in_bounds(pointer);
        let outcome = match self.phase {
            ToolPhase::Idle => return None,
            ToolPhase::Previewed { .. } if in_bounds => {
                let junctions = self.preview_junctions;
                let cells = self.ledger.commit(ctx.grid, ctx.props);
                GestureOutcome::Committed { cells, junctions }
            }
            ToolPhase::Previewed { .. } | ToolPhase::Started { .. } => {
                self.ledger.rollback(ctx.grid, ctx.props);
                GestureOutcome::RolledBack(if in_bounds {
                    RollbackReason::NothingBuilt
                } else {
                    RollbackReason::ReleasedOutOfBounds
                })
            }
        };
        self.phase = ToolPhase::Idle;
        self.preview_junctions = 0;
        match outcome {
            GestureOutcome::Committed { cells, junctions } => {
                info!("road committed: {cells} cells, {junctions} junctions");
            }
            GestureOutcome::RolledBack(reason) => info!("road gesture rolled back: {reason:?}"),
        }
        Some(outcome)
    }

    /// Hover feedback while no gesture is running.
    pub fn on_mouse_move<G, P>(&mut self, ctx: &mut ToolContext<'_, G, P>, pointer: IVec2)
    where
        G: GridAccess + ?Sized,
        P: InstancePlacement + ?Sized,
    {
        if self.phase != ToolPhase::Idle {
            return;
        }
        if ctx.grid.is_road(pointer) {
            ctx.selection.select(ctx.grid, pointer);
        } else {
            ctx.selection.deselect(ctx.grid);
        }
    }
}
