use bevy::prelude::*;

use super::{GestureOutcome, RoadTool, ToolContext};
use crate::config::RoadToolConfig;
use crate::grid::WorldGrid;
use crate::props::PropStore;
use crate::selection::RoadSelection;
use crate::sim_rng::SimRng;

/// Pointer input for the road tool, already converted to grid coordinates.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum RoadToolInput {
    Press {
        pointer: IVec2,
    },
    Drag {
        pointer: IVec2,
        last: IVec2,
        /// `Time::elapsed_secs` when the button went down.
        started_at: f32,
    },
    Release {
        pointer: IVec2,
    },
    MouseMove {
        pointer: IVec2,
    },
}

/// Sent once per finished gesture.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadEditOutcome(pub GestureOutcome);

#[allow(clippy::too_many_arguments)]
pub fn handle_road_tool_input(
    mut inputs: EventReader<RoadToolInput>,
    mut outcomes: EventWriter<RoadEditOutcome>,
    time: Res<Time>,
    config: Res<RoadToolConfig>,
    mut grid: ResMut<WorldGrid>,
    mut props: ResMut<PropStore>,
    mut selection: ResMut<RoadSelection>,
    mut tool: ResMut<RoadTool>,
    mut rng: ResMut<SimRng>,
) {
    let now = time.elapsed_secs();
    let mut ctx = ToolContext {
        grid: &mut *grid,
        props: &mut *props,
        selection: &mut *selection,
        config: &config,
    };
    for input in inputs.read() {
        match *input {
            RoadToolInput::Press { pointer } => {
                let seed = rng.next_drag_seed();
                tool.on_press(&mut ctx, pointer, seed);
            }
            RoadToolInput::Drag {
                pointer,
                last,
                started_at,
            } => {
                tool.on_drag(&mut ctx, pointer, last, started_at, now);
            }
            RoadToolInput::Release { pointer } => {
                if let Some(outcome) = tool.on_release(&mut ctx, pointer) {
                    outcomes.send(RoadEditOutcome(outcome));
                }
            }
            RoadToolInput::MouseMove { pointer } => tool.on_mouse_move(&mut ctx, pointer),
        }
    }
}
