//! Pointer gestures sent through the real `RoadToolInput` event path.

use bevy::prelude::*;

use crate::road_tool::{GestureOutcome, RoadToolInput};

use super::TestWorld;

impl TestWorld {
    fn send(&mut self, input: RoadToolInput) {
        self.app.world_mut().send_event(input);
        self.update();
    }

    pub fn press(&mut self, pointer: IVec2) {
        self.pressed_at = self.app.world().resource::<Time>().elapsed_secs();
        self.last_pointer = pointer;
        self.send(RoadToolInput::Press { pointer });
    }

    pub fn drag_to(&mut self, pointer: IVec2) {
        let input = RoadToolInput::Drag {
            pointer,
            last: self.last_pointer,
            started_at: self.pressed_at,
        };
        self.last_pointer = pointer;
        self.send(input);
    }

    /// Release and return the outcome of the gesture, if one was running.
    pub fn release(&mut self, pointer: IVec2) -> Option<GestureOutcome> {
        let seen = self.outcomes.len();
        self.last_pointer = pointer;
        self.send(RoadToolInput::Release { pointer });
        self.outcomes.get(seen).copied()
    }

    pub fn hover(&mut self, pointer: IVec2) {
        self.send(RoadToolInput::MouseMove { pointer });
    }

    /// Press at `from`, drag to `to` and release there.
    pub fn draw_road(&mut self, from: IVec2, to: IVec2) -> Option<GestureOutcome> {
        self.press(from);
        self.drag_to(to);
        self.release(to)
    }
}
