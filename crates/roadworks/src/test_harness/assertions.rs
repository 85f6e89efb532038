//! Assertion helpers for `TestWorld` integration tests.

use bevy::prelude::*;

use crate::grid::NodeType;

use super::TestWorld;

impl TestWorld {
    pub fn assert_road(&self, pos: IVec2) {
        assert!(self.cell(pos).is_road(), "Expected road at {pos}");
    }

    pub fn assert_no_road(&self, pos: IVec2) {
        assert!(!self.cell(pos).is_road(), "Expected no road at {pos}");
    }

    pub fn assert_node_type(&self, pos: IVec2, expected: NodeType) {
        let found = self.cell(pos).node_type();
        assert_eq!(found, expected, "Expected {expected:?} at {pos}, found {found:?}");
    }

    pub fn assert_tile(&self, pos: IVec2, expected: u8) {
        let found = self.cell(pos).tile();
        assert_eq!(found, expected, "Expected tile {expected} at {pos}, found {found}");
    }

    /// Nothing left half-built: no pending cells and an empty ledger.
    pub fn assert_settled(&self) {
        assert!(self.tool().ledger().is_empty(), "ledger still holds edits");
        assert_eq!(self.pending_cells(), 0, "cells still marked pending");
    }
}
