//! Edit ledger for an in-progress road gesture.
//!
//! Every cell the road engine writes is snapshotted here first. A drag
//! preview is thrown away with [`EditLedger::rollback`]; releasing the mouse
//! keeps it with [`EditLedger::commit`].

use std::collections::HashSet;

use bevy::prelude::*;

use crate::grid::{Cell, GridAccess};
use crate::props::{InstancePlacement, PropHandle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerEntry {
    pub pos: IVec2,
    pub prior: Cell,
}

#[derive(Debug, Default)]
pub struct EditLedger {
    entries: Vec<LedgerEntry>,
    touched: HashSet<IVec2>,
    placed: Vec<PropHandle>,
    hidden: Vec<PropHandle>,
}

impl EditLedger {
    /// Record the state of `pos` before the edit touches it. Only the first
    /// snapshot per cell is kept.
    pub fn push(&mut self, pos: IVec2, prior: Cell) {
        if self.touched.insert(pos) {
            self.entries.push(LedgerEntry { pos, prior });
        }
    }

    /// Snapshot, mutate and mark pending in one step. Returns false when
    /// `pos` is outside the grid.
    pub fn modify<G, F>(&mut self, grid: &mut G, pos: IVec2, edit: F) -> bool
    where
        G: GridAccess + ?Sized,
        F: FnOnce(&mut Cell),
    {
        let Some(prior) = grid.cell(pos) else {
            return false;
        };
        self.push(pos, prior);
        let mut cell = prior;
        edit(&mut cell);
        cell.set_pending(true);
        grid.set_cell(pos, cell);
        true
    }

    /// Snapshot every in-bounds cell of the inclusive box `min..=max` without
    /// marking it pending. Used before writes that reach past the edited
    /// cells, such as ground shading.
    pub fn snapshot_area<G: GridAccess + ?Sized>(&mut self, grid: &G, min: IVec2, max: IVec2) {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let pos = IVec2::new(x, y);
                if let Some(prior) = grid.cell(pos) {
                    self.push(pos, prior);
                }
            }
        }
    }

    pub fn record_placed(&mut self, handle: PropHandle) {
        self.placed.push(handle);
    }

    pub fn record_hidden(&mut self, handles: impl IntoIterator<Item = PropHandle>) {
        self.hidden.extend(handles);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.placed.is_empty() && self.hidden.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        self.touched.contains(&pos)
    }

    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.entries.iter().map(|e| e.pos)
    }

    pub fn placed(&self) -> &[PropHandle] {
        &self.placed
    }

    /// Keep the edit: drop transient flags, retire hidden props for good.
    /// Returns the number of cells the edit touched.
    pub fn commit<G, P>(&mut self, grid: &mut G, props: &mut P) -> usize
    where
        G: GridAccess + ?Sized,
        P: InstancePlacement + ?Sized,
    {
        for entry in &self.entries {
            if let Some(mut cell) = grid.cell(entry.pos) {
                cell.set_pending(false);
                cell.set_emissive(false);
                grid.set_cell(entry.pos, cell);
            }
        }
        for handle in self.hidden.drain(..) {
            props.destroy_instance_immediately(handle);
        }
        let touched = self.entries.len();
        self.clear();
        touched
    }

    /// Put every recorded cell back and undo prop changes.
    pub fn rollback<G, P>(&mut self, grid: &mut G, props: &mut P)
    where
        G: GridAccess + ?Sized,
        P: InstancePlacement + ?Sized,
    {
        if self.is_empty() {
            return;
        }
        for entry in self.entries.iter().rev() {
            grid.set_cell(entry.pos, entry.prior);
        }
        for handle in self.placed.drain(..).rev() {
            props.destroy_instance_immediately(handle);
        }
        for handle in self.hidden.drain(..) {
            props.show_instance(handle);
        }
        self.clear();
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.touched.clear();
        self.placed.clear();
        self.hidden.clear();
    }
}
