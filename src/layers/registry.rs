//! Per-layer tile registry
//!
//! Explicit map from tile address to `{state, current, surface}`. Creation and
//! eviction update it; move-triggered redraw reads it. Every registration gets
//! a fresh generation so a creation that outlives its tile can tell.

use crate::{
    core::geo::TileCoord,
    prelude::HashMap,
    rendering::context::SharedCanvas,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    /// Created, waiting for its first draw (e.g. for the font).
    Pending,
    /// Drawn at least once and on display.
    Rendered,
}

#[derive(Debug, Clone)]
struct TileEntry {
    state: TileState,
    current: bool,
    generation: u64,
    canvas: SharedCanvas,
}

/// Handle held by an in-flight tile creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileTicket {
    pub coord: TileCoord,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct TileRegistry {
    tiles: Mutex<HashMap<TileCoord, TileEntry>>,
    next_generation: AtomicU64,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TileCoord, TileEntry>> {
        self.tiles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a pending, current tile, replacing any previous one at the
    /// same address.
    pub fn register(&self, coord: TileCoord, canvas: SharedCanvas) -> TileTicket {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(
            coord,
            TileEntry {
                state: TileState::Pending,
                current: true,
                generation,
                canvas,
            },
        );
        TileTicket { coord, generation }
    }

    /// The ticket's surface, if its tile has not been evicted or replaced.
    pub fn canvas_for(&self, ticket: &TileTicket) -> Option<SharedCanvas> {
        self.lock()
            .get(&ticket.coord)
            .filter(|entry| entry.generation == ticket.generation)
            .map(|entry| entry.canvas.clone())
    }

    /// Marks the ticket's tile rendered. Returns `false` if it is gone.
    pub fn mark_rendered(&self, ticket: &TileTicket) -> bool {
        match self.lock().get_mut(&ticket.coord) {
            Some(entry) if entry.generation == ticket.generation => {
                entry.state = TileState::Rendered;
                true
            }
            _ => false,
        }
    }

    /// Evicts a tile. Returns whether it was registered.
    pub fn remove(&self, coord: TileCoord) -> bool {
        self.lock().remove(&coord).is_some()
    }

    /// Tiles at `zoom` become current, all others stale.
    pub fn set_current_zoom(&self, zoom: i32) {
        for (coord, entry) in self.lock().iter_mut() {
            entry.current = coord.z == zoom;
        }
    }

    pub fn set_current(&self, coord: TileCoord, current: bool) {
        if let Some(entry) = self.lock().get_mut(&coord) {
            entry.current = current;
        }
    }

    pub fn state(&self, coord: TileCoord) -> Option<TileState> {
        self.lock().get(&coord).map(|entry| entry.state)
    }

    pub fn is_current(&self, coord: TileCoord) -> bool {
        self.lock().get(&coord).is_some_and(|entry| entry.current)
    }

    pub fn canvas(&self, coord: TileCoord) -> Option<SharedCanvas> {
        self.lock().get(&coord).map(|entry| entry.canvas.clone())
    }

    /// Snapshot of tiles that are both current and rendered, ordered by
    /// address. The registry lock is released before the caller draws.
    pub fn rendered_current(&self) -> Vec<(TileCoord, SharedCanvas)> {
        let mut tiles: Vec<(TileCoord, SharedCanvas)> = self
            .lock()
            .iter()
            .filter(|(_, entry)| entry.current && entry.state == TileState::Rendered)
            .map(|(coord, entry)| (*coord, entry.canvas.clone()))
            .collect();
        tiles.sort_by_key(|(coord, _)| *coord);
        tiles
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
