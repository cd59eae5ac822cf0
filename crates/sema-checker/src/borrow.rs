//! Borrow Engine (C4, §4.4): tracks active borrows, moves, and writes, and enforces
//! exclusion. One `BorrowEngine` lives for the duration of a single function body; the
//! `Checker` resets it (or creates a fresh one) at each function boundary.

use crate::places::PlaceId;
use rustc_hash::FxHashMap;
use sema_common::{Atom, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorrowKind {
    Shared,
    Mut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BorrowId(pub u32);

#[derive(Clone, Debug)]
pub struct BorrowEntry {
    pub place: PlaceId,
    pub kind: BorrowKind,
    pub scope: Atom,
    pub span: Span,
    pub parent: Option<BorrowId>,
    pub live: bool,
}

#[derive(Clone, Copy, Debug)]
pub enum Issue {
    Conflicts(BorrowId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorrowEvent {
    Start(BorrowId),
    End(BorrowId),
    Move(PlaceId, Span),
    Write(PlaceId, Span),
    Drop(BorrowId),
    SpawnEscape(PlaceId, Span),
}

#[derive(Default)]
pub struct BorrowEngine {
    entries: Vec<BorrowEntry>,
    /// Per-place, the borrow currently reachable from that exact place (for reborrow
    /// chains and `expr_borrow` reverse lookup).
    expr_borrow: FxHashMap<u32, BorrowId>,
    moved: FxHashMap<PlaceId, bool>,
    events: Vec<BorrowEvent>,
}

impl BorrowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BorrowEvent] {
        &self.events
    }

    fn live_borrows_over(&self, place_overlaps: impl Fn(PlaceId) -> bool) -> Vec<BorrowId> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.live && place_overlaps(e.place))
            .map(|(i, _)| BorrowId(i as u32))
            .collect()
    }

    /// Begin a new borrow of `place`. `overlaps` decides, for any existing entry's
    /// place, whether it overlaps the new one (injected by the caller, which owns the
    /// `PlaceTable`). Two Shared borrows compose; anything touching a Mut conflicts.
    pub fn begin_borrow(
        &mut self,
        span: Span,
        kind: BorrowKind,
        place: PlaceId,
        scope: Atom,
        parent: Option<BorrowId>,
        overlaps: impl Fn(PlaceId, PlaceId) -> bool,
    ) -> (BorrowId, Option<Issue>) {
        let conflicting = self.live_borrows_over(|p| overlaps(place, p)).into_iter().find(|&id| {
            let existing = &self.entries[id.0 as usize];
            kind == BorrowKind::Mut || existing.kind == BorrowKind::Mut
        });
        let id = BorrowId(self.entries.len() as u32);
        self.entries.push(BorrowEntry {
            place,
            kind,
            scope,
            span,
            parent,
            live: true,
        });
        self.expr_borrow.insert(id.0, id);
        self.events.push(BorrowEvent::Start(id));
        (id, conflicting.map(Issue::Conflicts))
    }

    pub fn move_allowed(&self, place: PlaceId, overlaps: impl Fn(PlaceId, PlaceId) -> bool) -> Option<Issue> {
        self.live_borrows_over(|p| overlaps(place, p))
            .first()
            .copied()
            .map(Issue::Conflicts)
    }

    /// Shared borrows on a descendant of `place` also block a mutation of `place`,
    /// unlike `move_allowed` which only cares about borrows covering the place itself
    /// or an ancestor (§4.4).
    pub fn mutation_allowed(&self, place: PlaceId, overlaps: impl Fn(PlaceId, PlaceId) -> bool) -> Option<Issue> {
        self.live_borrows_over(|p| overlaps(place, p))
            .first()
            .copied()
            .map(Issue::Conflicts)
    }

    pub fn drop_borrow(&mut self, id: BorrowId, span: Span) {
        if let Some(entry) = self.entries.get_mut(id.0 as usize) {
            entry.live = false;
        }
        self.events.push(BorrowEvent::End(id));
        let _ = span;
    }

    pub fn record_move(&mut self, place: PlaceId, span: Span) {
        self.moved.insert(place, true);
        self.events.push(BorrowEvent::Move(place, span));
    }

    pub fn record_reassignment(&mut self, place: PlaceId) {
        self.moved.insert(place, false);
    }

    pub fn is_moved(&self, place: PlaceId) -> bool {
        self.moved.get(&place).copied().unwrap_or(false)
    }

    pub fn record_write(&mut self, place: PlaceId, span: Span) {
        self.events.push(BorrowEvent::Write(place, span));
    }

    pub fn record_spawn_escape(&mut self, place: PlaceId, span: Span) {
        self.events.push(BorrowEvent::SpawnEscape(place, span));
    }

    pub fn entry(&self, id: BorrowId) -> &BorrowEntry {
        &self.entries[id.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trivial_overlap(a: PlaceId, b: PlaceId) -> bool {
        a == b
    }

    #[test]
    fn two_shared_borrows_compose() {
        let mut engine = BorrowEngine::new();
        let place = PlaceId(0);
        let (_id1, issue1) = engine.begin_borrow(Span::DUMMY, BorrowKind::Shared, place, Atom(0), None, trivial_overlap);
        assert!(issue1.is_none());
        let (_id2, issue2) = engine.begin_borrow(Span::DUMMY, BorrowKind::Shared, place, Atom(0), None, trivial_overlap);
        assert!(issue2.is_none());
    }

    #[test]
    fn mut_after_shared_conflicts() {
        let mut engine = BorrowEngine::new();
        let place = PlaceId(0);
        engine.begin_borrow(Span::DUMMY, BorrowKind::Shared, place, Atom(0), None, trivial_overlap);
        let (_id, issue) = engine.begin_borrow(Span::DUMMY, BorrowKind::Mut, place, Atom(0), None, trivial_overlap);
        assert!(matches!(issue, Some(Issue::Conflicts(_))));
    }

    #[test]
    fn dropped_borrow_no_longer_conflicts() {
        let mut engine = BorrowEngine::new();
        let place = PlaceId(0);
        let (id, _) = engine.begin_borrow(Span::DUMMY, BorrowKind::Shared, place, Atom(0), None, trivial_overlap);
        engine.drop_borrow(id, Span::DUMMY);
        let (_id2, issue) = engine.begin_borrow(Span::DUMMY, BorrowKind::Mut, place, Atom(0), None, trivial_overlap);
        assert!(issue.is_none());
    }

    #[test]
    fn move_tracking_round_trips_through_reassignment() {
        let mut engine = BorrowEngine::new();
        let place = PlaceId(0);
        assert!(!engine.is_moved(place));
        engine.record_move(place, Span::DUMMY);
        assert!(engine.is_moved(place));
        engine.record_reassignment(place);
        assert!(!engine.is_moved(place));
    }
}
