//! Places (§3 "Place"): a location that can be borrowed, moved, or assigned. Canonical
//! so the borrow engine can compare places by identity instead of re-walking segments.

use rustc_hash::FxHashMap;
use sema_ast::symbols::SymbolId;
use sema_common::Atom;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Field(Atom),
    Index,
    Deref,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct PlaceShape {
    base: SymbolId,
    segments: Vec<Segment>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceId(pub u32);

/// Interns place shapes so two occurrences of `x.field.0` canonicalize to the same id,
/// the way `TypeRegistry` interns types by structural shape.
#[derive(Default)]
pub struct PlaceTable {
    shapes: Vec<PlaceShape>,
    by_shape: FxHashMap<PlaceShape, PlaceId>,
}

impl PlaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern_base(&mut self, base: SymbolId) -> PlaceId {
        self.intern(base, Vec::new())
    }

    pub fn extend(&mut self, parent: PlaceId, segment: Segment) -> PlaceId {
        let mut segments = self.shapes[parent.0 as usize].segments.clone();
        segments.push(segment);
        let base = self.shapes[parent.0 as usize].base;
        self.intern(base, segments)
    }

    fn intern(&mut self, base: SymbolId, segments: Vec<Segment>) -> PlaceId {
        let shape = PlaceShape { base, segments };
        if let Some(&id) = self.by_shape.get(&shape) {
            return id;
        }
        let id = PlaceId(self.shapes.len() as u32);
        self.by_shape.insert(shape.clone(), id);
        self.shapes.push(shape);
        id
    }

    pub fn base(&self, id: PlaceId) -> SymbolId {
        self.shapes[id.0 as usize].base
    }

    pub fn segments(&self, id: PlaceId) -> &[Segment] {
        &self.shapes[id.0 as usize].segments
    }

    /// Whether `prefix` is `candidate` or an ancestor of it — writing through a prefix,
    /// or extending an ancestor, can alias an active borrow on the other (§4.4).
    pub fn is_prefix_of(&self, prefix: PlaceId, candidate: PlaceId) -> bool {
        if self.base(prefix) != self.base(candidate) {
            return false;
        }
        let p = self.segments(prefix);
        let c = self.segments(candidate);
        p.len() <= c.len() && p == &c[..p.len()]
    }

    pub fn overlaps(&self, a: PlaceId, b: PlaceId) -> bool {
        self.is_prefix_of(a, b) || self.is_prefix_of(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_interns_to_same_place() {
        let mut table = PlaceTable::new();
        let base = SymbolId(0);
        let root = table.intern_base(base);
        let name = Atom(1);
        let a = table.extend(root, Segment::Field(name));
        let b = table.extend(root, Segment::Field(name));
        assert_eq!(a, b);
    }

    #[test]
    fn field_is_a_prefix_extension_of_base() {
        let mut table = PlaceTable::new();
        let base = SymbolId(0);
        let root = table.intern_base(base);
        let field = table.extend(root, Segment::Field(Atom(2)));
        assert!(table.is_prefix_of(root, field));
        assert!(table.overlaps(root, field));
    }

    #[test]
    fn sibling_fields_do_not_overlap() {
        let mut table = PlaceTable::new();
        let base = SymbolId(0);
        let root = table.intern_base(base);
        let a = table.extend(root, Segment::Field(Atom(3)));
        let b = table.extend(root, Segment::Field(Atom(4)));
        assert!(!table.overlaps(a, b));
    }
}
