//! Ordered collection of shapes with a single active (selected) entry.
//!
//! Insertion order is render order: later shapes paint on top. The registry
//! enforces that at most one shape is active; every mutation with an
//! unknown id is a no-op that reports `false`.

use crate::id::ShapeId;
use crate::model::{Rect, Shape};

#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: Vec<Shape>,
    next_id: u64,
    active: Option<ShapeId>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new inactive shape and return its freshly allocated id.
    pub fn insert(&mut self, rect: Rect) -> ShapeId {
        let id = ShapeId::new(self.next_id);
        self.next_id += 1;
        self.shapes.push(Shape::new(id, rect));
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn rect(&self, id: ShapeId) -> Option<Rect> {
        self.get(id).map(|s| s.rect)
    }

    /// Replace a shape's rectangle. Returns `false` for unknown ids.
    pub fn set_rect(&mut self, id: ShapeId, rect: Rect) -> bool {
        match self.shapes.iter_mut().find(|s| s.id == id) {
            Some(shape) => {
                shape.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Remove a shape, clearing the active pointer if it was selected.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let pos = self.shapes.iter().position(|s| s.id == id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        Some(self.shapes.remove(pos))
    }

    /// Select `id`, deselecting whichever shape was active before.
    pub fn activate(&mut self, id: ShapeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        for shape in &mut self.shapes {
            shape.active = shape.id == id;
        }
        self.active = Some(id);
        true
    }

    /// Deselect `id`. Returns `false` if it wasn't active.
    pub fn deactivate(&mut self, id: ShapeId) -> bool {
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if !shape.active {
            return false;
        }
        shape.active = false;
        if self.active == Some(id) {
            self.active = None;
        }
        true
    }

    pub fn active_id(&self) -> Option<ShapeId> {
        self.active
    }

    pub fn active(&self) -> Option<&Shape> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Drop every shape. Id allocation keeps counting so stale ids from
    /// in-flight events never alias a new shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn ids_are_monotonic_and_ordered() {
        let mut reg = ShapeRegistry::new();
        let a = reg.insert(rect());
        let b = reg.insert(rect());
        reg.remove(a);
        let c = reg.insert(rect());
        assert!(a < b && b < c);
        let order: Vec<_> = reg.iter().map(|s| s.id).collect();
        assert_eq!(order, vec![b, c]);
    }

    #[test]
    fn iterates_topmost_first_in_reverse() {
        let mut reg = ShapeRegistry::new();
        let a = reg.insert(rect());
        let b = reg.insert(rect());
        let top_down: Vec<_> = reg.iter().rev().map(|s| s.id).collect();
        assert_eq!(top_down, vec![b, a]);
    }

    #[test]
    fn single_active_invariant() {
        let mut reg = ShapeRegistry::new();
        let a = reg.insert(rect());
        let b = reg.insert(rect());
        assert!(reg.activate(a));
        assert!(reg.activate(b));
        assert_eq!(reg.iter().filter(|s| s.active).count(), 1);
        assert_eq!(reg.active_id(), Some(b));
    }

    #[test]
    fn removing_active_clears_pointer() {
        let mut reg = ShapeRegistry::new();
        let a = reg.insert(rect());
        reg.activate(a);
        reg.remove(a);
        assert_eq!(reg.active_id(), None);
        assert!(reg.active().is_none());
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut reg = ShapeRegistry::new();
        let ghost = ShapeId::new(42);
        assert!(!reg.activate(ghost));
        assert!(!reg.deactivate(ghost));
        assert!(!reg.set_rect(ghost, rect()));
        assert!(reg.remove(ghost).is_none());
    }

    #[test]
    fn clear_keeps_counting() {
        let mut reg = ShapeRegistry::new();
        let a = reg.insert(rect());
        reg.clear();
        let b = reg.insert(rect());
        assert_eq!(reg.len(), 1);
        assert_ne!(a, b);
    }
}
