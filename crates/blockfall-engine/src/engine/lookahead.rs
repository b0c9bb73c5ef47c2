use std::collections::VecDeque;

use crate::{PieceKind, Shape};

use super::piece_factory::PieceFactory;

/// Fixed-length preview of upcoming pieces.
///
/// Taking the front piece immediately replenishes the back from the factory, so the
/// queue length never changes. A zero-length queue hands pieces straight through
/// from the factory.
#[derive(Debug, Clone)]
pub struct LookaheadQueue {
    pieces: VecDeque<PieceKind>,
}

impl LookaheadQueue {
    /// Creates a queue pre-filled with `len` pieces.
    #[must_use]
    pub fn new(len: usize, factory: &mut PieceFactory) -> Self {
        Self {
            pieces: (0..len).map(|_| factory.next_kind()).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Returns the piece that [`Self::pop`] would return, without drawing a new one.
    ///
    /// For a zero-length queue this is `None`.
    #[must_use]
    pub fn front(&self) -> Option<PieceKind> {
        self.pieces.front().copied()
    }

    /// Removes the front piece and refills the back one-for-one.
    pub fn pop(&mut self, factory: &mut PieceFactory) -> PieceKind {
        match self.pieces.pop_front() {
            Some(kind) => {
                self.pieces.push_back(factory.next_kind());
                kind
            }
            None => factory.next_kind(),
        }
    }

    /// Upcoming pieces, front first.
    pub fn kinds(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pieces.iter().copied()
    }

    /// Upcoming pieces as base-orientation shapes, front first.
    pub fn shapes(&self) -> impl Iterator<Item = Shape> + '_ {
        self.kinds().map(Shape::base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceSeed, Randomizer};

    fn factory() -> PieceFactory {
        PieceFactory::with_seed(Randomizer::SevenBag, PieceSeed::from_u128(99))
    }

    #[test]
    fn test_pop_keeps_length_and_order() {
        let mut f = factory();
        let mut reference = factory();
        let mut queue = LookaheadQueue::new(6, &mut f);
        assert_eq!(queue.len(), 6);

        let expected: Vec<_> = (0..20).map(|_| reference.next_kind()).collect();
        for (i, want) in expected.iter().take(14).enumerate() {
            assert_eq!(queue.front(), Some(*want), "step {i}");
            assert_eq!(queue.pop(&mut f), *want, "step {i}");
            assert_eq!(queue.len(), 6);
        }
        let tail: Vec<_> = queue.kinds().collect();
        assert_eq!(tail, expected[14..]);
    }

    #[test]
    fn test_zero_length_passes_through() {
        let mut f = factory();
        let mut reference = factory();
        let mut queue = LookaheadQueue::new(0, &mut f);
        assert!(queue.is_empty());
        assert_eq!(queue.front(), None);
        for _ in 0..10 {
            assert_eq!(queue.pop(&mut f), reference.next_kind());
            assert!(queue.is_empty());
        }
    }

    #[test]
    fn test_shapes_are_base_orientation() {
        let mut f = factory();
        let queue = LookaheadQueue::new(3, &mut f);
        for (shape, kind) in queue.shapes().zip(queue.kinds()) {
            assert_eq!(shape, Shape::base(kind));
        }
    }
}
