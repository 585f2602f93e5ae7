//=========================================================================
// Transition Queue
//=========================================================================
//
// Queue for screen transitions.
//
// Screens queue transitions here from inside their callbacks. The screen
// manager applies them once the callback (or the transition in progress)
// has returned, so a swap is never nested inside another.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::ScreenKey;

//=== Transition ==========================================================

/// A requested screen change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<K: ScreenKey> {
    /// Screen to activate; `None` terminates the loop.
    pub target: Option<K>,

    /// Keep the timer warmed up across the swap.
    pub seamless: bool,
}

//=== Transition Queue ====================================================

/// FIFO of pending transitions.
pub struct TransitionQueue<K: ScreenKey> {
    queue: Vec<Transition<K>>,
}

impl<K: ScreenKey> TransitionQueue<K> {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a transition to be applied after the current callback.
    pub fn push(&mut self, transition: Transition<K>) {
        self.queue.push(transition);
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued transitions.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all transitions from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<Transition<K>> {
        std::mem::take(&mut self.queue)
    }
}

impl<K: ScreenKey> Default for TransitionQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScreen {
        A,
        B,
    }

    impl ScreenKey for TestScreen {}

    #[test]
    fn take_drains_in_fifo_order() {
        let mut queue = TransitionQueue::new();
        queue.push(Transition { target: Some(TestScreen::A), seamless: false });
        queue.push(Transition { target: Some(TestScreen::B), seamless: true });
        queue.push(Transition { target: None, seamless: false });
        assert_eq!(queue.len(), 3);

        let taken: Vec<_> = queue.take().into_iter().map(|t| t.target).collect();
        assert_eq!(taken, vec![Some(TestScreen::A), Some(TestScreen::B), None]);
        assert!(queue.is_empty());
    }
}
