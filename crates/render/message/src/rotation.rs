use rand::Rng;

/// Position in the decoration lists. Advances by one after every rendered message
/// so consecutive posts don't carry the same emoji or phrase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RotationState(usize);

impl RotationState {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Random starting point, so a restart does not always open with the same decoration
    pub fn random() -> Self {
        Self(rand::rng().random_range(0..1024))
    }

    pub fn index(&self) -> usize {
        self.0
    }

    #[must_use]
    pub fn advance(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Element of `items` selected by this state. `items` must not be empty.
    pub fn pick<'a, T>(&self, items: &'a [T]) -> &'a T {
        &items[self.0 % items.len()]
    }
}
