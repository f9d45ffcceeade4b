use std::time::Instant;

/// A stored value together with the instant it stops being visible
#[derive(Debug, Clone)]
pub(crate) struct Entry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Entry<T> {
    /// Creates a new entry with the given value and expiration time
    pub fn new(value: T, expires_at: Instant) -> Self {
        Self { value, expires_at }
    }

    /// Returns a reference to the stored value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Checks whether this entry has expired as of `now`.
    ///
    /// An entry is expired from its `expires_at` instant onward.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
