//! Disambiguation tokens for generated identifiers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Which token source a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenMode {
    #[default]
    Counter,
    Clock,
}

/// Produces strictly increasing tokens that tell overloaded members apart.
///
/// `Counter` starts at 1 and is deterministic for a sequential run. `Clock` uses
/// wall-clock milliseconds, bumped past the previous value when two calls land in the
/// same millisecond.
#[derive(Debug)]
pub enum TokenSource {
    Counter(AtomicU64),
    Clock(AtomicU64),
}

impl TokenSource {
    pub fn counter() -> Self {
        TokenSource::Counter(AtomicU64::new(0))
    }

    pub fn clock() -> Self {
        TokenSource::Clock(AtomicU64::new(0))
    }

    pub fn from_mode(mode: TokenMode) -> Self {
        match mode {
            TokenMode::Counter => Self::counter(),
            TokenMode::Clock => Self::clock(),
        }
    }

    pub fn next(&self) -> u64 {
        self.take(1)
    }

    /// Claim the next `count` tokens as a block and hand them out through a counter.
    ///
    /// On a counter the block holds the tokens the next `count` calls to
    /// [`next`](Self::next) would have returned. Blocks claimed in a fixed order give
    /// the same tokens however their holders interleave afterwards.
    pub fn reserve(&self, count: u64) -> TokenSource {
        if count == 0 {
            return TokenSource::counter();
        }
        let first = self.take(count);
        TokenSource::Counter(AtomicU64::new(first - 1))
    }

    /// Advance by `width` (non-zero) and return the first token of the claimed range.
    fn take(&self, width: u64) -> u64 {
        match self {
            TokenSource::Counter(n) => n.fetch_add(width, Ordering::Relaxed) + 1,
            TokenSource::Clock(last) => {
                let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
                let prev = last
                    .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| {
                        Some(now.max(prev + 1) + width - 1)
                    })
                    .unwrap_or_default();
                now.max(prev + 1)
            }
        }
    }
}

impl Default for TokenSource {
    fn default() -> Self {
        Self::counter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_starts_at_one() {
        let source = TokenSource::counter();
        assert_eq!(source.next(), 1);
        assert_eq!(source.next(), 2);
        assert_eq!(source.next(), 3);
    }

    #[test]
    fn clock_is_strictly_increasing() {
        let source = TokenSource::clock();
        let mut prev = source.next();
        for _ in 0..100 {
            let next = source.next();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn reserved_blocks_follow_claim_order() {
        let source = TokenSource::counter();
        let first = source.reserve(3);
        let second = source.reserve(2);
        assert_eq!(second.next(), 4);
        assert_eq!(second.next(), 5);
        assert_eq!(first.next(), 1);
        assert_eq!(first.next(), 2);
        assert_eq!(first.next(), 3);
        assert_eq!(source.next(), 6);
    }

    #[test]
    fn empty_reservation_claims_nothing() {
        let source = TokenSource::counter();
        let _ = source.reserve(0);
        assert_eq!(source.next(), 1);
    }

    #[test]
    fn clock_blocks_do_not_overlap() {
        let source = TokenSource::clock();
        let block = source.reserve(5);
        let tokens: Vec<u64> = (0..5).map(|_| block.next()).collect();
        let after = source.next();
        assert!(tokens.windows(2).all(|w| w[1] == w[0] + 1));
        assert!(after > tokens[4]);
    }

    #[test]
    fn mode_selects_source() {
        assert!(matches!(
            TokenSource::from_mode(TokenMode::Clock),
            TokenSource::Clock(_)
        ));
        assert!(matches!(TokenSource::default(), TokenSource::Counter(_)));
    }
}
