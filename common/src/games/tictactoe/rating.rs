use serde::{Deserialize, Serialize};

/// Persistent single-key rating owned by the front-end.
pub trait RatingStore: Send {
    fn get_rating(&self) -> i64;
    fn set_rating(&mut self, rating: i64);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryRatingStore {
    rating: i64,
    writes: usize,
}

impl InMemoryRatingStore {
    pub fn new(rating: i64) -> Self {
        Self { rating, writes: 0 }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl RatingStore for InMemoryRatingStore {
    fn get_rating(&self) -> i64 {
        self.rating
    }

    fn set_rating(&mut self, rating: i64) {
        self.rating = rating;
        self.writes += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanResult {
    Won,
    Lost,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingRules {
    pub win_bonus: i64,
    pub loss_penalty: i64,
    /// Lowest rating a loss can push to, `None` lets it go negative.
    pub floor: Option<i64>,
}

impl Default for RatingRules {
    fn default() -> Self {
        Self {
            win_bonus: 30,
            loss_penalty: 25,
            floor: Some(0),
        }
    }
}

impl RatingRules {
    /// New rating after `result`, `None` when the rating stays as is.
    pub fn next_rating(&self, current: i64, result: HumanResult) -> Option<i64> {
        match result {
            HumanResult::Won => Some(current + self.win_bonus),
            HumanResult::Lost => {
                let lowered = current - self.loss_penalty;
                Some(match self.floor {
                    Some(floor) => lowered.max(floor),
                    None => lowered,
                })
            }
            HumanResult::Draw => None,
        }
    }

    /// Reads and writes the store once for a win or loss, leaves it alone on a draw.
    pub fn record(&self, store: &mut dyn RatingStore, result: HumanResult) -> Option<i64> {
        if result == HumanResult::Draw {
            return None;
        }
        let current = store.get_rating();
        let next = self.next_rating(current, result)?;
        store.set_rating(next);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_adds_bonus() {
        let rules = RatingRules::default();
        assert_eq!(rules.next_rating(100, HumanResult::Won), Some(130));
    }

    #[test]
    fn test_loss_floored_at_zero() {
        let rules = RatingRules::default();
        assert_eq!(rules.next_rating(100, HumanResult::Lost), Some(75));
        assert_eq!(rules.next_rating(10, HumanResult::Lost), Some(0));
    }

    #[test]
    fn test_loss_unfloored() {
        let rules = RatingRules {
            floor: None,
            ..RatingRules::default()
        };
        assert_eq!(rules.next_rating(10, HumanResult::Lost), Some(-15));
    }

    #[test]
    fn test_draw_leaves_store_untouched() {
        let rules = RatingRules::default();
        let mut store = InMemoryRatingStore::new(40);
        assert_eq!(rules.record(&mut store, HumanResult::Draw), None);
        assert_eq!(store.writes(), 0);
        assert_eq!(store.get_rating(), 40);
    }

    #[test]
    fn test_record_writes_once() {
        let rules = RatingRules::default();
        let mut store = InMemoryRatingStore::new(40);
        assert_eq!(rules.record(&mut store, HumanResult::Lost), Some(15));
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get_rating(), 15);
    }
}
