//! 隨機來源
//!
//! 回合分配用到的所有隨機性都經由 [`RandomSource`] 注入，測試時可換成固定種子

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// 回傳 `[0, len)` 範圍內的索引，`len` 必須大於 0
    fn random_index(&mut self, len: usize) -> usize;

    /// 就地打亂順序
    fn shuffle<T>(&mut self, items: &mut [T]);
}

/// 使用執行緒本地產生器
#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn random_index(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut rand::rng());
    }
}

/// 固定種子的可重現隨機來源
#[derive(Debug, Clone)]
pub struct SeededRandom(ChaCha8Rng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn random_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);

        let picks_a: Vec<usize> = (0..16).map(|_| a.random_index(10)).collect();
        let picks_b: Vec<usize> = (0..16).map(|_| b.random_index(10)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|i| *i < 10));
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = SeededRandom::new(1);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);

        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<u32>>());
    }
}
