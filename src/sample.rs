// sample.rs - 无放回随机抽样

use rand::seq::index;
use rand::Rng;

/// 被选中记录的位置集合（1-based，按文件顺序）
#[derive(Debug, Clone)]
pub struct Selection {
    positions: Vec<usize>,
}

impl Selection {
    /// 从 [1, total] 中均匀抽取 `amount` 个互不相同的位置
    ///
    /// 调用方需保证 `amount <= total`。
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, total: usize, amount: usize) -> Self {
        debug_assert!(amount <= total);
        let mut positions: Vec<usize> = index::sample(rng, total, amount)
            .into_iter()
            .map(|i| i + 1)
            .collect();
        positions.sort_unstable();
        Selection { positions }
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.binary_search(&position).is_ok()
    }

    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    #[cfg(test)]
    fn positions(&self) -> &[usize] {
        &self.positions
    }
}
