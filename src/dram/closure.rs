/// Banks that may be precharged early: the last command they serviced was a
/// column access by a thread other than the channel's highest-priority thread.
#[derive(Debug, Clone, Default)]
pub struct ClosureTable {
    num_ranks: usize,
    num_banks: usize,
    // [channel][rank][bank], flattened
    recent_colacc: Vec<bool>,
}

impl ClosureTable {
    pub fn new(num_channels: usize, num_ranks: usize, num_banks: usize) -> Self {
        Self {
            num_ranks,
            num_banks,
            recent_colacc: vec![false; num_channels * num_ranks * num_banks],
        }
    }

    fn index(&self, channel: usize, rank: usize, bank: usize) -> usize {
        assert!(rank < self.num_ranks, "rank id out of range");
        assert!(bank < self.num_banks, "bank id out of range");
        let idx = (channel * self.num_ranks + rank) * self.num_banks + bank;
        assert!(idx < self.recent_colacc.len(), "channel id out of range");
        idx
    }

    pub fn is_candidate(&self, channel: usize, rank: usize, bank: usize) -> bool {
        self.recent_colacc[self.index(channel, rank, bank)]
    }

    pub fn set(&mut self, channel: usize, rank: usize, bank: usize, candidate: bool) {
        let idx = self.index(channel, rank, bank);
        self.recent_colacc[idx] = candidate;
    }

    pub fn clear(&mut self, channel: usize, rank: usize, bank: usize) {
        self.set(channel, rank, bank, false);
    }

    /// Flagged (rank, bank) pairs of one channel, rank-major then bank.
    pub fn candidates(&self, channel: usize) -> Vec<(usize, usize)> {
        let per_channel = self.num_ranks * self.num_banks;
        let start = channel * per_channel;
        assert!(start + per_channel <= self.recent_colacc.len(), "channel id out of range");
        self.recent_colacc[start..start + per_channel]
            .iter()
            .enumerate()
            .filter(|(_, &flagged)| flagged)
            .map(|(i, _)| (i / self.num_banks, i % self.num_banks))
            .collect()
    }

    pub fn reset(&mut self) {
        self.recent_colacc.fill(false);
    }
}
