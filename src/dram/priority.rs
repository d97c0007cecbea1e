use crate::dram::request::ThreadId;

pub const DEFAULT_MAX_THREADS: usize = 64;

/// Cumulative per-(channel, thread) row-buffer statistics and the priority
/// score derived from them.
#[derive(Debug, Clone, Default)]
pub struct ThreadPriorities {
    max_threads: usize,
    accesses: Vec<Vec<u64>>,
    hits: Vec<Vec<u64>>,
    scores: Vec<Vec<f64>>,
}

impl ThreadPriorities {
    pub fn new(num_channels: usize, max_threads: usize) -> Self {
        Self {
            max_threads,
            accesses: vec![vec![0; max_threads]; num_channels],
            hits: vec![vec![0; max_threads]; num_channels],
            scores: vec![vec![0.0; max_threads]; num_channels],
        }
    }

    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    fn check(&self, channel: usize, thread: ThreadId) {
        assert!(channel < self.accesses.len(), "channel id out of range");
        assert!(thread < self.max_threads, "thread id out of range");
    }

    pub fn accesses(&self, channel: usize, thread: ThreadId) -> u64 {
        self.check(channel, thread);
        self.accesses[channel][thread]
    }

    pub fn hits(&self, channel: usize, thread: ThreadId) -> u64 {
        self.check(channel, thread);
        self.hits[channel][thread]
    }

    pub fn score(&self, channel: usize, thread: ThreadId) -> f64 {
        self.check(channel, thread);
        self.scores[channel][thread]
    }

    pub fn record_access(&mut self, channel: usize, thread: ThreadId) {
        self.check(channel, thread);
        let ctr = &mut self.accesses[channel][thread];
        *ctr = ctr.saturating_add(1);
    }

    pub fn record_hit(&mut self, channel: usize, thread: ThreadId) {
        self.check(channel, thread);
        let ctr = &mut self.hits[channel][thread];
        *ctr = ctr.saturating_add(1);
    }

    /// Index of the thread holding the minimum score on `channel`, first one on ties.
    /// The minimum is what the close-page heuristic treats as "highest priority".
    pub fn highest_priority(&self, channel: usize) -> ThreadId {
        assert!(channel < self.scores.len(), "channel id out of range");
        let scores = &self.scores[channel];
        let mut best = 0;
        for (thread, &score) in scores.iter().enumerate() {
            if scores[best] > score {
                best = thread;
            }
        }
        best
    }

    /// Score = share of the channel's hits + share of the channel's accesses.
    /// Scores are left alone until both channel totals are nonzero.
    pub fn recompute(&mut self, channel: usize) {
        assert!(channel < self.scores.len(), "channel id out of range");
        let total_accesses: u64 = self.accesses[channel].iter().sum();
        let total_hits: u64 = self.hits[channel].iter().sum();
        if total_accesses == 0 || total_hits == 0 {
            return;
        }

        let accesses = &self.accesses[channel];
        let hits = &self.hits[channel];
        for (thread, score) in self.scores[channel].iter_mut().enumerate() {
            *score = hits[thread] as f64 / total_hits as f64
                + accesses[thread] as f64 / total_accesses as f64;
        }
    }

    pub fn reset(&mut self) {
        self.accesses.iter_mut().for_each(|ch| ch.fill(0));
        self.hits.iter_mut().for_each(|ch| ch.fill(0));
        self.scores.iter_mut().for_each(|ch| ch.fill(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::ThreadPriorities;

    fn record(prio: &mut ThreadPriorities, channel: usize, thread: usize, accesses: u64, hits: u64) {
        for _ in 0..accesses {
            prio.record_access(channel, thread);
        }
        for _ in 0..hits {
            prio.record_hit(channel, thread);
        }
    }

    #[test]
    fn scores_are_hit_share_plus_access_share() {
        let mut prio = ThreadPriorities::new(1, 64);
        record(&mut prio, 0, 0, 10, 5);
        record(&mut prio, 0, 1, 30, 15);
        prio.recompute(0);

        assert!((prio.score(0, 0) - 0.5).abs() < 1e-12);
        assert!((prio.score(0, 1) - 1.5).abs() < 1e-12);
        // idle slots fall to zero, and the minimum wins
        assert_eq!(prio.score(0, 2), 0.0);
        assert_eq!(prio.highest_priority(0), 2);
    }

    #[test]
    fn minimum_score_is_highest_priority() {
        let mut prio = ThreadPriorities::new(1, 2);
        record(&mut prio, 0, 0, 10, 5);
        record(&mut prio, 0, 1, 30, 15);
        prio.recompute(0);
        assert_eq!(prio.highest_priority(0), 0);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let prio = ThreadPriorities::new(1, 8);
        assert_eq!(prio.highest_priority(0), 0);

        let mut prio = ThreadPriorities::new(1, 4);
        record(&mut prio, 0, 0, 4, 2);
        record(&mut prio, 0, 1, 1, 1);
        record(&mut prio, 0, 2, 1, 1);
        record(&mut prio, 0, 3, 4, 2);
        prio.recompute(0);
        assert_eq!(prio.highest_priority(0), 1);
    }

    #[test]
    fn zero_totals_keep_previous_scores() {
        let mut prio = ThreadPriorities::new(1, 2);
        // accesses without any hits leave the hit total at zero
        record(&mut prio, 0, 1, 3, 0);
        prio.recompute(0);
        assert_eq!(prio.score(0, 0), 0.0);
        assert_eq!(prio.score(0, 1), 0.0);

        record(&mut prio, 0, 1, 0, 1);
        prio.recompute(0);
        assert!((prio.score(0, 1) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_everything() {
        let mut prio = ThreadPriorities::new(2, 4);
        record(&mut prio, 1, 3, 2, 2);
        prio.recompute(1);
        prio.reset();
        assert_eq!(prio.accesses(1, 3), 0);
        assert_eq!(prio.hits(1, 3), 0);
        assert_eq!(prio.score(1, 3), 0.0);
    }

    #[test]
    #[should_panic(expected = "thread id out of range")]
    fn rejects_thread_beyond_capacity() {
        let mut prio = ThreadPriorities::new(1, 4);
        prio.record_access(0, 4);
    }
}
