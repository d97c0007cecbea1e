use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dram::config::DramConfig;
use crate::dram::request::{DramAddr, QueueKind, Request, RequestId, ThreadId};
use crate::sim::toy_dram::ToyDram;
use crate::sim::Cycle;
use crate::traffic::config::TrafficConfig;

/// Seeded per-thread request streams. Threads take turns injecting, starting from a
/// rotating cursor; a request the queues reject is held and retried before that
/// thread generates anything new.
#[derive(Debug)]
pub struct TrafficGenerator {
    config: TrafficConfig,
    dram: DramConfig,
    rng: StdRng,
    remaining: Vec<u32>,
    last_addr: Vec<Option<DramAddr>>,
    stalled: Vec<Option<Request>>,
    next_id: RequestId,
    rr_cursor: usize,
}

impl TrafficGenerator {
    pub fn new(config: &TrafficConfig, dram: &DramConfig) -> Self {
        let threads = config.num_threads;
        Self {
            config: config.clone(),
            dram: *dram,
            rng: StdRng::seed_from_u64(config.seed),
            remaining: vec![config.requests_per_thread; threads],
            last_addr: vec![None; threads],
            stalled: vec![None; threads],
            next_id: 0,
            rr_cursor: 0,
        }
    }

    pub fn generated(&self) -> u64 {
        self.next_id
    }

    pub fn is_done(&self) -> bool {
        self.remaining.iter().all(|&n| n == 0) && self.stalled.iter().all(Option::is_none)
    }

    fn random_addr(&mut self) -> DramAddr {
        DramAddr::new(
            self.rng.gen_range(0..self.dram.num_channels),
            self.rng.gen_range(0..self.dram.num_ranks),
            self.rng.gen_range(0..self.dram.num_banks),
            self.rng.gen_range(0..self.config.rows_per_bank),
            self.rng.gen_range(0..self.config.columns_per_row),
        )
    }

    fn make_request(&mut self, thread: ThreadId, now: Cycle) -> Request {
        let last = self.last_addr[thread];
        let addr = match last {
            Some(prev) if self.rng.gen_bool(self.config.row_hit_rate) => DramAddr {
                column: self.rng.gen_range(0..self.config.columns_per_row),
                ..prev
            },
            _ => self.random_addr(),
        };
        let kind = if self.rng.gen_bool(self.config.write_fraction) {
            QueueKind::Write
        } else {
            QueueKind::Read
        };
        self.last_addr[thread] = Some(addr);

        let id = self.next_id;
        self.next_id += 1;
        Request::new(id, thread, kind, addr, now)
    }

    /// Offers up to `max_injections_per_cycle` requests to the queues. Returns how
    /// many were accepted.
    pub fn inject(&mut self, now: Cycle, dram: &mut ToyDram) -> usize {
        let threads = self.config.num_threads;
        let mut injected = 0;
        for offset in 0..threads {
            if injected >= self.config.max_injections_per_cycle {
                break;
            }
            let thread = (self.rr_cursor + offset) % threads;
            let mut request = match self.stalled[thread].take() {
                Some(request) => request,
                None if self.remaining[thread] > 0 => {
                    self.remaining[thread] -= 1;
                    self.make_request(thread, now)
                }
                None => continue,
            };
            request.arrival = now;
            if dram.try_enqueue(request) {
                injected += 1;
            } else {
                self.stalled[thread] = Some(request);
            }
        }
        self.rr_cursor = (self.rr_cursor + 1) % threads;
        injected
    }

    pub fn reset(&mut self) {
        *self = Self::new(&self.config, &self.dram);
    }
}
