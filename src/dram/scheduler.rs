//! Priority Based Fair Scheduling (PBFS).
//!
//! FCFS over the read or write queue, picked with watermark hysteresis, plus a
//! close-page heuristic: a bank whose last column access came from a thread other
//! than the channel's highest-priority thread becomes a closure candidate, and is
//! precharged on any cycle where the channel would otherwise sit idle.
//!
//! Thread priority is recomputed every cycle from cumulative per-thread row-buffer
//! hits and accesses on the channel.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::base::behavior::*;
use crate::base::module::{module, IsModule, ModuleBase};
use crate::dram::closure::ClosureTable;
use crate::dram::config::SchedulerConfig;
use crate::dram::drain::{DrainTransition, WriteDrainPolicy};
use crate::dram::port::CommandPort;
use crate::dram::priority::ThreadPriorities;
use crate::dram::request::{QueueKind, Request, ThreadId};
use crate::dram::stats::SchedulerStats;

#[derive(Debug, Default)]
pub struct SchedulerState {
    drain: WriteDrainPolicy,
    closure: ClosureTable,
    priorities: ThreadPriorities,
    stats: SchedulerStats,
}

impl SchedulerState {
    fn new(config: &SchedulerConfig) -> Self {
        let dram = &config.dram;
        Self {
            drain: WriteDrainPolicy::new(dram.num_channels, config.hi_watermark, config.lo_watermark),
            closure: ClosureTable::new(dram.num_channels, dram.num_ranks, dram.num_banks),
            priorities: ThreadPriorities::new(dram.num_channels, config.max_threads),
            stats: SchedulerStats::default(),
        }
    }
}

/// What one `schedule` call did on its channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleOutcome {
    pub draining: bool,
    pub issued: Option<Request>,
    /// (rank, bank) pairs closed early this cycle
    pub precharged: Vec<(usize, usize)>,
}

pub struct PbfsScheduler {
    base: ModuleBase<SchedulerState, SchedulerConfig>,
}

impl PbfsScheduler {
    pub fn new(config: Arc<SchedulerConfig>) -> Self {
        let dram = &config.dram;
        info!(
            "pbfs scheduler: {} channels x {} ranks x {} banks, {} thread slots",
            dram.num_channels, dram.num_ranks, dram.num_banks, config.max_threads
        );
        info!(
            "write drain watermarks hi={} lo={}, break-even hit rate {:.3}",
            config.hi_watermark,
            config.lo_watermark,
            config.break_even_hit_rate()
        );
        let mut me = PbfsScheduler {
            base: ModuleBase::with_state(SchedulerState::new(&config)),
        };
        me.init_conf(config);
        me
    }

    pub fn break_even_hit_rate(&self) -> f64 {
        self.conf().break_even_hit_rate()
    }

    /// Makes this cycle's scheduling decision for one channel.
    pub fn schedule<P: CommandPort + ?Sized>(&mut self, channel: usize, port: &mut P) -> CycleOutcome {
        assert!(channel < self.conf().dram.num_channels, "channel id out of range");

        let read_len = port.queue_len(channel, QueueKind::Read);
        let write_len = port.queue_len(channel, QueueKind::Write);
        let now = self.now();
        let state = self.state_mut();
        match state.drain.update(channel, read_len, write_len) {
            DrainTransition::Started => debug!(
                "cycle {now} ch {channel}: start write drain (rdq {read_len}, wrq {write_len})"
            ),
            DrainTransition::Stopped => debug!(
                "cycle {now} ch {channel}: stop write drain (rdq {read_len}, wrq {write_len})"
            ),
            DrainTransition::Steady => {}
        }
        let draining = state.drain.is_draining(channel);
        state.stats.record_cycle(draining);

        let kind = if draining { QueueKind::Write } else { QueueKind::Read };
        let issued = self.issue_first_ready(channel, kind, port);

        let precharged = if port.command_issued_current_cycle(channel) {
            Vec::new()
        } else {
            self.precharge_idle_banks(channel, port)
        };

        self.state_mut().priorities.recompute(channel);

        CycleOutcome {
            draining,
            issued,
            precharged,
        }
    }

    // oldest request whose next command can go out this cycle
    fn issue_first_ready<P: CommandPort + ?Sized>(
        &mut self,
        channel: usize,
        kind: QueueKind,
        port: &mut P,
    ) -> Option<Request> {
        let request = *port
            .queue(channel, kind)
            .iter()
            .find(|req| req.command_issuable)?;
        let thread = request.thread_id;
        let (rank, bank) = (request.addr.rank, request.addr.bank);
        let cmd = request.next_command;

        let now = self.now();
        let state = self.state_mut();
        if cmd.is_column() {
            let candidate = thread != state.priorities.highest_priority(channel);
            state.closure.set(channel, rank, bank, candidate);
            state.priorities.record_hit(channel, thread);
        } else if cmd.is_row() {
            state.closure.clear(channel, rank, bank);
        }

        if !port.issue_request_command(channel, &request) {
            warn!("cycle {now} ch {channel}: port refused issuable {cmd} for request {}", request.id);
        }
        state.priorities.record_access(channel, thread);
        state.stats.record_command(kind, cmd.is_column());
        debug!(
            "cycle {now} ch {channel}: {cmd} for request {} (thread {thread}) at {}",
            request.id, request.addr
        );
        Some(request)
    }

    fn precharge_idle_banks<P: CommandPort + ?Sized>(&mut self, channel: usize, port: &mut P) -> Vec<(usize, usize)> {
        let now = self.now();
        let state = self.state_mut();
        let mut precharged = Vec::new();
        for (rank, bank) in state.closure.candidates(channel) {
            if port.is_precharge_allowed(channel, rank, bank)
                && port.issue_precharge_command(channel, rank, bank)
            {
                state.stats.record_aggressive_precharge();
                state.closure.clear(channel, rank, bank);
                precharged.push((rank, bank));
                debug!("cycle {now} ch {channel}: aggressive precharge rank {rank} bank {bank}");
            }
        }
        precharged
    }

    pub fn highest_priority_thread(&self, channel: usize) -> ThreadId {
        self.state().priorities.highest_priority(channel)
    }

    pub fn is_draining(&self, channel: usize) -> bool {
        self.state().drain.is_draining(channel)
    }

    pub fn is_closure_candidate(&self, channel: usize, rank: usize, bank: usize) -> bool {
        self.state().closure.is_candidate(channel, rank, bank)
    }

    pub fn accesses(&self, channel: usize, thread: ThreadId) -> u64 {
        self.state().priorities.accesses(channel, thread)
    }

    pub fn hits(&self, channel: usize, thread: ThreadId) -> u64 {
        self.state().priorities.hits(channel, thread)
    }

    pub fn priority(&self, channel: usize, thread: ThreadId) -> f64 {
        self.state().priorities.score(channel, thread)
    }

    pub fn aggressive_precharges(&self) -> u64 {
        self.state().stats.aggressive_precharges()
    }

    pub fn stats(&self) -> &SchedulerStats {
        &self.state().stats
    }

    pub fn report_statistics(&self) -> String {
        let report = format!("Number of aggressive precharges: {}", self.aggressive_precharges());
        info!("{report}");
        report
    }
}

module!(PbfsScheduler, SchedulerState, SchedulerConfig,);

impl ModuleBehaviors for PbfsScheduler {
    fn tick_one(&mut self) {
        self.base.cycle += 1;
    }

    fn reset(&mut self) {
        let state = &mut self.base.state;
        state.drain.reset();
        state.closure.reset();
        state.priorities.reset();
        state.stats = SchedulerStats::default();
        self.base.cycle = 0;
    }
}
