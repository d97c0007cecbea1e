use std::sync::Arc;

use crate::base::behavior::*;
use crate::base::module::{module, IsModule, ModuleBase};
use crate::dram::command::DramCommand;
use crate::dram::config::DramConfig;
use crate::dram::port::CommandPort;
use crate::dram::request::{QueueKind, Request};
use crate::sim::Cycle;

// Minimal stand-in for the controller around the scheduler: per-channel request
// queues plus one open-row register and ready time per bank. Only enough timing to
// give every request a next command and an issuable flag.

#[derive(Debug, Clone, Copy, Default)]
struct BankState {
    open_row: Option<u64>,
    ready_at: Cycle,
}

#[derive(Debug, Default)]
pub struct ToyDramState {
    reads: Vec<Vec<Request>>,
    writes: Vec<Vec<Request>>,
    // [channel][rank][bank], flattened
    banks: Vec<BankState>,
    issued: Vec<bool>,
    retired: u64,
}

pub struct ToyDram {
    base: ModuleBase<ToyDramState, DramConfig>,
}

fn bank_index(config: &DramConfig, channel: usize, rank: usize, bank: usize) -> usize {
    assert!(channel < config.num_channels, "channel id out of range");
    assert!(rank < config.num_ranks && bank < config.num_banks, "bank out of range");
    (channel * config.num_ranks + rank) * config.num_banks + bank
}

impl ToyDram {
    pub fn new(config: Arc<DramConfig>) -> Self {
        let mut me = ToyDram {
            base: ModuleBase::with_state(Self::empty_state(&config)),
        };
        me.init_conf(config);
        me
    }

    fn empty_state(config: &DramConfig) -> ToyDramState {
        let channels = config.num_channels;
        ToyDramState {
            reads: vec![Vec::new(); channels],
            writes: vec![Vec::new(); channels],
            banks: vec![BankState::default(); channels * config.banks_per_channel()],
            issued: vec![false; channels],
            retired: 0,
        }
    }

    /// Appends a request to the tail of its queue. Returns false if that queue is full.
    pub fn try_enqueue(&mut self, request: Request) -> bool {
        let capacity = self.conf().queue_capacity;
        let channel = request.addr.channel;
        assert!(channel < self.conf().num_channels, "channel id out of range");
        let queue = match request.kind {
            QueueKind::Read => &mut self.base.state.reads[channel],
            QueueKind::Write => &mut self.base.state.writes[channel],
        };
        if queue.len() >= capacity {
            return false;
        }
        queue.push(request);
        true
    }

    pub fn pending(&self) -> usize {
        let state = self.state();
        state.reads.iter().chain(state.writes.iter()).map(Vec::len).sum()
    }

    pub fn retired(&self) -> u64 {
        self.state().retired
    }

    pub fn open_row(&self, channel: usize, rank: usize, bank: usize) -> Option<u64> {
        self.state().banks[bank_index(self.conf(), channel, rank, bank)].open_row
    }

    /// Moves to cycle `now`: clears the per-channel issue flags and recomputes the
    /// next command and issuability of every queued request.
    pub fn begin_cycle(&mut self, now: Cycle) {
        let config = *self.conf();
        self.base.cycle = now;
        let ToyDramState { reads, writes, banks, issued, .. } = &mut self.base.state;
        issued.fill(false);
        for channel in 0..config.num_channels {
            for req in reads[channel].iter_mut().chain(writes[channel].iter_mut()) {
                let bank = banks[bank_index(&config, channel, req.addr.rank, req.addr.bank)];
                req.next_command = match bank.open_row {
                    Some(row) if row == req.addr.row => req.kind.column_command(),
                    Some(_) => DramCommand::Precharge,
                    None => DramCommand::Activate,
                };
                req.command_issuable = bank.ready_at <= now;
            }
        }
    }
}

impl CommandPort for ToyDram {
    fn queue(&self, channel: usize, kind: QueueKind) -> &[Request] {
        match kind {
            QueueKind::Read => &self.state().reads[channel],
            QueueKind::Write => &self.state().writes[channel],
        }
    }

    fn issue_request_command(&mut self, channel: usize, request: &Request) -> bool {
        let config = *self.conf();
        let now = self.now();
        let state = &mut self.base.state;
        if state.issued[channel] {
            return false;
        }
        let queue = match request.kind {
            QueueKind::Read => &mut state.reads[channel],
            QueueKind::Write => &mut state.writes[channel],
        };
        let Some(pos) = queue.iter().position(|req| req.id == request.id) else {
            return false;
        };
        let queued = queue[pos];
        if !queued.command_issuable {
            return false;
        }

        let bank = &mut state.banks[bank_index(&config, channel, queued.addr.rank, queued.addr.bank)];
        match queued.next_command {
            DramCommand::Activate => {
                bank.open_row = Some(queued.addr.row);
                bank.ready_at = now + config.t_rcd;
            }
            DramCommand::Precharge => {
                bank.open_row = None;
                bank.ready_at = now + config.t_rp;
            }
            DramCommand::ColRead | DramCommand::ColWrite => {
                bank.ready_at = now + config.t_cas;
                queue.remove(pos);
                state.retired += 1;
            }
            DramCommand::Other => {}
        }
        state.issued[channel] = true;
        true
    }

    fn is_precharge_allowed(&self, channel: usize, rank: usize, bank: usize) -> bool {
        let bank = self.state().banks[bank_index(self.conf(), channel, rank, bank)];
        bank.open_row.is_some() && bank.ready_at <= self.now()
    }

    fn issue_precharge_command(&mut self, channel: usize, rank: usize, bank: usize) -> bool {
        if !self.is_precharge_allowed(channel, rank, bank) {
            return false;
        }
        let config = *self.conf();
        let now = self.now();
        let state = &mut self.base.state;
        let bank = &mut state.banks[bank_index(&config, channel, rank, bank)];
        bank.open_row = None;
        bank.ready_at = now + config.t_rp;
        state.issued[channel] = true;
        true
    }

    fn command_issued_current_cycle(&self, channel: usize) -> bool {
        self.state().issued[channel]
    }
}

module!(ToyDram, ToyDramState, DramConfig,);

impl ModuleBehaviors for ToyDram {
    fn tick_one(&mut self) {
        let next = self.now() + 1;
        self.begin_cycle(next);
    }

    fn reset(&mut self) {
        self.base.state = Self::empty_state(self.conf());
        self.base.cycle = 0;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::ToyDram;
    use crate::base::behavior::ModuleBehaviors;
    use crate::base::module::IsModule;
    use crate::dram::command::DramCommand;
    use crate::dram::config::DramConfig;
    use crate::dram::port::CommandPort;
    use crate::dram::request::{DramAddr, QueueKind, Request};

    fn dram() -> ToyDram {
        let config = DramConfig {
            num_channels: 2,
            t_rp: 3,
            t_rcd: 4,
            t_cas: 2,
            queue_capacity: 2,
            ..DramConfig::default()
        };
        ToyDram::new(Arc::new(config))
    }

    fn read(id: u64, channel: usize, bank: usize, row: u64) -> Request {
        Request::new(id, 0, QueueKind::Read, DramAddr::new(channel, 0, bank, row, 0), 0)
    }

    fn head(dram: &ToyDram, channel: usize, kind: QueueKind) -> Request {
        dram.queue(channel, kind)[0]
    }

    #[test]
    fn request_walks_activate_then_column() {
        let mut dram = dram();
        assert!(dram.try_enqueue(read(1, 0, 3, 7)));
        dram.begin_cycle(0);
        let req = head(&dram, 0, QueueKind::Read);
        assert_eq!(req.next_command, DramCommand::Activate);
        assert!(req.command_issuable);
        assert!(dram.issue_request_command(0, &req));
        assert!(dram.command_issued_current_cycle(0));
        assert_eq!(dram.open_row(0, 0, 3), Some(7));

        dram.tick_one();
        let req = head(&dram, 0, QueueKind::Read);
        assert_eq!(req.next_command, DramCommand::ColRead);
        assert!(!req.command_issuable);
        assert!(!dram.issue_request_command(0, &req));

        dram.begin_cycle(4);
        let req = head(&dram, 0, QueueKind::Read);
        assert!(req.command_issuable);
        assert!(dram.issue_request_command(0, &req));
        assert_eq!(dram.pending(), 0);
        assert_eq!(dram.retired(), 1);
    }

    #[test]
    fn other_open_row_needs_precharge() {
        let mut dram = dram();
        dram.try_enqueue(read(1, 0, 0, 1));
        dram.begin_cycle(0);
        let req = head(&dram, 0, QueueKind::Read);
        dram.issue_request_command(0, &req);

        dram.try_enqueue(read(2, 0, 0, 2));
        dram.begin_cycle(10);
        let queue = dram.queue(0, QueueKind::Read);
        assert_eq!(queue[0].next_command, DramCommand::ColRead);
        assert_eq!(queue[1].next_command, DramCommand::Precharge);
    }

    #[test]
    fn one_request_command_per_channel_per_cycle() {
        let mut dram = dram();
        dram.try_enqueue(read(1, 1, 0, 1));
        dram.try_enqueue(read(2, 1, 1, 1));
        dram.begin_cycle(0);
        let first = dram.queue(1, QueueKind::Read)[0];
        let second = dram.queue(1, QueueKind::Read)[1];
        assert!(dram.issue_request_command(1, &first));
        assert!(!dram.issue_request_command(1, &second));
        assert!(!dram.command_issued_current_cycle(0));
    }

    #[test]
    fn queues_are_bounded() {
        let mut dram = dram();
        assert!(dram.try_enqueue(read(1, 0, 0, 0)));
        assert!(dram.try_enqueue(read(2, 0, 1, 0)));
        assert!(!dram.try_enqueue(read(3, 0, 2, 0)));
        assert!(dram.try_enqueue(read(4, 1, 2, 0)));
        assert_eq!(dram.pending(), 3);
    }

    #[test]
    fn precharge_needs_open_and_ready_bank() {
        let mut dram = dram();
        dram.begin_cycle(0);
        assert!(!dram.is_precharge_allowed(0, 0, 5));
        assert!(!dram.issue_precharge_command(0, 0, 5));

        dram.try_enqueue(read(1, 0, 5, 9));
        dram.begin_cycle(1);
        let req = head(&dram, 0, QueueKind::Read);
        dram.issue_request_command(0, &req);
        assert!(!dram.is_precharge_allowed(0, 0, 5));

        dram.begin_cycle(5);
        assert!(dram.is_precharge_allowed(0, 0, 5));
        assert!(dram.issue_precharge_command(0, 0, 5));
        assert_eq!(dram.open_row(0, 0, 5), None);
        assert!(dram.command_issued_current_cycle(0));
    }

    #[test]
    fn reset_drops_everything() {
        let mut dram = dram();
        dram.try_enqueue(read(1, 0, 0, 0));
        dram.begin_cycle(0);
        let req = head(&dram, 0, QueueKind::Read);
        dram.issue_request_command(0, &req);
        dram.reset();
        assert_eq!(dram.pending(), 0);
        assert_eq!(dram.open_row(0, 0, 0), None);
        assert_eq!(dram.now(), 0);
    }
}
