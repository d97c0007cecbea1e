use std::collections::HashSet;

use crate::dram::command::DramCommand;
use crate::dram::port::CommandPort;
use crate::dram::request::{DramAddr, QueueKind, Request, ThreadId};

/// Port whose queue contents and legality answers are set directly by the test.
pub(crate) struct ScriptedPort {
    reads: Vec<Vec<Request>>,
    writes: Vec<Vec<Request>>,
    issued_this_cycle: Vec<bool>,
    precharge_allowed: HashSet<(usize, usize, usize)>,
    pub issued: Vec<(usize, Request)>,
    pub precharges: Vec<(usize, usize, usize)>,
}

impl ScriptedPort {
    pub(crate) fn new(num_channels: usize) -> Self {
        Self {
            reads: vec![Vec::new(); num_channels],
            writes: vec![Vec::new(); num_channels],
            issued_this_cycle: vec![false; num_channels],
            precharge_allowed: HashSet::new(),
            issued: Vec::new(),
            precharges: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, channel: usize, mut request: Request) {
        request.addr.channel = channel;
        match request.kind {
            QueueKind::Read => self.reads[channel].push(request),
            QueueKind::Write => self.writes[channel].push(request),
        }
    }

    pub(crate) fn clear_queues(&mut self) {
        self.reads.iter_mut().for_each(Vec::clear);
        self.writes.iter_mut().for_each(Vec::clear);
    }

    pub(crate) fn begin_cycle(&mut self) {
        self.issued_this_cycle.fill(false);
    }

    pub(crate) fn mark_command_issued(&mut self, channel: usize) {
        self.issued_this_cycle[channel] = true;
    }

    pub(crate) fn allow_precharge(&mut self, channel: usize, rank: usize, bank: usize) {
        self.precharge_allowed.insert((channel, rank, bank));
    }
}

impl CommandPort for ScriptedPort {
    fn queue(&self, channel: usize, kind: QueueKind) -> &[Request] {
        match kind {
            QueueKind::Read => &self.reads[channel],
            QueueKind::Write => &self.writes[channel],
        }
    }

    fn issue_request_command(&mut self, channel: usize, request: &Request) -> bool {
        self.issued.push((channel, *request));
        self.issued_this_cycle[channel] = true;
        true
    }

    fn is_precharge_allowed(&self, channel: usize, rank: usize, bank: usize) -> bool {
        self.precharge_allowed.contains(&(channel, rank, bank))
    }

    fn issue_precharge_command(&mut self, channel: usize, rank: usize, bank: usize) -> bool {
        self.precharges.push((channel, rank, bank));
        true
    }

    fn command_issued_current_cycle(&self, channel: usize) -> bool {
        self.issued_this_cycle[channel]
    }
}

pub(crate) fn request(
    id: u64,
    thread_id: ThreadId,
    kind: QueueKind,
    rank: usize,
    bank: usize,
    next_command: DramCommand,
    command_issuable: bool,
) -> Request {
    let mut req = Request::new(id, thread_id, kind, DramAddr::new(0, rank, bank, 0x40, 0), 0);
    req.next_command = next_command;
    req.command_issuable = command_issuable;
    req
}
