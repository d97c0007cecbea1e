use std::fmt::{self, Display, Formatter};

use crate::dram::command::DramCommand;
use crate::sim::Cycle;

pub type ThreadId = usize;
pub type RequestId = u64;

/// Decoded DRAM coordinates of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DramAddr {
    pub channel: usize,
    pub rank: usize,
    pub bank: usize,
    pub row: u64,
    pub column: u64,
}

impl DramAddr {
    pub fn new(channel: usize, rank: usize, bank: usize, row: u64, column: u64) -> Self {
        Self { channel, rank, bank, row, column }
    }
}

impl Display for DramAddr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "(ch {}, rank {}, bank {}, row {:#x}, col {:#x})",
            self.channel, self.rank, self.bank, self.row, self.column
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    Read,
    Write,
}

impl QueueKind {
    /// The column command that finally services a request from this queue.
    pub fn column_command(self) -> DramCommand {
        match self {
            Self::Read => DramCommand::ColRead,
            Self::Write => DramCommand::ColWrite,
        }
    }
}

/// A pending memory request as the scheduler sees it. The queue that holds it
/// refreshes `next_command` and `command_issuable` every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Request {
    pub id: RequestId,
    pub thread_id: ThreadId,
    pub kind: QueueKind,
    pub addr: DramAddr,
    pub arrival: Cycle,
    pub next_command: DramCommand,
    pub command_issuable: bool,
}

impl Request {
    pub fn new(id: RequestId, thread_id: ThreadId, kind: QueueKind, addr: DramAddr, arrival: Cycle) -> Self {
        Self {
            id,
            thread_id,
            kind,
            addr,
            arrival,
            next_command: DramCommand::Activate,
            command_issuable: false,
        }
    }
}
