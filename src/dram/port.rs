//! Boundary between the scheduler and the rest of the memory controller.
//!
//! The scheduler only makes decisions. Queue contents, command legality and the
//! side effects of issuing a command all live behind [`CommandPort`].

use crate::dram::request::{QueueKind, Request};

pub trait CommandPort {
    /// Pending requests of one queue on `channel`, oldest first.
    fn queue(&self, channel: usize, kind: QueueKind) -> &[Request];

    fn queue_len(&self, channel: usize, kind: QueueKind) -> usize {
        self.queue(channel, kind).len()
    }

    /// Issues `request.next_command`. Returns whether the command was accepted.
    fn issue_request_command(&mut self, channel: usize, request: &Request) -> bool;

    fn is_precharge_allowed(&self, channel: usize, rank: usize, bank: usize) -> bool;

    /// Issues an explicit precharge to one bank. Returns whether it was accepted.
    fn issue_precharge_command(&mut self, channel: usize, rank: usize, bank: usize) -> bool;

    /// Whether any command went out on `channel` during the current cycle.
    fn command_issued_current_cycle(&self, channel: usize) -> bool;
}
