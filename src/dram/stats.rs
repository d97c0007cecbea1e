use serde::Serialize;

use crate::dram::request::QueueKind;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SchedulerStats {
    aggressive_precharges: u64,
    read_commands: u64,
    write_commands: u64,
    column_hits: u64,
    drain_cycles: u64,
    scheduled_cycles: u64,
}

impl SchedulerStats {
    pub fn aggressive_precharges(&self) -> u64 {
        self.aggressive_precharges
    }

    pub fn read_commands(&self) -> u64 {
        self.read_commands
    }

    pub fn write_commands(&self) -> u64 {
        self.write_commands
    }

    pub fn column_hits(&self) -> u64 {
        self.column_hits
    }

    pub fn drain_cycles(&self) -> u64 {
        self.drain_cycles
    }

    pub fn scheduled_cycles(&self) -> u64 {
        self.scheduled_cycles
    }

    pub fn record_cycle(&mut self, draining: bool) {
        self.scheduled_cycles = self.scheduled_cycles.saturating_add(1);
        if draining {
            self.drain_cycles = self.drain_cycles.saturating_add(1);
        }
    }

    pub fn record_command(&mut self, kind: QueueKind, column: bool) {
        match kind {
            QueueKind::Read => self.read_commands = self.read_commands.saturating_add(1),
            QueueKind::Write => self.write_commands = self.write_commands.saturating_add(1),
        }
        if column {
            self.column_hits = self.column_hits.saturating_add(1);
        }
    }

    pub fn record_aggressive_precharge(&mut self) {
        self.aggressive_precharges = self.aggressive_precharges.saturating_add(1);
    }
}
