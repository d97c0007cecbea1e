// begin draining writes once the write queue holds more than this many entries
pub const DEFAULT_HI_WATERMARK: usize = 40;
// stop draining once the write queue is down to this many entries
pub const DEFAULT_LO_WATERMARK: usize = 20;

/// Per-channel write-drain mode with watermark hysteresis.
#[derive(Debug, Clone, Default)]
pub struct WriteDrainPolicy {
    hi_watermark: usize,
    lo_watermark: usize,
    draining: Vec<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainTransition {
    Steady,
    Started,
    Stopped,
}

impl WriteDrainPolicy {
    pub fn new(num_channels: usize, hi_watermark: usize, lo_watermark: usize) -> Self {
        assert!(lo_watermark <= hi_watermark, "low watermark above high watermark");
        Self {
            hi_watermark,
            lo_watermark,
            draining: vec![false; num_channels],
        }
    }

    pub fn is_draining(&self, channel: usize) -> bool {
        assert!(channel < self.draining.len(), "channel id out of range");
        self.draining[channel]
    }

    /// Re-evaluates drain mode for one channel given this cycle's queue occupancy.
    /// Drain mode only turns off through the low watermark; a write queue past the
    /// high watermark or an empty read queue turns it back on.
    pub fn update(&mut self, channel: usize, read_len: usize, write_len: usize) -> DrainTransition {
        let was = self.is_draining(channel);

        let mut drain = was && write_len > self.lo_watermark;
        if write_len > self.hi_watermark || read_len == 0 {
            drain = true;
        }
        self.draining[channel] = drain;

        match (was, drain) {
            (false, true) => DrainTransition::Started,
            (true, false) => DrainTransition::Stopped,
            _ => DrainTransition::Steady,
        }
    }

    pub fn reset(&mut self) {
        self.draining.fill(false);
    }
}
