use std::fmt::{self, Display, Formatter};

/// The command a queued request needs next, as decided by the timing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DramCommand {
    ColRead,
    ColWrite,
    #[default]
    Activate,
    Precharge,
    Other,
}

impl DramCommand {
    /// Column accesses are serviced out of an already-open row.
    pub fn is_column(self) -> bool {
        matches!(self, Self::ColRead | Self::ColWrite)
    }

    pub fn is_row(self) -> bool {
        matches!(self, Self::Activate | Self::Precharge)
    }

    fn short(self) -> &'static str {
        match self {
            Self::ColRead => "COL_RD",
            Self::ColWrite => "COL_WR",
            Self::Activate => "ACT",
            Self::Precharge => "PRE",
            Self::Other => "OTHER",
        }
    }
}

impl Display for DramCommand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.short())
    }
}
