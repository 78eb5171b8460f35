use farm_types::{Clock, SystemClock, Timestamp};

/// Wall-clock time, or a fixed instant supplied with `--at`.
#[derive(Debug)]
pub enum FarmClock {
    System(SystemClock),
    Pinned(Timestamp),
}

impl FarmClock {
    pub fn from_flag(at: Option<u64>) -> Self {
        match at {
            Some(secs) => Self::Pinned(Timestamp::new(secs)),
            None => Self::System(SystemClock::new()),
        }
    }
}

impl Clock for FarmClock {
    fn now(&self) -> Timestamp {
        match self {
            Self::System(clock) => clock.now(),
            Self::Pinned(at) => *at,
        }
    }
}
