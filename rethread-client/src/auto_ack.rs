use chrono::Duration;

pub const DEFAULT_DELAY_SECS: i64 = 10;

/// Countdown after which comments shown as new get acknowledged automatically
///
/// Owns no timer: the caller feeds it elapsed time, and acknowledges when
/// `advance` returns `true`. Time does not run while paused, e.g. while the
/// reader reviews new threads, and a cancelled countdown never fires.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AutoAck {
    remaining: Duration,
    paused: bool,
    state: CountdownState,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CountdownState {
    Running,
    Fired,
    Cancelled,
}

impl Default for AutoAck {
    fn default() -> AutoAck {
        AutoAck::new(Duration::seconds(DEFAULT_DELAY_SECS))
    }
}

impl AutoAck {
    pub fn new(delay: Duration) -> AutoAck {
        AutoAck {
            remaining: delay.max(Duration::zero()),
            paused: false,
            state: CountdownState::Running,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_done(&self) -> bool {
        self.state != CountdownState::Running
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn cancel(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Cancelled;
        }
    }

    /// Lets `elapsed` pass, returning `true` exactly once, when the countdown expires
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if self.paused || self.state != CountdownState::Running {
            return false;
        }
        self.remaining = (self.remaining - elapsed.max(Duration::zero())).max(Duration::zero());
        if self.remaining <= Duration::zero() {
            self.state = CountdownState::Fired;
            return true;
        }
        false
    }
}
