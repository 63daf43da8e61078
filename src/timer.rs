/// Extreme mode grants this many seconds per letter of the target word
pub const SECONDS_PER_LETTER: u32 = 7;

/// Countdown owned by a guess session.
///
/// The clock is *engaged* while extreme mode is on and *started* once the
/// player enters the first letter of the round. It only counts down while
/// both hold; disengaging cancels it without forgetting that play started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    allotment: u32,
    remaining: u32,
    started: bool,
    engaged: bool,
}

impl Countdown {
    pub fn for_word_len(len: usize) -> Self {
        let allotment = SECONDS_PER_LETTER.saturating_mul(len as u32);
        Self {
            allotment,
            remaining: allotment,
            started: false,
            engaged: false,
        }
    }

    /// Engages the clock with the full allotment
    pub fn engage(&mut self) {
        self.engaged = true;
        self.remaining = self.allotment;
    }

    pub fn disengage(&mut self) {
        self.engaged = false;
    }

    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn allotment(&self) -> u32 {
        self.allotment
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn is_running(&self) -> bool {
        self.started && self.engaged && self.remaining > 0
    }

    /// Counts one second down. Returns true on the tick that exhausts the clock.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}
