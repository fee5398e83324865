//! Animated stat counters
//!
//! Each counter climbs toward its target by `target / steps` per tick and shows
//! the floor of its running value until it reaches the target, which is then
//! shown exactly. A [`CounterBoard`] drives several counters from one tick
//! source, plays at most once, and can be cancelled.

/// Ticks needed to reach the target on the portfolio sites
pub const DEFAULT_STEPS: u32 = 100;

/// A single counter animating from zero to `target`
#[derive(Debug, Clone, PartialEq)]
pub struct StatCounter {
    target: u64,
    increment: f64,
    current: f64,
    displayed: u64,
    finished: bool,
}

impl StatCounter {
    pub fn new(target: u64, steps: u32) -> Self {
        let steps = steps.max(1);
        Self {
            target,
            increment: target as f64 / f64::from(steps),
            current: 0.0,
            displayed: 0,
            finished: false,
        }
    }

    /// Advance one step and return the value to display
    pub fn tick(&mut self) -> u64 {
        if self.finished {
            return self.displayed;
        }

        self.current += self.increment;
        if self.current >= self.target as f64 {
            self.displayed = self.target;
            self.finished = true;
        } else {
            self.displayed = self.current.floor() as u64;
        }
        self.displayed
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn value(&self) -> u64 {
        self.displayed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Lifecycle of a [`CounterBoard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    Idle,
    Running,
    Finished,
    Cancelled,
}

/// A labelled group of counters sharing one tick source
#[derive(Debug, Clone)]
pub struct CounterBoard {
    counters: Vec<(String, StatCounter)>,
    state: BoardState,
    ticks: u64,
}

impl CounterBoard {
    pub fn new() -> Self {
        Self {
            counters: Vec::new(),
            state: BoardState::Idle,
            ticks: 0,
        }
    }

    pub fn add(&mut self, label: impl Into<String>, target: u64, steps: u32) {
        self.counters.push((label.into(), StatCounter::new(target, steps)));
    }

    /// Start the animation; returns false if it has already been started once
    pub fn start(&mut self) -> bool {
        if self.state != BoardState::Idle {
            log::trace!("Counter board already played ({:?})", self.state);
            return false;
        }
        self.state = BoardState::Running;
        log::debug!("Starting {} counters", self.counters.len());
        true
    }

    /// Advance every counter once; returns true while more ticks are needed
    pub fn tick(&mut self) -> bool {
        if self.state != BoardState::Running {
            return false;
        }

        self.ticks += 1;
        for (_, counter) in &mut self.counters {
            counter.tick();
        }

        if self.counters.iter().all(|(_, counter)| counter.is_finished()) {
            log::debug!("Counters finished after {} ticks", self.ticks);
            self.state = BoardState::Finished;
            return false;
        }
        true
    }

    /// Stop ticking, leaving every counter at its current value
    pub fn cancel(&mut self) {
        if self.state == BoardState::Running || self.state == BoardState::Idle {
            self.state = BoardState::Cancelled;
        }
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == BoardState::Finished
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current display values with their labels
    pub fn values(&self) -> Vec<(&str, u64)> {
        self.counters
            .iter()
            .map(|(label, counter)| (label.as_str(), counter.value()))
            .collect()
    }
}

impl Default for CounterBoard {
    fn default() -> Self {
        Self::new()
    }
}
