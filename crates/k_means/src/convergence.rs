/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The fraction of reassigned objects fell to or below the threshold.
    Converged,
    /// The iteration cap was reached first.
    IterationCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped(StopReason),
}

#[derive(Debug, Clone)]
pub struct Convergence {
    threshold: f64,
    cap: usize,
    iterations: usize,
    delta: f64,
    state: State,
}

impl Convergence {
    pub fn new(threshold: f32, cap: usize) -> Self {
        Self {
            threshold: threshold as f64,
            cap,
            iterations: 0,
            delta: 1.0,
            state: State::Running,
        }
    }

    /// Records one finished assign-reduce-recompute step over `n` objects.
    ///
    /// The iteration counter advances only when the run keeps going, so a run
    /// that hits the cap stops with `iterations() == cap`.
    pub fn observe(&mut self, changed: usize, n: usize) -> Option<StopReason> {
        assert_eq!(self.state, State::Running, "observed a stopped run");
        assert!(n > 0);
        self.delta = changed as f64 / n as f64;
        let stop = if self.delta <= self.threshold {
            Some(StopReason::Converged)
        } else if self.iterations >= self.cap {
            Some(StopReason::IterationCap)
        } else {
            self.iterations += 1;
            None
        };
        if let Some(reason) = stop {
            self.state = State::Stopped(reason);
        }
        stop
    }

    pub fn state(&self) -> State {
        self.state
    }
    pub fn iterations(&self) -> usize {
        self.iterations
    }
    /// Fraction of objects reassigned by the latest step.
    pub fn delta(&self) -> f64 {
        self.delta
    }
}
