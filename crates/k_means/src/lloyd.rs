use crate::accumulator::{merge, Accumulator, AtomicAccumulator};
use crate::assign::{assign_atomic, assign_privatized, UNASSIGNED};
use crate::convergence::{Convergence, State, StopReason};
use crate::recompute::recompute;
use base::error::KMeansError;
use base::options::{KMeansOptions, Reduction};
use common::vec2::Vec2;

/// Final state of a run.
#[derive(Debug, Clone)]
pub struct KMeansOutcome {
    pub centroids: Vec2<f32>,
    /// Cluster index of every object, in object order.
    pub membership: Vec<usize>,
    pub iterations: usize,
    /// Fraction of objects reassigned by the last step.
    pub delta: f64,
    pub stop: StopReason,
}

enum Reducer {
    Atomic(AtomicAccumulator),
    Privatized {
        locals: Vec<Accumulator>,
        global: Accumulator,
    },
}

pub struct LloydKMeans<'a> {
    samples: &'a Vec2<f32>,
    centroids: Vec2<f32>,
    membership: Vec<usize>,
    workers: usize,
    reducer: Reducer,
    convergence: Convergence,
}

impl<'a> LloydKMeans<'a> {
    pub fn new(
        samples: &'a Vec2<f32>,
        centroids: Vec2<f32>,
        options: &KMeansOptions,
        workers: usize,
    ) -> Result<Self, KMeansError> {
        check(samples, &centroids)?;
        let n = samples.shape_0();
        let c = centroids.shape_0();
        let dims = samples.shape_1();
        let workers = std::cmp::max(workers, 1);
        let allocation = |_| KMeansError::Allocation {
            clusters: c,
            dims,
            workers,
        };

        let reducer = match options.reduction {
            Reduction::Atomic => {
                Reducer::Atomic(AtomicAccumulator::try_new(c, dims).map_err(allocation)?)
            }
            Reduction::Privatized => {
                let mut locals = Vec::new();
                locals.try_reserve_exact(workers).map_err(allocation)?;
                for _ in 0..workers {
                    locals.push(Accumulator::try_new(c, dims).map_err(allocation)?);
                }
                let global = Accumulator::try_new(c, dims).map_err(allocation)?;
                Reducer::Privatized { locals, global }
            }
        };
        let mut membership = Vec::new();
        membership.try_reserve_exact(n).map_err(allocation)?;
        membership.resize(n, UNASSIGNED);

        log::debug!(
            "k-means over {n} objects of {dims} coordinates into {c} clusters, \
            {workers} workers, {:?} reduction",
            options.reduction
        );

        Ok(Self {
            samples,
            centroids,
            membership,
            workers,
            reducer,
            convergence: Convergence::new(options.threshold, options.max_iterations as usize),
        })
    }

    /// One assign, reduce and recompute step. Returns how many objects changed cluster.
    pub fn iterate(&mut self) -> usize {
        let samples = self.samples;
        match &mut self.reducer {
            Reducer::Atomic(shared) => {
                let changed = assign_atomic(
                    samples,
                    &self.centroids,
                    &mut self.membership,
                    shared,
                    self.workers,
                );
                recompute(&*shared, &mut self.centroids);
                changed
            }
            Reducer::Privatized { locals, global } => {
                let changed =
                    assign_privatized(samples, &self.centroids, &mut self.membership, locals);
                merge(locals, global);
                debug_assert_eq!(global.total(), samples.shape_0() as u64);
                recompute(&*global, &mut self.centroids);
                changed
            }
        }
    }

    /// Runs [`LloydKMeans::iterate`] and feeds the result to the convergence controller.
    pub fn step(&mut self) -> Option<StopReason> {
        let changed = self.iterate();
        let stop = self.convergence.observe(changed, self.samples.shape_0());
        log::debug!(
            "iteration {}: {changed} objects reassigned, delta {:.6}",
            self.convergence.iterations(),
            self.convergence.delta()
        );
        stop
    }

    pub fn run(mut self) -> KMeansOutcome {
        let stop = loop {
            if let Some(stop) = self.step() {
                break stop;
            }
        };
        match stop {
            StopReason::Converged => log::info!(
                "converged after {} iterations, delta {:.6}",
                self.convergence.iterations(),
                self.convergence.delta()
            ),
            StopReason::IterationCap => log::info!(
                "stopped at the iteration cap of {}, delta {:.6}",
                self.convergence.iterations(),
                self.convergence.delta()
            ),
        }
        KMeansOutcome {
            iterations: self.convergence.iterations(),
            delta: self.convergence.delta(),
            stop,
            centroids: self.centroids,
            membership: self.membership,
        }
    }

    pub fn centroids(&self) -> &Vec2<f32> {
        &self.centroids
    }
    pub fn membership(&self) -> &[usize] {
        &self.membership
    }
    pub fn state(&self) -> State {
        self.convergence.state()
    }
}

fn check(samples: &Vec2<f32>, centroids: &Vec2<f32>) -> Result<(), KMeansError> {
    let n = samples.shape_0();
    let c = centroids.shape_0();
    if n == 0 || samples.shape_1() == 0 {
        return Err(KMeansError::EmptyDataset);
    }
    if c == 0 {
        return Err(KMeansError::EmptyClusters);
    }
    if centroids.shape_1() != samples.shape_1() {
        return Err(KMeansError::DimensionMismatch {
            expected: samples.shape_1(),
            actual: centroids.shape_1(),
        });
    }
    if c > n {
        return Err(KMeansError::InvalidClusterCount { k: c, n });
    }
    if let Some((first, second)) = find_duplicate(centroids) {
        return Err(KMeansError::DuplicateCentroids { first, second });
    }
    Ok(())
}

/// Returns the lowest pair of indices whose rows are identical, if any.
pub fn find_duplicate(centroids: &Vec2<f32>) -> Option<(usize, usize)> {
    let mut order = (0..centroids.shape_0()).collect::<Vec<_>>();
    order.sort_by(|&l, &r| {
        let (l, r) = (&centroids[(l,)], &centroids[(r,)]);
        l.iter()
            .zip(r)
            // `+ 0.0` folds -0.0 into 0.0 so the order agrees with `==`
            .map(|(x, y)| (x + 0.0).total_cmp(&(y + 0.0)))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
        .windows(2)
        .filter(|w| centroids[(w[0],)] == centroids[(w[1],)])
        .map(|w| (w[0].min(w[1]), w[0].max(w[1])))
        .min()
}
