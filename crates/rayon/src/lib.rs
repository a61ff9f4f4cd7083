use rayoff as rayon;

pub use rayon::iter;
pub use rayon::prelude;
pub use rayon::slice;

pub use rayon::current_num_threads;
pub use rayon::ThreadPoolBuildError;

#[derive(Debug, Default)]
pub struct ThreadPoolBuilder {
    builder: rayon::ThreadPoolBuilder,
}

impl ThreadPoolBuilder {
    pub fn new() -> Self {
        Self {
            builder: rayon::ThreadPoolBuilder::new(),
        }
    }
    /// `None` keeps the platform's concurrency level.
    pub fn num_threads(self, num_threads: Option<usize>) -> Self {
        match num_threads {
            Some(num_threads) => Self {
                builder: self.builder.num_threads(num_threads),
            },
            None => self,
        }
    }
    /// Runs `f` against a fixed-size pool that lives exactly as long as the call.
    pub fn build_scoped<R>(
        self,
        f: impl FnOnce(&ThreadPool) -> R,
    ) -> Result<R, ThreadPoolBuildError> {
        self.builder
            .thread_name(|index| format!("lloyd-worker-{index}"))
            .panic_handler(|_| {
                log::error!("Asynchronous task panickied.");
            })
            .build_scoped(
                |thread| thread.run(),
                |pool| {
                    let pool = ThreadPool::new(pool);
                    f(&pool)
                },
            )
    }
}

pub struct ThreadPool<'a> {
    pool: &'a rayon::ThreadPool,
}

impl<'a> ThreadPool<'a> {
    fn new(pool: &'a rayon::ThreadPool) -> Self {
        Self { pool }
    }
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pool_honours_worker_count() {
        let threads = ThreadPoolBuilder::new()
            .num_threads(Some(3))
            .build_scoped(|pool| (pool.num_threads(), pool.install(current_num_threads)))
            .unwrap();
        assert_eq!(threads, (3, 3));
    }

    #[test]
    fn pool_defaults_to_platform_concurrency() {
        let threads = ThreadPoolBuilder::new()
            .num_threads(None)
            .build_scoped(|pool| pool.num_threads())
            .unwrap();
        assert!(threads >= 1);
    }
}
