/// Thread pool setup for unit parsing and walking.
use anyhow::{Context, Result};
use tracing::info;

/// Workers to use: the requested count, or half the logical CPUs. Never zero.
pub fn worker_count(requested: Option<usize>, cores: usize) -> usize {
    requested.unwrap_or(cores / 2).max(1)
}

/// Initialize the global rayon pool. Returns the number of workers.
pub fn init_thread_pool(jobs: Option<usize>) -> Result<usize> {
    let cores = num_cpus::get();
    let workers = worker_count(jobs, cores);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()
        .context("Failed to initialize the global thread pool")?;

    info!(workers, cores, "thread pool initialized");
    Ok(workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count_defaults_to_half_the_cores() {
        assert_eq!(worker_count(None, 8), 4);
        assert_eq!(worker_count(None, 1), 1);
        assert_eq!(worker_count(Some(3), 8), 3);
    }

    #[test]
    fn test_worker_count_is_at_least_one() {
        assert_eq!(worker_count(Some(0), 8), 1);
        assert_eq!(worker_count(None, 0), 1);
    }
}
