//! Configuration for matrix extraction

/// Tuning knobs for [`MatrixAdapter`](crate::MatrixAdapter)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Local row count at which CRS extraction switches to parallel rows
    pub parallel_threshold: usize,

    /// Emit every CRS row sorted by column index
    ///
    /// Off by default: CRS rows follow the matrix's storage order. CCS
    /// columns are always sorted by row.
    pub sort_crs_rows: bool,

    /// Worker threads for parallel extraction
    ///
    /// `None` runs on rayon's global pool (and so honours
    /// `RAYON_NUM_THREADS`). `Some(n)` asks for a dedicated pool of `n`
    /// threads, built on the first extraction that actually goes parallel.
    pub n_threads: Option<usize>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 4096,
            sort_crs_rows: false,
            n_threads: None,
        }
    }
}

impl AdapterConfig {
    pub fn with_parallel_threshold(mut self, rows: usize) -> Self {
        self.parallel_threshold = rows;
        self
    }

    pub fn with_sorted_crs_rows(mut self, sorted: bool) -> Self {
        self.sort_crs_rows = sorted;
        self
    }

    /// Zero is treated as one thread
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = Some(n_threads.max(1));
        self
    }

    /// One worker per logical core, independent of the global pool
    pub fn with_all_cores(self) -> Self {
        self.with_threads(num_cpus::get())
    }

    /// Width of the pool that runs parallel extraction
    pub fn worker_threads(&self) -> usize {
        self.n_threads.unwrap_or_else(rayon::current_num_threads)
    }

    /// Whether `local_rows` rows should be extracted in parallel
    pub fn use_parallel(&self, local_rows: usize) -> bool {
        local_rows >= self.parallel_threshold && self.worker_threads() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdapterConfig::default();
        assert_eq!(config.parallel_threshold, 4096);
        assert!(!config.sort_crs_rows);
        assert_eq!(config.n_threads, None);
        assert_eq!(config.worker_threads(), rayon::current_num_threads());
    }

    #[test]
    fn test_parallel_decision() {
        let config = AdapterConfig::default()
            .with_parallel_threshold(100)
            .with_threads(4);
        assert!(!config.use_parallel(99));
        assert!(config.use_parallel(100));

        let single = config.with_threads(0);
        assert_eq!(single.n_threads, Some(1));
        assert!(!single.use_parallel(1_000_000));
    }

    #[test]
    fn test_all_cores() {
        let config = AdapterConfig::default().with_all_cores();
        assert_eq!(config.worker_threads(), num_cpus::get());
    }
}
