//! The finder facade: session lifecycle, pass orchestration, and seed
//! ingestion.
//!
//! A session maps the input, partitions it into as many chunks as there are
//! workers, and sweeps a window across every chunk per pass. Workers draw
//! chunk indices from a shared atomic cursor, scan their window, grow the
//! seeds they find, and merge the survivors into the global result list
//! under a single lock. When the remaining window no longer fits, overlap
//! resolution runs twice over the accumulated results and every range is
//! clipped to the file size.

use crate::error::ScanError;
use crate::scan::grower::grow_and_score;
use crate::scan::model::{ScanConfig, Streak};
use crate::scan::overlap::resolve_overlaps;
use crate::scan::report;
use crate::scan::sample_type::{Endianness, TypeInfo};
use crate::scan::scanner::scan_window;
use crate::scan::source::ChunkedSource;
use crate::scan::MAX_VALIDATION_ERROR;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Cooperative cancellation handle for a running session.
///
/// Cancelling stops workers between chunk dequeues; the session still
/// resolves and returns whatever it has found so far.
#[derive(Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Request cancellation. Takes effect at the next chunk handoff.
    pub fn cancel(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Blind structural recogniser for numeric streams in a byte source.
pub struct DataFinder {
    source: ChunkedSource,
    config: ScanConfig,
    worker_count: usize,
    test_chunk_size: usize,
    chunk_cursor: AtomicUsize,
    results: Mutex<Vec<Streak>>,
    is_running: Arc<AtomicBool>,
}

impl DataFinder {
    /// Open a file and prepare a scan session.
    pub fn open(path: impl AsRef<Path>, config: ScanConfig) -> Result<Self, ScanError> {
        let source = ChunkedSource::open(path)?;
        Self::with_source(source, config)
    }

    /// Prepare a scan session over an in-memory buffer.
    pub fn from_bytes(bytes: Vec<u8>, config: ScanConfig) -> Result<Self, ScanError> {
        let source = ChunkedSource::from_vec(bytes)?;
        Self::with_source(source, config)
    }

    fn with_source(source: ChunkedSource, config: ScanConfig) -> Result<Self, ScanError> {
        if config.number_of_threads == 0 {
            return Err(ScanError::Config {
                message: "number_of_threads must be at least 1".to_string(),
            });
        }
        if config.min_length_data == 0 {
            return Err(ScanError::Config {
                message: "min_length_data must be at least 1".to_string(),
            });
        }

        let mut finder = Self {
            source,
            config,
            worker_count: 0,
            test_chunk_size: 0,
            chunk_cursor: AtomicUsize::new(0),
            results: Mutex::new(Vec::new()),
            is_running: Arc::new(AtomicBool::new(true)),
        };
        finder.partition();
        Ok(finder)
    }

    /// Partition the source into one chunk per worker.
    ///
    /// The worker count starts one above the request and is decremented
    /// until a chunk holds at least one full scan window; at a single
    /// worker the window clamps to the chunk instead.
    fn partition(&mut self) {
        let mut workers = self.config.number_of_threads + 1;
        self.test_chunk_size = self.config.test_chunk_size();

        loop {
            workers = (workers - 1).max(1);
            self.source.partition(workers);
            let chunk_size = self.source.chunk_size();

            if workers == 1 {
                self.test_chunk_size = self.test_chunk_size.min(chunk_size);
                break;
            }
            if chunk_size >= self.test_chunk_size {
                break;
            }
        }

        self.worker_count = workers;
    }

    /// Run the full discovery session.
    ///
    /// Passes sweep a window across every chunk until the tail no longer
    /// fits; results accumulate across passes and are overlap-resolved and
    /// clipped at the end. A cancelled session finishes early with partial
    /// results.
    pub fn find(&mut self) -> Result<(), ScanError> {
        let types = self.config.hypothesis_types();
        let endians = self.config.hypothesis_endians();
        let shift_span = self.config.shift_span();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count)
            .build()
            .map_err(|e| ScanError::Config {
                message: format!("failed to build worker pool: {e}"),
            })?;

        let chunk_size = self.source.chunk_size();
        let total_passes = chunk_size / self.test_chunk_size;
        log::info!(
            "scanning {} bytes in {} chunks with {} workers",
            self.source.len(),
            self.source.chunk_count(),
            self.worker_count
        );

        let mut offset = 0;
        let mut pass = 0;
        while chunk_size - offset >= self.test_chunk_size {
            if !self.is_running.load(Ordering::Relaxed) {
                break;
            }
            pass += 1;
            let started = Instant::now();
            self.chunk_cursor.store(0, Ordering::SeqCst);

            let this = &*self;
            pool.scope(|scope| {
                for _ in 0..this.worker_count {
                    scope.spawn(|_| this.scan_chunks(offset, &types, &endians, shift_span));
                }
            });

            log::debug!(
                "pass {pass}/{total_passes} finished in {:.3?}",
                started.elapsed()
            );
            offset += self.test_chunk_size;
        }

        self.finalise();
        Ok(())
    }

    /// One worker: drain the chunk cursor, scanning the pass window of each
    /// drawn chunk.
    fn scan_chunks(
        &self,
        window_offset: usize,
        types: &[&'static TypeInfo],
        endians: &[Endianness],
        shift_span: usize,
    ) {
        loop {
            if !self.is_running.load(Ordering::Relaxed) {
                return;
            }
            let index = self.chunk_cursor.fetch_add(1, Ordering::SeqCst);
            if index >= self.source.chunk_count() {
                return;
            }

            let chunk = self.source.chunk(index);
            if window_offset >= chunk.len() {
                continue;
            }
            let end = (window_offset + self.test_chunk_size).min(chunk.len());
            let window = &chunk[window_offset..end];

            let seeds = scan_window(
                window,
                self.source.chunk_base(index) + window_offset,
                types,
                endians,
                shift_span,
            );
            if !seeds.is_empty() {
                self.ingest(seeds);
            }
        }
    }

    /// Merge one batch of raw seeds into the global results.
    ///
    /// Duplicate offsets keep the seed with the best stride-weighted
    /// quality; survivors are grown, filtered, overlap-resolved within the
    /// batch, and finally merged under the result lock, replacing an
    /// existing streak at the same offset only on strictly better quality.
    pub(crate) fn ingest(&self, mut seeds: Vec<Streak>) {
        // Stable sort: exact-quality ties keep scan order, which favours
        // denser strides and higher-priority types.
        seeds.sort_by(|a, b| {
            a.offset.cmp(&b.offset).then_with(|| {
                let key_a = (a.bytes_step + 1) as f64 * a.quality_index;
                let key_b = (b.bytes_step + 1) as f64 * b.quality_index;
                key_a.total_cmp(&key_b)
            })
        });
        seeds.dedup_by(|second, first| second.offset == first.offset);

        for seed in &mut seeds {
            grow_and_score(seed, &self.source);
        }
        seeds.retain(|streak| streak.quality_index < MAX_VALIDATION_ERROR);
        let seeds = resolve_overlaps(seeds);

        let mut results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        for seed in seeds {
            match results.iter_mut().find(|r| r.offset == seed.offset) {
                Some(existing) => {
                    if seed.quality_index < existing.quality_index {
                        *existing = seed;
                    }
                }
                None => results.push(seed),
            }
        }
    }

    /// Final overlap resolution and boundary clipping.
    ///
    /// Resolution runs twice: a first merge can change stride alignment and
    /// expose new overlaps.
    fn finalise(&mut self) {
        let total = self.source.len();
        let results = self.results.get_mut().unwrap_or_else(|e| e.into_inner());

        let mut streaks = std::mem::take(results);
        streaks = resolve_overlaps(streaks);
        streaks = resolve_overlaps(streaks);
        for streak in &mut streaks {
            let clipped = streak.range().clipped(total);
            streak.set_range(clipped);
        }

        log::info!("resolved {} streaks", streaks.len());
        *results = streaks;
    }

    /// Snapshot of the discovered streaks, sorted by offset.
    pub fn results(&self) -> Vec<Streak> {
        self.results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Exclusive access to the result list for collaborators.
    pub(crate) fn results_mut(&mut self) -> &mut Vec<Streak> {
        self.results.get_mut().unwrap_or_else(|e| e.into_inner())
    }

    /// Split borrow for collaborators that read the source while mutating
    /// the results.
    pub(crate) fn source_and_results_mut(&mut self) -> (&ChunkedSource, &mut Vec<Streak>) {
        (
            &self.source,
            self.results.get_mut().unwrap_or_else(|e| e.into_inner()),
        )
    }

    /// The underlying byte source.
    pub fn source(&self) -> &ChunkedSource {
        &self.source
    }

    /// The session configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Handle for cancelling this session from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.is_running))
    }

    /// Serialize the current results to a JSON report file.
    pub fn write_report(&self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        report::write_report(&self.results(), path)
    }

    /// Replace the current results with those loaded from a report file.
    pub fn load_report(&mut self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        let streaks = report::load_report(path)?;
        *self.results_mut() = streaks;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::extract::{SampleValues, ValueExtractor};
    use crate::scan::model::SampleRange;
    use crate::scan::sample_type::{type_info, SampleKind};
    use crate::scan::testdata;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn config(min_length_data: usize, kinds: Option<Vec<SampleKind>>) -> ScanConfig {
        ScanConfig {
            min_length_data,
            number_of_threads: 2,
            sample_kinds: kinds,
            ..ScanConfig::default()
        }
    }

    fn summary(streaks: &[Streak]) -> Vec<(SampleRange, SampleKind, Endianness)> {
        streaks
            .iter()
            .map(|s| (s.range(), s.type_info.kind, s.endian))
            .collect()
    }

    #[test]
    fn test_partitioning_shrinks_to_fit_window() {
        let finder =
            DataFinder::from_bytes(vec![0u8; 3920], config(200, None)).unwrap();
        assert_eq!(finder.worker_count, 2);
        assert_eq!(finder.source.chunk_size(), 1960);
        assert_eq!(finder.test_chunk_size, 1000);
    }

    #[test]
    fn test_partitioning_clamps_window_for_tiny_input() {
        let finder =
            DataFinder::from_bytes(vec![0u8; 100], ScanConfig::default()).unwrap();
        assert_eq!(finder.worker_count, 1);
        assert_eq!(finder.test_chunk_size, 100);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad_threads = ScanConfig {
            number_of_threads: 0,
            ..ScanConfig::default()
        };
        assert!(matches!(
            DataFinder::from_bytes(vec![0u8; 100], bad_threads),
            Err(ScanError::Config { .. })
        ));

        let bad_window = ScanConfig {
            min_length_data: 0,
            ..ScanConfig::default()
        };
        assert!(matches!(
            DataFinder::from_bytes(vec![0u8; 100], bad_window),
            Err(ScanError::Config { .. })
        ));
    }

    #[test]
    fn test_finds_single_packed_double_stream() {
        init_logs();
        let values = testdata::double_v();
        let mut finder =
            DataFinder::from_bytes(testdata::pack_f64_le(&values), config(200, None)).unwrap();
        finder.find().unwrap();

        let results = finder.results();
        assert_eq!(
            summary(&results),
            vec![(
                SampleRange::new(0, 3920, 8),
                SampleKind::F64,
                Endianness::Little
            )]
        );
        assert_eq!(results[0].bytes_step, 0);

        ValueExtractor::new(&mut finder).extract_values();
        let results = finder.results();
        assert_eq!(results[0].values(), Some(&SampleValues::F64(values)));
    }

    #[test]
    fn test_finds_exponential_double_stream() {
        let values = testdata::double_expo_v();
        let mut finder =
            DataFinder::from_bytes(testdata::pack_f64_le(&values), config(200, None)).unwrap();
        finder.find().unwrap();

        let results = finder.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range(), SampleRange::new(0, 3920, 8));
        assert_eq!(results[0].type_info.kind, SampleKind::F64);
    }

    #[test]
    fn test_separator_tolerance() {
        init_logs();
        // One separator byte between samples; the separator pattern cycles
        // so it cannot itself read as a smooth byte stream.
        let values = testdata::double_v();
        let bytes = testdata::with_separator(
            &testdata::pack_f64_le(&values),
            8,
            &[0x00, 0x40, 0x80, 0xC0],
        );
        let file_size = bytes.len();
        let mut finder = DataFinder::from_bytes(bytes, config(200, None)).unwrap();
        finder.find().unwrap();

        let results = finder.results();
        assert_eq!(
            summary(&results),
            vec![(
                SampleRange::new(0, file_size, 9),
                SampleKind::F64,
                Endianness::Little
            )]
        );
        assert_eq!(results[0].bytes_step, 1);

        ValueExtractor::new(&mut finder).extract_values();
        let results = finder.results();
        assert_eq!(results[0].values(), Some(&SampleValues::F64(values)));
    }

    #[test]
    fn test_finds_packed_short_stream() {
        let values = testdata::short_v();
        let mut finder = DataFinder::from_bytes(
            testdata::pack_i16_le(&values),
            config(200, Some(vec![SampleKind::I16])),
        )
        .unwrap();
        finder.find().unwrap();

        let results = finder.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range(), SampleRange::new(0, 980, 2));
        assert_eq!(results[0].range().len(), 490);

        ValueExtractor::new(&mut finder).extract_values();
        let results = finder.results();
        assert_eq!(results[0].values(), Some(&SampleValues::I16(values)));
    }

    #[test]
    fn test_finds_packed_int_stream() {
        let values = testdata::int_v();
        let mut finder = DataFinder::from_bytes(
            testdata::pack_i32_le(&values),
            config(200, Some(vec![SampleKind::I32])),
        )
        .unwrap();
        finder.find().unwrap();

        let results = finder.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range(), SampleRange::new(0, 1960, 4));

        ValueExtractor::new(&mut finder).extract_values();
        let results = finder.results();
        assert_eq!(results[0].values(), Some(&SampleValues::I32(values)));
    }

    #[test]
    fn test_recovers_interleaved_streams() {
        init_logs();
        let mut finder = DataFinder::from_bytes(
            testdata::ddi_bytes(),
            config(200, Some(vec![SampleKind::F64, SampleKind::I32])),
        )
        .unwrap();
        finder.find().unwrap();

        let results = finder.results();
        assert_eq!(
            summary(&results),
            vec![
                (
                    SampleRange::new(0, 9800, 20),
                    SampleKind::F64,
                    Endianness::Little
                ),
                (
                    SampleRange::new(8, 9800, 20),
                    SampleKind::F64,
                    Endianness::Little
                ),
                (
                    SampleRange::new(16, 9800, 20),
                    SampleKind::I32,
                    Endianness::Little
                ),
            ]
        );

        ValueExtractor::new(&mut finder).extract_values();
        let results = finder.results();
        assert_eq!(
            results[0].values(),
            Some(&SampleValues::F64(testdata::double_v()))
        );
        assert_eq!(
            results[1].values(),
            Some(&SampleValues::F64(testdata::double_expo_v()))
        );
        assert_eq!(
            results[2].values(),
            Some(&SampleValues::I32(testdata::int_v()))
        );
    }

    #[test]
    fn test_hypothesis_subset_recovers_subset() {
        let mut finder = DataFinder::from_bytes(
            testdata::ddi_bytes(),
            config(200, Some(vec![SampleKind::F64])),
        )
        .unwrap();
        finder.find().unwrap();

        let results = finder.results();
        assert_eq!(
            summary(&results),
            vec![
                (
                    SampleRange::new(0, 9800, 20),
                    SampleKind::F64,
                    Endianness::Little
                ),
                (
                    SampleRange::new(8, 9800, 20),
                    SampleKind::F64,
                    Endianness::Little
                ),
            ]
        );
    }

    #[test]
    fn test_ranges_never_exceed_file_size() {
        let bytes = testdata::ddi_bytes();
        let file_size = bytes.len();
        let mut finder = DataFinder::from_bytes(bytes, config(200, None)).unwrap();
        finder.find().unwrap();

        for streak in finder.results() {
            assert!(streak.range().stop <= file_size, "streak {streak}");
        }
    }

    #[test]
    fn test_batch_ingestion_is_commutative() {
        let bytes = testdata::pack_f64_le(&testdata::double_v());
        let info = *type_info(SampleKind::F64);
        let seed_a = Streak::new(0, 0, info, Endianness::Little, 0.0);
        let seed_b = Streak::new(1960, 0, info, Endianness::Little, 0.0);

        let finder_ab = DataFinder::from_bytes(bytes.clone(), config(200, None)).unwrap();
        finder_ab.ingest(vec![seed_a.clone()]);
        finder_ab.ingest(vec![seed_b.clone()]);

        let finder_ba = DataFinder::from_bytes(bytes, config(200, None)).unwrap();
        finder_ba.ingest(vec![seed_b]);
        finder_ba.ingest(vec![seed_a]);

        assert_eq!(summary(&finder_ab.results()), summary(&finder_ba.results()));
        assert_eq!(finder_ab.results().len(), 1);
    }

    #[test]
    fn test_cancelled_session_returns_partial_results() {
        let mut finder =
            DataFinder::from_bytes(testdata::pack_f64_le(&testdata::double_v()), config(200, None))
                .unwrap();
        finder.cancel_handle().cancel();
        finder.find().unwrap();
        assert!(finder.results().is_empty());
    }
}
