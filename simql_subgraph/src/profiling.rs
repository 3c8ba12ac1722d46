//! Optional wall-clock timers for seeding and refinement.
//!
//! With the `profiling` feature each [`Timer`] adds its lifetime to a global
//! per-label tally that [`report`] prints. Without it the timers compile to
//! nothing.

#[cfg(feature = "profiling")]
mod enabled {
    use std::sync::OnceLock;
    use std::time::Instant;

    use dashmap::DashMap;

    type Count = u64;
    type TotalNanos = u128;

    static STATS: OnceLock<DashMap<&'static str, (Count, TotalNanos)>> = OnceLock::new();

    #[inline]
    fn stats() -> &'static DashMap<&'static str, (Count, TotalNanos)> {
        STATS.get_or_init(DashMap::new)
    }

    /// Records its own lifetime under `label` when dropped.
    pub struct Timer {
        label: &'static str,
        start: Instant,
    }

    impl Timer {
        /// Starts timing.
        #[inline]
        #[must_use]
        pub fn new(label: &'static str) -> Self {
            Self {
                label,
                start: Instant::now(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let elapsed = self.start.elapsed().as_nanos();
            let mut entry = stats().entry(self.label).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += elapsed;
        }
    }

    /// Prints every label's call count, total and mean time, slowest first.
    pub fn report() {
        let mut rows: Vec<(&'static str, Count, TotalNanos)> = stats()
            .iter()
            .map(|kv| (*kv.key(), kv.value().0, kv.value().1))
            .collect();
        rows.sort_by(|a, b| b.2.cmp(&a.2));

        println!("==== simql_subgraph profile ====");
        for (label, count, total_ns) in rows {
            let avg_ns = if count == 0 {
                0.0
            } else {
                total_ns as f64 / count as f64
            };
            println!(
                "{:<40} calls={:<8} total={:>9.3} ms avg={:>12.1} ns",
                label,
                count,
                total_ns as f64 / 1_000_000.0,
                avg_ns
            );
        }
        println!("================================");
    }
}

#[cfg(not(feature = "profiling"))]
mod disabled {
    /// No-op timer.
    #[derive(Clone, Copy)]
    pub struct Timer;

    impl Timer {
        /// Does nothing.
        #[inline]
        #[must_use]
        pub fn new(_: &'static str) -> Self {
            Self
        }
    }

    /// Does nothing.
    pub fn report() {}
}

#[cfg(feature = "profiling")]
pub use enabled::*;

#[cfg(not(feature = "profiling"))]
pub use disabled::*;
