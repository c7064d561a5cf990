//! Wall-clock timing of a unit of work, reported at `debug`.

use log::debug;
use std::time::Instant;

/// Run `f`, log how long it took under `label`, and hand back its result.
pub fn timed<T>(label: &str, f: impl FnOnce() -> T) -> T {
    debug!("{} started", label);
    let start = Instant::now();
    let result = f();
    debug!("{} took {:.4} sec", label, start.elapsed().as_secs_f64());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_passes_result_through() {
        assert_eq!(timed("sum", || 2 + 2), 4);
        let failed: Result<(), String> = timed("failing", || Err("nope".to_string()));
        assert_eq!(failed.unwrap_err(), "nope");
    }

    #[test]
    fn test_timed_runs_closure_once() {
        let mut calls = 0;
        timed("count", || calls += 1);
        assert_eq!(calls, 1);
    }
}
