//! # `perf` – Moving-average performance reporting
//!
//! Tracks the system error over a sliding window of trials and prints a
//! compact table at every window boundary when verbose fitting is on.

/// Fixed-capacity moving window over per-trial errors.
#[derive(Debug)]
pub(crate) struct PerfWindow {
    buf: Vec<f64>,
    count: usize,
}

impl PerfWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0.0; capacity.max(1)],
            count: 0,
        }
    }

    pub fn push(&mut self, err: f64) {
        let cap = self.buf.len();
        self.buf[self.count % cap] = err;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        let filled = self.count.min(self.buf.len());
        if filled == 0 {
            return 0.0;
        }
        self.buf[..filled].iter().sum::<f64>() / filled as f64
    }

    /// True exactly at window boundaries, after at least one full window.
    pub fn at_boundary(&self) -> bool {
        self.count > 0 && self.count % self.buf.len() == 0
    }
}

/// Prints one table row block for the current window.
pub(crate) fn print_progress(trial: usize, train_mse: f64, test_mse: Option<f64>, pop_num: usize) {
    let mut headers = vec![" Trial ".to_string(), " Train MSE ".to_string()];
    let mut values = vec![format!(" {trial:<6}"), format!(" {train_mse:<10.6}")];
    if let Some(test) = test_mse {
        headers.push(" Test MSE ".to_string());
        values.push(format!(" {test:<9.6}"));
    }
    headers.push(" Pop ".to_string());
    values.push(format!(" {pop_num:<4}"));

    let horiz = format!(
        "+{}+",
        headers
            .iter()
            .map(|h| "-".repeat(h.len()))
            .collect::<Vec<_>>()
            .join("+")
    );
    println!("{horiz}");
    println!("|{}|", headers.join("|"));
    println!("|{}|", values.join("|"));
    println!("{horiz}");
}
