//! Simple Moving Average (SMA), streaming form.
//!
//! Trailing mean of the last `period` values. First valid value after
//! `period` updates.

use super::rolling::RollingWindow;

#[derive(Debug, Clone)]
pub struct Sma {
    window: RollingWindow,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            window: RollingWindow::new(period),
        }
    }

    /// Feed the next value and return the current average, if warmed up.
    pub fn update(&mut self, value: f64) -> Option<f64> {
        self.window.push(value);
        self.window.mean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let mut sma = Sma::new(5);
        let result: Vec<Option<f64>> = bars.iter().map(|b| sma.update(b.close)).collect();

        for (i, v) in result.iter().enumerate().take(4) {
            assert!(v.is_none(), "expected no value at index {i}");
        }
        // SMA[4] = mean(10,11,12,13,14) = 12.0
        assert_approx(result[4].unwrap(), 12.0, DEFAULT_EPSILON);
        // SMA[5] = mean(11,12,13,14,15) = 13.0
        assert_approx(result[5].unwrap(), 13.0, DEFAULT_EPSILON);
        // SMA[6] = mean(12,13,14,15,16) = 14.0
        assert_approx(result[6].unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let mut sma = Sma::new(1);
        assert_approx(sma.update(100.0).unwrap(), 100.0, DEFAULT_EPSILON);
        assert_approx(sma.update(200.0).unwrap(), 200.0, DEFAULT_EPSILON);
        assert_approx(sma.update(300.0).unwrap(), 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_too_few_values() {
        let mut sma = Sma::new(5);
        assert!(sma.update(10.0).is_none());
        assert!(sma.update(11.0).is_none());
    }
}
