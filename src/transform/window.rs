//! Rolling window functions over series with missing values.

/// Apply `f` to every full trailing window of `series`.
///
/// Position `i` receives `f(series[i + 1 - window..=i])`. Positions with
/// fewer than `window` observations so far, and windows holding a missing
/// value, produce `None`.
pub fn rolling_apply<F>(series: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let n = series.len();
    let mut result = vec![None; n];
    if window == 0 {
        return result;
    }

    let mut buf = Vec::with_capacity(window);
    for i in (window - 1)..n {
        buf.clear();
        buf.extend(series[i + 1 - window..=i].iter().map_while(|v| *v));
        if buf.len() == window {
            result[i] = f(&buf);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rolling_sum(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
        rolling_apply(series, window, |s| Some(s.iter().sum()))
    }

    #[test]
    fn rolling_sum_basic() {
        let series = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let result = rolling_sum(&series, 3);

        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert_relative_eq!(result[2].unwrap(), 6.0, epsilon = 1e-10);
        assert_relative_eq!(result[3].unwrap(), 9.0, epsilon = 1e-10);
    }

    #[test]
    fn missing_values_void_their_windows() {
        let series = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let result = rolling_sum(&series, 2);

        assert_eq!(result, vec![None, None, None, Some(7.0), Some(9.0)]);
    }

    #[test]
    fn short_and_degenerate_inputs() {
        assert_eq!(rolling_sum(&[Some(1.0)], 3), vec![None]);
        assert!(rolling_sum(&[], 3).is_empty());
        assert_eq!(rolling_sum(&[Some(1.0), Some(2.0)], 0), vec![None, None]);
    }

    #[test]
    fn closure_may_decline_a_window() {
        let series = vec![Some(1.0), Some(1.0), Some(2.0)];
        let result = rolling_apply(&series, 2, |s| (s[0] != s[1]).then_some(s[1] - s[0]));
        assert_eq!(result, vec![None, None, Some(1.0)]);
    }
}
