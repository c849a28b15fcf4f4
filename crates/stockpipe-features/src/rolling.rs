//! Positional rolling-window statistics.
//!
//! Unlike indicator libraries that return shortened vectors, these helpers
//! keep output index-aligned with input: `out[i]` describes the window
//! ending at `i`, and is `None` whenever the window is incomplete or any
//! value inside it is undefined.

/// Rolling arithmetic mean over a trailing window.
pub fn rolling_mean(data: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    assert!(window > 0, "Window must be greater than 0");

    let mut result = vec![None; data.len()];
    if data.len() < window {
        return result;
    }

    let window_f64 = window as f64;
    for i in (window - 1)..data.len() {
        let slice = &data[i + 1 - window..=i];
        if slice.iter().all(Option::is_some) {
            let sum: f64 = slice.iter().map(|v| v.unwrap()).sum();
            result[i] = Some(sum / window_f64);
        }
    }

    result
}

/// Rolling sample standard deviation (n − 1 divisor) over a trailing window.
pub fn rolling_std(data: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    assert!(window > 1, "Window must be greater than 1");

    let mut result = vec![None; data.len()];
    if data.len() < window {
        return result;
    }

    let window_f64 = window as f64;
    for i in (window - 1)..data.len() {
        let slice = &data[i + 1 - window..=i];
        if slice.iter().all(Option::is_some) {
            let mean: f64 = slice.iter().map(|v| v.unwrap()).sum::<f64>() / window_f64;
            let ss: f64 = slice
                .iter()
                .map(|v| {
                    let x = v.unwrap();
                    (x - mean) * (x - mean)
                })
                .sum();
            result[i] = Some((ss / (window_f64 - 1.0)).sqrt());
        }
    }

    result
}
