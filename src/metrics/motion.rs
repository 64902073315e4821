use crate::metrics::MotionRecord;

/// Motion summary of one framewise-displacement series. NaN entries count
/// towards the length but are never kept and never averaged.
pub fn motion_record(fd: &[f64], scrub_threshold: f64) -> MotionRecord {
    let kept: Vec<f64> = fd.iter().copied().filter(|&v| v < scrub_threshold).collect();
    let proportion_kept = if fd.is_empty() {
        0.0
    } else {
        kept.len() as f64 / fd.len() as f64
    };
    MotionRecord {
        timeseries_length: fd.len(),
        mean_fd_raw: nan_mean(fd),
        mean_fd_scrubbed: nan_mean(&kept),
        proportion_kept,
    }
}

fn nan_mean(values: &[f64]) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for &v in values {
        if !v.is_nan() {
            sum += v;
            n += 1;
        }
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}
