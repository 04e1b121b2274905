// progress.rs - Progress bars for permutation sweeps

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar in the house style for a sweep of `len` units
pub fn sweep_progress(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Update interval giving roughly 1% granularity
pub fn update_interval(len: usize) -> usize {
    std::cmp::max(1, len / 100)
}
