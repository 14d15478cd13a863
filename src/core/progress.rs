use tracing::info;

/// Generated gates between two progress lines.
pub const GATE_LOG_STEP: usize = 1_000_000;

const UNITS: [(usize, &str, usize); 3] = [
    (1_000_000_000, "b", 2),
    (1_000_000, "m", 1),
    (1_000, "k", 1),
];

/// Short human form of a gate count, `1.5k` or `3.25b`.
pub fn format_gate_count(count: usize) -> String {
    UNITS
        .iter()
        .find(|(unit, ..)| count >= *unit)
        .map(|&(unit, suffix, precision)| {
            format!("{:.precision$}{suffix}", count as f64 / unit as f64)
        })
        .unwrap_or_else(|| count.to_string())
}

/// Emits an `info` line whenever `generated` reaches a multiple of [`GATE_LOG_STEP`].
pub fn maybe_log_progress(phase: &str, generated: usize) {
    if generated != 0 && generated % GATE_LOG_STEP == 0 {
        info!("{phase}: {} gates so far", format_gate_count(generated));
    }
}
