use super::params::Layer;

/// Above this probability of a dead gate the generator builds a [`crate::Circuit`] and prints
/// only the live part.
pub const TRIMMING_THRESHOLD: f64 = 1e-5;

/// Whether generated layered circuits are trimmed before they are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Trimming {
    /// Trim when [`prob_needs_trimming`] exceeds [`TRIMMING_THRESHOLD`].
    #[default]
    Auto,
    Always,
    /// Stream every gate as it is created.
    Never,
}

impl Trimming {
    pub fn resolve(&self, prob_needs_trimming: f64) -> bool {
        match self {
            Trimming::Auto => prob_needs_trimming > TRIMMING_THRESHOLD,
            Trimming::Always => true,
            Trimming::Never => false,
        }
    }
}

/// Probability that some node of a layered circuit feeds no gate of the layer above.
///
/// Treats every input choice as independent, which slightly overestimates the real figure.
pub fn prob_needs_trimming(width: usize, layers: &[Layer]) -> f64 {
    let mut previous = width;
    let mut pr = 0.0;

    for layer in layers {
        let abandoned = (1.0 - layer.fanin).powf(layer.size as f64);
        let layer_has_abandoned = 1.0 - (1.0 - abandoned).powf(previous as f64);
        pr = 1.0 - (1.0 - pr) * (1.0 - layer_has_abandoned);
        previous = layer.size;
    }

    pr
}
