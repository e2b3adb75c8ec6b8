// engine.rs — Sentence embedding by mean pooling word vectors.
//
// normalize → whitespace tokens → per-token lookup (zero vector when unknown) → mean.
// Unknown tokens count toward the denominator, so they dilute the mean instead of
// being skipped.
//
// Degenerate input never errors: it yields `None` ("this input could not be embedded").

use crate::config;
use crate::embeddings::source::TokenVectorSource;
use crate::embeddings::text_prep::{self, AmharicNormalizer, TextNormalizer};

/// Per-call options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedOptions {
    /// Run the normalizer before tokenizing.
    pub normalize: bool,
    /// Fewer tokens than this → no embedding.
    pub min_words: usize,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            min_words: config::embedding::DEFAULT_MIN_WORDS,
        }
    }
}

/// The sentence embedder holds the text normalizer. The vector source is passed per call.
pub struct SentenceEmbedder<N = AmharicNormalizer> {
    normalizer: N,
}

impl Default for SentenceEmbedder<AmharicNormalizer> {
    fn default() -> Self {
        Self::new(AmharicNormalizer)
    }
}

impl<N: TextNormalizer> SentenceEmbedder<N> {
    pub fn new(normalizer: N) -> Self {
        Self { normalizer }
    }

    /// Compute the mean-pooled embedding for one sentence.
    ///
    /// Returns a vector of `source.dimension()` values, or `None` when the text is
    /// blank, has fewer than `min_words` tokens, or produced no vectors.
    pub fn embed(
        &self,
        text: &str,
        source: &dyn TokenVectorSource,
        opts: &EmbedOptions,
    ) -> Option<Vec<f32>> {
        if text.trim().is_empty() {
            return None;
        }

        let normalized;
        let text = if opts.normalize {
            normalized = self.normalizer.normalize(text);
            normalized.as_str()
        } else {
            text
        };

        let tokens = text_prep::tokenize(text);
        if tokens.len() < opts.min_words {
            log::debug!("Skipping sentence: {} tokens < min_words {}", tokens.len(), opts.min_words);
            return None;
        }

        let dims = source.dimension();
        // Accumulate in f64; the result is stored at the source's f32 precision.
        let mut sum = vec![0.0f64; dims];
        let mut count: usize = 0;
        let mut oov: usize = 0;

        for token in tokens {
            if token.is_empty() {
                continue;
            }
            match source.lookup(token) {
                Some(vector) => {
                    if vector.len() != dims {
                        log::warn!(
                            "Vector for token {:?} has {} dims, source reports {}; not embedding",
                            token,
                            vector.len(),
                            dims
                        );
                        return None;
                    }
                    for (acc, &v) in sum.iter_mut().zip(vector.iter()) {
                        *acc += f64::from(v);
                    }
                }
                // Unknown token: zero vector, nothing to add, still counted.
                None => oov += 1,
            }
            count += 1;
        }

        if count == 0 {
            return None;
        }

        log::debug!("Embedded sentence: tokens={}, oov={}, dims={}", count, oov, dims);

        let n = count as f64;
        Some(sum.into_iter().map(|s| (s / n) as f32).collect())
    }
}

/// Euclidean norm, for diagnostics.
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector
        .iter()
        .map(|&v| f64::from(v) * f64::from(v))
        .sum::<f64>()
        .sqrt() as f32
}
