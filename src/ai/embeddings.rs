//! Text embedders for the similarity-search routes.
//!
//! The default embedder hashes tokens into a fixed number of buckets, which
//! keeps search working offline. Building with the `embeddings` feature swaps
//! in a fastembed sentence model.

use async_trait::async_trait;

use super::{AiError, Embedder};

/// Matches the output width of the default fastembed model.
pub const DEFAULT_DIMENSION: usize = 384;

/// Deterministic signed feature hashing over lowercase tokens.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut out = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '.'))
            .map(|t| t.trim_matches('.'))
            .filter(|t| !t.is_empty())
        {
            let h = fnv1a(token.as_bytes());
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            out[bucket] += sign;
        }
        normalize(&mut out);
        out
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
        (h ^ u64::from(*b)).wrapping_mul(0x0100_0000_01b3)
    })
}

fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AiError> {
        Ok(self.vectorize(text))
    }
}

pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot = a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(feature = "embeddings")]
pub use model::FastEmbedder;

#[cfg(feature = "embeddings")]
mod model {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use fastembed::TextEmbedding;

    use super::DEFAULT_DIMENSION;
    use crate::ai::{AiError, Embedder};

    /// Sentence embeddings from a local ONNX model.
    pub struct FastEmbedder {
        inner: Arc<Mutex<TextEmbedding>>,
    }

    impl FastEmbedder {
        pub fn try_new() -> Result<Self, AiError> {
            let model = TextEmbedding::try_new(Default::default())
                .map_err(|e| AiError::Upstream(format!("loading embedding model: {e}")))?;
            Ok(Self {
                inner: Arc::new(Mutex::new(model)),
            })
        }
    }

    #[async_trait]
    impl Embedder for FastEmbedder {
        fn dimension(&self) -> usize {
            DEFAULT_DIMENSION
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, AiError> {
            let inner = Arc::clone(&self.inner);
            let text = text.to_string();
            tokio::task::spawn_blocking(move || {
                let mut model = inner
                    .lock()
                    .map_err(|_| AiError::Upstream("embedding model lock poisoned".into()))?;
                let mut out = model
                    .embed(vec![text], None)
                    .map_err(|e| AiError::Upstream(e.to_string()))?;
                out.pop()
                    .ok_or_else(|| AiError::Decode("embedding model returned nothing".into()))
            })
            .await
            .map_err(|e| AiError::Upstream(e.to_string()))?
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_are_unit_length_and_stable() {
        let e = HashingEmbedder::default();
        let a = e.vectorize("Air quality data for Denver: AQI 42");
        let norm = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert_eq!(a, e.vectorize("air quality data for denver: aqi 42"));
    }

    #[test]
    fn similar_text_scores_higher() {
        let e = HashingEmbedder::default();
        let query = e.vectorize("Air quality in Denver: AQI 42, PM2.5 9");
        let near = e.vectorize("Air quality data for Denver: AQI 42");
        let far = e.vectorize("Air quality data for Mumbai: AQI 180");
        assert!(cosine(&query, &near) > cosine(&query, &far));
    }

    #[test]
    fn empty_text_gives_zero_vector() {
        let v = HashingEmbedder::new(8).vectorize("  ");
        assert!(v.iter().all(|x| *x == 0.0));
        assert_eq!(cosine(&v, &v), 0.0);
    }
}
