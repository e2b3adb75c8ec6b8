// source.rs — Token → vector lookup.
//
// The embedder only needs "give me the vector for this token, or tell me it is unknown".
// How vectors are produced (file table, sub-word hashing, remote service) stays behind
// the trait.

use std::borrow::Cow;
use std::collections::HashMap;

use anyhow::bail;

/// A pre-trained token vector table with a fixed dimension.
pub trait TokenVectorSource {
    /// Vector dimension D. Fixed for the lifetime of the source.
    fn dimension(&self) -> usize;

    /// `Some(vector)` for known tokens, `None` for out-of-vocabulary ones.
    fn lookup(&self, token: &str) -> Option<Cow<'_, [f32]>>;
}

/// Word vectors held in memory, keyed by exact token.
#[derive(Debug, Clone)]
pub struct InMemoryVectors {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl InMemoryVectors {
    pub fn new(dimension: usize) -> Self {
        Self::with_capacity(dimension, 0)
    }

    pub fn with_capacity(dimension: usize, capacity: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a token vector. Returns `Ok(false)` if the token was already present
    /// (first entry wins), and an error if the vector has the wrong dimension.
    pub fn insert(&mut self, token: impl Into<String>, vector: Vec<f32>) -> anyhow::Result<bool> {
        let token = token.into();
        if vector.len() != self.dimension {
            bail!(
                "vector for {:?} has {} values, expected {}",
                token,
                vector.len(),
                self.dimension
            );
        }
        if self.vectors.contains_key(&token) {
            return Ok(false);
        }
        self.vectors.insert(token, vector);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(token)
    }
}

impl TokenVectorSource for InMemoryVectors {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn lookup(&self, token: &str) -> Option<Cow<'_, [f32]>> {
        self.vectors.get(token).map(|v| Cow::Borrowed(v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut vectors = InMemoryVectors::new(3);
        assert!(vectors.insert("ሰላም", vec![1.0, 2.0, 3.0]).unwrap());
        assert_eq!(vectors.len(), 1);
        assert!(vectors.contains("ሰላም"));
        assert_eq!(vectors.lookup("ሰላም").as_deref(), Some(&[1.0, 2.0, 3.0][..]));
        assert!(vectors.lookup("ሰው").is_none());
    }

    #[test]
    fn test_first_insert_wins() {
        let mut vectors = InMemoryVectors::new(2);
        assert!(vectors.insert("a", vec![1.0, 1.0]).unwrap());
        assert!(!vectors.insert("a", vec![9.0, 9.0]).unwrap());
        assert_eq!(vectors.lookup("a").as_deref(), Some(&[1.0, 1.0][..]));
    }

    #[test]
    fn test_insert_rejects_wrong_dimension() {
        let mut vectors = InMemoryVectors::new(4);
        let err = vectors.insert("a", vec![1.0]).unwrap_err();
        assert!(err.to_string().contains("expected 4"));
        assert!(vectors.is_empty());
    }
}
