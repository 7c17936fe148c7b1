//! # Word-vector store
//!
//! The [`VectorSource`] trait is the only thing tensor construction needs
//! from a pretrained embedding: a dimensionality and a key→vector lookup.
//! [`WordVectors`] is the in-memory implementation the loaders produce.

use std::collections::HashMap;

use crate::error::{Result, VecDbError};

/// A key→vector lookup with a fixed reported dimensionality.
pub trait VectorSource {
    /// Number of components of every vector in this source.
    fn dimension(&self) -> usize;

    /// Vector for `word`, or `None` if the source does not know it.
    fn lookup(&self, word: &str) -> Option<&[f32]>;

    /// Whether `word` has a vector.
    fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }
}

/// Dense in-memory word vectors, stored contiguously.
#[derive(Debug, Clone, Default)]
pub struct WordVectors {
    dimension: usize,
    index: HashMap<String, usize>,
    data: Vec<f32>,
}

impl WordVectors {
    /// Create an empty store for vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            index: HashMap::new(),
            data: Vec::new(),
        }
    }

    /// Create an empty store with room for `capacity` vectors.
    pub fn with_capacity(dimension: usize, capacity: usize) -> Self {
        Self {
            dimension,
            index: HashMap::with_capacity(capacity),
            data: Vec::with_capacity(capacity * dimension),
        }
    }

    /// Build a store from `(word, vector)` pairs.
    pub fn from_entries<I, S>(dimension: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut store = Self::new(dimension);
        for (word, vector) in entries {
            store.insert(word, &vector)?;
        }
        Ok(store)
    }

    /// Add a vector. The first vector seen for a word wins; returns `false`
    /// when `word` was already present.
    pub fn insert(&mut self, word: impl Into<String>, vector: &[f32]) -> Result<bool> {
        let word = word.into();
        if vector.len() != self.dimension {
            return Err(VecDbError::DimensionMismatch {
                word,
                expected: self.dimension,
                found: vector.len(),
            });
        }
        if self.index.contains_key(&word) {
            return Ok(false);
        }
        let row = self.index.len();
        self.data.extend_from_slice(vector);
        self.index.insert(word, row);
        Ok(true)
    }

    /// Number of words with a vector.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate over the known words in no particular order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }
}

impl VectorSource for WordVectors {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn lookup(&self, word: &str) -> Option<&[f32]> {
        let row = *self.index.get(word)?;
        let start = row * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_inserted_vector() {
        let store = WordVectors::from_entries(
            2,
            vec![("john", vec![0.5, -0.5]), ("mary", vec![1.0, 2.0])],
        )
        .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.dimension(), 2);
        assert_eq!(store.lookup("mary"), Some(&[1.0, 2.0][..]));
        assert_eq!(store.lookup("john"), Some(&[0.5, -0.5][..]));
        assert!(store.lookup("runs").is_none());
        assert!(!store.contains("runs"));
    }

    #[test]
    fn first_vector_wins_on_duplicates() {
        let mut store = WordVectors::new(1);
        assert!(store.insert("a", &[1.0]).unwrap());
        assert!(!store.insert("a", &[2.0]).unwrap());
        assert_eq!(store.lookup("a"), Some(&[1.0][..]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn wrong_dimension_is_rejected() {
        let mut store = WordVectors::new(3);
        let err = store.insert("a", &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            VecDbError::DimensionMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));
        assert!(store.is_empty());
    }
}
