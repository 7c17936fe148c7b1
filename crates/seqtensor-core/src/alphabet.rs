//! # Alphabet
//!
//! Bidirectional string↔id vocabulary with an open/closed lifecycle.
//!
//! Ids are assigned sequentially from 1. Id [`DEFAULT_INDEX`] (0) is never
//! assigned to a string: it is what a closed alphabet returns for anything it
//! has not seen.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqTensorError};

/// Id reserved for unknown entries.
pub const DEFAULT_INDEX: usize = 0;

/// A string↔id vocabulary for words or labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    name: String,
    index: HashMap<String, usize>,
    /// `instances[i]` holds the string with id `i + 1`.
    instances: Vec<String>,
    closed: bool,
}

/// On-disk form of an [`Alphabet`].
#[derive(Serialize, Deserialize)]
struct AlphabetContent {
    name: String,
    instances: Vec<String>,
    closed: bool,
}

impl Alphabet {
    /// Create an empty, open alphabet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: HashMap::new(),
            instances: Vec::new(),
            closed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of `token`. An open alphabet assigns the next id to unseen tokens;
    /// a closed one returns [`DEFAULT_INDEX`] and stays unchanged.
    pub fn get_index(&mut self, token: &str) -> usize {
        if let Some(&id) = self.index.get(token) {
            return id;
        }
        if self.closed {
            return DEFAULT_INDEX;
        }

        self.instances.push(token.to_string());
        let id = self.instances.len();
        self.index.insert(token.to_string(), id);
        id
    }

    /// Id of `token` without ever assigning one.
    pub fn lookup(&self, token: &str) -> usize {
        self.index.get(token).copied().unwrap_or(DEFAULT_INDEX)
    }

    /// String with id `id`. `None` for [`DEFAULT_INDEX`] and unassigned ids.
    pub fn get_instance(&self, id: usize) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|i| self.instances.get(i))
            .map(String::as_str)
    }

    /// Number of ids in use, counting the default slot.
    pub fn size(&self) -> usize {
        self.instances.len() + 1
    }

    pub fn default_index(&self) -> usize {
        DEFAULT_INDEX
    }

    /// Stop assigning ids. Idempotent and irreversible.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Assigned `(string, id)` pairs in insertion order, default slot excluded.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.instances
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i + 1))
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        let content = AlphabetContent {
            name: self.name.clone(),
            instances: self.instances.clone(),
            closed: self.closed,
        };
        Ok(serde_json::to_string_pretty(&content)?)
    }

    /// Deserialize from JSON written by [`Alphabet::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let content: AlphabetContent = serde_json::from_str(json)?;

        let mut index = HashMap::with_capacity(content.instances.len());
        for (i, instance) in content.instances.iter().enumerate() {
            if index.insert(instance.clone(), i + 1).is_some() {
                return Err(SeqTensorError::Configuration(format!(
                    "alphabet {:?} lists {:?} twice",
                    content.name, instance
                )));
            }
        }

        Ok(Self {
            name: content.name,
            index,
            instances: content.instances,
            closed: content.closed,
        })
    }

    /// Write the alphabet to `dir/<name>.json`.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let path = dir.as_ref().join(format!("{}.json", self.name));
        fs::write(&path, self.to_json()?).map_err(|source| SeqTensorError::Io { path, source })
    }

    /// Read an alphabet written by [`Alphabet::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SeqTensorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one() {
        let mut alphabet = Alphabet::new("word");
        assert_eq!(alphabet.size(), 1);
        assert_eq!(alphabet.get_index("John"), 1);
        assert_eq!(alphabet.get_index("runs"), 2);
        assert_eq!(alphabet.get_index("John"), 1);
        assert_eq!(alphabet.size(), 3);
        assert_eq!(alphabet.default_index(), DEFAULT_INDEX);
    }

    #[test]
    fn closed_alphabet_returns_default() {
        let mut alphabet = Alphabet::new("word");
        alphabet.get_index("John");
        alphabet.close();
        alphabet.close();

        assert!(!alphabet.is_open());
        assert_eq!(alphabet.get_index("Mary"), DEFAULT_INDEX);
        assert_eq!(alphabet.get_index("Mary"), DEFAULT_INDEX);
        assert_eq!(alphabet.get_index("John"), 1);
        assert_eq!(alphabet.size(), 2);
    }

    #[test]
    fn lookup_never_assigns() {
        let mut alphabet = Alphabet::new("word");
        alphabet.get_index("a");
        assert_eq!(alphabet.lookup("b"), DEFAULT_INDEX);
        assert_eq!(alphabet.size(), 2);
        assert!(alphabet.is_open());
    }

    #[test]
    fn iter_yields_assigned_pairs() {
        let mut alphabet = Alphabet::new("pos");
        let words = ["NNP", "VBZ", "NNP", "DT", "VBZ"];
        let ids: Vec<usize> = words.iter().map(|w| alphabet.get_index(w)).collect();
        assert_eq!(ids, vec![1, 2, 1, 3, 2]);

        let pairs: Vec<(&str, usize)> = alphabet.iter().collect();
        assert_eq!(pairs, vec![("NNP", 1), ("VBZ", 2), ("DT", 3)]);
        for (s, id) in alphabet.iter() {
            assert_eq!(alphabet.get_instance(id), Some(s));
        }
        assert_eq!(alphabet.get_instance(DEFAULT_INDEX), None);
        assert_eq!(alphabet.get_instance(4), None);
    }

    #[test]
    fn json_preserves_ids_and_state() {
        let mut alphabet = Alphabet::new("ner");
        alphabet.get_index("B-PER");
        alphabet.get_index("O");
        alphabet.close();

        let restored = Alphabet::from_json(&alphabet.to_json().unwrap()).unwrap();
        assert_eq!(restored, alphabet);
        assert_eq!(restored.lookup("O"), 2);
        assert!(!restored.is_open());
    }

    #[test]
    fn duplicate_instances_are_rejected() {
        let json = r#"{"name":"w","instances":["a","a"],"closed":false}"#;
        let err = Alphabet::from_json(json).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn save_and_load() {
        let dir = std::env::temp_dir().join(format!("seqtensor-alphabet-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let mut alphabet = Alphabet::new("word");
        alphabet.get_index("x");
        alphabet.save(&dir).unwrap();

        let loaded = Alphabet::load(dir.join("word.json")).unwrap();
        assert_eq!(loaded, alphabet);
        fs::remove_dir_all(&dir).ok();
    }
}
