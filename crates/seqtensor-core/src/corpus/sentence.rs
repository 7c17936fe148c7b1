//! Sentence records produced by the corpus reader.

/// One sentence: tokens, labels and their alphabet ids, position-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    pub words: Vec<String>,
    pub labels: Vec<String>,
    pub word_ids: Vec<usize>,
    pub label_ids: Vec<usize>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one token.
    pub fn push(&mut self, word: &str, label: &str, word_id: usize, label_id: usize) {
        self.words.push(word.to_string());
        self.labels.push(label.to_string());
        self.word_ids.push(word_id);
        self.label_ids.push(label_id);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// All sentences read from one split, in file order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub sentences: Vec<Sentence>,
    /// Tokens across the kept sentences.
    pub num_tokens: usize,
    /// Sentences dropped for exceeding the length bound.
    pub num_ignored: usize,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Length of the longest sentence, 0 for an empty corpus.
    pub fn max_length(&self) -> usize {
        self.sentences.iter().map(Sentence::len).max().unwrap_or(0)
    }

    pub fn word_sentences(&self) -> Vec<&[String]> {
        self.sentences.iter().map(|s| s.words.as_slice()).collect()
    }

    pub fn label_sentences(&self) -> Vec<&[String]> {
        self.sentences.iter().map(|s| s.labels.as_slice()).collect()
    }

    pub fn word_index_sentences(&self) -> Vec<&[usize]> {
        self.sentences.iter().map(|s| s.word_ids.as_slice()).collect()
    }

    pub fn label_index_sentences(&self) -> Vec<&[usize]> {
        self.sentences.iter().map(|s| s.label_ids.as_slice()).collect()
    }
}
