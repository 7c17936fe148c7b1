//! # CoNLL column reader
//!
//! Streams a column-formatted file into [`Sentence`]s. Sentences are separated
//! by blank lines; every other line is split on whitespace and the word and
//! label are taken from fixed column indices.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::alphabet::{Alphabet, DEFAULT_INDEX};
use crate::corpus::sentence::{Corpus, Sentence};
use crate::error::{Result, SeqTensorError};

/// Longest sentence kept by default. Longer ones are dropped, not truncated.
pub const MAX_LENGTH: usize = 120;

/// Reader for column-formatted sequence-labeling corpora.
#[derive(Debug, Clone)]
pub struct CorpusReader {
    word_column: usize,
    label_column: usize,
    max_length: usize,
}

impl CorpusReader {
    /// Reader taking words and labels from the given 0-based columns.
    pub fn new(word_column: usize, label_column: usize) -> Self {
        Self {
            word_column,
            label_column,
            max_length: MAX_LENGTH,
        }
    }

    /// Set the longest sentence to keep.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Minimum number of fields a non-blank line must have.
    fn required_columns(&self) -> usize {
        self.word_column.max(self.label_column) + 1
    }

    /// Read the corpus at `path`, assigning ids through the given alphabets.
    pub fn read<P: AsRef<Path>>(
        &self,
        path: P,
        word_alphabet: &mut Alphabet,
        label_alphabet: &mut Alphabet,
    ) -> Result<Corpus> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SeqTensorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.read_from(
            BufReader::new(file),
            &path.display().to_string(),
            word_alphabet,
            label_alphabet,
        )
    }

    /// Read a corpus from any buffered source. `source_name` is used in
    /// error messages.
    pub fn read_from<R: BufRead>(
        &self,
        reader: R,
        source_name: &str,
        word_alphabet: &mut Alphabet,
        label_alphabet: &mut Alphabet,
    ) -> Result<Corpus> {
        let mut corpus = Corpus::default();
        let mut current = Sentence::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| SeqTensorError::Io {
                path: PathBuf::from(source_name),
                source,
            })?;
            let line_no = index + 1;
            let line = line.trim();

            if line.is_empty() {
                self.flush(&mut current, &mut corpus);
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < self.required_columns() {
                return Err(SeqTensorError::MalformedLine {
                    source_name: source_name.to_string(),
                    line: line_no,
                    expected: self.required_columns(),
                    found: fields.len(),
                });
            }

            let word = fields[self.word_column];
            let label = fields[self.label_column];

            let word_id = word_alphabet.get_index(word);
            let label_id = label_alphabet.get_index(label);
            if label_id == DEFAULT_INDEX {
                return Err(SeqTensorError::UnknownLabel {
                    source_name: source_name.to_string(),
                    line: line_no,
                    label: label.to_string(),
                });
            }

            current.push(word, label, word_id, label_id);
        }

        // A file need not end with a blank line.
        self.flush(&mut current, &mut corpus);

        info!(
            "#sentences: {}, #tokens: {}",
            corpus.len(),
            corpus.num_tokens
        );
        if corpus.num_ignored > 0 {
            info!(
                "ignored {} sentences longer than {}",
                corpus.num_ignored, self.max_length
            );
        }

        Ok(corpus)
    }

    fn flush(&self, current: &mut Sentence, corpus: &mut Corpus) {
        let length = current.len();
        if length == 0 {
            debug!("ignore sentence with length 0");
            return;
        }

        if length <= self.max_length {
            corpus.num_tokens += length;
            corpus.sentences.push(std::mem::take(current));
        } else {
            debug!("ignore sentence with length {}", length);
            corpus.num_ignored += 1;
            *current = Sentence::new();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(
        reader: &CorpusReader,
        text: &str,
        words: &mut Alphabet,
        labels: &mut Alphabet,
    ) -> Result<Corpus> {
        reader.read_from(Cursor::new(text), "test.conll", words, labels)
    }

    #[test]
    fn reads_sentences_and_ids() {
        let mut words = Alphabet::new("word");
        let mut labels = Alphabet::new("pos");
        let corpus = read(
            &CorpusReader::new(0, 1),
            "John NNP\nruns VBZ\n\nMary NNP\n\n",
            &mut words,
            &mut labels,
        )
        .unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.num_tokens, 3);
        assert_eq!(
            corpus.word_sentences(),
            vec![
                &["John".to_string(), "runs".to_string()][..],
                &["Mary".to_string()][..]
            ]
        );
        assert_eq!(corpus.word_index_sentences(), vec![&[1usize, 2][..], &[3][..]]);
        assert_eq!(corpus.label_index_sentences(), vec![&[1usize, 2][..], &[1][..]]);
        assert_eq!(labels.lookup("NNP"), 1);
        assert_eq!(labels.lookup("VBZ"), 2);
        assert_eq!(corpus.max_length(), 2);
    }

    #[test]
    fn selects_columns_by_index() {
        let mut words = Alphabet::new("word");
        let mut labels = Alphabet::new("ner");
        let corpus = read(
            &CorpusReader::new(1, 3),
            "1 EU NNP B-ORG\n2 rejects VBZ O\n",
            &mut words,
            &mut labels,
        )
        .unwrap();

        assert_eq!(corpus.sentences[0].words, vec!["EU", "rejects"]);
        assert_eq!(corpus.label_sentences()[0], &["B-ORG".to_string(), "O".to_string()][..]);
    }

    #[test]
    fn flushes_final_sentence_without_blank_line() {
        let mut words = Alphabet::new("word");
        let mut labels = Alphabet::new("pos");
        let corpus = read(
            &CorpusReader::new(0, 1),
            "a X\n\nb Y\nc Z",
            &mut words,
            &mut labels,
        )
        .unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.sentences[1].words, vec!["b", "c"]);
    }

    #[test]
    fn drops_sentences_over_the_bound() {
        let mut words = Alphabet::new("word");
        let mut labels = Alphabet::new("pos");
        let corpus = read(
            &CorpusReader::new(0, 1).with_max_length(2),
            "a X\nb X\nc X\n\nd X\n\ne X\nf X\ng X",
            &mut words,
            &mut labels,
        )
        .unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.sentences[0].words, vec!["d"]);
        assert_eq!(corpus.num_ignored, 2);
        assert_eq!(corpus.num_tokens, 1);
        for sentence in &corpus.sentences {
            assert!(!sentence.is_empty() && sentence.len() <= 2);
        }
    }

    #[test]
    fn repeated_blank_lines_are_not_sentences() {
        let mut words = Alphabet::new("word");
        let mut labels = Alphabet::new("pos");
        let corpus = read(
            &CorpusReader::new(0, 1),
            "\n\n  \na X\n\n\n\nb Y\n\n",
            &mut words,
            &mut labels,
        )
        .unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.num_ignored, 0);
    }

    #[test]
    fn short_line_is_a_parse_error() {
        let mut words = Alphabet::new("word");
        let mut labels = Alphabet::new("pos");
        let err = read(
            &CorpusReader::new(0, 2),
            "a X Y\nb X\n",
            &mut words,
            &mut labels,
        )
        .unwrap_err();

        match err {
            SeqTensorError::MalformedLine {
                source_name,
                line,
                expected,
                found,
            } => {
                assert_eq!(source_name, "test.conll");
                assert_eq!(line, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn closed_word_alphabet_maps_unseen_to_default() {
        let mut words = Alphabet::new("word");
        let mut labels = Alphabet::new("pos");
        words.get_index("known");
        words.close();

        let corpus = read(
            &CorpusReader::new(0, 1),
            "known X\nunseen X\n",
            &mut words,
            &mut labels,
        )
        .unwrap();

        assert_eq!(corpus.sentences[0].word_ids, vec![1, DEFAULT_INDEX]);
        assert_eq!(corpus.sentences[0].words, vec!["known", "unseen"]);
        assert_eq!(words.size(), 2);
    }

    #[test]
    fn closed_label_alphabet_rejects_unseen_label() {
        let mut words = Alphabet::new("word");
        let mut labels = Alphabet::new("pos");
        labels.get_index("X");
        labels.close();

        let err = read(
            &CorpusReader::new(0, 1),
            "a X\nb Y\n",
            &mut words,
            &mut labels,
        )
        .unwrap_err();
        assert!(matches!(err, SeqTensorError::UnknownLabel { line: 2, ref label, .. } if label == "Y"));
    }

    #[test]
    fn empty_input_leaves_alphabets_untouched() {
        let mut words = Alphabet::new("word");
        let mut labels = Alphabet::new("pos");
        let corpus = read(&CorpusReader::new(0, 1), "", &mut words, &mut labels).unwrap();

        assert!(corpus.is_empty());
        assert_eq!(corpus.max_length(), 0);
        assert_eq!(words.size(), 1);
        assert_eq!(labels.size(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut words = Alphabet::new("word");
        let mut labels = Alphabet::new("pos");
        let err = CorpusReader::new(0, 1)
            .read("/nonexistent/train.conll", &mut words, &mut labels)
            .unwrap_err();
        assert!(matches!(err, SeqTensorError::Io { .. }));
    }
}
