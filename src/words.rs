//! Word-frequency ranking over free-text notes.
//!
//! Tokens are whitespace-separated, lowercased and trimmed; tokens of two
//! characters or fewer are ignored. Counts are sorted in descending order and
//! words with equal counts keep the order in which they first appeared.

use crate::models::{Category, WordCloudData};
use std::collections::HashMap;

pub const MAX_WORDS: usize = 50;
const MIN_WORD_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: u32,
}

pub fn aggregate(text: &str) -> Vec<WordCount> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut ranked: Vec<WordCount> = Vec::new();

    for token in text.split_whitespace() {
        let word = token.to_lowercase();
        let word = word.trim();
        if word.chars().count() < MIN_WORD_CHARS {
            continue;
        }
        match slots.get(word) {
            Some(&slot) => ranked[slot].count += 1,
            None => {
                slots.insert(word.to_string(), ranked.len());
                ranked.push(WordCount {
                    word: word.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(MAX_WORDS);
    ranked
}

/// Rankings for the admin word clouds, one per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordCloudView {
    /// Nobody has written a note in any category.
    NoActivity,
    Clouds([CategoryCloud; 3]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCloud {
    pub category: Category,
    /// Empty when this category has no usable words.
    pub words: Vec<WordCount>,
}

impl WordCloudView {
    pub fn from_data(data: &WordCloudData) -> Self {
        if data.total_notes() == 0 {
            return WordCloudView::NoActivity;
        }
        WordCloudView::Clouds(Category::ALL.map(|category| CategoryCloud {
            category,
            words: aggregate(data.text(category)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ranked: &[WordCount]) -> Vec<&str> {
        ranked.iter().map(|w| w.word.as_str()).collect()
    }

    #[test]
    fn empty_and_blank_text_yield_nothing() {
        assert!(aggregate("").is_empty());
        assert!(aggregate("   ").is_empty());
        assert!(aggregate("\n\t  \r\n").is_empty());
    }

    #[test]
    fn short_tokens_are_dropped() {
        let ranked = aggregate("a an the to of go run");
        assert_eq!(words(&ranked), vec!["the", "run"]);
    }

    #[test]
    fn counts_are_case_insensitive_and_sorted() {
        let ranked = aggregate("Chess chess READING chess reading hiking");
        assert_eq!(
            ranked,
            vec![
                WordCount { word: "chess".into(), count: 3 },
                WordCount { word: "reading".into(), count: 2 },
                WordCount { word: "hiking".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn ties_keep_first_occurrence_order() {
        let ranked = aggregate("zebra apple mango apple zebra mango");
        assert_eq!(words(&ranked), vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn length_is_measured_in_characters() {
        let ranked = aggregate("שש ספר ספר קריאה");
        assert_eq!(words(&ranked), vec!["ספר", "קריאה"]);
        assert_eq!(ranked[0].count, 2);
    }

    #[test]
    fn output_is_capped_and_non_increasing() {
        let mut text = String::new();
        for i in 0..120 {
            for _ in 0..(i % 7 + 1) {
                text.push_str(&format!("word{i:03} "));
            }
        }

        let ranked = aggregate(&text);

        assert_eq!(ranked.len(), MAX_WORDS);
        assert!(ranked.windows(2).all(|pair| pair[0].count >= pair[1].count));
        assert!(ranked.iter().all(|w| w.word.chars().count() > 2));
        assert_eq!(ranked[0].count, 7);
    }

    #[test]
    fn categories_are_ranked_independently() {
        let data = WordCloudData {
            casual_text: "television television nap".into(),
            serious_text: "".into(),
            project_text: "garden shed".into(),
            casual_notes_count: 2,
            serious_notes_count: 0,
            project_notes_count: 1,
        };

        let WordCloudView::Clouds(clouds) = WordCloudView::from_data(&data) else {
            panic!("expected clouds");
        };
        assert_eq!(clouds[0].category, Category::Casual);
        assert_eq!(words(&clouds[0].words), vec!["television", "nap"]);
        assert!(clouds[1].words.is_empty());
        assert_eq!(words(&clouds[2].words), vec!["garden", "shed"]);
    }

    #[test]
    fn no_notes_means_no_activity() {
        assert_eq!(
            WordCloudView::from_data(&WordCloudData::default()),
            WordCloudView::NoActivity
        );
    }
}
