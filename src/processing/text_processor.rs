//! Text normalization and tokenization

use regex::Regex;
use std::collections::HashSet;

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    whitespace_regex: Regex,
    token_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        // Two or more word characters, the usual TF-IDF token shape
        let token_regex = Regex::new(r"\b\w\w+\b").expect("Invalid token regex");

        Self {
            stop_words: Self::create_stop_words(),
            whitespace_regex,
            token_regex,
        }
    }

    /// Lowercase, fold typographic punctuation and collapse whitespace
    pub fn normalize(&self, text: &str) -> String {
        let folded = Self::normalize_unicode(&text.to_lowercase());
        self.whitespace_regex.replace_all(&folded, " ").trim().to_string()
    }

    /// Tokenize into lowercase terms with stop words removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = self.normalize(text);
        self.token_regex
            .find_iter(&normalized)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(token))
            .map(|token| token.to_string())
            .collect()
    }

    fn normalize_unicode(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2026}' => '.',
                '\u{00A0}' => ' ',
                _ => c,
            })
            .collect()
    }

    /// scikit-learn's English stop word list, so TF-IDF scores line up with
    /// `TfidfVectorizer(stop_words="english")`
    fn create_stop_words() -> HashSet<&'static str> {
        [
            "a", "about", "above", "across", "after", "afterwards", "again", "against",
            "all", "almost", "alone", "along", "already", "also", "although", "always",
            "am", "among", "amongst", "amoungst", "amount", "an", "and", "another", "any",
            "anyhow", "anyone", "anything", "anyway", "anywhere", "are", "around", "as",
            "at", "back", "be", "became", "because", "become", "becomes", "becoming",
            "been", "before", "beforehand", "behind", "being", "below", "beside",
            "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call",
            "can", "cannot", "cant", "co", "computer", "con", "could", "couldnt", "cry", "de",
            "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
            "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc",
            "even", "ever", "every", "everyone", "everything", "everywhere", "except",
            "few", "fifteen", "fifty", "fify", "fill", "find", "fire", "first", "five", "for",
            "former", "formerly", "forty", "found", "four", "from", "front", "full",
            "further", "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence",
            "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself",
            "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if", "in",
            "inc", "indeed", "interest", "into", "is", "it", "its", "itself", "keep",
            "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
            "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most",
            "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
            "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone",
            "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once",
            "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
            "ourselves", "out", "over", "own", "part", "per", "perhaps", "please", "put",
            "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious",
            "several", "she", "should", "show", "side", "since", "sincere", "six",
            "sixty", "so", "some", "somehow", "someone", "something", "sometime",
            "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
            "that", "the", "their", "them", "themselves", "then", "thence", "there",
            "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they",
            "thick", "thin", "third", "this", "those", "though", "three", "through",
            "throughout", "thru", "thus", "to", "together", "too", "top", "toward",
            "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
            "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
            "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein",
            "whereupon", "wherever", "whether", "which", "while", "whither", "who",
            "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
            "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_case() {
        let processor = TextProcessor::new();
        assert_eq!(processor.normalize("  Rest\n\tAPI   Design "), "rest api design");
    }

    #[test]
    fn test_normalize_folds_typographic_characters() {
        let processor = TextProcessor::new();
        assert_eq!(processor.normalize("Team\u{2019}s \u{201C}lead\u{201D}"), "team's \"lead\"");
    }

    #[test]
    fn test_tokenization_drops_stop_words_and_short_tokens() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("I have built a Python service and an R model");

        assert_eq!(tokens, vec!["built", "python", "service", "model"]);
    }

    #[test]
    fn test_english_stop_words_include_domain_terms() {
        // "go", "system" and "computer" are stop words in the scikit-learn list
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Go developer for computer vision system design, fifteen years");

        assert_eq!(tokens, vec!["developer", "vision", "design", "years"]);
    }

    #[test]
    fn test_empty_text() {
        let processor = TextProcessor::new();
        assert!(processor.tokenize("").is_empty());
        assert_eq!(processor.normalize(""), "");
    }
}
