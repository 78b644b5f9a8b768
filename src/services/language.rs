// src/services/language.rs
use serde::{Deserialize, Serialize};

/// The two languages the widget speaks. Everything else in the pipeline
/// resolves to exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    En,
}

impl Language {
    /// Parse a client-supplied hint. Anything unrecognized is treated as
    /// "no hint", never as an error.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint {
            "fr" => Some(Language::Fr),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    pub fn name_in_english(&self) -> &'static str {
        match self {
            Language::Fr => "French",
            Language::En => "English",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const FRENCH_WORDS: &[&str] = &[
    "je", "vous", "le", "la", "les", "un", "une", "et", "de", "du", "des", "avec", "pour", "dans",
    "sur", "être", "avoir", "faire", "aller", "pouvoir", "vouloir", "savoir", "devoir", "prendre",
    "venir", "voir", "donner", "parler", "aimer", "passer", "mettre", "dire", "partir", "sortir",
    "entrer", "rester", "tomber", "devenir", "tenir", "sembler", "laisser", "porter", "suivre",
    "vivre", "mourir", "naître", "connaître", "paraître", "choisir", "réussir", "finir", "grandir",
    "sentir", "dormir", "servir", "mentir",
];

const ENGLISH_WORDS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "the", "a", "an", "and", "or", "but", "in", "on",
    "at", "to", "for", "of", "with", "by", "from", "up", "about", "into", "through", "during",
    "before", "after", "above", "below", "between", "among", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "do", "does", "did", "will", "would", "could", "should",
    "may", "might", "must", "can", "get", "go", "come", "take", "give", "make", "know", "think",
    "see", "look", "want", "need", "try", "work", "use", "find", "help", "ask", "seem", "feel",
    "leave", "call",
];

/// Score the message against the two function-word lists. French wins only
/// on a strictly higher count; ties (including the all-zero case of empty
/// or non-verbal input) fall back to English.
pub fn detect(message: &str) -> Language {
    let lower = message.to_lowercase();

    let mut french = 0usize;
    let mut english = 0usize;
    for word in lower.split_whitespace() {
        if FRENCH_WORDS.contains(&word) {
            french += 1;
        }
        if ENGLISH_WORDS.contains(&word) {
            english += 1;
        }
    }

    if french > english { Language::Fr } else { Language::En }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn french_function_words_win() {
        assert_eq!(detect("je vous parle de la ferme"), Language::Fr);
        assert_eq!(detect("pouvez vous donner le prix pour un capteur"), Language::Fr);
    }

    #[test]
    fn english_function_words_win() {
        assert_eq!(detect("i want to know about the sensors"), Language::En);
        assert_eq!(detect("can you help with my farm"), Language::En);
    }

    #[test]
    fn ties_and_empty_fall_back_to_english() {
        assert_eq!(detect(""), Language::En);
        assert_eq!(detect("12345 !!! ???"), Language::En);
        // one word from each list
        assert_eq!(detect("je you"), Language::En);
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(detect("JE VOUS PARLE DE LA FERME"), Language::Fr);
    }

    #[test]
    fn hint_parsing_is_lenient() {
        assert_eq!(Language::from_hint("fr"), Some(Language::Fr));
        assert_eq!(Language::from_hint("en"), Some(Language::En));
        assert_eq!(Language::from_hint("es"), None);
        assert_eq!(Language::from_hint(""), None);
    }
}
