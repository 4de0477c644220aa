//! Slug derivation for catalog identifiers.
//!
//! A slug is lowercase ASCII made of `[a-z0-9]` runs joined by single hyphens.
//! Non-ASCII letters are transliterated first; everything else that is not
//! alphanumeric collapses into a separator.

const SEPARATOR: char = '-';

/// Returns true if `text` contains any character from the Cyrillic blocks
/// (U+0400..=U+052F).
pub fn contains_cyrillic(text: &str) -> bool {
    text.chars().any(is_cyrillic)
}

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{052F}').contains(&c)
}

/// Generate a URL- and filesystem-safe slug from a display title.
///
/// Russian, Ukrainian and Belarusian letters use a fixed table; every other
/// non-ASCII character goes through `deunicode`. Returns an empty string when
/// the title has no letters or digits.
pub fn slugify(text: &str) -> String {
    let mut slug = SlugBuilder::default();

    for c in text.chars().flat_map(char::to_lowercase) {
        if c == '&' {
            slug.push_word("and");
        } else if c.is_ascii() {
            slug.push_ascii(c);
        } else if let Some(s) = transliterate_cyrillic(c) {
            slug.push_str(s);
        } else if let Some(s) = deunicode::deunicode_char(c) {
            s.chars()
                .for_each(|ascii| slug.push_ascii(ascii.to_ascii_lowercase()));
        } else {
            slug.separate();
        }
    }

    slug.out
}

#[derive(Default)]
struct SlugBuilder {
    out: String,
    pending_separator: bool,
}

impl SlugBuilder {
    fn push_ascii(&mut self, c: char) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if self.pending_separator && !self.out.is_empty() {
                self.out.push(SEPARATOR);
            }
            self.pending_separator = false;
            self.out.push(c);
        } else {
            self.separate();
        }
    }

    /// An empty `s` is dropped without splitting the word.
    fn push_str(&mut self, s: &str) {
        s.chars().for_each(|c| self.push_ascii(c));
    }

    fn push_word(&mut self, word: &str) {
        self.separate();
        self.push_str(word);
        self.separate();
    }

    fn separate(&mut self) {
        self.pending_separator = true;
    }
}

/// Map a lowercase Cyrillic letter to its ASCII spelling.
///
/// Soft and hard signs map to the empty string.
fn transliterate_cyrillic(c: char) -> Option<&'static str> {
    let s = match c {
        // Russian
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "io",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "i",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "iu",
        'я' => "ia",
        // Ukrainian and Belarusian
        'є' => "ie",
        'і' => "i",
        'ї' => "i",
        'ґ' => "g",
        'ў' => "u",
        _ => return None,
    };
    Some(s)
}
