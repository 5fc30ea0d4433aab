//! Placeholder text generator behind the `lorem` tag.
//!
//! Non-random output is the canonical corpus read in order, wrapping around
//! when more words or paragraphs are requested than it holds. Random output
//! samples words uniformly with replacement, and builds each paragraph from
//! two to five distinct corpus sentences in random order.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::RenderError;

/// Canonical paragraphs, emitted in order when randomization is off.
pub const PARAGRAPHS: &[&str] = &[
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor \
     incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
     exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure \
     dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. \
     Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt \
     mollit anim id est laborum.",
    "Sed ut perspiciatis unde omnis iste natus error sit voluptatem accusantium doloremque \
     laudantium, totam rem aperiam, eaque ipsa quae ab illo inventore veritatis et quasi \
     architecto beatae vitae dicta sunt explicabo. Nemo enim ipsam voluptatem quia voluptas \
     sit aspernatur aut odit aut fugit, sed quia consequuntur magni dolores eos qui ratione \
     voluptatem sequi nesciunt. Neque porro quisquam est, qui dolorem ipsum quia dolor sit \
     amet, consectetur, adipisci velit, sed quia non numquam eius modi tempora incidunt ut \
     labore et dolore magnam aliquam quaerat voluptatem.",
    "Ut enim ad minima veniam, quis nostrum exercitationem ullam corporis suscipit \
     laboriosam, nisi ut aliquid ex ea commodi consequatur? Quis autem vel eum iure \
     reprehenderit qui in ea voluptate velit esse quam nihil molestiae consequatur, vel \
     illum qui dolorem eum fugiat quo voluptas nulla pariatur?",
    "At vero eos et accusamus et iusto odio dignissimos ducimus qui blanditiis praesentium \
     voluptatum deleniti atque corrupti quos dolores et quas molestias excepturi sint \
     occaecati cupiditate non provident, similique sunt in culpa qui officia deserunt \
     mollitia animi, id est laborum et dolorum fuga. Et harum quidem rerum facilis est et \
     expedita distinctio. Nam libero tempore, cum soluta nobis est eligendi optio cumque \
     nihil impedit quo minus id quod maxime placeat facere possimus, omnis voluptas \
     assumenda est, omnis dolor repellendus.",
];

/// Lower-cased corpus words with punctuation stripped, in corpus order.
static WORDS: LazyLock<Vec<String>> = LazyLock::new(|| {
    PARAGRAPHS
        .iter()
        .flat_map(|p| p.split_whitespace())
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
});

/// Every corpus sentence, terminator included.
static SENTENCES: LazyLock<Vec<String>> =
    LazyLock::new(|| PARAGRAPHS.iter().flat_map(|p| split_sentences(p)).collect());

/// Split text after each `.` or `?` that ends a word.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
        if matches!(c, '.' | '?') && at_boundary {
            sentences.push(current.trim().to_string());
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }
    sentences
}

const MIN_SENTENCES: usize = 2;
const MAX_SENTENCES: usize = 5;

/// Largest number of words or paragraphs a single call may produce.
pub const MAX_COUNT: usize = 10_000;

/// How `lorem` output is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoremMode {
    /// `w`: space-separated words.
    Words,
    /// `p`: paragraphs wrapped in `<p>` markup.
    HtmlParagraphs,
    /// `b`: plain paragraphs separated by a blank line.
    #[default]
    PlainParagraphs,
}

impl LoremMode {
    /// Map the tag's mode letter to a mode.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "w" => Some(LoremMode::Words),
            "p" => Some(LoremMode::HtmlParagraphs),
            "b" => Some(LoremMode::PlainParagraphs),
            _ => None,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            LoremMode::Words => "w",
            LoremMode::HtmlParagraphs => "p",
            LoremMode::PlainParagraphs => "b",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LoremMode::Words => "word",
            LoremMode::HtmlParagraphs => "html-paragraph",
            LoremMode::PlainParagraphs => "plain-paragraph",
        }
    }
}

impl fmt::Display for LoremMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LoremMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_letter(s).ok_or_else(|| RenderError::UnknownMode { mode: s.to_string() })
    }
}

/// Generate `count` words or paragraphs of placeholder text.
///
/// A count of zero yields an empty string. Counts above [`MAX_COUNT`]
/// fail with [`RenderError::CountTooLarge`].
pub fn generate<R: Rng + ?Sized>(
    count: usize,
    mode: LoremMode,
    random: bool,
    rng: &mut R,
) -> Result<String, RenderError> {
    if count > MAX_COUNT {
        return Err(RenderError::CountTooLarge {
            count,
            max: MAX_COUNT,
        });
    }

    tracing::trace!(count, %mode, random, "generating placeholder text");

    let text = match mode {
        LoremMode::Words => words(count, random, rng).join(" "),
        LoremMode::PlainParagraphs => paragraphs(count, random, rng).join("\n\n"),
        LoremMode::HtmlParagraphs => paragraphs(count, random, rng)
            .iter()
            .map(|p| format!("<p>{p}</p>"))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(text)
}

/// String-mode entry point: `method` is the tag letter `w`, `p` or `b`.
pub fn lorem<R: Rng + ?Sized>(
    count: usize,
    method: &str,
    random: bool,
    rng: &mut R,
) -> Result<String, RenderError> {
    let mode: LoremMode = method.parse()?;
    generate(count, mode, random, rng)
}

fn words<R: Rng + ?Sized>(count: usize, random: bool, rng: &mut R) -> Vec<String> {
    if random {
        (0..count)
            .filter_map(|_| WORDS.choose(&mut *rng).cloned())
            .collect()
    } else {
        WORDS.iter().cycle().take(count).cloned().collect()
    }
}

fn paragraphs<R: Rng + ?Sized>(count: usize, random: bool, rng: &mut R) -> Vec<String> {
    if random {
        (0..count).map(|_| random_paragraph(&mut *rng)).collect()
    } else {
        PARAGRAPHS
            .iter()
            .cycle()
            .take(count)
            .map(|p| p.to_string())
            .collect()
    }
}

fn random_paragraph<R: Rng + ?Sized>(rng: &mut R) -> String {
    let amount = rng.gen_range(MIN_SENTENCES..=MAX_SENTENCES);
    SENTENCES
        .choose_multiple(rng, amount)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
