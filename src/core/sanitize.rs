//! Trims words that read badly at the edges of generated text.

/// Words dropped when they end the output.
const DISALLOWED_TRAILING: &[&str] = &["and", "i", "mr"];
/// Words dropped when they start the output.
const DISALLOWED_LEADING: &[&str] = &["and", "him"];

/// Drop one disallowed trailing word, then one disallowed leading word.
///
/// Each check runs once; a second offending word left at either end stays.
/// The trailing check runs first, so `["and"]` becomes empty.
pub fn sanitize(words: &mut Vec<String>) {
    if words
        .last()
        .is_some_and(|w| DISALLOWED_TRAILING.contains(&w.as_str()))
    {
        words.pop();
    }

    if words
        .first()
        .is_some_and(|w| DISALLOWED_LEADING.contains(&w.as_str()))
    {
        words.remove(0);
    }
}
