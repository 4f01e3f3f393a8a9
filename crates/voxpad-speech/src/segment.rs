//! Sentence segmentation — the unit of playback.
//!
//! Playback speaks one sentence per blocking engine call, so the segmenter
//! defines the granularity at which pause and stop become observable. The
//! boundary set is deliberately generous (newlines, semicolons and colons
//! count) to keep individual utterances short.

/// Characters that terminate a sentence. The boundary character stays
/// attached to the sentence it ends.
const BOUNDARY_CHARS: [char; 6] = ['.', '!', '?', '\n', ';', ':'];

/// Split text into trimmed, non-empty sentences in document order.
///
/// Total over all inputs: empty or whitespace-only text yields an empty
/// vector, which callers treat as "nothing to read" rather than starting
/// a playback session.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut buf = String::new();

    for ch in text.chars() {
        buf.push(ch);
        if BOUNDARY_CHARS.contains(&ch) {
            push_trimmed(&mut sentences, &buf);
            buf.clear();
        }
    }
    push_trimmed(&mut sentences, &buf);

    sentences
}

/// Trim `candidate` and append it if anything remains. Whitespace-only
/// fragments (runs of blank lines, space before a boundary) are dropped
/// here, so the output never contains empty entries.
fn push_trimmed(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_sentences() {
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn whitespace_only_input_yields_no_sentences() {
        assert!(split_sentences("   \n\t  \n").is_empty());
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        assert_eq!(split_sentences("A. B! C?"), vec!["A.", "B!", "C?"]);
    }

    #[test]
    fn boundary_free_text_is_one_sentence() {
        assert_eq!(split_sentences("  just one fragment  "), vec!["just one fragment"]);
    }

    #[test]
    fn newlines_semicolons_and_colons_are_boundaries() {
        assert_eq!(
            split_sentences("first line\nsecond; third: fourth"),
            vec!["first line", "second;", "third:", "fourth"]
        );
    }

    #[test]
    fn boundary_character_stays_attached() {
        let sentences = split_sentences("Hello world. How are you? Fine, thanks!");
        assert_eq!(
            sentences,
            vec!["Hello world.", "How are you?", "Fine, thanks!"]
        );
    }

    #[test]
    fn consecutive_boundaries_produce_no_empty_sentences() {
        assert_eq!(split_sentences("one...\n\n\ntwo!!"), vec!["one.", ".", ".", "two!", "!"]);
        assert!(split_sentences(".. .. ..").iter().all(|s| !s.trim().is_empty()));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_per_sentence() {
        assert_eq!(
            split_sentences("  spaced out .   and more  "),
            vec!["spaced out .", "and more"]
        );
    }

    #[test]
    fn is_total_over_unusual_input() {
        // Multi-byte characters and control characters must not panic.
        let _ = split_sentences("héllo wörld. ünïcode? \u{1F600}!");
        let _ = split_sentences("\u{0}\u{7f}\t\r");
    }
}
