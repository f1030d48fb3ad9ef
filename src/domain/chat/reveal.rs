//! Reveal frames: the successive prefixes shown while a reply is revealed.

/// Iterates the prefixes of `text` that end on each character boundary.
///
/// A text of N characters yields exactly N frames, each one character longer
/// than the previous, the last equal to `text`. Empty text yields nothing.
pub fn reveal_frames(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.char_indices()
        .map(move |(idx, ch)| &text[..idx + ch.len_utf8()])
}

/// Number of frames [`reveal_frames`] yields for `text`.
pub fn frame_count(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn yields_one_frame_per_character() {
        let frames: Vec<_> = reveal_frames("abc").collect();
        assert_eq!(frames, vec!["a", "ab", "abc"]);
    }

    #[test]
    fn never_splits_multibyte_characters() {
        let frames: Vec<_> = reveal_frames("Lomé ✓").collect();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[3], "Lomé");
        assert_eq!(frames[5], "Lomé ✓");
    }

    #[test]
    fn empty_text_has_no_frames() {
        assert_eq!(reveal_frames("").count(), 0);
        assert_eq!(frame_count(""), 0);
    }

    proptest! {
        #[test]
        fn frames_grow_monotonically_to_full_text(text in ".{0,64}") {
            let frames: Vec<_> = reveal_frames(&text).collect();
            prop_assert_eq!(frames.len(), frame_count(&text));
            for pair in frames.windows(2) {
                prop_assert!(pair[1].starts_with(pair[0]));
                prop_assert_eq!(pair[1].chars().count(), pair[0].chars().count() + 1);
            }
            if let Some(last) = frames.last() {
                prop_assert_eq!(*last, text.as_str());
            }
        }
    }
}
