//! Pure transforms: each produces a new line and has no side effects.
//!
//! All of them operate on characters, not bytes, so multi-byte input
//! stays well-formed.

use libstage::{Output, Transform};

/// Uppercases the whole line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uppercaser;

impl Transform for Uppercaser {
    fn apply(&mut self, line: &str) -> Output {
        Output::Replace(line.to_uppercase())
    }
}

/// Moves the last character to the front: `abc` becomes `cab`.
///
/// An empty line has nothing to rotate and passes through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rotator;

impl Transform for Rotator {
    fn apply(&mut self, line: &str) -> Output {
        match line.chars().next_back() {
            None => Output::Pass,
            Some(last) => {
                let head = &line[..line.len() - last.len_utf8()];
                let mut rotated = String::with_capacity(line.len());
                rotated.push(last);
                rotated.push_str(head);
                Output::Replace(rotated)
            }
        }
    }
}

/// Reverses the line character by character.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flipper;

impl Transform for Flipper {
    fn apply(&mut self, line: &str) -> Output {
        Output::Replace(line.chars().rev().collect())
    }
}

/// Puts a single space between adjacent characters: `hi` becomes
/// `h i`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Expander;

impl Transform for Expander {
    fn apply(&mut self, line: &str) -> Output {
        let mut expanded = String::with_capacity(line.len() * 2);
        let mut chars = line.chars();

        if let Some(first) = chars.next() {
            expanded.push(first);
            for c in chars {
                expanded.push(' ');
                expanded.push(c);
            }
        }

        Output::Replace(expanded)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn applied(mut transform: impl Transform, line: &str) -> Output {
        transform.apply(line)
    }

    #[test]
    fn uppercases() {
        assert_eq!(
            applied(Uppercaser, "test"),
            Output::Replace("TEST".to_string())
        );
        assert_eq!(applied(Uppercaser, ""), Output::Replace(String::new()));
    }

    #[test]
    fn rotates_last_char_to_front() {
        assert_eq!(applied(Rotator, "abc"), Output::Replace("cab".to_string()));
        assert_eq!(applied(Rotator, "x"), Output::Replace("x".to_string()));
        assert_eq!(applied(Rotator, ""), Output::Pass);
    }

    #[test]
    fn rotates_multibyte_characters_whole() {
        assert_eq!(
            applied(Rotator, "ab→"),
            Output::Replace("→ab".to_string())
        );
        assert_eq!(
            applied(Rotator, "héllo"),
            Output::Replace("ohéll".to_string())
        );
    }

    #[test]
    fn two_rotations_compose() {
        let Output::Replace(once) = applied(Rotator, "abc") else {
            panic!("expected a replacement");
        };
        assert_eq!(applied(Rotator, &once), Output::Replace("bca".to_string()));
    }

    #[test]
    fn flips() {
        assert_eq!(
            applied(Flipper, "hello"),
            Output::Replace("olleh".to_string())
        );
        assert_eq!(applied(Flipper, ""), Output::Replace(String::new()));
    }

    #[test]
    fn expands_with_single_spaces() {
        assert_eq!(applied(Expander, "hi"), Output::Replace("h i".to_string()));
        assert_eq!(applied(Expander, "x"), Output::Replace("x".to_string()));
        assert_eq!(applied(Expander, ""), Output::Replace(String::new()));
        assert_eq!(
            applied(Expander, "abc"),
            Output::Replace("a b c".to_string())
        );
    }
}
