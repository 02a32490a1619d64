//! Typographic replacements (smart quotes, dashes, ellipsis, symbols).

use std::iter::Peekable;
use std::str::Chars;

/// Applies typographic replacements to one text node.
///
/// `previous` is the last character of text rendered before this node; it
/// decides the direction of a leading quote.
pub fn smarten(text: &str, previous: Option<char>) -> String {
    if !text.contains(['"', '\'', '-', '.', '(', '+']) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        replace_punctuation(c, &mut chars, &mut out, previous);
    }

    out
}

fn opens_quote(out: &str, previous: Option<char>) -> bool {
    match out.chars().next_back().or(previous) {
        None => true,
        Some(c) => c.is_whitespace() || "([{\u{201c}\u{2018}".contains(c),
    }
}

/// Replaces ASCII punctuation with smart Unicode equivalents.
fn replace_punctuation(
    c: char,
    chars: &mut Peekable<Chars<'_>>,
    out: &mut String,
    previous: Option<char>,
) {
    match c {
        '-' => match chars.peek() {
            Some('-') => {
                chars.next();
                match chars.peek() {
                    Some('-') => {
                        chars.next();
                        out.push('\u{2014}');
                    }
                    _ => out.push('\u{2013}'),
                }
            }
            _ => out.push('-'),
        },
        '.' => match chars.peek() {
            Some('.') => {
                if let Some('.') = chars.clone().nth(1) {
                    chars.next();
                    chars.next();
                    out.push('\u{2026}');
                } else {
                    out.push('.');
                }
            }
            _ => out.push('.'),
        },
        '(' => {
            let ahead: String = chars.clone().take(3).collect::<String>().to_ascii_lowercase();
            let symbol = if ahead.starts_with("c)") {
                Some(('\u{a9}', 2))
            } else if ahead.starts_with("r)") {
                Some(('\u{ae}', 2))
            } else if ahead == "tm)" {
                Some(('\u{2122}', 3))
            } else {
                None
            };
            match symbol {
                Some((symbol, len)) => {
                    for _ in 0..len {
                        chars.next();
                    }
                    out.push(symbol);
                }
                None => out.push('('),
            }
        }
        '+' => match chars.peek() {
            Some('-') => {
                chars.next();
                out.push('\u{b1}');
            }
            _ => out.push('+'),
        },
        '"' => out.push(if opens_quote(out, previous) {
            '\u{201c}'
        } else {
            '\u{201d}'
        }),
        '\'' => out.push(if opens_quote(out, previous) {
            '\u{2018}'
        } else {
            '\u{2019}'
        }),
        _ => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::smarten;

    #[test]
    fn transforms_basic_punctuation() {
        let out = smarten("Hello -- \"world\" ... and 'quote' --- end", None);
        assert_eq!(
            out,
            "Hello \u{2013} \u{201c}world\u{201d} \u{2026} and \u{2018}quote\u{2019} \u{2014} end"
        );
    }

    #[test]
    fn symbols() {
        assert_eq!(smarten("(c) (R) (TM) +-1", None), "\u{a9} \u{ae} \u{2122} \u{b1}1");
        assert_eq!(smarten("(a) (t)", None), "(a) (t)");
    }

    #[test]
    fn apostrophes_close() {
        assert_eq!(smarten("don't", None), "don\u{2019}t");
    }

    #[test]
    fn previous_text_decides_leading_quote() {
        assert_eq!(smarten("\" end", Some('b')), "\u{201d} end");
        assert_eq!(smarten("\"start", Some(' ')), "\u{201c}start");
        assert_eq!(smarten("\"start", None), "\u{201c}start");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(smarten("nothing to do here", None), "nothing to do here");
    }
}
