//! Display names for benchmark labels.
//!
//! Raw labels are the directory names produced by the benchmark runs (e.g.
//! `SEAL-CKKS-Batched`). Before they are printed as tick text they go through
//! a substitution table, and the resulting text may carry a small amount of
//! markup:
//!
//! - `\n` starts a new line, later lines are drawn as a smaller annotation,
//! - `^{...}` and `_{...}` raise or lower their content,
//! - `\dagger` is the footnote marker.
//!
//! With typesetting enabled the markup becomes Unicode (`E^{3}` -> `E³`).
//! Without it the delimiters are dropped and the text stays plain ASCII.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DisplayNames(BTreeMap<String, String>);

impl DisplayNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substituted text for `raw`, or `raw` itself if there is no entry.
    pub fn display<'a>(&'a self, raw: &'a str) -> &'a str {
        self.0.get(raw).map(|s| s.as_str()).unwrap_or(raw)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for DisplayNames {
    fn from(pairs: [(&str, &str); N]) -> Self {
        DisplayNames(
            pairs
                .iter()
                .map(|(raw, display)| (raw.to_string(), display.to_string()))
                .collect(),
        )
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Shift {
    Up,
    Down,
}

/// Render the markup in `text`, keeping line breaks.
pub fn render(text: &str, typeset: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("\\dagger") {
            out.push(if typeset { '†' } else { '*' });
            rest = tail;
            continue;
        }

        let shift = match c {
            '^' => Some(Shift::Up),
            '_' => Some(Shift::Down),
            _ => None,
        };
        let after: &str = &rest[c.len_utf8()..];
        let mut group = None;
        if let (Some(shift), Some(body)) = (shift, after.strip_prefix('{')) {
            if let Some(end) = body.find('}') {
                group = Some((shift, &body[..end], &body[end + 1..]));
            }
        }
        if let Some((shift, inner, tail)) = group {
            let inner = render(inner, typeset);
            if typeset {
                out.extend(inner.chars().map(|c| shifted(c, shift)));
            } else {
                out.push_str(&inner);
            }
            rest = tail;
            continue;
        }

        out.push(c);
        rest = after;
    }

    out
}

/// Text lines of a display name, after rendering its markup.
pub fn lines(text: &str, typeset: bool) -> Vec<String> {
    render(text, typeset)
        .split('\n')
        .map(|l| l.to_string())
        .collect()
}

fn shifted(c: char, shift: Shift) -> char {
    const DIGITS_UP: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    const DIGITS_DOWN: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

    if let Some(d) = c.to_digit(10) {
        return match shift {
            Shift::Up => DIGITS_UP[d as usize],
            Shift::Down => DIGITS_DOWN[d as usize],
        };
    }

    match (shift, c) {
        (Shift::Up, '+') => '⁺',
        (Shift::Up, '-') => '⁻',
        (Shift::Up, '(') => '⁽',
        (Shift::Up, ')') => '⁾',
        (Shift::Up, 'n') => 'ⁿ',
        (Shift::Up, 'i') => 'ⁱ',
        (Shift::Down, '+') => '₊',
        (Shift::Down, '-') => '₋',
        (Shift::Down, '(') => '₍',
        (Shift::Down, ')') => '₎',
        _ => c,
    }
}
