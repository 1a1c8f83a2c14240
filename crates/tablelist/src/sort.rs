#![forbid(unsafe_code)]

//! Record ordering.
//!
//! The default order follows the usual locale collation with numeric
//! ordering: `example2` sorts before `example10`, whitespace and punctuation
//! sort before digits, digits before letters. Letters compare by base letter
//! first, then by accents, then lowercase before uppercase. Exact string order
//! breaks remaining ties so the order is total.

use crate::record::ItemRecord;
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Comparator used to order records after every insertion.
pub type SortFn = Box<dyn Fn(&ItemRecord, &ItemRecord) -> Ordering + Send + Sync>;

/// Natural id order.
#[must_use]
pub fn by_id(a: &ItemRecord, b: &ItemRecord) -> Ordering {
    natural_cmp(&a.id, &b.id)
}

/// The comparator installed on new lists.
#[must_use]
pub fn default_sort() -> SortFn {
    Box::new(by_id)
}

/// Compare strings in collation order, treating digit runs as numbers.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = collation_elements(a);
    let right = collation_elements(b);
    let primary = left.iter().map(|e| &e.primary).cmp(right.iter().map(|e| &e.primary));
    primary
        .then_with(|| {
            left.iter()
                .map(|e| e.accents.as_str())
                .cmp(right.iter().map(|e| e.accents.as_str()))
        })
        .then_with(|| left.iter().map(|e| e.upper).cmp(right.iter().map(|e| e.upper)))
        .then_with(|| a.cmp(b))
}

/// Base weight of one element. Variant order is the class order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Primary {
    Space(char),
    Punct(char),
    /// Significant digit count, then the digits without leading zeros.
    Number(usize, String),
    Letter(char),
}

#[derive(Debug, Clone)]
struct Element {
    primary: Primary,
    accents: String,
    upper: bool,
}

fn collation_elements(s: &str) -> Vec<Element> {
    let chars: Vec<char> = s.nfd().collect();
    let mut out: Vec<Element> = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let run: String = chars[start..i].iter().collect();
            let digits = run.trim_start_matches('0');
            out.push(Element {
                primary: Primary::Number(digits.len(), digits.to_owned()),
                accents: String::new(),
                upper: false,
            });
            continue;
        }
        i += 1;
        if is_combining_mark(c) {
            // A mark with nothing to attach to carries no weight.
            if let Some(last) = out.last_mut() {
                last.accents.push(c);
            }
            continue;
        }
        let primary = if c.is_whitespace() {
            Primary::Space(c)
        } else if c.is_alphanumeric() {
            Primary::Letter(c.to_lowercase().next().unwrap_or(c))
        } else {
            Primary::Punct(c)
        };
        out.push(Element {
            primary,
            accents: String::new(),
            upper: c.is_uppercase(),
        });
    }
    out
}
