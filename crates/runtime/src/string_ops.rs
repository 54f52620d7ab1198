//! String operations for Tessera
//!
//! Derived text operations built on the `Text` primitives. All matching is
//! literal and codepoint based; nothing here is locale aware and there is no
//! case folding.
//!
//! # Design Decision: split Return Value
//!
//! `split` returns every fragment, including empty ones produced by adjacent
//! or boundary separators, so that `join(sep, split(s, sep)) == s` always
//! holds for a non-empty separator:
//! - "a,"    "," split → ["a", ""]
//! - ",a,,b" "," split → ["", "a", "", "b"]

use tessera_core::{Result, RuntimeError, Text, Value};

/// Split on every non-overlapping literal occurrence of `sep`, scanning left
/// to right
pub fn split(s: &Text, sep: &Text) -> Result<Vec<Text>> {
    if sep.is_empty() {
        return Err(RuntimeError::EmptySeparator);
    }
    let chars = s.as_chars();
    let mut parts = Vec::new();
    let mut cursor = 0;
    while let Some(pos) = s.find_from(sep, cursor) {
        parts.push(Text::from_chars(&chars[cursor..pos]));
        cursor = pos + sep.len();
    }
    parts.push(Text::from_chars(&chars[cursor..]));
    Ok(parts)
}

/// Split on runs of whitespace, dropping empty fragments
///
/// This is the separator-less form of split: leading and trailing whitespace
/// never produce empty fragments, and an all-whitespace text gives no parts.
pub fn split_whitespace(s: &Text) -> Vec<Text> {
    s.as_chars()
        .split(|c| c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(Text::from_chars)
        .collect()
}

/// Codepoint membership test used by the strip family
fn strip_set(chars: Option<&Text>) -> impl Fn(&char) -> bool + '_ {
    move |c: &char| match chars {
        Some(set) => set.as_chars().contains(c),
        None => c.is_whitespace(),
    }
}

fn leading_run(s: &Text, is_member: &impl Fn(&char) -> bool) -> usize {
    s.as_chars().iter().take_while(|c| is_member(*c)).count()
}

fn trailing_run(s: &Text, is_member: &impl Fn(&char) -> bool) -> usize {
    s.as_chars().iter().rev().take_while(|c| is_member(*c)).count()
}

/// Remove leading and trailing codepoints that belong to `chars`
///
/// `chars` is a set, not a substring: stripping "12" removes any run of '1'
/// and '2' from both ends. `None` strips whitespace.
pub fn strip(s: &Text, chars: Option<&Text>) -> Text {
    let is_member = strip_set(chars);
    let start = leading_run(s, &is_member);
    if start == s.len() {
        return Text::empty();
    }
    let end = s.len() - trailing_run(s, &is_member);
    Text::from_chars(&s.as_chars()[start..end])
}

/// Remove leading codepoints that belong to `chars`
pub fn lstrip(s: &Text, chars: Option<&Text>) -> Text {
    let start = leading_run(s, &strip_set(chars));
    Text::from_chars(&s.as_chars()[start..])
}

/// Remove trailing codepoints that belong to `chars`
pub fn rstrip(s: &Text, chars: Option<&Text>) -> Text {
    let end = s.len() - trailing_run(s, &strip_set(chars));
    Text::from_chars(&s.as_chars()[..end])
}

/// Concatenate produced items with `sep` between consecutive items
///
/// The producer is drained completely, in order, before any item is
/// inspected. A non-text item fails the whole join.
pub fn join<I>(sep: &Text, items: I) -> Result<Text>
where
    I: IntoIterator<Item = Value>,
{
    let items: Vec<Value> = items.into_iter().collect();
    let mut texts = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        match item {
            Value::Str(s) => texts.push(s),
            other => {
                return Err(RuntimeError::JoinItemNotText {
                    position,
                    type_name: other.type_name(),
                });
            }
        }
    }

    match texts.len() {
        0 => Ok(Text::empty()),
        1 => Ok(texts.swap_remove(0)),
        n => {
            let total: usize = texts.iter().map(Text::len).sum::<usize>() + sep.len() * (n - 1);
            let mut chars = Vec::with_capacity(total);
            for (i, text) in texts.iter().enumerate() {
                if i > 0 {
                    chars.extend_from_slice(sep.as_chars());
                }
                chars.extend_from_slice(text.as_chars());
            }
            Ok(Text::from_chars(&chars))
        }
    }
}

/// `sep.join(iterable)` for any iterable value
pub fn join_value(sep: &Text, iterable: &Value) -> Result<Text> {
    join(sep, iterable.materialize()?)
}

/// Replace every non-overlapping occurrence of `old` with `new`
///
/// The scan resumes after each replaced region, so replacements never
/// overlap and text inserted by `new` is never rescanned. An empty `old`
/// matches between every pair of codepoints and at both ends.
pub fn replace(s: &Text, old: &Text, new: &Text) -> Text {
    let chars = s.as_chars();
    let mut out: Vec<char> = Vec::with_capacity(s.len());

    if old.is_empty() {
        out.extend_from_slice(new.as_chars());
        for c in chars {
            out.push(*c);
            out.extend_from_slice(new.as_chars());
        }
        return Text::from_chars(&out);
    }

    let mut cursor = 0;
    while let Some(pos) = s.find_from(old, cursor) {
        out.extend_from_slice(&chars[cursor..pos]);
        out.extend_from_slice(new.as_chars());
        cursor = pos + old.len();
    }
    if cursor == 0 {
        return s.clone();
    }
    out.extend_from_slice(&chars[cursor..]);
    Text::from_chars(&out)
}

pub fn starts_with(s: &Text, prefix: &Text) -> bool {
    s.starts_with(prefix)
}

pub fn ends_with(s: &Text, suffix: &Text) -> bool {
    s.ends_with(suffix)
}

pub fn contains(s: &Text, sub: &Text) -> bool {
    s.find(sub).is_some()
}

/// Codepoint index of the first occurrence of `sub`, or -1
pub fn find(s: &Text, sub: &Text) -> i64 {
    s.find(sub).map(|i| i as i64).unwrap_or(-1)
}

/// Number of non-overlapping occurrences of `sub`
///
/// An empty `sub` matches at every position, including the end.
pub fn count(s: &Text, sub: &Text) -> usize {
    if sub.is_empty() {
        return s.len() + 1;
    }
    let mut n = 0;
    let mut cursor = 0;
    while let Some(pos) = s.find_from(sub, cursor) {
        n += 1;
        cursor = pos + sub.len();
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{ErrorKind, LazySequence};

    fn t(s: &str) -> Text {
        Text::from(s)
    }

    fn texts(parts: &[&str]) -> Vec<Text> {
        parts.iter().map(|p| t(p)).collect()
    }

    fn strs(parts: &[&str]) -> Vec<Value> {
        parts.iter().map(|p| Value::str(p)).collect()
    }

    #[test]
    fn test_split_literal_separator() {
        assert_eq!(split(&t("a,b,c"), &t(",")).unwrap(), texts(&["a", "b", "c"]));
        assert_eq!(
            split(&t("foo!!bar!!baz"), &t("!!")).unwrap(),
            texts(&["foo", "bar", "baz"])
        );
        assert_eq!(
            split(&t("this is string example....wow!!!"), &t("w")).unwrap(),
            texts(&["this is string example....", "o", "!!!"])
        );
    }

    #[test]
    fn test_split_keeps_boundary_fragments() {
        assert_eq!(split(&t("a,"), &t(",")).unwrap(), texts(&["a", ""]));
        assert_eq!(split(&t(",a,,b"), &t(",")).unwrap(), texts(&["", "a", "", "b"]));
        assert_eq!(split(&t(""), &t(",")).unwrap(), texts(&[""]));
        assert_eq!(split(&t("aaa"), &t("aa")).unwrap(), texts(&["", "a"]));
    }

    #[test]
    fn test_split_empty_separator() {
        let err = split(&t("abc"), &t("")).unwrap_err();
        assert_eq!(err, RuntimeError::EmptySeparator);
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_split_whitespace() {
        assert_eq!(
            split_whitespace(&t("  a b\t\nc  ")),
            texts(&["a", "b", "c"])
        );
        assert!(split_whitespace(&t("   ")).is_empty());
    }

    #[test]
    fn test_strip_charset_is_a_set() {
        let s = t("*****this is **string** example....wow!!!*****");
        assert_eq!(
            strip(&s, Some(&t("*"))),
            "this is **string** example....wow!!!"
        );
        assert_eq!(strip(&t("123abcrunoob321"), Some(&t("12"))), "3abcrunoob3");
    }

    #[test]
    fn test_strip_default_whitespace() {
        assert_eq!(strip(&t(" asd\n  asd \n"), None), "asd\n  asd");
        assert_eq!(strip(&t(" \t\n"), None), "");
        assert_eq!(strip(&t(""), None), "");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let set = t("12");
        let once = strip(&t("2121x1y2112"), Some(&set));
        assert_eq!(once, "x1y");
        assert_eq!(strip(&once, Some(&set)), once);
    }

    #[test]
    fn test_lstrip_rstrip() {
        assert_eq!(lstrip(&t("  ab  "), None), "ab  ");
        assert_eq!(rstrip(&t("  ab  "), None), "  ab");
        assert_eq!(rstrip(&t("xxaxx"), Some(&t("x"))), "xxa");
    }

    #[test]
    fn test_join() {
        let seq = strs(&["r", "u", "n", "o", "o", "b"]);
        assert_eq!(join(&t("-"), seq.clone()).unwrap(), "r-u-n-o-o-b");
        assert_eq!(join(&t(""), seq).unwrap(), "runoob");
        assert_eq!(join(&t("-"), Vec::new()).unwrap(), "");
        assert_eq!(join(&t("-"), strs(&["solo"])).unwrap(), "solo");
    }

    #[test]
    fn test_join_generator() {
        let seq = LazySequence::unfold(0i64, |i| {
            (*i < 5).then(|| {
                *i += 1;
                Value::Int(*i - 1).to_string().as_str().into()
            })
        });
        assert_eq!(join(&t("|"), seq.clone()).unwrap(), "0|1|2|3|4");
        assert!(seq.is_exhausted());
    }

    #[test]
    fn test_join_rejects_non_text() {
        let items = vec![Value::str("a"), Value::Int(1)];
        assert_eq!(
            join(&t(","), items).unwrap_err(),
            RuntimeError::JoinItemNotText {
                position: 1,
                type_name: "int"
            }
        );
    }

    #[test]
    fn test_join_drains_before_failing() {
        let seq = LazySequence::from_values(vec![Value::Int(1), Value::str("a")]);
        assert!(join(&t(","), seq.clone()).is_err());
        assert!(seq.is_exhausted());
    }

    #[test]
    fn test_join_value() {
        assert_eq!(join_value(&t("."), &Value::str("abc")).unwrap(), "a.b.c");
        assert!(join_value(&t("."), &Value::Int(3)).is_err());
    }

    #[test]
    fn test_join_inverts_split() {
        for (s, sep) in [("a,b,,c,", ","), ("foo!!bar", "!!"), ("", "x"), ("xx", "x")] {
            let parts = split(&t(s), &t(sep)).unwrap();
            let rejoined = join(&t(sep), parts.into_iter().map(Value::Str)).unwrap();
            assert_eq!(rejoined, s);
        }
    }

    #[test]
    fn test_replace() {
        assert_eq!(replace(&t("football"), &t("foo"), &t("ball")), "balltball");
        assert_eq!(replace(&t("aaaa"), &t("aa"), &t("a")), "aa");
        assert_eq!(replace(&t("abc"), &t("x"), &t("y")), "abc");
        assert_eq!(replace(&t("aa"), &t("a"), &t("aa")), "aaaa");
        assert_eq!(replace(&t("ab"), &t(""), &t("-")), "-a-b-");
    }

    #[test]
    fn test_prefix_and_suffix() {
        let s = t("football");
        assert!(starts_with(&s, &t("f")));
        assert!(!ends_with(&s, &t("o")));
        assert!(ends_with(&s, &t("ball")));
        assert!(starts_with(&t("this is string"), &t("this")));
        assert!(starts_with(&s, &t("")));
        assert!(!starts_with(&t("fo"), &t("foo")));
    }

    #[test]
    fn test_search_helpers() {
        let s = t("banana");
        assert!(contains(&s, &t("nan")));
        assert_eq!(find(&s, &t("na")), 2);
        assert_eq!(find(&s, &t("x")), -1);
        assert_eq!(count(&s, &t("a")), 3);
        assert_eq!(count(&s, &t("ana")), 1);
        assert_eq!(count(&t("ab"), &t("")), 3);
    }
}
