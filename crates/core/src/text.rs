//! Text - Immutable Codepoint Sequence
//!
//! `Text` is the runtime's string type. It stores decoded Unicode scalar
//! values in shared, immutable storage so that:
//! 1. Indexing and slicing are O(1) per codepoint (no UTF-8 walking)
//! 2. Cloning is a reference-count bump
//! 3. Equality, ordering and hashing are by content only
//!
//! Ordering is lexicographic by codepoint; when one text is a prefix of the
//! other the shorter one compares less. This is exactly the ordering of
//! `[char]`, so the comparison impls are derived from the storage.

use crate::error::{Result, RuntimeError};
use std::fmt;
use std::ops::{Add, Mul};
use std::sync::Arc;

/// Longest text `repeat` will build, in codepoints
pub const MAX_TEXT_LEN: usize = 1 << 28;

/// Immutable sequence of Unicode codepoints with value semantics
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Text {
    chars: Arc<[char]>,
}

impl Text {
    /// The empty text
    pub fn empty() -> Self {
        Text {
            chars: Arc::from(Vec::new()),
        }
    }

    /// Build from a codepoint slice (copies)
    pub fn from_chars(chars: &[char]) -> Self {
        Text {
            chars: Arc::from(chars),
        }
    }

    /// Number of codepoints
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Borrow the codepoints
    pub fn as_chars(&self) -> &[char] {
        &self.chars
    }

    /// Iterate over codepoints
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Codepoint at `index`, counting from the end when negative
    ///
    /// Returns a one-codepoint text. Fails with `IndexOutOfRange` when the
    /// normalized index falls outside `[0, len-1]`.
    pub fn index(&self, index: i64) -> Result<Text> {
        let len = self.len() as i64;
        let normalized = if index < 0 { index + len } else { index };
        if normalized < 0 || normalized >= len {
            return Err(RuntimeError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(Text::from_chars(&self.chars[normalized as usize..=normalized as usize]))
    }

    /// Extended slice `self[start:stop:step]`
    ///
    /// Bounds are clamped, never rejected. Only a zero step is an error.
    pub fn slice(&self, start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Result<Text> {
        let bounds = SliceBounds::resolve(self.len(), start, stop, step)?;
        if bounds.step == 1 {
            // Contiguous fast path
            if bounds.start >= bounds.stop {
                return Ok(Text::empty());
            }
            return Ok(Text::from_chars(
                &self.chars[bounds.start as usize..bounds.stop as usize],
            ));
        }
        Ok(bounds.indices().map(|i| self.chars[i]).collect())
    }

    /// `self + other`
    pub fn concat(&self, other: &Text) -> Text {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut chars = Vec::with_capacity(self.len() + other.len());
        chars.extend_from_slice(&self.chars);
        chars.extend_from_slice(&other.chars);
        Text {
            chars: Arc::from(chars),
        }
    }

    /// `self * times`; non-positive counts give the empty text
    ///
    /// Fails with `RepeatTooLarge` instead of allocating more than
    /// [`MAX_TEXT_LEN`] codepoints.
    pub fn repeat(&self, times: i64) -> Result<Text> {
        if times <= 0 || self.is_empty() {
            return Ok(Text::empty());
        }
        let too_large = RuntimeError::RepeatTooLarge {
            len: self.len(),
            times,
        };
        let count = usize::try_from(times).map_err(|_| too_large.clone())?;
        match self.len().checked_mul(count) {
            Some(total) if total <= MAX_TEXT_LEN => Ok(Text {
                chars: Arc::from(self.chars.repeat(count)),
            }),
            _ => Err(too_large),
        }
    }

    pub fn starts_with(&self, prefix: &Text) -> bool {
        self.chars.starts_with(&prefix.chars)
    }

    pub fn ends_with(&self, suffix: &Text) -> bool {
        self.chars.ends_with(&suffix.chars)
    }

    /// First codepoint index at or after `from` where `needle` occurs
    ///
    /// An empty needle matches at `from` (when `from <= len`).
    pub fn find_from(&self, needle: &Text, from: usize) -> Option<usize> {
        if from > self.len() {
            return None;
        }
        if needle.is_empty() {
            return Some(from);
        }
        self.chars[from..]
            .windows(needle.len())
            .position(|window| window == &needle.chars[..])
            .map(|offset| from + offset)
    }

    /// First codepoint index where `needle` occurs
    pub fn find(&self, needle: &Text) -> Option<usize> {
        self.find_from(needle, 0)
    }
}

impl Default for Text {
    fn default() -> Self {
        Text::empty()
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Text({:?})", self.to_string())
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for c in self.chars.iter() {
            f.write_char(*c)?;
        }
        Ok(())
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<char> for Text {
    fn from(c: char) -> Self {
        Text::from_chars(&[c])
    }
}

impl FromIterator<char> for Text {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let chars: Vec<char> = iter.into_iter().collect();
        Text {
            chars: Arc::from(chars),
        }
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.chars.iter().copied().eq(other.chars())
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        <Text as PartialEq<str>>::eq(self, other)
    }
}

impl Add<&Text> for &Text {
    type Output = Text;

    fn add(self, rhs: &Text) -> Text {
        self.concat(rhs)
    }
}

impl Add for Text {
    type Output = Text;

    fn add(self, rhs: Text) -> Text {
        self.concat(&rhs)
    }
}

impl Mul<i64> for &Text {
    type Output = Result<Text>;

    fn mul(self, times: i64) -> Result<Text> {
        self.repeat(times)
    }
}

/// Resolved slice bounds for a sequence of known length
///
/// Follows the host language's slice adjustment: omitted bounds default by
/// the sign of the step, negative bounds count from the end, and everything
/// is clamped into range. For a negative step the lower clamp is `-1` so that
/// a walk can reach index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceBounds {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl SliceBounds {
    pub fn resolve(
        len: usize,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    ) -> Result<SliceBounds> {
        let step = step.unwrap_or(1);
        if step == 0 {
            return Err(RuntimeError::ZeroSliceStep);
        }
        let len = len as i64;
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

        let clamp = |bound: i64| -> i64 {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };

        let start = match start {
            Some(s) => clamp(s),
            None if step < 0 => upper,
            None => lower,
        };
        let stop = match stop {
            Some(s) => clamp(s),
            None if step < 0 => lower,
            None => upper,
        };

        Ok(SliceBounds { start, stop, step })
    }

    /// Number of selected positions
    pub fn count(&self) -> usize {
        let span = if self.step > 0 && self.start < self.stop {
            self.stop.abs_diff(self.start)
        } else if self.step < 0 && self.start > self.stop {
            self.start.abs_diff(self.stop)
        } else {
            return 0;
        };
        ((span - 1) / self.step.unsigned_abs() + 1) as usize
    }

    /// Selected positions in walk order
    ///
    /// Every yielded position lies in `[0, len)`, so the offsets never
    /// leave `usize` even for steps near `i64::MIN`/`i64::MAX`.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        let SliceBounds { start, step, .. } = *self;
        let stride = step.unsigned_abs() as usize;
        let origin = start as usize;
        (0..self.count()).map(move |n| {
            if step > 0 {
                origin + n * stride
            } else {
                origin - n * stride
            }
        })
    }
}
