//! Identifier representations accepted by gray rule evaluation.

use std::borrow::Cow;

/// An identifier that can be checked against a gray rule.
///
/// `membership_key` is compared against the rule's name list, `bucket_key`
/// is tested against each percent divisor.
pub trait GrayId {
    fn membership_key(&self) -> Cow<'_, str>;

    /// Value tested for divisibility by each percent divisor.
    fn bucket_key(&self) -> i64;
}

impl GrayId for str {
    fn membership_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }

    fn bucket_key(&self) -> i64 {
        string_hash(self)
    }
}

impl GrayId for String {
    fn membership_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }

    fn bucket_key(&self) -> i64 {
        string_hash(self)
    }
}

impl GrayId for i64 {
    fn membership_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    // The sign never affects divisibility.
    fn bucket_key(&self) -> i64 {
        *self
    }
}

/// Deterministic string hash used for percent buckets.
///
/// 31-polynomial over UTF-16 code units with wrapping 32-bit arithmetic,
/// widened to `i64` and made non-negative. Stable across processes and
/// platforms, so the same id always lands in the same buckets.
pub fn string_hash(id: &str) -> i64 {
    let h = id
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    i64::from(h).abs()
}
