//! Page size for listing recent confessions.

/// Bounded number of confessions returned by a list request.
///
/// ## Invariants
/// - `1 <= value <= ListLimit::MAX`.
///
/// # Examples
/// ```
/// use confessions::domain::ListLimit;
///
/// assert_eq!(ListLimit::parse(Some("2")).get(), 2);
/// assert_eq!(ListLimit::parse(Some("abc")).get(), 50);
/// assert_eq!(ListLimit::parse(Some("10abc")).get(), 10);
/// assert_eq!(ListLimit::parse(None), ListLimit::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimit(u32);

impl ListLimit {
    /// Limit applied when the client gives none.
    pub const DEFAULT: u32 = 50;
    /// Largest page served in one response.
    pub const MAX: u32 = 500;

    /// Clamp `value` into range; zero selects the default.
    pub fn new(value: u32) -> Self {
        match value {
            0 => Self::default(),
            v => Self(v.min(Self::MAX)),
        }
    }

    /// Parse a raw `limit` query value.
    ///
    /// Only the leading integer counts, so `2.5` is 2 and `10abc` is 10.
    /// Missing, non-numeric, zero and negative values select the default.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(leading_integer)
            .filter(|value| *value > 0)
            .map_or_else(Self::default, |value| {
                Self::new(u32::try_from(value).unwrap_or(Self::MAX))
            })
    }

    /// Limit as an unsigned count.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Limit as the signed integer SQL `LIMIT` expects.
    pub fn as_i64(self) -> i64 {
        i64::from(self.0)
    }

    /// Limit as a collection length.
    pub fn as_usize(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

/// Integer prefix of `raw`: leading whitespace, an optional sign and the
/// digit run after it. Overlong runs saturate.
fn leading_integer(raw: &str) -> Option<i64> {
    let rest = raw.trim_start();
    let (negative, digits) = match rest.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, rest.strip_prefix('+').unwrap_or(rest)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let run = digits.get(..end).filter(|run| !run.is_empty())?;
    let magnitude = run.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

impl Default for ListLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
