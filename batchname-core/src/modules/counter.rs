use serde::{Deserialize, Serialize};

/// Rendered in place of a counter whose configuration is unusable
pub const COUNTER_SENTINEL: &str = "####";

/// Widest padding accepted; anything larger is treated as corrupted
const MAX_PADDING: i64 = 32;

/// A counter setting as stored in a chain file.
///
/// Integers are the normal form. Strings holding an integer are accepted for
/// hand-edited files; anything else is kept verbatim so the counter renders
/// the sentinel instead of failing the whole chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CounterValue {
    Int(i64),
    Raw(serde_json::Value),
}

impl CounterValue {
    pub fn resolve(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Raw(serde_json::Value::String(s)) => s.trim().parse().ok(),
            Self::Raw(_) => None,
        }
    }
}

impl From<i64> for CounterValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

fn default_one() -> CounterValue {
    CounterValue::Int(1)
}

fn default_zero() -> CounterValue {
    CounterValue::Int(0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSpec {
    #[serde(default = "default_one")]
    pub start: CounterValue,
    #[serde(default = "default_one")]
    pub step: CounterValue,
    #[serde(default = "default_zero")]
    pub padding: CounterValue,
}

impl CounterSpec {
    pub fn new(start: i64, step: i64, padding: i64) -> Self {
        Self {
            start: start.into(),
            step: step.into(),
            padding: padding.into(),
        }
    }

    /// Value for the file at `index`, `None` on corrupted settings or overflow
    pub fn value_at(&self, index: usize) -> Option<i64> {
        let start = self.start.resolve()?;
        let step = self.step.resolve()?;
        let index = i64::try_from(index).ok()?;
        index.checked_mul(step)?.checked_add(start)
    }

    fn padding(&self) -> Option<usize> {
        let padding = self.padding.resolve()?;
        if (0..=MAX_PADDING).contains(&padding) {
            usize::try_from(padding).ok()
        } else {
            None
        }
    }
}

/// Render `start + index * step` zero-padded to `padding` digits.
///
/// The sign is not part of the padding: padding 3 renders -3 as `-003`.
pub fn render_counter(spec: &CounterSpec, index: usize) -> String {
    let (Some(value), Some(padding)) = (spec.value_at(index), spec.padding()) else {
        return COUNTER_SENTINEL.to_string();
    };

    let sign = if value < 0 { "-" } else { "" };
    format!("{}{:0width$}", sign, value.unsigned_abs(), width = padding)
}
