use std::ops::Deref;

use serde::Deserialize;

/// Duration in the `"1d 2h 3m 4s 500ms"` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s)
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid duration: {s:?}")))
    }
}

fn parse(s: &str) -> Option<std::time::Duration> {
    s.split_whitespace()
        .map(|part| {
            let unit_start = part.find(|c: char| !c.is_ascii_digit())?;
            let (value, unit) = part.split_at(unit_start);
            let value = value.parse::<u64>().ok()?;
            let millis = match unit {
                "ms" => 1,
                "s" => 1000,
                "m" => 60 * 1000,
                "h" => 60 * 60 * 1000,
                "d" => 24 * 60 * 60 * 1000,
                _ => return None,
            };
            value.checked_mul(millis)
        })
        .try_fold(0u64, |total, millis| total.checked_add(millis?))
        .map(std::time::Duration::from_millis)
}
