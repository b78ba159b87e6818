use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A showtime label in canonical `H:MM AM|PM` form.
///
/// Input is accepted case-insensitively, with or without a leading zero on the
/// hour and with or without a space before the meridiem, so `"07:00pm"` and
/// `"7:00 PM"` name the same showtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShowTiming(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidShowTiming(pub String);

impl fmt::Display for InvalidShowTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid show timing '{}' (expected H:MM AM/PM)", self.0)
    }
}

impl ShowTiming {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ShowTiming {
    type Err = InvalidShowTiming;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidShowTiming(raw.to_string());

        let upper = raw.trim().to_ascii_uppercase();
        let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest, "AM")
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest, "PM")
        } else {
            return Err(invalid());
        };

        // At most one space between the clock and the meridiem.
        let clock = clock.strip_suffix(' ').unwrap_or(clock);
        let (hours, minutes) = clock.split_once(':').ok_or_else(invalid)?;

        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
            return Err(invalid());
        }

        let hour: u8 = hours.parse().map_err(|_| invalid())?;
        let minute: u8 = minutes.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(invalid());
        }

        Ok(Self(format!("{}:{:02} {}", hour, minute, meridiem)))
    }
}

impl TryFrom<String> for ShowTiming {
    type Error = InvalidShowTiming;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShowTiming> for String {
    fn from(value: ShowTiming) -> Self {
        value.0
    }
}

impl fmt::Display for ShowTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_forms() {
        let cases = [
            ("7:00 PM", "7:00 PM"),
            ("07:00 pm", "7:00 PM"),
            ("7:00pm", "7:00 PM"),
            (" 12:30 AM ", "12:30 AM"),
            ("10:05am", "10:05 AM"),
        ];
        for (input, expected) in cases {
            let parsed: ShowTiming = input.parse().unwrap_or_else(|e| panic!("{} should parse: {}", input, e));
            assert_eq!(parsed.as_str(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for input in ["", "7 PM", "13:00 PM", "0:30 AM", "7:60 PM", "7:5 PM", "19:00", "7:00  PM", "7:00 XM", "a:bc PM"] {
            assert!(input.parse::<ShowTiming>().is_err(), "{:?} should be rejected", input);
        }
    }

    #[test]
    fn test_serde_uses_canonical_form() {
        let parsed: ShowTiming = serde_json::from_str("\"9:15pm\"").unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"9:15 PM\"");
        assert!(serde_json::from_str::<ShowTiming>("\"noon\"").is_err());
    }
}
