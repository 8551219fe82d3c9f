//! Japanese date recognition: era notation and Gregorian year forms.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// 令和 epoch: era year 1 is 2019.
const REIWA_OFFSET: u32 = 2018;

/// Convert a 令和 era year to its Gregorian year.
#[must_use]
pub fn reiwa_to_gregorian(era_year: u32) -> u32 {
    era_year + REIWA_OFFSET
}

/// Extract the first date mentioned in `text`, as `YYYY-MM-DD`.
///
/// Recognizes 令和N年M月D日 and YYYY年M月D日. Returns `None` when neither
/// form appears.
#[must_use]
pub fn extract_date(text: &str) -> Option<String> {
    static REIWA: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    if let Some(re) = crate::static_regex(&REIWA, r"令和(\d+)年(\d+)月(\d+)日") {
        if let Some(caps) = re.captures(text) {
            let year = reiwa_to_gregorian(cap_u32(&caps, 1)?);
            return Some(format_date(year, cap_u32(&caps, 2)?, cap_u32(&caps, 3)?));
        }
    }

    static GREGORIAN: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    if let Some(re) = crate::static_regex(&GREGORIAN, r"(\d{4})年(\d{1,2})月(\d{1,2})日") {
        if let Some(caps) = re.captures(text) {
            return Some(format_date(
                cap_u32(&caps, 1)?,
                cap_u32(&caps, 2)?,
                cap_u32(&caps, 3)?,
            ));
        }
    }

    None
}

fn cap_u32(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn format_date(year: u32, month: u32, day: u32) -> String {
    format!("{year}-{month:02}-{day:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn era_conversion() {
        assert_eq!(reiwa_to_gregorian(1), 2019);
        assert_eq!(reiwa_to_gregorian(7), 2025);
    }

    #[test]
    fn era_notation_is_extracted() {
        assert_eq!(
            extract_date("令和7年5月14日公布の改正について"),
            Some("2025-05-14".to_string())
        );
    }

    #[test]
    fn gregorian_notation_is_extracted() {
        assert_eq!(
            extract_date("2026年4月1日に施行"),
            Some("2026-04-01".to_string())
        );
    }

    #[test]
    fn era_notation_wins_when_both_appear() {
        assert_eq!(
            extract_date("令和7年5月14日公布、2026年4月1日施行"),
            Some("2025-05-14".to_string())
        );
    }

    #[test]
    fn no_date_yields_none() {
        assert_eq!(extract_date("改正情報はありません"), None);
    }
}
