//! Formatting of Coptic dates.

use super::{CopticDate, Month};

/// English month names, `Tout` to `Nasie`.
pub const MONTH_NAMES: &[&str] = &[
    "Tout",
    "Baba",
    "Hator",
    "Kiahk",
    "Toba",
    "Amshir",
    "Baramhat",
    "Baramouda",
    "Bashans",
    "Paona",
    "Epep",
    "Mesra",
    "Nasie",
];

/// Month name.
///
/// # Example
///
/// ```
/// use katameros::coptic::{self, Month};
///
/// assert_eq!("Kiahk", coptic::fmt::month(Month::Kiahk));
/// ```
pub fn month(m: Month) -> &'static str {
    MONTH_NAMES[m.num() as usize - 1]
}

/// Looks a month up by name, ignoring case.
///
/// ```
/// use katameros::coptic::{self, Month};
///
/// assert_eq!(Some(Month::Nasie), coptic::fmt::parse_month("nasie"));
/// assert_eq!(None, coptic::fmt::parse_month("Thermidor"));
/// ```
pub fn parse_month(name: &str) -> Option<Month> {
    let idx = MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name.trim()))?;
    Some(Month::ALL[idx])
}

/// `"Toba 6, 1741"`
pub fn date(date: &CopticDate) -> String {
    format!("{} {}, {}", month(date.month), date.day, date.year)
}

/// `"6 Toba"`
pub fn day_key(date: &CopticDate) -> String {
    format!("{} {}", date.day, month(date.month))
}

/// `"6 Toba 1741 AM"`
pub fn long(date: &CopticDate) -> String {
    format!("{} {} {} AM", date.day, month(date.month), date.year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_months() {
        assert_eq!(13, MONTH_NAMES.len());
        for m in Month::ALL {
            assert_eq!(Some(m), parse_month(month(m)));
        }
    }

    #[test]
    fn formats() {
        let nasie = CopticDate::new(1739, Month::Nasie, 6).unwrap();
        assert_eq!("Nasie 6, 1739", date(&nasie));
        assert_eq!("6 Nasie", day_key(&nasie));
        assert_eq!("6 Nasie 1739 AM", long(&nasie));
    }
}
