use katameros::coptic::{CopticDate, Month};
use katameros::feasts::{self, Feast, SUPPORTED_YEARS};
use katameros::seasons::{self, Season, Source};
use katameros::{CalendarError, Date, YearType};

fn date(y: i32, m: i32, d: i32) -> Date {
    Date::from_gregorian(y, m, d).unwrap()
}

#[test]
fn coptic_reference_points() {
    let coptic = CopticDate::from_date(date(2025, 1, 15));
    assert_eq!((1741, Month::Toba, 6), (coptic.year, coptic.month, coptic.day));
    assert_eq!("Toba 6, 1741", coptic.date_string());

    let coptic = CopticDate::from_date(date(2024, 12, 25));
    assert_eq!((1741, Month::Kiahk), (coptic.year, coptic.month));
}

#[test]
fn coptic_days_are_in_bounds() {
    let mut day = date(SUPPORTED_YEARS.start() - 1, 1, 1);
    let end = date(SUPPORTED_YEARS.end() + 1, 12, 31);
    while day <= end {
        let coptic = CopticDate::from_date(day);
        let limit = match coptic.month {
            Month::Nasie if YearType::from_coptic(coptic.year).is_leap() => 6,
            Month::Nasie => 5,
            _ => 30,
        };
        assert!((1..=limit).contains(&coptic.day), "{day}: {coptic:?}");
        let expected = format!("{} {}, {}", coptic.month.name(), coptic.day, coptic.year);
        assert_eq!(expected, coptic.date_string());
        day = day + 1;
    }
}

#[test]
fn invalid_dates() {
    for input in ["2025-02-30", "2025-13-01", "2025-01", "15/01/2025", ""] {
        assert!(matches!(input.parse::<Date>(), Err(CalendarError::InvalidDate(_))), "{input:?}");
    }
    assert_eq!(Ok(date(2025, 1, 15)), "2025-01-15".parse::<Date>());
}

#[test]
fn easter_fixed_points() {
    for (year, expected) in [
        (2018, date(2018, 4, 8)),
        (2020, date(2020, 4, 19)),
        (2021, date(2021, 5, 2)),
        (2025, date(2025, 4, 20)),
    ] {
        assert_eq!(Ok(expected), feasts::easter(year));
    }
    assert_eq!(Err(CalendarError::UnsupportedYear(1899)), feasts::easter(1899));
    assert_eq!(Err(CalendarError::UnsupportedYear(2200)), feasts::easter(2200));
}

#[test]
fn ten_feasts_every_year() {
    for year in SUPPORTED_YEARS {
        let feasts = feasts::moveable_feasts(year).unwrap();
        assert_eq!(10, feasts.len());
        assert_eq!(Feast::ALL.to_vec(), feasts.iter().map(|f| f.feast).collect::<Vec<_>>());
        assert!(feasts.windows(2).all(|w| w[0].date < w[1].date), "{year}");
        assert_eq!(feasts, feasts::moveable_feasts(year).unwrap());
    }
}

#[test]
fn periods_are_ordered_and_disjoint_across_years() {
    for year in *SUPPORTED_YEARS.start()..*SUPPORTED_YEARS.end() {
        let this = seasons::seasons(year).unwrap();
        let next = seasons::seasons(year + 1).unwrap();
        for period in &this {
            assert!(period.start <= period.end, "{year} {}", period.name());
            let following = next.iter().find(|p| p.season == period.season).unwrap();
            assert!(period.end < following.start, "{year} {}", period.name());
        }
    }
}

#[test]
fn nativity_fast() {
    let periods = seasons::fasting_periods(2025).unwrap();
    let nativity = periods.iter().find(|p| p.season == Season::NativityFast).unwrap();
    assert_eq!(Source::Fixed, nativity.source);
    assert_eq!((date(2025, 11, 25), date(2026, 1, 6)), (nativity.start, nativity.end));
    assert_eq!(43, nativity.days());
    assert_eq!(
        Some(Season::NativityFast),
        seasons::season_for(date(2026, 1, 6)).unwrap().map(|p| p.season)
    );
    assert_eq!(None, seasons::season_for(date(2026, 1, 7)).unwrap());
}

#[test]
fn fasting_calendar_spans_the_year() {
    for year in SUPPORTED_YEARS {
        let days = seasons::fasting_calendar(year).unwrap();
        // the Nativity Fast covers both ends of every year
        assert_eq!(date(year, 1, 1), days[0].date, "{year}");
        assert_eq!(date(year, 12, 31), days.last().unwrap().date, "{year}");
        let lent = days.iter().filter(|d| d.season == Some(Season::GreatLent)).count();
        assert_eq!(48, lent, "{year}");
    }
}
