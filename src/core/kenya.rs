use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// One band of a graduated PAYE schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBracket {
    /// Upper bound of monthly chargeable pay covered by this band;
    /// `None` marks the unbounded top band.
    pub up_to: Option<Decimal>,
    /// Marginal rate applied within the band.
    pub rate: Decimal,
}

/// Ordered list of marginal brackets over monthly chargeable pay.
///
/// Bands must be listed in ascending order of `up_to`, with at most one
/// unbounded band at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketSchedule(Vec<TaxBracket>);

impl BracketSchedule {
    pub fn new(brackets: Vec<TaxBracket>) -> Self {
        BracketSchedule(brackets)
    }

    /// Single-band schedule taxing everything at `rate`.
    pub fn flat(rate: Decimal) -> Self {
        BracketSchedule(vec![TaxBracket { up_to: None, rate }])
    }

    /// Tax charged on `amount` by marginal accumulation across the bands.
    /// Amounts at or below zero are not taxed.
    pub fn tax_on(&self, amount: Decimal) -> Decimal {
        let mut tax = Decimal::ZERO;
        let mut lower = Decimal::ZERO;
        for bracket in &self.0 {
            let in_band = match bracket.up_to {
                Some(upper) => (amount.min(upper) - lower).max(Decimal::ZERO),
                None => (amount - lower).max(Decimal::ZERO),
            };
            tax += in_band * bracket.rate;
            match bracket.up_to {
                Some(upper) if amount > upper => lower = upper,
                _ => break,
            }
        }
        tax
    }
}

/// Calendar month of a P9 row. Certificates always run January to December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kenya tax year (calendar year, 1 January to 31 December)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// Create a tax year from a date
    pub fn from_date(date: NaiveDate) -> Self {
        TaxYear(date.year())
    }

    /// Start date of the tax year (1 January)
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0, 1, 1).unwrap()
    }

    /// End date of the tax year (31 December)
    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0, 12, 31).unwrap()
    }

    pub fn display(&self) -> String {
        self.0.to_string()
    }

    /// Monthly personal relief (column K of the P9 form)
    pub fn personal_relief(&self) -> Decimal {
        match self.0 {
            // Kshs 2,400 per month since April 2020
            2020.. => dec!(2400),
            // Kshs 1,408 per month before that
            _ => dec!(1408),
        }
    }

    /// Fixed retirement contribution ceiling (column E3 of the P9 form)
    pub fn retirement_cap(&self) -> Decimal {
        match self.0 {
            // Raised to Kshs 360,000 by the Tax Laws (Amendment) Act 2024
            2025.. => dec!(360000),
            _ => dec!(240000),
        }
    }

    /// Relief rate on life/health insurance premiums
    pub fn insurance_relief_rate(&self) -> Decimal {
        dec!(0.15)
    }

    /// Monthly ceiling on insurance relief
    pub fn insurance_relief_cap(&self) -> Decimal {
        dec!(5000)
    }

    /// Monthly cap on deductible owner-occupied mortgage interest
    /// (column F of the P9 form)
    pub fn mortgage_interest_cap(&self) -> Decimal {
        match self.0 {
            2025.. => dec!(30000),
            _ => dec!(12500),
        }
    }

    /// Graduated monthly PAYE schedule for this year
    pub fn brackets(&self) -> BracketSchedule {
        match self.0 {
            // Finance Act 2023 added two upper bands to the long-standing three
            2023.. => BracketSchedule::new(vec![
                TaxBracket {
                    up_to: Some(dec!(24000)),
                    rate: dec!(0.10),
                },
                TaxBracket {
                    up_to: Some(dec!(32333)),
                    rate: dec!(0.25),
                },
                TaxBracket {
                    up_to: Some(dec!(500000)),
                    rate: dec!(0.30),
                },
                TaxBracket {
                    up_to: Some(dec!(800000)),
                    rate: dec!(0.325),
                },
                TaxBracket {
                    up_to: None,
                    rate: dec!(0.35),
                },
            ]),
            // 2021 through 2022
            _ => BracketSchedule::new(vec![
                TaxBracket {
                    up_to: Some(dec!(24000)),
                    rate: dec!(0.10),
                },
                TaxBracket {
                    up_to: Some(dec!(32333)),
                    rate: dec!(0.25),
                },
                TaxBracket {
                    up_to: None,
                    rate: dec!(0.30),
                },
            ]),
        }
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_year_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(TaxYear::from_date(date), TaxYear(2024));

        // Kenya's tax year is the calendar year, so 1 January already
        // belongs to the new year
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(TaxYear::from_date(date), TaxYear(2025));
    }

    #[test]
    fn tax_year_start_end_dates() {
        let ty = TaxYear(2024);
        assert_eq!(ty.start_date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(ty.end_date(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn tax_year_display() {
        assert_eq!(TaxYear(2024).display(), "2024");
    }

    #[test]
    fn personal_relief_amounts() {
        assert_eq!(TaxYear(2024).personal_relief(), dec!(2400));
        assert_eq!(TaxYear(2020).personal_relief(), dec!(2400));
        assert_eq!(TaxYear(2019).personal_relief(), dec!(1408));
    }

    #[test]
    fn retirement_caps() {
        assert_eq!(TaxYear(2024).retirement_cap(), dec!(240000));
        assert_eq!(TaxYear(2025).retirement_cap(), dec!(360000));
    }

    #[test]
    fn mortgage_interest_caps() {
        assert_eq!(TaxYear(2024).mortgage_interest_cap(), dec!(12500));
        assert_eq!(TaxYear(2025).mortgage_interest_cap(), dec!(30000));
    }

    #[test]
    fn months_run_january_to_december() {
        assert_eq!(Month::ALL.len(), 12);
        assert_eq!(Month::ALL[0], Month::January);
        assert_eq!(Month::ALL[11], Month::December);
        assert_eq!(Month::January.name(), "January");
    }

    #[test]
    fn flat_schedule_taxes_everything_at_one_rate() {
        let schedule = BracketSchedule::flat(dec!(0.30));
        assert_eq!(schedule.tax_on(dec!(90000)), dec!(27000.00));
        assert_eq!(schedule.tax_on(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn graduated_schedule_band_boundaries_2024() {
        let schedule = TaxYear(2024).brackets();

        // First band only
        assert_eq!(schedule.tax_on(dec!(24000)), dec!(2400.00));
        // First two bands exactly
        assert_eq!(schedule.tax_on(dec!(32333)), dec!(4483.25));
        // Into the 30% band
        assert_eq!(schedule.tax_on(dec!(90000)), dec!(21783.35));
        // Top of the 30% band
        assert_eq!(schedule.tax_on(dec!(500000)), dec!(144783.35));
        // Top of the 32.5% band
        assert_eq!(schedule.tax_on(dec!(800000)), dec!(242283.35));
        // Into the 35% band
        assert_eq!(schedule.tax_on(dec!(1000000)), dec!(312283.35));
    }

    #[test]
    fn graduated_schedule_pre_2023_has_three_bands() {
        let old = TaxYear(2022).brackets();
        let new = TaxYear(2024).brackets();

        // Below Kshs 500,000 the schedules agree
        assert_eq!(old.tax_on(dec!(90000)), new.tax_on(dec!(90000)));
        // Above it, the 2023+ schedule charges more
        assert_eq!(old.tax_on(dec!(600000)), dec!(174783.35));
        assert_eq!(new.tax_on(dec!(600000)), dec!(177283.35));
    }

    #[test]
    fn negative_amounts_are_not_taxed() {
        let schedule = TaxYear(2024).brackets();
        assert_eq!(schedule.tax_on(dec!(-4500)), Decimal::ZERO);
    }
}
