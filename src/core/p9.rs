use super::kenya::{Month, TaxYear};
use super::paye::{compute_month, MonthlyDeduction, PayInput, PayeError, PayeRates};
use super::registry::{Company, Employee};
use rust_decimal::Decimal;
use serde::Serialize;

/// Twelve monthly deduction rows plus the annual totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualSummary {
    pub year: TaxYear,
    /// One record per calendar month, January through December
    pub months: Vec<MonthlyDeduction>,
    /// Sum of the chargeable pay column (the form's "TOTAL CHARGEABLE PAY")
    pub total_chargeable_pay: Decimal,
    /// Sum of the net PAYE column (the form's "TOTAL TAX")
    pub total_paye: Decimal,
}

/// Apply the monthly calculator across the calendar year.
///
/// Fails atomically: an invalid input yields no partial summary.
pub fn calculate_annual(
    year: TaxYear,
    pay: &PayInput,
    rates: &PayeRates,
) -> Result<AnnualSummary, PayeError> {
    let mut months = Vec::with_capacity(Month::ALL.len());
    for month in Month::ALL {
        months.push(compute_month(month, pay, rates)?);
    }
    let total_chargeable_pay = months.iter().map(|m| m.chargeable_pay).sum();
    let total_paye = months.iter().map(|m| m.paye_net).sum();
    Ok(AnnualSummary {
        year,
        months,
        total_chargeable_pay,
        total_paye,
    })
}

/// A filled-in PAYE end-of-year certificate for one employee.
#[derive(Debug, Clone, Serialize)]
pub struct P9Certificate {
    pub employer_name: String,
    pub employer_pin: String,
    pub employee_id: String,
    pub employee_main_name: String,
    pub employee_other_names: String,
    pub employee_pin: String,
    pub summary: AnnualSummary,
}

impl P9Certificate {
    pub fn build(
        company: &Company,
        employee: &Employee,
        year: TaxYear,
        rates: &PayeRates,
    ) -> Result<Self, PayeError> {
        let summary = calculate_annual(year, &employee.pay_input(), rates)?;
        Ok(P9Certificate {
            employer_name: company.name.clone(),
            employer_pin: company.pin.clone(),
            employee_id: employee.id.clone(),
            employee_main_name: employee.main_name().to_string(),
            employee_other_names: employee.other_names(),
            employee_pin: employee.pin(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kenya::BracketSchedule;
    use crate::core::registry::derive_pin;
    use rust_decimal_macros::dec;

    fn flat_rates() -> PayeRates {
        PayeRates {
            brackets: BracketSchedule::flat(dec!(0.30)),
            personal_relief: dec!(2400),
            retirement_cap: dec!(240000),
            insurance_relief_rate: dec!(0.15),
            insurance_relief_cap: dec!(5000),
            interest_cap: dec!(12500),
            benefits_rate: dec!(0.10),
        }
    }

    fn pay() -> PayInput {
        PayInput {
            pension_contribution: dec!(20000),
            ..PayInput::from_salary(dec!(1200000))
        }
    }

    fn company() -> Company {
        Company {
            id: "C001".to_string(),
            name: "Innovate Inc.".to_string(),
            pin: "A12345678B".to_string(),
            nssf: None,
            nhif: None,
        }
    }

    fn employee() -> Employee {
        Employee {
            id: "E001".to_string(),
            first_name: "Frank".to_string(),
            middle_name: None,
            surname: "Green".to_string(),
            department: None,
            kra_pin: None,
            gross_pay: dec!(1200000),
            currency: "KES".to_string(),
            conversion_rate: None,
            pension_contribution: Some(dec!(20000)),
            insurance_premiums: None,
            owner_occupied_interest: None,
            value_of_quarters: None,
            benefits_non_cash: None,
            date_of_employment: None,
            termination_date: None,
        }
    }

    #[test]
    fn annual_summary_covers_the_calendar_year() {
        let summary = calculate_annual(TaxYear(2024), &pay(), &flat_rates()).unwrap();

        assert_eq!(summary.months.len(), 12);
        assert_eq!(summary.months[0].month, Month::January);
        assert_eq!(summary.months[11].month, Month::December);
    }

    #[test]
    fn annual_totals_sum_the_monthly_columns() {
        let summary = calculate_annual(TaxYear(2024), &pay(), &flat_rates()).unwrap();

        // 12 identical months of 90,000 chargeable pay
        assert_eq!(summary.total_chargeable_pay, dec!(1080000));
        assert_eq!(summary.total_paye, dec!(295200));

        let chargeable: Decimal = summary.months.iter().map(|m| m.chargeable_pay).sum();
        assert_eq!(summary.total_chargeable_pay, chargeable);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let rates = flat_rates();
        let first = calculate_annual(TaxYear(2024), &pay(), &rates).unwrap();
        let second = calculate_annual(TaxYear(2024), &pay(), &rates).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn aggregation_fails_atomically_on_invalid_input() {
        let result = calculate_annual(
            TaxYear(2024),
            &PayInput::from_salary(Decimal::ZERO),
            &flat_rates(),
        );
        assert_eq!(
            result,
            Err(PayeError::NonPositiveSalary(Decimal::ZERO))
        );
    }

    #[test]
    fn certificate_maps_employer_and_employee_fields() {
        let cert =
            P9Certificate::build(&company(), &employee(), TaxYear(2024), &flat_rates()).unwrap();

        assert_eq!(cert.employer_name, "Innovate Inc.");
        assert_eq!(cert.employer_pin, "A12345678B");
        assert_eq!(cert.employee_id, "E001");
        assert_eq!(cert.employee_main_name, "Green");
        assert_eq!(cert.employee_other_names, "Frank");
        // No recorded PIN, so the derived placeholder is used
        assert_eq!(cert.employee_pin, derive_pin("E001"));
        assert_eq!(cert.summary.total_chargeable_pay, dec!(1080000));
    }
}
