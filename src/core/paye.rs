use super::kenya::{BracketSchedule, Month, TaxYear};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PayeError {
    #[error("annual gross salary must be positive, got {0}")]
    NonPositiveSalary(Decimal),
    #[error("{field} must not be negative, got {amount}")]
    NegativeAmount {
        field: &'static str,
        amount: Decimal,
    },
}

/// One employee's pay facts for a tax year, all amounts in Kshs.
#[derive(Debug, Clone)]
pub struct PayInput {
    /// Annual gross salary
    pub annual_gross: Decimal,
    /// Fixed monthly non-cash benefits; when absent, valued at the
    /// configured rate of basic salary
    pub benefits_non_cash: Option<Decimal>,
    /// Monthly value of employer-provided housing (column C)
    pub value_of_quarters: Decimal,
    /// Actual monthly defined-contribution retirement payment (column E2)
    pub pension_contribution: Decimal,
    /// Monthly owner-occupied mortgage interest (column F)
    pub owner_occupied_interest: Decimal,
    /// Monthly life/health insurance premiums
    pub insurance_premiums: Decimal,
}

impl PayInput {
    /// Pay input for a salary with no benefits, pension or reliefs recorded
    pub fn from_salary(annual_gross: Decimal) -> Self {
        PayInput {
            annual_gross,
            benefits_non_cash: None,
            value_of_quarters: Decimal::ZERO,
            pension_contribution: Decimal::ZERO,
            owner_occupied_interest: Decimal::ZERO,
            insurance_premiums: Decimal::ZERO,
        }
    }
}

/// Statutory configuration for PAYE calculation, fixed for a tax year.
///
/// Loaded once per run and shared read-only; a different jurisdiction or a
/// hypothetical schedule can be assembled directly for what-if runs.
#[derive(Debug, Clone)]
pub struct PayeRates {
    pub brackets: BracketSchedule,
    /// Monthly personal relief (column K)
    pub personal_relief: Decimal,
    /// Fixed retirement contribution ceiling (column E3)
    pub retirement_cap: Decimal,
    pub insurance_relief_rate: Decimal,
    pub insurance_relief_cap: Decimal,
    /// Monthly cap on deductible owner-occupied interest
    pub interest_cap: Decimal,
    /// Valuation rate for non-cash benefits when no fixed amount is recorded
    pub benefits_rate: Decimal,
}

impl PayeRates {
    /// Statutory rates in force for a tax year
    pub fn for_year(year: TaxYear) -> Self {
        PayeRates {
            brackets: year.brackets(),
            personal_relief: year.personal_relief(),
            retirement_cap: year.retirement_cap(),
            insurance_relief_rate: year.insurance_relief_rate(),
            insurance_relief_cap: year.insurance_relief_cap(),
            interest_cap: year.mortgage_interest_cap(),
            benefits_rate: dec!(0.10),
        }
    }
}

/// One month's statutory deduction breakdown, the columns of the P9A form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyDeduction {
    pub month: Month,
    /// Column A
    pub basic_salary: Decimal,
    /// Column B
    pub benefits_non_cash: Decimal,
    /// Column C
    pub value_of_quarters: Decimal,
    /// Column D = A + B + C
    pub total_gross_pay: Decimal,
    /// Column E1, 30% of basic salary
    pub retirement_e1: Decimal,
    /// Column E2, actual contribution
    pub retirement_e2: Decimal,
    /// Column E3, statutory ceiling
    pub retirement_e3: Decimal,
    /// The lowest of E1/E2/E3
    pub retirement_contribution: Decimal,
    /// Column F, owner-occupied interest after the monthly cap
    pub owner_occupied_interest: Decimal,
    /// Column H = D minus the lowest of E minus F
    pub chargeable_pay: Decimal,
    /// Column J
    pub tax_charged: Decimal,
    /// Column K
    pub personal_relief: Decimal,
    pub insurance_relief: Decimal,
    /// Column L = J - K, floored at zero
    pub paye_net: Decimal,
}

impl MonthlyDeduction {
    /// Column G, the combined retirement and interest relief
    pub fn total_relief(&self) -> Decimal {
        self.retirement_contribution + self.owner_occupied_interest
    }
}

/// Compute one calendar month's PAYE breakdown.
///
/// Fails on invalid input; a returned record always satisfies the column
/// identities (D = A + B + C, lowest-of-E, H = D - G).
pub fn compute_month(
    month: Month,
    pay: &PayInput,
    rates: &PayeRates,
) -> Result<MonthlyDeduction, PayeError> {
    if pay.annual_gross <= Decimal::ZERO {
        return Err(PayeError::NonPositiveSalary(pay.annual_gross));
    }
    check_non_negative("value of quarters", pay.value_of_quarters)?;
    check_non_negative("pension contribution", pay.pension_contribution)?;
    check_non_negative("owner occupied interest", pay.owner_occupied_interest)?;
    check_non_negative("insurance premiums", pay.insurance_premiums)?;
    if let Some(benefits) = pay.benefits_non_cash {
        check_non_negative("benefits non cash", benefits)?;
    }

    let basic_salary = (pay.annual_gross / dec!(12)).round_dp(2);
    let benefits_non_cash = pay
        .benefits_non_cash
        .map(|b| b.round_dp(2))
        .unwrap_or_else(|| (basic_salary * rates.benefits_rate).round_dp(2));
    let value_of_quarters = pay.value_of_quarters.round_dp(2);
    let total_gross_pay = basic_salary + benefits_non_cash + value_of_quarters;

    let retirement_e1 = (basic_salary * dec!(0.30)).round_dp(2);
    let retirement_e2 = pay.pension_contribution.round_dp(2);
    let retirement_e3 = rates.retirement_cap;
    let retirement_contribution = retirement_e1.min(retirement_e2).min(retirement_e3);

    let owner_occupied_interest = pay
        .owner_occupied_interest
        .min(rates.interest_cap)
        .round_dp(2);

    let chargeable_pay =
        (total_gross_pay - retirement_contribution - owner_occupied_interest).max(Decimal::ZERO);
    let tax_charged = rates.brackets.tax_on(chargeable_pay).round_dp(2);

    let insurance_relief = (pay.insurance_premiums * rates.insurance_relief_rate)
        .round_dp(2)
        .min(rates.insurance_relief_cap);
    let paye_net =
        (tax_charged - rates.personal_relief - insurance_relief).max(Decimal::ZERO);

    log::debug!(
        "{month}: chargeable {chargeable_pay}, tax {tax_charged}, net PAYE {paye_net}"
    );

    Ok(MonthlyDeduction {
        month,
        basic_salary,
        benefits_non_cash,
        value_of_quarters,
        total_gross_pay,
        retirement_e1,
        retirement_e2,
        retirement_e3,
        retirement_contribution,
        owner_occupied_interest,
        chargeable_pay,
        tax_charged,
        personal_relief: rates.personal_relief,
        insurance_relief,
        paye_net,
    })
}

fn check_non_negative(field: &'static str, amount: Decimal) -> Result<(), PayeError> {
    if amount < Decimal::ZERO {
        Err(PayeError::NegativeAmount { field, amount })
    } else {
        Ok(())
    }
}
