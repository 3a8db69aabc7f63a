//! Validate command - surface registry data issues without generating certificates

use crate::cmd::read_registry;
use crate::core::{derive_pin, Employee, TaxYear, KES};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// JSON registry (company + employees) or employee CSV file
    #[arg(short, long)]
    registry: PathBuf,

    /// Tax year whose statutory caps to check against
    #[arg(short, long)]
    year: Option<i32>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    employee_id: String,
    employee: String,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let year = TaxYear(self.year.unwrap_or(2025));
        let (_, employees) = read_registry(&self.registry)?;

        let issues: Vec<ValidationIssue> = employees
            .iter()
            .flat_map(|e| check_employee(e, year))
            .collect();

        if self.json {
            self.print_json(&issues)?;
        } else {
            self.print_text(&issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue]) {
        println!();
        println!("VALIDATION RESULTS");
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();

            for (i, issue) in issues.iter().enumerate() {
                println!(
                    "  {}. [{}] {} ({})",
                    i + 1,
                    issue.issue_type,
                    issue.employee,
                    issue.employee_id
                );
                println!("     {}", issue.message);
                println!();
            }
        }
    }

    fn print_json(&self, issues: &[ValidationIssue]) -> anyhow::Result<()> {
        let output = ValidationOutput {
            issue_count: issues.len(),
            issues: issues.to_vec(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn check_employee(employee: &Employee, year: TaxYear) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut push = |issue_type: &str, message: String| {
        issues.push(ValidationIssue {
            issue_type: issue_type.to_string(),
            employee_id: employee.id.clone(),
            employee: employee.full_name(),
            message,
        });
    };

    if employee.gross_pay <= Decimal::ZERO {
        push(
            "NonPositiveSalary",
            format!(
                "gross pay is {} - PAYE cannot be computed",
                employee.gross_pay
            ),
        );
    }

    if employee.kra_pin.is_none() {
        push(
            "MissingPin",
            format!(
                "no KRA PIN recorded - derived placeholder {} will appear on the certificate",
                derive_pin(&employee.id)
            ),
        );
    }

    if !employee.currency.eq_ignore_ascii_case(KES) {
        match employee.conversion_rate {
            None => push(
                "MissingConversionRate",
                format!(
                    "paid in {} but no conversion rate to KES recorded",
                    employee.currency
                ),
            ),
            Some(rate) if rate <= Decimal::ZERO => push(
                "InvalidConversionRate",
                format!("conversion rate {} is not positive", rate),
            ),
            Some(_) => {}
        }
    }

    if let (Some(employed), Some(terminated)) =
        (employee.date_of_employment, employee.termination_date)
    {
        if terminated < employed {
            push(
                "TerminationBeforeEmployment",
                format!("terminated {} before employment began {}", terminated, employed),
            );
        }
    }

    if let Some(interest) = employee.owner_occupied_interest {
        let cap = year.mortgage_interest_cap();
        if interest > cap {
            push(
                "ExcessiveInterest",
                format!(
                    "owner-occupied interest {} exceeds the monthly cap {} and will be capped",
                    interest, cap
                ),
            );
        }
    }

    issues
}
