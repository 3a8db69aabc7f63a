//! Summary command - aggregated annual payroll totals per employee

use crate::cmd::read_registry;
use crate::core::{calculate_annual, AnnualSummary, Employee, PayeRates, TaxYear};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// JSON registry (company + employees) or employee CSV file
    #[arg(short, long)]
    registry: PathBuf,

    /// Tax year to summarise (e.g., 2024)
    #[arg(short, long)]
    year: i32,

    /// Filter by department
    #[arg(short, long)]
    department: Option<String>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Annual totals for one employee
struct EmployeeTotals {
    id: String,
    name: String,
    annual_gross: Decimal,
    chargeable_pay: Decimal,
    tax_charged: Decimal,
    reliefs: Decimal,
    net_paye: Decimal,
}

impl EmployeeTotals {
    fn new(employee: &Employee, summary: &AnnualSummary) -> Self {
        let tax_charged = summary.months.iter().map(|m| m.tax_charged).sum();
        let reliefs = summary
            .months
            .iter()
            .map(|m| m.personal_relief + m.insurance_relief)
            .sum();

        EmployeeTotals {
            id: employee.id.clone(),
            name: employee.full_name(),
            annual_gross: employee.annual_gross_kes(),
            chargeable_pay: summary.total_chargeable_pay,
            tax_charged,
            reliefs,
            net_paye: summary.total_paye,
        }
    }
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData {
    tax_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    department: Option<String>,
    employee_count: usize,
    employees: Vec<EmployeeData>,
    total_chargeable_pay: String,
    total_paye: String,
}

#[derive(Debug, Serialize)]
struct EmployeeData {
    id: String,
    name: String,
    annual_gross: String,
    chargeable_pay: String,
    tax_charged: String,
    reliefs: String,
    net_paye: String,
}

impl From<&EmployeeTotals> for EmployeeData {
    fn from(t: &EmployeeTotals) -> Self {
        EmployeeData {
            id: t.id.clone(),
            name: t.name.clone(),
            annual_gross: format!("{:.2}", t.annual_gross),
            chargeable_pay: format!("{:.2}", t.chargeable_pay),
            tax_charged: format!("{:.2}", t.tax_charged),
            reliefs: format!("{:.2}", t.reliefs),
            net_paye: format!("{:.2}", t.net_paye),
        }
    }
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let year = TaxYear(self.year);
        let rates = PayeRates::for_year(year);
        let (_, employees) = read_registry(&self.registry)?;

        let selected: Vec<&Employee> = employees
            .iter()
            .filter(|e| self.matches_department(e))
            .collect();
        if selected.is_empty() {
            anyhow::bail!("no employees matched");
        }

        let mut totals = Vec::with_capacity(selected.len());
        for employee in &selected {
            let summary = calculate_annual(year, &employee.pay_input(), &rates)
                .map_err(|err| anyhow::anyhow!("employee {}: {err}", employee.id))?;
            totals.push(EmployeeTotals::new(employee, &summary));
        }

        if self.json {
            self.print_json(year, &totals)
        } else {
            self.print_table(year, &totals);
            Ok(())
        }
    }

    fn matches_department(&self, employee: &Employee) -> bool {
        match &self.department {
            None => true,
            Some(wanted) => employee
                .department
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(wanted)),
        }
    }

    fn print_table(&self, year: TaxYear, totals: &[EmployeeTotals]) {
        println!();
        match &self.department {
            Some(department) => println!("PAYROLL SUMMARY ({year}, {department})"),
            None => println!("PAYROLL SUMMARY ({year})"),
        }
        println!();

        let mut rows: Vec<SummaryRow> = totals.iter().map(SummaryRow::from).collect();
        rows.push(totals_row(totals));

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();
    }

    fn print_json(&self, year: TaxYear, totals: &[EmployeeTotals]) -> anyhow::Result<()> {
        let total_chargeable_pay: Decimal = totals.iter().map(|t| t.chargeable_pay).sum();
        let total_paye: Decimal = totals.iter().map(|t| t.net_paye).sum();

        let data = SummaryData {
            tax_year: year.display(),
            department: self.department.clone(),
            employee_count: totals.len(),
            employees: totals.iter().map(EmployeeData::from).collect(),
            total_chargeable_pay: format!("{:.2}", total_chargeable_pay),
            total_paye: format!("{:.2}", total_paye),
        };
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}

/// Row for the summary table output
#[derive(Debug, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Employee")]
    employee: String,
    #[tabled(rename = "Annual Gross")]
    annual_gross: String,
    #[tabled(rename = "Chargeable Pay")]
    chargeable_pay: String,
    #[tabled(rename = "Tax Charged")]
    tax_charged: String,
    #[tabled(rename = "Reliefs")]
    reliefs: String,
    #[tabled(rename = "Net PAYE")]
    net_paye: String,
}

impl From<&EmployeeTotals> for SummaryRow {
    fn from(t: &EmployeeTotals) -> Self {
        SummaryRow {
            employee: format!("{} ({})", t.name, t.id),
            annual_gross: format!("{:.2}", t.annual_gross),
            chargeable_pay: format!("{:.2}", t.chargeable_pay),
            tax_charged: format!("{:.2}", t.tax_charged),
            reliefs: format!("{:.2}", t.reliefs),
            net_paye: format!("{:.2}", t.net_paye),
        }
    }
}

fn totals_row(totals: &[EmployeeTotals]) -> SummaryRow {
    SummaryRow {
        employee: "TOTALS".to_string(),
        annual_gross: format!("{:.2}", totals.iter().map(|t| t.annual_gross).sum::<Decimal>()),
        chargeable_pay: format!(
            "{:.2}",
            totals.iter().map(|t| t.chargeable_pay).sum::<Decimal>()
        ),
        tax_charged: format!("{:.2}", totals.iter().map(|t| t.tax_charged).sum::<Decimal>()),
        reliefs: format!("{:.2}", totals.iter().map(|t| t.reliefs).sum::<Decimal>()),
        net_paye: format!("{:.2}", totals.iter().map(|t| t.net_paye).sum::<Decimal>()),
    }
}
