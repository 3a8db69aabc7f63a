//! P9 command - render PAYE end-of-year certificates

use crate::cmd::read_registry;
use crate::core::{Company, Employee, MonthlyDeduction, P9Certificate, PayeRates, TaxYear};
use clap::Args;
use rust_decimal::Decimal;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct P9Command {
    /// JSON registry (company + employees) or employee CSV file
    #[arg(short, long)]
    registry: PathBuf,

    /// Tax year of the certificate (e.g., 2024)
    #[arg(short, long)]
    year: i32,

    /// Only this employee (id, or case-insensitive surname)
    #[arg(short, long)]
    employee: Option<String>,

    /// Employer name when the registry is a bare employee CSV
    #[arg(long)]
    employer_name: Option<String>,

    /// Employer KRA PIN when the registry is a bare employee CSV
    #[arg(long)]
    employer_pin: Option<String>,

    /// Output as CSV instead of formatted certificates
    #[arg(long)]
    csv: bool,

    /// Output as JSON instead of formatted certificates
    #[arg(long)]
    json: bool,
}

impl P9Command {
    pub fn exec(&self) -> anyhow::Result<()> {
        let year = TaxYear(self.year);
        let rates = PayeRates::for_year(year);
        let (company, employees) = read_registry(&self.registry)?;
        let company = self.resolve_company(company)?;

        let selected: Vec<&Employee> = employees.iter().filter(|e| self.matches(e)).collect();
        if selected.is_empty() {
            anyhow::bail!("no employees matched");
        }

        let certificates = selected
            .iter()
            .map(|e| {
                P9Certificate::build(&company, e, year, &rates)
                    .map_err(|err| anyhow::anyhow!("employee {}: {err}", e.id))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&certificates)?);
        } else if self.csv {
            self.write_csv(&certificates)?;
        } else {
            for certificate in &certificates {
                print_certificate(certificate, year);
            }
        }
        Ok(())
    }

    fn resolve_company(&self, from_registry: Option<Company>) -> anyhow::Result<Company> {
        if let Some(company) = from_registry {
            return Ok(company);
        }
        match (&self.employer_name, &self.employer_pin) {
            (Some(name), Some(pin)) => Ok(Company {
                id: String::new(),
                name: name.clone(),
                pin: pin.clone(),
                nssf: None,
                nhif: None,
            }),
            _ => anyhow::bail!(
                "CSV registries carry no employer details; pass --employer-name and --employer-pin"
            ),
        }
    }

    fn matches(&self, employee: &Employee) -> bool {
        match &self.employee {
            None => true,
            Some(wanted) => {
                employee.id.eq_ignore_ascii_case(wanted)
                    || employee.surname.eq_ignore_ascii_case(wanted)
            }
        }
    }

    fn write_csv(&self, certificates: &[P9Certificate]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for certificate in certificates {
            for month in &certificate.summary.months {
                let record = P9CsvRecord::new(certificate, month);
                wtr.serialize(record)?;
            }
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Row of the statutory fourteen-column table
#[derive(Tabled)]
struct P9Row {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Basic (A)")]
    basic_salary: String,
    #[tabled(rename = "Benefits (B)")]
    benefits_non_cash: String,
    #[tabled(rename = "Quarters (C)")]
    value_of_quarters: String,
    #[tabled(rename = "Gross (D)")]
    total_gross_pay: String,
    #[tabled(rename = "E1")]
    retirement_e1: String,
    #[tabled(rename = "E2")]
    retirement_e2: String,
    #[tabled(rename = "E3")]
    retirement_e3: String,
    #[tabled(rename = "Interest (F)")]
    owner_occupied_interest: String,
    #[tabled(rename = "Relief (G)")]
    total_relief: String,
    #[tabled(rename = "Chargeable (H)")]
    chargeable_pay: String,
    #[tabled(rename = "Tax (J)")]
    tax_charged: String,
    #[tabled(rename = "Relief (K)")]
    personal_relief: String,
    #[tabled(rename = "Insurance")]
    insurance_relief: String,
    #[tabled(rename = "PAYE (L)")]
    paye_net: String,
}

impl From<&MonthlyDeduction> for P9Row {
    fn from(m: &MonthlyDeduction) -> Self {
        P9Row {
            month: m.month.to_string(),
            basic_salary: format_amount(m.basic_salary),
            benefits_non_cash: format_amount(m.benefits_non_cash),
            value_of_quarters: format_amount(m.value_of_quarters),
            total_gross_pay: format_amount(m.total_gross_pay),
            retirement_e1: format_amount(m.retirement_e1),
            retirement_e2: format_amount(m.retirement_e2),
            retirement_e3: format_amount(m.retirement_e3),
            owner_occupied_interest: format_amount(m.owner_occupied_interest),
            total_relief: format_amount(m.total_relief()),
            chargeable_pay: format_amount(m.chargeable_pay),
            tax_charged: format_amount(m.tax_charged),
            personal_relief: format_amount(m.personal_relief),
            insurance_relief: format_amount(m.insurance_relief),
            paye_net: format_amount(m.paye_net),
        }
    }
}

/// CSV record for one certificate month
#[derive(serde::Serialize)]
struct P9CsvRecord {
    employee_id: String,
    employee_pin: String,
    month: String,
    basic_salary: String,
    benefits_non_cash: String,
    value_of_quarters: String,
    total_gross_pay: String,
    retirement_e1: String,
    retirement_e2: String,
    retirement_e3: String,
    owner_occupied_interest: String,
    total_relief: String,
    chargeable_pay: String,
    tax_charged: String,
    personal_relief: String,
    insurance_relief: String,
    paye_net: String,
}

impl P9CsvRecord {
    fn new(certificate: &P9Certificate, m: &MonthlyDeduction) -> Self {
        P9CsvRecord {
            employee_id: certificate.employee_id.clone(),
            employee_pin: certificate.employee_pin.clone(),
            month: m.month.to_string(),
            basic_salary: format!("{:.2}", m.basic_salary),
            benefits_non_cash: format!("{:.2}", m.benefits_non_cash),
            value_of_quarters: format!("{:.2}", m.value_of_quarters),
            total_gross_pay: format!("{:.2}", m.total_gross_pay),
            retirement_e1: format!("{:.2}", m.retirement_e1),
            retirement_e2: format!("{:.2}", m.retirement_e2),
            retirement_e3: format!("{:.2}", m.retirement_e3),
            owner_occupied_interest: format!("{:.2}", m.owner_occupied_interest),
            total_relief: format!("{:.2}", m.total_relief()),
            chargeable_pay: format!("{:.2}", m.chargeable_pay),
            tax_charged: format!("{:.2}", m.tax_charged),
            personal_relief: format!("{:.2}", m.personal_relief),
            insurance_relief: format!("{:.2}", m.insurance_relief),
            paye_net: format!("{:.2}", m.paye_net),
        }
    }
}

fn print_certificate(certificate: &P9Certificate, year: TaxYear) {
    println!();
    println!("KENYA REVENUE AUTHORITY - DOMESTIC TAXES DEPARTMENT");
    println!("PAYE END OF YEAR CERTIFICATE ({year})");
    println!();
    println!(
        "Employer's Name: {}    Employer's PIN: {}",
        certificate.employer_name, certificate.employer_pin
    );
    println!(
        "Employee's Main Name: {}    Other Names: {}    PIN: {}",
        certificate.employee_main_name,
        certificate.employee_other_names,
        certificate.employee_pin
    );
    println!();

    let rows: Vec<P9Row> = certificate.summary.months.iter().map(P9Row::from).collect();
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    println!();
    println!(
        "TOTAL CHARGEABLE PAY (COL. H): {}    TOTAL TAX (COL. L): {}",
        format_kes(certificate.summary.total_chargeable_pay),
        format_kes(certificate.summary.total_paye),
    );
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn format_kes(amount: Decimal) -> String {
    format!("Ksh {:.2}", amount)
}
