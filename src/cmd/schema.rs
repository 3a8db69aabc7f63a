//! Schema command - print expected registry input formats

use crate::core::RegistryInput;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the registry input
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(RegistryInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", CSV_COLUMNS.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("CSV Input Format");
        println!("================");
        println!();
        for (name, required, description) in CSV_FIELD_DESCRIPTIONS {
            let req = if *required { "required" } else { "optional" };
            println!("{:24} ({:8})  {}", name, req, description);
        }
        println!();
        println!("Amounts are monthly Kshs except gross_pay, which is annual.");
        Ok(())
    }
}

const CSV_COLUMNS: &[&str] = &[
    "id",
    "first_name",
    "middle_name",
    "surname",
    "department",
    "kra_pin",
    "gross_pay",
    "currency",
    "conversion_rate",
    "pension_contribution",
    "insurance_premiums",
    "owner_occupied_interest",
    "value_of_quarters",
    "benefits_non_cash",
    "date_of_employment",
    "termination_date",
];

const CSV_FIELD_DESCRIPTIONS: &[(&str, bool, &str)] = &[
    ("id", true, "Unique employee identifier"),
    ("first_name", true, "Employee's first name"),
    ("middle_name", false, "Employee's middle name"),
    ("surname", true, "Employee's surname (the form's main name)"),
    ("department", false, "Department name"),
    (
        "kra_pin",
        false,
        "Employee's KRA PIN; a stable placeholder is derived when absent",
    ),
    ("gross_pay", true, "Annual gross salary in `currency`"),
    ("currency", false, "Salary currency (defaults to KES)"),
    (
        "conversion_rate",
        false,
        "Rate to KES (required if currency != KES)",
    ),
    (
        "pension_contribution",
        false,
        "Actual monthly retirement contribution (column E2)",
    ),
    (
        "insurance_premiums",
        false,
        "Monthly life/health insurance premiums",
    ),
    (
        "owner_occupied_interest",
        false,
        "Monthly mortgage interest (column F, capped)",
    ),
    (
        "value_of_quarters",
        false,
        "Monthly value of employer housing (column C)",
    ),
    (
        "benefits_non_cash",
        false,
        "Fixed monthly non-cash benefits (column B)",
    ),
    (
        "date_of_employment",
        false,
        "Employment start date (YYYY-MM-DD)",
    ),
    ("termination_date", false, "Termination date (YYYY-MM-DD)"),
];
