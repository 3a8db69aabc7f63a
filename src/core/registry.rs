use super::paye::PayInput;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Read;

pub const KES: &str = "KES";

/// Employer identity as carried on statutory forms.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Company {
    pub id: String,
    pub name: String,
    /// Employer's KRA PIN
    pub pin: String,
    /// NSSF employer registration number
    #[serde(default)]
    pub nssf: Option<String>,
    /// NHIF employer registration number
    #[serde(default)]
    pub nhif: Option<String>,
}

/// One employee's registry entry.
///
/// Monetary amounts are monthly Kshs except `gross_pay`, which is the annual
/// gross salary in `currency`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub surname: String,
    #[serde(default)]
    pub department: Option<String>,
    /// Employee's KRA PIN; derived deterministically from the id when absent
    #[serde(default)]
    pub kra_pin: Option<String>,
    /// Annual gross salary in `currency`
    #[schemars(with = "f64")]
    pub gross_pay: Decimal,
    /// Salary currency; KES unless the employee is paid in foreign currency
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Conversion rate to KES; required when `currency` is not KES
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub conversion_rate: Option<Decimal>,
    /// Actual monthly retirement scheme contribution (column E2)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub pension_contribution: Option<Decimal>,
    /// Monthly life/health insurance premiums
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub insurance_premiums: Option<Decimal>,
    /// Monthly owner-occupied mortgage interest (column F)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub owner_occupied_interest: Option<Decimal>,
    /// Monthly value of employer-provided housing (column C)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub value_of_quarters: Option<Decimal>,
    /// Fixed monthly non-cash benefits (column B); valued at 10% of basic
    /// salary when absent
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub benefits_non_cash: Option<Decimal>,
    #[serde(default)]
    pub date_of_employment: Option<NaiveDate>,
    #[serde(default)]
    pub termination_date: Option<NaiveDate>,
}

fn default_currency() -> String {
    KES.to_string()
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.other_names(), self.surname)
    }

    /// Surname, the form's "Employee's Main Name"
    pub fn main_name(&self) -> &str {
        &self.surname
    }

    /// First and middle names, the form's "Employee's Other Names"
    pub fn other_names(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {}", self.first_name, middle),
            None => self.first_name.clone(),
        }
    }

    /// Annual gross salary converted to KES
    pub fn annual_gross_kes(&self) -> Decimal {
        self.gross_pay * self.conversion_rate.unwrap_or(Decimal::ONE)
    }

    /// Recorded KRA PIN, or a stable derived placeholder
    pub fn pin(&self) -> String {
        self.kra_pin.clone().unwrap_or_else(|| derive_pin(&self.id))
    }

    /// Pay facts consumed by the monthly calculator
    pub fn pay_input(&self) -> PayInput {
        PayInput {
            annual_gross: self.annual_gross_kes(),
            benefits_non_cash: self.benefits_non_cash,
            value_of_quarters: self.value_of_quarters.unwrap_or(Decimal::ZERO),
            pension_contribution: self.pension_contribution.unwrap_or(Decimal::ZERO),
            owner_occupied_interest: self.owner_occupied_interest.unwrap_or(Decimal::ZERO),
            insurance_premiums: self.insurance_premiums.unwrap_or(Decimal::ZERO),
        }
    }
}

/// Derive a stable placeholder PIN from the employee id.
///
/// Same shape as a KRA PIN (A + nine digits + suffix letter) and identical
/// on every run, so regenerating a certificate never changes it.
pub fn derive_pin(id: &str) -> String {
    let digest = Sha256::digest(id.as_bytes());
    let digits: String = digest[..9]
        .iter()
        .map(|b| char::from(b'0' + b % 10))
        .collect();
    format!("A{digits}Z")
}

/// Input root for the employer registry JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RegistryInput {
    pub company: Company,
    pub employees: Vec<Employee>,
}

/// Read a full registry (company plus employees) from JSON
pub fn read_json<R: Read>(reader: R) -> anyhow::Result<(Company, Vec<Employee>)> {
    let input: RegistryInput = serde_json::from_reader(reader)?;
    let mut employees = input.employees;
    normalize_employees(&mut employees);
    Ok((input.company, employees))
}

/// Read employees from the flat CSV registry format
pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records: Result<Vec<Employee>, _> = rdr.deserialize::<Employee>().collect();
    let mut employees = records?;
    normalize_employees(&mut employees);
    Ok(employees)
}

fn normalize_employees(employees: &mut Vec<Employee>) {
    for employee in employees.iter_mut() {
        // CSV rows carry an empty cell rather than a missing field
        if employee.currency.is_empty() {
            employee.currency = KES.to_string();
        }
    }
    employees.sort_by(|a, b| a.id.cmp(&b.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn employee(id: &str, gross: Decimal) -> Employee {
        Employee {
            id: id.to_string(),
            first_name: "Frank".to_string(),
            middle_name: None,
            surname: "Green".to_string(),
            department: Some("Engineering".to_string()),
            kra_pin: None,
            gross_pay: gross,
            currency: KES.to_string(),
            conversion_rate: None,
            pension_contribution: None,
            insurance_premiums: None,
            owner_occupied_interest: None,
            value_of_quarters: None,
            benefits_non_cash: None,
            date_of_employment: None,
            termination_date: None,
        }
    }

    #[test]
    fn parse_csv_registry() {
        let csv_data = "\
id,first_name,middle_name,surname,department,kra_pin,gross_pay,currency,conversion_rate,pension_contribution,insurance_premiums,owner_occupied_interest,value_of_quarters,benefits_non_cash,date_of_employment,termination_date
E002,Grace,,Hall,Marketing,A008765432C,1800000,KES,,20000,,,,,2021-03-15,
E001,Frank,,Green,Engineering,,1440000,USD,129.5,,,,,,2022-01-10,";

        let employees = read_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(employees.len(), 2);

        // Sorted by id
        assert_eq!(employees[0].id, "E001");
        assert_eq!(employees[1].id, "E002");

        assert_eq!(employees[0].currency, "USD");
        assert_eq!(employees[0].conversion_rate, Some(dec!(129.5)));
        assert_eq!(employees[0].kra_pin, None);
        assert_eq!(
            employees[0].date_of_employment,
            NaiveDate::from_ymd_opt(2022, 1, 10)
        );

        assert_eq!(employees[1].surname, "Hall");
        assert_eq!(employees[1].pension_contribution, Some(dec!(20000)));
        assert_eq!(employees[1].kra_pin.as_deref(), Some("A008765432C"));
    }

    #[test]
    fn parse_json_registry() {
        let json_data = r#"{
            "company": {
                "id": "C001",
                "name": "Innovate Inc.",
                "pin": "A12345678B",
                "nssf": "NSSF001"
            },
            "employees": [
                {
                    "id": "E001",
                    "first_name": "Frank",
                    "surname": "Green",
                    "gross_pay": 1200000,
                    "pension_contribution": 20000
                }
            ]
        }"#;

        let (company, employees) = read_json(json_data.as_bytes()).unwrap();
        assert_eq!(company.name, "Innovate Inc.");
        assert_eq!(company.pin, "A12345678B");
        assert_eq!(company.nhif, None);

        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].gross_pay, dec!(1200000));
        assert_eq!(employees[0].currency, KES);
        assert_eq!(employees[0].pension_contribution, Some(dec!(20000)));
    }

    #[test]
    fn annual_gross_converts_to_kes() {
        let mut e = employee("E001", dec!(12000));
        assert_eq!(e.annual_gross_kes(), dec!(12000));

        e.currency = "USD".to_string();
        e.conversion_rate = Some(dec!(130));
        assert_eq!(e.annual_gross_kes(), dec!(1560000));
    }

    #[test]
    fn name_split_follows_the_form() {
        let mut e = employee("E001", dec!(1200000));
        assert_eq!(e.main_name(), "Green");
        assert_eq!(e.other_names(), "Frank");
        assert_eq!(e.full_name(), "Frank Green");

        e.middle_name = Some("Otieno".to_string());
        assert_eq!(e.other_names(), "Frank Otieno");
    }

    #[test]
    fn derived_pin_is_stable_and_well_formed() {
        let pin = derive_pin("E001");
        assert_eq!(pin, derive_pin("E001"));
        assert_ne!(pin, derive_pin("E002"));

        assert_eq!(pin.len(), 11);
        assert!(pin.starts_with('A'));
        assert!(pin.ends_with('Z'));
        assert!(pin[1..10].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn recorded_pin_wins_over_derived() {
        let mut e = employee("E001", dec!(1200000));
        assert_eq!(e.pin(), derive_pin("E001"));

        e.kra_pin = Some("A001234567B".to_string());
        assert_eq!(e.pin(), "A001234567B");
    }
}
