pub mod p9;
pub mod schema;
pub mod summary;
pub mod validate;

use crate::core::{registry, Company, Employee};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a registry file: JSON carries the employer, CSV is employees only.
pub fn read_registry(path: &Path) -> anyhow::Result<(Option<Company>, Vec<Employee>)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let (company, employees) = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let (company, employees) = registry::read_json(reader)?;
            (Some(company), employees)
        }
        // Default to CSV for .csv files and any other extension
        _ => (None, registry::read_csv(reader)?),
    };

    log::info!("Read {} employee record(s)", employees.len());
    Ok((company, employees))
}
