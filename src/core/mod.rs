pub mod kenya;
pub mod p9;
pub mod paye;
pub mod registry;

// Flat public surface for domain types and functions.
pub use kenya::{BracketSchedule, Month, TaxBracket, TaxYear};
pub use p9::{calculate_annual, AnnualSummary, P9Certificate};
pub use paye::{compute_month, MonthlyDeduction, PayInput, PayeError, PayeRates};
pub use registry::{derive_pin, Company, Employee, RegistryInput, KES};
