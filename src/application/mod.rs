pub mod use_cases;

pub use use_cases::batch_valuation::BatchValuationUseCase;
pub use use_cases::manual_entry::{FormField, PropertyForm};
pub use use_cases::single_valuation::SingleValuationUseCase;
