pub mod extractor;
pub mod identity;
pub mod parameter_error_handler;
pub mod validate;

pub use extractor::{
    SafeComponentIdI64, SafeComputationIdI64, SafeFormulaIdI64, SafeOfferingIdI64, SafeStudentIdI64,
};
pub use identity::extract_user_id;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
