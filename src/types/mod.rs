pub mod errors;
pub mod field;
pub mod schema;
pub mod validation;

pub use errors::SchemaError;
pub use field::{Field, FieldOptions, FieldType};
pub use schema::{Schema, Tab};
pub use validation::{Limit, ValidationRules};
