pub mod form_config;

pub use form_config::{
    FieldType, FieldViolation, FormConfigRegistry, FormFieldConfig, ProductFormConfig,
};
