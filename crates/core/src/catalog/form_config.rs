use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::product::Product;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Select,
    Number,
    Textarea,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormFieldConfig {
    pub name: &'static str,
    /// i18n key resolved by the presentation layer.
    pub label_key: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub options: &'static [&'static str],
    pub placeholder: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductFormConfig {
    pub series: &'static str,
    pub fields: &'static [FormFieldConfig],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldViolation {
    MissingRequired { field: &'static str },
    UnknownOption { field: &'static str, value: String },
}

impl ProductFormConfig {
    pub fn field(&self, name: &str) -> Option<&FormFieldConfig> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FormFieldConfig> {
        self.fields.iter().filter(|field| field.required)
    }

    /// Checks product metadata against this series' fields. Blank values count
    /// as missing; select fields only accept their listed options. Keys with no
    /// matching field are ignored.
    pub fn validate(&self, values: &BTreeMap<String, String>) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        for field in self.fields {
            let value = values.get(field.name).map(|value| value.trim()).unwrap_or_default();
            if value.is_empty() {
                if field.required {
                    violations.push(FieldViolation::MissingRequired { field: field.name });
                }
                continue;
            }

            if field.field_type == FieldType::Select && !field.options.contains(&value) {
                violations.push(FieldViolation::UnknownOption {
                    field: field.name,
                    value: value.to_string(),
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

const NO_SUCH_PARAMETER: Option<&str> = Some("No such parameter, please fill in /");
const SPECIAL_NOTES_HINT: Option<&str> =
    Some("Enter any special requirements or additional details...");

const fn text(name: &'static str, label_key: &'static str) -> FormFieldConfig {
    FormFieldConfig {
        name,
        label_key,
        field_type: FieldType::Text,
        required: false,
        options: &[],
        placeholder: NO_SUCH_PARAMETER,
    }
}

const fn select(
    name: &'static str,
    label_key: &'static str,
    options: &'static [&'static str],
) -> FormFieldConfig {
    FormFieldConfig {
        name,
        label_key,
        field_type: FieldType::Select,
        required: false,
        options,
        placeholder: None,
    }
}

const SKU: FormFieldConfig = FormFieldConfig {
    name: "sku",
    label_key: "field_sku",
    field_type: FieldType::Text,
    required: true,
    options: &[],
    placeholder: NO_SUCH_PARAMETER,
};

const SPECIAL_NOTES: FormFieldConfig = FormFieldConfig {
    name: "specialNotes",
    label_key: "field_special_notes",
    field_type: FieldType::Textarea,
    required: false,
    options: &[],
    placeholder: SPECIAL_NOTES_HINT,
};

static WIG_FIELDS: [FormFieldConfig; 11] = [
    SKU,
    select(
        "hairFiber",
        "field_hair_fiber",
        &["Remy Human Hair", "Virgin Human Hair", "Synthetic Fiber", "Heat Friendly Synthetic"],
    ),
    select(
        "cap",
        "field_wig_cap_construction",
        &["Lace Front", "Full Lace", "Monofilament", "Basic Cap", "Hand Tied", "360 Lace"],
    ),
    select("capSize", "field_cap_size", &["Petite", "Average", "Large", "Custom"]),
    text("length", "field_length"),
    text("density", "field_density"),
    text("color", "field_color"),
    text("layers", "field_layers"),
    text("hairBangs", "field_hair_bangs"),
    text("curlStyle", "field_curl_style"),
    SPECIAL_NOTES,
];

static TOPPER_FIELDS: [FormFieldConfig; 13] = [
    SKU,
    select(
        "hairFiber",
        "field_hair_fiber",
        &["Human Hair", "Heat Friendly Synthetic", "Synthetic Fiber"],
    ),
    select(
        "cap",
        "field_base_construction",
        &["Monofilament", "Silk Top", "Lace Top", "Basic Base"],
    ),
    text("capSize", "field_base_size"),
    text("length", "field_length"),
    text("density", "field_density"),
    text("color", "field_color"),
    text("hairTexture", "field_hair_texture"),
    text("hairPart", "field_hair_part"),
    text("layers", "field_layers"),
    text("hairBangs", "field_hair_bangs"),
    text("curlStyle", "field_style"),
    SPECIAL_NOTES,
];

static FORM_CONFIGS: [ProductFormConfig; 2] = [
    ProductFormConfig { series: "Wig", fields: &WIG_FIELDS },
    ProductFormConfig { series: "Topper", fields: &TOPPER_FIELDS },
];

/// Read-only view over the static per-series form tables. New series are
/// added to `FORM_CONFIGS`; nothing is inferred at runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormConfigRegistry;

impl FormConfigRegistry {
    pub fn get_config(&self, series: &str) -> Option<&'static ProductFormConfig> {
        FORM_CONFIGS.iter().find(|config| config.series == series)
    }

    pub fn series_for(&self, product: &Product) -> Option<&'static ProductFormConfig> {
        self.get_config(&product.series)
    }

    pub fn list_series(&self) -> Vec<&'static str> {
        FORM_CONFIGS.iter().map(|config| config.series).collect()
    }
}
