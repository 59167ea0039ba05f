use quoteflow_core::catalog::{FieldType, FormConfigRegistry, FormFieldConfig};

use crate::commands::CommandResult;

pub fn list_series() -> CommandResult {
    let registry = FormConfigRegistry;
    let lines = registry
        .list_series()
        .into_iter()
        .filter_map(|series| registry.get_config(series))
        .map(|config| {
            let required = config.required_fields().count();
            format!("- {} ({} fields, {} required)", config.series, config.fields.len(), required)
        })
        .collect::<Vec<_>>();

    CommandResult::success("series", lines.join("\n"))
}

pub fn run(series: &str) -> CommandResult {
    let Some(config) = FormConfigRegistry.get_config(series.trim()) else {
        let known = FormConfigRegistry.list_series().join(", ");
        return CommandResult::failure(
            "fields",
            "unknown_series",
            format!("no form table for series `{}` (known: {known})", series.trim()),
            3,
        );
    };

    let mut lines = vec![format!("{} form fields:", config.series)];
    lines.extend(config.fields.iter().map(render_field));
    CommandResult::success("fields", lines.join("\n"))
}

fn render_field(field: &FormFieldConfig) -> String {
    let kind = match field.field_type {
        FieldType::Text => "text",
        FieldType::Select => "select",
        FieldType::Number => "number",
        FieldType::Textarea => "textarea",
    };
    let mut line = format!("- {} [{kind}]", field.name);
    if field.required {
        line.push_str(" required");
    }
    if !field.options.is_empty() {
        line.push_str(&format!(" options={}", field.options.join("|")));
    }
    if let Some(placeholder) = field.placeholder {
        line.push_str(&format!(" placeholder={placeholder:?}"));
    }
    line.push_str(&format!(" label_key={}", field.label_key));
    line
}
