use std::collections::BTreeSet;

use crate::domain::{EntityRef, PropertyId, Provenance, Statement, Value};
use crate::error::QsError;

pub fn serialize(
    entity: &EntityRef,
    statements: &[Statement],
    provenance: &Provenance,
    exclusions: &BTreeSet<PropertyId>,
) -> Result<String, QsError> {
    let mut output = String::new();
    if matches!(entity, EntityRef::PendingCreation) {
        output.push_str("CREATE\n");
    }
    output.push_str(&rows(entity, statements, provenance, exclusions)?);
    Ok(output)
}

pub fn rows(
    entity: &EntityRef,
    statements: &[Statement],
    provenance: &Provenance,
    exclusions: &BTreeSet<PropertyId>,
) -> Result<String, QsError> {
    let placeholder = entity.placeholder();
    let mut output = String::new();
    for statement in statements {
        let mut row = vec![
            placeholder.to_string(),
            statement.property.to_string(),
            cell(&statement.value)?,
        ];
        for (property, value) in &statement.qualifiers {
            row.push(property.to_string());
            row.push(cell(value)?);
        }
        if carries_provenance(&statement.property, provenance, exclusions) {
            for (property, value) in provenance.pairs() {
                row.push(property.source_code());
                row.push(cell(value)?);
            }
        }
        output.push_str(&row.join("\t"));
        output.push('\n');
    }
    Ok(output)
}

pub fn carries_provenance(
    property: &PropertyId,
    provenance: &Provenance,
    exclusions: &BTreeSet<PropertyId>,
) -> bool {
    !provenance.is_empty() && !property.is_term() && !exclusions.contains(property)
}

fn cell(value: &Value) -> Result<String, QsError> {
    let rendered = value.to_string();
    if rendered.contains(['\t', '\n', '\r']) {
        return Err(QsError::Unrepresentable(rendered));
    }
    Ok(rendered)
}
