//! Record values: ordered, named fields with optional declared rules.
//!
//! A record stands in for a typed struct. Each field may carry a declared
//! rule list (e.g. `"required|email"`) supplied alongside the type's
//! definition; the rule engine folds those into the active rule set wherever
//! no explicit rule exists for the field's path.

use crate::value::Value;

/// Whether a field takes part in validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Exported,
    /// Not accessible from outside the type. Never traversed or addressed.
    Hidden,
}

/// A single field of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub value: Value,
    /// Separator-delimited rule list declared on the field's type definition.
    pub declared_rules: Option<String>,
    pub visibility: Visibility,
}

impl RecordField {
    pub fn is_exported(&self) -> bool {
        self.visibility == Visibility::Exported
    }
}

/// A named, ordered set of fields.
///
/// ```
/// use fieldguard_core::{Record, Value};
///
/// let user = Record::new("User")
///     .tagged("email", Value::string("a@b.io"), "required|email")
///     .field("nickname", Value::string("ada"))
///     .hidden("password_hash", Value::string("x"));
/// assert_eq!(user.exported_fields().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    type_name: String,
    fields: Vec<RecordField>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Add an exported field with no declared rules.
    pub fn field(self, name: impl Into<String>, value: Value) -> Self {
        self.push(RecordField {
            name: name.into(),
            value,
            declared_rules: None,
            visibility: Visibility::Exported,
        })
    }

    /// Add an exported field carrying a declared rule list.
    pub fn tagged(self, name: impl Into<String>, value: Value, rules: impl Into<String>) -> Self {
        self.push(RecordField {
            name: name.into(),
            value,
            declared_rules: Some(rules.into()),
            visibility: Visibility::Exported,
        })
    }

    /// Add a hidden field. Hidden fields keep their declared rules, if any,
    /// but the engine never reads them.
    pub fn hidden(self, name: impl Into<String>, value: Value) -> Self {
        self.push(RecordField {
            name: name.into(),
            value,
            declared_rules: None,
            visibility: Visibility::Hidden,
        })
    }

    pub fn push(mut self, field: RecordField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All fields in declaration order, hidden ones included.
    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    /// Fields visible to traversal, in declaration order.
    pub fn exported_fields(&self) -> impl Iterator<Item = &RecordField> {
        self.fields.iter().filter(|f| f.is_exported())
    }

    /// Look up an exported field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.exported_fields()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }
}
