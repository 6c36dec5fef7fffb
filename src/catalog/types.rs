//! In-memory schema catalog: tables and fields discovered at startup.

use std::collections::HashMap;

/// Kind of value a column holds, inferred from its declared type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    FloatingPoint,
    Text,
}

impl FieldType {
    /// Infer from a declared type string such as `int4`, `int(11)`, `numeric(10,2)` or `varchar`.
    pub fn infer(declared: &str) -> Self {
        let t = declared.trim().to_ascii_lowercase();
        if is_int_token(&t) || t.starts_with("smallint") || t.starts_with("bigint") {
            return FieldType::Integer;
        }
        const FLOATING: &[&str] = &["float", "real", "double", "numeric", "decimal"];
        if FLOATING.iter().any(|p| t.starts_with(p)) {
            return FieldType::FloatingPoint;
        }
        FieldType::Text
    }

    /// Default cast target when a field is built without a declared type.
    fn default_sql_type(self) -> &'static str {
        match self {
            FieldType::Integer => "int8",
            FieldType::FloatingPoint => "float8",
            FieldType::Text => "text",
        }
    }
}

/// `int` followed by nothing, a width in digits, `eger`, a modifier list or a space.
/// Keeps `interval` out.
fn is_int_token(t: &str) -> bool {
    let Some(rest) = t.strip_prefix("int") else {
        return false;
    };
    rest.is_empty()
        || rest.chars().all(|c| c.is_ascii_digit())
        || rest.starts_with("eger")
        || rest.starts_with('(')
        || rest.starts_with(' ')
}

/// One column's metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub nullable: bool,
    pub is_primary: bool,
    /// Declared database type, used to cast text parameters (e.g. `$1::"int4"`).
    pub sql_type: String,
    /// Schema of a user-defined type; `None` for built-ins, which resolve unqualified.
    pub type_schema: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, nullable: bool, is_primary: bool) -> Self {
        Field {
            name: name.into(),
            field_type,
            nullable,
            is_primary,
            sql_type: field_type.default_sql_type().to_string(),
            type_schema: None,
        }
    }

    pub fn with_sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = sql_type.into();
        self
    }

    pub fn with_type_schema(mut self, schema: impl Into<String>) -> Self {
        self.type_schema = Some(schema.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct Table {
    pub schema: String,
    pub name: String,
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
    primary: Option<usize>,
}

impl Table {
    /// Builds the lookup index. Only the first field flagged primary keeps the flag.
    pub fn new(schema: impl Into<String>, name: impl Into<String>, mut fields: Vec<Field>) -> Self {
        let mut primary = None;
        for (i, f) in fields.iter_mut().enumerate() {
            if f.is_primary {
                if primary.is_some() {
                    f.is_primary = false;
                } else {
                    primary = Some(i);
                }
            }
        }
        let by_name = fields.iter().enumerate().map(|(i, f)| (f.name.clone(), i)).collect();
        Table {
            schema: schema.into(),
            name: name.into(),
            fields,
            by_name,
            primary,
        }
    }

    /// Fields in discovery order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    pub fn primary_field(&self) -> Option<&Field> {
        self.primary.map(|i| &self.fields[i])
    }

    pub fn non_primary_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_primary)
    }
}

/// Read-only after load; shared as `Arc<Catalog>`.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, Table>,
    table_names: Vec<String>,
}

impl Catalog {
    /// Later tables with an already-seen name are ignored.
    pub fn new(tables: Vec<Table>) -> Self {
        let mut catalog = Catalog::default();
        for t in tables {
            if catalog.tables.contains_key(&t.name) {
                continue;
            }
            catalog.table_names.push(t.name.clone());
            catalog.tables.insert(t.name.clone(), t);
        }
        catalog
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Table names in discovery order.
    pub fn tables(&self) -> &[String] {
        &self.table_names
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn field(&self, table: &str, name: &str) -> Option<&Field> {
        self.table(table).and_then(|t| t.field(name))
    }

    pub fn primary_field(&self, table: &str) -> Option<&Field> {
        self.table(table).and_then(|t| t.primary_field())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Table {
        Table::new(
            "public",
            "users",
            vec![
                Field::new("id", FieldType::Integer, false, true),
                Field::new("name", FieldType::Text, false, false),
                Field::new("age", FieldType::Integer, true, false),
            ],
        )
    }

    #[test]
    fn infers_integer_types() {
        for t in ["int", "int4", "INT8", "integer", "int(11)", "int unsigned", "bigint", "smallint"] {
            assert_eq!(FieldType::infer(t), FieldType::Integer, "{}", t);
        }
    }

    #[test]
    fn interval_is_not_an_integer() {
        assert_eq!(FieldType::infer("interval"), FieldType::Text);
    }

    #[test]
    fn infers_floating_types() {
        for t in ["float4", "float8", "real", "double precision", "numeric", "decimal(10,2)"] {
            assert_eq!(FieldType::infer(t), FieldType::FloatingPoint, "{}", t);
        }
    }

    #[test]
    fn everything_else_is_text() {
        for t in ["text", "varchar", "bool", "timestamptz", "uuid", "jsonb"] {
            assert_eq!(FieldType::infer(t), FieldType::Text, "{}", t);
        }
    }

    #[test]
    fn first_primary_by_column_order_wins() {
        let t = Table::new(
            "public",
            "pairs",
            vec![
                Field::new("a", FieldType::Integer, false, true),
                Field::new("b", FieldType::Integer, false, true),
            ],
        );
        assert_eq!(t.primary_field().map(|f| f.name.as_str()), Some("a"));
        assert_eq!(t.fields().iter().filter(|f| f.is_primary).count(), 1);
    }

    #[test]
    fn lookups_fail_softly() {
        let catalog = Catalog::new(vec![users()]);
        assert!(catalog.has_table("users"));
        assert!(!catalog.has_table("orders"));
        assert!(catalog.field("users", "email").is_none());
        assert!(catalog.field("orders", "id").is_none());
        assert!(catalog.primary_field("orders").is_none());
        assert_eq!(catalog.primary_field("users").map(|f| f.name.as_str()), Some("id"));
    }

    #[test]
    fn table_names_keep_discovery_order_once() {
        let catalog = Catalog::new(vec![
            Table::new("public", "b", vec![]),
            Table::new("public", "a", vec![]),
            Table::new("public", "b", vec![]),
        ]);
        assert_eq!(catalog.tables(), ["b".to_string(), "a".to_string()]);
        for name in catalog.tables() {
            assert!(catalog.has_table(name));
        }
    }

    #[test]
    fn non_primary_fields_keep_order() {
        let t = users();
        let names: Vec<_> = t.non_primary_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "age"]);
    }
}
