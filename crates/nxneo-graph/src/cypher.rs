//! Cypher statement builder.
//!
//! Schema names (labels, relationship types, property keys) cannot be bound
//! as parameters, so they are validated once into [`Ident`]s and quoted into
//! the statement text. Everything else goes through `$name` parameters.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{GraphError, GraphResult};

/// One returned row, keyed by the statement's declared columns.
pub type Record = serde_json::Map<String, Value>;

/// A schema identifier that is safe to splice into Cypher text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    name: String,
}

impl Ident {
    /// Validate a schema name. Empty names and names containing NUL are
    /// rejected; backticks are escaped when quoting.
    pub fn new(name: impl Into<String>) -> GraphResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(GraphError::InvalidIdentifier("name is empty".to_string()));
        }
        if name.contains('\0') {
            return Err(GraphError::InvalidIdentifier(format!("{:?} contains NUL", name)));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backtick-quoted form with embedded backticks doubled.
    pub fn quoted(&self) -> String {
        format!("`{}`", self.name.replace('`', "``"))
    }
}

/// The validated schema names of one graph handle.
#[derive(Debug, Clone)]
pub struct Schema {
    pub label: Ident,
    pub relationship: Option<Ident>,
    pub key: Ident,
}

impl Schema {
    pub fn new(label: &str, relationship: Option<&str>, key: &str) -> GraphResult<Self> {
        Ok(Self {
            label: Ident::new(label)?,
            relationship: relationship.map(Ident::new).transpose()?,
            key: Ident::new(key)?,
        })
    }

    /// Substitute `{label}`, `{rel}` and `{key}` slots in a template.
    ///
    /// Single pass, so quoted names are never re-scanned for slots. Braces
    /// that do not open a slot (Cypher map literals) are copied through.
    pub fn render(&self, template: &str) -> GraphResult<String> {
        let mut out = String::with_capacity(template.len() + 32);
        let mut rest = template;

        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if let Some(after) = tail.strip_prefix("{label}") {
                out.push_str(&self.label.quoted());
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{key}") {
                out.push_str(&self.key.quoted());
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{rel}") {
                let rel = self.relationship.as_ref().ok_or_else(|| {
                    GraphError::InvalidIdentifier(
                        "template needs a relationship type but none is configured".to_string(),
                    )
                })?;
                out.push_str(&rel.quoted());
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Rendered statement text plus its bound parameters and returned columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    params: BTreeMap<String, Value>,
    columns: Vec<String>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: BTreeMap::new(),
            columns: Vec::new(),
        }
    }

    /// Render a template against a schema.
    pub fn from_template(schema: &Schema, template: &str) -> GraphResult<Self> {
        Ok(Self::new(schema.render(template)?))
    }

    /// Bind a parameter value.
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Declare the columns the statement returns, in order.
    pub fn returns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &BTreeMap<String, Value> {
        &self.params
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}
