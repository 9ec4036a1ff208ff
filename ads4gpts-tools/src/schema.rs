//! JSON Schema construction for tool inputs.

use indexmap::IndexMap;
use serde_json::{json, Value as JsonValue};

/// Fluent builder for an object schema.
///
/// # Example
///
/// ```rust
/// use ads4gpts_tools::SchemaBuilder;
///
/// let schema = SchemaBuilder::new()
///     .string("context", "What the user is talking about", true)
///     .integer_min("num_ads", "How many ads", 1, Some(1.into()))
///     .closed()
///     .build();
/// assert_eq!(schema["required"][0], "context");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    properties: IndexMap<String, JsonValue>,
    required: Vec<String>,
    description: Option<String>,
    closed: bool,
}

impl SchemaBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn property(mut self, name: &str, prop: JsonValue, required: bool) -> Self {
        self.properties.insert(name.to_string(), prop);
        if required && !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a string property.
    #[must_use]
    pub fn string(self, name: &str, desc: &str, required: bool) -> Self {
        self.property(
            name,
            json!({"type": "string", "description": desc}),
            required,
        )
    }

    /// Add an optional string property with a default.
    #[must_use]
    pub fn string_default(self, name: &str, desc: &str, default: &str) -> Self {
        self.property(
            name,
            json!({"type": "string", "description": desc, "default": default}),
            false,
        )
    }

    /// Add an integer property with a lower bound. `default` makes it optional.
    #[must_use]
    pub fn integer_min(
        self,
        name: &str,
        desc: &str,
        minimum: i64,
        default: Option<JsonValue>,
    ) -> Self {
        let mut prop = json!({"type": "integer", "description": desc, "minimum": minimum});
        let required = default.is_none();
        if let Some(d) = default {
            prop["default"] = d;
        }
        self.property(name, prop, required)
    }

    /// Add a number property with a lower bound. `default` makes it optional.
    #[must_use]
    pub fn number_min(
        self,
        name: &str,
        desc: &str,
        minimum: f64,
        default: Option<JsonValue>,
    ) -> Self {
        let mut prop = json!({"type": "number", "description": desc, "minimum": minimum});
        let required = default.is_none();
        if let Some(d) = default {
            prop["default"] = d;
        }
        self.property(name, prop, required)
    }

    /// Add a string property restricted to `values`.
    #[must_use]
    pub fn enum_values(
        self,
        name: &str,
        desc: &str,
        values: &[&str],
        default: Option<&str>,
    ) -> Self {
        let mut prop = json!({"type": "string", "description": desc, "enum": values});
        let required = default.is_none();
        if let Some(d) = default {
            prop["default"] = JsonValue::from(d);
        }
        self.property(name, prop, required)
    }

    /// Add a nested object property.
    #[must_use]
    pub fn object(self, name: &str, desc: &str, inner: SchemaBuilder, required: bool) -> Self {
        let mut prop = inner.build();
        prop["description"] = JsonValue::from(desc);
        self.property(name, prop, required)
    }

    /// Set the schema description.
    #[must_use]
    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Reject properties not listed.
    #[must_use]
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Build the schema.
    #[must_use]
    pub fn build(self) -> JsonValue {
        let mut schema = json!({
            "type": "object",
            "properties": self.properties,
        });
        if !self.required.is_empty() {
            schema["required"] = JsonValue::from(self.required);
        }
        if let Some(desc) = self.description {
            schema["description"] = JsonValue::from(desc);
        }
        if self.closed {
            schema["additionalProperties"] = JsonValue::Bool(false);
        }
        schema
    }
}
