//! GraphQL query construction and serialization.
//!
//! This module provides [`GraphQlQuery`], the transport-ready representation
//! of a single GraphQL operation: query text, operation name, and variables.

use serde_json::{json, Map, Value};

use crate::error::FrankEnergieError;

/// Mask substituted for the `password` variable in diagnostic output.
const PASSWORD_MASK: &str = "****";

/// A single GraphQL operation ready for transport.
///
/// Immutable after construction. `variables` is always a JSON object, never
/// null; construction rejects anything else.
///
/// # Example
///
/// ```rust
/// use frank_energie::GraphQlQuery;
/// use serde_json::json;
///
/// let query = GraphQlQuery::new(
///     "query Me { me { id } }",
///     "Me",
///     Some(json!({"siteReference": "1234AB 10"})),
/// )
/// .unwrap();
///
/// let payload = query.to_payload();
/// assert_eq!(payload["operationName"], "Me");
/// ```
#[derive(Clone, Debug)]
pub struct GraphQlQuery {
    query: String,
    operation_name: String,
    variables: Map<String, Value>,
}

impl GraphQlQuery {
    /// Builds a query from its operation text, operation name, and optional
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`FrankEnergieError::InvalidInput`] if `variables` is provided
    /// and is not a JSON object.
    pub fn new(
        query: impl Into<String>,
        operation_name: impl Into<String>,
        variables: Option<Value>,
    ) -> Result<Self, FrankEnergieError> {
        let variables = match variables {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(FrankEnergieError::InvalidInput(format!(
                    "The 'variables' argument must be a JSON object if provided, got {other}"
                )))
            }
        };

        Ok(Self {
            query: query.into(),
            operation_name: operation_name.into(),
            variables,
        })
    }

    /// Returns the operation name.
    #[must_use]
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Serializes the query into the wire payload
    /// `{query, operationName, variables}`.
    ///
    /// Pure function: repeated calls yield identical output.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        json!({
            "query": self.query,
            "operationName": self.operation_name,
            "variables": self.variables,
        })
    }

    /// Returns a logging-safe copy of the payload with the `password`
    /// variable, if present, replaced by a fixed mask.
    ///
    /// Used only for diagnostic output; the transmitted payload is never
    /// redacted.
    #[must_use]
    pub fn sanitized(&self) -> Value {
        let mut payload = self.to_payload();
        if let Some(variables) = payload
            .get_mut("variables")
            .and_then(Value::as_object_mut)
        {
            if variables.contains_key("password") {
                variables.insert("password".to_string(), Value::String(PASSWORD_MASK.into()));
            }
        }
        payload
    }
}
