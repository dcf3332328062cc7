//! Input-schema derivation from a handler's declared parameter list.
//!
//! A handler describes its parameters as a [`HandlerSignature`]: names, a
//! [`ParamType`] for each (usually produced from a Rust type through
//! [`SchemaType`]), and whether a default exists. [`derive_schema`] turns that
//! into the JSON-Schema subset exposed to agents.
//!
//! ```rust
//! use std::collections::BTreeSet;
//!
//! use ftooling::{HandlerSignature, Parameter, derive_schema};
//! use serde_json::json;
//!
//! let signature = HandlerSignature::new("search_recipes")
//!     .with_parameter(Parameter::of::<String>("user_id"))
//!     .with_parameter(Parameter::of::<String>("query"))
//!     .with_parameter(Parameter::of::<Vec<String>>("tags").with_default());
//!
//! let schema = derive_schema(&signature, &BTreeSet::new());
//! assert_eq!(
//!     schema,
//!     json!({
//!         "type": "object",
//!         "properties": {
//!             "query": {"type": "string"},
//!             "tags": {"type": "array", "items": {"type": "string"}}
//!         },
//!         "required": ["query"]
//!     })
//! );
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use serde_json::{Map, Value, json};

/// Injected by the dispatcher on every call; never part of a public schema.
pub const USER_ID_PARAM: &str = "user_id";

/// Type description of one handler parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    /// A sequence, with its element type when one is declared.
    Array(Option<Box<ParamType>>),
    /// A mapping; keys and values are not constrained.
    Object,
    /// A union with the null type. Holds the non-null members in declaration
    /// order.
    Optional(Vec<ParamType>),
    /// Anything without a JSON-Schema mapping, named for diagnostics.
    Unknown(String),
}

impl ParamType {
    pub fn array_of(inner: ParamType) -> Self {
        Self::Array(Some(Box::new(inner)))
    }

    pub fn optional(inner: ParamType) -> Self {
        Self::Optional(vec![inner])
    }

    pub fn unknown(annotation: impl Into<String>) -> Self {
        Self::Unknown(annotation.into())
    }

    pub fn annotation(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Number => "number".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Array(None) => "array".to_string(),
            Self::Array(Some(inner)) => format!("array<{}>", inner.annotation()),
            Self::Object => "object".to_string(),
            Self::Optional(members) => {
                let members: Vec<String> = members.iter().map(ParamType::annotation).collect();
                format!("optional<{}>", members.join(" | "))
            }
            Self::Unknown(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// `None` when the parameter carries no type annotation at all.
    pub ty: Option<ParamType>,
    pub has_default: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            has_default: false,
        }
    }

    pub fn of<T: SchemaType + ?Sized>(name: impl Into<String>) -> Self {
        Self::new(name, T::param_type())
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            has_default: false,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// The declared parameter list of one handler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HandlerSignature {
    pub handler: String,
    pub parameters: Vec<Parameter>,
}

impl HandlerSignature {
    pub fn new(handler: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }
}

/// Maps a Rust type onto the parameter type description used for schemas.
pub trait SchemaType {
    fn param_type() -> ParamType;
}

macro_rules! impl_schema_type {
    ($variant:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl SchemaType for $ty {
                fn param_type() -> ParamType {
                    ParamType::$variant
                }
            }
        )+
    };
}

impl_schema_type!(String => String, str, char);
impl_schema_type!(Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_schema_type!(Number => f32, f64);
impl_schema_type!(Boolean => bool);

impl<T: SchemaType + ?Sized> SchemaType for &T {
    fn param_type() -> ParamType {
        T::param_type()
    }
}

impl<T: SchemaType + ?Sized> SchemaType for Box<T> {
    fn param_type() -> ParamType {
        T::param_type()
    }
}

impl<T: SchemaType + ?Sized> SchemaType for Arc<T> {
    fn param_type() -> ParamType {
        T::param_type()
    }
}

impl<T: SchemaType> SchemaType for Option<T> {
    fn param_type() -> ParamType {
        ParamType::optional(T::param_type())
    }
}

impl<T: SchemaType> SchemaType for [T] {
    fn param_type() -> ParamType {
        ParamType::array_of(T::param_type())
    }
}

impl<T: SchemaType> SchemaType for Vec<T> {
    fn param_type() -> ParamType {
        ParamType::array_of(T::param_type())
    }
}

impl<T: SchemaType> SchemaType for VecDeque<T> {
    fn param_type() -> ParamType {
        ParamType::array_of(T::param_type())
    }
}

impl<T: SchemaType, S> SchemaType for HashSet<T, S> {
    fn param_type() -> ParamType {
        ParamType::array_of(T::param_type())
    }
}

impl<T: SchemaType> SchemaType for BTreeSet<T> {
    fn param_type() -> ParamType {
        ParamType::array_of(T::param_type())
    }
}

impl<K, V, S> SchemaType for HashMap<K, V, S> {
    fn param_type() -> ParamType {
        ParamType::Object
    }
}

impl<K, V> SchemaType for BTreeMap<K, V> {
    fn param_type() -> ParamType {
        ParamType::Object
    }
}

impl SchemaType for Map<String, Value> {
    fn param_type() -> ParamType {
        ParamType::Object
    }
}

impl SchemaType for Value {
    fn param_type() -> ParamType {
        ParamType::unknown("serde_json::Value")
    }
}

/// Builds `{"type": "object", "properties": .., "required": ..}` for every
/// parameter except `user_id` and the names in `excluded`.
///
/// Parameters whose type cannot be mapped are exposed as strings and a
/// warning naming the parameter and handler is logged.
pub fn derive_schema(signature: &HandlerSignature, excluded: &BTreeSet<String>) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for parameter in &signature.parameters {
        if parameter.name == USER_ID_PARAM || excluded.contains(&parameter.name) {
            continue;
        }

        let schema = match &parameter.ty {
            Some(ty) => resolve(ty, parameter, &signature.handler),
            None => fallback(parameter, &signature.handler, "<none>"),
        };
        properties.insert(parameter.name.clone(), schema);

        if !parameter.has_default {
            required.push(Value::String(parameter.name.clone()));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn resolve(ty: &ParamType, parameter: &Parameter, handler: &str) -> Value {
    match ty {
        ParamType::String => json!({"type": "string"}),
        ParamType::Integer => json!({"type": "integer"}),
        ParamType::Number => json!({"type": "number"}),
        ParamType::Boolean => json!({"type": "boolean"}),
        ParamType::Array(None) => json!({"type": "array"}),
        ParamType::Array(Some(inner)) => json!({
            "type": "array",
            "items": resolve(inner, parameter, handler),
        }),
        ParamType::Object => json!({"type": "object"}),
        ParamType::Optional(members) => {
            match members.iter().find(|member| !matches!(member, ParamType::Unknown(_))) {
                Some(member) => resolve(member, parameter, handler),
                None => fallback(parameter, handler, &ty.annotation()),
            }
        }
        ParamType::Unknown(annotation) => fallback(parameter, handler, annotation),
    }
}

fn fallback(parameter: &Parameter, handler: &str, annotation: &str) -> Value {
    tracing::warn!(
        parameter = %parameter.name,
        handler,
        annotation,
        "unrecognized parameter type, exposing it as a string"
    );
    json!({"type": "string"})
}
