//! View data: plain values, nested mappings, and renderable values.
//!
//! Data bound to a view is a [`Data`] map of [`DataValue`]s. Before any
//! template sees it, the map is flattened into a JSON [`Scope`]; every
//! [`DataValue::Renderable`] is rendered to a string at that point, depth-first,
//! so that side effects of nested rendering happen before the outer template
//! is parsed.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::core::Result;

/// The JSON object handed to the tag parser.
pub type Scope = Map<String, Value>;

/// Data bound to a view, keyed by template variable name.
pub type Data = BTreeMap<String, DataValue>;

/// Anything that can produce a string for embedding in another view.
pub trait Renderable: Send + Sync {
    /// Produces the rendered output.
    fn render(&self) -> Result<String>;
}

/// A single data value.
#[derive(Clone)]
pub enum DataValue {
    /// Any plain JSON value other than an object.
    Scalar(Value),
    /// A nested mapping; may itself contain renderables.
    Nested(Data),
    /// A value rendered to a string when the view's data is merged.
    Renderable(Arc<dyn Renderable>),
}

impl DataValue {
    /// Wraps a renderable value.
    pub fn renderable(value: impl Renderable + 'static) -> Self {
        Self::Renderable(Arc::new(value))
    }

    /// Converts to JSON, rendering every renderable found along the way.
    pub fn resolve(&self) -> Result<Value> {
        match self {
            Self::Scalar(value) => Ok(value.clone()),
            Self::Nested(data) => Ok(Value::Object(resolve_data(data)?)),
            Self::Renderable(renderable) => Ok(Value::String(renderable.render()?)),
        }
    }
}

impl fmt::Debug for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Self::Nested(data) => f.debug_tuple("Nested").field(data).finish(),
            Self::Renderable(_) => f.write_str("Renderable(..)"),
        }
    }
}

impl From<Value> for DataValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                Self::Nested(map.into_iter().map(|(k, v)| (k, DataValue::from(v))).collect())
            }
            other => Self::Scalar(other),
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Value::String(value.to_string()))
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        Self::Scalar(Value::String(value))
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Value::Bool(value))
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<u64> for DataValue {
    fn from(value: u64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<Data> for DataValue {
    fn from(value: Data) -> Self {
        Self::Nested(value)
    }
}

/// Builds [`Data`] from a JSON object; non-object values yield an empty map.
pub fn data_from_json(value: Value) -> Data {
    match DataValue::from(value) {
        DataValue::Nested(data) => data,
        _ => Data::new(),
    }
}

/// Flattens data into a [`Scope`], rendering renderables in key order.
pub fn resolve_data(data: &Data) -> Result<Scope> {
    let mut scope = Scope::new();
    for (key, value) in data {
        if matches!(value, DataValue::Renderable(_)) {
            tracing::debug!("Rendering nested value '{}'", key);
        }
        scope.insert(key.clone(), value.resolve()?);
    }
    Ok(scope)
}

/// Adapts a closure into a [`Renderable`].
///
/// ```rust
/// use viewcraft::view::{DataValue, RenderFn};
///
/// let clock = DataValue::renderable(RenderFn::new(|| Ok("12:00".to_string())));
/// ```
pub struct RenderFn<F>(F);

impl<F> RenderFn<F>
where
    F: Fn() -> Result<String> + Send + Sync,
{
    pub fn new(render: F) -> Self {
        Self(render)
    }
}

impl<F> Renderable for RenderFn<F>
where
    F: Fn() -> Result<String> + Send + Sync,
{
    fn render(&self) -> Result<String> {
        (self.0)()
    }
}
