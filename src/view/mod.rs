//! Views: the unit of composition.
//!
//! A [`View`] binds a view name to a file, some data, a set of partials and a
//! layout. Its file is resolved when the view is constructed and never again;
//! partials are constructed (and so resolved) when they are registered; the
//! layout is resolved when the view renders.
//!
//! # Render Pipeline
//!
//! [`View::render`] runs the same steps every time it is called:
//!
//! 1. [`View::data`] merges shared data under the view's own data and
//!    renders every renderable value, depth-first.
//! 2. Each partial renders its file against the merged data overlaid with
//!    the partial's own data; the result is stored as `partials.<key>`.
//! 3. The view's file renders against the merged data, giving `body`.
//! 4. The layout file `layouts.<layout>` renders against the merged data
//!    plus `body` and `partials`; that output is the result.
//!
//! Any failure aborts the render; there is no partial output.

mod data;
mod partials;

pub use data::{Data, DataValue, RenderFn, Renderable, Scope, data_from_json, resolve_data};
pub use partials::{PartialSet, PartialSpec};

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::core::Result;
use crate::engine::Engine;
use crate::resolver::ViewResolver;
use crate::templating::TagRenderer;

/// Data key holding the session error bag.
pub const ERRORS_KEY: &str = "errors";
/// Data key holding rendered partials.
pub const PARTIALS_KEY: &str = "partials";
/// Data key holding the rendered view body inside the layout.
pub const BODY_KEY: &str = "body";

/// A view bound to its resolved file and data.
#[derive(Debug, Clone)]
pub struct View {
    engine: Engine,
    name: String,
    theme: String,
    layout: String,
    path: PathBuf,
    data: Data,
    partials: PartialSet,
}

impl View {
    pub(crate) fn new(engine: Engine, name: &str, theme: String, mut data: Data) -> Result<Self> {
        let path = engine.resolver_for(&theme).path(name)?;
        tracing::debug!("Constructed view '{}' -> {}", name, path.display());

        if !data.contains_key(ERRORS_KEY) {
            data.insert(ERRORS_KEY.to_string(), engine.error_bag().to_json()?.into());
        }

        let layout = engine.config().layout.clone();
        Ok(Self {
            engine,
            name: name.to_string(),
            theme,
            layout,
            path,
            data,
            partials: PartialSet::new(),
        })
    }

    /// Binds `value` under `key`, replacing any earlier value.
    pub fn with(&mut self, key: impl Into<String>, value: impl Into<DataValue>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Binds every entry of `data`, replacing earlier values on collision.
    pub fn with_all(&mut self, data: Data) -> &mut Self {
        self.data.extend(data);
        self
    }

    /// Registers a partial under `key`, constructing its view right away.
    ///
    /// Re-registering a key replaces the earlier partial.
    ///
    /// # Errors
    /// Resolution errors for `view` surface here, not at render time.
    pub fn partial(&mut self, key: impl Into<String>, view: &str, data: Data) -> Result<&mut Self> {
        let key = key.into();
        let partial = self.child(view, data)?;
        tracing::debug!("Registered partial '{}' ({}) on view '{}'", key, view, self.name);
        self.partials.insert(key, partial);
        Ok(self)
    }

    /// Registers several partials at once.
    ///
    /// Every entry is constructed before any is registered, so a resolution
    /// failure leaves the view's partials untouched.
    pub fn register_partials<I, K>(&mut self, partials: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, PartialSpec)>,
        K: Into<String>,
    {
        let built = partials
            .into_iter()
            .map(|(key, spec)| Ok((key.into(), self.child(&spec.view, spec.data)?)))
            .collect::<Result<Vec<_>>>()?;

        for (key, view) in built {
            self.partials.insert(key, view);
        }
        Ok(self)
    }

    /// Picks a different layout; it is resolved when the view renders.
    pub fn set_layout(&mut self, layout: impl Into<String>) -> &mut Self {
        self.layout = layout.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file this view was resolved to at construction.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Data bound to this view, without shared data.
    pub fn own_data(&self) -> &Data {
        &self.data
    }

    pub fn partials(&self) -> &PartialSet {
        &self.partials
    }

    /// Shared data merged under own data, with renderables rendered.
    pub fn data(&self) -> Result<Scope> {
        let mut merged = self.engine.shared().snapshot();
        merged.extend(self.data.iter().map(|(key, value)| (key.clone(), value.clone())));
        resolve_data(&merged)
    }

    /// Runs the full render pipeline.
    pub fn render(&self) -> Result<String> {
        tracing::debug!("Rendering view '{}' (theme={}, layout={})", self.name, self.theme, self.layout);

        let mut data = self.data()?;
        let content = self.engine.content();
        let mut renderer = TagRenderer::new(self.engine.parser(), content);

        let partials = self.render_partials(&mut renderer, &data)?;
        data.insert(PARTIALS_KEY.to_string(), Value::Object(partials));

        let text = content.load(&self.path)?;
        let body = renderer.render_named(&self.name, &text, &data)?;
        data.insert(BODY_KEY.to_string(), Value::String(body));

        let layout = self.resolver().path(&format!("layouts.{}", self.layout))?;
        renderer.render_file(&layout, &data)
    }

    fn render_partials(&self, renderer: &mut TagRenderer<'_>, data: &Scope) -> Result<Map<String, Value>> {
        let mut rendered = match data.get(PARTIALS_KEY) {
            Some(Value::Object(existing)) => existing.clone(),
            Some(_) => {
                tracing::warn!("View '{}' binds a non-object '{}' value; replacing it", self.name, PARTIALS_KEY);
                Map::new()
            }
            None => Map::new(),
        };

        for (key, partial) in self.partials.iter() {
            let mut scope = data.clone();
            scope.insert(PARTIALS_KEY.to_string(), Value::Object(rendered.clone()));
            scope.extend(resolve_data(partial.own_data())?);

            tracing::debug!("Rendering partial '{}' ({})", key, partial.name());
            let output = renderer.render_file(partial.path(), &scope)?;
            rendered.insert(key.to_string(), Value::String(output));
        }

        Ok(rendered)
    }

    fn child(&self, view: &str, data: Data) -> Result<View> {
        View::new(self.engine.clone(), view, self.theme.clone(), data)
    }

    fn resolver(&self) -> ViewResolver<'_> {
        self.engine.resolver_for(&self.theme)
    }
}

impl Renderable for View {
    fn render(&self) -> Result<String> {
        View::render(self)
    }
}

impl From<View> for DataValue {
    fn from(view: View) -> Self {
        DataValue::renderable(view)
    }
}
