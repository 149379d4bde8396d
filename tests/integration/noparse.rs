//! Integration tests for no-parse protection of plugin output.

use anyhow::Result;
use serde_json::json;
use std::sync::{Arc, Mutex};

use viewcraft::templating::{
    ParserFactory, PluginCallback, TagParser, TemplateError, TeraTagParser,
};
use viewcraft::test_utils::ThemeFixture;
use viewcraft::view::Scope;
use viewcraft::{Data, data_from_json};

#[test]
fn test_placeholder_lookalikes_in_data_render_as_data() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "{{ body }}|{{ v }}")?;
    fixture.view("page", "{{ noparse }}X{{ /noparse }} {{ v }}")?;

    let html = fixture
        .engine()
        .render("page", data_from_json(json!({ "v": "__VIEWCRAFT_NOPARSE_0__" })))?;
    assert_eq!(html, "X __VIEWCRAFT_NOPARSE_0__|__VIEWCRAFT_NOPARSE_0__");
    Ok(())
}

#[test]
fn test_plugin_output_survives_verbatim() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "<body>{{ body }}</body>")?;
    fixture.view(
        "docs.syntax",
        "Use {{ code:inline }}{{ noparse }}{{ title }} and {% if x %}{{ /noparse }}{{ /code:inline }} in {{ page }}.",
    )?;

    let html = fixture
        .engine()
        .render("docs.syntax", data_from_json(json!({ "page": "templates" })))?;
    assert_eq!(html, "<body>Use {{ title }} and {% if x %} in templates.</body>");
    Ok(())
}

#[test]
fn test_body_containing_tag_text_is_not_reparsed_by_layout() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "[{{ body }}]")?;
    fixture.view("raw", "{{ noparse }}{{ body }}{{ /noparse }}")?;

    assert_eq!(fixture.engine().render("raw", Data::new())?, "[{{ body }}]");
    Ok(())
}

/// Wraps the default parser and records the order of driver calls.
struct RecordingParser {
    inner: TeraTagParser,
    log: Arc<Mutex<Vec<String>>>,
}

impl TagParser for RecordingParser {
    fn cumulative_noparse(&mut self, enabled: bool) {
        self.log.lock().unwrap().push(format!("cumulative:{enabled}"));
        self.inner.cumulative_noparse(enabled);
    }

    fn parse(
        &mut self,
        content: &str,
        data: &Scope,
        callback: Option<&dyn PluginCallback>,
    ) -> Result<String, TemplateError> {
        self.log.lock().unwrap().push(format!("parse:{content}"));
        self.inner.parse(content, data, callback)
    }

    fn inject_noparse(&mut self, content: &str) -> String {
        self.log.lock().unwrap().push("inject".to_string());
        self.inner.inject_noparse(content)
    }
}

fn recording_factory(log: &Arc<Mutex<Vec<String>>>) -> ParserFactory {
    let log = Arc::clone(log);
    Arc::new(move || -> Box<dyn TagParser> {
        Box::new(RecordingParser {
            inner: TeraTagParser::new(),
            log: Arc::clone(&log),
        })
    })
}

#[test]
fn test_protect_parse_inject_order() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "L{{ body }}")?;
    fixture.view("page", "B")?;

    let log = Arc::new(Mutex::new(Vec::new()));
    let engine = fixture.engine().with_parser(recording_factory(&log));
    assert_eq!(engine.render("page", Data::new())?, "LB");

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        ["cumulative:true", "parse:B", "inject", "cumulative:true", "parse:L{{ body }}", "inject"]
    );
    Ok(())
}
