//! Unit tests for swapping the tag parser behind the engine.

use anyhow::Result;
use std::sync::Arc;

use viewcraft::templating::{PluginCallback, TagParser, TemplateError};
use viewcraft::test_utils::ThemeFixture;
use viewcraft::view::Scope;
use viewcraft::{Data, data_from_json};

/// Replaces `@key` with the scope value of `key`; nothing else.
#[derive(Default)]
struct AtParser;

impl TagParser for AtParser {
    fn cumulative_noparse(&mut self, _enabled: bool) {}

    fn parse(
        &mut self,
        content: &str,
        data: &Scope,
        _callback: Option<&dyn PluginCallback>,
    ) -> Result<String, TemplateError> {
        let mut out = content.to_string();
        for (key, value) in data {
            if let Some(text) = value.as_str() {
                out = out.replace(&format!("@{key}"), text);
            }
        }
        Ok(out)
    }

    fn inject_noparse(&mut self, content: &str) -> String {
        content.to_string()
    }
}

#[test]
fn test_custom_parser_drives_the_pipeline() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "<@title>@body")?;
    fixture.view("page", "hi @name")?;

    let engine = fixture
        .engine()
        .with_parser(Arc::new(|| -> Box<dyn TagParser> { Box::new(AtParser) }));
    engine.share("title", "T");

    let html = engine.render("page", data_from_json(serde_json::json!({ "name": "Ann" })))?;
    assert_eq!(html, "<T>hi Ann");
    Ok(())
}

#[test]
fn test_custom_parser_errors_are_wrapped() -> Result<()> {
    struct Failing;

    impl TagParser for Failing {
        fn cumulative_noparse(&mut self, _enabled: bool) {}

        fn parse(
            &mut self,
            _content: &str,
            _data: &Scope,
            _callback: Option<&dyn PluginCallback>,
        ) -> Result<String, TemplateError> {
            Err(TemplateError::SyntaxError {
                message: "nope".to_string(),
                location: Box::default(),
            })
        }

        fn inject_noparse(&mut self, content: &str) -> String {
            content.to_string()
        }
    }

    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "")?;
    fixture.view("page", "")?;

    let engine = fixture.engine().with_parser(Arc::new(|| -> Box<dyn TagParser> { Box::new(Failing) }));
    let error = engine.render("page", Data::new()).unwrap_err();
    assert_eq!(error.to_string(), "Failed to parse template 'page': Template syntax error: nope");
    Ok(())
}
