//! Integration tests for the failure taxonomy.

use anyhow::Result;

use viewcraft::templating::TemplateError;
use viewcraft::test_utils::ThemeFixture;
use viewcraft::{Data, DataValue, RenderFn, Renderable, ViewError, user_friendly_error};

#[test]
fn test_parse_failure_names_the_view() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "{{ body }}")?;
    fixture.view("home.index", "Hello {{ nmae }}")?;

    let mut data = Data::new();
    data.insert("name".to_string(), "Ann".into());
    let error = fixture.engine().render("home.index", data).unwrap_err();

    match &error {
        ViewError::ParseFailure {
            template,
            source: TemplateError::VariableNotFound {
                variable,
                suggestions,
                ..
            },
        } => {
            assert_eq!(template, "home.index");
            assert_eq!(variable, "nmae");
            assert!(suggestions.contains(&"name".to_string()));
        }
        other => panic!("expected ParseFailure, got {other:?}"),
    }

    let report = user_friendly_error(error);
    assert!(report.details.as_deref().is_some_and(|d| d.contains("Did you mean")));
    Ok(())
}

#[test]
fn test_partial_failure_aborts_render() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "{{ body }}")?;
    fixture.view("page", "fine")?;
    fixture.view("broken", "{% if %}")?;

    let mut view = fixture.engine().make("page", Data::new())?;
    view.partial("broken", "broken", Data::new())?;

    assert!(matches!(view.render(), Err(ViewError::ParseFailure { .. })));
    Ok(())
}

#[test]
fn test_unreadable_view_is_io_failure() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "{{ body }}")?;
    let path = fixture.view("page", "x")?;

    let view = fixture.engine().make("page", Data::new())?;
    std::fs::remove_file(&path)?;

    assert!(matches!(view.render(), Err(ViewError::IoFailure { .. })));
    Ok(())
}

#[test]
fn test_renderable_error_propagates_unchanged() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "{{ body }}")?;
    fixture.view("page", "{{ widget }}")?;

    let mut view = fixture.engine().make("page", Data::new())?;
    view.with(
        "widget",
        DataValue::renderable(RenderFn::new(|| {
            Err(ViewError::UnknownAlias {
                alias: "gone".to_string(),
            })
        })),
    );

    assert!(matches!(view.render(), Err(ViewError::UnknownAlias { .. })));
    Ok(())
}

#[test]
fn test_runaway_plugin_nesting() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "{{ body }}")?;
    let depth = 12;
    fixture.view("page", &format!("{}x{}", "{{ a:b }}".repeat(depth), "{{ /a:b }}".repeat(depth)))?;

    let result = fixture.engine().render("page", Data::new());
    assert!(matches!(
        result,
        Err(ViewError::ParseFailure {
            source: TemplateError::DepthExceeded { .. },
            ..
        })
    ));
    Ok(())
}

#[test]
fn test_coercion_reports_missing_layout() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.view("page", "x")?;

    // No layout file
    let view = fixture.engine().make("page", Data::new())?;
    let result = Renderable::render(&view);
    assert!(matches!(
        result,
        Err(ViewError::ViewNotFound { ref view, .. }) if view == "layouts.layout"
    ));
    Ok(())
}
