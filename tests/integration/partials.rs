//! Integration tests for partial registration and rendering.

use anyhow::Result;
use serde_json::json;

use viewcraft::test_utils::ThemeFixture;
use viewcraft::{Data, PartialSpec, ViewError, data_from_json};

fn fixture() -> Result<ThemeFixture> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "{{ body }}|{{ partials.footer }}")?;
    fixture.view("partials.footer", "(c) {{ year }}")?;
    fixture.view("home.index", "year {{ year }}")?;
    Ok(fixture)
}

#[test]
fn test_partial_data_takes_precedence() -> Result<()> {
    let fixture = fixture()?;
    let engine = fixture.engine();

    let mut view = engine.make("home.index", data_from_json(json!({ "year": 1999 })))?;
    view.partial("footer", "partials.footer", data_from_json(json!({ "year": 2024 })))?;

    assert_eq!(view.render()?, "year 1999|(c) 2024");
    Ok(())
}

#[test]
fn test_partial_inherits_outer_data() -> Result<()> {
    let fixture = fixture()?;
    let engine = fixture.engine();
    engine.share("year", 1970);

    let mut view = engine.make("home.index", data_from_json(json!({ "year": 1999 })))?;
    view.partial("footer", "partials.footer", Data::new())?;

    assert_eq!(view.render()?, "year 1999|(c) 1999");
    Ok(())
}

#[test]
fn test_partials_render_in_registration_order() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "{{ partials.second }}")?;
    fixture.view("page", "")?;
    fixture.view("parts.first", "first")?;
    fixture.view("parts.second", "{{ partials.first }}+second")?;
    let engine = fixture.engine();

    let mut view = engine.make("page", Data::new())?;
    view.partial("first", "parts.first", Data::new())?
        .partial("second", "parts.second", Data::new())?;

    assert_eq!(view.partials().keys().collect::<Vec<_>>(), ["first", "second"]);
    assert_eq!(view.render()?, "first+second");
    Ok(())
}

#[test]
fn test_reregistering_key_replaces_partial() -> Result<()> {
    let fixture = fixture()?;
    fixture.view("partials.other", "other {{ year }}")?;
    let engine = fixture.engine();

    let mut view = engine.make("home.index", data_from_json(json!({ "year": 1 })))?;
    view.partial("footer", "partials.footer", data_from_json(json!({ "year": 2 })))?;
    view.partial("footer", "partials.other", Data::new())?;

    assert_eq!(view.partials().len(), 1);
    assert_eq!(view.partials().get("footer").map(|p| p.name()), Some("partials.other"));
    assert_eq!(view.render()?, "year 1|other 1");
    Ok(())
}

#[test]
fn test_missing_partial_fails_at_registration() -> Result<()> {
    let fixture = fixture()?;
    let engine = fixture.engine();

    let mut view = engine.make("home.index", Data::new())?;
    let result = view.partial("footer", "partials.missing", Data::new());

    assert!(matches!(result, Err(ViewError::ViewNotFound { view: ref name, .. }) if name.as_str() == "partials.missing"));
    assert!(view.partials().is_empty());
    Ok(())
}

#[test]
fn test_register_partials_in_bulk() -> Result<()> {
    let fixture = fixture()?;
    fixture.view("partials.nav", "nav")?;
    let engine = fixture.engine();

    let mut view = engine.make("home.index", data_from_json(json!({ "year": 1999 })))?;
    view.register_partials([
        ("nav", PartialSpec::new("partials.nav", Data::new())),
        ("footer", PartialSpec::new("partials.footer", data_from_json(json!({ "year": 2024 })))),
    ])?;

    assert_eq!(view.partials().keys().collect::<Vec<_>>(), ["nav", "footer"]);
    assert_eq!(view.render()?, "year 1999|(c) 2024");
    Ok(())
}

#[test]
fn test_register_partials_is_all_or_nothing() -> Result<()> {
    let fixture = fixture()?;
    let engine = fixture.engine();

    let mut view = engine.make("home.index", Data::new())?;
    let result = view.register_partials([
        ("footer", PartialSpec::new("partials.footer", Data::new())),
        ("nav", PartialSpec::new("partials.nav", Data::new())),
    ]);

    assert!(result.is_err());
    assert!(view.partials().is_empty());
    Ok(())
}

#[test]
fn test_partials_object_always_present() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "[{% for key, value in partials %}{{ key }}{% endfor %}]{{ body }}")?;
    fixture.view("page", "x")?;

    assert_eq!(fixture.engine().render("page", Data::new())?, "[]x");
    Ok(())
}

#[test]
fn test_rendered_partials_merge_into_bound_partials() -> Result<()> {
    let fixture = fixture()?;
    fixture.layout("static", "{{ partials.banner }}/{{ partials.footer }}")?;
    let engine = fixture.engine();

    let own = data_from_json(json!({ "year": 5, "partials": { "banner": "B" } }));
    let mut view = engine.make("home.index", own)?;
    view.partial("footer", "partials.footer", Data::new())?.set_layout("static");

    assert_eq!(view.render()?, "B/(c) 5");
    Ok(())
}

#[test]
fn test_partial_through_alias() -> Result<()> {
    let fixture = fixture()?;
    let mut engine = fixture.engine();
    engine.register_alias("foot", "partials.footer");

    let mut view = engine.make("home.index", data_from_json(json!({ "year": 3 })))?;
    view.partial("footer", "name: foot", Data::new())?;

    assert_eq!(view.render()?, "year 3|(c) 3");
    Ok(())
}
