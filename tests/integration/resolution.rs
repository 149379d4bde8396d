//! Integration tests for view resolution, themes and aliases.

use anyhow::Result;
use std::path::Path;

use viewcraft::test_utils::ThemeFixture;
use viewcraft::{Data, Engine, ViewError};

#[test]
fn test_missing_view_fails_at_construction() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    let engine = fixture.engine();

    match engine.make("home.missing", Data::new()) {
        Err(ViewError::ViewNotFound {
            view,
            path,
        }) => {
            assert_eq!(view, "home.missing");
            assert!(path.ends_with(Path::new("main/views/home/missing.html")));
        }
        other => panic!("expected ViewNotFound, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_absolute_names_do_not_leave_the_theme() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    let outside = tempfile::Builder::new().prefix("outside").tempdir()?;
    std::fs::write(outside.path().join("secret.html"), "secret")?;

    let name = outside.path().join("secret").display().to_string();
    let views = fixture.root().join("main/views");

    let candidate = fixture.engine().resolver().candidate(&name)?;
    assert!(candidate.starts_with(&views), "{} escaped {}", candidate.display(), views.display());

    match fixture.engine().make(&name, Data::new()) {
        Err(ViewError::ViewNotFound {
            path,
            ..
        }) => assert!(path.starts_with(&views)),
        other => panic!("expected ViewNotFound, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_leading_separator_resolves_inside_views() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    let expected = fixture.view("etc.secret", "inside")?;

    let view = fixture.engine().make("/etc/secret", Data::new())?;
    assert_eq!(view.path(), expected);
    Ok(())
}

#[test]
fn test_dotted_names_map_to_directories() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    let expected = fixture.view("admin.users.list", "")?;

    let view = fixture.engine().make("admin.users.list", Data::new())?;
    assert_eq!(view.path(), expected);
    Ok(())
}

#[test]
fn test_no_extension_fallback() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    let file = fixture.root().join("main/views/page.htm");
    std::fs::create_dir_all(file.parent().unwrap())?;
    std::fs::write(&file, "x")?;

    assert!(!fixture.engine().exists("page")?);
    Ok(())
}

#[test]
fn test_theme_override_per_handle() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "main: {{ body }}")?;
    fixture.themed_view("admin", "layouts.layout", "admin: {{ body }}")?;
    fixture.themed_view("admin", "dashboard", "stats")?;
    let engine = fixture.engine();

    assert!(!engine.exists("dashboard")?);
    let admin = engine.with_theme("admin");
    let view = admin.make("dashboard", Data::new())?;
    assert_eq!(view.theme(), "admin");
    assert_eq!(view.render()?, "admin: stats");
    Ok(())
}

#[test]
fn test_path_is_fixed_at_construction() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "{{ body }}")?;
    fixture.view("page", "main page")?;
    fixture.themed_view("other", "page", "other page")?;
    fixture.themed_view("other", "layouts.layout", "{{ body }}")?;

    let mut engine = fixture.engine();
    let view = engine.make("page", Data::new())?;
    engine.set_theme("other");

    assert_eq!(view.render()?, "main page");
    assert_eq!(engine.render("page", Data::new())?, "other page");
    Ok(())
}

#[test]
fn test_missing_layout_fails_at_render() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.view("page", "x")?;

    let view = fixture.engine().make("page", Data::new())?;
    match view.render() {
        Err(ViewError::ViewNotFound {
            view,
            ..
        }) => assert_eq!(view, "layouts.layout"),
        other => panic!("expected ViewNotFound, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_alias_resolution() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.layout("layout", "{{ body }}")?;
    fixture.view("partials.nav.sidebar", "sidebar")?;
    let mut engine = fixture.engine();

    assert!(matches!(
        engine.make("name: sidebar", Data::new()),
        Err(ViewError::UnknownAlias { ref alias }) if alias.as_str() == "sidebar"
    ));

    engine.register_alias("sidebar", "partials.nav.sidebar");
    assert_eq!(engine.render("name: sidebar", Data::new())?, "sidebar");
    Ok(())
}

#[test]
fn test_engine_from_config_file() -> Result<()> {
    let fixture = ThemeFixture::new()?;
    fixture.themed_view("site", "layouts.base", "<{{ body }}>")?;
    fixture.themed_view("site", "partials.footer", "footer")?;

    let config_path = fixture.root().join("views.toml");
    std::fs::write(
        &config_path,
        format!(
            "location = '{}'\ntheme = 'site'\nlayout = 'base'\n\n[names]\nfooter = 'partials.footer'\n",
            fixture.root().display()
        ),
    )?;

    let engine = Engine::from_config_file(&config_path)?;
    assert_eq!(engine.config().theme, "site");
    assert_eq!(engine.render("name: footer", Data::new())?, "<footer>");
    Ok(())
}
