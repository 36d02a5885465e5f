use super::*;

#[test]
fn test_render_substitutes_names() {
    let mut library = CustomTestLibrary::new();
    library.insert(
        "positive",
        "SELECT * FROM {{ schema }}.{{ table_name }} WHERE {{ column }} <= 0",
    );

    let sql = library
        .render("positive", "main", "orders", "amount")
        .unwrap()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM main.orders WHERE amount <= 0");
}

#[test]
fn test_render_table_alias() {
    let mut library = CustomTestLibrary::new();
    library.insert("t", "SELECT 1 FROM {{ table }}");
    let sql = library.render("t", "s", "x", "c").unwrap();
    assert_eq!(sql.as_deref(), Some("SELECT 1 FROM x"));
}

#[test]
fn test_render_unknown_is_none() {
    let library = CustomTestLibrary::new();
    assert!(library.render("nope", "s", "t", "c").unwrap().is_none());
}

#[test]
fn test_render_syntax_error() {
    let mut library = CustomTestLibrary::new();
    library.insert("broken", "SELECT {{ column ");
    let err = library.render("broken", "s", "t", "c").unwrap_err();
    assert!(matches!(err, QualityError::TemplateError { ref name, .. } if name == "broken"));
}

#[test]
fn test_load_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("positive.sql"), "SELECT 1").unwrap();
    fs::write(dir.path().join("Lowercase.SQL"), "SELECT 2").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let library = CustomTestLibrary::load(dir.path()).unwrap();
    assert_eq!(library.len(), 2);
    assert!(library.contains("positive"));
    assert!(library.contains("Lowercase"));
    assert!(!library.contains("notes"));
    assert_eq!(
        library.names().collect::<Vec<_>>(),
        vec!["Lowercase", "positive"]
    );
}

#[test]
fn test_load_missing_directory_is_empty() {
    let library = CustomTestLibrary::load(Path::new("/no/such/custom_tests")).unwrap();
    assert!(library.is_empty());
}
