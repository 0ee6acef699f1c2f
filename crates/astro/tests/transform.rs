//! End-to-end scenarios exercising the full `transform` façade, one per
//! concrete example enumerated for testable properties.

use astro_compiler::{transform_component, TransformOptions};

#[test]
fn minimal_element_compiles_with_no_diagnostics() {
    let options = TransformOptions::new("Minimal.astro");
    let result = transform_component("<h1>Hello</h1>", &options);

    assert!(result.diagnostics.is_empty());
    assert!(result.code.contains("<h1>Hello</h1>"));
    assert!(!result.code.is_empty());
}

#[test]
fn frontmatter_and_interpolation_round_trip() {
    let options = TransformOptions::new("Greeting.astro");
    let source = "---\nconst name = \"World\";\n---\n<p>Hello {name}</p>";
    let result = transform_component(source, &options);

    assert!(result.code.contains("const name = \"World\";"));
    assert!(result.code.contains("${name}"));
}

#[test]
fn duplicate_attribute_last_occurrence_wins() {
    let options = TransformOptions::new("Attrs.astro");
    let result = transform_component("<div a=\"1\" a=\"2\"></div>", &options);

    assert!(result.code.contains("a=\"2\""));
    assert!(!result.code.contains("a=\"1\""));
}

#[test]
fn fragment_with_attributes_reports_error_1002() {
    let options = TransformOptions::new("BadFragment.astro");
    let result = transform_component("< data-x=\"y\"></>", &options);

    assert!(result.diagnostics.iter().any(|d| d.code == 1002));
    assert!(result.code.is_empty(), "fatal diagnostics blank out generated code");
}

#[test]
fn component_used_without_matching_import_reports_error_1003() {
    let options = TransformOptions::new("Missing.astro");
    let result = transform_component("<Foo />", &options);

    assert!(result.diagnostics.iter().any(|d| d.code == 1003));
    assert!(result.code.is_empty());
}

#[test]
fn scope_hash_is_stable_across_repeated_runs() {
    let options = TransformOptions::new("Styled.astro");
    let source = "<style>.a { color: red; }</style><div class=\"a\">hi</div>";

    let first = transform_component(source, &options);
    let second = transform_component(source, &options);

    assert!(first.scope.is_some());
    assert_eq!(first.scope, second.scope);
}

#[test]
fn scope_hash_differs_by_filename() {
    let source = "<style>.a { color: red; }</style><div class=\"a\">hi</div>";
    let a = transform_component(source, &TransformOptions::new("A.astro"));
    let b = transform_component(source, &TransformOptions::new("B.astro"));

    assert_ne!(a.scope, b.scope);
}

#[test]
fn client_directive_marks_component_as_hydrated() {
    let options = TransformOptions::new("Island.astro");
    let source = "---\nimport Widget from './Widget.astro';\n---\n<Widget client:load />";
    let result = transform_component(source, &options);

    assert_eq!(result.hydrated_components.len(), 1);
    assert_eq!(result.hydrated_components[0].directive.as_deref(), Some("load"));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn server_defer_component_is_collected_separately() {
    let options = TransformOptions::new("Deferred.astro");
    let source = "---\nimport Widget from './Widget.astro';\n---\n<Widget server:defer />";
    let result = transform_component(source, &options);

    assert_eq!(result.server_components.len(), 1);
    assert!(result.hydrated_components.is_empty());
}
