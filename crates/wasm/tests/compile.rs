use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
struct TransformResult {
    code: String,
    css: Vec<String>,
    scope: Option<String>,
}

#[wasm_bindgen_test]
fn transforms_basic_element() {
    let result = astro_compiler_wasm::transform("<h1>Hello</h1>", JsValue::UNDEFINED);
    let result: TransformResult = serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert!(result.code.contains("<h1>Hello</h1>"));
    assert!(result.code.contains("$$createComponent"));
    assert!(result.scope.is_none());
}

#[wasm_bindgen_test]
fn transforms_scoped_style() {
    let result = astro_compiler_wasm::transform("<style>.a { color: red; }</style>", JsValue::UNDEFINED);
    let result: TransformResult = serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(result.css.len(), 1);
    assert!(result.scope.is_some());
    assert!(result.css[0].contains(":where(.astro-"));
}
