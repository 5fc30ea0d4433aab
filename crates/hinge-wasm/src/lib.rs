//! WASM bindings for the hinge template compiler.
//!
//! Exposes `render()` and `tags()` to JavaScript via wasm-bindgen.
//! `render` returns a JS object `{ output, nodes }` or throws on error.

use std::sync::LazyLock;

use hinge_exec::Renderer;
use hinge_parser::{Parser, StatementRegistry};
use wasm_bindgen::prelude::*;

static REGISTRY: LazyLock<StatementRegistry> = LazyLock::new(StatementRegistry::builtin);

/// Compile and render a template.
///
/// Returns a JS object with `{ output: string, nodes: number }`.
/// Pass a `seed` to make `random` output reproducible.
/// Throws a JS error if parsing or rendering fails.
#[wasm_bindgen]
pub fn render(source: &str, seed: Option<u64>) -> Result<JsValue, JsError> {
    let (output, nodes) = render_native(source, seed).map_err(|e| JsError::new(&e))?;

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"output".into(), &output.into())
        .map_err(|_| JsError::new("Failed to set output property"))?;
    js_sys::Reflect::set(&js_obj, &"nodes".into(), &(nodes as u32).into())
        .map_err(|_| JsError::new("Failed to set nodes property"))?;

    Ok(js_obj.into())
}

/// Names of the registered tags.
#[wasm_bindgen]
pub fn tags() -> js_sys::Array {
    REGISTRY
        .names()
        .into_iter()
        .map(JsValue::from_str)
        .collect()
}

/// Get the compiler version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn render_native(source: &str, seed: Option<u64>) -> Result<(String, usize), String> {
    let template = Parser::parse(source, &REGISTRY).map_err(|e| e.to_string())?;

    let mut renderer = match seed {
        Some(seed) => Renderer::with_seed(seed),
        None => Renderer::new(),
    };
    template
        .execute(&mut renderer)
        .map_err(|e| e.to_string())?;

    Ok((renderer.into_output(), template.nodes.len()))
}
