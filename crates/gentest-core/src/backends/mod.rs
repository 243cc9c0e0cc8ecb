//! Target emitters. One stateless unit struct per framework.

mod cpp;
mod go;
mod java;
mod javascript;

pub use cpp::CppBackend;
pub use go::GoBackend;
pub use java::{CLASS_PLACEHOLDER, JavaBackend};
pub use javascript::JavaScriptBackend;

use crate::buffer::EmitBuffer;
use crate::sign::MAGIC_PLACEHOLDER;
use crate::value::Route;

/// Block comment opening every generated file. The placeholder line is
/// replaced by the content signature when the file is written.
pub(crate) fn push_header(out: &mut EmitBuffer, fixture: &str) {
    out.push_line("/**");
    out.push_line(format!(" * {MAGIC_PLACEHOLDER}"));
    out.push_line(format!(
        " * generated by gentest from gentest/fixtures/{fixture}.html"
    ));
    out.push_line(" */");
    out.push_line("");
}

/// Arguments following the node for a routed length setter.
///
/// `*Auto`/content-keyword variants take no numeric argument.
pub(crate) fn length_arguments(
    target: Option<String>,
    route: Route,
    number: fn(f32) -> String,
    undefined: &str,
) -> Vec<String> {
    let mut args: Vec<String> = target.into_iter().collect();
    match route {
        Route::Points(v) | Route::Percent(v) => args.push(number(v)),
        Route::Undefined => args.push(undefined.to_string()),
        Route::Auto
        | Route::MaxContent
        | Route::FitContent
        | Route::Stretch
        | Route::Unsupported => {}
    }
    args
}
