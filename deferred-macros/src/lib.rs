//! Procedural macros for the Deferred runtime.
//!
//! - `#[deferred::main]` and `#[deferred::test]` run an `async fn` on a
//!   freshly built runtime.
//! - `join!` awaits several futures concurrently inside one task.

mod utils;

use proc_macro::{TokenStream, TokenTree};
use utils::{RuntimeOptions, compile_error, split_args, wrap_in_runtime};

/// Awaits every future concurrently and resolves to the tuple of outputs.
///
/// All branches are polled from the calling task, so `join!` introduces no
/// new task. With a single argument the output is not wrapped in a tuple.
///
/// ```rust,ignore
/// let (one, two) = deferred::join!(one.join(), two.join());
/// ```
#[proc_macro]
pub fn join(input: TokenStream) -> TokenStream {
    let branches = split_args(input);

    match branches.len() {
        0 => return "()".parse().unwrap_or_else(|_| compile_error("join: empty input")),
        1 => {
            let expr = branches[0].to_string();
            return format!("({expr}).await")
                .parse()
                .unwrap_or_else(|e| compile_error(&format!("join: {e}")));
        }
        _ => {}
    }

    let mut out = String::from("{\n");

    for (i, branch) in branches.iter().enumerate() {
        out.push_str(&format!(
            "let mut __branch{i} = ::deferred::__private::MaybeDone::new({branch});\n"
        ));
    }

    out.push_str("::std::future::poll_fn(|__cx| {\n    let mut __done = true;\n");

    for i in 0..branches.len() {
        out.push_str(&format!("    __done &= __branch{i}.poll_done(__cx);\n"));
    }

    let outputs = (0..branches.len())
        .map(|i| format!("__branch{i}.take()"))
        .collect::<Vec<_>>()
        .join(", ");

    out.push_str(&format!(
        "    if __done {{\n\
                 ::std::task::Poll::Ready(({outputs},))\n\
             }} else {{\n\
                 ::std::task::Poll::Pending\n\
             }}\n\
         }}).await\n}}\n"
    ));

    out.parse()
        .unwrap_or_else(|e| compile_error(&format!("join: {e}")))
}

/// Runs an `async fn main` on a runtime built for the duration of the call.
///
/// Accepts `worker_threads = N` and `thread_name = "name"`.
///
/// ```rust,ignore
/// #[deferred::main(worker_threads = 2)]
/// async fn main() {
///     let answer = deferred::task::launch(async { 42 });
///     println!("{:?}", answer.await);
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr, item, false)
}

/// Like [`main`], for `async` test functions. Adds `#[test]` itself.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr, item, true)
}

fn expand(attr: TokenStream, item: TokenStream, is_test: bool) -> TokenStream {
    let options = match RuntimeOptions::parse(attr) {
        Ok(options) => options,
        Err(message) => return compile_error(&message),
    };

    let tokens = match wrap_in_runtime(item, &options) {
        Ok(tokens) => tokens,
        Err(message) => return compile_error(&message),
    };

    let mut result: Vec<TokenTree> = Vec::new();

    if is_test {
        match "#[::core::prelude::v1::test]".parse::<TokenStream>() {
            Ok(attr) => result.extend(attr),
            Err(e) => return compile_error(&format!("{e}")),
        }
    }

    result.extend(tokens);
    result.into_iter().collect()
}
