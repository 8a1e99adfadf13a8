use proc_macro::{Delimiter, Group, Ident, Literal, Punct, Spacing, Span, TokenStream, TokenTree};

/// Splits a token stream on top-level commas.
///
/// Commas nested inside groups (`(..)`, `[..]`, `{..}`) belong to their
/// group and are not separators. Empty segments, such as the one after a
/// trailing comma, are skipped.
pub(crate) fn split_args(input: TokenStream) -> Vec<TokenStream> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(current.drain(..).collect());
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current.into_iter().collect());
    }

    args
}

/// Runtime options accepted by `#[main(..)]` and `#[test(..)]`.
#[derive(Default)]
pub(crate) struct RuntimeOptions {
    pub(crate) worker_threads: Option<usize>,
    pub(crate) thread_name: Option<String>,
}

impl RuntimeOptions {
    /// Parses `key = value` pairs.
    pub(crate) fn parse(attr: TokenStream) -> Result<Self, String> {
        let mut options = RuntimeOptions::default();

        for arg in split_args(attr) {
            let tokens: Vec<TokenTree> = arg.into_iter().collect();

            let [TokenTree::Ident(key), TokenTree::Punct(eq), TokenTree::Literal(value)] =
                tokens.as_slice()
            else {
                return Err("expected `key = value`".to_owned());
            };

            if eq.as_char() != '=' {
                return Err(format!("expected `=` after `{key}`"));
            }

            let value = value.to_string();

            match key.to_string().as_str() {
                "worker_threads" => {
                    let n = value
                        .parse::<usize>()
                        .map_err(|_| format!("`worker_threads` must be an integer, got {value}"))?;

                    if n == 0 {
                        return Err("`worker_threads` must be > 0".to_owned());
                    }

                    options.worker_threads = Some(n);
                }
                "thread_name" => {
                    let name = value
                        .strip_prefix('"')
                        .and_then(|v| v.strip_suffix('"'))
                        .ok_or_else(|| "`thread_name` must be a string literal".to_owned())?;

                    options.thread_name = Some(name.to_owned());
                }
                other => return Err(format!("unknown runtime option `{other}`")),
            }
        }

        Ok(options)
    }

    /// Source of the expression building the runtime.
    fn builder(&self) -> String {
        let mut builder = String::from("::deferred::RuntimeBuilder::new()");

        if let Some(n) = self.worker_threads {
            builder.push_str(&format!(".worker_threads({n})"));
        }

        if let Some(name) = &self.thread_name {
            builder.push_str(&format!(".thread_name({name:?})"));
        }

        builder.push_str(".build().expect(\"failed to build the deferred runtime\")");
        builder
    }
}

/// Rewrites `async fn name(..) { body }` into a plain function whose body
/// runs `body` on a fresh runtime through `block_on`.
pub(crate) fn wrap_in_runtime(
    item: TokenStream,
    options: &RuntimeOptions,
) -> Result<Vec<TokenTree>, String> {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    let async_pos = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
        .ok_or_else(|| "the function must be declared `async`".to_owned())?;
    tokens.remove(async_pos);

    let body_pos = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
        .ok_or_else(|| "expected a function body".to_owned())?;

    let TokenTree::Group(body) = &tokens[body_pos] else {
        return Err("expected a function body".to_owned());
    };

    let mut future: TokenStream = "async move".parse().map_err(|e| format!("{e}"))?;
    future.extend([TokenTree::Group(Group::new(Delimiter::Brace, body.stream()))]);

    let mut block: TokenStream = format!("let __runtime = {}; __runtime.block_on", options.builder())
        .parse()
        .map_err(|e| format!("{e}"))?;
    block.extend([TokenTree::Group(Group::new(Delimiter::Parenthesis, future))]);

    tokens[body_pos] = TokenTree::Group(Group::new(Delimiter::Brace, block));

    Ok(tokens)
}

/// Builds `compile_error!("message");`.
pub(crate) fn compile_error(message: &str) -> TokenStream {
    let span = Span::call_site();

    let mut bang = Punct::new('!', Spacing::Alone);
    bang.set_span(span);

    let mut semi = Punct::new(';', Spacing::Alone);
    semi.set_span(span);

    [
        TokenTree::Ident(Ident::new("compile_error", span)),
        TokenTree::Punct(bang),
        TokenTree::Group(Group::new(
            Delimiter::Parenthesis,
            TokenTree::Literal(Literal::string(message)).into(),
        )),
        TokenTree::Punct(semi),
    ]
    .into_iter()
    .collect()
}
