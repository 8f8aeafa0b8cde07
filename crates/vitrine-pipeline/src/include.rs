//! HTML include expansion.
//!
//! Pages pull shared markup in with `@include('path.html')`, resolved against the
//! including file's directory. A JSON object may follow the path,
//! `@include('card.html', { "title": "Hi" })`, whose keys become `@title` variables in
//! the included file and everything it includes in turn. The `@` prefix is configurable.

use std::{
    fs,
    path::{Path, PathBuf},
};

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Deepest allowed include nesting.
pub const MAX_DEPTH: usize = 32;

/// Include expansion errors.
#[derive(Debug, Error)]
pub enum IncludeError {
    /// The included file does not exist.
    #[error("{from}: included file not found: {path}")]
    Missing { path: PathBuf, from: PathBuf },

    /// A file includes itself, directly or through others.
    #[error("include cycle: {chain}")]
    Cycle { chain: String },

    /// Nesting went deeper than [`MAX_DEPTH`].
    #[error("includes nested deeper than {MAX_DEPTH} levels at {path}")]
    TooDeep { path: PathBuf },

    /// Malformed include directive.
    #[error("{path}:{line}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The parameter block is not a JSON object.
    #[error("{path}:{line}: invalid include parameters: {source}")]
    Params {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The prefix cannot form a variable pattern.
    #[error("invalid include prefix `{0}`")]
    Prefix(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for include operations.
pub type Result<T> = std::result::Result<T, IncludeError>;

/// Variables visible while expanding a file.
pub type Context = Map<String, Value>;

/// One parsed `include(...)` directive.
#[derive(Debug, Clone, PartialEq)]
struct Directive {
    start: usize,
    end: usize,
    target: String,
    params: Option<String>,
}

/// Expands include directives and variables in HTML files.
#[derive(Debug, Clone)]
pub struct Includer {
    directive: String,
    variable: Regex,
}

impl Includer {
    /// Create an includer for directives starting with `prefix`.
    pub fn new(prefix: &str) -> Result<Self> {
        if prefix.is_empty() {
            return Err(IncludeError::Prefix(prefix.to_string()));
        }
        let variable = Regex::new(&format!(
            r"{}([A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*)",
            regex::escape(prefix)
        ))
        .map_err(|_| IncludeError::Prefix(prefix.to_string()))?;

        Ok(Self {
            directive: format!("{prefix}include"),
            variable,
        })
    }

    /// Expand the file at `path` with an empty context.
    pub fn expand_file(&self, path: &Path) -> Result<String> {
        let text = fs::read_to_string(path)?;
        let mut chain = vec![canonical(path)];
        self.expand(&text, path, &Context::new(), &mut chain)
    }

    /// Expand `text`, which was read from `path`, under `context`.
    pub fn expand_str(&self, text: &str, path: &Path, context: &Context) -> Result<String> {
        let mut chain = vec![canonical(path)];
        self.expand(text, path, context, &mut chain)
    }

    fn expand(
        &self,
        text: &str,
        path: &Path,
        context: &Context,
        chain: &mut Vec<PathBuf>,
    ) -> Result<String> {
        let text = self.substitute(text, context);
        let base = path.parent().unwrap_or(Path::new(""));

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        while let Some(directive) = self.next_directive(&text, cursor, path)? {
            out.push_str(&text[cursor..directive.start]);
            cursor = directive.end;

            let line = line_of(&text, directive.start);
            let target = base.join(&directive.target);
            if !target.is_file() {
                return Err(IncludeError::Missing {
                    path: target,
                    from: path.to_path_buf(),
                });
            }

            let key = canonical(&target);
            if chain.contains(&key) {
                chain.push(key);
                return Err(IncludeError::Cycle {
                    chain: describe_chain(chain),
                });
            }
            if chain.len() > MAX_DEPTH {
                return Err(IncludeError::TooDeep { path: target });
            }

            let mut inner = context.clone();
            if let Some(raw) = &directive.params {
                let params: Context =
                    serde_json::from_str(raw).map_err(|source| IncludeError::Params {
                        path: path.to_path_buf(),
                        line,
                        source,
                    })?;
                inner.extend(params);
            }

            debug!(from = %path.display(), target = %target.display(), "expanding include");
            let included = fs::read_to_string(&target)?;
            chain.push(key);
            let expanded = self.expand(&included, &target, &inner, chain)?;
            chain.pop();
            out.push_str(&expanded);
        }

        out.push_str(&text[cursor..]);
        Ok(out)
    }

    /// Replace known variables. Unknown names are left as written.
    fn substitute(&self, text: &str, context: &Context) -> String {
        if context.is_empty() {
            return text.to_string();
        }

        self.variable
            .replace_all(text, |caps: &Captures<'_>| {
                let name = &caps[1];
                if name == "include" {
                    return caps[0].to_string();
                }
                match lookup(context, name) {
                    Some(Value::String(s)) => s.clone(),
                    Some(value) => value.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Find the next directive at or after `from`.
    fn next_directive(&self, text: &str, from: usize, path: &Path) -> Result<Option<Directive>> {
        let mut search = from;
        while let Some(offset) = text[search..].find(&self.directive) {
            let start = search + offset;
            let after = start + self.directive.len();
            let rest = &text[after..];
            let trimmed = rest.trim_start();
            if !trimmed.starts_with('(') {
                // `@includes` or prose mentioning the directive
                search = after;
                continue;
            }

            let open = after + (rest.len() - trimmed.len());
            let mut parser = DirectiveParser {
                text,
                pos: open + 1,
            };
            let syntax = |message: &str| IncludeError::Syntax {
                path: path.to_path_buf(),
                line: line_of(text, start),
                message: message.to_string(),
            };

            parser.skip_ws();
            let target = parser
                .quoted()
                .ok_or_else(|| syntax("expected a quoted path"))?;
            parser.skip_ws();

            let params = if parser.eat(',') {
                parser.skip_ws();
                let object = parser
                    .object()
                    .ok_or_else(|| syntax("expected a JSON object after the path"))?;
                parser.skip_ws();
                Some(object)
            } else {
                None
            };

            if !parser.eat(')') {
                return Err(syntax("expected `)`"));
            }

            return Ok(Some(Directive {
                start,
                end: parser.pos,
                target,
                params,
            }));
        }

        Ok(None)
    }
}

/// Cursor over the argument list of a directive.
struct DirectiveParser<'a> {
    text: &'a str,
    pos: usize,
}

impl DirectiveParser<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// A single- or double-quoted string without escapes.
    fn quoted(&mut self) -> Option<String> {
        let quote = self.peek().filter(|c| *c == '\'' || *c == '"')?;
        let body_start = self.pos + 1;
        let len = self.text[body_start..].find(quote)?;
        self.pos = body_start + len + 1;
        Some(self.text[body_start..body_start + len].to_string())
    }

    /// A balanced `{...}` block, honoring JSON string literals.
    fn object(&mut self) -> Option<String> {
        if self.peek() != Some('{') {
            return None;
        }

        let start = self.pos;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, c) in self.text[start..].char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let end = start + offset + 1;
                        self.pos = end;
                        return Some(self.text[start..end].to_string());
                    }
                }
                _ => {}
            }
        }

        None
    }
}

/// Resolve a dotted name against the context.
fn lookup<'a>(context: &'a Context, name: &str) -> Option<&'a Value> {
    let mut parts = name.split('.');
    let mut value = context.get(parts.next()?)?;
    for part in parts {
        value = value.as_object()?.get(part)?;
    }
    Some(value)
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn describe_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| {
            p.file_name()
                .map_or_else(|| p.display().to_string(), |n| n.to_string_lossy().into_owned())
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}
