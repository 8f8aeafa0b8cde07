//! SVG stack sprite generation.
//!
//! Every icon becomes a nested `<svg id="name">` inside one root `<svg>`. A stylesheet
//! in the sprite hides all icons but the `:target`, so `sprite.svg#name` renders a
//! single icon when used as an image or CSS background.

use std::{
    collections::HashSet,
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use thiserror::Error;
use tracing::{debug, info};

use crate::assets::{self, AssetError};

/// Sprite generation errors.
#[derive(Debug, Error)]
pub enum SpriteError {
    /// A source has no root `<svg>` element.
    #[error("{0} has no root <svg> element")]
    NotSvg(PathBuf),

    /// A source is not well-formed XML.
    #[error("{path} is not well-formed: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    /// Two sources map to the same icon id.
    #[error("duplicate icon id `{id}` from {path}")]
    DuplicateId { id: String, path: PathBuf },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the sprite failed.
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Result type for sprite operations.
pub type Result<T> = std::result::Result<T, SpriteError>;

const STACK_STYLE: &str = ":root>svg{display:none}:root>svg:target{display:block}";

/// One icon of the sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteIcon {
    /// Fragment identifier, derived from the file stem.
    pub id: String,

    /// `viewBox` of the source, if it had one or could be derived.
    pub view_box: Option<String>,

    /// Inner markup of the source's root element.
    pub body: String,
}

impl SpriteIcon {
    /// Parse an icon from SVG markup.
    pub fn parse(id: impl Into<String>, markup: &str, path: &Path) -> Result<Self> {
        let root = read_root(markup)
            .map_err(|source| SpriteError::Xml {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| SpriteError::NotSvg(path.to_path_buf()))?;

        let body = root
            .content
            .map(|range| markup[range].trim().to_string())
            .unwrap_or_default();

        Ok(Self {
            id: id.into(),
            view_box: root.view_box,
            body,
        })
    }

    fn render(&self, out: &mut String) {
        out.push_str("<svg");
        if let Some(view_box) = &self.view_box {
            out.push_str(&format!(r#" viewBox="{view_box}""#));
        }
        out.push_str(&format!(
            r#" id="{}" xmlns="http://www.w3.org/2000/svg">"#,
            self.id
        ));
        out.push_str(&self.body);
        out.push_str("</svg>");
    }
}

/// The root `<svg>` of an icon.
#[derive(Debug, Default)]
struct Root {
    view_box: Option<String>,

    /// Byte range between the start and end tags; `None` when self-closing.
    content: Option<Range<usize>>,
}

/// Find the root element. `Ok(None)` when it is not `<svg>`.
fn read_root(markup: &str) -> std::result::Result<Option<Root>, quick_xml::Error> {
    let mut reader = Reader::from_str(markup);
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"svg" => {
                let mut root = root_attributes(&e)?;
                let span = reader.read_to_end(e.name())?;
                root.content = Some(span.start as usize..span.end as usize);
                return Ok(Some(root));
            }
            Event::Empty(e) if e.local_name().as_ref() == b"svg" => {
                return root_attributes(&e).map(Some);
            }
            Event::Start(_) | Event::Empty(_) | Event::Eof => return Ok(None),
            // prolog, comments, doctype, whitespace
            _ => {}
        }
    }
}

/// Take the `viewBox`, falling back to numeric width/height.
fn root_attributes(start: &BytesStart<'_>) -> std::result::Result<Root, quick_xml::Error> {
    let mut view_box = None;
    let mut width = None;
    let mut height = None;

    for attr in start.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        let value = value.trim();
        match attr.key.as_ref() {
            b"viewBox" => view_box = Some(value.to_string()),
            b"width" => width = value.trim_end_matches("px").parse::<f64>().ok(),
            b"height" => height = value.trim_end_matches("px").parse::<f64>().ok(),
            _ => {}
        }
    }

    let view_box = view_box.or_else(|| match (width, height) {
        (Some(w), Some(h)) => Some(format!("0 0 {w} {h}")),
        _ => None,
    });
    Ok(Root {
        view_box,
        content: None,
    })
}

/// Icon id for a file: its stem with whitespace replaced by dashes.
fn icon_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().split_whitespace().collect::<Vec<_>>().join("-"))
        .unwrap_or_default()
}

/// Assemble icons into one stack sprite document.
#[must_use]
pub fn render_sprite(icons: &[SpriteIcon]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="utf-8"?><svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#,
    );
    out.push_str(&format!("<style>{STACK_STYLE}</style>"));
    for icon in icons {
        icon.render(&mut out);
    }
    out.push_str("</svg>");
    out
}

/// Build a sprite from `sources` and write it to `output`.
///
/// Sources are ordered by file name. The output is left untouched when its content
/// would not change. Returns the number of icons.
pub fn build_sprite(sources: &[PathBuf], output: &Path) -> Result<usize> {
    let mut sorted: Vec<&PathBuf> = sources.iter().filter(|p| p.as_path() != output).collect();
    sorted.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut seen = HashSet::new();
    let mut icons = Vec::with_capacity(sorted.len());
    for path in sorted {
        let id = icon_id(path);
        if !seen.insert(id.clone()) {
            return Err(SpriteError::DuplicateId {
                id,
                path: path.clone(),
            });
        }

        let markup = fs::read_to_string(path)?;
        icons.push(SpriteIcon::parse(id, &markup, path)?);
        debug!(path = %path.display(), "added icon to sprite");
    }

    let sprite = render_sprite(&icons);
    let unchanged = fs::read_to_string(output).is_ok_and(|existing| existing == sprite);
    if unchanged {
        debug!(output = %output.display(), "sprite unchanged");
    } else {
        assets::write_file(output, &sprite)?;
    }

    info!(output = %output.display(), icons = icons.len(), "built sprite");
    Ok(icons.len())
}
