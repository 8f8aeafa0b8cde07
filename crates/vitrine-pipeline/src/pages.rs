//! Page rendering: include expansion plus optional snippet injection.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    assets,
    build::{BuildError, Result},
    include::Includer,
};

/// Renders top-level pages into the output directory.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    includer: Includer,
    partials: PathBuf,
    inject: Option<String>,
}

impl PageRenderer {
    /// Create a renderer. Pages inside `partials` are never emitted.
    pub fn new(includer: Includer, partials: impl Into<PathBuf>) -> Self {
        Self {
            includer,
            partials: partials.into(),
            inject: None,
        }
    }

    /// Insert `snippet` before `</body>` of every rendered page.
    #[must_use]
    pub fn with_injection(mut self, snippet: Option<String>) -> Self {
        self.inject = snippet;
        self
    }

    /// Render `pages` (all under `source_dir`) into `output_dir`.
    pub fn render(&self, pages: &[PathBuf], source_dir: &Path, output_dir: &Path) -> Result<usize> {
        let mut count = 0;

        for page in pages {
            if page.starts_with(&self.partials) {
                debug!(page = %page.display(), "skipping partial");
                continue;
            }

            let relative = page
                .strip_prefix(source_dir)
                .map_err(|_| BuildError::OutsideSource(page.clone()))?;

            let mut html = self.includer.expand_file(page)?;
            if let Some(snippet) = &self.inject {
                html = inject_before_body(&html, snippet);
            }

            let dest = output_dir.join(relative);
            assets::write_file(&dest, &html)?;
            debug!(page = %page.display(), dest = %dest.display(), "rendered page");
            count += 1;
        }

        info!(count, "rendered pages");
        Ok(count)
    }
}

/// Insert `snippet` before the last `</body>`, or append it when there is none.
///
/// Pages that already contain the snippet are returned unchanged.
#[must_use]
pub fn inject_before_body(html: &str, snippet: &str) -> String {
    if html.contains(snippet) {
        return html.to_string();
    }

    match html.rfind("</body>") {
        Some(pos) => format!("{}{snippet}{}", &html[..pos], &html[pos..]),
        None => format!("{html}{snippet}"),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_inject_before_body() {
        let html = "<html><body><p>x</p></body></html>";
        assert_eq!(
            inject_before_body(html, "<script></script>"),
            "<html><body><p>x</p><script></script></body></html>"
        );
    }

    #[test]
    fn test_inject_is_idempotent() {
        let once = inject_before_body("<body></body>", "<s/>");
        assert_eq!(inject_before_body(&once, "<s/>"), once);
    }

    #[test]
    fn test_inject_without_body_appends() {
        assert_eq!(inject_before_body("<p>x</p>", "<s/>"), "<p>x</p><s/>");
    }

    #[test]
    fn test_render_skips_partials() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app");
        let output = dir.path().join("dist");
        fs::create_dir_all(source.join("html")).unwrap();
        fs::write(source.join("html/footer.html"), "<footer/>").unwrap();
        fs::write(
            source.join("index.html"),
            "<body>@include('html/footer.html')</body>",
        )
        .unwrap();

        let renderer = PageRenderer::new(Includer::new("@").unwrap(), source.join("html"))
            .with_injection(Some("<script>lr</script>".to_string()));
        let pages = vec![source.join("index.html"), source.join("html/footer.html")];
        let count = renderer.render(&pages, &source, &output).unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            fs::read_to_string(output.join("index.html")).unwrap(),
            "<body><footer/><script>lr</script></body>"
        );
        assert!(!output.join("html").exists());
    }
}
