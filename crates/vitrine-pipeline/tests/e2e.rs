//! End-to-end tests for the Vitrine pipeline.
//!
//! These tests lay out a small landing page project and run the full build on it.

use std::{fs, path::Path};

use tempfile::TempDir;
use vitrine_core::Config;
use vitrine_pipeline::{Pipeline, Task};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("has parent")).expect("create dirs");
    fs::write(path, content).expect("write file");
}

fn landing_page() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let root = dir.path();

    write(
        root,
        "app/index.html",
        r#"<!DOCTYPE html>
<html>
<head><link rel="stylesheet" href="css/style.min.css"></head>
<body>
@include('html/header.html', {"title": "Questions"})
<button class="answers__accordion-btn">Delivery?</button>
<div class="answers__accordion-panel">Free.</div>
<script src="js/main.min.js"></script>
</body>
</html>
"#,
    );
    write(root, "app/html/header.html", "<header><h1>@title</h1></header>");
    write(
        root,
        "app/scss/style.scss",
        "@import 'vars';\n.answers__accordion-btn.active { padding: $gap; }\n",
    );
    write(root, "app/scss/_vars.scss", "$gap: 12px;\n");
    write(root, "app/js/main.js", "console.log('page');\n");
    write(
        root,
        "app/images/svg/phone.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 20"><path d="M0 0"/></svg>"#,
    );
    write(root, "app/images/hero.jpg", "jpeg bytes");
    write(root, "app/fonts/inter.woff2", "font bytes");
    write(root, "app/fonts/inter.ttf", "not shipped");

    dir
}

#[test]
fn test_full_build() {
    let project = landing_page();
    let root = project.path();

    let pipeline = Pipeline::new(Config::default(), root).expect("pipeline");
    let stats = pipeline.build().expect("build succeeds");

    assert_eq!(stats.pages, 1);
    assert_eq!(stats.icons, 1);
    assert_eq!(stats.stylesheets, 1);
    assert_eq!(stats.scripts, 1);
    assert_eq!(stats.static_files, 1);
    // hero.jpg, svg/phone.svg, and the freshly built sprite.svg
    assert_eq!(stats.images, 3);

    let html = fs::read_to_string(root.join("dist/index.html")).expect("page");
    assert!(html.contains("<header><h1>Questions</h1></header>"));
    assert!(!html.contains("@include"));
    assert!(!html.contains("__livereload"));

    let css = fs::read_to_string(root.join("dist/css/style.min.css")).expect("css");
    assert!(css.contains(".answers__accordion-btn.active{padding:12px}"));

    let js = fs::read_to_string(root.join("dist/js/main.min.js")).expect("js");
    assert_eq!(js, "console.log('page');\n");

    let sprite = fs::read_to_string(root.join("app/images/sprite.svg")).expect("sprite");
    assert!(sprite.contains(r#"id="phone""#));
    assert!(root.join("dist/images/sprite.svg").exists());
    assert!(root.join("dist/images/hero.jpg").exists());

    assert!(root.join("dist/fonts/inter.woff2").exists());
    assert!(!root.join("dist/fonts/inter.ttf").exists());
    assert!(!root.join("dist/html").exists());
}

#[test]
fn test_build_cleans_stale_output() {
    let project = landing_page();
    let root = project.path();
    write(root, "dist/old-page.html", "stale");

    let pipeline = Pipeline::new(Config::default(), root).expect("pipeline");
    let stats = pipeline.build().expect("build succeeds");

    assert_eq!(stats.cleaned, 1);
    assert!(!root.join("dist/old-page.html").exists());
    assert!(root.join("dist/index.html").exists());
}

#[test]
fn test_build_stops_at_first_failure() {
    let project = landing_page();
    let root = project.path();
    write(root, "app/scss/style.scss", ".broken { color: ");

    let pipeline = Pipeline::new(Config::default(), root).expect("pipeline");
    let err = pipeline.build().expect_err("styles fail");

    assert!(err.to_string().contains("styles"));
    // scripts come after styles and never ran
    assert!(!root.join("dist/js/main.min.js").exists());
}

#[test]
fn test_custom_layout() {
    let dir = TempDir::new().expect("create temp dir");
    let root = dir.path();
    write(root, "vitrine.toml", "");
    write(root, "src/pages.html", "<p>@@include('parts/p.html')</p>");
    write(root, "src/parts/p.html", "part");

    let mut config = Config::load(&root.join("vitrine.toml")).expect("config");
    config.paths.source = "src".to_string();
    config.paths.output = "public".to_string();
    config.html.partials = "parts".to_string();
    config.html.prefix = "@@".to_string();

    let pipeline = Pipeline::new(config, root).expect("pipeline");
    let outcome = pipeline.run(Task::Html).expect("html");

    assert_eq!(outcome.count, 1);
    assert_eq!(
        fs::read_to_string(root.join("public/pages.html")).expect("page"),
        "<p>part</p>"
    );
}

#[test]
fn test_output_over_source_is_rejected_before_clean() {
    let project = landing_page();
    let root = project.path();

    let absolute_source = root.join("app").to_string_lossy().to_string();
    for output in ["./app", ".", "app/..", absolute_source.as_str()] {
        let mut config = Config::default();
        config.paths.output = output.to_string();

        assert!(
            Pipeline::new(config, root).is_err(),
            "output `{output}` accepted"
        );
    }

    assert!(root.join("app/index.html").exists());
    assert!(root.join("app/scss/style.scss").exists());
}
