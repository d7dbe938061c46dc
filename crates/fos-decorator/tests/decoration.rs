//! Layout decoration tests

use fos_decorator::{
    Composer, DecoratorError, DialectConfig, FileRepository, FragmentReference, MemoryRepository,
    TemplateMode, TemplateRepository, VariableEvaluator,
};

fn repository(templates: &[(&str, &str)]) -> MemoryRepository {
    let mut repo = MemoryRepository::new();
    for (name, source) in templates {
        repo.insert(name, source).unwrap();
    }
    repo
}

const LAYOUT: &str = concat!(
    "<!DOCTYPE html>",
    r#"<html lang="en">"#,
    "<head>",
    "<title>Site</title>",
    r#"<link rel="stylesheet" href="site.css">"#,
    r#"<script src="site.js"></script>"#,
    "</head>",
    r#"<body class="layout">"#,
    "<header>Header</header>",
    r#"<main layout:fragment="content"><p>Default</p></main>"#,
    "<footer>Footer</footer>",
    "</body>",
    "</html>",
);

const PAGE: &str = concat!(
    r#"<html layout:decorator="layout" lang="fr">"#,
    "<head>",
    "<title>Page</title>",
    r#"<meta name="description" content="d">"#,
    r#"<script src="page.js"></script>"#,
    r#"<link rel="stylesheet" href="page.css">"#,
    "</head>",
    r#"<body class="page">"#,
    r#"<section layout:fragment="content"><p>Hello</p></section>"#,
    "</body>",
    "</html>",
);

#[test]
fn test_full_layout() {
    let composer = Composer::new(repository(&[("layout", LAYOUT), ("page", PAGE)]));
    let html = composer.render("page").unwrap();

    assert_eq!(
        html,
        concat!(
            "<!DOCTYPE html>",
            "<html lang=\"fr\">",
            "<head>",
            "<title>Page</title>",
            "<link rel=\"stylesheet\" href=\"site.css\" />",
            "<link rel=\"stylesheet\" href=\"page.css\" />",
            "<script src=\"site.js\"></script>",
            "<script src=\"page.js\"></script>",
            "<meta name=\"description\" content=\"d\" />",
            "</head>",
            "<body class=\"page\">",
            "<header>Header</header>",
            "<section><p>Hello</p></section>",
            "<footer>Footer</footer>",
            "</body>",
            "</html>",
        )
    );
}

#[test]
fn test_missing_fragment_keeps_layout_default() {
    let page = r#"<html layout:decorator="layout"><body><p>Not a fragment</p></body></html>"#;
    let composer = Composer::new(repository(&[("layout", LAYOUT), ("page", page)]));
    let html = composer.render("page").unwrap();

    assert!(html.contains("<main><p>Default</p></main>"));
    assert!(!html.contains("Not a fragment"));
    assert!(html.contains("<title>Site</title>"));
}

#[test]
fn test_no_placeholders_no_fragments() {
    let layout = r#"<html><head><link rel="stylesheet" href="a.css"><script src="a.js"></script></head><body><p>Layout</p></body></html>"#;
    let page = r#"<html layout:decorator="layout"><head><script src="b.js"></script><style>p {}</style></head><body><p>Ignored</p></body></html>"#;
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));

    let first = composer.render("page").unwrap();
    let second = composer.render("page").unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        concat!(
            "<html><head>",
            "<link rel=\"stylesheet\" href=\"a.css\" />",
            "<style>p {}</style>",
            "<script src=\"a.js\"></script>",
            "<script src=\"b.js\"></script>",
            "</head><body><p>Layout</p></body></html>",
        )
    );
}

#[test]
fn test_whitespace_survives_composition() {
    let layout = concat!(
        "<html><body>\n",
        "  <main layout:fragment=\"content\"></main>\n",
        "  <pre>line one\n  line two</pre>\n",
        "</body></html>",
    );
    let page = concat!(
        r#"<html layout:decorator="layout"><body>"#,
        r#"<p layout:fragment="content"><b>Hello</b> <i>world</i></p>"#,
        "</body></html>",
    );
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));

    let html = composer.render("page").unwrap();
    assert!(html.contains("<b>Hello</b> <i>world</i>"));
    assert_eq!(
        html,
        concat!(
            "<html><head></head><body>\n",
            "  <p><b>Hello</b> <i>world</i></p>\n",
            "  <pre>line one\n  line two</pre>\n",
            "</body></html>",
        )
    );
}

#[test]
fn test_decorator_title_text_attribute_is_kept() {
    let layout = r#"<html><head><title th:text="${site}">Site</title></head><body></body></html>"#;
    let page = r#"<html layout:decorator="layout"><head><title>Page</title></head><body></body></html>"#;
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));

    // Without a title pattern the text attribute is left for the host engine
    assert_eq!(
        composer.render("page").unwrap(),
        r#"<html><head><title th:text="${site}">Page</title></head><body></body></html>"#
    );

    let page = r#"<html layout:decorator="layout"><head><title th:text="${page}">Page</title></head><body></body></html>"#;
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));
    assert_eq!(
        composer.render("page").unwrap(),
        r#"<html><head><title th:text="${page}">Page</title></head><body></body></html>"#
    );
}

#[test]
fn test_doctype_from_decorator() {
    let page = r#"<html layout:decorator="layout"><body></body></html>"#;
    let layout = "<!DOCTYPE html><html><body></body></html>";
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));

    assert!(composer.render("page").unwrap().starts_with("<!DOCTYPE html><html>"));
}

#[test]
fn test_doctype_content_wins() {
    let page = concat!(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#,
        r#"<html layout:decorator="layout"><body></body></html>"#,
    );
    let layout = "<!DOCTYPE html><html><body></body></html>";
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));

    let html = composer.render("page").unwrap();
    assert!(html.starts_with(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN""#));
    assert_eq!(html.matches("<!DOCTYPE").count(), 1);
}

#[test]
fn test_no_doctype_anywhere() {
    let page = r#"<html layout:decorator="layout"><body></body></html>"#;
    let layout = "<html><body></body></html>";
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));

    let doc = composer.compose("page").unwrap();
    assert!(doc.doctype().is_none());
}

#[test]
fn test_comments_around_layout_root() {
    let layout = "<!-- top --><html><body></body></html><!-- bottom -->";
    let page = r#"<html layout:decorator="layout"><body></body></html>"#;
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));

    let html = composer.render("page").unwrap();
    assert_eq!(html, "<!-- top --><html><head></head><body></body></html><!-- bottom -->");
}

#[test]
fn test_decorator_without_head_or_body() {
    let config = DialectConfig {
        template_mode: TemplateMode::Xml,
        ..DialectConfig::default()
    };
    let mut repo = MemoryRepository::new().with_mode(TemplateMode::Xml);
    repo.insert("empty", r#"<html data-x="1"></html>"#).unwrap();
    repo.insert(
        "page",
        r#"<html data-layout-decorator="empty" lang="en"><head><title>T</title></head><body><p>x</p></body></html>"#,
    )
    .unwrap();

    let composer = Composer::with_config(repo, config);
    let doc = composer.compose("page").unwrap();

    let root = doc.document_element().unwrap();
    let elem = doc.tree.element(root).unwrap();
    assert_eq!(elem.get_attr("data-x"), Some("1"));
    assert_eq!(elem.get_attr("lang"), Some("en"));
    assert!(!elem.has_attr("data-layout-decorator"));

    let children: Vec<_> = doc
        .tree
        .element_children(root)
        .into_iter()
        .filter_map(|id| doc.tree.element(id).map(|e| e.name.clone()))
        .collect();
    assert_eq!(children, vec!["head", "body"]);
    assert_eq!(doc.title(), "T");
    assert_eq!(doc.tree.text_content(doc.body().unwrap()), "x");
}

#[test]
fn test_xml_decoration() {
    let config = DialectConfig {
        template_mode: TemplateMode::Xml,
        ..DialectConfig::default()
    };
    let mut repo = MemoryRepository::new().with_mode(TemplateMode::Xml);
    repo.insert(
        "feed-layout",
        r#"<feed version="1"><name>Feed</name><entries data-layout-fragment="entries"><entry>none</entry></entries></feed>"#,
    )
    .unwrap();
    repo.insert(
        "feed",
        r#"<feed data-layout-decorator="feed-layout" lang="en"><entries data-layout-fragment="entries"><entry>one</entry></entries></feed>"#,
    )
    .unwrap();

    let composer = Composer::with_config(repo, config);
    let doc = composer.compose("feed").unwrap();

    let root = doc.document_element().unwrap();
    let elem = doc.tree.element(root).unwrap();
    assert_eq!(elem.get_attr("version"), Some("1"));
    assert_eq!(elem.get_attr("lang"), Some("en"));

    let xml = composer.render("feed").unwrap();
    assert!(xml.contains("<name>Feed</name>"));
    assert!(xml.contains("<entries><entry>one</entry></entries>"));
    assert!(!xml.contains("none"));
}

const BASE: &str = concat!(
    "<!DOCTYPE html><html>",
    r#"<head><title layout:title-pattern="$CONTENT_TITLE | $DECORATOR_TITLE">Base</title></head>"#,
    "<body>",
    "<header>Base header</header>",
    r#"<div layout:fragment="content">Base default</div>"#,
    "</body></html>",
);

const MIDDLE: &str = concat!(
    r#"<html layout:decorator="base">"#,
    "<head><title>Middle</title></head>",
    "<body>",
    r#"<div layout:fragment="content">"#,
    "<h1>Middle</h1>",
    r#"<div layout:fragment="page-content">Middle default</div>"#,
    "</div>",
    "</body></html>",
);

const DEEP_PAGE: &str = concat!(
    r#"<html layout:decorator="middle">"#,
    "<head><title>Page</title></head>",
    r#"<body><p layout:fragment="page-content">Page body</p></body>"#,
    "</html>",
);

#[test]
fn test_deep_hierarchy() {
    let composer = Composer::new(repository(&[
        ("base", BASE),
        ("middle", MIDDLE),
        ("page", DEEP_PAGE),
    ]));

    assert_eq!(
        composer.render("page").unwrap(),
        concat!(
            "<!DOCTYPE html><html>",
            "<head><title>Page | Base</title></head>",
            "<body><header>Base header</header><div><h1>Middle</h1><p>Page body</p></div></body>",
            "</html>",
        )
    );
}

#[test]
fn test_deep_hierarchy_matches_precomposed_layout() {
    let precomposed_page = DEEP_PAGE.replace(
        r#"layout:decorator="middle""#,
        r#"layout:decorator="base-middle""#,
    );
    let mut repo = repository(&[
        ("base", BASE),
        ("middle", MIDDLE),
        ("page", DEEP_PAGE),
        ("precomposed-page", precomposed_page.as_str()),
    ]);

    let precomposed = {
        let composer = Composer::new(&repo);
        let mut middle = repo.resolve("middle").unwrap();
        composer
            .decorate(&mut middle, &FragmentReference::template("base"))
            .unwrap();
        middle
    };
    repo.insert_document("base-middle", precomposed);

    let composer = Composer::new(&repo);
    assert_eq!(
        composer.render("page").unwrap(),
        composer.render("precomposed-page").unwrap()
    );
}

#[test]
fn test_configured_title_tokens() {
    let config = DialectConfig {
        decorator_title_token: "{site}".to_string(),
        content_title_token: "{page}".to_string(),
        ..DialectConfig::default()
    };
    let layout = r#"<html><head><title layout:title-pattern="{page} - {site}">Site</title></head><body></body></html>"#;
    let page = r#"<html layout:decorator="layout"><head><title>Page</title></head><body></body></html>"#;
    let composer = Composer::with_config(repository(&[("layout", layout), ("page", page)]), config);

    assert_eq!(composer.compose("page").unwrap().title(), "Page - Site");
}

#[test]
fn test_title_without_content_title() {
    let layout = r#"<html><head><title layout:title-pattern="$CONTENT_TITLE - $DECORATOR_TITLE">Site</title></head><body></body></html>"#;
    let page = r#"<html layout:decorator="layout"><body></body></html>"#;
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));

    let html = composer.render("page").unwrap();
    assert!(html.contains("<title>Site</title>"));
}

#[test]
fn test_title_expression() {
    let layout = r#"<html><head><title layout:title-pattern="$CONTENT_TITLE - $DECORATOR_TITLE" th:text="${site}">Site</title></head><body></body></html>"#;
    let page = r#"<html layout:decorator="layout"><head><title>Page</title></head><body></body></html>"#;
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]))
        .with_evaluator(VariableEvaluator::new().with_variable("site", "Example"));

    assert_eq!(
        composer.render("page").unwrap(),
        "<html><head><title>Page - Example</title></head><body></body></html>"
    );
}

#[test]
fn test_decorator_must_be_on_root() {
    let page = r#"<div layout:decorator="layout"><p layout:fragment="content">x</p></div>"#;
    let layout = r#"<html><body><main layout:fragment="content"></main></body></html>"#;

    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));
    assert!(matches!(
        composer.compose("page"),
        Err(DecoratorError::Configuration { template, element, .. })
            if template == "page" && element == "div"
    ));

    let config = DialectConfig {
        template_mode: TemplateMode::LegacyHtml,
        ..DialectConfig::default()
    };
    let composer = Composer::with_config(repository(&[("layout", layout), ("page", page)]), config);
    assert_eq!(
        composer.render("page").unwrap(),
        "<html><head></head><body><p>x</p></body></html>"
    );
}

#[test]
fn test_cyclic_decorators() {
    let composer = Composer::new(repository(&[
        ("page", r#"<html layout:decorator="a"></html>"#),
        ("a", r#"<html layout:decorator="b"></html>"#),
        ("b", r#"<html layout:decorator="a"></html>"#),
    ]));

    match composer.compose("page") {
        Err(DecoratorError::CyclicDecorator { chain }) => {
            assert_eq!(chain, vec!["page", "a", "b", "a"]);
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn test_self_decoration_is_a_cycle() {
    let page = r#"<html layout:decorator="page"></html>"#;
    let composer = Composer::new(repository(&[("page", page)]));
    assert!(matches!(
        composer.compose("page"),
        Err(DecoratorError::CyclicDecorator { chain }) if chain == vec!["page", "page"]
    ));
}

#[test]
fn test_missing_decorator() {
    let page = r#"<html layout:decorator="gone"></html>"#;
    let composer = Composer::new(repository(&[("page", page)]));
    let err = composer.compose("page").unwrap_err();
    assert!(matches!(err, DecoratorError::ReferenceNotFound { .. }));
    assert_eq!(err.to_string(), "Reference 'gone' used by page could not be found");
}

#[test]
fn test_data_attribute_spelling() {
    let layout = r#"<html><body><main data-layout-fragment="content">default</main></body></html>"#;
    let page = r#"<html data-layout-decorator="layout"><body><div data-layout-fragment="content">data</div></body></html>"#;
    let composer = Composer::new(repository(&[("layout", layout), ("page", page)]));

    assert_eq!(
        composer.render("page").unwrap(),
        "<html><head></head><body><div>data</div></body></html>"
    );
}

#[test]
fn test_file_repository() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("layout.html"), LAYOUT).unwrap();
    std::fs::write(dir.path().join("page.html"), PAGE).unwrap();

    let composer = Composer::new(FileRepository::new(dir.path()));
    let from_files = composer.render("page").unwrap();

    let composer = Composer::new(repository(&[("layout", LAYOUT), ("page", PAGE)]));
    assert_eq!(from_files, composer.render("page").unwrap());
}
