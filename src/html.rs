//! HTML templates shared by the project and top-level index pages.
//!
//! Names and filenames are inserted verbatim: PEP503 requires the anchor text
//! to be the exact filename, so nothing is re-encoded.

const INDENT: &str = "        ";

/// Render the page header, including the opening `<body>` and the `<h1>` title.
pub fn page_header(title: &str) -> String {
    format!(
        r#"<!DOCTYPE HTML>
<html>
    <head>
        <title>{title}</title>
        <meta charset="UTF-8" />
    </head>

    <body>
    <h1>{title}</h1>
"#
    )
}

/// Render the page footer, closing `<body>` and `<html>`.
pub fn page_footer() -> &'static str {
    "    </body>\n</html>\n"
}

/// One archive line of a project page.
pub fn project_entry(filename: &str, sha256_hex: &str) -> String {
    format!("{INDENT}<a href=\"{filename}#sha256={sha256_hex}\">{filename}</a> </br>\n")
}

/// One project line of the top-level page.
pub fn top_level_entry(project_name: &str, normalized_name: &str) -> String {
    format!("{INDENT}<a href=\"{project_name}\">{normalized_name}</a>\n")
}

/// Title of a project page.
pub fn project_title(project_name: &str) -> String {
    format!("Custom Package for '{project_name}'")
}
