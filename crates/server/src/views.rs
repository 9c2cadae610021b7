use std::path::Path;

use tera::{Context, Tera};
use tracing::{info, warn};

pub const LANDING_TEMPLATE: &str = "landing.html";
pub const SENT_TEMPLATE: &str = "sent.html";

const EMBEDDED_TEMPLATES: [(&str, &str); 2] = [
    (LANDING_TEMPLATE, include_str!("../../../templates/landing.html")),
    (SENT_TEMPLATE, include_str!("../../../templates/sent.html")),
];

/// Values shown on the landing page. All fields are empty on a plain `GET /`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LandingPage<'a> {
    pub error: Option<&'a str>,
    pub name: &'a str,
    pub number: &'a str,
}

pub struct Views {
    tera: Tera,
}

impl Views {
    /// Loads `*.html` templates from `dir`, filling in any missing view from the
    /// copies compiled into the binary.
    pub fn load(dir: &Path) -> Result<Self, tera::Error> {
        let glob = format!("{}/**/*.html", dir.display());
        let tera = match Tera::new(&glob) {
            Ok(tera) => tera,
            Err(error) => {
                warn!(
                    event_name = "system.views.filesystem_unavailable",
                    templates_dir = %dir.display(),
                    error = %error,
                    "failed to load templates from filesystem, using embedded views"
                );
                Tera::default()
            }
        };

        Self::with_fallbacks(tera)
    }

    #[cfg(test)]
    pub(crate) fn without_templates() -> Self {
        Self { tera: Tera::default() }
    }

    #[cfg(test)]
    pub(crate) fn embedded() -> Result<Self, tera::Error> {
        Self::with_fallbacks(Tera::default())
    }

    fn with_fallbacks(mut tera: Tera) -> Result<Self, tera::Error> {
        for (name, source) in EMBEDDED_TEMPLATES {
            if tera.get_template_names().any(|loaded| loaded == name) {
                continue;
            }
            info!(event_name = "system.views.embedded", template = name, "using embedded view");
            tera.add_raw_template(name, source)?;
        }

        Ok(Self { tera })
    }

    pub fn landing(&self, page: &LandingPage<'_>) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("error", &page.error);
        context.insert("name", page.name);
        context.insert("number", page.number);
        self.tera.render(LANDING_TEMPLATE, &context)
    }

    pub fn sent(&self) -> Result<String, tera::Error> {
        self.tera.render(SENT_TEMPLATE, &Context::new())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{LandingPage, Views};

    #[test]
    fn landing_page_without_data_has_no_error() {
        let views = Views::embedded().expect("embedded views should parse");

        let html = views.landing(&LandingPage::default()).expect("landing renders");

        assert!(html.contains("id=\"callback-form\""));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn landing_page_echoes_values_escaped() {
        let views = Views::embedded().expect("embedded views should parse");

        let html = views
            .landing(&LandingPage {
                error: Some("Please fill all required fields!"),
                name: "<b>Alice</b>",
                number: "555-1234",
            })
            .expect("landing renders");

        assert!(html.contains("Please fill all required fields!"));
        assert!(html.contains("value=\"555-1234\""));
        assert!(html.contains("&lt;b&gt;Alice&lt;&#x2F;b&gt;"));
        assert!(!html.contains("<b>Alice</b>"));
    }

    #[test]
    fn filesystem_templates_take_precedence_over_embedded() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("sent.html"), "<p>custom sent page</p>").expect("write template");

        let views = Views::load(dir.path()).expect("views load");

        assert_eq!(views.sent().expect("sent renders"), "<p>custom sent page</p>");
        assert!(views.landing(&LandingPage::default()).expect("landing renders").contains("callback-form"));
    }

    #[test]
    fn missing_template_directory_falls_back_to_embedded() {
        let dir = TempDir::new().expect("temp dir");

        let views = Views::load(&dir.path().join("does-not-exist")).expect("views load");

        assert!(views.sent().expect("sent renders").contains("id=\"callback-sent\""));
    }
}
