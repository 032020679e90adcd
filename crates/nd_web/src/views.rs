use handlebars::Handlebars;
use nd_core::{Error, Result};
use serde::Serialize;

const PARTIALS: [(&str, &str); 1] = [("nav", include_str!("../templates/nav.hbs"))];

const PAGES: [(&str, &str); 3] = [
    ("home", include_str!("../templates/home.hbs")),
    ("preferences", include_str!("../templates/preferences.hbs")),
    ("digest", include_str!("../templates/digest.hbs")),
];

/// Compiled HTML templates for the UI routes.
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        for (name, source) in PARTIALS {
            registry
                .register_partial(name, source)
                .map_err(|e| Error::Template(format!("{}: {}", name, e)))?;
        }
        for (name, source) in PAGES {
            registry
                .register_template_string(name, source)
                .map_err(|e| Error::Template(format!("{}: {}", name, e)))?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, page: &str, context: &T) -> Result<String> {
        self.registry
            .render(page, context)
            .map_err(|e| Error::Template(format!("{}: {}", page, e)))
    }
}
