use handlebars::{Handlebars, TemplateError};
use std::path::Path;
use std::sync::Arc;

pub type Hbs = Arc<Handlebars<'static>>;

/// Everything a controller renders by name.
const TEMPLATES: &[&str] = &[
    "layouts/base",
    "pages/login",
    "pages/not_found",
    // module bodies
    "modules/charts",
    "modules/watchlist",
    "modules/alerts",
    "modules/screener",
    "modules/sharing",
    // htmx fragments
    "partials/ticker",
    "partials/countdown",
    "partials/sidebar",
    "partials/login_ticker",
    "partials/chart_panel",
    "partials/watchlist_rows",
    "partials/watchlist_search",
    "partials/alerts_list",
    "partials/screener_results",
    "partials/sharing_panel",
];

/// Pulled into the layout with `{{> name}}`.
const PARTIALS: &[(&str, &str)] = &[
    ("ticker", "partials/ticker"),
    ("countdown", "partials/countdown"),
    ("sidebar", "partials/sidebar"),
    ("disclaimer", "partials/disclaimer"),
];

pub fn build_handlebars(dir: &str) -> Result<Hbs, TemplateError> {
    let mut hb = Handlebars::new();
    hb.set_strict_mode(false);

    let root = Path::new(dir);

    for name in TEMPLATES {
        hb.register_template_file(name, root.join(format!("{name}.hbs")))?;
    }

    for (partial, file) in PARTIALS {
        let path = root.join(format!("{file}.hbs"));
        let source = std::fs::read_to_string(&path)
            .map_err(|e| TemplateError::from((e, path.display().to_string())))?;
        hb.register_partial(partial, source)?;
    }

    Ok(Arc::new(hb))
}
