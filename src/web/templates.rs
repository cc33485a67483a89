//! Template rendering with Tera

use anyhow::Result;
use tera::{Context, Tera};

/// Template renderer
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Create a new template renderer with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        // XML documents escape explicitly with `escape_xml`
        tera.autoescape_on(vec![".html"]);

        // Add base template
        tera.add_raw_template("base.html", include_str!("../templates/base.html"))?;

        // Add page templates
        tera.add_raw_template("home.html", include_str!("../templates/home.html"))?;
        tera.add_raw_template("listings.html", include_str!("../templates/listings.html"))?;
        tera.add_raw_template("listing.html", include_str!("../templates/listing.html"))?;
        tera.add_raw_template("page.html", include_str!("../templates/page.html"))?;
        tera.add_raw_template("admin.html", include_str!("../templates/admin.html"))?;
        tera.add_raw_template(
            "not_found.html",
            include_str!("../templates/not_found.html"),
        )?;

        // Add XML documents
        tera.add_raw_template("sitemap.xml", include_str!("../templates/sitemap.xml"))?;

        Ok(Self { tera })
    }

    /// Render a template with a Tera Context
    pub fn render_with_context(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }
}
