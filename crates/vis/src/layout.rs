use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use popvis_data::Views;
use tracing::info;
use tracing::warn;

use crate::controller::Outcome;
use crate::controller::ReactiveController;
use crate::controller::Rendering;
use crate::error::Result;
use crate::render::Render;
use crate::render::output::OutputFile;
use crate::render::page::Content;
use crate::render::page::Document;
use crate::route::PAGES;
use crate::route::ViewResolver;

/// The dashboard directory is structured as follows:
///
/// ./popvis/index.html
/// ./popvis/by-sex.html
/// ./popvis/by-ethnicity.html
/// ./popvis/404.html
///
/// Every page is a self-contained HTML file; pages with a control embed
/// the chart of each control value.
pub struct VisLayout {
    root_path: PathBuf,
}

impl VisLayout {
    const MAIN_DIR_NAME: &str = "popvis";
    const NOT_FOUND_FILE_NAME: &str = "404.html";

    pub fn init(path: &Path) -> Result<VisLayout> {
        let root_path = path.join(Self::MAIN_DIR_NAME);

        fs::create_dir_all(&root_path)?;

        Ok(Self { root_path })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Renders every page by driving a controller through each route
    /// and, for pages with a control, through each control value.
    pub fn generate_report(&self, views: Arc<Views>) -> Result<()> {
        let period = period(&views);
        let (mut controller, _) = ReactiveController::start(ViewResolver::new(views));

        for page in &PAGES {
            let document = match controller.route_changed(page.key) {
                Outcome::Rendered(rendering) => {
                    let content = Self::content(&mut controller, rendering);
                    Document::new(Some(page.route), period.clone(), content)
                }
                outcome => {
                    warn!(route = %page.route, ?outcome, "page could not be resolved");
                    Document::not_found(period.clone())
                }
            };

            self.write(page.file_name, &document)?;
        }

        self.write(Self::NOT_FOUND_FILE_NAME, &Document::not_found(period))?;
        info!(path = %self.root_path.display(), "dashboard generated");

        Ok(())
    }

    fn content(controller: &mut ReactiveController, rendering: Rendering) -> Content {
        let Some(control) = rendering.controls.first().cloned() else {
            return Content::Charts(rendering.charts);
        };

        let mut variants = Vec::with_capacity(control.domain.len());

        for &value in &control.domain {
            match controller.control_changed(control.id.as_str(), value) {
                Outcome::Rendered(mut rendering) => {
                    if let Some(chart) = rendering.charts.pop() {
                        variants.push((value, chart));
                    }
                }
                outcome => warn!(control = %control.id, value, ?outcome, "control value skipped"),
            }
        }

        Content::Controlled { control, variants }
    }

    fn write(&self, file_name: &str, document: &Document) -> Result<()> {
        let mut output = OutputFile::create(&self.root_path.join(file_name))?;
        document.render(&mut output)?;
        output.finish()?;

        Ok(())
    }
}

/// The "(first - last)" year range of the overall view.
fn period(views: &Views) -> String {
    let years = views.overall.records().iter().map(|r| r.year);

    match (years.clone().min(), years.max()) {
        (Some(first), Some(last)) => format!("({first} - {last})"),
        _ => String::new(),
    }
}
