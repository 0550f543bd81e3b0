use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::chart::ChartSpec;
use crate::id::Id;
use crate::render::OutputStream;
use crate::render::Render;
use crate::render::error::RenderError;
use crate::render::plotly::Figure;
use crate::route::Control;
use crate::route::PAGES;
use crate::route::RouteKey;

const PAGE_TEMPLATE: &str = "page";
const HEADING: &str = "The Population of Malaysia";

/// A complete dashboard page: the navigation shell around the page content.
#[derive(Debug)]
pub struct Document {
    active: Option<RouteKey>,
    period: String,
    content: Content,
}

#[derive(Debug)]
pub enum Content {
    Charts(Vec<ChartSpec>),

    /// A chart bound to a control, with one pre-computed chart per control value.
    Controlled {
        control: Control,
        variants: Vec<(i32, ChartSpec)>,
    },

    NotFound,
}

impl Document {
    pub fn new(active: Option<RouteKey>, period: String, content: Content) -> Document {
        Self {
            active,
            period,
            content,
        }
    }

    pub fn not_found(period: String) -> Document {
        Self::new(None, period, Content::NotFound)
    }
}

#[derive(Serialize)]
struct Context<'a> {
    heading: &'a str,
    period: &'a str,
    nav: Vec<NavLink>,
    missing: bool,
    content: String,
}

#[derive(Serialize)]
struct NavLink {
    label: &'static str,
    href: &'static str,
    active: bool,
}

impl Render for Document {
    fn render<O>(&self, output: &mut O) -> Result<(), RenderError>
    where
        O: OutputStream,
    {
        let mut content = String::new();

        match &self.content {
            Content::Charts(charts) => {
                for spec in charts {
                    ChartElement::new(spec).render(&mut content)?;
                }
            }
            Content::Controlled { control, variants } => {
                ControlledChart::new(control, variants).render(&mut content)?;
            }
            Content::NotFound => {}
        }

        let nav = PAGES
            .iter()
            .map(|page| NavLink {
                label: page.nav_label,
                href: page.file_name,
                active: self.active == Some(page.route),
            })
            .collect();

        let context = Context {
            heading: HEADING,
            period: &self.period,
            nav,
            missing: matches!(self.content, Content::NotFound),
            content,
        };

        let mut template = TinyTemplate::new();
        template.add_formatter("raw", tinytemplate::format_unescaped);
        template.add_template(PAGE_TEMPLATE, include_str!("./template/page.html.tt"))?;

        let text = template.render(PAGE_TEMPLATE, &context)?;
        output.write(&text)
    }
}

struct ChartElement<'a> {
    id: Id,
    spec: &'a ChartSpec,
}

impl<'a> ChartElement<'a> {
    fn new(spec: &'a ChartSpec) -> ChartElement<'a> {
        Self { id: Id::next(), spec }
    }
}

impl Render for ChartElement<'_> {
    fn render<O>(&self, output: &mut O) -> Result<(), RenderError>
    where
        O: OutputStream,
    {
        let id = self.id;
        let figure = script_json(&Figure::from(self.spec))?;

        output.write(&format!(
            r#"
                <div>
                    <div id="chart-{id}"></div>
                    <script>
                        Plotly.newPlot("chart-{id}", {figure});
                    </script>
                </div>
            "#,
        ))
    }
}

struct ControlledChart<'a> {
    id: Id,
    control: &'a Control,
    variants: &'a [(i32, ChartSpec)],
}

impl<'a> ControlledChart<'a> {
    fn new(control: &'a Control, variants: &'a [(i32, ChartSpec)]) -> ControlledChart<'a> {
        Self {
            id: Id::next(),
            control,
            variants,
        }
    }
}

impl Render for ControlledChart<'_> {
    fn render<O>(&self, output: &mut O) -> Result<(), RenderError>
    where
        O: OutputStream,
    {
        let id = self.id;
        let control = self.control.id;
        let values: Vec<i32> = self.variants.iter().map(|(value, _)| *value).collect();
        let figures: Vec<Figure> = self
            .variants
            .iter()
            .map(|(_, spec)| Figure::from(spec))
            .collect();

        let default = self.control.default;
        let selected = values.iter().position(|v| *v == default).unwrap_or_default();
        let max = values.len().saturating_sub(1);

        let values = script_json(&values)?;
        let figures = script_json(&figures)?;

        output.write(&format!(
            r#"
                <div>
                    <div id="chart-{id}"></div>
                    <div>
                        <label for="{control}-{id}">Year</label>
                        <input id="{control}-{id}" type="range" min="0" max="{max}" step="1" value="{selected}" />
                        <span id="{control}-{id}-value">{default}</span>
                    </div>
                    <script>
                        (function () {{
                            const figures = {figures};
                            const values = {values};
                            const input = document.getElementById("{control}-{id}");
                            const label = document.getElementById("{control}-{id}-value");
                            Plotly.newPlot("chart-{id}", figures[input.value]);
                            input.addEventListener("input", function () {{
                                label.textContent = values[input.value];
                                Plotly.react("chart-{id}", figures[input.value]);
                            }});
                        }})();
                    </script>
                </div>
            "#,
        ))
    }
}

/// Serializes `value` for embedding inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String, RenderError> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartId;
    use crate::chart::ChartKind;
    use crate::route::ControlId;
    use crate::route::ControlKind;

    fn pie(title: &str) -> ChartSpec {
        ChartSpec {
            id: ChartId::EthnicityShares,
            kind: ChartKind::Pie,
            title: title.to_owned(),
            series: Vec::new(),
            annotations: Vec::new(),
            frames: Vec::new(),
        }
    }

    #[test]
    fn render_navigation_with_active_page() -> Result<(), RenderError> {
        let document = Document::new(
            Some(RouteKey::BySex),
            String::from("(1980 - 2024)"),
            Content::Charts(vec![pie("bars")]),
        );

        let mut output = String::new();
        document.render(&mut output)?;

        assert!(output.contains("<h1>The Population of Malaysia</h1>"));
        assert!(output.contains("<h1>(1980 - 2024)</h1>"));
        assert!(output.contains(r#"<a href="by-sex.html" class="active">By Sex</a>"#));
        assert!(output.contains(r#"<a href="index.html">Home Page</a>"#));
        assert!(output.contains("Plotly.newPlot"));
        assert!(!output.contains("Page Not Found"));

        Ok(())
    }

    #[test]
    fn render_controlled_chart_variants() -> Result<(), RenderError> {
        let control = Control {
            id: ControlId::YearSlider,
            kind: ControlKind::Slider,
            domain: vec![1980, 1990],
            default: 1980,
        };
        let document = Document::new(
            Some(RouteKey::ByEthnicity),
            String::from("(1980 - 1990)"),
            Content::Controlled {
                control,
                variants: vec![(1980, pie("in 1980")), (1990, pie("in 1990"))],
            },
        );

        let mut output = String::new();
        document.render(&mut output)?;

        assert!(output.contains(r#"type="range" min="0" max="1" step="1" value="0""#));
        assert!(output.contains("const values = [1980,1990];"));
        assert!(output.contains(r#""text":"in 1990""#));

        Ok(())
    }

    #[test]
    fn render_not_found_without_details() -> Result<(), RenderError> {
        let mut output = String::new();
        Document::not_found(String::from("(1980 - 2024)")).render(&mut output)?;

        assert!(output.contains("404 - Page Not Found"));
        assert!(!output.contains("Plotly.newPlot"));
        assert!(!output.contains("class=\"active\""));

        Ok(())
    }

    #[test]
    fn escape_closing_tags_in_scripts() -> Result<(), RenderError> {
        let json = script_json(&"</script><script>")?;

        assert_eq!(json, r#""<\/script><script>""#);

        Ok(())
    }
}
