use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::chart::Annotation;
use crate::chart::ChartKind;
use crate::chart::ChartSpec;
use crate::chart::Coordinate;
use crate::chart::Series;
use crate::chart::SeriesStyle;

const TITLE_FONT_SIZE: u32 = 24;
const ANNOTATION_FONT_SIZE: u32 = 12;
const FRAME_DURATION_MS: u32 = 500;
const MAX_MARKER_SIZE: f64 = 40.0;

/// A Plotly figure (`data`, `layout`, `frames`) built from a [`ChartSpec`].
#[derive(Serialize, Debug)]
pub(crate) struct Figure {
    data: Vec<Trace>,
    layout: Layout,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    frames: Vec<PlotlyFrame>,
}

impl From<&ChartSpec> for Figure {
    fn from(spec: &ChartSpec) -> Self {
        let data = spec.series.iter().map(|s| Trace::new(spec.kind, s)).collect();

        let frames: Vec<PlotlyFrame> = spec
            .frames
            .iter()
            .map(|frame| PlotlyFrame {
                name: frame.name.clone(),
                data: frame
                    .series
                    .iter()
                    .map(|s| Trace::new(spec.kind, s))
                    .collect(),
            })
            .collect();

        let mut layout = Layout::new(&spec.title);
        layout.annotations = spec.annotations.iter().map(PlotlyAnnotation::from).collect();

        if !frames.is_empty() {
            let max = spec
                .frames
                .iter()
                .flat_map(|frame| &frame.series)
                .flat_map(|series| &series.points)
                .map(|point| point.y)
                .fold(0.0, f64::max);

            layout.y_axis = Some(Axis {
                range: Some([0.0, max * 1.1]),
            });
            layout.update_menus = vec![play_button()];
            layout.sliders = vec![frame_slider(&frames)];
        }

        Self {
            data,
            layout,
            frames,
        }
    }
}

#[derive(Serialize, Debug)]
struct PlotlyFrame {
    name: String,
    data: Vec<Trace>,
}

#[derive(Serialize, Debug)]
struct Trace {
    #[serde(rename = "type")]
    kind: TraceKind,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<Mode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    x: Vec<Coordinate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    y: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<Coordinate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<f64>,
    #[serde(rename = "textinfo", skip_serializing_if = "Option::is_none")]
    text_info: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<Line>,
}

impl Trace {
    fn new(kind: ChartKind, series: &Series) -> Trace {
        let xs: Vec<Coordinate> = series.points.iter().map(|p| p.x.clone()).collect();
        let ys: Vec<f64> = series.points.iter().map(|p| p.y).collect();

        let mut trace = Self {
            kind: TraceKind::from(kind),
            name: series.name.clone(),
            mode: None,
            x: Vec::new(),
            y: Vec::new(),
            labels: Vec::new(),
            values: Vec::new(),
            text_info: None,
            marker: None,
            line: None,
        };

        match series.style {
            SeriesStyle::Markers => {
                trace.marker = Some(Marker::sized(&ys));
                trace.mode = Some(Mode::Markers);
                trace.x = xs;
                trace.y = ys;
            }
            SeriesStyle::Line => {
                trace.mode = Some(Mode::Lines);
                trace.line = Some(Line { color: "red" });
                trace.x = xs;
                trace.y = ys;
            }
            SeriesStyle::Bars => {
                trace.x = xs;
                trace.y = ys;
            }
            SeriesStyle::Slices => {
                trace.text_info = Some("label+percent");
                trace.labels = xs;
                trace.values = ys;
            }
        }

        trace
    }
}

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum TraceKind {
    Scatter,
    Bar,
    Pie,
}

impl From<ChartKind> for TraceKind {
    fn from(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Scatter => TraceKind::Scatter,
            ChartKind::Bar => TraceKind::Bar,
            ChartKind::Pie => TraceKind::Pie,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum Mode {
    Markers,
    Lines,
}

#[derive(Serialize, Debug)]
struct Marker {
    color: Vec<f64>,
    size: Vec<f64>,
    #[serde(rename = "sizemode")]
    size_mode: &'static str,
    #[serde(rename = "sizeref")]
    size_ref: f64,
    #[serde(rename = "showscale")]
    show_scale: bool,
}

impl Marker {
    /// Markers coloured and sized by value, the largest drawn at [`MAX_MARKER_SIZE`].
    fn sized(values: &[f64]) -> Marker {
        let max = values.iter().copied().fold(0.0, f64::max);
        let size_ref = if max > 0.0 {
            2.0 * max / (MAX_MARKER_SIZE * MAX_MARKER_SIZE)
        } else {
            1.0
        };

        Self {
            color: values.to_vec(),
            size: values.to_vec(),
            size_mode: "area",
            size_ref,
            show_scale: true,
        }
    }
}

#[derive(Serialize, Debug)]
struct Line {
    color: &'static str,
}

#[derive(Serialize, Debug)]
struct Layout {
    title: Title,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<PlotlyAnnotation>,
    #[serde(rename = "yaxis", skip_serializing_if = "Option::is_none")]
    y_axis: Option<Axis>,
    #[serde(rename = "updatemenus", skip_serializing_if = "Vec::is_empty")]
    update_menus: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sliders: Vec<Value>,
}

impl Layout {
    fn new(title: &str) -> Layout {
        Self {
            title: Title {
                text: title.to_owned(),
                x: 0.5,
                font: Font {
                    size: TITLE_FONT_SIZE,
                },
            },
            annotations: Vec::new(),
            y_axis: None,
            update_menus: Vec::new(),
            sliders: Vec::new(),
        }
    }
}

#[derive(Serialize, Debug)]
struct Title {
    text: String,
    x: f64,
    font: Font,
}

#[derive(Serialize, Debug)]
struct Font {
    size: u32,
}

#[derive(Serialize, Debug)]
struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<[f64; 2]>,
}

#[derive(Serialize, Debug)]
struct PlotlyAnnotation {
    x: i32,
    y: f64,
    text: String,
    #[serde(rename = "showarrow")]
    show_arrow: bool,
    #[serde(rename = "arrowhead")]
    arrow_head: u32,
    ax: i32,
    ay: i32,
    #[serde(rename = "bgcolor")]
    background_color: &'static str,
    #[serde(rename = "bordercolor")]
    border_color: &'static str,
    #[serde(rename = "borderwidth")]
    border_width: u32,
    font: Font,
}

impl From<&Annotation> for PlotlyAnnotation {
    fn from(annotation: &Annotation) -> Self {
        Self {
            x: annotation.x,
            y: annotation.y,
            text: annotation.text.clone(),
            show_arrow: true,
            arrow_head: 2,
            ax: 0,
            ay: -40,
            background_color: "rgba(255, 255, 255, 0.8)",
            border_color: "black",
            border_width: 1,
            font: Font {
                size: ANNOTATION_FONT_SIZE,
            },
        }
    }
}

fn play_button() -> Value {
    json!({
        "type": "buttons",
        "buttons": [{
            "label": "Play",
            "method": "animate",
            "args": [null, {
                "frame": { "duration": FRAME_DURATION_MS, "redraw": true },
                "fromcurrent": true
            }]
        }]
    })
}

fn frame_slider(frames: &[PlotlyFrame]) -> Value {
    let steps: Vec<Value> = frames
        .iter()
        .map(|frame| {
            json!({
                "label": frame.name,
                "method": "animate",
                "args": [[frame.name], {
                    "frame": { "duration": FRAME_DURATION_MS, "redraw": true },
                    "mode": "immediate"
                }]
            })
        })
        .collect();

    json!({ "steps": steps })
}
