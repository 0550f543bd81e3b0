//! The per-session state machine that recomputes charts on route and
//! control changes.
//!
//! ```text
//! Idle | AwaitingControl --route_changed--> Resolving --> AwaitingControl (page has controls)
//!                                                     \-> Idle            (no controls, not found)
//! AwaitingControl --control_changed--> Resolving --> AwaitingControl
//! ```
//!
//! Every event is handled to completion before the call returns, so
//! `Resolving` is only observable from within a transition.

use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::chart::ChartSpec;
use crate::route::Control;
use crate::route::ControlId;
use crate::route::ControlValues;
use crate::route::Resolution;
use crate::route::RouteKey;
use crate::route::ViewResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum State {
    Idle,
    Resolving,
    AwaitingControl,
}

/// The active route of a session and the values of its controls.
///
/// `route` is `None` while a "not found" page is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteState {
    pub route: Option<RouteKey>,
    pub values: ControlValues,
}

/// The charts and controls emitted to the rendering boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendering {
    pub route: RouteKey,
    pub charts: Vec<ChartSpec>,
    pub controls: Vec<Control>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    /// New chart(s) to draw.
    Rendered(Rendering),

    /// The route is unknown; the boundary shows a neutral "not found" page.
    NotFound,

    /// The event does not apply to the active page; nothing was recomputed.
    Ignored { reason: IgnoreReason },

    /// The value is outside the control's domain; the previous charts stand.
    Rejected { reason: RejectReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum IgnoreReason {
    InactiveRoute { control: String },
    UnknownControl { control: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RejectReason {
    OutsideDomain { control: ControlId, value: i32 },
}

#[derive(Debug)]
pub struct ReactiveController {
    resolver: ViewResolver,
    state: State,
    route_state: RouteState,
    current: Option<Rendering>,
}

impl ReactiveController {
    /// Creates a controller and resolves the default route.
    pub fn start(resolver: ViewResolver) -> (ReactiveController, Outcome) {
        let mut controller = Self {
            resolver,
            state: State::Resolving,
            route_state: RouteState {
                route: Some(RouteKey::DEFAULT),
                values: ControlValues::default(),
            },
            current: None,
        };

        let outcome = controller.resolve(RouteKey::DEFAULT.as_str());
        (controller, outcome)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn route_state(&self) -> &RouteState {
        &self.route_state
    }

    /// The charts currently shown, if the active route is a known page.
    pub fn current(&self) -> Option<&Rendering> {
        self.current.as_ref()
    }

    /// Navigates to `key`, resetting the page's controls to their defaults.
    pub fn route_changed(&mut self, key: &str) -> Outcome {
        self.state = State::Resolving;
        self.resolve(key)
    }

    /// Applies a control value and recomputes the charts of the active page only.
    pub fn control_changed(&mut self, control: &str, value: i32) -> Outcome {
        let Some(id) = ControlId::parse(control) else {
            debug!(control, "ignoring unknown control");
            return Outcome::Ignored {
                reason: IgnoreReason::UnknownControl {
                    control: control.to_owned(),
                },
            };
        };

        let active = match (self.state, self.route_state.route) {
            (State::AwaitingControl, Some(route)) if route.page().controls.contains(&id) => route,
            _ => {
                debug!(control, route = ?self.route_state.route, "ignoring control of an inactive route");
                return Outcome::Ignored {
                    reason: IgnoreReason::InactiveRoute {
                        control: control.to_owned(),
                    },
                };
            }
        };

        let in_domain = self
            .current
            .as_ref()
            .and_then(|rendering| rendering.controls.iter().find(|c| c.id == id))
            .is_some_and(|c| c.accepts(value));

        if !in_domain {
            debug!(control, value, "rejecting control value outside its domain");
            return Outcome::Rejected {
                reason: RejectReason::OutsideDomain { control: id, value },
            };
        }

        self.state = State::Resolving;

        let mut values = self.route_state.values;
        values.set(id, value);

        match self.resolver.chart(active, &values) {
            Ok(chart) => {
                self.route_state.values = values;
                self.state = State::AwaitingControl;

                let controls = match self.current.as_mut() {
                    Some(current) => {
                        replace_chart(&mut current.charts, chart.clone());
                        current.controls.clone()
                    }
                    None => self.resolver.controls(active),
                };

                Outcome::Rendered(Rendering {
                    route: active,
                    charts: vec![chart],
                    controls,
                })
            }
            Err(error) => {
                warn!(%error, control, "control value has no data");
                self.state = State::AwaitingControl;

                Outcome::Rejected {
                    reason: RejectReason::OutsideDomain { control: id, value },
                }
            }
        }
    }

    fn resolve(&mut self, key: &str) -> Outcome {
        let route = match self.resolver.resolve(key) {
            Resolution::Page(route) => route,
            Resolution::NotFound => {
                debug!(key, "route not found");
                return self.not_found();
            }
        };

        let values = self.resolver.defaults(route);
        let controls = self.resolver.controls(route);

        let chart = match self.resolver.chart(route, &values) {
            Ok(chart) => chart,
            Err(error) => {
                warn!(%error, %route, "page has no data for its default controls");
                return self.not_found();
            }
        };

        self.state = if controls.is_empty() {
            State::Idle
        } else {
            State::AwaitingControl
        };
        self.route_state = RouteState {
            route: Some(route),
            values,
        };

        let rendering = Rendering {
            route,
            charts: vec![chart],
            controls,
        };
        self.current = Some(rendering.clone());

        debug!(%route, state = ?self.state, "route resolved");
        Outcome::Rendered(rendering)
    }

    fn not_found(&mut self) -> Outcome {
        self.state = State::Idle;
        self.route_state = RouteState {
            route: None,
            values: ControlValues::default(),
        };
        self.current = None;

        Outcome::NotFound
    }
}

fn replace_chart(charts: &mut [ChartSpec], chart: ChartSpec) {
    if let Some(existing) = charts.iter_mut().find(|c| c.id == chart.id) {
        *existing = chart;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartId;
    use popvis_data::Dataset;
    use std::io::Cursor;
    use std::sync::Arc;

    const SOURCE: &str = "year,sex,ethnicity,population
1980,both,overall,13000000
1980,male,overall,6600000
1980,female,overall,6400000
1980,both,chinese,4300000
1980,both,indian,1100000
2020,both,overall,32000000
2020,male,overall,16500000
2020,female,overall,15500000
2020,both,chinese,7000000
2020,both,indian,2000000
";

    fn controller() -> (ReactiveController, Outcome) {
        let views = Dataset::load(Cursor::new(SOURCE))
            .and_then(|dataset| Ok(dataset.derive_views()?))
            .unwrap();

        ReactiveController::start(ViewResolver::new(Arc::new(views)))
    }

    fn rendered(outcome: Outcome) -> Rendering {
        match outcome {
            Outcome::Rendered(rendering) => rendering,
            other => panic!("expected a rendering, got {other:?}"),
        }
    }

    #[test]
    fn start_on_home_page() {
        let (controller, outcome) = controller();
        let rendering = rendered(outcome);

        assert_eq!(rendering.route, RouteKey::Home);
        assert_eq!(rendering.charts[0].id, ChartId::Trend);
        assert_eq!(rendering.charts[0].annotations[0].x, 2020);
        assert_eq!(rendering.charts[0].annotations[0].y, 32000000.0);
        assert!(rendering.controls.is_empty());
        assert_eq!(controller.state(), State::Idle);
    }

    #[test]
    fn navigate_to_page_with_control() {
        let (mut controller, _) = controller();
        let rendering = rendered(controller.route_changed("by-ethnicity"));

        assert_eq!(rendering.controls[0].domain, vec![1980, 2020]);
        assert_eq!(rendering.controls[0].default, 1980);
        assert_eq!(controller.state(), State::AwaitingControl);
        assert_eq!(controller.route_state().values.year, Some(1980));
    }

    #[test]
    fn control_recomputes_active_chart() {
        let (mut controller, _) = controller();
        controller.route_changed("by-ethnicity");

        let rendering = rendered(controller.control_changed("year-slider", 2020));

        assert_eq!(rendering.charts.len(), 1);
        assert_eq!(
            rendering.charts[0].title,
            "Population Distribution by Ethnicity in 2020"
        );
        assert_eq!(controller.route_state().values.year, Some(2020));
        assert_eq!(controller.current().unwrap().charts, rendering.charts);
        assert_eq!(controller.state(), State::AwaitingControl);
    }

    #[test]
    fn reject_value_outside_domain() {
        let (mut controller, _) = controller();
        controller.route_changed("by-ethnicity");
        let before = controller.current().cloned();

        let outcome = controller.control_changed("year-slider", 1999);

        assert_eq!(
            outcome,
            Outcome::Rejected {
                reason: RejectReason::OutsideDomain {
                    control: ControlId::YearSlider,
                    value: 1999
                }
            }
        );
        assert_eq!(controller.current().cloned(), before);
        assert_eq!(controller.route_state().values.year, Some(1980));
        assert_eq!(controller.state(), State::AwaitingControl);
    }

    #[test]
    fn ignore_control_on_inactive_route() {
        let (mut controller, _) = controller();
        let before = controller.current().cloned();

        let outcome = controller.control_changed("year-slider", 2020);

        assert_eq!(
            outcome,
            Outcome::Ignored {
                reason: IgnoreReason::InactiveRoute {
                    control: String::from("year-slider")
                }
            }
        );
        assert_eq!(controller.current().cloned(), before);
        assert_eq!(controller.state(), State::Idle);
    }

    #[test]
    fn ignore_unknown_control() {
        let (mut controller, _) = controller();
        controller.route_changed("by-ethnicity");

        let outcome = controller.control_changed("age-slider", 2020);

        assert!(matches!(
            outcome,
            Outcome::Ignored {
                reason: IgnoreReason::UnknownControl { .. }
            }
        ));
    }

    #[test]
    fn navigation_resets_controls() {
        let (mut controller, _) = controller();
        controller.route_changed("by-ethnicity");
        controller.control_changed("year-slider", 2020);
        controller.route_changed("by-sex");

        assert_eq!(controller.route_state().values, ControlValues::default());
        assert_eq!(controller.state(), State::Idle);

        let rendering = rendered(controller.route_changed("by-ethnicity"));
        assert_eq!(
            rendering.charts[0].title,
            "Population Distribution by Ethnicity in 1980"
        );
    }

    #[test]
    fn unknown_route_is_not_found() {
        let (mut controller, _) = controller();
        controller.route_changed("by-ethnicity");

        assert_eq!(controller.route_changed("/page-3"), Outcome::NotFound);
        assert_eq!(controller.current(), None);
        assert_eq!(controller.route_state().route, None);
        assert_eq!(controller.state(), State::Idle);

        assert!(matches!(
            controller.control_changed("year-slider", 2020),
            Outcome::Ignored { .. }
        ));
    }

    #[test]
    fn serialize_outcomes() -> Result<(), serde_json::Error> {
        let not_found = serde_json::to_string(&Outcome::NotFound)?;
        let rejected = serde_json::to_string(&Outcome::Rejected {
            reason: RejectReason::OutsideDomain {
                control: ControlId::YearSlider,
                value: 1999,
            },
        })?;

        assert_eq!(not_found, r#"{"outcome":"not-found"}"#);
        assert_eq!(
            rejected,
            r#"{"outcome":"rejected","reason":{"kind":"outside-domain","control":"year-slider","value":1999}}"#
        );

        Ok(())
    }
}
