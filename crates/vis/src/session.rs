use std::collections::HashMap;
use std::sync::Arc;

use popvis_data::Views;
use tracing::info;

use crate::controller::Outcome;
use crate::controller::ReactiveController;
use crate::id::Id;
use crate::route::ViewResolver;

/// Session-keyed controllers over one shared set of views.
///
/// Each session owns its route state; the views are shared read-only.
#[derive(Debug)]
pub struct Sessions {
    views: Arc<Views>,
    controllers: HashMap<Id, ReactiveController>,
}

impl Sessions {
    pub fn new(views: Arc<Views>) -> Sessions {
        Self {
            views,
            controllers: HashMap::new(),
        }
    }

    /// Opens a session on the default route.
    pub fn open(&mut self) -> (Id, Outcome) {
        let id = Id::next();
        let resolver = ViewResolver::new(Arc::clone(&self.views));
        let (controller, outcome) = ReactiveController::start(resolver);

        self.controllers.insert(id, controller);
        info!(session = %id, "session opened");

        (id, outcome)
    }

    /// Returns `None` if the session does not exist.
    pub fn route_changed(&mut self, session: Id, key: &str) -> Option<Outcome> {
        self.controllers
            .get_mut(&session)
            .map(|controller| controller.route_changed(key))
    }

    /// Returns `None` if the session does not exist.
    pub fn control_changed(&mut self, session: Id, control: &str, value: i32) -> Option<Outcome> {
        self.controllers
            .get_mut(&session)
            .map(|controller| controller.control_changed(control, value))
    }

    pub fn get(&self, session: Id) -> Option<&ReactiveController> {
        self.controllers.get(&session)
    }

    pub fn close(&mut self, session: Id) -> bool {
        let closed = self.controllers.remove(&session).is_some();

        if closed {
            info!(session = %session, "session closed");
        }

        closed
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteKey;
    use popvis_data::Dataset;
    use std::io::Cursor;
    use std::thread;

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

    fn views() -> Arc<Views> {
        let views = Dataset::load(Cursor::new(SOURCE))
            .and_then(|dataset| Ok(dataset.derive_views()?))
            .unwrap();

        Arc::new(views)
    }

    #[test]
    fn sessions_keep_independent_route_state() {
        let mut sessions = Sessions::new(views());
        let (first, _) = sessions.open();
        let (second, _) = sessions.open();

        sessions.route_changed(first, "by-ethnicity");
        sessions.control_changed(first, "year-slider", 2020);

        let first_state = sessions.get(first).unwrap().route_state();
        assert_eq!(first_state.route, Some(RouteKey::ByEthnicity));
        assert_eq!(first_state.values.year, Some(2020));

        let second_state = sessions.get(second).unwrap().route_state();
        assert_eq!(second_state.route, Some(RouteKey::Home));
        assert_eq!(second_state.values.year, None);

        assert!(matches!(
            sessions.control_changed(second, "year-slider", 2020),
            Some(Outcome::Ignored { .. })
        ));
    }

    #[test]
    fn closed_session_receives_no_events() {
        let mut sessions = Sessions::new(views());
        let (id, _) = sessions.open();

        assert!(sessions.close(id));
        assert!(!sessions.close(id));
        assert!(sessions.is_empty());
        assert_eq!(sessions.route_changed(id, "home"), None);
    }

    #[test]
    fn views_are_shared_across_threads() {
        let views = views();

        thread::scope(|scope| {
            for year in [1980, 2020] {
                let views = Arc::clone(&views);

                scope.spawn(move || {
                    let (mut controller, _) = ReactiveController::start(ViewResolver::new(views));
                    controller.route_changed("by-ethnicity");

                    let outcome = controller.control_changed("year-slider", year);
                    assert!(matches!(outcome, Outcome::Rendered(_)));
                    assert_eq!(controller.route_state().values.year, Some(year));
                });
            }
        });
    }
}
