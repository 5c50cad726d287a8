use std::cell::RefCell;
use std::rc::Rc;

use mtlang::parser::{Grammar, Outcome, State, Tracer};

#[derive(Clone, Default)]
struct Recorder {
    events: Rc<RefCell<Vec<(String, &'static str, Option<Outcome>)>>>,
}

impl Tracer for Recorder {
    fn enter(&self, rule: &'static str, _state: &State) {
        self.events.borrow_mut().push(("enter".to_string(), rule, None));
    }

    fn exit(&self, rule: &'static str, outcome: Outcome, _state: &State) {
        self.events
            .borrow_mut()
            .push(("exit".to_string(), rule, Some(outcome)));
    }
}

#[test]
fn tracer_sees_rules_in_order() {
    let recorder = Recorder::default();
    let (program, _) = Grammar::with_tracer(recorder.clone()).parse("x");
    assert!(program.is_some());

    let events = recorder.events.borrow();
    assert_eq!(events.first(), Some(&("enter".to_string(), "program", None)));
    assert_eq!(
        events.last(),
        Some(&("exit".to_string(), "program", Some(Outcome::Matched)))
    );
    assert!(events.contains(&("exit".to_string(), "identifier", Some(Outcome::Matched))));
    assert!(events.contains(&("exit".to_string(), "number", Some(Outcome::NoMatch))));
}

#[test]
fn tracer_reports_recovered_rules() {
    let recorder = Recorder::default();
    Grammar::with_tracer(recorder.clone()).parse("[1");

    let events = recorder.events.borrow();
    assert!(events.contains(&("exit".to_string(), "array", Some(Outcome::Recovered))));
}

#[test]
fn traced_and_untraced_grammars_agree() {
    let source = "(def f |a b| (cond (= a b) a else b))\n(f 1 2)";
    let traced = Grammar::with_tracer(Recorder::default()).parse(source);
    let plain = Grammar::new().parse(source);
    assert_eq!(traced.0, plain.0);
    assert_eq!(traced.1, plain.1);
}
