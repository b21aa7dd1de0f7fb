use std::cell::RefCell;
use std::rc::Rc;

use stageview::stage::{Direction, NavigationError, StageConfig, StageController};

fn controller(stages: i64) -> StageController {
    StageController::new(StageConfig::from_stage_count(stages).unwrap())
}

#[test]
fn initial_state_is_stage_zero() {
    let controller = controller(2);
    assert_eq!(controller.state().current_stage(), 0);
    assert_eq!(controller.config().max_stage(), 1);
    assert_eq!(controller.config().stage_count(), 2);
}

#[test]
fn empty_stage_count_is_a_configuration_error() {
    assert!(matches!(
        StageConfig::from_stage_count(0),
        Err(NavigationError::Configuration(0))
    ));
    assert!(matches!(
        StageConfig::from_stage_count(-3),
        Err(NavigationError::Configuration(-3))
    ));
}

#[test]
fn moves_stay_within_bounds_for_any_delta_sequence() {
    let mut controller = controller(4);
    for delta in [3, -7, 2, 2, 2, -1, 100, -100, 5, -2] {
        let state = controller.request_move(delta).unwrap();
        assert!(state.current_stage() <= 3, "delta {delta} escaped range");
    }
}

#[test]
fn back_at_stage_zero_is_a_silent_noop() {
    let mut controller = controller(2);
    let notifications = Rc::new(RefCell::new(Vec::new()));
    let sink = notifications.clone();
    controller.subscribe(move |state| sink.borrow_mut().push(state.current_stage()));

    let before = controller.state();
    let after = controller.request_move(-1).unwrap();
    assert_eq!(before, after);
    assert!(notifications.borrow().is_empty());
}

#[test]
fn forward_at_max_stage_is_a_silent_noop() {
    let mut controller = controller(2);
    controller.request_move(1).unwrap();

    let notifications = Rc::new(RefCell::new(Vec::new()));
    let sink = notifications.clone();
    controller.subscribe(move |state| sink.borrow_mut().push(state.current_stage()));

    let after = controller.request_move(1).unwrap();
    assert_eq!(after.current_stage(), 1);
    assert!(notifications.borrow().is_empty());
}

#[test]
fn huge_deltas_clamp_to_the_boundaries() {
    let mut controller = controller(3);
    assert_eq!(controller.request_move(i64::MAX).unwrap().current_stage(), 2);
    assert_eq!(controller.request_move(i64::MIN).unwrap().current_stage(), 0);
}

#[test]
fn zero_delta_is_invalid_input() {
    let mut controller = controller(2);
    assert!(matches!(
        controller.request_move(0),
        Err(NavigationError::InvalidInput(_))
    ));
    assert_eq!(controller.state().current_stage(), 0);
}

#[test]
fn set_clamps_above_max_and_rejects_negative() {
    let mut controller = controller(3);
    assert_eq!(controller.request_set(99).unwrap().current_stage(), 2);
    assert!(matches!(
        controller.request_set(-1),
        Err(NavigationError::InvalidInput(_))
    ));
    // A rejected request leaves the state untouched.
    assert_eq!(controller.state().current_stage(), 2);
}

#[test]
fn subscribers_see_accepted_transitions_in_order() {
    let mut controller = controller(3);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    controller.subscribe(move |state| sink.borrow_mut().push(state.current_stage()));

    controller.request_move(1).unwrap();
    controller.request_move(1).unwrap();
    controller.request_move(-1).unwrap();
    controller.request_set(0).unwrap();
    controller.request_set(0).unwrap(); // no-op, no notification

    assert_eq!(*seen.borrow(), vec![1, 2, 1, 0]);
}

#[test]
fn direction_parse_rejects_non_integer_declarations() {
    for raw in ["abc", "1.5", "", "--", "NaN"] {
        assert!(
            matches!(Direction::parse(raw), Err(NavigationError::InvalidInput(_))),
            "{raw:?} should be rejected"
        );
    }
    assert!(matches!(
        Direction::parse("0"),
        Err(NavigationError::InvalidInput(_))
    ));

    let back = Direction::parse(" -2 ").unwrap();
    assert!(back.goes_back());
    assert_eq!(back.delta(), -2);

    let forward = Direction::parse("3").unwrap();
    assert!(!forward.goes_back());
    assert_eq!(forward.delta(), 3);
}

#[test]
fn direction_new_rejects_zero() {
    assert!(matches!(
        Direction::new(0),
        Err(NavigationError::InvalidInput(_))
    ));
    assert!(Direction::new(-1).unwrap().goes_back());
}
