use crate::component::LifecyclePhase::{self, *};

#[test]
fn test_startup_path_is_allowed() {
    let path = [Uninitialized, Initializing, Rendering, Ready, Active];
    for pair in path.windows(2) {
        assert!(pair[0].can_transition_to(pair[1]), "{:?} -> {:?} should be allowed", pair[0], pair[1]);
    }
}

#[test]
fn test_update_loop_and_teardown() {
    assert!(Active.can_transition_to(Rendering));
    assert!(Rendering.can_transition_to(Active));
    assert!(Active.can_transition_to(Destroyed));
}

#[test]
fn test_deferred_path() {
    assert!(Initializing.can_transition_to(InitializedDataOnly));
    assert!(InitializedDataOnly.can_transition_to(Rendering));
    assert!(InitializedDataOnly.can_transition_to(Destroyed));
    assert!(!InitializedDataOnly.can_transition_to(Active));
}

#[test]
fn test_terminal_phases_go_nowhere() {
    let all = [
        Uninitialized,
        Initializing,
        Rendering,
        Ready,
        Active,
        InitializedDataOnly,
        Failed,
        Destroyed,
    ];
    for terminal in [Failed, Destroyed] {
        assert!(terminal.is_terminal());
        for next in all {
            assert!(!terminal.can_transition_to(next), "{:?} -> {:?} must be rejected", terminal, next);
        }
    }
}

#[test]
fn test_skipping_phases_is_rejected() {
    assert!(!Uninitialized.can_transition_to(Active));
    assert!(!Uninitialized.can_transition_to(Rendering));
    assert!(!Ready.can_transition_to(Destroyed));
    assert!(!LifecyclePhase::Initializing.can_transition_to(Active));
}

#[test]
fn test_is_attached() {
    assert!(Active.is_attached());
    assert!(!InitializedDataOnly.is_attached());
    assert!(!Uninitialized.is_attached());
}
