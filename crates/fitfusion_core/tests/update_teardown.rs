use std::path::PathBuf;
use std::sync::Once;

use fitfusion_core::{update, AppState, Effect, Msg, ObjectUrl, Phase, SelectedFile};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(fit_logging::initialize_for_tests);
}

fn png(name: &str) -> SelectedFile {
    SelectedFile {
        name: name.to_string(),
        size: 64,
        mime: "image/png".to_string(),
        source: PathBuf::from(name),
    }
}

#[test]
fn teardown_cancels_pending_reply_and_ignores_late_delivery() {
    init_logging();
    let (state, _) = update(AppState::new(0), Msg::InputChanged("hey".to_string()));
    let (state, effects) = update(state, Msg::SendClicked { now: 1 });
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(state, Msg::Teardown { now: 2 });
    assert_eq!(effects, vec![Effect::CancelReply { exchange: 1 }]);
    let view = state.view();
    assert_eq!(view.phase, Phase::Idle);
    assert!(!view.is_typing());
    assert_eq!(view.messages.len(), 1);

    let (state, _) = update(
        state,
        Msg::ReplyReady {
            exchange: 1,
            reply: "too late".to_string(),
            now: 3,
        },
    );
    assert_eq!(state.view().messages.len(), 1);

    // The next exchange gets a fresh id.
    let (state, _) = update(state, Msg::InputChanged("hey again".to_string()));
    let (_, effects) = update(state, Msg::SendClicked { now: 4 });
    assert_eq!(
        effects,
        vec![Effect::ScheduleReply {
            exchange: 2,
            prompt: "hey again".to_string(),
        }]
    );
}

#[test]
fn teardown_releases_every_live_url() {
    init_logging();
    let (state, _) = update(AppState::new(0), Msg::FilesSelected(vec![png("a.png")]));
    let (state, _) = update(state, Msg::SendClicked { now: 1 });
    let (state, _) = update(
        state,
        Msg::ReplyReady {
            exchange: 1,
            reply: "nice".to_string(),
            now: 2,
        },
    );
    let (state, _) = update(state, Msg::FilesSelected(vec![png("b.png")]));

    let sent: Vec<ObjectUrl> = state.view().messages[1]
        .media
        .iter()
        .map(|item| item.url.clone())
        .collect();
    let staged: Vec<ObjectUrl> = state
        .view()
        .staged
        .iter()
        .map(|file| file.url.clone())
        .collect();

    let (state, effects) = update(state, Msg::Teardown { now: 3 });
    let mut expected = staged;
    expected.extend(sent);
    assert_eq!(effects, vec![Effect::ReleaseObjectUrls { urls: expected }]);

    let view = state.view();
    assert!(view.staged.is_empty());
    assert!(view.viewer.is_none());
    assert!(!view.open);
}

#[test]
fn idle_teardown_without_media_has_no_effects() {
    init_logging();
    let (_, effects) = update(AppState::new(0), Msg::Teardown { now: 1 });
    assert!(effects.is_empty());
}
