use std::sync::Once;

use fitfusion_core::responder::WORKOUT_REPLIES;
use fitfusion_core::{update, AppState, Effect, Msg, Phase, Responder, Sender};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(fit_logging::initialize_for_tests);
}

fn type_and_send(state: AppState, text: &str, now: i64) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(text.to_string()));
    update(state, Msg::SendClicked { now })
}

fn scheduled(effects: &[Effect]) -> (u64, String) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleReply { exchange, prompt } => Some((*exchange, prompt.clone())),
            _ => None,
        })
        .expect("schedule effect")
}

#[test]
fn toggle_only_changes_visibility() {
    init_logging();
    let state = AppState::new(0);
    let before = state.view();

    let (mut state, effects) = update(state, Msg::WidgetToggled);
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    assert!(view.open);
    assert_eq!(view.messages, before.messages);

    let (state, _) = update(state, Msg::WidgetToggled);
    assert!(!state.view().open);
    let (state, _) = update(state, Msg::WidgetClosed);
    assert!(!state.view().open);
}

#[test]
fn blank_send_is_noop() {
    init_logging();
    let (state, _) = update(AppState::new(0), Msg::WidgetToggled);
    let before = state.view().messages.len();

    let (mut state, effects) = type_and_send(state, "   \t\n", 10);

    assert!(effects.is_empty());
    assert_eq!(state.view().messages.len(), before);
    assert_eq!(state.view().phase, Phase::Idle);

    // The toggle and the input edit were visible; the sends were not.
    assert!(state.consume_dirty());
    let (mut state, effects) = update(state, Msg::SendClicked { now: 11 });
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn send_appends_user_message_and_single_placeholder() {
    init_logging();
    let state = AppState::new(0);
    let before = state.view().messages.len();

    let (state, effects) = type_and_send(state, "  Best exercise for legs?  ", 100);
    let view = state.view();

    assert_eq!(view.messages.len(), before + 2);
    let user = &view.messages[before];
    assert_eq!(user.sender, Sender::User);
    assert_eq!(user.content, "Best exercise for legs?");
    assert_eq!(user.timestamp, 100);
    assert!(view.is_typing());
    assert_eq!(view.messages.iter().filter(|m| m.is_typing).count(), 1);

    assert_eq!(view.input, "");
    assert!(!view.input_enabled);
    assert!(!view.can_send);
    assert_eq!(
        effects,
        vec![Effect::ScheduleReply {
            exchange: 1,
            prompt: "Best exercise for legs?".to_string(),
        }]
    );
}

#[test]
fn reply_replaces_placeholder() {
    init_logging();
    let state = AppState::new(0);
    let before = state.view().messages.len();

    let (state, effects) = type_and_send(state, "I feel sore", 100);
    let (exchange, _) = scheduled(&effects);
    let (state, effects) = update(
        state,
        Msg::ReplyReady {
            exchange,
            reply: "Rest up".to_string(),
            now: 1_200,
        },
    );
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.messages.len(), before + 2);
    assert!(!view.is_typing());
    let reply = view.messages.last().unwrap();
    assert_eq!(reply.sender, Sender::Assistant);
    assert_eq!(reply.content, "Rest up");
    assert_eq!(reply.timestamp, 1_200);
    assert_eq!(view.phase, Phase::Idle);
    assert!(view.input_enabled);
}

#[test]
fn input_is_locked_while_awaiting() {
    init_logging();
    let (state, effects) = type_and_send(AppState::new(0), "hello", 1);
    assert_eq!(effects.len(), 1);
    let len = state.view().messages.len();

    let (state, effects) = type_and_send(state, "second", 2);
    assert!(effects.is_empty());
    assert_eq!(state.view().messages.len(), len);
    assert_eq!(state.view().input, "");

    let (state, effects) = update(state, Msg::SuggestionClicked { index: 0, now: 3 });
    assert!(effects.is_empty());
    assert_eq!(state.view().messages.len(), len);
}

#[test]
fn stale_reply_is_ignored() {
    init_logging();
    let (state, effects) = type_and_send(AppState::new(0), "hello", 1);
    let (exchange, _) = scheduled(&effects);

    let (state, _) = update(
        state,
        Msg::ReplyReady {
            exchange: exchange + 1,
            reply: "wrong".to_string(),
            now: 2,
        },
    );
    assert!(state.view().is_typing());
    assert_eq!(state.view().phase, Phase::AwaitingResponse { exchange });

    let (state, _) = update(
        state,
        Msg::ReplyReady {
            exchange,
            reply: "right".to_string(),
            now: 3,
        },
    );
    // A duplicate delivery must not append a second reply.
    let len = state.view().messages.len();
    let (state, _) = update(
        state,
        Msg::ReplyReady {
            exchange,
            reply: "again".to_string(),
            now: 4,
        },
    );
    assert_eq!(state.view().messages.len(), len);
    assert_eq!(state.view().messages.last().unwrap().content, "right");
}

#[test]
fn suggestion_sends_question_and_hides_suggestions() {
    init_logging();
    let state = AppState::new(0);
    assert_eq!(state.view().suggestions.len(), 4);

    let (state, effects) = update(state, Msg::SuggestionClicked { index: 0, now: 5 });
    let (_, prompt) = scheduled(&effects);
    assert_eq!(prompt, "How often should I workout?");
    assert!(state.view().suggestions.is_empty());

    let (_, effects) = update(AppState::new(0), Msg::SuggestionClicked { index: 99, now: 5 });
    assert!(effects.is_empty());
}

#[test]
fn workout_question_round_trip() {
    init_logging();
    let responder = Responder::default();
    let mut rng = StdRng::seed_from_u64(1);

    let (state, _) = update(AppState::new(0), Msg::WidgetToggled);
    assert_eq!(state.view().messages.len(), 1);

    let (state, effects) = type_and_send(state, "How often should I workout?", 1_000);
    let (exchange, prompt) = scheduled(&effects);
    let reply = responder.respond(&prompt, &mut rng).to_string();
    let (state, _) = update(
        state,
        Msg::ReplyReady {
            exchange,
            reply,
            now: 2_800,
        },
    );

    let view = state.view();
    assert_eq!(view.messages.len(), 3);
    assert_eq!(view.messages[0].sender, Sender::Assistant);
    assert_eq!(view.messages[1].content, "How often should I workout?");
    assert!(WORKOUT_REPLIES.contains(&view.messages[2].content.as_str()));
    assert!(view.input_enabled);
    assert!(view.staged.is_empty());
}
