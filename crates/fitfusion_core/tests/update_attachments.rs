use std::path::PathBuf;

use fitfusion_core::{
    update, AppState, Effect, MediaKind, Msg, NotificationLevel, ObjectUrl, SelectedFile, Sender,
    MAX_ATTACHMENT_BYTES,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    fit_logging::initialize_for_tests();
}

fn file(name: &str, size: u64, mime: &str) -> SelectedFile {
    SelectedFile {
        name: name.to_string(),
        size,
        mime: mime.to_string(),
        source: PathBuf::from("/tmp").join(name),
    }
}

fn notifications(effects: &[Effect]) -> Vec<NotificationLevel> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Notify(notification) => Some(notification.level),
            _ => None,
        })
        .collect()
}

fn released(effects: &[Effect]) -> Vec<ObjectUrl> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::ReleaseObjectUrls { urls } => Some(urls.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

fn stage(state: AppState, files: Vec<SelectedFile>) -> (AppState, Vec<Effect>) {
    update(state, Msg::FilesSelected(files))
}

#[test]
fn selection_stages_files_and_acquires_urls() {
    init_logging();
    let (state, effects) = stage(
        AppState::new(0),
        vec![
            file("squat.jpg", 2_000, "image/jpeg"),
            file("plan.pdf", 3_000, "application/pdf"),
        ],
    );

    let view = state.view();
    assert_eq!(view.staged.len(), 2);
    assert_eq!(view.staged[0].kind, MediaKind::Image);
    assert_eq!(view.staged[1].kind, MediaKind::Document);
    assert!(view.can_send);

    assert_eq!(
        effects[..2].to_vec(),
        vec![
            Effect::AcquireObjectUrl {
                url: view.staged[0].url.clone(),
                source: PathBuf::from("/tmp/squat.jpg"),
            },
            Effect::AcquireObjectUrl {
                url: view.staged[1].url.clone(),
                source: PathBuf::from("/tmp/plan.pdf"),
            },
        ]
    );
    assert_eq!(notifications(&effects), vec![NotificationLevel::Info]);
}

#[test]
fn oversized_file_rejects_whole_batch() {
    init_logging();
    let (state, _) = stage(AppState::new(0), vec![file("a.png", 10, "image/png")]);
    let before = state.view().staged;

    let (mut state, effects) = stage(
        state,
        vec![
            file("b.png", 10, "image/png"),
            file("huge.mov", MAX_ATTACHMENT_BYTES + 1, "video/quicktime"),
        ],
    );

    assert_eq!(state.view().staged, before);
    assert_eq!(notifications(&effects), vec![NotificationLevel::Error]);
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::AcquireObjectUrl { .. })));
    assert!(state.consume_dirty());
    let (mut state, _) = stage(
        state,
        vec![file("huge.mov", MAX_ATTACHMENT_BYTES + 1, "video/quicktime")],
    );
    assert!(!state.consume_dirty());
}

#[test]
fn removing_staged_file_releases_its_url() {
    init_logging();
    let (state, _) = stage(
        AppState::new(0),
        vec![file("a.png", 10, "image/png"), file("b.png", 10, "image/png")],
    );
    let first = state.view().staged[0].clone();

    let (state, effects) = update(state, Msg::StagedFileRemoved(first.id));
    assert_eq!(released(&effects), vec![first.url]);
    assert_eq!(state.view().staged.len(), 1);

    let (_, effects) = update(state, Msg::StagedFileRemoved(first.id));
    assert!(effects.is_empty());
}

#[test]
fn media_only_send_routes_by_attachment_kind() {
    init_logging();
    let (state, _) = stage(AppState::new(0), vec![file("me.png", 10, "image/png")]);
    let before = state.view().messages.len();

    let (state, effects) = update(state, Msg::SendClicked { now: 9 });
    let view = state.view();

    assert_eq!(
        effects,
        vec![Effect::ScheduleReply {
            exchange: 1,
            prompt: "image".to_string(),
        }]
    );
    assert!(view.staged.is_empty());
    let user = &view.messages[before];
    assert_eq!(user.sender, Sender::User);
    assert_eq!(user.content, "");
    assert_eq!(user.media.len(), 1);
    assert_eq!(user.media[0].name, "me.png");

    let (state, _) = stage(AppState::new(0), vec![file("log.csv", 10, "text/csv")]);
    let (_, effects) = update(state, Msg::SendClicked { now: 9 });
    assert_eq!(
        effects,
        vec![Effect::ScheduleReply {
            exchange: 1,
            prompt: "file".to_string(),
        }]
    );
}

#[test]
fn attachments_keep_round_trip_length() {
    init_logging();
    let (state, _) = stage(AppState::new(0), vec![file("a.png", 10, "image/png")]);
    let before = state.view().messages.len();
    let (state, _) = update(state, Msg::InputChanged("look at my form".to_string()));
    let (state, _) = update(state, Msg::SendClicked { now: 1 });
    let (state, _) = update(
        state,
        Msg::ReplyReady {
            exchange: 1,
            reply: "nice".to_string(),
            now: 2,
        },
    );
    assert_eq!(state.view().messages.len(), before + 2);
}

#[test]
fn image_click_opens_viewer_document_click_does_not() {
    init_logging();
    let (state, _) = stage(
        AppState::new(0),
        vec![file("a.png", 10, "image/png"), file("b.pdf", 10, "application/pdf")],
    );
    let (state, _) = update(state, Msg::SendClicked { now: 1 });
    let message = state.view().messages[1].clone();
    let image = message.media[0].clone();
    let document = message.media[1].clone();

    let (state, effects) = update(
        state,
        Msg::AttachmentClicked {
            message: message.id,
            media: document.id,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().viewer, None);

    let (state, _) = update(
        state,
        Msg::AttachmentClicked {
            message: message.id,
            media: image.id,
        },
    );
    assert_eq!(state.view().viewer, Some(image));

    let (state, _) = update(state, Msg::ViewerClosed);
    assert_eq!(state.view().viewer, None);
}

#[test]
fn download_emits_effect_for_known_media_only() {
    init_logging();
    let (state, _) = stage(AppState::new(0), vec![file("plan.pdf", 10, "application/pdf")]);
    let (state, _) = update(state, Msg::SendClicked { now: 1 });
    let message = state.view().messages[1].clone();
    let media = message.media[0].clone();

    let (state, effects) = update(
        state,
        Msg::DownloadClicked {
            message: message.id,
            media: media.id,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Download {
            url: media.url.clone(),
            file_name: "plan.pdf".to_string(),
        }]
    );

    let (_, effects) = update(
        state,
        Msg::DownloadClicked {
            message: message.id,
            media: media.id + 100,
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn failed_acquire_drops_the_staged_file() {
    init_logging();
    let (state, _) = stage(AppState::new(0), vec![file("gone.png", 10, "image/png")]);
    let url = state.view().staged[0].url.clone();

    let (state, effects) = update(
        state,
        Msg::ObjectUrlFailed {
            url,
            reason: "not found".to_string(),
        },
    );
    assert!(state.view().staged.is_empty());
    assert_eq!(notifications(&effects), vec![NotificationLevel::Error]);
}

#[test]
fn failure_after_send_drops_the_sent_attachment() {
    init_logging();
    let (state, effects) = stage(AppState::new(0), vec![file("a.png", 64, "image/png")]);
    let url = match &effects[0] {
        Effect::AcquireObjectUrl { url, .. } => url.clone(),
        other => panic!("unexpected effect {other:?}"),
    };
    let (state, _) = update(state, Msg::SendClicked { now: 1 });
    let (message, media) = {
        let view = state.view();
        let sent = &view.messages[1];
        (sent.id, sent.media[0].id)
    };
    let (state, _) = update(state, Msg::AttachmentClicked { message, media });
    assert!(state.view().viewer.is_some());

    let (state, effects) = update(
        state,
        Msg::ObjectUrlFailed {
            url: url.clone(),
            reason: "permission denied".to_string(),
        },
    );

    assert_eq!(notifications(&effects), vec![NotificationLevel::Error]);
    let view = state.view();
    assert_eq!(view.messages[1].sender, Sender::User);
    assert!(view.messages[1].media.is_empty());
    assert!(view.viewer.is_none());

    let (_, effects) = update(state, Msg::DownloadClicked { message, media });
    assert!(effects.is_empty());
}

#[test]
fn failure_for_unknown_url_is_ignored() {
    init_logging();
    let (_, effects) = update(
        AppState::new(0),
        Msg::ObjectUrlFailed {
            url: ObjectUrl::for_media(99),
            reason: "gone".to_string(),
        },
    );
    assert!(effects.is_empty());
}
