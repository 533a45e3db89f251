//! Edit message handlers
//!
//! Handles EditMsg by driving the [`EditSession`] transitions.

use crate::domain::Point;
use crate::inpaint::SubmissionRequest;

use super::messages::{EditMsg, PointerAction};
use super::state::EditSession;

/// Handle an EditMsg, modifying session state
///
/// Returns the request to dispatch when the message started a submission.
/// The caller owns running it and posting `SubmissionResolved` back.
pub fn handle_edit_msg(session: &mut EditSession, msg: EditMsg) -> Option<SubmissionRequest> {
    match msg {
        EditMsg::Pointer(action) => {
            handle_pointer(session, action);
            None
        }
        EditMsg::ToggleMode(mode) => {
            if let Err(err) = session.toggle_mode(mode) {
                log::error!("Failed to switch draw mode: {}", err);
            }
            None
        }
        EditMsg::PromptChanged(prompt) => {
            session.set_prompt(prompt);
            None
        }
        EditMsg::LoadImage(image) => {
            session.load_image(image);
            None
        }
        EditMsg::Reset => {
            session.reset();
            None
        }
        EditMsg::Submit => handle_submit(session),
        EditMsg::SubmissionResolved(outcome) => {
            session.finish_submission(outcome);
            None
        }
    }
}

fn handle_pointer(session: &mut EditSession, action: PointerAction) {
    match action {
        PointerAction::Down(x, y) => session.pointer_down(Point::new(x, y)),
        PointerAction::Move(x, y) => session.pointer_move(Point::new(x, y)),
        PointerAction::Up | PointerAction::Leave => session.pointer_up(),
    }
}

fn handle_submit(session: &mut EditSession) -> Option<SubmissionRequest> {
    if !session.can_submit() {
        log::debug!("Submit ignored: {:?}", session.state());
        return None;
    }
    match session.begin_submission() {
        Ok(request) => request,
        // Status already carries the failure
        Err(_) => None,
    }
}
