use super::*;

#[test]
fn channel_delivers_events_in_order() {
    let (events, mut rx) = UiEvents::channel();
    events.error("boom");
    events.redirect(Redirect::Home);

    assert_eq!(rx.try_recv().unwrap(), UiEvent::Notice(Notice::error("boom")));
    assert_eq!(rx.try_recv().unwrap(), UiEvent::Redirect(Redirect::Home));
    assert!(rx.try_recv().is_err());
}

#[test]
fn disabled_handle_drops_events() {
    let events = UiEvents::disabled();
    events.error("nobody listens");
    events.redirect(Redirect::Login { from: None });
}

#[test]
fn send_after_receiver_dropped_is_silent() {
    let (events, rx) = UiEvents::channel();
    drop(rx);
    events.notify(Notice::success("saved"));
}

#[test]
fn redirect_paths() {
    assert_eq!(Redirect::Home.path(), "/");
    assert_eq!(Redirect::Login { from: Some("/dashboard".into()) }.path(), "/login");
}
