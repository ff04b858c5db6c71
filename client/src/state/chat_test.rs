use std::cell::RefCell;

use super::*;

#[derive(Default)]
struct RecordingSink {
    open: bool,
    sent: RefCell<Vec<String>>,
}

impl ChatSink for RecordingSink {
    fn send_chat_message(&self, text: &str) -> bool {
        if self.open {
            self.sent.borrow_mut().push(text.to_owned());
        }
        self.open
    }
}

#[test]
fn submit_ignores_blank_input() {
    let mut composer = ChatComposer::default();
    composer.set_input("   \t");
    assert!(!composer.submit(None));
    assert_eq!(composer.input(), "   \t");
    assert!(composer.messages().is_empty());
}

#[test]
fn submit_forwards_untrimmed_text_to_sink_and_clears_input() {
    let sink = RecordingSink { open: true, ..RecordingSink::default() };
    let mut composer = ChatComposer::default();
    composer.set_input(" clima en Bogotá ");

    assert!(composer.submit(Some(&sink)));
    assert_eq!(*sink.sent.borrow(), [" clima en Bogotá "]);
    assert_eq!(composer.input(), "");
    assert!(composer.messages().is_empty());
}

#[test]
fn submit_with_closed_sink_still_clears_input() {
    let sink = RecordingSink::default();
    let mut composer = ChatComposer::default();
    composer.set_input("hola");

    assert!(composer.submit(Some(&sink)));
    assert!(sink.sent.borrow().is_empty());
    assert_eq!(composer.input(), "");
    assert!(composer.messages().is_empty());
}

#[test]
fn submit_without_sink_appends_local_user_message() {
    let mut composer = ChatComposer::default();
    composer.set_input("hola");

    assert!(composer.submit(None));
    let [msg] = composer.messages() else {
        panic!("expected one local message");
    };
    assert_eq!(msg.sender, "Usuario");
    assert_eq!(msg.content, "hola");
    assert_eq!(msg.kind, MessageKind::User);
}
