use chatrunner_core::Message;

pub const CODE_ACK: &str = "Your code has been executed successfully! You can view the preview.";
pub const TEXT_ACK: &str = "Your message has been received.";
pub const EXAMPLE_INTRO: &str = "Selected code example:";

/// Produces the system side of the conversation.
pub trait Responder: Send + Sync + 'static {
    /// Reply text for a submitted user message.
    fn reply(&self, message: &Message) -> String;

    /// System line posted ahead of a selected example.
    fn example_intro(&self) -> String {
        EXAMPLE_INTRO.to_string()
    }
}

/// Fixed acknowledgements, picked by message kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct Acknowledger;

impl Responder for Acknowledger {
    fn reply(&self, message: &Message) -> String {
        if message.is_code() {
            CODE_ACK.to_string()
        } else {
            TEXT_ACK.to_string()
        }
    }
}
