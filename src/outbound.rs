/// Which reply keyboard to attach to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    Main,
    Hunt,
    Shop,
    Guild,
    /// One "use" button per distinct owned item, then a back button.
    Inventory(Vec<String>),
    /// Leave whatever keyboard the chat already shows.
    None,
}

/// A message the engine wants delivered. Delivery is best-effort.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub thread_id: Option<i64>,
    pub title: String,
    pub body: String,
    pub keyboard: Keyboard,
}

impl OutboundMessage {
    pub fn new(chat_id: i64, title: impl Into<String>, body: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            chat_id,
            thread_id: None,
            title: title.into(),
            body: body.into(),
            keyboard,
        }
    }

    pub fn in_thread(mut self, thread_id: Option<i64>) -> Self {
        self.thread_id = thread_id;
        self
    }

    /// Same announcement for every broadcast chat.
    pub fn broadcast(chats: &[i64], title: &str, body: &str, thread_id: Option<i64>) -> Vec<Self> {
        chats
            .iter()
            .map(|&chat| Self::new(chat, title, body, Keyboard::None).in_thread(thread_id))
            .collect()
    }
}
