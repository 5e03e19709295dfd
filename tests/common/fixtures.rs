//! Roster, store and handler fixtures

#![allow(dead_code)]

use std::sync::Arc;
use teloxide::types::{ChatId, UserId};

use ioibot::telegram::handlers::reply_to_message;
use ioibot::telegram::HandlerDeps;
use ioibot::{create_memory_pool, CommandRouter, Directory, PollController, PollStore};

use super::recorder::RecordingResponder;

pub const ROSTER: &str = r#"{
    "teams": [
        { "code": "IDN", "name": "Indonesia" },
        { "code": "SGP", "name": "Singapore" },
        { "code": "IOI", "name": "IOI", "visible": false }
    ],
    "members": [
        { "user_id": "idn_leader", "team_code": "IDN", "name": "Budi", "role": "Team Leader" },
        { "user_id": "idn_deputy", "team_code": "IDN", "name": "Sari", "role": "Deputy Leader" },
        { "user_id": "idn_guest", "team_code": "IDN", "name": "Tono", "role": "Guest" },
        { "user_id": "sgp_leader", "team_code": "SGP", "name": "Tan", "role": "Team Leader" },
        { "user_id": "htc", "team_code": "IOI", "name": "Anna", "role": "HTC" }
    ],
    "contestants": [
        { "code": "IDN1", "first_name": "Adi", "last_name": "Putra" },
        { "code": "SGP1", "first_name": "Lim", "last_name": "Jun", "online": true }
    ]
}"#;

pub const BOT_USERNAME: &str = "ioi_bot";

pub fn words(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Full handler stack over an in-memory database and a recording responder.
pub struct TestEnvironment {
    pub store: PollStore,
    pub router: Arc<CommandRouter>,
    pub responder: RecordingResponder,
    pub deps: HandlerDeps,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let store = PollStore::new(Arc::new(create_memory_pool().unwrap()));
        let directory = Arc::new(Directory::from_json(ROSTER).unwrap());
        let router = Arc::new(CommandRouter::new(directory, PollController::new(store.clone())));
        let responder = RecordingResponder::new();
        let deps = HandlerDeps::new(
            Arc::clone(&router),
            Arc::new(responder.clone()),
            Some(BOT_USERNAME.to_string()),
            UserId(42),
        );

        Self {
            store,
            router,
            responder,
            deps,
        }
    }

    /// Run one message through the handler and return what was sent back.
    pub async fn send(&self, sender: &str, text: &str) -> Option<String> {
        let before = self.responder.sent().len();
        reply_to_message(&self.deps, ChatId(1), Some(sender), text).await.unwrap();
        let sent = self.responder.sent();
        if sent.len() > before {
            sent.last().map(|message| message.text.clone())
        } else {
            None
        }
    }

    /// Reply text, panicking when the bot stayed silent.
    pub async fn reply(&self, sender: &str, text: &str) -> String {
        self.send(sender, text).await.expect("bot sent no reply")
    }
}
