#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use jobboard_engine::{EngineEvent, EventSink, HttpSettings, PostgrestClient, SupabaseSettings};
use wiremock::MockServer;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(board_logging::initialize_for_tests);
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub const ANON_KEY: &str = "anon-key";

pub fn postgrest(server: &MockServer, access_token: Option<&str>) -> PostgrestClient {
    let settings = SupabaseSettings {
        url: server.uri(),
        anon_key: ANON_KEY.to_string(),
        access_token: access_token.map(ToOwned::to_owned),
    };
    PostgrestClient::new(&settings, &HttpSettings::default()).expect("postgrest client")
}
