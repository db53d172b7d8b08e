//! In-crate fakes for driving the request pipeline in unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use crate::net::http::ApiClient;
use crate::net::transport::{OutboundRequest, RawResponse, Transport, TransportError};
use crate::net::types::User;
use crate::router::Navigator;
use crate::state::auth::AuthStore;
use crate::state::notice::{Notice, Notifier};
use crate::util::storage::MemoryStorage;

/// Answers calls in order from a script and records what was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
    sent: RefCell<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<RawResponse, TransportError>>) -> Rc<Self> {
        Rc::new(Self { replies: RefCell::new(replies.into()), sent: RefCell::new(Vec::new()) })
    }

    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.borrow().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("script exhausted".to_owned())))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices.borrow().iter().map(|n| n.message.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    paths: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.borrow_mut().push(path.to_owned());
    }
}

/// Everything a pipeline test needs to make assertions afterwards.
pub struct Harness {
    pub storage: MemoryStorage,
    pub auth: AuthStore,
    pub transport: Rc<ScriptedTransport>,
    pub notifier: Rc<RecordingNotifier>,
    pub navigator: Rc<RecordingNavigator>,
}

impl Harness {
    pub fn new(replies: Vec<Result<RawResponse, TransportError>>) -> Self {
        let storage = MemoryStorage::new();
        let auth = AuthStore::initialize(Rc::new(storage.clone()));
        Self {
            storage,
            auth,
            transport: ScriptedTransport::new(replies),
            notifier: Rc::new(RecordingNotifier::default()),
            navigator: Rc::new(RecordingNavigator::default()),
        }
    }

    /// Same harness with an admin already signed in.
    pub fn signed_in(replies: Vec<Result<RawResponse, TransportError>>) -> Self {
        let harness = Self::new(replies);
        harness.auth.login("tok-1", admin_user());
        harness
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::builder(self.transport.clone(), self.auth.clone())
            .notifier(self.notifier.clone())
            .navigator(self.navigator.clone())
            .build()
    }
}

pub fn admin_user() -> User {
    User {
        id: 1,
        username: "admin".to_owned(),
        email: "admin@example.com".to_owned(),
        roles: vec!["ROLE_ADMIN".to_owned()],
    }
}

pub fn json_reply(status: u16, body: &Value) -> Result<RawResponse, TransportError> {
    Ok(RawResponse::new(status, body.to_string()))
}

pub fn network_down() -> Result<RawResponse, TransportError> {
    Err(TransportError::Network("connection refused".to_owned()))
}
