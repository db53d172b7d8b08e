//! Transient user-facing notifications ("toasts").
//!
//! SYSTEM CONTEXT
//! ==============
//! The request pipeline reports failures through the `Notifier` trait. The
//! app wires it to a `RwSignal<NoticeState>` rendered as a tray; nothing
//! blocks on a notice or requires acknowledgment.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use leptos::prelude::*;

/// Most notices kept on screen at once; older ones are dropped first.
pub const MAX_VISIBLE_NOTICES: usize = 4;

/// Browser build: notices disappear on their own after this long.
pub const NOTICE_TTL_MS: u64 = 3_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoticeLevel {
    #[default]
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "notice notice--info",
            Self::Warning => "notice notice--warning",
            Self::Error => "notice notice--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// A notice currently on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShownNotice {
    pub id: u64,
    pub notice: Notice,
}

#[derive(Clone, Debug, Default)]
pub struct NoticeState {
    pub items: Vec<ShownNotice>,
    next_id: u64,
}

impl NoticeState {
    /// Show `notice`, evicting the oldest when the tray is full. Returns its id.
    pub fn push(&mut self, notice: Notice) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(ShownNotice { id, notice });
        if self.items.len() > MAX_VISIBLE_NOTICES {
            let excess = self.items.len() - MAX_VISIBLE_NOTICES;
            self.items.drain(..excess);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }
}

/// Sink for user-facing notifications.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes to the log. Used when no UI is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        log_notice(&notice);
    }
}

impl Notifier for RwSignal<NoticeState> {
    fn notify(&self, notice: Notice) {
        log_notice(&notice);
        let mut id = 0;
        self.update(|state| id = state.push(notice));

        #[cfg(feature = "csr")]
        {
            let signal = *self;
            leptos::task::spawn_local(async move {
                crate::util::time::sleep(std::time::Duration::from_millis(NOTICE_TTL_MS)).await;
                signal.try_update(|state| state.dismiss(id));
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = id;
        }
    }
}

fn log_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => leptos::logging::log!("notice: {}", notice.message),
        NoticeLevel::Warning | NoticeLevel::Error => {
            leptos::logging::warn!("notice ({:?}): {}", notice.level, notice.message);
        }
    }
}
