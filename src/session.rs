//! Presentation session
//!
//! This module defines the trait for tunneling messages from the game
//! engine to whatever renders the board. The tunnel abstraction allows for
//! different presentation layers while maintaining a consistent interface.

use super::{SyncMessage, UpdateMessage};

/// Trait for sending messages through a communication tunnel
///
/// Implementations might drive a terminal UI, a browser front end, or a
/// test recorder.
pub trait Tunnel {
    /// Sends an update message to the presentation
    ///
    /// Update messages describe a single change such as a phase change,
    /// a revealed answer, or a new strike count.
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to send
    fn send_message(&self, message: &UpdateMessage);

    /// Sends a state synchronization message to the presentation
    ///
    /// Sync messages carry a full snapshot, typically sent when the
    /// presentation is (re)created.
    ///
    /// # Arguments
    ///
    /// * `state` - The synchronization message to send
    fn send_state(&self, state: &SyncMessage);
}

impl<T: Tunnel> Tunnel for &T {
    fn send_message(&self, message: &UpdateMessage) {
        (**self).send_message(message);
    }

    fn send_state(&self, state: &SyncMessage) {
        (**self).send_state(state);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod mocks {
    use std::{
        cell::RefCell,
        rc::Rc,
        sync::{Arc, Mutex},
        time::Duration,
    };

    use super::Tunnel;

    #[derive(Debug, Clone, Default)]
    pub struct MockTunnel {
        pub messages: Arc<Mutex<Vec<String>>>,
        pub states: Arc<Mutex<Vec<String>>>,
    }

    impl MockTunnel {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }

        pub fn states(&self) -> Vec<String> {
            self.states.lock().unwrap().clone()
        }

        pub fn contains(&self, needle: &str) -> bool {
            self.messages().iter().any(|m| m.contains(needle))
        }

        pub fn clear(&self) {
            self.messages.lock().unwrap().clear();
            self.states.lock().unwrap().clear();
        }
    }

    impl Tunnel for MockTunnel {
        fn send_message(&self, message: &crate::UpdateMessage) {
            self.messages.lock().unwrap().push(message.to_message());
        }

        fn send_state(&self, state: &crate::SyncMessage) {
            self.states.lock().unwrap().push(state.to_message());
        }
    }

    pub type Scheduled = Rc<RefCell<Vec<(crate::AlarmMessage, Duration)>>>;

    /// Returns a schedule callback together with the list it records into
    pub fn mock_scheduler() -> (Scheduled, impl FnMut(crate::AlarmMessage, Duration)) {
        let scheduled: Scheduled = Rc::default();
        let sink = scheduled.clone();
        (scheduled, move |message, duration| {
            sink.borrow_mut().push((message, duration));
        })
    }

    /// Drains everything scheduled so far
    pub fn take(scheduled: &Scheduled) -> Vec<(crate::AlarmMessage, Duration)> {
        std::mem::take(&mut *scheduled.borrow_mut())
    }

    pub fn noop_scheduler() -> impl FnMut(crate::AlarmMessage, Duration) {
        |_, _| {}
    }
}
