use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use listview_platform_android::{NativeDialogModule, NativeMap, NativeRejection};

type Reply = Result<NativeMap, NativeRejection>;

#[derive(Default)]
struct FakeDialogState {
    requests: Vec<NativeMap>,
    queued: VecDeque<Reply>,
    waiting: VecDeque<oneshot::Sender<Reply>>,
}

/// Native dialog module double.
///
/// Queued replies resolve immediately. Without one, `open` stays pending
/// until [`resolve_next`](Self::resolve_next) is called, like a dialog the
/// user has not closed yet.
#[derive(Clone, Default)]
pub struct FakeNativeDialogModule {
    state: Rc<RefCell<FakeDialogState>>,
}

impl FakeNativeDialogModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the reply for the next `open` call.
    pub fn reply_with(&self, reply: Reply) -> &Self {
        self.state.borrow_mut().queued.push_back(reply);
        self
    }

    /// Resolves the oldest pending `open` call. Returns false when none is
    /// waiting.
    pub fn resolve_next(&self, reply: Reply) -> bool {
        let sender = self.state.borrow_mut().waiting.pop_front();
        match sender {
            Some(sender) => sender.send(reply).is_ok(),
            None => false,
        }
    }

    /// Drops every pending dialog, as if the host activity went away.
    /// Returns how many were pending.
    pub fn tear_down(&self) -> usize {
        let dropped = std::mem::take(&mut self.state.borrow_mut().waiting);
        if !dropped.is_empty() {
            log::debug!("tearing down {} pending dialog(s)", dropped.len());
        }
        dropped.len()
    }

    pub fn requests(&self) -> Vec<NativeMap> {
        self.state.borrow().requests.clone()
    }

    pub fn pending_dialogs(&self) -> usize {
        self.state.borrow().waiting.len()
    }
}

impl NativeDialogModule for FakeNativeDialogModule {
    fn open(&self, request: NativeMap) -> LocalBoxFuture<'static, Reply> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request);
        if let Some(reply) = state.queued.pop_front() {
            return future::ready(reply).boxed_local();
        }

        let (sender, receiver) = oneshot::channel();
        state.waiting.push_back(sender);
        async move {
            receiver.await.unwrap_or_else(|_| {
                Err(NativeRejection::new("E_DIALOG_DROPPED", "dialog was torn down"))
            })
        }
        .boxed_local()
    }
}
