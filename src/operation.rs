use std::rc::Rc;
use core::{cell::RefCell, future::Future};

use futures::channel::oneshot;

use crate::error::BackendError;

// Legacy platform digest APIs do not return a future. Instead they hand back
// an operation object on which the caller installs a completion and an error
// handler, and the platform later fires exactly one of them.
//
// The operation is split into the half the selector sees (handlers are
// installed on it) and the half the backend keeps (it reports the outcome).
// The outcome may arrive before the handlers are installed, in which case it
// is held until they are.

type CompleteHandler = Box<dyn FnOnce(Vec<u8>)>;
type ErrorHandler = Box<dyn FnOnce(BackendError)>;

pub struct DigestOperation {
    inner: Rc<RefCell<OperationState>>,
}

pub struct OperationCompleter {
    inner: Rc<RefCell<OperationState>>,
}

pub fn digest_operation() -> (DigestOperation, OperationCompleter) {
    let inner = Rc::new(RefCell::new(OperationState {
        oncomplete: None,
        onerror: None,
        outcome: None,
        settled: false,
    }));

    let completer = OperationCompleter {
        inner: Rc::clone(&inner),
    };
    let operation = DigestOperation { inner };

    (operation, completer)
}

impl DigestOperation {
    pub fn set_oncomplete(&self, handler: impl FnOnce(Vec<u8>) + 'static) {
        self.inner.borrow_mut().oncomplete = Some(Box::new(handler));
        deliver(&self.inner);
    }

    pub fn set_onerror(&self, handler: impl FnOnce(BackendError) + 'static) {
        self.inner.borrow_mut().onerror = Some(Box::new(handler));
        deliver(&self.inner);
    }

    /// Wires both handlers to a single future resolving with whichever fires.
    pub fn into_future(self) -> impl Future<Output = Result<Vec<u8>, BackendError>> {
        let (sender, receiver) = oneshot::channel();
        let sender = Rc::new(RefCell::new(Some(sender)));
        let error_sender = Rc::clone(&sender);

        self.set_onerror(move |err| {
            if let Some(sender) = error_sender.borrow_mut().take() {
                let _ = sender.send(Err(err));
            }
        });
        self.set_oncomplete(move |bytes| {
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(Ok(bytes));
            }
        });

        async move { receiver.await.unwrap_or(Err(BackendError::Abandoned)) }
    }
}

impl OperationCompleter {
    pub fn complete(self, digest: Vec<u8>) {
        self.settle(Ok(digest))
    }

    pub fn fail(self, err: BackendError) {
        self.settle(Err(err))
    }

    fn settle(&self, outcome: Result<Vec<u8>, BackendError>) {
        {
            let mut state = self.inner.borrow_mut();
            if state.settled {
                return;
            }
            state.settled = true;
            state.outcome = Some(outcome);
        }
        deliver(&self.inner);
    }
}

impl Drop for OperationCompleter {
    fn drop(&mut self) {
        self.settle(Err(BackendError::Abandoned));
    }
}

struct OperationState {
    oncomplete: Option<CompleteHandler>,
    onerror: Option<ErrorHandler>,
    outcome: Option<Result<Vec<u8>, BackendError>>,
    settled: bool,
}

enum Delivery {
    Complete(CompleteHandler, Vec<u8>),
    Error(ErrorHandler, BackendError),
}

// Handlers run outside the borrow so they are free to touch the operation.
fn deliver(inner: &Rc<RefCell<OperationState>>) {
    let delivery = {
        let mut state = inner.borrow_mut();
        match state.outcome.take() {
            Some(Ok(bytes)) => match state.oncomplete.take() {
                Some(handler) => {
                    state.onerror = None;
                    Some(Delivery::Complete(handler, bytes))
                }
                None => {
                    state.outcome = Some(Ok(bytes));
                    None
                }
            },
            Some(Err(err)) => match state.onerror.take() {
                Some(handler) => {
                    state.oncomplete = None;
                    Some(Delivery::Error(handler, err))
                }
                None => {
                    state.outcome = Some(Err(err));
                    None
                }
            },
            None => None,
        }
    };

    match delivery {
        Some(Delivery::Complete(handler, bytes)) => handler(bytes),
        Some(Delivery::Error(handler, err)) => handler(err),
        None => {}
    }
}
