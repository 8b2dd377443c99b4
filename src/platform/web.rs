use std::rc::Rc;
use std::cell::RefCell;

use futures::{
    future::FutureExt,
    task::{LocalFutureObj, LocalSpawn, SpawnError},
};
use js_sys::{Function, Object, Promise, Reflect, Uint8Array};
use log::debug;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::{
    engine::{AlgorithmDescriptor, PendingDigest, PlatformDigest},
    error::BackendError,
    operation::{digest_operation, DigestOperation},
    platform::surface::{choose_surface, convention, Convention, SubtleSurface},
};

// Only the surface is remembered, JS objects are looked up again on every
// call so the digest stays `Send + Sync`.
pub struct WebSubtle {
    surface: SubtleSurface,
}

impl WebSubtle {
    pub fn probe() -> Option<Self> {
        let global: JsValue = js_sys::global().into();

        let crypto = property(&global, "crypto");
        let surface = choose_surface(crypto.is_some(), |root, key| {
            let root = if root == "crypto" {
                crypto.clone()
            } else {
                property(&global, root)
            };
            root.and_then(|root| property(&root, key)).is_some()
        });

        debug!("webcrypto probe found {:?}", surface);
        surface.map(|surface| Self { surface })
    }

    pub fn surface(&self) -> SubtleSurface {
        self.surface
    }

    fn subtle(&self) -> Result<JsValue, BackendError> {
        let (root, key) = self.surface.path();
        let global: JsValue = js_sys::global().into();
        property(&global, root)
            .and_then(|root| property(&root, key))
            .ok_or_else(|| BackendError::Js(format!("{}.{} is not available", root, key)))
    }
}

impl PlatformDigest for WebSubtle {
    fn digest(
        &self,
        algorithm: &AlgorithmDescriptor,
        data: Vec<u8>,
    ) -> Result<PendingDigest, BackendError> {
        let subtle = self.subtle()?;
        let digest: Function = Reflect::get(&subtle, &JsValue::from_str("digest"))
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        let descriptor = Object::new();
        Reflect::set(
            &descriptor,
            &JsValue::from_str("name"),
            &JsValue::from_str(algorithm.name),
        )
        .map_err(js_error)?;

        let input = Uint8Array::from(data.as_slice());
        let handle = digest
            .call2(&subtle, &descriptor, &input)
            .map_err(js_error)?;

        let then = Reflect::get(&handle, &JsValue::from_str("then")).map_err(js_error)?;
        if convention(then.is_function()) == Convention::Promise {
            let promise: Promise = handle.unchecked_into();
            let future = JsFuture::from(promise).map(|result| {
                result
                    .map(|buffer| Uint8Array::new(&buffer).to_vec())
                    .map_err(js_error)
            });
            return Ok(PendingDigest::Future(future.boxed_local()));
        }

        legacy_operation(&handle, algorithm.name).map(PendingDigest::Operation)
    }
}

// IE11 hands back a CryptoOperation with `oncomplete`/`onerror` properties
fn legacy_operation(handle: &JsValue, name: &'static str) -> Result<DigestOperation, BackendError> {
    let (operation, completer) = digest_operation();
    let completer = Rc::new(RefCell::new(Some(completer)));
    let error_completer = Rc::clone(&completer);

    let onerror = Closure::once_into_js(move |_event: JsValue| {
        if let Some(completer) = error_completer.borrow_mut().take() {
            completer.fail(BackendError::Failed(format!(
                "Error hashing data using {}",
                name
            )));
        }
    });

    let oncomplete = Closure::once_into_js(move |event: JsValue| {
        if let Some(completer) = completer.borrow_mut().take() {
            let result = Reflect::get(&event, &JsValue::from_str("target"))
                .and_then(|target| Reflect::get(&target, &JsValue::from_str("result")));
            match result {
                Ok(buffer) => completer.complete(Uint8Array::new(&buffer).to_vec()),
                Err(err) => completer.fail(js_error(err)),
            }
        }
    });

    Reflect::set(handle, &JsValue::from_str("onerror"), &onerror).map_err(js_error)?;
    Reflect::set(handle, &JsValue::from_str("oncomplete"), &oncomplete).map_err(js_error)?;

    Ok(operation)
}

/// Runs completion callbacks on the browser's microtask queue.
#[derive(Copy, Clone, Debug, Default)]
pub struct WebSpawner;

impl LocalSpawn for WebSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

fn property(target: &JsValue, key: &str) -> Option<JsValue> {
    if target.is_undefined() || target.is_null() {
        return None;
    }
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| value.is_truthy())
}

fn js_error(value: JsValue) -> BackendError {
    BackendError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
