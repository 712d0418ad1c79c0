//! Shared plumbing behind the two exported tool classes.
//!
//! `ToolSession` returns core types so it can be unit tested on native
//! targets; the exported classes convert errors to `JsValue` at the edge.
//!
//! A transform is split across the event loop: the session enters
//! `Processing` synchronously, the job runs after one `setTimeout(0)` turn
//! so the page can paint its busy state, and the returned promise settles
//! once the session is back in `Loaded`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use pixpress_core::{
    Download, FileRef, NativeHost, PipelineError, PipelineOptions, Quality, SelectOutcome,
    Session, Tool, TransformJob, TransformOutcome,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{future_to_promise, JsFuture};

/// A session shared between an exported class and its pending transform.
pub(crate) type SharedTool = Rc<RefCell<ToolSession>>;

pub(crate) fn shared(tool: Tool, options: PipelineOptions) -> SharedTool {
    Rc::new(RefCell::new(ToolSession::new(tool, options)))
}

pub(crate) struct ToolSession {
    session: Session<NativeHost>,
}

impl ToolSession {
    pub fn new(tool: Tool, options: PipelineOptions) -> Self {
        Self {
            session: Session::native(tool, options),
        }
    }

    pub fn session(&self) -> &Session<NativeHost> {
        &self.session
    }

    /// Returns true if the file became the new source.
    pub fn select_file(
        &mut self,
        name: String,
        mime_type: String,
        bytes: Vec<u8>,
    ) -> Result<bool, PipelineError> {
        let outcome = self
            .session
            .select_file(FileRef::new(name, mime_type, bytes))?;
        Ok(matches!(outcome, SelectOutcome::Loaded(_)))
    }

    pub fn quality(&self) -> u8 {
        self.session.quality().get()
    }

    pub fn set_quality(&mut self, value: i32) {
        self.session.set_quality(Quality::clamped(i64::from(value)));
    }

    /// Enter `Processing`. `None` without a source or while busy.
    pub fn begin(&mut self) -> Option<TransformJob> {
        self.session.begin_transform()
    }

    pub fn execute(&self, job: TransformJob) -> TransformOutcome {
        job.run(self.session.host().as_ref())
    }

    /// Back to `Loaded`. Returns true if the outcome produced a result.
    pub fn complete(&mut self, outcome: TransformOutcome) -> Result<bool, PipelineError> {
        Ok(self.session.finish(outcome)?.is_some())
    }

    pub fn file_name(&self) -> Option<String> {
        self.session.source().map(|s| s.file_name().to_string())
    }

    pub fn original_size(&self) -> f64 {
        self.session.source().map_or(0.0, |s| s.byte_len() as f64)
    }

    pub fn result_size(&self) -> f64 {
        self.session.result().map_or(0.0, |r| r.byte_len() as f64)
    }

    pub fn size_reduction(&self) -> i32 {
        self.session
            .comparison()
            .map_or(0, |c| c.size_reduction as i32)
    }

    pub fn result_width(&self) -> u32 {
        self.session.result().map_or(0, |r| r.dimensions().width)
    }

    pub fn result_height(&self) -> u32 {
        self.session.result().map_or(0, |r| r.dimensions().height)
    }

    pub fn original_width(&self) -> u32 {
        self.session.source().map_or(0, |s| s.dimensions().width)
    }

    pub fn original_height(&self) -> u32 {
        self.session.source().map_or(0, |s| s.dimensions().height)
    }

    pub fn result_bytes(&self) -> Option<Vec<u8>> {
        self.session.result().map(|r| r.blob().bytes().to_vec())
    }

    pub fn result_mime_type(&self) -> Option<String> {
        self.session.result().map(|r| r.mime_type().to_string())
    }

    pub fn result_data_url(&self) -> Option<String> {
        self.session.result().map(|r| r.blob().to_data_url())
    }

    pub fn original_data_url(&self) -> Option<String> {
        self.session.source().map(|s| s.to_data_url())
    }

    pub fn download(&self) -> Option<Download> {
        self.session.download()
    }
}

/// Read `PipelineOptions` from a JS object. `undefined`/`null` and invalid
/// objects give the defaults.
pub(crate) fn options_from_js(value: JsValue) -> PipelineOptions {
    if value.is_undefined() || value.is_null() {
        return PipelineOptions::default();
    }
    serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
        log::warn!("invalid options, using defaults: {}", e);
        PipelineOptions::default()
    })
}

pub(crate) fn to_js_error(error: PipelineError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Begin a transform now and finish it after one event-loop turn.
///
/// The promise resolves to `false` when there is nothing to transform,
/// `true` once a result is in place, and rejects with the error message if
/// the transform failed.
pub(crate) fn start_transform(tool: &SharedTool) -> Promise {
    let Some(job) = tool.borrow_mut().begin() else {
        return Promise::resolve(&JsValue::FALSE);
    };
    let tool = Rc::clone(tool);

    future_to_promise(async move {
        if let Err(e) = next_tick().await {
            log::warn!("could not yield before transform: {:?}", e);
        }
        let outcome = tool.borrow().execute(job);
        let produced = tool.borrow_mut().complete(outcome).map_err(to_js_error)?;
        Ok(JsValue::from_bool(produced))
    })
}

/// Resolve after a `setTimeout(0)` turn on whatever global is hosting us.
async fn next_tick() -> Result<(), JsValue> {
    let set_timeout: Function =
        Reflect::get(&js_sys::global(), &JsValue::from_str("setTimeout"))?.dyn_into()?;
    let tick = Promise::new(&mut |resolve, _reject| {
        if set_timeout
            .call2(&JsValue::UNDEFINED, &resolve, &JsValue::from(0))
            .is_err()
        {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    JsFuture::from(tick).await.map(|_| ())
}
