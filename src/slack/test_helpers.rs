//! In-memory [`SlackApi`] used by unit tests to script Web API responses and
//! record the calls made against them.

use std::sync::Mutex;

use serde_json::Value;

use super::error::ApiError;
use super::session::SlackApi;

type Handler = dyn Fn(&str, &[(&str, String)]) -> Result<Value, ApiError> + Send + Sync;

pub(crate) struct ScriptedApi {
    handler: Box<Handler>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedApi {
    pub(crate) fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &[(&str, String)]) -> Result<Value, ApiError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Parameters of every call made to `method`, in call order.
    pub(crate) fn calls_to(&self, method: &str) -> Vec<Vec<(String, String)>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub(crate) fn call_count(&self, method: &str) -> usize {
        self.calls_to(method).len()
    }
}

/// Look up a form parameter by name.
pub(crate) fn param<'a>(params: &'a [(&str, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

/// Look up a recorded form parameter by name.
pub(crate) fn recorded<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[async_trait::async_trait]
impl SlackApi for ScriptedApi {
    async fn call(&self, method: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push((
            method.to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));
        (self.handler)(method, params)
    }

    async fn fetch(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        panic!("unexpected download of {url} in scripted test");
    }
}
