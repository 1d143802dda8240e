use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;
use http::StatusCode;
use reqwest::Url;

use crate::api::solutronic::{Page, Transport, TransportError};

/// In-memory transport with scripted answers per URL.
///
/// Unknown URLs time out, as an unreachable port would. Every request is recorded along with
/// the timeout it was made with.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<(String, Duration)>>,
}

#[derive(Clone)]
enum Route {
    Always(StatusCode, String),
    Once(StatusCode, String),
}

impl ScriptedTransport {
    pub fn serve(&self, url: &str, body: &str) {
        self.respond(url, StatusCode::OK, body);
    }

    pub fn respond(&self, url: &str, status: StatusCode, body: &str) {
        let route = Route::Always(status, body.to_owned());
        self.routes.lock().unwrap().insert(url.to_owned(), route);
    }

    /// Answer `200 OK` to the first request, then stop responding.
    pub fn serve_once(&self, url: &str, body: &str) {
        let route = Route::Once(StatusCode::OK, body.to_owned());
        self.routes.lock().unwrap().insert(url.to_owned(), route);
    }

    pub fn take_down(&self, url: &str) {
        self.routes.lock().unwrap().remove(url);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.requests.lock().unwrap().iter().map(|(_, timeout)| *timeout).collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<Page, TransportError> {
        self.requests.lock().unwrap().push((url.to_string(), timeout));
        let mut routes = self.routes.lock().unwrap();
        match routes.get(url.as_str()).cloned() {
            Some(Route::Always(status, body)) => Ok(Page { status, body }),
            Some(Route::Once(status, body)) => {
                routes.remove(url.as_str());
                Ok(Page { status, body })
            }
            None => Err(TransportError::Timeout),
        }
    }
}
