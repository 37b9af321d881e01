use std::collections::HashMap;
use std::sync::Mutex;

use super::window::lock;
use crate::error::ViewError;
use crate::favicon::{FaviconFetcher, FaviconReply};

/// Answers favicon fetches from a fixed table, synchronously.
///
/// URLs missing from the table fail. Replies land in the registry queue
/// during the same `pump`.
#[derive(Default)]
pub struct StaticFavicons {
    responses: HashMap<String, Result<String, String>>,
    requested: Mutex<Vec<String>>,
}

impl StaticFavicons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, data_uri: &str) -> Self {
        self.responses
            .insert(url.to_string(), Ok(data_uri.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, reason: &str) -> Self {
        self.responses
            .insert(url.to_string(), Err(reason.to_string()));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        lock(&self.requested).clone()
    }
}

impl FaviconFetcher for StaticFavicons {
    fn fetch(&self, url: String, reply: FaviconReply) {
        let result = match self.responses.get(&url) {
            Some(Ok(uri)) => Ok(uri.clone()),
            Some(Err(reason)) => Err(ViewError::Favicon(reason.clone())),
            None => Err(ViewError::Favicon(format!("no favicon at {url}"))),
        };
        lock(&self.requested).push(url);
        reply.send(result);
    }
}
