use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::multipart::{Form, Part};

use crate::error::FetchError;

/// One document submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub contributor_id: String,
    pub title: String,
    pub author: String,
    pub source: String,
    pub date: String,
    pub category: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    AlreadyUploaded,
    Failed { status: u16, body: String },
}

/// 201 created, 208 already known to the server, anything else a failure.
pub fn classify(status: u16, body: String) -> UploadOutcome {
    match status {
        201 => UploadOutcome::Uploaded,
        208 => UploadOutcome::AlreadyUploaded,
        _ => UploadOutcome::Failed { status, body },
    }
}

#[async_trait]
pub trait Uploader: Send + Sync {
    async fn submit(&self, form: UploadForm) -> Result<UploadOutcome, FetchError>;
}

#[derive(Clone)]
pub struct HttpUploader {
    http: HttpClient,
    url: String,
}

impl HttpUploader {
    pub fn new(url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = HttpClient::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::from_reqwest("<client>", e))?;
        Ok(Self { http, url: url.into() })
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn submit(&self, form: UploadForm) -> Result<UploadOutcome, FetchError> {
        let file = Part::bytes(form.content)
            .file_name(form.file_name)
            .mime_str("text/markdown")
            .map_err(|e| FetchError::from_reqwest(&self.url, e))?;
        let multipart = Form::new()
            .text("contributor_id", form.contributor_id)
            .text("title", form.title)
            .text("author", form.author)
            .text("source", form.source)
            .text("date", form.date)
            .text("category", form.category)
            .part("file", file);

        let response = self
            .http
            .post(&self.url)
            .multipart(multipart)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&self.url, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Body { url: self.url.clone(), source })?;
        Ok(classify(status, body))
    }
}

#[cfg(test)]
pub use mock::MockUploader;

#[cfg(test)]
mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Answers submissions from a queue of statuses and records every form.
    #[derive(Debug, Default)]
    pub struct MockUploader {
        statuses: Mutex<VecDeque<u16>>,
        calls: Mutex<Vec<UploadForm>>,
    }

    impl MockUploader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_status(&self, status: u16) {
            self.statuses.lock().unwrap().push_back(status);
        }

        pub fn calls(&self) -> Vec<UploadForm> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Uploader for MockUploader {
        async fn submit(&self, form: UploadForm) -> Result<UploadOutcome, FetchError> {
            let url = format!("mock://{}", form.file_name);
            self.calls.lock().unwrap().push(form);
            match self.statuses.lock().unwrap().pop_front() {
                Some(status) => Ok(classify(status, "mock body".to_string())),
                None => Err(FetchError::Unmocked { url }),
            }
        }
    }
}
