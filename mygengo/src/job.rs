//! `translate/job/{id}` endpoints

use crate::envelope::take_field;
use crate::request::NoParams;
use crate::types_rs::*;
use crate::{Client, Error};
use bytes::Bytes;
use serde_json::Value;

impl Client {
    pub fn get_job(&self, job_id: u64) -> GetJobBuilder<'_> {
        GetJob::builder(self, job_id)
    }

    /// JPEG preview of the translated text.
    pub async fn get_job_preview(&self, job_id: u64) -> Result<Bytes, Error> {
        self.get_raw(&format!("translate/job/{job_id}/preview"))
            .await
    }

    pub async fn get_job_revision(&self, job_id: u64, revision_id: u64) -> Result<Value, Error> {
        self.get(
            &format!("translate/job/{job_id}/revision/{revision_id}"),
            &NoParams {},
        )
        .await
    }

    pub async fn get_job_revisions(&self, job_id: u64) -> Result<Value, Error> {
        let resp = self
            .get(&format!("translate/job/{job_id}/revisions"), &NoParams {})
            .await?;
        take_field(resp, "revisions")
    }

    pub async fn get_job_feedback(&self, job_id: u64) -> Result<Value, Error> {
        let resp = self
            .get(&format!("translate/job/{job_id}/feedback"), &NoParams {})
            .await?;
        take_field(resp, "feedback")
    }

    /// Adds a comment to the job's comment thread.
    pub async fn submit_job_comment(&self, job_id: u64, comment: &str) -> Result<Value, Error> {
        self.post(
            &format!("translate/job/{job_id}/comment"),
            &CommentParams { body: comment },
            self.timeout,
        )
        .await
    }

    pub async fn get_job_comments(&self, job_id: u64) -> Result<Value, Error> {
        let resp = self
            .get(&format!("translate/job/{job_id}/comments"), &NoParams {})
            .await?;
        take_field(resp, "thread")
    }

    pub fn update_job(&self, job_id: u64) -> UpdateJobBuilder<'_> {
        UpdateJob::builder(self, job_id)
    }

    pub async fn cancel_job(&self, job_id: u64) -> Result<(), Error> {
        self.delete(&format!("translate/job/{job_id}")).await?;
        Ok(())
    }
}

impl GetJob<'_> {
    pub async fn send(&self) -> Result<Value, Error> {
        let resp = self
            .client
            .get(&format!("translate/job/{}", self.job_id), self)
            .await?;
        take_field(resp, "job")
    }
}

impl UpdateJob<'_> {
    pub async fn send(&self) -> Result<Value, Error> {
        self.client
            .put(&format!("translate/job/{}", self.job_id), self)
            .await
    }
}
