use crate::envelope::take_field;
use crate::request::NoParams;
use crate::types_rs::*;
use crate::{Client, Error};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const SUBMIT_JOB_TIMEOUT: Duration = Duration::from_secs(30);
const SUBMIT_JOB_GROUP_TIMEOUT: Duration = Duration::from_secs(300);

impl Client {
    /// Submit a job for translation. If the content has already been translated this returns the
    /// existing job.
    ///
    /// > <a href="http://mygengo.com/services/api/dev-docs/methods/translate-job-post" target="_blank">API docs</a>
    pub fn submit_job(&self) -> SubmitJobBuilder<'_> {
        SubmitJob::builder(self)
    }

    /// Same as [`Client::submit_job`], with a job object built by the caller and sent as is.
    pub async fn submit_custom_job(&self, job: &Value) -> Result<Value, Error> {
        self.post_job(job).await
    }

    /// Jobs previously submitted together with [`Client::submit_job_group`].
    pub async fn get_job_group(&self, job_group_id: u64) -> Result<Value, Error> {
        let resp = self
            .get(&format!("translate/jobs/{job_group_id}"), &NoParams {})
            .await?;
        take_field(resp, "jobs")
    }

    pub fn get_jobs(&self) -> GetJobsBuilder<'_> {
        GetJobs::builder(self)
    }

    pub fn submit_job_group(&self) -> SubmitJobGroupBuilder<'_> {
        SubmitJobGroup::builder(self)
    }

    async fn post_job(&self, job: &impl Serialize) -> Result<Value, Error> {
        let resp = self
            .post("translate/job", &JobParams { job }, SUBMIT_JOB_TIMEOUT)
            .await?;
        take_field(resp, "job")
    }
}

impl SubmitJob<'_> {
    pub async fn send(&self) -> Result<Value, Error> {
        self.client.post_job(self).await
    }
}

impl GetJobs<'_> {
    pub async fn send(&self) -> Result<Value, Error> {
        self.client.get("translate/jobs", self).await
    }
}

impl SubmitJobGroup<'_> {
    pub async fn send(&self) -> Result<Value, Error> {
        self.client
            .post("translate/jobs", self, SUBMIT_JOB_GROUP_TIMEOUT)
            .await
    }
}
