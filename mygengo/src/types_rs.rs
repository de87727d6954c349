use crate::Client;
use bon::Builder;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Translation quality level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Machine,
    Standard,
    Pro,
    Ultra,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Unpaid,
    Available,
    Pending,
    Reviewable,
    Approved,
    Rejected,
    Canceled,
}

// the api takes flags as "0" / "1"
fn serialize_flag<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *flag { "1" } else { "0" })
}

// region    --- get job
#[derive(Builder, Serialize)]
pub struct GetJob<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) job_id: u64,
    /// Include the machine translation of jobs still waiting for a translator
    #[builder(default)]
    #[serde(
        serialize_with = "serialize_flag",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pre_mt: bool,
}
// endregion --- get job

// region    --- update job
/// `PUT translate/job/{id}`
///
/// Extra params depend on the action, eg `reject` needs `reason`, `comment` and `captcha`:
///
/// ```no_run
/// # async fn run(client: &mygengo::Client) -> Result<(), mygengo::Error> {
/// client
///     .update_job(42)
///     .param("reason", "quality")
///     .param("comment", "not a translation")
///     .param("captcha", "ABC")
///     .action("reject")
///     .build()
///     .send()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Serialize)]
pub struct UpdateJob<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) job_id: u64,
    // #[builder(field)] members must come after the start_fn ones and before the setters
    #[builder(field)]
    #[serde(flatten)]
    params: Map<String, Value>,
    /// `approve`, `reject`, `revise`, `purchase`...
    action: &'a str,
}

impl<'a, S: update_job_builder::State> UpdateJobBuilder<'a, S> {
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.params.extend(params);
        self
    }
}
// endregion --- update job

// region    --- submit job
/// The `job` object of `POST translate/job`.
///
/// `slug`, `custom_data`, `comment` and `callback_url` are left out when not set.
#[derive(Builder, Serialize)]
pub struct SubmitJob<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    #[serde(rename = "body_src")]
    text: &'a str,
    /// Target language code
    #[serde(rename = "lc_tgt")]
    target: &'a str,
    /// Source language code
    #[builder(default = "en")]
    #[serde(rename = "lc_src")]
    source: &'a str,
    #[builder(default)]
    tier: Tier,
    #[builder(default)]
    #[serde(serialize_with = "serialize_flag")]
    auto_approve: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_data: Option<&'a str>,
    /// Instructions for the translator
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
}

#[derive(Serialize)]
pub(crate) struct JobParams<'a, T: Serialize> {
    pub(crate) job: &'a T,
}
// endregion --- submit job

// region    --- submit job group
#[derive(Builder, Serialize)]
pub struct SubmitJobGroup<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    /// Job objects as `submit_custom_job` takes them, either a list or a map keyed by name
    jobs: &'a Value,
    /// Let one translator work on all jobs of the group
    #[builder(default)]
    #[serde(serialize_with = "serialize_flag")]
    as_group: bool,
    /// Pay for the jobs right away
    #[builder(default = true)]
    #[serde(serialize_with = "serialize_flag")]
    process: bool,
}
// endregion --- submit job group

// region    --- get jobs
#[derive(Builder, Serialize)]
pub struct GetJobs<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<JobStatus>,
    /// Unix timestamp, only jobs created after it are returned
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp_after: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
}
// endregion --- get jobs

#[derive(Serialize)]
pub(crate) struct CommentParams<'a> {
    pub(crate) body: &'a str,
}

#[derive(Serialize)]
pub(crate) struct LanguagePairsParams<'a> {
    #[serde(rename = "lc_src", skip_serializing_if = "Option::is_none")]
    pub(crate) source: Option<&'a str>,
}
