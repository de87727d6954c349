use anyhow::{Context, bail};
use clap::ValueEnum;
use mygengo::{Client, JobStatus, Tier, Value};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Every client method the command line can call.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
pub enum Command {
    GetAccountStats,
    GetAccountBalance,
    GetJob,
    GetJobPreview,
    GetJobRevision,
    GetJobRevisions,
    GetJobFeedback,
    SubmitJobComment,
    GetJobComments,
    UpdateJob,
    CancelJob,
    SubmitJob,
    GetJobGroup,
    GetJobs,
    SubmitJobGroup,
    GetLanguagePairs,
    GetLanguages,
}

pub enum Output {
    Json(Value),
    Text(String),
    Done,
}

/// Command arguments: positional ones and `key=value` ones.
///
/// Like a function call, a param is looked up by name first, then by position.
#[derive(Debug, Default, PartialEq)]
pub struct Args {
    positional: Vec<String>,
    keyword: BTreeMap<String, String>,
}

impl Args {
    pub fn parse(tokens: impl IntoIterator<Item = String>) -> Self {
        let mut args = Args::default();
        for token in tokens {
            match token.split_once('=') {
                Some((key, value)) => {
                    args.keyword.insert(key.to_owned(), value.to_owned());
                }
                None => args.positional.push(token),
            }
        }
        args
    }

    fn get(&self, index: usize, name: &str) -> Option<&str> {
        self.keyword
            .get(name)
            .or_else(|| self.positional.get(index))
            .map(String::as_str)
    }

    fn required(&self, index: usize, name: &str) -> anyhow::Result<&str> {
        self.get(index, name)
            .with_context(|| format!("missing argument `{name}`"))
    }

    fn id(&self, index: usize, name: &str) -> anyhow::Result<u64> {
        let s = self.required(index, name)?;
        s.parse()
            .with_context(|| format!("`{name}` must be a number, got {s:?}"))
    }

    fn flag(&self, index: usize, name: &str) -> anyhow::Result<Option<bool>> {
        self.get(index, name).map(|s| parse_flag(name, s)).transpose()
    }

    fn parsed<T: std::str::FromStr>(&self, index: usize, name: &str) -> anyhow::Result<Option<T>> {
        self.get(index, name)
            .map(|s| s.parse().ok().with_context(|| format!("invalid `{name}`: {s:?}")))
            .transpose()
    }

    /// For api enums like [`Tier`], spelled the way the api spells them.
    fn api_enum<T: DeserializeOwned>(&self, index: usize, name: &str) -> anyhow::Result<Option<T>> {
        self.get(index, name)
            .map(|s| {
                serde_json::from_value(Value::String(s.to_owned()))
                    .with_context(|| format!("invalid `{name}`: {s:?}"))
            })
            .transpose()
    }

    fn json(&self, index: usize, name: &str) -> anyhow::Result<Option<Value>> {
        self.get(index, name)
            .map(|s| serde_json::from_str(s).with_context(|| format!("`{name}` is not valid JSON")))
            .transpose()
    }

    /// Keyword args except `skip`.
    fn extra<'a>(&'a self, skip: &'a [&'a str]) -> impl Iterator<Item = (String, Value)> + 'a {
        self.keyword
            .iter()
            .filter(move |(k, _)| !skip.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
    }
}

fn parse_flag(name: &str, s: &str) -> anyhow::Result<bool> {
    match s {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => bail!("`{name}` must be 0 or 1, got {s:?}"),
    }
}

pub async fn run(client: &Client, command: Command, args: &Args) -> anyhow::Result<Output> {
    let json = match command {
        Command::GetAccountStats => client.get_account_stats().await?,
        Command::GetAccountBalance => {
            return Ok(Output::Text(client.get_account_balance().await?));
        }
        Command::GetJob => {
            let pre_mt = args.flag(1, "pre_mt")?.unwrap_or_default();
            client
                .get_job(args.id(0, "job_id")?)
                .pre_mt(pre_mt)
                .build()
                .send()
                .await?
        }
        Command::GetJobPreview => {
            let image = client.get_job_preview(args.id(0, "job_id")?).await?;
            return match args.get(1, "filename") {
                Some(filename) => {
                    let path = PathBuf::from(filename);
                    tokio::fs::write(&path, &image)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    Ok(Output::Text(format!("wrote {} bytes to {}", image.len(), path.display())))
                }
                None => Ok(Output::Text(format!(
                    "{} bytes of image data, pass filename=<path> to save it",
                    image.len()
                ))),
            };
        }
        Command::GetJobRevision => {
            client
                .get_job_revision(args.id(0, "job_id")?, args.id(1, "revision_id")?)
                .await?
        }
        Command::GetJobRevisions => client.get_job_revisions(args.id(0, "job_id")?).await?,
        Command::GetJobFeedback => client.get_job_feedback(args.id(0, "job_id")?).await?,
        Command::SubmitJobComment => {
            client
                .submit_job_comment(args.id(0, "job_id")?, args.required(1, "comment")?)
                .await?
        }
        Command::GetJobComments => client.get_job_comments(args.id(0, "job_id")?).await?,
        Command::UpdateJob => {
            client
                .update_job(args.id(0, "job_id")?)
                .params(args.extra(&["job_id", "action"]))
                .action(args.required(1, "action")?)
                .build()
                .send()
                .await?
        }
        Command::CancelJob => {
            client.cancel_job(args.id(0, "job_id")?).await?;
            return Ok(Output::Done);
        }
        Command::SubmitJob => submit_job(client, args).await?,
        Command::GetJobGroup => client.get_job_group(args.id(0, "job_group_id")?).await?,
        Command::GetJobs => {
            client
                .get_jobs()
                .maybe_status(args.api_enum::<JobStatus>(0, "status")?)
                .maybe_timestamp_after(args.parsed(1, "timestamp_after")?)
                .maybe_count(args.parsed(2, "count")?)
                .build()
                .send()
                .await?
        }
        Command::SubmitJobGroup => {
            let jobs = args.json(0, "jobs")?.context("missing argument `jobs`")?;
            client
                .submit_job_group()
                .jobs(&jobs)
                .as_group(args.flag(1, "as_group")?.unwrap_or(false))
                .process(args.flag(2, "process")?.unwrap_or(true))
                .build()
                .send()
                .await?
        }
        Command::GetLanguagePairs => client.get_language_pairs(args.get(0, "source")).await?,
        Command::GetLanguages => client.get_languages().await?,
    };
    Ok(Output::Json(json))
}

async fn submit_job(client: &Client, args: &Args) -> anyhow::Result<Value> {
    // `job=<json>` sends a job object built by hand
    if let Some(job) = args.keyword.get("job") {
        let job: Value = serde_json::from_str(job).context("`job` is not valid JSON")?;
        return Ok(client.submit_custom_job(&job).await?);
    }

    let job = client
        .submit_job()
        .text(args.required(0, "text")?)
        .target(args.required(1, "target")?)
        .source(args.get(2, "source").unwrap_or("en"))
        .tier(args.api_enum::<Tier>(3, "tier")?.unwrap_or_default())
        .maybe_slug(args.get(4, "slug"))
        .auto_approve(args.flag(5, "auto_approve")?.unwrap_or(false))
        .maybe_custom_data(args.get(6, "custom_data"))
        .maybe_comment(args.get(7, "comment"))
        .maybe_callback_url(args.get(8, "callback_url"))
        .build()
        .send()
        .await?;
    Ok(job)
}
