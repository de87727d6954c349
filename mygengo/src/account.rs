use crate::envelope::take_field;
use crate::request::NoParams;
use crate::{Client, Error};
use serde_json::Value;

impl Client {
    /// Account statistics, such as credits spent.
    ///
    /// > <a href="http://mygengo.com/services/api/dev-docs/methods/account-stats-get" target="_blank">API docs</a>
    pub async fn get_account_stats(&self) -> Result<Value, Error> {
        self.get("account/stats", &NoParams {}).await
    }

    /// Account credit balance as the api formats it, eg `"120.00"`.
    pub async fn get_account_balance(&self) -> Result<String, Error> {
        let resp = self.get("account/balance", &NoParams {}).await?;
        match take_field(resp, "credits")? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(Error::Json(format!("Bad JSON: 'credits' is {other}"))),
        }
    }
}
