use crate::request::NoParams;
use crate::types_rs::LanguagePairsParams;
use crate::{Client, Error};
use serde_json::Value;

impl Client {
    /// Supported language pairs, only those starting from `source` when given.
    pub async fn get_language_pairs(&self, source: Option<&str>) -> Result<Value, Error> {
        let params = LanguagePairsParams {
            source: source.filter(|s| !s.is_empty()),
        };
        self.get("translate/service/language_pairs", &params).await
    }

    /// Supported languages with their codes and names.
    pub async fn get_languages(&self) -> Result<Value, Error> {
        self.get("translate/service/languages", &NoParams {}).await
    }
}
