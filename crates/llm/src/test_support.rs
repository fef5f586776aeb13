//! Test doubles shared by the unit tests

use crate::model::LanguageModel;
use async_trait::async_trait;
use barkeep_core::error::Result;
use mockall::mock;

mock! {
    pub Model {}

    #[async_trait]
    impl LanguageModel for Model {
        async fn complete(&self, system: &str, user: &str) -> Result<String>;
    }
}

/// A model that answers every request with `reply`
pub fn replying(reply: &'static str) -> MockModel {
    let mut model = MockModel::new();
    model
        .expect_complete()
        .returning(move |_, _| Ok(reply.to_string()));
    model
}
