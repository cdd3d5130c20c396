//! Explain and improve requests against the generative-language service.
//!
//! Each request builds one prompt, makes one completion call and returns the
//! text. There is no retry and no parsing of the model's answer apart from
//! looking for the "nothing to improve" token.

use std::sync::Arc;

use crate::errors::CodepadError;
use crate::llm::LLM;

/// Token the model is asked to reply with when the code needs no changes.
pub const NO_IMPROVEMENTS_TOKEN: &str = "NO_IMPROVEMENTS_NEEDED";
/// What the caller sees instead of the token.
pub const NO_IMPROVEMENTS_MESSAGE: &str = "No improvements needed.";

pub fn explain_prompt(code: &str, language: &str) -> String {
    format!(
        "You are a patient programming tutor. Explain what the following {language} code does, \
         step by step, in plain language a beginner can follow. Mention any bugs or surprising \
         behaviour you notice. Keep the explanation concise.\n\n\
         ```{language}\n{code}\n```"
    )
}

pub fn improve_prompt(code: &str, language: &str) -> String {
    format!(
        "You are an experienced {language} developer reviewing a colleague's code. Rewrite the \
         code below so that it is more correct, readable and idiomatic, keeping its behaviour. \
         Reply with the improved code only, without commentary. If the code is already as good \
         as it reasonably can be, reply with exactly {NO_IMPROVEMENTS_TOKEN} and nothing else.\n\n\
         ```{language}\n{code}\n```"
    )
}

pub struct Requester {
    llm: Arc<dyn LLM>,
}

impl Requester {
    pub fn new(llm: Arc<dyn LLM>) -> Self {
        Self { llm }
    }

    pub async fn explain(&self, code: &str, language: &str) -> Result<String, CodepadError> {
        log::debug!("Requesting explanation for {} bytes of {}", code.len(), language);
        self.llm.complete(&explain_prompt(code, language)).await
    }

    pub async fn improve(&self, code: &str, language: &str) -> Result<String, CodepadError> {
        log::debug!("Requesting improvement for {} bytes of {}", code.len(), language);
        let response = self.llm.complete(&improve_prompt(code, language)).await?;

        if response.contains(NO_IMPROVEMENTS_TOKEN) {
            log::info!("Model found nothing to improve in the {} code", language);
            return Ok(NO_IMPROVEMENTS_MESSAGE.to_string());
        }
        Ok(response)
    }
}
