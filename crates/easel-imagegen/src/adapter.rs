use std::sync::Arc;

use easel_config::{Config, LimitsConfig, UserValves, Valves};

use crate::{
    backend::ImageBackend,
    emit::{self, Emission},
    encode,
    error::Result,
    request::GenerationRequest,
    status::StatusSink,
};

/// Prompt characters kept in generated alt text
const ALT_TEXT_PROMPT_CHARS: usize = 50;

/// Turns a `generate_image` tool call into an embeddable result string
///
/// Holds only read-only configuration, so one adapter serves any number of
/// concurrent invocations.
pub struct ImageRequestAdapter {
    backend: Arc<dyn ImageBackend>,
    limits: LimitsConfig,
    valves: Valves,
    user_valves: UserValves,
}

impl ImageRequestAdapter {
    pub fn new(backend: Arc<dyn ImageBackend>, config: &Config) -> Self {
        Self {
            backend,
            limits: config.limits.clone(),
            valves: config.valves.clone(),
            user_valves: config.user_valves.clone(),
        }
    }

    pub fn valves(&self) -> &Valves {
        &self.valves
    }

    /// Run one invocation: validate, generate, encode, emit
    ///
    /// Exactly one backend call is made for a valid request and none for an
    /// invalid one.
    pub async fn generate_image(&self, request: &GenerationRequest, status: &dyn StatusSink) -> Result<String> {
        let result = self.run(request, status).await;
        self.finish(result, status).await
    }

    /// Same as [`generate_image`](Self::generate_image), starting from raw
    /// tool-call arguments
    ///
    /// Arguments that do not parse fail like any other invalid request.
    pub async fn generate_image_from_json(
        &self,
        arguments: serde_json::Value,
        status: &dyn StatusSink,
    ) -> Result<String> {
        match GenerationRequest::from_json(arguments) {
            Ok(request) => self.generate_image(&request, status).await,
            Err(e) => self.finish(Err(e), status).await,
        }
    }

    async fn finish(&self, result: Result<String>, status: &dyn StatusSink) -> Result<String> {
        match &result {
            Ok(_) => self.report(status, "Image generation complete", true).await,
            Err(e) => {
                tracing::error!(error = %e, "image generation failed");
                self.report(status, &format!("Error: {e}"), true).await;
            }
        }

        result
    }

    async fn run(&self, request: &GenerationRequest, status: &dyn StatusSink) -> Result<String> {
        self.report(status, "Initializing image generation...", false).await;

        request.validate(&self.limits)?;

        tracing::info!(
            backend = self.backend.name(),
            prompt_chars = request.prompt.chars().count(),
            width = ?request.width,
            height = ?request.height,
            steps = ?request.steps,
            "generating image"
        );

        self.report(status, "Generating image...", false).await;

        let generated = self.backend.generate(request).await?;
        let src = encode::resolve(&generated.image_reference, &self.valves).await?;

        let alt = alt_text(&request.prompt, self.user_valves.auto_alt_text);
        let emission = Emission {
            src: &src,
            alt: &alt,
            width: request.width,
            height: request.height,
        };

        let (method, output) = emit::emit(&self.valves.emission_order(), &emission)?;

        tracing::info!(%method, kind = generated.image_reference.kind(), "image emitted");

        Ok(output)
    }

    async fn report(&self, status: &dyn StatusSink, description: &str, done: bool) {
        if self.user_valves.show_processing_status {
            status.update(description, done).await;
        }
    }
}

/// Alt text for the emitted image
pub fn alt_text(prompt: &str, auto: bool) -> String {
    if !auto {
        return "generated_image_1".to_string();
    }

    let prompt = prompt.trim();
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(ALT_TEXT_PROMPT_CHARS).collect();

    if chars.next().is_some() {
        format!("Generated image: {head}...")
    } else {
        format!("Generated image: {head}")
    }
}
