use std::{future::Future, pin::Pin, sync::Arc};

use galleria_core::{
    artifact::ArtifactLocator,
    error::Result,
    provider::{GenerateParameters, GenerationProvider},
};

use crate::{ReplicateAdapter, error::ReplicateError, model_map::map_model};

impl GenerationProvider for ReplicateAdapter {
    fn generate<'p>(
        &'p self,
        params: GenerateParameters,
    ) -> Pin<Box<dyn Future<Output = Result<ArtifactLocator>> + Send + 'p>> {
        let client = Arc::clone(&self.client);

        Box::pin(async move {
            let model = map_model(&params.model)?;

            #[cfg(feature = "tracing")]
            tracing::info!(model = %params.model, prompt = ?params.prompt(), "starting replicate prediction");

            let prediction = match client.run(&model, params.input).await {
                Ok(prediction) => prediction,
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!(model = %params.model, error = %e, "replicate prediction failed");
                    return Err(e.into());
                }
            };

            let url = prediction.first_output_url().ok_or_else(|| {
                ReplicateError::Format(format!(
                    "prediction {} succeeded without an output url",
                    prediction.id
                ))
            })?;

            #[cfg(feature = "tracing")]
            tracing::info!(prediction = %prediction.id, %url, "replicate prediction succeeded");

            Ok(ArtifactLocator::new(url))
        })
    }
}
