use impact_client::domain::UserConsumption;

use crate::{
    engine,
    pipeline::{Envelope, PipelineError, Transform},
};

/// Pure validation of a `UserConsumption` record.
///
/// Rules:
/// - user_id must be non-empty.
/// - measurements must be finite and non-negative.
/// - household size, when known, must be at least 1.
pub fn validate_user_consumption(
    env: Envelope<UserConsumption>,
) -> Result<Envelope<UserConsumption>, PipelineError> {
    let c = &env.payload;

    if c.user_id.trim().is_empty() {
        return Err(PipelineError::Validation("user_id must be non-empty".to_string()));
    }

    engine::validate_record(&c.record)
        .map_err(|e| PipelineError::Validation(format!("user {}: {e}", c.user_id)))?;

    Ok(env)
}

#[derive(Clone, Default)]
pub struct ConsumptionValidation;

#[async_trait::async_trait]
impl Transform<UserConsumption, UserConsumption> for ConsumptionValidation {
    async fn apply(
        &self,
        input: Envelope<UserConsumption>,
    ) -> Result<Envelope<UserConsumption>, PipelineError> {
        match validate_user_consumption(input) {
            Ok(env) => Ok(env),
            Err(e) => {
                metrics::counter!("consumption_validation_rejected_total").increment(1);
                Err(e)
            }
        }
    }
}
