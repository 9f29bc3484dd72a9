use async_trait::async_trait;
use taskloom_core::api::DecompositionBackend;

/// Treats the prompt itself as the decomposition: callers hand in task
/// blocks or a JSON task list they already have.
#[derive(Debug, Default, Clone)]
pub struct PassthroughBackend;

#[async_trait]
impl DecompositionBackend for PassthroughBackend {
    fn name(&self) -> &str {
        "passthrough"
    }

    async fn decompose(&self, prompt: &str) -> anyhow::Result<String> {
        if prompt.trim().is_empty() {
            anyhow::bail!("empty prompt: nothing to decompose");
        }
        Ok(prompt.to_string())
    }
}
