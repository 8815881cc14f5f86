use async_trait::async_trait;

/// A dependency the readiness endpoint should probe
#[async_trait]
pub trait HealthProbe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self) -> bool;
}
