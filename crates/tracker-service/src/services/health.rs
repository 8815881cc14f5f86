//! Readiness probing over every registered dependency

use tracing::instrument;

use crate::dto::ReadinessResponse;

use super::context::ServiceContext;

pub struct HealthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HealthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn readiness(&self) -> ReadinessResponse {
        let mut results = Vec::with_capacity(self.ctx.probes().len());
        for probe in self.ctx.probes() {
            results.push((probe.name(), probe.check().await));
        }
        ReadinessResponse::from_checks(results)
    }
}
