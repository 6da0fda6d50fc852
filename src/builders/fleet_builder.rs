//! Builders to construct the mail pool and delivery robots from configuration.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::AutomailConfig;
use crate::core::{
    DeliveryRobot, InMemoryAuditSink, Mail, MailPool, PoolError, Robot, RobotHandle, RobotId,
};

/// Build one delivery robot per configured kind, with ids starting at 1.
pub fn build_fleet<M>(cfg: &AutomailConfig) -> Result<Vec<RobotHandle<DeliveryRobot<M>>>, PoolError>
where
    M: Mail,
{
    cfg.validate()
        .map_err(|e| PoolError::InvalidConfig(format!("config invalid: {e}")))?;

    let fleet = (1..)
        .zip(&cfg.robots)
        .map(|(id, kind): (RobotId, _)| DeliveryRobot::new(id, *kind).into_handle())
        .collect::<Vec<_>>();
    tracing::info!("built fleet of {} robots", fleet.len());
    Ok(fleet)
}

/// Build a mail pool with the configured intake rules.
///
/// When `audit_capacity` is non-zero an [`InMemoryAuditSink`] is attached and
/// also returned so the caller can read it back.
pub fn build_pool<M, R>(
    cfg: &AutomailConfig,
) -> Result<(MailPool<M, R>, Option<Arc<Mutex<InMemoryAuditSink>>>), PoolError>
where
    M: Mail,
    R: Robot<M>,
{
    cfg.validate()
        .map_err(|e| PoolError::InvalidConfig(format!("config invalid: {e}")))?;

    let pool = MailPool::with_rules(cfg.pool.intake_rules());
    if cfg.pool.audit_capacity == 0 {
        return Ok((pool, None));
    }

    let sink = Arc::new(Mutex::new(InMemoryAuditSink::new(cfg.pool.audit_capacity)));
    let pool = pool.with_audit(Box::new(Arc::clone(&sink)));
    Ok((pool, Some(sink)))
}
