use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::service::{
    funnel::FunnelService, payout::PayoutService, reconcile::ReconciliationService,
};

use super::config::{funnel as funnel_config, payout_sweep as payout_sweep_config, reconcile as reconcile_config};

macro_rules! add_cron_job {
    ($sched:expr, $cron:expr, $db:expr, $body:expr, $name:expr) => {{
        let db_clone = $db.clone();

        $sched
            .add(Job::new_async($cron, move |_, _| {
                let db = db_clone.clone();

                Box::pin(async move {
                    match $body(db).await {
                        Ok(count) => tracing::info!("{} run finished ({count})", $name),
                        Err(e) => tracing::error!("{} run failed: {:?}", $name, e),
                    }
                })
            })?)
            .await?;
    }};
}

/// Initialize and start the cron job scheduler
pub async fn start_scheduler(db: &DatabaseConnection) -> Result<(), JobSchedulerError> {
    let sched = JobScheduler::new().await?;

    add_cron_job!(
        sched,
        funnel_config::CRON_EXPRESSION,
        db,
        |db: DatabaseConnection| async move {
            FunnelService::new(&db).recompute(Utc::now().naive_utc()).await
        },
        "Funnel recompute"
    );

    add_cron_job!(
        sched,
        reconcile_config::CRON_EXPRESSION,
        db,
        |db: DatabaseConnection| async move {
            ReconciliationService::new(&db).reconcile_counters().await
        },
        "Counter reconciliation"
    );

    add_cron_job!(
        sched,
        payout_sweep_config::CRON_EXPRESSION,
        db,
        |db: DatabaseConnection| async move {
            PayoutService::new(&db)
                .run_monthly_sweep(Utc::now().naive_utc())
                .await
        },
        "Payout sweep"
    );

    sched.start().await?;
    Ok(())
}
