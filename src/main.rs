// Binario principal del engine de ciclo de vida de tenants
// Compile: cargo build --bin maizter-server
// Run: cargo run --bin maizter-server

use maizter_application::{MetricsAggregator, SchedulerManager, TransitionCoordinator};
use maizter_domain::schedule::{ScheduleAction, ScheduleDefinition};
use maizter_domain::schedule_store::ScheduleStore;
use maizter_domain::transition::Actor;
use maizter_domain::{StateHistoryLog, WorkloadController};
use maizter_infrastructure::{
    InMemoryScheduleStore, InMemoryStateHistoryLog, SimulatedWorkloadController,
};
use maizter_interface::{TenantCommandService, TenantQueryService};
use maizter_shared::{EngineConfig, TenantId};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configurar logging
    tracing_subscriber::fmt::init();

    info!("🚀 Starting Maizter Tenant Lifecycle Engine");

    let config = EngineConfig::from_env()?;
    config.validate()?;

    let history: Arc<dyn StateHistoryLog> = Arc::new(InMemoryStateHistoryLog::new());
    let workload: Arc<dyn WorkloadController> = Arc::new(SimulatedWorkloadController::new());
    let store = Arc::new(InMemoryScheduleStore::new());

    // Demo schedule: stop the sample tenant every weekday evening
    let tenant = TenantId::new();
    store
        .upsert(
            ScheduleDefinition::new(
                tenant.clone(),
                ScheduleAction::Stop,
                "0 20 * * 1-5",
                "Europe/Madrid",
            )
            .with_description("demo: weekday evening shutdown"),
        )
        .await;

    let coordinator = Arc::new(TransitionCoordinator::new(
        history.clone(),
        workload,
        &config,
    ));
    let scheduler = SchedulerManager::new(
        coordinator.clone(),
        store.clone() as Arc<dyn ScheduleStore>,
        &config,
    );
    scheduler.start().await?;

    let commands = TenantCommandService::new(coordinator);
    let queries = TenantQueryService::new(
        Arc::new(MetricsAggregator::new(history)),
        config.history_page_size,
    );

    let response = commands
        .start(&tenant, Actor::User("demo".to_string()))
        .await?;
    info!(tenant_id = %tenant, state = %response.state, "Demo tenant started");

    let current = queries.current_state(&tenant).await?;
    info!(tenant_id = %tenant, state = %current.state, "Current state");

    info!("Engine running; press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    scheduler.stop().await;
    info!("👋 Engine stopped");
    Ok(())
}
