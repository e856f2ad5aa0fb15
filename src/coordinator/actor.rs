use crate::config::SourceFormat;
use crate::db::{InsertOutcome, PatchRow, PatchStore};
use crate::error::PatchwatchError;
use crate::notify::NotificationSink;
use crate::scrape::{SourceFetcher, extract};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::sync::Arc;
use tracing::{info, warn};

/// Per-cycle outcome counts. Trigger endpoints only log these; they exist for
/// observability and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStats {
    pub inserted: usize,
    pub duplicates: usize,
    pub failures: usize,
}

#[derive(Debug)]
pub enum CoordinatorMessage {
    /// Run one full fetch-extract-insert-notify pass.
    Refresh(RpcReplyPort<RefreshStats>),

    /// List the most recent `n` persisted patches, newest first.
    ListRecent(u32, RpcReplyPort<Result<Vec<PatchRow>, PatchwatchError>>),
}

#[derive(Clone)]
pub struct CoordinatorHandle {
    actor: ActorRef<CoordinatorMessage>,
}

impl CoordinatorHandle {
    /// Runs one scrape cycle, serialized behind any in-flight operation.
    /// Per-record failures stay inside the cycle; only losing the actor
    /// itself surfaces as an error.
    pub async fn refresh(&self) -> Result<RefreshStats, PatchwatchError> {
        ractor::call!(self.actor, CoordinatorMessage::Refresh)
            .map_err(|e| PatchwatchError::Actor(format!("Coordinator Refresh RPC failed: {e}")))
    }

    pub async fn list_recent(&self, n: u32) -> Result<Vec<PatchRow>, PatchwatchError> {
        ractor::call!(self.actor, CoordinatorMessage::ListRecent, n)
            .map_err(|e| PatchwatchError::Actor(format!("Coordinator ListRecent RPC failed: {e}")))?
    }
}

pub struct CoordinatorArgs {
    pub store: PatchStore,
    pub fetcher: Arc<dyn SourceFetcher>,
    pub sink: Arc<dyn NotificationSink>,
    pub format: SourceFormat,
}

struct CoordinatorState {
    store: PatchStore,
    fetcher: Arc<dyn SourceFetcher>,
    sink: Arc<dyn NotificationSink>,
    format: SourceFormat,
}

struct CoordinatorActor;

#[ractor::async_trait]
impl Actor for CoordinatorActor {
    type Msg = CoordinatorMessage;
    type State = CoordinatorState;
    type Arguments = CoordinatorArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!("Coordinator initialized");
        Ok(CoordinatorState {
            store: args.store,
            fetcher: args.fetcher,
            sink: args.sink,
            format: args.format,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            CoordinatorMessage::Refresh(reply) => {
                let stats = run_scrape_cycle(state).await;
                let _ = reply.send(stats);
            }
            CoordinatorMessage::ListRecent(n, reply) => {
                let res = state.store.list_recent(n).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

/// One scrape pass. A fetch failure aborts the pass with zero writes. Each
/// candidate commits independently; a duplicate or failed candidate never
/// aborts the rest of the batch. The notification fires only after a commit,
/// so rescrapes cannot re-announce a record.
async fn run_scrape_cycle(state: &CoordinatorState) -> RefreshStats {
    info!("Updating patches");
    let mut stats = RefreshStats::default();

    let raw = match state.fetcher.fetch().await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to fetch source: {e}");
            return stats;
        }
    };

    for candidate in extract(&raw, state.format) {
        match state.store.insert_if_absent(&candidate).await {
            Ok(InsertOutcome::Inserted) => {
                stats.inserted += 1;
                info!(name = %candidate.name, "New patch recorded; posting notification");
                state
                    .sink
                    .notify(&format!("{}\n{}", candidate.name, candidate.title))
                    .await;
            }
            Ok(InsertOutcome::AlreadyExists) => stats.duplicates += 1,
            Err(e) => {
                stats.failures += 1;
                warn!(name = %candidate.name, "Failed to record patch: {e}");
            }
        }
    }

    stats
}

/// Spawn the coordinator actor and return a cloneable handle.
pub async fn spawn(args: CoordinatorArgs) -> CoordinatorHandle {
    let (actor, _jh) = Actor::spawn(None, CoordinatorActor, args)
        .await
        .expect("failed to spawn Coordinator");

    CoordinatorHandle { actor }
}
