//! Executes side effects returned by the reducer.
//!
//! Slow work (introspection, AI calls, query runs) runs on spawned tasks that report back
//! through the action channel. If the receiver is gone by then, the result is
//! dropped silently.

use std::sync::Arc;

use color_eyre::eyre::Result;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::effect::Effect;
use crate::ports::{QueryExecutor, Renderer, SchemaIntrospector};
use crate::schema_session::SchemaSession;
use crate::state::AppState;
use crate::translation::Translator;

pub struct EffectRunner {
    introspector: Arc<dyn SchemaIntrospector>,
    executor: Arc<dyn QueryExecutor>,
    translator: Arc<Translator>,
    session: Arc<SchemaSession>,
    exclude_columns: Arc<[String]>,
    action_tx: mpsc::Sender<Action>,
}

impl EffectRunner {
    pub fn new(
        introspector: Arc<dyn SchemaIntrospector>,
        executor: Arc<dyn QueryExecutor>,
        translator: Arc<Translator>,
        session: Arc<SchemaSession>,
        exclude_columns: Vec<String>,
        action_tx: mpsc::Sender<Action>,
    ) -> Self {
        Self {
            introspector,
            executor,
            translator,
            session,
            exclude_columns: exclude_columns.into(),
            action_tx,
        }
    }

    pub fn run(
        &self,
        effects: Vec<Effect>,
        renderer: &mut dyn Renderer,
        state: &AppState,
    ) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Render => renderer.draw(state)?,
                Effect::FetchSchema { dsn } => self.spawn_fetch_schema(dsn),
                Effect::Translate {
                    generation,
                    question,
                    model,
                } => {
                    let translator = Arc::clone(&self.translator);
                    let tx = self.action_tx.clone();
                    tokio::spawn(async move {
                        let result = translator.translate(&model, &question).await;
                        let _ = tx
                            .send(Action::TranslationFinished { generation, result })
                            .await;
                    });
                }
                Effect::Execute {
                    generation,
                    dsn,
                    sql,
                } => {
                    let executor = Arc::clone(&self.executor);
                    let tx = self.action_tx.clone();
                    tokio::spawn(async move {
                        let result = executor.execute(&dsn, &sql).await;
                        if let Err(e) = &result {
                            tracing::warn!(error = %e, "query execution failed");
                        }
                        let _ = tx
                            .send(Action::ExecutionFinished { generation, result })
                            .await;
                    });
                }
            }
        }
        Ok(())
    }

    fn spawn_fetch_schema(&self, dsn: String) {
        let introspector = Arc::clone(&self.introspector);
        let session = Arc::clone(&self.session);
        let exclude = Arc::clone(&self.exclude_columns);
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let action = match session.refresh(introspector.as_ref(), &dsn, &exclude).await {
                Ok(snapshot) => Action::SchemaLoaded(snapshot),
                Err(e) => {
                    tracing::error!(error = %e, "schema load failed");
                    Action::SchemaFailed {
                        summary: e.to_string(),
                        hint: e.hint().to_string(),
                    }
                }
            };
            let _ = tx.send(action).await;
        });
    }
}
