use sea_orm::{QueryOrder, prelude::*};

use crate::{
    Identity, ResultEngine,
    logs::{self, LogAction, LogEntry},
};

use super::Engine;

impl Engine {
    /// Appends an entry to the audit log.
    ///
    /// Failures are logged and swallowed: the audit trail never fails the
    /// operation that triggered it.
    pub(super) async fn record_action(
        &self,
        action: LogAction,
        product: &str,
        quantity: i64,
        user: &str,
    ) {
        let entry = LogEntry::new(action, product, quantity, user);
        if let Err(err) = logs::Entity::insert(logs::ActiveModel::from(&entry))
            .exec(&self.database)
            .await
        {
            tracing::warn!("failed to record {} of {product}: {err}", action.as_str());
        }
    }

    /// Lists the audit log, most recent entry first.
    pub async fn list_logs(&self, identity: &Identity) -> ResultEngine<Vec<LogEntry>> {
        tracing::debug!("{} listed audit log", identity.username);
        let rows = logs::Entity::find()
            .order_by_desc(logs::Column::Date)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(LogEntry::from).collect())
    }
}
