use chrono::Utc;
use sea_orm::prelude::*;

use crate::{
    Identity, ResultEngine,
    suppliers::{self, Supplier},
};

use super::{Engine, normalize_required_name};

impl Engine {
    pub async fn add_supplier(&self, identity: &Identity, name: &str) -> ResultEngine<Supplier> {
        let name = normalize_required_name(name, "supplier")?;
        let supplier = Supplier::new(name, identity.username.clone(), Utc::now());
        suppliers::Entity::insert(suppliers::ActiveModel::from(&supplier))
            .exec(&self.database)
            .await?;
        tracing::info!("{} added supplier {}", identity.username, supplier.id);
        Ok(supplier)
    }

    /// Lists suppliers in store order.
    pub async fn list_suppliers(&self, identity: &Identity) -> ResultEngine<Vec<Supplier>> {
        tracing::debug!("{} listed suppliers", identity.username);
        let rows = suppliers::Entity::find().all(&self.database).await?;
        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    /// Deletes a supplier. Deleting a missing id is not an error.
    pub async fn delete_supplier(&self, identity: &Identity, id: &str) -> ResultEngine<()> {
        suppliers::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        tracing::info!("{} deleted supplier {id}", identity.username);
        Ok(())
    }
}
