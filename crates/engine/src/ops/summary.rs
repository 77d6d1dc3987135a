use std::collections::HashMap;

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{Expense, ResultEngine, Summary, categories, expenses, summarize};

use super::{Engine, with_tx};

impl Engine {
    /// Aggregates every expense of `user_id`.
    pub async fn summary(&self, user_id: &str) -> ResultEngine<Summary> {
        with_tx!(self, |db_tx| {
            let rows: Vec<Expense> = expenses::Entity::find()
                .filter(expenses::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Expense::from)
                .collect();

            let mut category_ids: Vec<String> =
                rows.iter().map(|expense| expense.category_id.clone()).collect();
            category_ids.sort();
            category_ids.dedup();

            let names: HashMap<String, String> = categories::Entity::find()
                .filter(categories::Column::Id.is_in(category_ids))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| (model.id, model.name))
                .collect();

            Ok(summarize(&rows, &names))
        })
    }
}
