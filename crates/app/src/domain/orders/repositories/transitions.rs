//! Order Transitions Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use joinery::{
    authorization::UserUuid,
    orders::{OrderUuid, StatusChange, StatusField, TransitionKind},
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{columns::try_get_literal, domain::orders::models::OrderTransition};

const INSERT_TRANSITION_SQL: &str = include_str!("../sql/insert_transition.sql");
const LIST_TRANSITIONS_SQL: &str = include_str!("../sql/list_transitions.sql");

/// An audit row to append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NewTransition {
    pub order: OrderUuid,
    pub actor: UserUuid,
    pub field: StatusField,
    pub from: Option<&'static str>,
    pub to: &'static str,
    pub kind: TransitionKind,
    pub at: Timestamp,
}

impl NewTransition {
    pub(crate) fn from_change(
        order: OrderUuid,
        actor: UserUuid,
        change: &StatusChange,
        at: Timestamp,
    ) -> Self {
        Self {
            order,
            actor,
            field: change.field(),
            from: Some(change.old_value()),
            to: change.new_value(),
            kind: change.kind(),
            at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderTransitionsRepository;

impl PgOrderTransitionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transition: NewTransition,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_TRANSITION_SQL)
            .bind(Uuid::now_v7())
            .bind(transition.order.into_uuid())
            .bind(transition.actor.into_uuid())
            .bind(transition.field.as_str())
            .bind(transition.from)
            .bind(transition.to)
            .bind(transition.kind.as_str())
            .bind(SqlxTimestamp::from(transition.at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// The audit trail of one order, oldest first.
    pub(crate) async fn list_transitions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderTransition>, sqlx::Error> {
        query_as::<Postgres, OrderTransition>(LIST_TRANSITIONS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderTransition {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            actor: UserUuid::from_uuid(row.try_get("actor_uuid")?),
            field: try_get_literal(row, "field")?,
            from: row.try_get("from_value")?,
            to: row.try_get("to_value")?,
            kind: try_get_literal(row, "kind")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
