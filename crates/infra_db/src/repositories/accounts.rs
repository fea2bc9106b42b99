//! Account repository
//!
//! Database access for the chart of accounts. Active-only resolution is a
//! separate query from the unfiltered listing, mirroring the domain chart's
//! explicit `list_active` / `list_all` split.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use core_kernel::AccountId;
use domain_accounting::{default_chart, Account, AccountSubType, AccountType};

use crate::error::DatabaseError;

/// Repository for the chart of accounts
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

/// Flat account row joined with its sub type's fundamental type
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    code: String,
    name: String,
    sub_type_id: Uuid,
    account_type: String,
    parent_id: Option<Uuid>,
    description: Option<String>,
    is_archived: bool,
    editable: bool,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_domain(self) -> Result<Account, DatabaseError> {
        Ok(Account {
            id: self.id.into(),
            code: self.code,
            name: self.name,
            sub_type: self.sub_type_id.into(),
            account_type: parse_account_type(&self.account_type)?,
            parent_id: self.parent_id.map(Into::into),
            description: self.description,
            is_archived: self.is_archived,
            editable: self.editable,
            created_at: self.created_at,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "a.id, a.code, a.name, a.sub_type_id, s.account_type, \
     a.parent_id, a.description, a.is_archived, a.editable, a.created_at";

impl AccountRepository {
    /// Creates a new repository over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an account sub type
    pub async fn insert_sub_type(&self, sub_type: &AccountSubType) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO account_sub_types (id, name, account_type, description) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::from(sub_type.id))
        .bind(&sub_type.name)
        .bind(account_type_str(sub_type.account_type))
        .bind(&sub_type.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts an account
    ///
    /// # Errors
    ///
    /// `DuplicateEntry` when the code is already taken.
    pub async fn insert_account(&self, account: &Account) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO accounts \
             (id, code, name, sub_type_id, parent_id, description, is_archived, editable, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(Uuid::from(account.id))
        .bind(&account.code)
        .bind(&account.name)
        .bind(Uuid::from(account.sub_type))
        .bind(account.parent_id.map(Uuid::from))
        .bind(&account.description)
        .bind(account.is_archived)
        .bind(account.editable)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Seeds the default chart of accounts
    ///
    /// Run once at tenant setup, after the migrations.
    #[instrument(skip(self))]
    pub async fn seed_default_chart(&self) -> Result<(), DatabaseError> {
        let defaults = default_chart();
        for sub_type in &defaults.sub_types {
            self.insert_sub_type(sub_type).await?;
        }
        for account in &defaults.accounts {
            self.insert_account(account).await?;
        }
        Ok(())
    }

    /// Resolves a code to an active account
    ///
    /// # Errors
    ///
    /// `NotFound` when no active account carries the code.
    pub async fn find_active_by_code(&self, code: &str) -> Result<Account, DatabaseError> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts a \
             JOIN account_sub_types s ON s.id = a.sub_type_id \
             WHERE a.code = $1 AND a.is_archived = FALSE",
        );
        let row: Option<AccountRow> = sqlx::query_as(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| DatabaseError::not_found("Account", code))?
            .into_domain()
    }

    /// Lists active accounts, ordered by code
    pub async fn list_active(&self) -> Result<Vec<Account>, DatabaseError> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts a \
             JOIN account_sub_types s ON s.id = a.sub_type_id \
             WHERE a.is_archived = FALSE ORDER BY a.code",
        );
        let rows: Vec<AccountRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        rows.into_iter().map(AccountRow::into_domain).collect()
    }

    /// Lists every account, archived included, ordered by code
    pub async fn list_all(&self) -> Result<Vec<Account>, DatabaseError> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts a \
             JOIN account_sub_types s ON s.id = a.sub_type_id \
             ORDER BY a.code",
        );
        let rows: Vec<AccountRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        rows.into_iter().map(AccountRow::into_domain).collect()
    }

    /// Sets the archived flag on an account
    pub async fn archive(&self, id: AccountId) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE accounts SET is_archived = TRUE WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Account", id));
        }
        Ok(())
    }

    /// Hard-deletes an account
    ///
    /// # Errors
    ///
    /// `ForeignKeyViolation` while any transaction still references the
    /// account; the `ON DELETE RESTRICT` constraint enforces the guard.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: AccountId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Account", id));
        }
        Ok(())
    }
}

fn account_type_str(account_type: AccountType) -> &'static str {
    match account_type {
        AccountType::Asset => "asset",
        AccountType::Liability => "liability",
        AccountType::Equity => "equity",
        AccountType::Income => "income",
        AccountType::Expense => "expense",
    }
}

fn parse_account_type(value: &str) -> Result<AccountType, DatabaseError> {
    match value {
        "asset" => Ok(AccountType::Asset),
        "liability" => Ok(AccountType::Liability),
        "equity" => Ok(AccountType::Equity),
        "income" => Ok(AccountType::Income),
        "expense" => Ok(AccountType::Expense),
        other => Err(DatabaseError::ConstraintViolation(format!(
            "unknown account type '{other}'"
        ))),
    }
}
