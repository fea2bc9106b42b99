//! Account types for the chart of accounts
//!
//! Accounts are classified through sub types: each sub type groups accounts
//! under one of the five fundamental types, and the fundamental type decides
//! which side of the ledger increases an account's balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, AccountSubTypeId};

/// The five fundamental account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset accounts (debit normal balance)
    Asset,
    /// Liability accounts (credit normal balance)
    Liability,
    /// Equity accounts (credit normal balance)
    Equity,
    /// Income accounts (credit normal balance)
    Income,
    /// Expense accounts (debit normal balance)
    Expense,
}

impl AccountType {
    /// Returns true if this account type has a debit normal balance
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }
}

/// Groups accounts under a fundamental type
///
/// Sub types give more specificity to account types, e.g. Cash & Bank is an
/// Asset, Current Liability is a Liability. The classification is immutable;
/// postings never touch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSubType {
    /// Unique identifier
    pub id: AccountSubTypeId,
    /// Sub type name (unique per chart)
    pub name: String,
    /// The fundamental type every account of this sub type carries
    pub account_type: AccountType,
    /// Description
    pub description: Option<String>,
}

impl AccountSubType {
    /// Creates a new sub type
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: AccountSubTypeId::new_v7(),
            name: name.into(),
            account_type,
            description: None,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A financial account in the chart of accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Human-assigned account code (e.g., "1200"), unique per chart
    pub code: String,
    /// Account name
    pub name: String,
    /// Sub type this account belongs to
    pub sub_type: AccountSubTypeId,
    /// Fundamental type, copied from the sub type at creation
    pub account_type: AccountType,
    /// Parent account, when this is a sub-account
    pub parent_id: Option<AccountId>,
    /// Description
    pub description: Option<String>,
    /// Archived accounts may not receive new postings
    pub is_archived: bool,
    /// False for system-reserved accounts used by automated postings
    pub editable: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account under the given sub type
    ///
    /// # Arguments
    ///
    /// * `code` - Account code, unique per chart
    /// * `name` - Account name
    /// * `sub_type` - The sub type that classifies this account
    pub fn new(code: impl Into<String>, name: impl Into<String>, sub_type: &AccountSubType) -> Self {
        Self {
            id: AccountId::new_v7(),
            code: code.into(),
            name: name.into(),
            sub_type: sub_type.id,
            account_type: sub_type.account_type,
            parent_id: None,
            description: None,
            is_archived: false,
            editable: true,
            created_at: Utc::now(),
        }
    }

    /// Sets the parent account
    pub fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the account as system-reserved
    ///
    /// Reserved accounts are referenced by code from the automated posting
    /// mappings and cannot be renamed, recoded or archived by users.
    pub fn system(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Returns true when this account has a parent
    pub fn is_sub_account(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Reserved account codes used by the automated posting mappings
pub mod codes {
    /// Default deposit account for payments
    pub const CASH_AND_BANK: &str = "1000";
    /// Amounts owed by clients on open invoices
    pub const ACCOUNTS_RECEIVABLE: &str = "1200";
    /// Inventory on hand
    pub const STOCK: &str = "1300";
    /// Amounts owed to vendors on open bills
    pub const ACCOUNTS_PAYABLE: &str = "2100";
    /// Taxes collected on sales
    pub const TAX_PAYABLE: &str = "2200";
    /// Income from sales of goods and services
    pub const SALES_REVENUE: &str = "4000";
    /// Taxes paid on purchases and expenses
    pub const TAX_EXPENSE: &str = "5100";
}

/// The seeded chart of accounts for a new organisation
#[derive(Debug, Clone)]
pub struct DefaultChart {
    pub sub_types: Vec<AccountSubType>,
    pub accounts: Vec<Account>,
}

/// Creates the default chart of accounts
///
/// Every organisation starts from this chart. Accounts referenced by the
/// posting mappings carry the reserved codes above and are not editable.
pub fn default_chart() -> DefaultChart {
    let cash = AccountSubType::new("Cash & Bank", AccountType::Asset)
        .with_description("Money held in cash or at the bank");
    let receivable = AccountSubType::new("Accounts Receivable", AccountType::Asset);
    let stock = AccountSubType::new("Stock", AccountType::Asset);
    let fixed_asset = AccountSubType::new("Fixed Asset", AccountType::Asset);
    let current_liability = AccountSubType::new("Current Liability", AccountType::Liability);
    let equity = AccountSubType::new("Equity", AccountType::Equity);
    let sales = AccountSubType::new("Sales", AccountType::Income);
    let operating_expense = AccountSubType::new("Operating Expense", AccountType::Expense);

    let accounts = vec![
        Account::new(codes::CASH_AND_BANK, "Cash & Bank", &cash).system(),
        Account::new("1100", "Petty Cash", &cash),
        Account::new(codes::ACCOUNTS_RECEIVABLE, "Accounts Receivable", &receivable).system(),
        Account::new(codes::STOCK, "Stock", &stock).system(),
        Account::new("1400", "Office Equipment", &fixed_asset),
        Account::new(codes::ACCOUNTS_PAYABLE, "Accounts Payable", &current_liability).system(),
        Account::new(codes::TAX_PAYABLE, "Tax Payable", &current_liability).system(),
        Account::new("3000", "Owner's Equity", &equity),
        Account::new(codes::SALES_REVENUE, "Sales Revenue", &sales).system(),
        Account::new("4100", "Other Income", &sales),
        Account::new(codes::TAX_EXPENSE, "Tax Expense", &operating_expense).system(),
        Account::new("6000", "General Expense", &operating_expense),
        Account::new("6001", "Rent Expense", &operating_expense),
        Account::new("6002", "Utilities Expense", &operating_expense),
    ];

    DefaultChart {
        sub_types: vec![
            cash,
            receivable,
            stock,
            fixed_asset,
            current_liability,
            equity,
            sales,
            operating_expense,
        ],
        accounts,
    }
}
