//! Chart of accounts
//!
//! Stores the account hierarchy and answers the lookups the posting engine
//! and account administration depend on. Active-only resolution is an
//! explicit query; callers that need archived accounts ask for them with
//! `list_all`.

use std::collections::HashMap;

use core_kernel::{AccountId, AccountSubTypeId};

use crate::account::{default_chart, Account, AccountSubType};
use crate::error::AccountingError;

/// Sibling classification for an account
///
/// Sub types sharing the account's fundamental type, and the other accounts
/// of the same sub type.
#[derive(Debug, Clone)]
pub struct Siblings {
    pub sub_types: Vec<AccountSubType>,
    pub accounts: Vec<Account>,
}

/// The chart of accounts
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    sub_types: HashMap<AccountSubTypeId, AccountSubType>,
    accounts: HashMap<AccountId, Account>,
}

impl ChartOfAccounts {
    /// Creates an empty chart
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chart seeded with the default accounts
    pub fn with_defaults() -> Self {
        let mut chart = Self::new();
        let defaults = default_chart();
        for sub_type in defaults.sub_types {
            chart
                .add_sub_type(sub_type)
                .expect("default sub types are unique");
        }
        for account in defaults.accounts {
            chart
                .add_account(account)
                .expect("default account codes are unique");
        }
        chart
    }

    /// Adds a sub type to the chart
    ///
    /// # Errors
    ///
    /// Returns an error when a sub type with the same name exists.
    pub fn add_sub_type(&mut self, sub_type: AccountSubType) -> Result<(), AccountingError> {
        if self.sub_types.values().any(|s| s.name == sub_type.name) {
            return Err(AccountingError::DuplicateSubType(sub_type.name));
        }
        self.sub_types.insert(sub_type.id, sub_type);
        Ok(())
    }

    /// Adds an account to the chart
    ///
    /// # Errors
    ///
    /// - `DuplicateCode` when any account (archived included) carries the code
    /// - `SubTypeNotFound` when the account's sub type is not in the chart
    pub fn add_account(&mut self, account: Account) -> Result<(), AccountingError> {
        if self.accounts.values().any(|a| a.code == account.code) {
            return Err(AccountingError::DuplicateCode(account.code));
        }
        if !self.sub_types.contains_key(&account.sub_type) {
            return Err(AccountingError::SubTypeNotFound(account.sub_type.to_string()));
        }
        self.accounts.insert(account.id, account);
        Ok(())
    }

    /// Gets an account by id
    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Gets an account by code, archived or not
    pub fn get_by_code(&self, code: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.code == code)
    }

    /// Gets a sub type by id
    pub fn sub_type(&self, id: &AccountSubTypeId) -> Option<&AccountSubType> {
        self.sub_types.get(id)
    }

    /// Resolves a code to an active account
    ///
    /// # Errors
    ///
    /// - `AccountArchived` when the code matches only archived accounts
    /// - `AccountNotFound` when no account carries the code
    /// - `MultipleAccounts` when more than one active account matches
    pub fn resolve_active(&self, code: &str) -> Result<&Account, AccountingError> {
        let mut matches = self
            .accounts
            .values()
            .filter(|a| a.code == code && !a.is_archived);

        match (matches.next(), matches.next()) {
            (Some(account), None) => Ok(account),
            (Some(_), Some(_)) => Err(AccountingError::MultipleAccounts(code.to_string())),
            (None, _) => {
                if self.accounts.values().any(|a| a.code == code) {
                    Err(AccountingError::AccountArchived(code.to_string()))
                } else {
                    Err(AccountingError::AccountNotFound(code.to_string()))
                }
            }
        }
    }

    /// Lists active accounts, ordered by code
    pub fn list_active(&self) -> Vec<&Account> {
        let mut accounts: Vec<_> = self.accounts.values().filter(|a| !a.is_archived).collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }

    /// Lists every account, archived included, ordered by code
    pub fn list_all(&self) -> Vec<&Account> {
        let mut accounts: Vec<_> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }

    /// Returns the sibling classification for an account
    ///
    /// Pure query: sub types with the same fundamental type, and accounts of
    /// the same sub type excluding the account itself.
    pub fn siblings(&self, id: &AccountId) -> Result<Siblings, AccountingError> {
        let account = self
            .accounts
            .get(id)
            .ok_or_else(|| AccountingError::AccountNotFound(id.to_string()))?;

        let mut sub_types: Vec<_> = self
            .sub_types
            .values()
            .filter(|s| s.account_type == account.account_type)
            .cloned()
            .collect();
        sub_types.sort_by(|a, b| a.name.cmp(&b.name));

        let mut accounts: Vec<_> = self
            .accounts
            .values()
            .filter(|a| a.sub_type == account.sub_type && a.id != account.id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        Ok(Siblings { sub_types, accounts })
    }

    /// Renames or recodes an account
    ///
    /// # Errors
    ///
    /// - `AccountLocked` for system-reserved accounts
    /// - `DuplicateCode` when the new code is taken by another account
    pub fn rename_account(
        &mut self,
        id: &AccountId,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Result<(), AccountingError> {
        let code = code.into();
        let account = self
            .accounts
            .get(id)
            .ok_or_else(|| AccountingError::AccountNotFound(id.to_string()))?;
        if !account.editable {
            return Err(AccountingError::AccountLocked(account.code.clone()));
        }
        if self
            .accounts
            .values()
            .any(|a| a.code == code && a.id != *id)
        {
            return Err(AccountingError::DuplicateCode(code));
        }

        let account = self.accounts.get_mut(id).expect("looked up above");
        account.name = name.into();
        account.code = code;
        Ok(())
    }

    /// Archives an account
    ///
    /// Archived accounts stop resolving for new postings but keep their
    /// recorded transactions.
    ///
    /// # Errors
    ///
    /// Returns `AccountLocked` for system-reserved accounts.
    pub fn archive_account(&mut self, id: &AccountId) -> Result<(), AccountingError> {
        let account = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| AccountingError::AccountNotFound(id.to_string()))?;
        if !account.editable {
            return Err(AccountingError::AccountLocked(account.code.clone()));
        }
        account.is_archived = true;
        Ok(())
    }

    /// Removes an account from the chart
    ///
    /// The referential guard lives on [`crate::Ledger::delete_account`],
    /// which checks for recorded transactions before calling this.
    pub(crate) fn remove(&mut self, id: &AccountId) -> Option<Account> {
        self.accounts.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{codes, AccountType};

    #[test]
    fn test_resolve_active_distinguishes_archived_from_missing() {
        let mut chart = ChartOfAccounts::with_defaults();
        let id = chart.get_by_code("6001").unwrap().id;
        chart.archive_account(&id).unwrap();

        assert!(matches!(
            chart.resolve_active("6001"),
            Err(AccountingError::AccountArchived(_))
        ));
        assert!(matches!(
            chart.resolve_active("9999"),
            Err(AccountingError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let mut chart = ChartOfAccounts::with_defaults();
        let sub_type = chart.resolve_active("6000").unwrap().sub_type;
        let sub_type = chart.sub_type(&sub_type).unwrap().clone();

        let result = chart.add_account(Account::new("6000", "Shadow Expense", &sub_type));
        assert!(matches!(result, Err(AccountingError::DuplicateCode(_))));
    }

    #[test]
    fn test_siblings_excludes_self() {
        let chart = ChartOfAccounts::with_defaults();
        let rent = chart.get_by_code("6001").unwrap();

        let siblings = chart.siblings(&rent.id).unwrap();
        assert!(siblings
            .sub_types
            .iter()
            .all(|s| s.account_type == AccountType::Expense));
        assert!(siblings.accounts.iter().all(|a| a.id != rent.id));
        assert!(siblings.accounts.iter().any(|a| a.code == "6002"));
    }

    #[test]
    fn test_rename_guards_reserved_accounts() {
        let mut chart = ChartOfAccounts::with_defaults();
        let receivable = chart.get_by_code(codes::ACCOUNTS_RECEIVABLE).unwrap().id;

        let result = chart.rename_account(&receivable, "Trade Debtors", "1201");
        assert!(matches!(result, Err(AccountingError::AccountLocked(_))));

        let editable = chart.get_by_code("6002").unwrap().id;
        chart
            .rename_account(&editable, "Power & Water", "6002-1")
            .unwrap();
        assert_eq!(chart.get(&editable).unwrap().code, "6002-1");
    }

    #[test]
    fn test_list_active_hides_archived() {
        let mut chart = ChartOfAccounts::with_defaults();
        let total = chart.list_all().len();
        let id = chart.get_by_code("1100").unwrap().id;
        chart.archive_account(&id).unwrap();

        assert_eq!(chart.list_active().len(), total - 1);
        assert_eq!(chart.list_all().len(), total);
    }
}
