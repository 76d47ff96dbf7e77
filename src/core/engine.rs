//! Bank engine: command routing over the core services
//!
//! The engine owns one instance of each core component wired to a shared
//! pair of stores, and routes typed [`Command`]s to the owning component.
//! It is the single entry point the processing strategies (and the e2e
//! tests) drive.
//!
//! All state lives behind `Arc`ed, thread-safe stores, so one engine can
//! be shared across worker threads; see the async strategy.

use std::sync::Arc;

use crate::auth::{LoginOutcome, LoginService, LoginThrottle, ThrottleConfig, TokenSigner};
use crate::core::accounts::AccountService;
use crate::core::history::{HistoryPage, HistoryService};
use crate::core::ledger::{LedgerService, MovementReceipt, TransferReceipt};
use crate::store::{AccountStore, MemoryAccountStore, MemoryTransactionStore, TransactionStore};
use crate::types::{AccountProfile, BankError, Command, Transaction};

/// Signing secret used when none is configured
///
/// Fine for local batch runs; a deployment wraps the engine with its own
/// secret.
pub const DEFAULT_TOKEN_SECRET: &str = "local-development-secret";

/// Engine construction knobs
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Login throttle tuning
    pub throttle: ThrottleConfig,
    /// Secret the session-token signer is keyed with
    pub token_secret: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            throttle: ThrottleConfig::default(),
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
        }
    }
}

/// Result of executing one command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Registered(AccountProfile),
    LoggedIn(LoginOutcome),
    Account(Option<AccountProfile>),
    Updated(AccountProfile),
    AccountDeleted,
    Deposited(MovementReceipt),
    Withdrawn(MovementReceipt),
    Transferred(TransferReceipt),
    History(HistoryPage),
    TransactionDeleted(Transaction),
}

impl CommandOutcome {
    /// One-line human summary, used by the strategies' progress logging
    pub fn summary(&self) -> String {
        match self {
            CommandOutcome::Registered(profile) => format!(
                "registered '{}' with account {}",
                profile.username, profile.account_number
            ),
            CommandOutcome::LoggedIn(LoginOutcome::Authenticated(session)) => {
                format!("'{}' authenticated", session.email)
            }
            CommandOutcome::LoggedIn(LoginOutcome::NoMatch { attempts }) => {
                format!("login failed (attempt {attempts})")
            }
            CommandOutcome::LoggedIn(LoginOutcome::LockedOut {
                minutes_remaining, ..
            }) => format!("login locked out for {minutes_remaining} more minutes"),
            CommandOutcome::Account(Some(profile)) => format!(
                "account '{}' has balance {}",
                profile.username, profile.balance
            ),
            CommandOutcome::Account(None) => "account not found".to_string(),
            CommandOutcome::Updated(profile) => {
                format!("updated account '{}'", profile.username)
            }
            CommandOutcome::AccountDeleted => "account deleted".to_string(),
            CommandOutcome::Deposited(receipt) => format!(
                "deposited {} into {} (balance {})",
                receipt.amount, receipt.account_number, receipt.balance_after
            ),
            CommandOutcome::Withdrawn(receipt) => format!(
                "withdrew {} from {} (balance {})",
                receipt.amount, receipt.account_number, receipt.balance_after
            ),
            CommandOutcome::Transferred(receipt) => format!(
                "transferred {} from {} to {}",
                receipt.amount, receipt.from_account, receipt.to_account
            ),
            CommandOutcome::History(page) => format!(
                "history page {}/{} ({} records)",
                page.page_number, page.total_pages, page.count
            ),
            CommandOutcome::TransactionDeleted(tx) => {
                format!("deleted transaction {}", tx.transaction_id)
            }
        }
    }
}

/// The banking core behind a single command-shaped entry point
pub struct BankEngine {
    account_store: Arc<dyn AccountStore>,
    accounts: AccountService,
    ledger: LedgerService,
    history: HistoryService,
    login: LoginService,
}

impl BankEngine {
    /// Create an engine over fresh in-memory stores
    pub fn new(config: EngineConfig) -> Self {
        Self::with_stores(
            config,
            Arc::new(MemoryAccountStore::new()),
            Arc::new(MemoryTransactionStore::new()),
        )
    }

    /// Create an engine over caller-provided stores
    pub fn with_stores(
        config: EngineConfig,
        account_store: Arc<dyn AccountStore>,
        transaction_store: Arc<dyn TransactionStore>,
    ) -> Self {
        BankEngine {
            accounts: AccountService::new(Arc::clone(&account_store)),
            ledger: LedgerService::new(Arc::clone(&account_store), Arc::clone(&transaction_store)),
            history: HistoryService::new(Arc::clone(&account_store), Arc::clone(&transaction_store)),
            login: LoginService::new(
                Arc::clone(&account_store),
                LoginThrottle::new(config.throttle),
                TokenSigner::new(&config.token_secret),
            ),
            account_store,
        }
    }

    /// Route one command to the owning component
    pub fn execute(&self, command: Command) -> Result<CommandOutcome, BankError> {
        match command {
            Command::Register(new_account) => {
                Ok(CommandOutcome::Registered(self.accounts.register(new_account)?))
            }
            Command::Login { email, password } => Ok(CommandOutcome::LoggedIn(
                self.login.check_login(&email, &password),
            )),
            Command::GetAccount { username } => {
                Ok(CommandOutcome::Account(self.accounts.get_account(&username)))
            }
            Command::UpdateAccount {
                username,
                field,
                value,
                password,
            } => Ok(CommandOutcome::Updated(self.accounts.update_field(
                &username, field, &value, &password,
            )?)),
            Command::DeleteAccount { username, password } => {
                self.accounts.delete_account(&username, &password)?;
                Ok(CommandOutcome::AccountDeleted)
            }
            Command::Deposit {
                username,
                amount,
                pin,
            } => Ok(CommandOutcome::Deposited(
                self.ledger.deposit(&username, amount, &pin)?,
            )),
            Command::Withdraw {
                username,
                amount,
                pin,
            } => Ok(CommandOutcome::Withdrawn(
                self.ledger.withdraw(&username, amount, &pin)?,
            )),
            Command::Transfer {
                username,
                amount,
                description,
                to_account,
                pin,
            } => Ok(CommandOutcome::Transferred(self.ledger.transfer(
                &username,
                amount,
                &description,
                &to_account,
                &pin,
            )?)),
            Command::History { username, query } => {
                Ok(CommandOutcome::History(self.history.history(&username, &query)?))
            }
            Command::DeleteTransaction {
                username,
                transaction_id,
                pin,
            } => Ok(CommandOutcome::TransactionDeleted(
                self.ledger.delete_transaction(&username, &transaction_id, &pin)?,
            )),
        }
    }

    /// Snapshot of all account profiles, for final state output
    pub fn accounts(&self) -> Vec<AccountProfile> {
        self.account_store
            .all_accounts()
            .iter()
            .map(|a| a.profile())
            .collect()
    }

    /// Current login failure count for an identifier
    pub fn login_attempts(&self, email: &str) -> u32 {
        self.login.attempts(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LoginOutcome;
    use crate::types::{AccountField, HistoryQuery, NewAccount};

    fn register_command(username: &str, email: &str, phone: &str) -> Command {
        Command::Register(NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: "correct horse".to_string(),
            password_confirm: "correct horse".to_string(),
            phone_number: phone.to_string(),
            address: "1 Main St".to_string(),
            pin: "123456".to_string(),
        })
    }

    #[test]
    fn test_engine_routes_full_account_lifecycle() {
        let engine = BankEngine::new(EngineConfig::default());

        let outcome = engine
            .execute(register_command("alice", "alice@x.com", "0801"))
            .unwrap();
        let profile = match outcome {
            CommandOutcome::Registered(profile) => profile,
            other => panic!("expected Registered, got {:?}", other),
        };
        assert_eq!(profile.balance, 0);

        let outcome = engine
            .execute(Command::Login {
                email: "alice@x.com".to_string(),
                password: "correct horse".to_string(),
            })
            .unwrap();
        assert!(matches!(
            outcome,
            CommandOutcome::LoggedIn(LoginOutcome::Authenticated(_))
        ));

        let outcome = engine
            .execute(Command::UpdateAccount {
                username: "alice".to_string(),
                field: AccountField::Address,
                value: "9 Elm St".to_string(),
                password: "correct horse".to_string(),
            })
            .unwrap();
        assert!(matches!(outcome, CommandOutcome::Updated(_)));

        let outcome = engine
            .execute(Command::DeleteAccount {
                username: "alice".to_string(),
                password: "correct horse".to_string(),
            })
            .unwrap();
        assert_eq!(outcome, CommandOutcome::AccountDeleted);
        assert!(engine.accounts().is_empty());
    }

    #[test]
    fn test_engine_routes_ledger_and_history() {
        let engine = BankEngine::new(EngineConfig::default());
        engine
            .execute(register_command("alice", "alice@x.com", "0801"))
            .unwrap();
        engine
            .execute(register_command("bob", "bob@x.com", "0802"))
            .unwrap();
        let bob_number = engine
            .accounts()
            .iter()
            .find(|a| a.username == "bob")
            .unwrap()
            .account_number
            .clone();

        engine
            .execute(Command::Deposit {
                username: "alice".to_string(),
                amount: 10_000,
                pin: "123456".to_string(),
            })
            .unwrap();
        engine
            .execute(Command::Transfer {
                username: "alice".to_string(),
                amount: 4_000,
                description: "rent".to_string(),
                to_account: bob_number,
                pin: "123456".to_string(),
            })
            .unwrap();

        let outcome = engine
            .execute(Command::History {
                username: "alice".to_string(),
                query: HistoryQuery::default(),
            })
            .unwrap();
        let page = match outcome {
            CommandOutcome::History(page) => page,
            other => panic!("expected History, got {:?}", other),
        };
        assert_eq!(page.count, 2);

        let balances: Vec<i64> = {
            let mut profiles = engine.accounts();
            profiles.sort_by(|a, b| a.username.cmp(&b.username));
            profiles.iter().map(|p| p.balance).collect()
        };
        assert_eq!(balances, vec![6_000, 4_000]);
    }

    #[test]
    fn test_engine_surfaces_component_errors() {
        let engine = BankEngine::new(EngineConfig::default());

        let err = engine
            .execute(Command::Deposit {
                username: "nobody".to_string(),
                amount: 100,
                pin: "123456".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, BankError::AccountNotFound { .. }));
    }

    #[test]
    fn test_outcome_summaries_are_informative() {
        let engine = BankEngine::new(EngineConfig::default());
        let outcome = engine
            .execute(register_command("alice", "alice@x.com", "0801"))
            .unwrap();
        assert!(outcome.summary().contains("alice"));
    }
}
