//! Database tests

use super::*;
use crate::analytics::{IncomeBasis, MonthRange, Recommendation};
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed_user(db: &Database) -> User {
        db.create_user(&NewUser {
            username: "ada".to_string(),
            email: "Ada@Example.com".to_string(),
        })
        .unwrap()
    }

    fn seed_account(db: &Database, user_id: i64, balance: f64) -> Account {
        db.create_account(
            user_id,
            &NewAccount {
                name: "Current".to_string(),
                account_type: AccountType::Checking,
                balance,
            },
        )
        .unwrap()
    }

    fn expense(account_id: i64, amount: f64, description: &str, date: NaiveDate) -> NewTransaction {
        NewTransaction {
            account_id,
            amount,
            description: description.to_string(),
            category: None,
            direction: Direction::Expense,
            date: Some(date),
            notes: None,
        }
    }

    fn balance(db: &Database, account_id: i64) -> f64 {
        db.get_account(account_id).unwrap().unwrap().balance
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_users().unwrap().is_empty());
        assert!(db.list_audit_log(&AuditFilter::with_limit(10)).unwrap().is_empty());
    }

    #[test]
    fn test_user_email_normalized_and_unique() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        assert_eq!(user.email, "ada@example.com");
        assert!(db.get_user_by_email("ADA@example.com").unwrap().is_some());

        let dup = db.create_user(&NewUser {
            username: "other".to_string(),
            email: "ada@example.com".to_string(),
        });
        assert!(matches!(dup, Err(Error::Conflict(_))));
        assert_eq!(db.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_user_rejected() {
        let db = Database::in_memory().unwrap();
        let result = db.create_user(&NewUser {
            username: "".to_string(),
            email: "x@example.com".to_string(),
        });
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_account_requires_user() {
        let db = Database::in_memory().unwrap();
        let result = db.create_account(
            99,
            &NewAccount {
                name: "Ghost".to_string(),
                account_type: AccountType::Cash,
                balance: 0.0,
            },
        );
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_transaction_adjusts_balance() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        let account = seed_account(&db, user.id, 1000.0);

        let tx = db
            .create_transaction(
                user.id,
                &expense(account.id, 45.5, "TESCO STORES", day(2024, 3, 2)),
                "Groceries",
            )
            .unwrap();
        assert_eq!(tx.category, "Groceries");
        assert_eq!(balance(&db, account.id), 954.5);

        let salary = NewTransaction {
            direction: Direction::Income,
            ..expense(account.id, 2000.0, "Salary", day(2024, 3, 1))
        };
        db.create_transaction(user.id, &salary, "Income").unwrap();
        assert_eq!(balance(&db, account.id), 2954.5);
    }

    #[test]
    fn test_transaction_update_moves_balance() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        let account = seed_account(&db, user.id, 100.0);
        let tx = db
            .create_transaction(
                user.id,
                &expense(account.id, 30.0, "Coffee", day(2024, 3, 2)),
                "Dining",
            )
            .unwrap();
        assert_eq!(balance(&db, account.id), 70.0);

        let updated = db
            .update_transaction(
                tx.id,
                &TransactionUpdate {
                    amount: Some(10.0),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.amount, 10.0);
        assert_eq!(updated.description, "Coffee");
        assert_eq!(balance(&db, account.id), 90.0);

        // Flipping the direction swings the balance by twice the amount
        db.update_transaction(
            tx.id,
            &TransactionUpdate {
                direction: Some(Direction::Income),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(balance(&db, account.id), 110.0);

        assert!(db
            .update_transaction(999, &TransactionUpdate::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_transaction_delete_reverses_balance() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        let account = seed_account(&db, user.id, 100.0);
        let tx = db
            .create_transaction(
                user.id,
                &expense(account.id, 25.0, "Cinema", day(2024, 3, 5)),
                "Entertainment",
            )
            .unwrap();

        assert!(db.delete_transaction(tx.id).unwrap());
        assert_eq!(balance(&db, account.id), 100.0);
        assert!(db.get_transaction(tx.id).unwrap().is_none());
        assert!(!db.delete_transaction(tx.id).unwrap());
    }

    #[test]
    fn test_transaction_rejects_foreign_account() {
        let db = Database::in_memory().unwrap();
        let owner = seed_user(&db);
        let other = db
            .create_user(&NewUser {
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
            })
            .unwrap();
        let account = seed_account(&db, owner.id, 50.0);

        let result = db.create_transaction(
            other.id,
            &expense(account.id, 5.0, "Snack", day(2024, 3, 5)),
            "Dining",
        );
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(balance(&db, account.id), 50.0);
        assert!(db
            .list_transactions(other.id, &TransactionQuery::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        let account = seed_account(&db, user.id, 50.0);

        // Negative amounts fail validation before anything is written
        let result = db.create_transaction(
            user.id,
            &expense(account.id, -5.0, "Refund", day(2024, 3, 5)),
            "Shopping",
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));

        // Balance update fails after the insert; the insert must not survive
        {
            let conn = db.conn().unwrap();
            conn.execute_batch(
                "CREATE TRIGGER block_balance BEFORE UPDATE ON accounts
                 BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
            )
            .unwrap();
        }
        let result = db.create_transaction(
            user.id,
            &expense(account.id, 5.0, "Snack", day(2024, 3, 5)),
            "Dining",
        );
        assert!(result.is_err());
        assert_eq!(balance(&db, account.id), 50.0);
        let count: i64 = db
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_failed_commit_rolls_back() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);

        // A deferred foreign key violation only surfaces at COMMIT
        let result = db.with_transaction(|conn| {
            conn.execute_batch("PRAGMA defer_foreign_keys = ON;")?;
            conn.execute(
                "INSERT INTO accounts (user_id, name) VALUES (?, 'Ghost')",
                [user.id + 100],
            )?;
            Ok(())
        });
        assert!(result.is_err());

        // No transaction is left open holding the write lock
        db.with_transaction(|conn| {
            conn.execute(
                "INSERT INTO accounts (user_id, name) VALUES (?, 'Savings')",
                [user.id],
            )?;
            Ok(())
        })
        .unwrap();

        let names: Vec<String> = db
            .list_accounts(user.id)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Savings".to_string()]);
        let ghosts: i64 = db
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM accounts WHERE name = 'Ghost'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(ghosts, 0);
    }

    #[test]
    fn test_encrypted_database_requires_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finora.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new_with_key(path, Some("correct horse")).unwrap();
            assert!(db.is_encrypted());
            assert_eq!(db.path(), path);
            seed_user(&db);
        }

        let db = Database::new_with_key(path, Some("correct horse")).unwrap();
        assert_eq!(db.list_users().unwrap().len(), 1);
        drop(db);

        assert!(Database::new_with_key(path, Some("wrong horse")).is_err());
        assert!(!Database::in_memory().unwrap().is_encrypted());
    }

    #[test]
    fn test_list_transactions_filters() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        let account = seed_account(&db, user.id, 0.0);

        for (amount, desc, date, cat) in [
            (10.0, "Feb shop", day(2024, 2, 28), "Groceries"),
            (20.0, "Mar shop", day(2024, 3, 1), "Groceries"),
            (30.0, "Mar film", day(2024, 3, 31), "Entertainment"),
            (40.0, "Apr shop", day(2024, 4, 1), "Groceries"),
        ] {
            db.create_transaction(user.id, &expense(account.id, amount, desc, date), cat)
                .unwrap();
        }

        let march = MonthRange::new(2024, 3).unwrap();
        let in_march = db
            .list_transactions(
                user.id,
                &TransactionQuery {
                    month: Some(march),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(in_march.len(), 2);
        // Newest first
        assert_eq!(in_march[0].description, "Mar film");

        let groceries = db
            .list_transactions(
                user.id,
                &TransactionQuery {
                    category: Some("groceries".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(groceries.len(), 3);

        let limited = db
            .list_transactions(
                user.id,
                &TransactionQuery {
                    limit: Some(1),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].description, "Apr shop");
    }

    #[test]
    fn test_budget_spent_is_derived() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        let account = seed_account(&db, user.id, 0.0);

        let budget = db
            .create_budget(
                user.id,
                &NewBudget {
                    category: "groceries".to_string(),
                    month: "2024-03".to_string(),
                    allocated: 200.0,
                },
            )
            .unwrap();
        assert_eq!(budget.category, "Groceries");
        assert_eq!(budget.spent, 0.0);

        db.create_transaction(
            user.id,
            &expense(account.id, 50.0, "Shop", day(2024, 3, 3)),
            "Groceries",
        )
        .unwrap();
        // Other months and income do not count
        db.create_transaction(
            user.id,
            &expense(account.id, 70.0, "Shop", day(2024, 4, 1)),
            "Groceries",
        )
        .unwrap();
        let refund = NewTransaction {
            direction: Direction::Income,
            ..expense(account.id, 5.0, "Refund", day(2024, 3, 4))
        };
        db.create_transaction(user.id, &refund, "Groceries").unwrap();

        let budget = db.get_budget(budget.id).unwrap().unwrap();
        assert_eq!(budget.spent, 50.0);

        let march = MonthRange::new(2024, 3).unwrap();
        let listed = db.list_budgets(user.id, Some(&march)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].spent, 50.0);
    }

    #[test]
    fn test_budget_unique_per_category_month() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        let new_budget = NewBudget {
            category: "Dining".to_string(),
            month: "2024-03".to_string(),
            allocated: 100.0,
        };
        db.create_budget(user.id, &new_budget).unwrap();
        let dup = db.create_budget(user.id, &new_budget);
        assert!(matches!(dup, Err(Error::Conflict(_))));

        let bad_month = db.create_budget(
            user.id,
            &NewBudget {
                month: "2024-13".to_string(),
                ..new_budget.clone()
            },
        );
        assert!(matches!(bad_month, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_budget_update_and_delete() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        let budget = db
            .create_budget(
                user.id,
                &NewBudget {
                    category: "Utilities".to_string(),
                    month: "2024-03".to_string(),
                    allocated: 100.0,
                },
            )
            .unwrap();

        let updated = db
            .update_budget(
                budget.id,
                &BudgetUpdate {
                    allocated: Some(150.0),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.allocated, 150.0);
        assert_eq!(updated.category, "Utilities");

        assert!(db.delete_budget(budget.id).unwrap());
        assert!(!db.delete_budget(budget.id).unwrap());
        assert!(db
            .update_budget(budget.id, &BudgetUpdate::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_goal_crud_and_ordering() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);

        let small = db
            .create_goal(
                user.id,
                &NewGoal {
                    name: "New phone".to_string(),
                    glyph: DEFAULT_GOAL_GLYPH.to_string(),
                    target_amount: 600.0,
                    current_amount: 0.0,
                    deadline: Some(day(2024, 6, 1)),
                    priority: GoalPriority::Small,
                },
            )
            .unwrap();
        let large = db
            .create_goal(
                user.id,
                &NewGoal {
                    name: "House deposit".to_string(),
                    glyph: "🏠".to_string(),
                    target_amount: 20000.0,
                    current_amount: 1500.0,
                    deadline: None,
                    priority: GoalPriority::Large,
                },
            )
            .unwrap();

        let goals = db.list_goals(user.id).unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].id, large.id);
        assert_eq!(goals[1].deadline, Some(day(2024, 6, 1)));

        let updated = db
            .update_goal(
                small.id,
                &GoalUpdate {
                    current_amount: Some(200.0),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.current_amount, 200.0);
        assert_eq!(updated.name, "New phone");

        let bad = db.update_goal(
            small.id,
            &GoalUpdate {
                target_amount: Some(0.0),
                ..Default::default()
            },
        );
        assert!(matches!(bad, Err(Error::InvalidData(_))));

        assert!(db.delete_goal(small.id).unwrap());
        assert_eq!(db.list_goals(user.id).unwrap().len(), 1);
    }

    #[test]
    fn test_monthly_analytics_from_ledger() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        let account = seed_account(&db, user.id, 0.0);

        let salary = NewTransaction {
            direction: Direction::Income,
            ..expense(account.id, 1000.0, "Salary", day(2024, 3, 1))
        };
        db.create_transaction(user.id, &salary, "Income").unwrap();
        db.create_transaction(
            user.id,
            &expense(account.id, 400.0, "Rent", day(2024, 3, 2)),
            "Rent",
        )
        .unwrap();
        db.create_transaction(
            user.id,
            &expense(account.id, 120.0, "Shop", day(2024, 3, 9)),
            "Groceries",
        )
        .unwrap();
        // Outside the month
        db.create_transaction(
            user.id,
            &expense(account.id, 999.0, "Shop", day(2024, 2, 9)),
            "Groceries",
        )
        .unwrap();
        db.create_budget(
            user.id,
            &NewBudget {
                category: "Groceries".to_string(),
                month: "2024-03".to_string(),
                allocated: 100.0,
            },
        )
        .unwrap();

        let march = MonthRange::new(2024, 3).unwrap();
        let snapshot = db.monthly_analytics(user.id, &march, None).unwrap();
        assert_eq!(snapshot.month.as_deref(), Some("2024-03"));
        assert_eq!(snapshot.income_basis, IncomeBasis::Transactions);
        assert_eq!(snapshot.total_income, 1000.0);
        assert_eq!(snapshot.total_spent, 520.0);
        assert_eq!(snapshot.remaining, 480.0);
        assert_eq!(snapshot.recommendation, Recommendation::OnTrack);
        assert_eq!(snapshot.spending_by_category[0].category, "Rent");
        assert_eq!(snapshot.budget_status.len(), 1);
        assert_eq!(snapshot.budget_status[0].spent, 120.0);
        assert!(snapshot
            .insights
            .iter()
            .any(|i| i.contains("Rent") && i.contains("40")));
        assert!(snapshot
            .insights
            .iter()
            .any(|i| i.starts_with("💡 Groceries budget exceeded by £20.00")));

        let declared = db.monthly_analytics(user.id, &march, Some(500.0)).unwrap();
        assert_eq!(declared.income_basis, IncomeBasis::Declared);
        assert_eq!(declared.monthly_income, 500.0);
        assert_eq!(declared.recommendation, Recommendation::NeedsAttention);

        assert!(matches!(
            db.monthly_analytics(42, &march, None),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();
        db.log_audit("api-key", "create", Some("user"), Some(1), None)
            .unwrap();
        db.log_audit(
            "api-key",
            "delete",
            Some("transaction"),
            Some(7),
            Some("{\"amount\":5.0}"),
        )
        .unwrap();

        let entries = db.list_audit_log(&AuditFilter::with_limit(10)).unwrap();
        assert_eq!(entries.len(), 2);
        // Same-second entries fall back to id order
        assert_eq!(entries[0].action, "delete");
        assert_eq!(entries[0].entity_id, Some(7));
        assert_eq!(db.list_audit_log(&AuditFilter::with_limit(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_audit_log_filters() {
        let db = Database::in_memory().unwrap();
        db.log_audit("api-key", "create", Some("budget"), Some(3), None)
            .unwrap();
        db.log_audit("local-dev", "get", Some("budget"), Some(3), None)
            .unwrap();
        db.log_audit("api-key", "list", Some("goal"), None, None)
            .unwrap();

        let by_actor = db
            .list_audit_log(&AuditFilter {
                actor: Some("api-key".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_actor.len(), 2);
        assert!(by_actor.iter().all(|e| e.actor == "api-key"));

        let by_entity = db
            .list_audit_log(&AuditFilter {
                entity_type: Some("budget".into()),
                entity_id: Some(3),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_entity.len(), 2);
        assert_eq!(by_entity[0].action, "get");

        let none = db
            .list_audit_log(&AuditFilter {
                actor: Some("local-dev".into()),
                entity_type: Some("goal".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(none.is_empty());
    }
}
