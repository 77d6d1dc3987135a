use sea_orm::{Database, DatabaseConnection, TransactionTrait};

use engine::{
    CategoryListFilter, CategoryScope, DEFAULT_GLOBAL_CATEGORIES, Engine, EngineError,
    ExpenseListFilter, ExpenseNewCmd, IncomeCmd, RegisterCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn global_only() -> CategoryListFilter {
    CategoryListFilter {
        is_global: Some(true),
        ..Default::default()
    }
}

#[tokio::test]
async fn register_creates_account_and_default_categories_once() {
    let (engine, _db) = engine_with_db().await;

    let (alice, account) = engine
        .register_user(RegisterCmd::new(" alice ", "alice@example.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(alice.name, "alice");
    assert_eq!(account.user_id, alice.id);
    assert!(account.balance.cents() == 0);
    assert_eq!(engine.list_accounts(&alice.id).await.unwrap().len(), 1);

    let (bob, _) = engine
        .register_user(RegisterCmd::new("bob", "bob@example.com", "secret2"))
        .await
        .unwrap();
    let globals = engine.list_categories(&bob.id, &global_only()).await.unwrap();
    assert_eq!(globals.len(), DEFAULT_GLOBAL_CATEGORIES.len());
    for name in DEFAULT_GLOBAL_CATEGORIES {
        assert!(globals.iter().any(|c| c.name == name));
    }
}

#[tokio::test]
async fn register_rejects_duplicates_and_bad_input() {
    let (engine, _db) = engine_with_db().await;
    engine
        .register_user(RegisterCmd::new("alice", "alice@example.com", "secret1"))
        .await
        .unwrap();

    let err = engine
        .register_user(RegisterCmd::new("alice2", "alice@example.com", "secret1"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let err = engine
        .register_user(RegisterCmd::new("alice", "other@example.com", "secret1"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    for cmd in [
        RegisterCmd::new("  ", "x@example.com", "secret1"),
        RegisterCmd::new("carol", "not-an-email", "secret1"),
        RegisterCmd::new("carol", "carol@example.com", "short"),
    ] {
        let err = engine.register_user(cmd).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidName(_)));
    }
}

#[tokio::test]
async fn authenticate_checks_password() {
    let (engine, _db) = engine_with_db().await;
    let (alice, _) = engine
        .register_user(RegisterCmd::new("alice", "alice@example.com", "secret1"))
        .await
        .unwrap();

    let user = engine
        .authenticate("alice@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(user.id, alice.id);

    assert_eq!(
        engine.authenticate("alice@example.com", "wrong!").await,
        Err(EngineError::Unauthorized)
    );
    assert_eq!(
        engine.authenticate("nobody@example.com", "secret1").await,
        Err(EngineError::Unauthorized)
    );
}

#[tokio::test]
async fn rename_user_keeps_names_unique() {
    let (engine, _db) = engine_with_db().await;
    let (alice, _) = engine
        .register_user(RegisterCmd::new("alice", "alice@example.com", "secret1"))
        .await
        .unwrap();
    let (bob, _) = engine
        .register_user(RegisterCmd::new("bob", "bob@example.com", "secret1"))
        .await
        .unwrap();

    let err = engine.rename_user(&alice.id, "bob", &alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let err = engine.rename_user(&alice.id, "mallory", &bob.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let renamed = engine.rename_user(&alice.id, "alicia", &alice.id).await.unwrap();
    assert_eq!(renamed.name, "alicia");
    assert_eq!(engine.user(&alice.id).await.unwrap().name, "alicia");
}

#[tokio::test]
async fn second_account_is_forbidden() {
    let (engine, _db) = engine_with_db().await;
    let (alice, _) = engine
        .register_user(RegisterCmd::new("alice", "alice@example.com", "secret1"))
        .await
        .unwrap();

    let err = engine.create_account(&alice.id, &alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.create_account("missing", &alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn account_with_history_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let (alice, account) = engine
        .register_user(RegisterCmd::new("alice", "alice@example.com", "secret1"))
        .await
        .unwrap();
    engine
        .add_income(IncomeCmd::new(&account.id, &alice.id, 100))
        .await
        .unwrap();

    let err = engine.delete_account(&account.id, &alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn empty_account_can_be_deleted_and_reopened() {
    let (engine, _db) = engine_with_db().await;
    let (alice, account) = engine
        .register_user(RegisterCmd::new("alice", "alice@example.com", "secret1"))
        .await
        .unwrap();

    engine.delete_account(&account.id, &alice.id).await.unwrap();
    assert!(engine.list_accounts(&alice.id).await.unwrap().is_empty());

    let reopened = engine.create_account(&alice.id, &alice.id).await.unwrap();
    assert_eq!(reopened.balance.cents(), 0);
}

#[tokio::test]
async fn cascade_delete_account_removes_history() {
    let (engine, db) = engine_with_db().await;
    let (alice, account) = engine
        .register_user(RegisterCmd::new("alice", "alice@example.com", "secret1"))
        .await
        .unwrap();
    let food = engine
        .list_categories(&alice.id, &global_only())
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Food")
        .unwrap();
    engine
        .add_income(IncomeCmd::new(&account.id, &alice.id, 500))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseNewCmd::new(&alice.id, &food.id, &account.id, 200))
        .await
        .unwrap();

    let tx = db.begin().await.unwrap();
    Engine::cascade_delete_account(&tx, &account.id).await.unwrap();
    tx.commit().await.unwrap();

    let err = engine.account(&account.id, &alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let expenses = engine
        .list_expenses(&alice.id, &ExpenseListFilter::default())
        .await
        .unwrap();
    assert!(expenses.is_empty());
}

#[tokio::test]
async fn delete_user_removes_owned_rows_and_keeps_globals() {
    let (engine, _db) = engine_with_db().await;
    let (alice, account) = engine
        .register_user(RegisterCmd::new("alice", "alice@example.com", "secret1"))
        .await
        .unwrap();
    let (bob, _) = engine
        .register_user(RegisterCmd::new("bob", "bob@example.com", "secret1"))
        .await
        .unwrap();
    let pets = engine
        .create_category("Pets", CategoryScope::Personal(alice.id.clone()), false)
        .await
        .unwrap();
    engine
        .add_income(IncomeCmd::new(&account.id, &alice.id, 500))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseNewCmd::new(&alice.id, &pets.id, &account.id, 200))
        .await
        .unwrap();

    let err = engine.delete_user(&alice.id, &bob.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.delete_user(&alice.id, &alice.id).await.unwrap();

    assert!(matches!(
        engine.user(&alice.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.category(&pets.id, &alice.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(engine.list_accounts(&alice.id).await.unwrap().is_empty());
    let globals = engine.list_categories(&bob.id, &global_only()).await.unwrap();
    assert_eq!(globals.len(), DEFAULT_GLOBAL_CATEGORIES.len());
}

#[tokio::test]
async fn recompute_balance_rebuilds_from_history() {
    let (engine, db) = engine_with_db().await;
    let (alice, account) = engine
        .register_user(RegisterCmd::new("alice", "alice@example.com", "secret1"))
        .await
        .unwrap();
    engine
        .add_income(IncomeCmd::new(&account.id, &alice.id, 800))
        .await
        .unwrap();

    {
        use sea_orm::{ConnectionTrait, Statement};
        db.execute(Statement::from_sql_and_values(
            db.get_database_backend(),
            "UPDATE accounts SET balance_minor = ? WHERE id = ?",
            vec![5i64.into(), account.id.clone().into()],
        ))
        .await
        .unwrap();
    }

    let fixed = engine.recompute_balance(&account.id).await.unwrap();
    assert_eq!(fixed.balance.cents(), 800);
    assert_eq!(
        engine.account(&account.id, &alice.id).await.unwrap().balance.cents(),
        800
    );
}
