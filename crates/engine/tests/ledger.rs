use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, LedgerInput, MoneyCents, Registration, Totals};
use migration::MigratorTrait;
use tokio::task::JoinSet;

async fn engine_with_users() -> (Engine, DatabaseConnection, i32, i32) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    let mut ids = Vec::new();
    for email in ["andik@example.com", "jane@example.com"] {
        let user = engine
            .register(Registration {
                organization: "Company".to_string(),
                name: email.to_string(),
                email: email.to_string(),
                whatsapp: None,
                password: "password".to_string(),
            })
            .await
            .unwrap();
        ids.push(user.id);
    }

    (engine, db, ids[0], ids[1])
}

fn input(date: &str, revenue: i64, expense: i64) -> LedgerInput {
    LedgerInput {
        date: date.to_string(),
        revenue: MoneyCents::new(revenue * 100),
        expense: MoneyCents::new(expense * 100),
    }
}

fn money(units: i64) -> MoneyCents {
    MoneyCents::new(units * 100)
}

#[tokio::test]
async fn create_computes_net_and_get_returns_it() {
    let (engine, _db, andik, _) = engine_with_users().await;

    let created = engine
        .create_ledger_record(andik, input("2025-09-01", 10_000, 5_000))
        .await
        .unwrap();
    assert_eq!(created.owner_id, andik);
    assert_eq!(created.date, "2025-09-01");
    assert_eq!(created.net, money(5_000));

    let fetched = engine.ledger_record(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_missing_record_is_not_found() {
    let (engine, _db, _, _) = engine_with_users().await;

    assert_eq!(
        engine.ledger_record(42).await.unwrap_err(),
        EngineError::KeyNotFound("ledger record 42".to_string())
    );
}

#[tokio::test]
async fn date_is_unique_per_owner_only() {
    let (engine, _db, andik, jane) = engine_with_users().await;

    engine
        .create_ledger_record(andik, input("2025-09-01", 10_000, 5_000))
        .await
        .unwrap();

    // Another owner may use the same date.
    engine
        .create_ledger_record(jane, input("2025-09-01", 20_000, 12_000))
        .await
        .unwrap();

    let err = engine
        .create_ledger_record(andik, input("2025-09-01", 1, 1))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("2025-09-01".to_string()));
    assert_eq!(engine.ledger_records(andik).await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_validates_owner_and_date() {
    let (engine, _db, andik, _) = engine_with_users().await;

    assert!(matches!(
        engine.create_ledger_record(0, input("2025-09-01", 1, 1)).await,
        Err(EngineError::InvalidInput(_))
    ));
    assert!(matches!(
        engine
            .create_ledger_record(andik, input("09/01/2025", 1, 1))
            .await,
        Err(EngineError::InvalidInput(_))
    ));
    assert!(matches!(
        engine
            .create_ledger_record(9_999, input("2025-09-01", 1, 1))
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn list_is_newest_first_and_scoped_to_owner() {
    let (engine, _db, andik, jane) = engine_with_users().await;

    for date in ["2025-09-02", "2025-08-30", "2025-09-10"] {
        engine
            .create_ledger_record(andik, input(date, 10, 5))
            .await
            .unwrap();
    }
    engine
        .create_ledger_record(jane, input("2025-09-05", 10, 5))
        .await
        .unwrap();

    let dates: Vec<_> = engine
        .ledger_records(andik)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.date)
        .collect();
    assert_eq!(dates, vec!["2025-09-10", "2025-09-02", "2025-08-30"]);
}

#[tokio::test]
async fn update_recomputes_net_and_checks_date() {
    let (engine, _db, andik, _) = engine_with_users().await;

    let first = engine
        .create_ledger_record(andik, input("2025-09-01", 100, 40))
        .await
        .unwrap();
    engine
        .create_ledger_record(andik, input("2025-09-02", 50, 10))
        .await
        .unwrap();

    let updated = engine
        .update_ledger_record(first.id, input("2025-09-03", 80, 100))
        .await
        .unwrap();
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.date, "2025-09-03");
    assert_eq!(updated.net, money(-20));

    // Keeping its own date is fine.
    engine
        .update_ledger_record(first.id, input("2025-09-03", 90, 100))
        .await
        .unwrap();

    let err = engine
        .update_ledger_record(first.id, input("2025-09-02", 1, 1))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("2025-09-02".to_string()));

    assert!(matches!(
        engine
            .update_ledger_record(9_999, input("2025-09-20", 1, 1))
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (engine, _db, andik, _) = engine_with_users().await;
    let record = engine
        .create_ledger_record(andik, input("2025-09-01", 100, 40))
        .await
        .unwrap();

    engine.delete_ledger_record(record.id).await.unwrap();
    engine.delete_ledger_record(record.id).await.unwrap();
    engine.delete_ledger_record(12_345).await.unwrap();

    assert!(engine.ledger_records(andik).await.unwrap().is_empty());
}

#[tokio::test]
async fn stats_aggregate_owner_records() {
    let (engine, _db, andik, jane) = engine_with_users().await;
    engine
        .create_ledger_record(andik, input("2025-03-15", 50, 10))
        .await
        .unwrap();
    engine
        .create_ledger_record(andik, input("2025-03-01", 100, 40))
        .await
        .unwrap();
    engine
        .create_ledger_record(jane, input("2025-03-01", 7_000, 1))
        .await
        .unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
    let stats = engine.ledger_stats(andik, today).await.unwrap();

    let dates: Vec<_> = stats.records.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-03-01", "2025-03-15"]);
    assert_eq!(stats.daily.len(), 31);
    assert_eq!(
        stats.monthly[2].totals,
        Totals {
            revenue: money(150),
            expense: money(50),
            net: money(100),
        }
    );
    assert_eq!(stats.yearly[&2025].net, money(100));
    assert_eq!(stats.summary.avg_net, MoneyCents::new(323));
    assert_eq!(stats.summary.max_revenue, money(100));
    assert_eq!(stats.summary.min_expense, money(10));
}

#[tokio::test]
async fn stats_fail_on_corrupted_date() {
    let (engine, db, andik, _) = engine_with_users().await;
    engine
        .create_ledger_record(andik, input("2025-03-01", 100, 40))
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE profit_losses SET date = ? WHERE user_id = ?",
        vec!["01-03-2025".into(), andik.into()],
    ))
    .await
    .unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
    assert!(matches!(
        engine.ledger_stats(andik, today).await,
        Err(EngineError::InvalidData(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_for_one_date_keep_one_record() {
    let path = std::env::temp_dir().join(format!("pnl-ledger-{}.db", std::process::id()));
    let path = path.display().to_string();
    let db = Database::connect(format!("sqlite:{path}?mode=rwc"))
        .await
        .unwrap();
    migration::Migrator::fresh(&db).await.unwrap();
    let engine = Arc::new(Engine::builder().database(db).build().await.unwrap());
    let owner = engine
        .register(Registration {
            organization: "Company".to_string(),
            name: "Andik".to_string(),
            email: "andik@example.com".to_string(),
            whatsapp: None,
            password: "password".to_string(),
        })
        .await
        .unwrap()
        .id;

    let mut tasks = JoinSet::new();
    for revenue in 1..=8 {
        let engine = Arc::clone(&engine);
        tasks.spawn(async move {
            engine
                .create_ledger_record(owner, input("2025-09-01", revenue, 0))
                .await
        });
    }

    let mut created = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert_eq!(err, EngineError::ExistingKey("2025-09-01".to_string())),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(engine.ledger_records(owner).await.unwrap().len(), 1);

    drop(engine);
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}
