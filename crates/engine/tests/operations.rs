use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Engine, EngineError, FuelKind, OperationFilter, OperationKind, OperationNewCmd,
    OperationPatch, PageRequest, ResultClass,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (id, name, email) in [
        ("user-alice", "Alice", "alice@example.com"),
        ("user-bob", "Bob", "bob@example.com"),
    ] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (id, name, email, password, created_at) VALUES (?, ?, ?, ?, ?)",
            vec![
                id.into(),
                name.into(),
                email.into(),
                "password".into(),
                Utc::now().into(),
            ],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

fn date(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap()
}

fn cmd(
    kind: OperationKind,
    fuel: FuelKind,
    quantity: rust_decimal::Decimal,
    occurred_at: DateTime<Utc>,
) -> OperationNewCmd {
    OperationNewCmd {
        kind,
        fuel,
        quantity,
        occurred_at,
    }
}

#[tokio::test]
async fn create_persists_valuated_fields() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Purchase,
                FuelKind::Gasoline,
                dec!(50),
                date(1, 15),
            ),
        )
        .await
        .unwrap();

    assert_eq!(created.unit_price, dec!(5.92));
    assert_eq!(created.tax_rate_percent, dec!(17.20));
    assert_eq!(created.total_value, dec!(386.81));

    let fetched = engine.operation(created.id, "user-alice").await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_rejects_out_of_range_inputs() {
    let (engine, _db) = engine_with_db().await;

    for (quantity, occurred_at) in [
        (dec!(0), date(1, 15)),
        (dec!(-5), date(1, 15)),
        (dec!(100001), date(1, 15)),
        (
            dec!(10),
            Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap(),
        ),
    ] {
        let result = engine
            .create_operation(
                "user-alice",
                cmd(
                    OperationKind::Sale,
                    FuelKind::Ethanol,
                    quantity,
                    occurred_at,
                ),
            )
            .await;
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }
}

#[tokio::test]
async fn update_rederives_month_and_revaluates() {
    let (engine, _db) = engine_with_db().await;
    let created = engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Purchase,
                FuelKind::Gasoline,
                dec!(50),
                date(1, 15),
            ),
        )
        .await
        .unwrap();

    // Moving the date to March repriced the operation from the March table.
    let updated = engine
        .update_operation(
            created.id,
            "user-alice",
            OperationPatch {
                occurred_at: Some(date(3, 2)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.unit_price, dec!(5.90));
    assert_eq!(updated.tax_rate_percent, dec!(18.10));
    assert_eq!(updated.total_value, dec!(388.46));
    // Fields not supplied keep their stored values.
    assert_eq!(updated.kind, OperationKind::Purchase);
    assert_eq!(updated.fuel, FuelKind::Gasoline);
    assert_eq!(updated.quantity, dec!(50));

    let fetched = engine.operation(created.id, "user-alice").await.unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_with_quantity_only_revaluates_in_place() {
    let (engine, _db) = engine_with_db().await;
    let created = engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Purchase,
                FuelKind::Gasoline,
                dec!(50),
                date(1, 15),
            ),
        )
        .await
        .unwrap();

    let updated = engine
        .update_operation(
            created.id,
            "user-alice",
            OperationPatch {
                quantity: Some(dec!(10)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.unit_price, dec!(5.92));
    assert_eq!(updated.total_value, dec!(77.36));
    assert_eq!(updated.occurred_at, created.occurred_at);
}

#[tokio::test]
async fn empty_patch_keeps_the_record_unchanged() {
    let (engine, _db) = engine_with_db().await;
    let created = engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Sale,
                FuelKind::Diesel,
                dec!(10),
                date(3, 10),
            ),
        )
        .await
        .unwrap();

    let updated = engine
        .update_operation(created.id, "user-alice", OperationPatch::default())
        .await
        .unwrap();
    assert_eq!(updated, created);
}

#[tokio::test]
async fn update_rejects_invalid_merged_values() {
    let (engine, _db) = engine_with_db().await;
    let created = engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Sale,
                FuelKind::Diesel,
                dec!(10),
                date(3, 10),
            ),
        )
        .await
        .unwrap();

    let result = engine
        .update_operation(
            created.id,
            "user-alice",
            OperationPatch {
                quantity: Some(dec!(0)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(EngineError::InvalidInput(_))));
}

#[tokio::test]
async fn list_filters_by_kind_fuel_and_date_range() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Purchase,
                FuelKind::Gasoline,
                dec!(50),
                date(1, 15),
            ),
        )
        .await
        .unwrap();
    engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Sale,
                FuelKind::Diesel,
                dec!(10),
                date(3, 10),
            ),
        )
        .await
        .unwrap();
    engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Sale,
                FuelKind::Ethanol,
                dec!(20),
                date(6, 5),
            ),
        )
        .await
        .unwrap();

    let (all, page) = engine
        .list_operations("user-alice", &OperationFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    // Newest first.
    assert_eq!(all[0].fuel, FuelKind::Ethanol);
    assert_eq!(all[2].fuel, FuelKind::Gasoline);

    let (sales, _) = engine
        .list_operations(
            "user-alice",
            &OperationFilter {
                kind: Some(OperationKind::Sale),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(sales.len(), 2);

    let (diesel, _) = engine
        .list_operations(
            "user-alice",
            &OperationFilter {
                fuel: Some(FuelKind::Diesel),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(diesel.len(), 1);

    let (march, _) = engine
        .list_operations(
            "user-alice",
            &OperationFilter {
                from: Some(date(2, 1)),
                to: Some(date(4, 1)),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(march.len(), 1);
    assert_eq!(march[0].fuel, FuelKind::Diesel);
}

#[tokio::test]
async fn list_paginates_newest_first() {
    let (engine, _db) = engine_with_db().await;
    for month in [1, 3, 6] {
        engine
            .create_operation(
                "user-alice",
                cmd(
                    OperationKind::Purchase,
                    FuelKind::Gasoline,
                    dec!(1),
                    date(month, 1),
                ),
            )
            .await
            .unwrap();
    }

    let (first, page) = engine
        .list_operations(
            "user-alice",
            &OperationFilter::default(),
            PageRequest {
                page: Some(1),
                limit: Some(2),
            },
        )
        .await
        .unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(page.total, 3);
    assert_eq!(page.pages, 2);

    let (second, _) = engine
        .list_operations(
            "user-alice",
            &OperationFilter::default(),
            PageRequest {
                page: Some(2),
                limit: Some(2),
            },
        )
        .await
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].occurred_at, date(1, 1));
}

#[tokio::test]
async fn list_rejects_out_of_range_pagination() {
    let (engine, _db) = engine_with_db().await;

    for (page, limit) in [(Some(0), None), (None, Some(0)), (None, Some(101))] {
        let result = engine
            .list_operations(
                "user-alice",
                &OperationFilter::default(),
                PageRequest { page, limit },
            )
            .await;
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }
}

#[tokio::test]
async fn summary_classifies_filtered_operations() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Purchase,
                FuelKind::Gasoline,
                dec!(50),
                date(1, 15),
            ),
        )
        .await
        .unwrap();
    engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Sale,
                FuelKind::Gasoline,
                dec!(50),
                date(1, 20),
            ),
        )
        .await
        .unwrap();

    let summary = engine
        .summary("user-alice", &OperationFilter::default())
        .await
        .unwrap();
    assert_eq!(summary.total_purchases, dec!(386.81));
    assert_eq!(summary.total_sales, dec!(387.45));
    assert_eq!(summary.difference, dec!(0.64));
    assert_eq!(summary.result, ResultClass::Profit);
    assert_eq!(summary.operation_count, 2);
    assert_eq!(summary.per_fuel.len(), 1);
    assert_eq!(summary.per_fuel[0].difference, dec!(0.64));

    // The same filters as the list apply.
    let only_sales = engine
        .summary(
            "user-alice",
            &OperationFilter {
                kind: Some(OperationKind::Sale),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(only_sales.operation_count, 1);
    assert_eq!(only_sales.total_purchases, dec!(0));
    assert_eq!(only_sales.result, ResultClass::Profit);
}

#[tokio::test]
async fn records_are_scoped_to_their_owner() {
    let (engine, _db) = engine_with_db().await;
    let created = engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Purchase,
                FuelKind::Gasoline,
                dec!(50),
                date(1, 15),
            ),
        )
        .await
        .unwrap();

    for result in [
        engine.operation(created.id, "user-bob").await.err(),
        engine
            .update_operation(created.id, "user-bob", OperationPatch::default())
            .await
            .err(),
        engine.delete_operation(created.id, "user-bob").await.err(),
    ] {
        assert!(matches!(result, Some(EngineError::KeyNotFound(_))));
    }
}

#[tokio::test]
async fn delete_removes_the_record() {
    let (engine, _db) = engine_with_db().await;
    let created = engine
        .create_operation(
            "user-alice",
            cmd(
                OperationKind::Sale,
                FuelKind::Ethanol,
                dec!(5),
                date(2, 1),
            ),
        )
        .await
        .unwrap();

    engine
        .delete_operation(created.id, "user-alice")
        .await
        .unwrap();
    assert!(matches!(
        engine.operation(created.id, "user-alice").await,
        Err(EngineError::KeyNotFound(_))
    ));

    let missing = Uuid::new_v4();
    assert!(matches!(
        engine.delete_operation(missing, "user-alice").await,
        Err(EngineError::KeyNotFound(_))
    ));
}
