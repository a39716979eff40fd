use super::*;

#[test]
fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
    assert_eq!(db.location(), ":memory:");
}

#[test]
fn test_new_handles_memory_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");

    assert_eq!(DuckDbBackend::new(":memory:").unwrap().location(), ":memory:");

    let db = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
    assert_eq!(db.location(), path.display().to_string());
    assert!(path.exists());
}

#[test]
fn test_file_database_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();
    }
    let db = DuckDbBackend::from_path(&path).unwrap();
    assert_eq!(db.query_count("SELECT * FROM t").unwrap(), 1);
}

#[test]
fn test_relation_exists_schema_qualified() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE SCHEMA staging; CREATE TABLE staging.orders (id INTEGER);")
        .unwrap();

    assert!(db.relation_exists("staging.orders").unwrap());
    assert!(!db.relation_exists("orders").unwrap());
    assert!(!db.relation_exists("staging.customers").unwrap());
}

#[test]
fn test_transaction_commits_on_ok() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let inserted: DbResult<usize> = db.with_transaction(|tx| {
        tx.execute_batch("INSERT INTO t VALUES (1); INSERT INTO t VALUES (2);")?;
        Ok(2)
    });
    assert_eq!(inserted.unwrap(), 2);
    assert_eq!(db.query_count("SELECT * FROM t").unwrap(), 2);
}

#[test]
fn test_transaction_rolls_back_on_err() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let result: DbResult<()> = db.with_transaction(|tx| {
        tx.execute_batch("INSERT INTO t VALUES (1)")?;
        tx.execute_batch("INSERT INTO missing_table VALUES (1)")?;
        Ok(())
    });
    assert!(result.is_err());
    assert_eq!(db.query_count("SELECT * FROM t").unwrap(), 0);
}

#[test]
fn test_transaction_rolls_back_ddl() {
    let db = DuckDbBackend::in_memory().unwrap();

    let result: DbResult<()> = db.with_transaction(|tx| {
        tx.execute_batch("CREATE TABLE created_then_undone (id INTEGER)")?;
        Err(DbError::ExecutionError("abort".to_string()))
    });
    assert!(result.is_err());
    assert!(!db.relation_exists("created_then_undone").unwrap());
}

#[test]
fn test_transaction_rolls_back_on_panic() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _: DbResult<()> = db.with_transaction(|tx| {
            tx.execute_batch("INSERT INTO t VALUES (1)")?;
            panic!("migration aborted mid-flight");
        });
    }));
    assert!(outcome.is_err());

    // The panic poisoned the mutex; recover the connection to inspect it.
    let conn = match db.conn.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_poisoned_mutex_reported_as_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _: DbResult<()> = db.with_connection(|_| panic!("poison"));
    }));
    let err = db.execute_batch("SELECT 1").unwrap_err();
    assert!(matches!(err, DbError::MutexPoisoned(_)));
}

#[test]
fn test_constraint_violation_classified() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE k (id INTEGER PRIMARY KEY); INSERT INTO k VALUES (1);")
        .unwrap();
    let err = db.execute_batch("INSERT INTO k VALUES (1)").unwrap_err();
    assert!(err.is_constraint_violation(), "got {err:?}");
}

#[test]
fn test_execution_error_classified() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute_batch("SELEC 1").unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
}
